//! User function SDK - validation and dispatch for the `users` endpoint
//!
//! The function is a pure `(method, body) -> (status, json)` mapping over a
//! [`UserStore`]. Hosts adapt their own request type into [`Request`], call
//! [`UserFunction::handle`], and copy the returned [`Response`] out.

pub mod request;
pub mod response;
pub mod envelope;
pub mod error;
pub mod user;
pub mod operation;
pub mod store;
pub mod handler;

pub mod prelude {
    //! Common imports for hosts of the user function
    pub use crate::request::Request;
    pub use crate::response::Response;
    pub use crate::envelope::Envelope;
    pub use crate::error::HandlerError;
    pub use crate::operation::{Operation, OperationRule, Revision};
    pub use crate::store::{Statement, StoreError, UserStore};
    pub use crate::handler::UserFunction;
}

// Re-export key types at crate root
pub use request::Request;
pub use response::Response;
pub use envelope::Envelope;
pub use error::HandlerError;
pub use operation::Revision;
pub use store::{Statement, StoreError, UserStore};
pub use handler::UserFunction;
