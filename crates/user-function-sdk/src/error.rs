//! Error types for the user function

use thiserror::Error;

use crate::envelope::Envelope;
use crate::store::StoreError;
use crate::user::Field;

/// Errors that end a request with a failure envelope.
///
/// The `Display` text is exactly the `Message` the caller sees, so store
/// details never reach the response body.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Unsuccessful: Unsupported method")]
    UnsupportedMethod(String),

    #[error("Unsuccessful: Empty body")]
    EmptyBody,

    #[error("Unsuccessful")]
    InvalidJson(String),

    #[error("Unsuccessful: Missing fields")]
    MissingField(Field),

    #[error("Unsuccessful: Invalid characters in names")]
    InvalidName(Field),

    #[error("Unsuccessful: City must be a string")]
    InvalidCity,

    #[error("Unsuccessful: Age must be an integer")]
    InvalidAge,

    #[error("Unsuccessful: Id must be a positive integer")]
    InvalidId,

    #[error("Unsuccessful: No user found")]
    NotFound,

    #[error("Database Error")]
    Database(#[from] StoreError),
}

impl HandlerError {
    /// Convert the error to an HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::Database(_) => 500,
            _ => 400,
        }
    }

    /// Whether the fault came from the store rather than the input
    pub fn is_store_fault(&self) -> bool {
        matches!(self, HandlerError::Database(_))
    }

    /// Convert to a failure envelope response
    pub fn to_response(&self) -> crate::Response {
        crate::Response::envelope(self.status_code(), &Envelope::failure(self.to_string()))
    }
}

impl From<HandlerError> for crate::Response {
    fn from(err: HandlerError) -> Self {
        err.to_response()
    }
}
