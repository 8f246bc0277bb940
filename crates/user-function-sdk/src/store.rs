//! The relational store the function writes through

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One parameterized SQL statement with positional `?` parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// Errors raised by a store while executing a statement
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Statement failed: {0}")]
    Statement(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Executes statements and reports how many rows they touched.
///
/// Implementations acquire whatever connection they need for the call and
/// release it before returning, whether or not the statement succeeded.
pub trait UserStore: Send + Sync {
    fn execute(&self, statement: &Statement) -> Result<u64, StoreError>;
}

impl<S: UserStore + ?Sized> UserStore for std::sync::Arc<S> {
    fn execute(&self, statement: &Statement) -> Result<u64, StoreError> {
        (**self).execute(statement)
    }
}
