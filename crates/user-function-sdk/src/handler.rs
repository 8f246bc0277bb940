//! The function entry point
//!
//! A host hands [`UserFunction::handle`] the method and body it received and
//! gets back the status and envelope to send. The function keeps no state
//! between calls; the store is the only thing it touches.
//!
//! # Example
//!
//! ```ignore
//! use user_function_sdk::prelude::*;
//!
//! let function = UserFunction::new(Revision::Full);
//! let req = Request::new("POST", Some(r#"{"firstName":"John","lastName":"Dawson","city":"Oslo","age":41}"#.into()));
//! let response = function.handle(&req, &store);
//! assert_eq!(response.status, 200);
//! ```

use crate::envelope::Envelope;
use crate::error::HandlerError;
use crate::operation::{Operation, OperationRule, Revision};
use crate::store::{StoreError, UserStore};
use crate::user::UserRecord;
use crate::{Request, Response};

/// Validates a request and runs its one statement against a store
#[derive(Debug, Clone, Copy, Default)]
pub struct UserFunction {
    revision: Revision,
}

impl UserFunction {
    pub fn new(revision: Revision) -> Self {
        Self { revision }
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Handle one invocation. Failures become `StatusCode:-1` envelopes.
    pub fn handle(&self, req: &Request, store: &dyn UserStore) -> Response {
        tracing::debug!(
            request_id = %req.request_id,
            method = %req.method,
            revision = %self.revision,
            "Processing user request"
        );

        match self.try_handle(req, store) {
            Ok(envelope) => Response::ok(&envelope),
            Err(err) => {
                log_failure(req, &err);
                err.to_response()
            }
        }
    }

    fn try_handle(&self, req: &Request, store: &dyn UserStore) -> Result<Envelope, HandlerError> {
        let rule = self
            .revision
            .rule_for(&req.method)
            .ok_or_else(|| HandlerError::UnsupportedMethod(req.method.clone()))?;

        let body = req.json_object()?;
        let record = UserRecord::from_json(&body, rule.fields)?;

        if let Some(statement) = rule.statement(&record) {
            let affected = store.execute(&statement)?;
            tracing::debug!(
                request_id = %req.request_id,
                sql = %statement.sql,
                affected,
                "Statement executed"
            );

            if affected == 0 {
                if rule.operation.zero_rows_is_not_found() {
                    return Err(HandlerError::NotFound);
                }
                return Err(HandlerError::Database(StoreError::Statement(
                    "insert affected no rows".into(),
                )));
            }
        }

        tracing::info!(
            request_id = %req.request_id,
            operation = ?rule.operation,
            id = ?record.id,
            "User request succeeded"
        );

        Ok(success_envelope(rule, &record))
    }
}

fn success_envelope(rule: &OperationRule, record: &UserRecord) -> Envelope {
    let first = record.first_name.as_deref().unwrap_or_default();
    let last = record.last_name.as_deref().unwrap_or_default();

    let envelope = match rule.operation {
        Operation::Greet => Envelope::success(format!("Hello, {first} {last}")),
        _ => Envelope::success("Success"),
    };

    if rule.echo_names {
        envelope.with_names(first, last)
    } else {
        envelope
    }
}

fn log_failure(req: &Request, err: &HandlerError) {
    match err {
        HandlerError::Database(source) => tracing::error!(
            request_id = %req.request_id,
            method = %req.method,
            error = %source,
            "Database error"
        ),
        HandlerError::InvalidJson(detail) => tracing::warn!(
            request_id = %req.request_id,
            method = %req.method,
            detail = %detail,
            "Rejected request body"
        ),
        HandlerError::MissingField(field)
        | HandlerError::InvalidName(field) => tracing::warn!(
            request_id = %req.request_id,
            method = %req.method,
            field = %field,
            "{}", err
        ),
        _ => tracing::warn!(
            request_id = %req.request_id,
            method = %req.method,
            "{}", err
        ),
    }
}
