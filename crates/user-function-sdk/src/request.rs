//! Function request representation

use crate::error::HandlerError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The two inputs a function invocation receives from its host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// HTTP method (POST, PUT, DELETE, ...)
    pub method: String,

    /// Raw request body, `None` when the host received no body
    #[serde(default)]
    pub body: Option<String>,

    /// Request ID for tracing
    #[serde(default)]
    pub request_id: String,

    /// Set when the host received body bytes that are not UTF-8
    #[serde(skip)]
    decode_error: Option<String>,
}

impl Request {
    pub fn new(method: impl Into<String>, body: Option<String>) -> Self {
        Self {
            method: method.into(),
            body,
            request_id: String::new(),
            decode_error: None,
        }
    }

    /// Build a request from raw body bytes.
    ///
    /// No bytes means no body. Bytes that are not UTF-8 are kept out of
    /// `body` and make `json_object` fail, so they never reach a store.
    pub fn from_bytes(method: impl Into<String>, bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return Self::new(method, None);
        }
        match std::str::from_utf8(bytes) {
            Ok(text) => Self::new(method, Some(text.to_string())),
            Err(e) => {
                let mut req = Self::new(method, None);
                req.decode_error = Some(e.to_string());
                req
            }
        }
    }

    /// Set the request ID (builder pattern).
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    /// Check if request method matches (case-insensitive).
    pub fn is_method(&self, method: &str) -> bool {
        self.method.eq_ignore_ascii_case(method)
    }

    /// The body text, or `HandlerError::EmptyBody` when absent or empty.
    /// Undecodable bytes fail as `HandlerError::InvalidJson`.
    pub fn require_body(&self) -> Result<&str, HandlerError> {
        if let Some(e) = &self.decode_error {
            return Err(HandlerError::InvalidJson(format!("body is not UTF-8: {}", e)));
        }
        match self.body.as_deref() {
            Some(body) if !body.is_empty() => Ok(body),
            _ => Err(HandlerError::EmptyBody),
        }
    }

    /// Parse the body as a JSON object.
    ///
    /// Scalars and arrays are rejected the same way malformed text is.
    pub fn json_object(&self) -> Result<Map<String, Value>, HandlerError> {
        let body = self.require_body()?;
        match serde_json::from_str(body) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(HandlerError::InvalidJson(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
            Err(e) => Err(HandlerError::InvalidJson(e.to_string())),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Default for Request {
    fn default() -> Self {
        Self::new("POST", None)
    }
}
