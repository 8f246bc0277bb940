//! Function response representation

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::envelope::Envelope;

/// The `(status, json)` pair a function invocation produces.
///
/// The host copies `status`, `headers` and `body` onto the outgoing HTTP
/// response without interpreting them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// HTTP status code
    pub status: u16,

    /// Response headers
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Response body
    #[serde(default)]
    pub body: Option<String>,
}

impl Response {
    /// Create a new response with the given status code (no body).
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Create a JSON response with a custom status code.
    ///
    /// # Example
    /// ```ignore
    /// Response::json(200, json!({"StatusCode": 0, "Message": "Success"}))
    /// ```
    pub fn json<T: Serialize>(status: u16, body: T) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        Self {
            status,
            headers,
            body: serde_json::to_string(&body).ok(),
        }
    }

    /// Create an envelope response with a custom status code.
    pub fn envelope(status: u16, envelope: &Envelope) -> Self {
        Self::json(status, envelope)
    }

    /// Create a 200 OK envelope response.
    pub fn ok(envelope: &Envelope) -> Self {
        Self::envelope(200, envelope)
    }

    /// Add a header to the response (builder pattern).
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Look up a header (case-insensitive).
    pub fn header(&self, key: &str) -> Option<&String> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// Parse the body back into an envelope.
    pub fn envelope_body(&self) -> Option<Envelope> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_str(body).ok())
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_response_is_json() {
        let response = Response::ok(&Envelope::success("Success"));
        assert_eq!(response.status, 200);
        assert_eq!(
            response.header("content-type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(response.envelope_body(), Some(Envelope::success("Success")));
    }
}
