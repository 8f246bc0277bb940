//! The JSON wrapper returned for every response

use serde::{Deserialize, Serialize};

/// `StatusCode` value for a successful request
pub const STATUS_SUCCESS: i32 = 0;

/// `StatusCode` value for a failed request
pub const STATUS_FAILURE: i32 = -1;

/// Uniform response body: `{"StatusCode":0|-1,"Message":"..."}`.
///
/// The POST-only revisions echo the names back ahead of the status fields:
///
/// ```text
/// {"firstname":"John","lastname":"Dawson","StatusCode":0,"Message":"Success"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "firstname", default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(rename = "lastname", default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(rename = "StatusCode")]
    pub status_code: i32,

    #[serde(rename = "Message")]
    pub message: String,
}

impl Envelope {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            first_name: None,
            last_name: None,
            status_code: STATUS_SUCCESS,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            first_name: None,
            last_name: None,
            status_code: STATUS_FAILURE,
            message: message.into(),
        }
    }

    /// Echo the submitted names (builder pattern)
    pub fn with_names(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self.last_name = Some(last_name.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_SUCCESS
    }
}
