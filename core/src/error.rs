//! Error types for the PAPI version client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers routinely distinguish
//! a missing property or version from other failures. Every other
//! non-success status lands in `Api` with the decoded problem document.

use serde::{Deserialize, Serialize};

use crate::validate::ValidationErrors;

/// Errors returned by `PapiClient`, `Session` and transports.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Required request parameters are missing.
    #[error("struct validation: {0}")]
    Validation(#[from] ValidationErrors),

    /// The request could not be sent or the response could not be read.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server returned 404; the problem document names the missing resource.
    #[error("resource not found: {0}")]
    NotFound(ProblemDetails),

    /// The server returned a non-success status other than 404.
    #[error("API error: {status}: {problem}")]
    Api { status: u16, problem: ProblemDetails },

    /// The version link of a create response does not end in a version number.
    #[error("invalid location: {0}")]
    InvalidLocation(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

/// RFC 7807 problem document as returned by PAPI on failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub detail: String,
    pub instance: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ProblemDetails>,
}

impl ProblemDetails {
    /// Decode an error body, keeping the raw text when it is not a problem document.
    pub fn from_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ProblemDetails>(body) {
            Ok(mut problem) => {
                if problem.status == 0 {
                    problem.status = status;
                }
                problem
            }
            Err(_) => ProblemDetails {
                title: "Failed to unmarshal error body".to_string(),
                detail: body.to_string(),
                status,
                ..Default::default()
            },
        }
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.title.is_empty(), self.detail.is_empty()) {
            (false, false) => write!(f, "{}: {}", self.title, self.detail),
            (false, true) => f.write_str(&self.title),
            (true, false) => f.write_str(&self.detail),
            (true, true) => write!(f, "status {}", self.status),
        }
    }
}
