//! Classifier client errors

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Structured failure returned by the classifier service.
///
/// The service answers validation and lookup failures with a JSON body of
/// the form `{"kind": ..., "msg": ..., "details": {...}}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiFailure {
    /// Machine-readable failure kind (e.g. `schema-violation`)
    pub kind: String,
    /// Human-readable message
    pub msg: String,
    /// Key/value pairs describing the failure; empty when the service sent none
    #[serde(default, deserialize_with = "null_as_empty")]
    pub details: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ApiFailure {
    /// Failure with no detail map
    pub fn new(kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            msg: msg.into(),
            details: Map::new(),
        }
    }

    /// Build a failure from a raw response body.
    ///
    /// Bodies that are not a classifier error document are kept verbatim in
    /// `msg` with kind `unknown`.
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<ApiFailure>(body) {
            Ok(failure) => failure,
            Err(_) => Self::new("unknown", body),
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.msg)
    }
}

/// Errors that can occur when interacting with the classifier API
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Classifier API returned a non-success status
    #[error("Classifier API error ({status}): {failure}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Parsed failure body
        failure: ApiFailure,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Token rejected with 401 or 403
    #[error("Authentication failed ({status}): {failure}")]
    Authentication {
        /// HTTP status code
        status: u16,
        /// Parsed failure body
        failure: ApiFailure,
    },

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(ApiFailure),

    /// Invalid request (e.g., unusable base URL or certificate)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClassifierError {
    /// Structured failure detail, if the service sent one
    pub fn failure(&self) -> Option<&ApiFailure> {
        match self {
            Self::Api { failure, .. }
            | Self::Authentication { failure, .. }
            | Self::NotFound(failure) => Some(failure),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_from_classifier_body() {
        let body = r#"{"kind":"schema-violation","msg":"The object(s) in your submitted request did not conform to the schema.","details":{"submitted":{"name":null}}}"#;
        let failure = ApiFailure::from_body(body);
        assert_eq!(failure.kind, "schema-violation");
        assert!(failure.msg.starts_with("The object(s)"));
        assert!(failure.details.contains_key("submitted"));
    }

    #[test]
    fn test_failure_without_details() {
        let failure = ApiFailure::from_body(r#"{"kind":"not-found","msg":"gone"}"#);
        assert_eq!(failure.kind, "not-found");
        assert!(failure.details.is_empty());
    }

    #[test]
    fn test_failure_from_plain_text_body() {
        let failure = ApiFailure::from_body("Bad Gateway");
        assert_eq!(failure.kind, "unknown");
        assert_eq!(failure.msg, "Bad Gateway");
        assert_eq!(failure.to_string(), "unknown: Bad Gateway");
    }

    #[test]
    fn test_error_exposes_failure() {
        let err = ClassifierError::Api {
            status: 422,
            failure: ApiFailure::from_body(r#"{"kind":"uniqueness-violation","msg":"dup"}"#),
        };
        assert_eq!(err.failure().map(|f| f.kind.as_str()), Some("uniqueness-violation"));
        assert!(ClassifierError::InvalidRequest("x".to_string()).failure().is_none());
    }

    #[test]
    fn test_failure_with_null_details() {
        let failure = ApiFailure::from_body(r#"{"kind":"not-found","msg":"gone","details":null}"#);
        assert_eq!(failure.kind, "not-found");
        assert_eq!(failure.msg, "gone");
        assert!(failure.details.is_empty());
    }

    #[test]
    fn test_not_found_and_authentication_expose_failure() {
        let not_found = ClassifierError::NotFound(ApiFailure::new("not-found", "gone"));
        assert_eq!(not_found.failure().map(|f| f.kind.as_str()), Some("not-found"));

        let denied = ClassifierError::Authentication {
            status: 401,
            failure: ApiFailure::new("not-authenticated", "expired"),
        };
        assert_eq!(denied.failure().map(|f| f.msg.as_str()), Some("expired"));
        assert_eq!(denied.to_string(), "Authentication failed (401): not-authenticated: expired");
    }
}
