//! Error types surfaced at the graph operation boundary.

use async_graphql::{Error, ErrorExtensions};
use thiserror::Error;

use crate::framework::BackendError;
use crate::identity::IdentityError;

/// Errors a graph operation can end with.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A backend call failed. Reported with the backend's own message, never retried.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The caller's input was rejected before any backend call was made.
    #[error("malformed operation: {0}")]
    MalformedOperation(String),
}

impl From<IdentityError> for GatewayError {
    fn from(e: IdentityError) -> Self {
        GatewayError::MalformedOperation(e.to_string())
    }
}

impl GatewayError {
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Backend(BackendError::InvalidRequest { .. }) => "MALFORMED_OPERATION",
            GatewayError::Backend(_) => "BACKEND_ERROR",
            GatewayError::MalformedOperation(_) => "MALFORMED_OPERATION",
        }
    }
}

impl ErrorExtensions for GatewayError {
    fn extend(&self) -> Error {
        Error::new(self.to_string()).extend_with(|_, ext| {
            ext.set("code", self.code());
            if let GatewayError::Backend(backend) = self {
                if let Some(status) = backend.http_status() {
                    ext.set("status", status.as_u16());
                }
            }
        })
    }
}

/// Converts an adapter failure into the operation's error result.
pub(crate) fn backend_failure(e: BackendError) -> Error {
    GatewayError::Backend(e).extend()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql::Value;
    use reqwest::StatusCode;

    #[test]
    fn test_backend_error_keeps_message_and_status() {
        let err = backend_failure(BackendError::status("trainee", StatusCode::NOT_FOUND, "no such trainee"));

        assert_eq!(err.message, "trainee backend answered 404 Not Found: no such trainee");
        let ext = err.extensions.unwrap();
        assert_eq!(ext.get("code"), Some(&Value::from("BACKEND_ERROR")));
        assert_eq!(ext.get("status"), Some(&Value::from(404)));
    }

    #[test]
    fn test_unsendable_request_is_malformed_operation() {
        let err = GatewayError::from(BackendError::InvalidRequest {
            resource: "trainee",
            reason: "\"..\" is not a resource path segment".into(),
        });
        assert_eq!(err.code(), "MALFORMED_OPERATION");
        assert!(err.extend().extensions.unwrap().get("status").is_none());
    }

    #[test]
    fn test_identity_error_is_malformed_operation() {
        let err = GatewayError::from(IdentityError::NotAString("1".into()));
        assert_eq!(err.code(), "MALFORMED_OPERATION");
        assert!(err.extend().message.starts_with("malformed operation"));
    }
}
