//! # Identity Propagation
//!
//! Every graph operation gets exactly one [`OperationContext`], built from the credential the
//! caller supplied on the transport:
//!
//! - **HTTP**: the `Authorization` header of the request ([`OperationContext::from_headers`]).
//! - **WebSocket subscriptions**: the `connection_init` payload, read once when the connection is
//!   established ([`OperationContext::from_connection_params`]).
//!
//! The credential is opaque. It is never parsed, validated or rewritten; adapters copy its bytes
//! onto outgoing backend requests unchanged. The context is immutable once built and is not
//! shared between operations.

use std::fmt;

use http::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;
use thiserror::Error;

/// Keys accepted in a WebSocket `connection_init` payload.
const CONNECTION_PARAM_KEYS: [&str; 2] = ["Authorization", "authorization"];

/// Errors raised while extracting a credential from a transport.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum IdentityError {
    /// The connection payload carried a credential that is not a string.
    #[error("credential in connection payload must be a string, got {0}")]
    NotAString(String),

    /// The credential contains bytes that cannot travel in an HTTP header.
    #[error("credential is not a valid header value: {0}")]
    InvalidHeaderValue(String),
}

/// The caller-supplied credential, kept as the exact header bytes it arrived as.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(HeaderValue);

impl Credential {
    /// Wraps a credential taken from a WebSocket payload or a test fixture.
    pub fn parse(raw: &str) -> Result<Self, IdentityError> {
        HeaderValue::from_str(raw)
            .map(Self)
            .map_err(|e| IdentityError::InvalidHeaderValue(e.to_string()))
    }

    pub fn header_value(&self) -> &HeaderValue {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl From<HeaderValue> for Credential {
    fn from(value: HeaderValue) -> Self {
        Self(value)
    }
}

// Credentials never show up in logs or panics.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Per-operation, read-only bundle carrying the forwarded caller credential.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationContext {
    credential: Option<Credential>,
}

/// Context used when an operation arrives without one attached.
pub static ANONYMOUS: OperationContext = OperationContext::anonymous();

impl OperationContext {
    pub const fn anonymous() -> Self {
        Self { credential: None }
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            credential: Some(credential),
        }
    }

    /// Builds the context for an HTTP graph request.
    ///
    /// A missing header yields an anonymous context. When the header repeats, the first value
    /// wins.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            credential: headers.get(AUTHORIZATION).cloned().map(Credential),
        }
    }

    /// Builds the context for a subscription connection from its `connection_init` payload.
    ///
    /// Returns `Ok(None)` when the payload has no credential at all, so the caller can fall back
    /// to the upgrade request's headers.
    pub fn from_connection_params(params: &Value) -> Result<Option<Self>, IdentityError> {
        let Some(raw) = CONNECTION_PARAM_KEYS
            .iter()
            .find_map(|key| params.get(*key))
        else {
            return Ok(None);
        };

        match raw {
            Value::Null => Ok(None),
            Value::String(token) => Credential::parse(token).map(|c| Some(Self::with_credential(c))),
            other => Err(IdentityError::NotAString(other.to_string())),
        }
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }
}
