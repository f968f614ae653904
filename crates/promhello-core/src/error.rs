//! Shared error type across promhello crates.

use std::net::SocketAddr;

use thiserror::Error;

/// Stable error codes surfaced in logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input: bad config value or metric definition.
    BadRequest,
    /// Unsupported config version.
    UnsupportedVersion,
    /// A listener could not be bound.
    BindFailed,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::BindFailed => "BIND_FAILED",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, PromHelloError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum PromHelloError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("failed to bind {listener} listener on {addr}: {source}")]
    Bind {
        listener: &'static str,
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("internal: {0}")]
    Internal(String),
}

impl PromHelloError {
    /// Map an error to its stable code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            PromHelloError::BadRequest(_) => ClientCode::BadRequest,
            PromHelloError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            PromHelloError::Bind { .. } => ClientCode::BindFailed,
            PromHelloError::Internal(_) => ClientCode::Internal,
        }
    }
}
