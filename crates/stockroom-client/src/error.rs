//! Client errors.

use crate::session::StorageError;
use stockroom_auth::AccessDenied;
use stockroom_types::{ErrorCode, FieldError};
use thiserror::Error;

/// Everything that can go wrong between a service call and its result.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Refused locally before any request was sent.
    #[error(transparent)]
    Denied(#[from] AccessDenied),

    /// The request never got a response.
    #[error("{kind} error: {message}")]
    Transport {
        /// `timeout`, `connection_refused`, `dns`, `tls` or `network`.
        kind: &'static str,
        message: String,
    },

    /// The server answered with a JSON error envelope.
    #[error("API error {status}{}: {message}", bracketed(.code))]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
        details: Vec<FieldError>,
    },

    /// The server answered with a non-2xx status and a non-JSON body.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// A 2xx body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// Input rejected before sending.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Credential store failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

fn bracketed(code: &Option<String>) -> String {
    code.as_deref().map(|c| format!(" [{c}]")).unwrap_or_default()
}

impl ClientError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// HTTP status, if the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `true` for a 401 from the server.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl ErrorCode for ClientError {
    fn code(&self) -> &'static str {
        match self {
            Self::Denied(_) => "CLIENT_DENIED",
            Self::Transport { .. } => "CLIENT_TRANSPORT",
            Self::Api { status: 401, .. } | Self::Http { status: 401, .. } => {
                "CLIENT_UNAUTHORIZED"
            }
            Self::Api { status: 403, .. } | Self::Http { status: 403, .. } => "CLIENT_FORBIDDEN",
            Self::Api { status: 404, .. } | Self::Http { status: 404, .. } => "CLIENT_NOT_FOUND",
            Self::Api { .. } => "CLIENT_API",
            Self::Http { .. } => "CLIENT_HTTP",
            Self::Decode(_) => "CLIENT_DECODE",
            Self::InvalidInput(_) => "CLIENT_INVALID_INPUT",
            Self::Storage(_) => "CLIENT_STORAGE",
            Self::Build(_) => "CLIENT_BUILD",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Denied(denied) => denied.is_recoverable(),
            Self::Transport { kind, .. } => matches!(*kind, "timeout" | "network"),
            Self::Api { status, .. } | Self::Http { status, .. } => {
                *status == 401 || *status == 429 || *status >= 500
            }
            Self::Storage(err) => err.is_recoverable(),
            Self::Decode(_) | Self::InvalidInput(_) | Self::Build(_) => false,
        }
    }
}
