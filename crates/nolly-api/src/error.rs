//! Error type shared by the catalog and account clients.

use serde::Deserialize;
use thiserror::Error;

/// Errors returned by remote API calls.
///
/// `Clone` so that one failed request can be handed to every caller
/// waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response was received (connection, DNS, TLS, ...).
    #[error("{service} request failed: {reason}")]
    Transport {
        /// Service name (`catalog` or `account`).
        service: &'static str,
        /// Transport error description.
        reason: String,
    },

    /// The server answered with a non-2xx status.
    #[error("{service} API error (HTTP {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        /// Service name (`catalog` or `account`).
        service: &'static str,
        /// HTTP status code.
        status: u16,
        /// Message provided by the server, if any.
        message: Option<String>,
    },

    /// The response body could not be decoded.
    #[error("failed to decode {endpoint} response: {reason}")]
    Decode {
        /// Endpoint path.
        endpoint: String,
        /// Decoder error description.
        reason: String,
    },

    /// The request could not be built (bad path, bad URL).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Error body shapes used by the two services.
///
/// The account service replies `{success, message}`; the catalog replies
/// `{status_code, status_message, success}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status_message: Option<String>,
}

impl ApiError {
    /// Builds a `Status` error from a non-2xx response body.
    pub(crate) fn from_status(service: &'static str, status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message.or(b.status_message))
            .filter(|m| !m.trim().is_empty());
        Self::Status {
            service,
            status,
            message,
        }
    }

    /// HTTP status code, if the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message provided by the server, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Text to show a user: the server message verbatim, or `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message()
            .map_or_else(|| String::from(fallback), String::from)
    }

    /// Whether the server reported 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
