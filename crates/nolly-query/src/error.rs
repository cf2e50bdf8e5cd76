//! Query layer errors.

use std::time::Duration;

use nolly_api::ApiError;
use thiserror::Error;

/// Errors surfaced by the query client.
///
/// `Clone` because one in-flight request can have many waiters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The remote call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// No response within the client's request timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// A guard on the endpoint prevented the request.
    #[error("{endpoint} skipped: guard not satisfied")]
    Skipped {
        /// Endpoint name.
        endpoint: &'static str,
    },

    /// Two definitions share an endpoint name with different result types.
    #[error("cached value for {endpoint} has an unexpected type")]
    TypeMismatch {
        /// Endpoint name.
        endpoint: &'static str,
    },

    /// The session could not be updated (token storage failed).
    #[error("session update failed: {0}")]
    Session(String),
}

impl QueryError {
    /// Whether the request was skipped by a guard rather than failing.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    /// Underlying API error, if any.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Text to show a user: the server message verbatim, or `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.api_error()
            .map_or_else(|| String::from(fallback), |e| e.user_message(fallback))
    }
}
