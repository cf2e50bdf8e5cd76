//! Bearer credential source for account requests.

use std::fmt;

/// Supplies the bearer token attached to account service requests.
///
/// Implementations are consulted once per request, so a token stored or
/// cleared between two requests takes effect on the next one.
pub trait CredentialProvider: Send + Sync + fmt::Debug {
    /// Current bearer token, or `None` when signed out.
    fn bearer_token(&self) -> Option<String>;
}

/// A fixed token (or none at all).
#[derive(Clone, Default)]
pub struct StaticCredentials(Option<String>);

impl StaticCredentials {
    /// Always sends `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    /// Never sends a token.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self(None)
    }
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.0.is_some() { "<token>" } else { "<none>" };
        f.debug_tuple("StaticCredentials").field(&state).finish()
    }
}

impl CredentialProvider for StaticCredentials {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}
