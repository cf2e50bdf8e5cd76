//! Explicit credential context shared by the query client and the
//! account client.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use nolly_api::account::CredentialProvider;
use nolly_store::TokenStore;
use tokio::sync::watch;

/// Authentication state broadcast to watchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    /// Whether a bearer token is stored.
    pub authenticated: bool,
    /// Incremented on every sign-in and sign-out.
    pub epoch: u64,
}

/// Signed-in state backed by persistent token storage.
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    store: Arc<dyn TokenStore>,
    state: watch::Sender<SessionState>,
}

impl Session {
    /// Creates a session, authenticated if `store` already holds a token.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let authenticated = match store.load_token() {
            Ok(token) => token.is_some(),
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "failed to read stored token");
                false
            }
        };
        let (state, _) = watch::channel(SessionState {
            authenticated,
            epoch: 0,
        });
        Self {
            inner: Arc::new(SessionInner { store, state }),
        }
    }

    /// Reads the bearer token from storage.
    ///
    /// Storage is consulted on every call; read failures count as signed out.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        match self.inner.store.load_token() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "failed to read stored token");
                None
            }
        }
    }

    /// Whether the session is authenticated.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().authenticated
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.inner.state.borrow()
    }

    /// Persists `token` and marks the session authenticated.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be stored.
    pub fn sign_in(&self, token: &str) -> Result<()> {
        self.inner.store.save_token(token)?;
        self.inner.state.send_modify(|state| {
            state.authenticated = true;
            state.epoch = state.epoch.wrapping_add(1);
        });
        tracing::info!("signed in");
        Ok(())
    }

    /// Removes the stored token and marks the session signed out.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be removed.
    pub fn sign_out(&self) -> Result<()> {
        self.inner.store.clear_token()?;
        self.inner.state.send_modify(|state| {
            state.authenticated = false;
            state.epoch = state.epoch.wrapping_add(1);
        });
        tracing::info!("signed out");
        Ok(())
    }

    /// Receiver notified on every sign-in and sign-out.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state())
            .field("store", &self.inner.store)
            .finish()
    }
}

impl CredentialProvider for Session {
    fn bearer_token(&self) -> Option<String> {
        self.token()
    }
}
