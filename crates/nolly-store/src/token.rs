//! Bearer token persistence.

use std::fmt;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use rusqlite::Connection;

use super::connection::open_store;
use super::kv::{get_value, remove_value, set_value};

/// Fixed key the bearer token is stored under.
pub const TOKEN_KEY: &str = "token";

/// Storage for the account bearer token.
///
/// Reads are expected on every account request, so implementations must
/// not cache a value that could go stale.
pub trait TokenStore: Send + Sync + fmt::Debug {
    /// Reads the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn load_token(&self) -> Result<Option<String>>;

    /// Stores `token`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn save_token(&self, token: &str) -> Result<()>;

    /// Removes the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn clear_token(&self) -> Result<()>;
}

/// Token store backed by the `client_state` table.
pub struct SqliteTokenStore {
    conn: Mutex<Connection>,
}

impl SqliteTokenStore {
    /// Opens the store file (see [`open_store`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(dir: Option<&Path>) -> Result<Self> {
        Ok(Self::from_connection(open_store(dir)?))
    }

    /// Wraps an already migrated connection.
    #[must_use]
    pub const fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for SqliteTokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteTokenStore").finish_non_exhaustive()
    }
}

impl TokenStore for SqliteTokenStore {
    fn load_token(&self) -> Result<Option<String>> {
        get_value(&self.conn(), TOKEN_KEY)
    }

    fn save_token(&self, token: &str) -> Result<()> {
        set_value(&self.conn(), TOKEN_KEY, token)?;
        tracing::debug!("bearer token stored");
        Ok(())
    }

    fn clear_token(&self) -> Result<()> {
        if remove_value(&self.conn(), TOKEN_KEY)? {
            tracing::debug!("bearer token cleared");
        }
        Ok(())
    }
}

/// In-process token store, for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for MemoryTokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let present = self.slot().is_some();
        f.debug_struct("MemoryTokenStore")
            .field("has_token", &present)
            .finish()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load_token(&self) -> Result<Option<String>> {
        Ok(self.slot().clone())
    }

    fn save_token(&self, token: &str) -> Result<()> {
        *self.slot() = Some(String::from(token));
        Ok(())
    }

    fn clear_token(&self) -> Result<()> {
        *self.slot() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_sqlite_token_survives_reopen() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteTokenStore::open(Some(dir.path())).unwrap();

        // Act
        store.save_token("abc123").unwrap();
        drop(store);
        let reopened = SqliteTokenStore::open(Some(dir.path())).unwrap();

        // Assert
        assert_eq!(reopened.load_token().unwrap().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_sqlite_clear_token() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteTokenStore::open(Some(dir.path())).unwrap();
        store.save_token("abc123").unwrap();

        // Act
        store.clear_token().unwrap();
        store.clear_token().unwrap();

        // Assert
        assert_eq!(store.load_token().unwrap(), None);
    }

    #[test]
    fn test_memory_store_round_trip() {
        // Arrange
        let store = MemoryTokenStore::new();

        // Act
        store.save_token("t1").unwrap();
        let loaded = store.load_token().unwrap();
        store.clear_token().unwrap();

        // Assert
        assert_eq!(loaded.as_deref(), Some("t1"));
        assert_eq!(store.load_token().unwrap(), None);
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        // Arrange
        let store = MemoryTokenStore::with_token("secret-token");

        // Act
        let rendered = format!("{store:?}");

        // Assert
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("has_token: true"));
    }
}
