//! Persistent client state.
//!
//! Uses `rusqlite` (bundled `SQLite`) to keep small key/value entries
//! between runs, most importantly the account bearer token.

mod connection;
/// Key/value access to the `client_state` table.
pub mod kv;
mod migrations;
/// Bearer token storage.
pub mod token;

#[allow(clippy::module_name_repetitions)]
pub use connection::{STORE_FILE, open_store, resolve_store_path};
pub use token::{MemoryTokenStore, SqliteTokenStore, TOKEN_KEY, TokenStore};
