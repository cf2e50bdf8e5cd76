//! Key/value operations on `client_state`.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};

/// Reads the value stored under `key`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM client_state WHERE key = ?1",
        [key],
        |row| row.get(0),
    )
    .optional()
    .with_context(|| format!("failed to read client_state key {key}"))
}

/// Stores `value` under `key`, replacing any previous value.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn set_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO client_state (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')",
        [key, value],
    )
    .with_context(|| format!("failed to write client_state key {key}"))?;
    Ok(())
}

/// Removes `key`. Returns whether a value was present.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn remove_value(conn: &Connection, key: &str) -> Result<bool> {
    let removed = conn
        .execute("DELETE FROM client_state WHERE key = ?1", [key])
        .with_context(|| format!("failed to delete client_state key {key}"))?;
    Ok(removed > 0)
}
