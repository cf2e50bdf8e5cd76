//! Store connection management.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations::run_migrations;

/// File name of the store database.
pub const STORE_FILE: &str = "nolly.db";

/// Opens (or creates) the store and runs migrations.
///
/// - If `dir` is `Some`, uses `{dir}/nolly.db`.
/// - Otherwise uses `~/.local/share/nolly/nolly.db`.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or migrations fail.
pub fn open_store(dir: Option<&Path>) -> Result<Connection> {
    let db_path = resolve_store_path(dir)?;

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let conn = Connection::open(&db_path)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;

    run_migrations(&conn).context("database migration failed")?;
    tracing::debug!(path = %db_path.display(), "store opened");

    Ok(conn)
}

/// Resolves the store file path.
///
/// # Errors
///
/// Returns an error if `dir` is `None` and `HOME` is not set.
pub fn resolve_store_path(dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(STORE_FILE));
    }

    let home = std::env::var("HOME").context("HOME environment variable is not set")?;
    Ok(PathBuf::from(home)
        .join(".local")
        .join("share")
        .join("nolly")
        .join(STORE_FILE))
}
