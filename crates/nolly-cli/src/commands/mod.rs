//! Subcommand implementations.
//!
//! Results are written through `tracing` at `info`, like every other
//! message the binary prints.

pub mod account;
pub mod catalog;
pub mod settings;

use nolly_query::QueryError;

/// Message shown when a command needs a signed-in session.
pub const NOT_SIGNED_IN: &str = "not signed in; run `nolly auth login` first";

/// Converts a query error into the message shown to the user.
///
/// The server's own message is used verbatim when present.
pub fn failure(err: &QueryError, fallback: &str) -> anyhow::Error {
    if err.is_skipped() {
        return anyhow::anyhow!(NOT_SIGNED_IN);
    }
    tracing::debug!(error = %err, "command failed");
    anyhow::anyhow!(err.user_message(fallback))
}

/// Formats an optional value, `-` when absent.
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| String::from("-"), |v| v.to_string())
}
