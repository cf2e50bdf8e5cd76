//! Cache tags linking mutations to the queries they make stale.

use std::fmt;

/// Tag carried by cached query results and named by mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTag {
    /// The signed-in user and user lookups.
    User,
    /// Watchlists and their contents.
    Watchlist,
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("User"),
            Self::Watchlist => f.write_str("Watchlist"),
        }
    }
}
