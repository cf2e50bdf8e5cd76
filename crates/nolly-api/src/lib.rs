//! API client library for nolly.
//!
//! Provides typed clients for the movie catalog API (TMDB v3) and the
//! account service that stores users and watchlists.

/// Account service client (auth, profile, watchlists).
pub mod account;

/// Movie catalog API client.
pub mod catalog;

mod error;
mod http;
mod ids;

pub use error::ApiError;
pub use ids::{GenreId, MovieId, PersonId, UserId, WatchlistId};
