//! Account service request and response types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{MovieId, UserId, WatchlistId};

// --- Users ---

/// A registered user, as mirrored from the account service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID.
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Full name.
    pub full_name: String,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Profile picture URL.
    #[serde(default)]
    pub profile_picture: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Response from `users/register` and `users/login`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    /// Success flag.
    #[serde(default)]
    pub success: bool,
    /// Server message.
    #[serde(default)]
    pub message: String,
    /// Authenticated user.
    pub user: User,
    /// Bearer token for subsequent requests.
    pub token: String,
}

impl fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResponse")
            .field("success", &self.success)
            .field("message", &self.message)
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Body for `users/register`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Full name.
    pub full_name: String,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("full_name", &self.full_name)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body for `users/login`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LoginRequest {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

// --- Watchlists ---

/// A watchlist owned by the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Watchlist {
    /// Watchlist ID.
    pub id: WatchlistId,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Owning user.
    pub owner: UserId,
    /// Movies in the list. The shape depends on the endpoint that produced it.
    pub movies: WatchlistMovies,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Movie list of a [`Watchlist`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum WatchlistMovies {
    /// Bare movie IDs (`watchlist`, `watchlist/{id}`).
    Ids(Vec<MovieId>),
    /// Movie IDs with the time they were added (`watchlist/with-movies`).
    Timestamped(Vec<WatchlistEntry>),
}

impl WatchlistMovies {
    /// Movie IDs in list order, regardless of shape.
    #[must_use]
    pub fn movie_ids(&self) -> Vec<MovieId> {
        match self {
            Self::Ids(ids) => ids.clone(),
            Self::Timestamped(entries) => entries.iter().map(|e| e.movie_id).collect(),
        }
    }

    /// Number of movies.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Ids(ids) => ids.len(),
            Self::Timestamped(entries) => entries.len(),
        }
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `movie_id` is in the list.
    #[must_use]
    pub fn contains(&self, movie_id: MovieId) -> bool {
        match self {
            Self::Ids(ids) => ids.contains(&movie_id),
            Self::Timestamped(entries) => entries.iter().any(|e| e.movie_id == movie_id),
        }
    }
}

/// A movie in a watchlist together with the time it was added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    /// Movie ID.
    pub movie_id: MovieId,
    /// When the movie was added.
    pub added_at: DateTime<Utc>,
}

/// Wire form of a watchlist, generic over the movie element shape.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WatchlistRecord<M> {
    #[serde(rename = "_id")]
    id: WatchlistId,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default = "Vec::new")]
    movies: Vec<M>,
    user: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<M> WatchlistRecord<M> {
    fn build(self, wrap: impl FnOnce(Vec<M>) -> WatchlistMovies) -> Watchlist {
        Watchlist {
            id: self.id,
            name: self.name,
            description: self.description,
            owner: self.user,
            movies: wrap(self.movies),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl WatchlistRecord<MovieId> {
    pub(crate) fn into_watchlist(self) -> Watchlist {
        self.build(WatchlistMovies::Ids)
    }
}

impl WatchlistRecord<WatchlistEntry> {
    pub(crate) fn into_watchlist(self) -> Watchlist {
        self.build(WatchlistMovies::Timestamped)
    }
}

/// Body for `watchlist/create`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CreateWatchlistRequest {
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body for `watchlist/add-movie` and `watchlist/remove-movie`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistMovieRequest {
    /// Target watchlist.
    pub watchlist_id: WatchlistId,
    /// Movie to add or remove.
    pub movie_id: MovieId,
}

/// Body for `watchlist/update-name/{id}`.
#[derive(Debug, Serialize)]
pub(crate) struct RenameWatchlistBody<'a> {
    pub(crate) name: &'a str,
}

/// Plain `{message}` acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Server message.
    #[serde(default)]
    pub message: String,
}

// --- Envelopes ---

#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    pub(crate) user: User,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WatchlistsEnvelope<M> {
    #[serde(default = "Vec::new")]
    pub(crate) watchlists: Vec<WatchlistRecord<M>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WatchlistEnvelope {
    pub(crate) watchlist: WatchlistRecord<MovieId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MovieIdsEnvelope {
    #[serde(default)]
    pub(crate) movies: Vec<MovieId>,
}
