//! `AccountApi` trait definition.
#![allow(clippy::future_not_send)]

use super::types::{
    AuthResponse, CreateWatchlistRequest, LoginRequest, MessageResponse, RegisterRequest, User,
    Watchlist, WatchlistMovieRequest,
};
use crate::error::ApiError;
use crate::ids::{MovieId, UserId, WatchlistId};

/// Account service API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(AccountApi: Send)]
pub trait LocalAccountApi {
    /// Registers a new user (`POST users/register`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError>;

    /// Signs in (`POST users/login`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;

    /// Profile of the signed-in user (`GET users/get-profile`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn user_profile(&self) -> Result<User, ApiError>;

    /// Any user by ID (`GET users/{id}`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn user_by_id(&self, id: &UserId) -> Result<User, ApiError>;

    /// Watchlists of the signed-in user with bare movie IDs (`GET watchlist`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn watchlists(&self) -> Result<Vec<Watchlist>, ApiError>;

    /// Watchlists with timestamped entries (`GET watchlist/with-movies`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn watchlists_with_movies(&self) -> Result<Vec<Watchlist>, ApiError>;

    /// One watchlist (`GET watchlist/{id}`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn watchlist_by_id(&self, id: &WatchlistId) -> Result<Watchlist, ApiError>;

    /// Movie IDs of one watchlist (`GET watchlist/movies/{id}`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn movies_in_watchlist(&self, id: &WatchlistId) -> Result<Vec<MovieId>, ApiError>;

    /// Creates a watchlist (`POST watchlist/create`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn create_watchlist(
        &self,
        request: &CreateWatchlistRequest,
    ) -> Result<Watchlist, ApiError>;

    /// Adds a movie (`POST watchlist/add-movie`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn add_to_watchlist(
        &self,
        request: &WatchlistMovieRequest,
    ) -> Result<MessageResponse, ApiError>;

    /// Removes a movie (`POST watchlist/remove-movie`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn remove_from_watchlist(
        &self,
        request: &WatchlistMovieRequest,
    ) -> Result<MessageResponse, ApiError>;

    /// Renames a watchlist (`PUT watchlist/update-name/{id}`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn update_watchlist_name(
        &self,
        id: &WatchlistId,
        name: &str,
    ) -> Result<Watchlist, ApiError>;

    /// Deletes a watchlist (`DELETE watchlist/delete/{id}`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn delete_watchlist(&self, id: &WatchlistId) -> Result<MessageResponse, ApiError>;
}
