//! Account service client and types.

mod api;
mod client;
mod credentials;
mod types;

pub use api::{AccountApi, LocalAccountApi};
pub use client::{AccountClient, AccountClientBuilder, DEFAULT_BASE_URL};
pub use credentials::{CredentialProvider, StaticCredentials};
pub use types::{
    AuthResponse, CreateWatchlistRequest, LoginRequest, MessageResponse, RegisterRequest, User,
    Watchlist, WatchlistEntry, WatchlistMovieRequest, WatchlistMovies,
};
