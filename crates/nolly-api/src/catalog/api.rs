//! `CatalogApi` trait definition.
#![allow(clippy::future_not_send)]

use super::params::{DiscoverParams, ListParams, MovieLookup, SearchMovieParams};
use super::types::{
    CatalogItem, Credits, DetailedCatalogItem, GenreList, Paginated, Person, VideoList,
};
use crate::error::ApiError;

/// Movie catalog API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(CatalogApi: Send)]
pub trait LocalCatalogApi {
    /// Discovers movies (`discover/movie`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn discover_movies(
        &self,
        params: &DiscoverParams,
    ) -> Result<Paginated<CatalogItem>, ApiError>;

    /// Discovers TV shows (`discover/tv`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn discover_tv(&self, params: &DiscoverParams)
    -> Result<Paginated<CatalogItem>, ApiError>;

    /// Lists popular movies (`movie/popular`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn popular_movies(&self, params: &ListParams)
    -> Result<Paginated<CatalogItem>, ApiError>;

    /// Lists movies now in theatres (`movie/now_playing`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn now_playing_movies(
        &self,
        params: &ListParams,
    ) -> Result<Paginated<CatalogItem>, ApiError>;

    /// Lists upcoming movies (`movie/upcoming`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn upcoming_movies(
        &self,
        params: &ListParams,
    ) -> Result<Paginated<CatalogItem>, ApiError>;

    /// Fetches the movie genre list (`genre/movie/list`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn movie_genres(&self, language: &str) -> Result<GenreList, ApiError>;

    /// Lists popular people (`person/popular`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn popular_people(&self, params: &ListParams) -> Result<Paginated<Person>, ApiError>;

    /// Fetches movie details (`movie/{id}`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn movie_details(&self, lookup: &MovieLookup) -> Result<DetailedCatalogItem, ApiError>;

    /// Fetches cast and crew (`movie/{id}/credits`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn movie_credits(&self, lookup: &MovieLookup) -> Result<Credits, ApiError>;

    /// Fetches trailers and clips (`movie/{id}/videos`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn movie_videos(&self, lookup: &MovieLookup) -> Result<VideoList, ApiError>;

    /// Searches for movies (`search/movie`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn search_movies(
        &self,
        params: &SearchMovieParams,
    ) -> Result<Paginated<CatalogItem>, ApiError>;

    /// Waits for the next request slot.
    ///
    /// The request methods send immediately; callers pace them by awaiting
    /// this first.
    async fn wait_for_slot(&self);
}
