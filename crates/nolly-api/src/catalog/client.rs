//! `CatalogClient` - movie catalog API client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::api::CatalogApi;
use super::params::{DiscoverParams, ListParams, MovieLookup, SearchMovieParams};
use super::rate_limiter::CatalogRateLimiter;
use super::types::{
    CatalogItem, Credits, DetailedCatalogItem, GenreList, Paginated, Person, VideoList,
};
use crate::error::ApiError;
use crate::http::send_json;

/// Default base URL for the catalog API (TMDB v3).
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Service label used in errors and logs.
const SERVICE: &str = "catalog";

/// Movie catalog API client.
///
/// Every request carries the static bearer token given at build time.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Bearer API token.
    access_token: String,
    /// Rate limiter.
    rate_limiter: Arc<CatalogRateLimiter>,
}

/// Builder for `CatalogClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogClientBuilder {
    base_url: Option<Url>,
    access_token: Option<String>,
    user_agent: Option<String>,
    min_interval: Option<Duration>,
}

impl CatalogClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            access_token: None,
            user_agent: None,
            min_interval: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token (required).
    #[must_use]
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `access_token` is not set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<CatalogClient> {
        let access_token = self.access_token.context("access_token is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            Url::parse(DEFAULT_BASE_URL).context("invalid default base URL")?
        };

        let rate_limiter = self
            .min_interval
            .map_or_else(CatalogRateLimiter::default_interval, CatalogRateLimiter::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(CatalogClient {
            http_client,
            base_url,
            access_token,
            rate_limiter: Arc::new(rate_limiter),
        })
    }
}

impl CatalogClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> CatalogClientBuilder {
        CatalogClientBuilder::new()
    }

    /// Sends a GET request with bearer auth and query params.
    #[instrument(skip_all, fields(path = %path))]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| ApiError::InvalidRequest(format!("failed to join URL path {path}: {e}")))?;

        let request = self
            .http_client
            .get(url)
            .bearer_auth(&self.access_token)
            .query(query);

        send_json(&self.http_client, SERVICE, path, request).await
    }
}

impl CatalogApi for CatalogClient {
    async fn discover_movies(
        &self,
        params: &DiscoverParams,
    ) -> Result<Paginated<CatalogItem>, ApiError> {
        self.get_json("discover/movie", &params.query_pairs()).await
    }

    async fn discover_tv(
        &self,
        params: &DiscoverParams,
    ) -> Result<Paginated<CatalogItem>, ApiError> {
        // `include_video` only applies to movies.
        let query: Vec<(&str, String)> = params
            .query_pairs()
            .into_iter()
            .filter(|(key, _)| *key != "include_video")
            .collect();
        self.get_json("discover/tv", &query).await
    }

    async fn popular_movies(
        &self,
        params: &ListParams,
    ) -> Result<Paginated<CatalogItem>, ApiError> {
        self.get_json("movie/popular", &params.query_pairs()).await
    }

    async fn now_playing_movies(
        &self,
        params: &ListParams,
    ) -> Result<Paginated<CatalogItem>, ApiError> {
        self.get_json("movie/now_playing", &params.query_pairs())
            .await
    }

    async fn upcoming_movies(
        &self,
        params: &ListParams,
    ) -> Result<Paginated<CatalogItem>, ApiError> {
        self.get_json("movie/upcoming", &params.query_pairs()).await
    }

    async fn movie_genres(&self, language: &str) -> Result<GenreList, ApiError> {
        let query = [("language", String::from(language))];
        self.get_json("genre/movie/list", &query).await
    }

    async fn popular_people(&self, params: &ListParams) -> Result<Paginated<Person>, ApiError> {
        self.get_json("person/popular", &params.query_pairs()).await
    }

    async fn movie_details(&self, lookup: &MovieLookup) -> Result<DetailedCatalogItem, ApiError> {
        let path = format!("movie/{}", lookup.id);
        let query = [("language", lookup.language.clone())];
        self.get_json(&path, &query).await
    }

    async fn movie_credits(&self, lookup: &MovieLookup) -> Result<Credits, ApiError> {
        let path = format!("movie/{}/credits", lookup.id);
        let query = [("language", lookup.language.clone())];
        self.get_json(&path, &query).await
    }

    async fn movie_videos(&self, lookup: &MovieLookup) -> Result<VideoList, ApiError> {
        let path = format!("movie/{}/videos", lookup.id);
        let query = [("language", lookup.language.clone())];
        self.get_json(&path, &query).await
    }

    async fn search_movies(
        &self,
        params: &SearchMovieParams,
    ) -> Result<Paginated<CatalogItem>, ApiError> {
        self.get_json("search/movie", &params.query_pairs()).await
    }

    async fn wait_for_slot(&self) {
        self.rate_limiter.wait().await;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;
    use crate::ids::MovieId;
    use crate::catalog::types::CatalogErrorResponse;

    async fn client_for(mock_server: &wiremock::MockServer) -> CatalogClient {
        let base_url = format!("{}/3/", mock_server.uri());
        CatalogClient::builder()
            .base_url(base_url.parse().unwrap())
            .access_token("test-token")
            .user_agent("test/0.0.0")
            .min_interval(Duration::from_millis(0))
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_access_token() {
        // Arrange & Act
        let result = CatalogClient::builder().user_agent("test/0.0.0").build();

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("access_token is required")
        );
    }

    #[test]
    fn test_builder_requires_user_agent() {
        // Arrange & Act
        let result = CatalogClient::builder().access_token("test-token").build();

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("user_agent is required")
        );
    }

    #[test]
    fn test_builder_defaults_to_public_base_url() {
        // Arrange & Act
        let client = CatalogClient::builder()
            .access_token("test-token")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url.as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_parse_popular_movies_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/catalog/movie_popular_page1.json");

        // Act
        let response: Paginated<CatalogItem> = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(response.page, 1);
        assert!(response.has_next());
        assert_eq!(response.results[0].id, MovieId(533_535));
        assert_eq!(response.results[0].title, "Deadpool & Wolverine");
    }

    #[test]
    fn test_parse_movie_details_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/catalog/movie_details_533535.json");

        // Act
        let details: DetailedCatalogItem = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(details.id, MovieId(533_535));
        assert_eq!(details.runtime, Some(128));
        assert_eq!(details.genres.len(), 2);
        assert_eq!(details.imdb_id.as_deref(), Some("tt6263850"));
    }

    #[test]
    fn test_parse_error_response() {
        // Arrange
        let json = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        // Act
        let error: CatalogErrorResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(error.status_code, 7);
        assert!(!error.success);
        assert!(error.status_message.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_popular_movies_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/catalog/movie_popular_page1.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/movie/popular"))
            .and(wiremock::matchers::header("Authorization", "Bearer test-token"))
            .and(wiremock::matchers::query_param("page", "1"))
            .and(wiremock::matchers::query_param("language", "en-US"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;

        // Act
        let response = client.popular_movies(&ListParams::page(1)).await.unwrap();

        // Assert
        assert_eq!(response.results.len(), 3);
    }

    #[tokio::test]
    async fn test_discover_tv_omits_include_video() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/catalog/discover_tv_page1.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/discover/tv"))
            .and(wiremock::matchers::query_param("sort_by", "popularity.desc"))
            .and(wiremock::matchers::query_param_is_missing("include_video"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;

        // Act
        let response = client.discover_tv(&DiscoverParams::page(1)).await.unwrap();

        // Assert
        assert_eq!(response.results[0].title, "House of the Dragon");
    }

    #[tokio::test]
    async fn test_movie_credits_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/catalog/movie_credits_533535.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/movie/533535/credits"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;

        // Act
        let credits = client
            .movie_credits(&MovieLookup::new(MovieId(533_535)))
            .await
            .unwrap();

        // Assert
        assert_eq!(credits.cast[0].name, "Ryan Reynolds");
        assert_eq!(credits.crew_with_job("Director").count(), 1);
    }

    #[tokio::test]
    async fn test_search_movies_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/catalog/search_movie_dune.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/search/movie"))
            .and(wiremock::matchers::query_param("query", "dune"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;

        // Act
        let response = client
            .search_movies(&SearchMovieParams::new("dune"))
            .await
            .unwrap();

        // Assert
        assert_eq!(response.total_results, 2);
        assert_eq!(response.results[0].release_year(), Some("2021"));
    }

    #[tokio::test]
    async fn test_error_status_carries_status_message() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/movie/1"))
            .respond_with(wiremock::ResponseTemplate::new(404).set_body_string(
                r#"{"status_code":34,"status_message":"The resource you requested could not be found.","success":false}"#,
            ))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;

        // Act
        let err = client
            .movie_details(&MovieLookup::new(MovieId(1)))
            .await
            .unwrap_err();

        // Assert
        assert!(err.is_not_found());
        assert_eq!(
            err.server_message(),
            Some("The resource you requested could not be found.")
        );
    }

    #[tokio::test]
    async fn test_invalid_body_is_decode_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/genre/movie/list"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;

        // Act
        let err = client.movie_genres("en-US").await.unwrap_err();

        // Assert
        assert!(matches!(err, ApiError::Decode { .. }));
    }
}
