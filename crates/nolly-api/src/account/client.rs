//! `AccountClient` - account service client implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::api::AccountApi;
use super::credentials::CredentialProvider;
use super::types::{
    AuthResponse, CreateWatchlistRequest, LoginRequest, MessageResponse, MovieIdsEnvelope,
    RegisterRequest, RenameWatchlistBody, User, UserEnvelope, Watchlist, WatchlistEntry,
    WatchlistEnvelope, WatchlistMovieRequest, WatchlistsEnvelope,
};
use crate::error::ApiError;
use crate::http::send_json;
use crate::ids::{MovieId, UserId, WatchlistId};

/// Default base URL for the account service.
pub const DEFAULT_BASE_URL: &str = "https://nolly-watch-backend.vercel.app/api/";

/// Service label used in errors and logs.
const SERVICE: &str = "account";

/// Account service client.
///
/// The bearer token is read from the credential provider for every request.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct AccountClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Token source.
    credentials: Arc<dyn CredentialProvider>,
}

/// Builder for `AccountClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct AccountClientBuilder {
    base_url: Option<Url>,
    user_agent: Option<String>,
    credentials: Option<Arc<dyn CredentialProvider>>,
}

impl AccountClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            user_agent: None,
            credentials: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the token source (required).
    #[must_use]
    pub fn credentials(mut self, credentials: Arc<dyn CredentialProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `user_agent` is not set.
    /// - `credentials` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<AccountClient> {
        let user_agent = self.user_agent.context("user_agent is required")?;
        let credentials = self.credentials.context("credentials are required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            Url::parse(DEFAULT_BASE_URL).context("invalid default base URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(AccountClient {
            http_client,
            base_url,
            credentials,
        })
    }
}

impl AccountClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> AccountClientBuilder {
        AccountClientBuilder::new()
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    fn endpoint_url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ApiError::InvalidRequest(format!("base URL {} cannot take a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Prepares a request, attaching the current bearer token if there is one.
    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint_url(segments)?;
        let request = self.http_client.request(method, url);
        Ok(match self.credentials.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    #[instrument(skip_all, fields(path = %segments.join("/")))]
    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let request = self.request(Method::GET, segments)?;
        send_json(&self.http_client, SERVICE, &segments.join("/"), request).await
    }

    #[instrument(skip_all, fields(method = %method, path = %segments.join("/")))]
    async fn send_body<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(method, segments)?.json(body);
        send_json(&self.http_client, SERVICE, &segments.join("/"), request).await
    }
}

impl AccountApi for AccountClient {
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.send_body(Method::POST, &["users", "register"], request)
            .await
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.send_body(Method::POST, &["users", "login"], request).await
    }

    async fn user_profile(&self) -> Result<User, ApiError> {
        let envelope: UserEnvelope = self.get_json(&["users", "get-profile"]).await?;
        Ok(envelope.user)
    }

    async fn user_by_id(&self, id: &UserId) -> Result<User, ApiError> {
        let envelope: UserEnvelope = self.get_json(&["users", id.0.as_str()]).await?;
        Ok(envelope.user)
    }

    async fn watchlists(&self) -> Result<Vec<Watchlist>, ApiError> {
        let envelope: WatchlistsEnvelope<MovieId> = self.get_json(&["watchlist"]).await?;
        Ok(envelope
            .watchlists
            .into_iter()
            .map(|record| record.into_watchlist())
            .collect())
    }

    async fn watchlists_with_movies(&self) -> Result<Vec<Watchlist>, ApiError> {
        let envelope: WatchlistsEnvelope<WatchlistEntry> =
            self.get_json(&["watchlist", "with-movies"]).await?;
        Ok(envelope
            .watchlists
            .into_iter()
            .map(|record| record.into_watchlist())
            .collect())
    }

    async fn watchlist_by_id(&self, id: &WatchlistId) -> Result<Watchlist, ApiError> {
        let envelope: WatchlistEnvelope = self.get_json(&["watchlist", id.0.as_str()]).await?;
        Ok(envelope.watchlist.into_watchlist())
    }

    async fn movies_in_watchlist(&self, id: &WatchlistId) -> Result<Vec<MovieId>, ApiError> {
        let envelope: MovieIdsEnvelope = self
            .get_json(&["watchlist", "movies", id.0.as_str()])
            .await?;
        Ok(envelope.movies)
    }

    async fn create_watchlist(
        &self,
        request: &CreateWatchlistRequest,
    ) -> Result<Watchlist, ApiError> {
        let envelope: WatchlistEnvelope = self
            .send_body(Method::POST, &["watchlist", "create"], request)
            .await?;
        Ok(envelope.watchlist.into_watchlist())
    }

    async fn add_to_watchlist(
        &self,
        request: &WatchlistMovieRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.send_body(Method::POST, &["watchlist", "add-movie"], request)
            .await
    }

    async fn remove_from_watchlist(
        &self,
        request: &WatchlistMovieRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.send_body(Method::POST, &["watchlist", "remove-movie"], request)
            .await
    }

    async fn update_watchlist_name(
        &self,
        id: &WatchlistId,
        name: &str,
    ) -> Result<Watchlist, ApiError> {
        let body = RenameWatchlistBody { name };
        let envelope: WatchlistEnvelope = self
            .send_body(Method::PUT, &["watchlist", "update-name", id.0.as_str()], &body)
            .await?;
        Ok(envelope.watchlist.into_watchlist())
    }

    async fn delete_watchlist(&self, id: &WatchlistId) -> Result<MessageResponse, ApiError> {
        let segments = ["watchlist", "delete", id.0.as_str()];
        let request = self.request(Method::DELETE, &segments)?;
        send_json(&self.http_client, SERVICE, &segments.join("/"), request).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::account::StaticCredentials;
    use crate::account::WatchlistMovies;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(mock_server: &MockServer, credentials: StaticCredentials) -> AccountClient {
        let base_url = format!("{}/api/", mock_server.uri());
        AccountClient::builder()
            .base_url(base_url.parse().unwrap())
            .user_agent("test/0.0.0")
            .credentials(Arc::new(credentials))
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_credentials() {
        // Arrange & Act
        let result = AccountClient::builder().user_agent("test/0.0.0").build();

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("credentials are required")
        );
    }

    #[tokio::test]
    async fn test_profile_sends_bearer_token() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/account/user_profile.json");

        Mock::given(method("GET"))
            .and(path("/api/users/get-profile"))
            .and(header("Authorization", "Bearer abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, StaticCredentials::new("abc123"));

        // Act
        let user = client.user_profile().await.unwrap();

        // Assert
        assert_eq!(user.username, "chioma");
    }

    #[tokio::test]
    async fn test_anonymous_request_has_no_authorization_header() {
        // Arrange
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/users/get-profile"))
            .respond_with(ResponseTemplate::new(401).set_body_string(
                r#"{"success":false,"message":"Not authorized, no token"}"#,
            ))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, StaticCredentials::anonymous());

        // Act
        let err = client.user_profile().await.unwrap_err();

        // Assert
        let requests = mock_server.received_requests().await.unwrap();
        assert!(
            requests
                .iter()
                .all(|r| !r.headers.contains_key("authorization"))
        );
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.user_message("Login failed"), "Not authorized, no token");
    }

    #[tokio::test]
    async fn test_login_posts_credentials() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/account/auth_login.json");

        Mock::given(method("POST"))
            .and(path("/api/users/login"))
            .and(body_json(serde_json::json!({
                "email": "chioma@example.com",
                "password": "hunter2"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, StaticCredentials::anonymous());
        let request = LoginRequest {
            email: String::from("chioma@example.com"),
            password: String::from("hunter2"),
        };

        // Act
        let response = client.login(&request).await.unwrap();

        // Assert
        assert!(response.success);
        assert_eq!(response.token, "eyJhbGciOiJIUzI1NiJ9.test.signature");
    }

    #[tokio::test]
    async fn test_watchlists_with_movies_are_timestamped() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/account/watchlists_with_movies.json");

        Mock::given(method("GET"))
            .and(path("/api/watchlist/with-movies"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, StaticCredentials::new("abc123"));

        // Act
        let lists = client.watchlists_with_movies().await.unwrap();

        // Assert
        assert_eq!(lists.len(), 2);
        assert!(
            lists
                .iter()
                .all(|l| matches!(l.movies, WatchlistMovies::Timestamped(_)))
        );
    }

    #[tokio::test]
    async fn test_add_to_missing_watchlist_is_status_error() {
        // Arrange
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/watchlist/add-movie"))
            .and(body_json(serde_json::json!({"watchlistId": "missing", "movieId": 7})))
            .respond_with(ResponseTemplate::new(404).set_body_string(
                r#"{"success":false,"message":"Watchlist not found"}"#,
            ))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, StaticCredentials::new("abc123"));
        let request = WatchlistMovieRequest {
            watchlist_id: WatchlistId::from("missing"),
            movie_id: MovieId(7),
        };

        // Act
        let err = client.add_to_watchlist(&request).await.unwrap_err();

        // Assert
        assert!(err.is_not_found());
        assert_eq!(err.server_message(), Some("Watchlist not found"));
    }

    #[tokio::test]
    async fn test_rename_uses_put_with_name_body() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/account/watchlist_single.json");

        Mock::given(method("PUT"))
            .and(path("/api/watchlist/update-name/66b0aa11c2d3e4f5a6b7c8d9"))
            .and(body_json(serde_json::json!({"name": "Weekend picks"})))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, StaticCredentials::new("abc123"));

        // Act
        let list = client
            .update_watchlist_name(&WatchlistId::from("66b0aa11c2d3e4f5a6b7c8d9"), "Weekend picks")
            .await
            .unwrap();

        // Assert
        assert_eq!(list.name, "Weekend picks");
        assert!(matches!(list.movies, WatchlistMovies::Ids(_)));
    }

    #[tokio::test]
    async fn test_delete_watchlist() {
        // Arrange
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/watchlist/delete/wl-9"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"message":"Watchlist deleted successfully"}"#),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, StaticCredentials::new("abc123"));

        // Act
        let response = client
            .delete_watchlist(&WatchlistId::from("wl-9"))
            .await
            .unwrap();

        // Assert
        assert_eq!(response.message, "Watchlist deleted successfully");
    }

    #[tokio::test]
    async fn test_ids_are_sent_as_single_escaped_segments() {
        // Arrange
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/watchlist/movies/a%2Fb%3Fc"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"movies":[550]}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, StaticCredentials::new("abc123"));

        // Act
        let movies = client
            .movies_in_watchlist(&WatchlistId::from("a/b?c"))
            .await
            .unwrap();

        // Assert
        assert_eq!(movies, vec![MovieId(550)]);
    }

    #[test]
    fn test_endpoint_url_keeps_base_path() {
        // Arrange
        let client = AccountClient::builder()
            .base_url("http://localhost:9/api/".parse().unwrap())
            .user_agent("test/0.0.0")
            .credentials(Arc::new(StaticCredentials::new("abc123")))
            .build()
            .unwrap();

        // Act
        let url = client.endpoint_url(&["users", "get-profile"]).unwrap();

        // Assert
        assert_eq!(url.as_str(), "http://localhost:9/api/users/get-profile");
    }
}
