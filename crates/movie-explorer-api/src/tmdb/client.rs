//! `TmdbClient` - TMDB API client implementation.

use anyhow::{Context, Result};
use reqwest::Client;
use reqwest::header::ACCEPT;
use tracing::instrument;
use url::Url;

use super::api::TmdbApi;
use super::endpoint::Endpoint;
use super::error::TmdbError;
use super::types::{MoviePage, ServiceConfig, TmdbErrorResponse};

/// Default base URL for TMDB API v3.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default response language.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Bearer API token (without the `Bearer ` prefix).
    api_token: String,
    /// Response language sent with every list request.
    language: String,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    user_agent: Option<String>,
    language: Option<String>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            user_agent: None,
            language: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token (required).
    ///
    /// A token already carrying a `Bearer ` prefix is accepted as-is.
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the response language (default: "en-US").
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_token` is not set or blank.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let raw_token = self.api_token.context("api_token is required")?;
        let api_token = normalize_token(&raw_token);
        anyhow::ensure!(!api_token.is_empty(), "api_token must not be empty");
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_token,
            language: self
                .language
                .unwrap_or_else(|| String::from(DEFAULT_LANGUAGE)),
        })
    }
}

/// Strips a leading `Bearer ` scheme so the header is never double-prefixed.
fn normalize_token(token: &str) -> String {
    let trimmed = token.trim();
    let bare = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))
        .unwrap_or(trimmed);
    String::from(bare.trim())
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Returns the base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the configured response language.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Resolves `path` against the base URL.
    fn join(&self, path: &str) -> Result<Url, TmdbError> {
        self.base_url.join(path).map_err(|source| TmdbError::Url {
            path: String::from(path),
            source,
        })
    }

    /// Sends a GET request with Bearer auth, appending `query` to `url`,
    /// and decodes the JSON body. `path` labels errors and logs.
    #[instrument(skip_all)]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TmdbError> {
        let request = self
            .http_client
            .get(url)
            .header(ACCEPT, "application/json")
            .bearer_auth(&self.api_token)
            .query(query)
            .build()
            .map_err(TmdbError::Network)?;

        tracing::debug!(url = %request.url(), "TMDB API request");

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(TmdbError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            let message = if let Ok(error_response) =
                serde_json::from_str::<TmdbErrorResponse>(&body)
            {
                Some(error_response.status_message)
            } else {
                None
            };
            tracing::debug!(%status, path, "TMDB API error response");
            return Err(TmdbError::Http { status, message });
        }

        let body = response.text().await.map_err(TmdbError::Network)?;
        serde_json::from_str(&body).map_err(|source| TmdbError::Decode {
            path: String::from(path),
            source,
        })
    }
}

impl TmdbApi for TmdbClient {
    #[instrument(skip_all)]
    async fn configuration(&self) -> Result<ServiceConfig, TmdbError> {
        let url = self.join("configuration")?;
        self.get_json(url, "configuration", &[]).await
    }

    #[instrument(skip_all, fields(endpoint = %endpoint, page = page))]
    async fn movie_page(&self, endpoint: &Endpoint, page: u32) -> Result<MoviePage, TmdbError> {
        let path = endpoint.path();
        let url = endpoint
            .template_url(&self.base_url, &self.language)
            .map_err(|source| TmdbError::Url {
                path: String::from(path),
                source,
            })?;
        self.get_json(url, path, &[("page", page.to_string())]).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;
    use crate::tmdb::SortKey;

    fn client_for(mock_server: &wiremock::MockServer, token: &str) -> TmdbClient {
        let base_url = format!("{}/3/", mock_server.uri());
        TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_token(token)
            .user_agent("test/0.0.0")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_api_token() {
        // Arrange & Act
        let result = TmdbClient::builder().user_agent("test/0.0.0").build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("api_token is required")
        );
    }

    #[test]
    fn test_builder_rejects_blank_token() {
        // Arrange & Act
        let result = TmdbClient::builder()
            .api_token("   ")
            .user_agent("test/0.0.0")
            .build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("api_token must not be empty")
        );
    }

    #[test]
    fn test_builder_requires_user_agent() {
        // Arrange & Act
        let result = TmdbClient::builder().api_token("test-token").build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("user_agent is required")
        );
    }

    #[test]
    fn test_builder_defaults() {
        // Arrange & Act
        let client = TmdbClient::builder()
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url().as_str(), DEFAULT_BASE_URL);
        assert_eq!(client.language(), "en-US");
    }

    #[test]
    fn test_builder_with_custom_base_url() {
        // Arrange
        let custom_url = Url::parse("http://localhost:8080/3/").unwrap();

        // Act
        let client = TmdbClient::builder()
            .base_url(custom_url.clone())
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url, custom_url);
    }

    #[test]
    fn test_normalize_token() {
        // Arrange & Act & Assert
        assert_eq!(normalize_token("abc"), "abc");
        assert_eq!(normalize_token("Bearer abc"), "abc");
        assert_eq!(normalize_token("  bearer abc \n"), "abc");
    }

    #[test]
    fn test_parse_error_response() {
        // Arrange
        let json = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        // Act
        let error: TmdbErrorResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(error.status_code, 7);
        assert!(!error.success);
        assert!(error.status_message.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_configuration_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/configuration.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/configuration"))
            .and(wiremock::matchers::header("Accept", "application/json"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "test-token");

        // Act
        let config = client.configuration().await.unwrap();

        // Assert
        assert_eq!(config.images.base_url, "http://image.tmdb.org/t/p/");
        assert_eq!(config.images.poster_sizes.len(), 7);
    }

    #[tokio::test]
    async fn test_search_page_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/search_movie_batman.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/search/movie"))
            .and(wiremock::matchers::query_param("query", "batman"))
            .and(wiremock::matchers::query_param("include_adult", "false"))
            .and(wiremock::matchers::query_param("language", "en-US"))
            .and(wiremock::matchers::query_param("page", "2"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "test-token");
        let endpoint = Endpoint::derive("batman", None);

        // Act
        let page = client.movie_page(&endpoint, 2).await.unwrap();

        // Assert
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].title, "Batman");
        assert_eq!(page.total_pages, 3);
    }

    #[tokio::test]
    async fn test_movie_page_appends_page_to_template_query() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/search_movie_batman.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/search/movie"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "test-token");
        let endpoint = Endpoint::derive("batman", None);

        // Act
        client.movie_page(&endpoint, 2).await.unwrap();

        // Assert
        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url.query(),
            Some("query=batman&include_adult=false&language=en-US&page=2")
        );
    }

    #[tokio::test]
    async fn test_popular_page_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/movie_popular.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/movie/popular"))
            .and(wiremock::matchers::query_param("language", "en-US"))
            .and(wiremock::matchers::query_param("page", "1"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "test-token");

        // Act
        let page = client.movie_page(&Endpoint::Popular, 1).await.unwrap();

        // Assert
        assert_eq!(page.results.len(), 3);
        assert_eq!(page.results[0].title, "Inside Out 2");
    }

    #[tokio::test]
    async fn test_discover_page_sends_sort() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/movie_popular.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/discover/movie"))
            .and(wiremock::matchers::query_param("sort_by", "vote_average.desc"))
            .and(wiremock::matchers::query_param("include_video", "false"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "test-token");
        let endpoint = Endpoint::derive("", Some(SortKey::RatingDesc));

        // Act
        let page = client.movie_page(&endpoint, 1).await.unwrap();

        // Assert
        assert!(!page.results.is_empty());
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/search_movie_empty.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::header(
                "Authorization",
                "Bearer my-secret-token",
            ))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(2)
            .mount(&mock_server)
            .await;

        let plain = client_for(&mock_server, "my-secret-token");
        let prefixed = client_for(&mock_server, "Bearer my-secret-token");

        // Act & Assert (mock expect(2) verifies Authorization header is not double-prefixed)
        plain.movie_page(&Endpoint::Popular, 1).await.unwrap();
        prefixed.movie_page(&Endpoint::Popular, 1).await.unwrap();
    }

    #[tokio::test]
    async fn test_http_error_returns_status() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let error_body = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(401).set_body_string(error_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "invalid-token");

        // Act
        let result = client.movie_page(&Endpoint::Popular, 1).await;

        // Assert
        let err = result.unwrap_err();
        assert_eq!(err.status(), Some(reqwest::StatusCode::UNAUTHORIZED));
        let text = err.to_string();
        assert!(text.contains("401"));
        assert!(text.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_http_error_is_not_retried() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(429).set_body_string("slow down"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "test-token");

        // Act
        let result = client.configuration().await;

        // Assert
        let err = result.unwrap_err();
        assert_eq!(err.status(), Some(reqwest::StatusCode::TOO_MANY_REQUESTS));
        assert_eq!(err.to_string(), "HTTP status: 429. Check API key");
    }

    #[tokio::test]
    async fn test_invalid_json_returns_decode_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "test-token");

        // Act
        let result = client.movie_page(&Endpoint::Popular, 1).await;

        // Assert
        let err = result.unwrap_err();
        assert!(matches!(err, TmdbError::Decode { .. }));
        assert!(err.to_string().contains("movie/popular"));
    }

    #[tokio::test]
    async fn test_unreachable_server_returns_network_error() {
        // Arrange
        let client = TmdbClient::builder()
            .base_url(Url::parse("http://127.0.0.1:9/3/").unwrap())
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Act
        let result = client.configuration().await;

        // Assert
        let err = result.unwrap_err();
        assert!(matches!(err, TmdbError::Network(_)));
        assert!(err.to_string().starts_with("network error"));
    }
}
