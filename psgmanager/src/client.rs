//! HTTP client for the signage manager API
//!
//! This module provides the authenticated client the agent uses to talk
//! to the central signage manager: playlist fetch, asset info resolution
//! and heartbeat submission.
//!
//! # Example
//!
//! ```no_run
//! use psgmanager::ManagerClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ManagerClient::builder()
//!         .base_url("https://manager.example.com")
//!         .api_key("secret")
//!         .screen_id("tv-1")
//!         .build()?;
//!
//!     let items = client.playlist().await?;
//!     println!("{} items scheduled", items.len());
//!
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use crate::models::{AssetInfo, Heartbeat, HeartbeatAck, PlaylistResponse};
use psgplaylist::PlaylistItem;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default manager base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default timeout for API requests (10 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = "PMOSignage/0.1.0 (psgmanager)";

/// Header carrying the screen's API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Authenticated signage manager client
///
/// The client is stateless: it holds connection parameters and performs
/// one request per call. Change detection, caching and retry policy all
/// live in higher layers; a failed call here is simply reported and the
/// caller tries again on its next cycle.
#[derive(Debug, Clone)]
pub struct ManagerClient {
    client: Client,
    base_url: String,
    api_key: String,
    screen_id: String,
    timeout: Duration,
}

impl ManagerClient {
    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the screen identifier this client reports as
    pub fn screen_id(&self) -> &str {
        &self.screen_id
    }

    /// Get the internal HTTP client
    ///
    /// Useful for sharing the connection pool with other components.
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    // ========================================================================
    // Playlist
    // ========================================================================

    /// Fetch the ordered playlist assigned to this screen.
    ///
    /// Returns the `items` sequence of the playlist envelope. Any network
    /// error, non-2xx status, empty body or malformed JSON surfaces as an
    /// [`Error`]; the caller keeps its current playlist in that case.
    pub async fn playlist(&self) -> Result<Vec<PlaylistItem>> {
        let url = format!(
            "{}/api/screens/{}/playlist",
            self.base_url, self.screen_id
        );
        let response: PlaylistResponse = self.get_json(&url).await?;
        Ok(response.items)
    }

    // ========================================================================
    // Assets
    // ========================================================================

    /// Resolve an asset identifier to its download URL and filename.
    ///
    /// The returned `url` is always absolute: manager deployments that
    /// serve assets themselves answer with a server-relative path, which
    /// is joined onto the base URL here.
    pub async fn asset_info(&self, asset_id: &str) -> Result<AssetInfo> {
        let url = format!("{}/api/assets/{}", self.base_url, asset_id);
        let mut info: AssetInfo = self.get_json(&url).await?;
        info.url = self.resolve_url(&info.url)?;
        Ok(info)
    }

    /// Make a URL absolute against the manager base URL.
    ///
    /// Absolute URLs pass through untouched.
    pub fn resolve_url(&self, url: &str) -> Result<String> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return Ok(url.to_string());
        }
        let base = Url::parse(&self.base_url)?;
        Ok(base.join(url)?.to_string())
    }

    // ========================================================================
    // Heartbeat
    // ========================================================================

    /// Submit a liveness/status report for this screen.
    pub async fn send_heartbeat(&self, heartbeat: &Heartbeat) -> Result<HeartbeatAck> {
        let url = format!(
            "{}/api/screens/{}/heartbeat",
            self.base_url, self.screen_id
        );
        debug!(%url, asset = ?heartbeat.current_asset, "Submitting heartbeat");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(self.timeout)
            .json(heartbeat)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::api_error(format!(
                "{} returned status {}",
                url,
                response.status()
            )));
        }

        Ok(response.json().await.unwrap_or_default())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Authenticated GET returning a deserialized JSON body.
    ///
    /// Empty bodies are rejected explicitly: some manager deployments
    /// answer provisioning gaps with `200` and no content, which must not
    /// be mistaken for an empty playlist.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(%url, "Fetching");

        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::api_error(format!(
                "{} returned status {}",
                url,
                response.status()
            )));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(Error::EmptyBody(url.to_string()));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Builder for configuring a ManagerClient
#[derive(Debug)]
pub struct ClientBuilder {
    client: Option<Client>,
    base_url: String,
    api_key: String,
    screen_id: String,
    timeout: Duration,
    user_agent: String,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            screen_id: String::new(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom HTTP client
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the manager base URL (trailing slash is stripped)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the API key sent with every request
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    /// Set the screen identifier
    pub fn screen_id(mut self, id: impl Into<String>) -> Self {
        self.screen_id = id.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ManagerClient> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .user_agent(&self.user_agent)
                .timeout(self.timeout)
                .build()?,
        };

        Ok(ManagerClient {
            client,
            base_url: self.base_url,
            api_key: self.api_key,
            screen_id: self.screen_id,
            timeout: self.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;
    use axum::routing::{get, post};
    use axum::{Json, Router};

    fn test_client(base_url: &str) -> ManagerClient {
        ManagerClient::builder()
            .base_url(base_url)
            .api_key("test-key")
            .screen_id("tv-1")
            .build()
            .unwrap()
    }

    /// Bind a throwaway router on a loopback port and return its base URL.
    async fn spawn_manager(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    // ========================================================================
    // Unit tests (no sockets)
    // ========================================================================

    #[test]
    fn test_builder_defaults() {
        let builder = ClientBuilder::default();
        assert_eq!(builder.base_url, DEFAULT_BASE_URL);
        assert_eq!(
            builder.timeout,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = test_client("http://manager.local:3000/");
        assert_eq!(client.base_url(), "http://manager.local:3000");
    }

    #[test]
    fn test_resolve_url() {
        let client = test_client("http://manager.local:3000");

        assert_eq!(
            client
                .resolve_url("/api/assets/welcome-img/download")
                .unwrap(),
            "http://manager.local:3000/api/assets/welcome-img/download"
        );
        assert_eq!(
            client
                .resolve_url("https://blob.example.com/welcome.jpg")
                .unwrap(),
            "https://blob.example.com/welcome.jpg"
        );
    }

    // ========================================================================
    // Loopback integration tests
    // ========================================================================

    #[tokio::test]
    async fn test_playlist_fetch_sends_api_key() {
        let router = Router::new().route(
            "/api/screens/tv-1/playlist",
            get(|headers: HeaderMap| async move {
                assert_eq!(headers.get(API_KEY_HEADER).unwrap(), "test-key");
                Json(serde_json::json!({
                    "screenId": "tv-1",
                    "items": [
                        { "assetId": "welcome-img", "duration": 10, "type": "image" }
                    ]
                }))
            }),
        );
        let base = spawn_manager(router).await;

        let items = test_client(&base).playlist().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].asset_id, "welcome-img");
    }

    #[tokio::test]
    async fn test_non_2xx_is_api_error() {
        let router = Router::new().route(
            "/api/screens/tv-1/playlist",
            get(|| async { (axum::http::StatusCode::UNAUTHORIZED, "nope") }),
        );
        let base = spawn_manager(router).await;

        match test_client(&base).playlist().await {
            Err(Error::ApiError(_)) => {}
            other => panic!("Expected ApiError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_body_is_soft_failure() {
        let router = Router::new().route("/api/screens/tv-1/playlist", get(|| async { "" }));
        let base = spawn_manager(router).await;

        match test_client(&base).playlist().await {
            Err(Error::EmptyBody(_)) => {}
            other => panic!("Expected EmptyBody, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_soft_failure() {
        let router =
            Router::new().route("/api/screens/tv-1/playlist", get(|| async { "not json" }));
        let base = spawn_manager(router).await;

        assert!(matches!(
            test_client(&base).playlist().await,
            Err(Error::Json(_))
        ));
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        // Nothing listens on port 9; the request must fail without panicking.
        let client = test_client("http://127.0.0.1:9");
        assert!(matches!(client.playlist().await, Err(Error::Http(_))));
    }

    #[tokio::test]
    async fn test_asset_info_resolves_relative_url() {
        let router = Router::new().route(
            "/api/assets/welcome-img",
            get(|| async {
                Json(serde_json::json!({
                    "assetId": "welcome-img",
                    "filename": "welcome.jpg",
                    "type": "image",
                    "url": "/api/assets/welcome-img/download",
                    "size": 1024000
                }))
            }),
        );
        let base = spawn_manager(router).await;

        let info = test_client(&base)
            .asset_info("welcome-img")
            .await
            .unwrap();
        assert_eq!(info.url, format!("{}/api/assets/welcome-img/download", base));
    }

    #[tokio::test]
    async fn test_heartbeat_roundtrip() {
        let router = Router::new().route(
            "/api/screens/tv-1/heartbeat",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["status"], "online");
                assert_eq!(body["uptime"], 42);
                Json(serde_json::json!({ "success": true, "message": "Heartbeat received" }))
            }),
        );
        let base = spawn_manager(router).await;

        let ack = test_client(&base)
            .send_heartbeat(&Heartbeat::online(None, 42, None))
            .await
            .unwrap();
        assert!(ack.success);
        assert_eq!(ack.message, "Heartbeat received");
    }
}
