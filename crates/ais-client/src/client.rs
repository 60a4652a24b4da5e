//! AIS HTTP client implementation

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{AisClientError, Result};
use crate::models::{AisMessage, CombinedMessage};
use crate::response::StreamResponse;
use crate::streaming::{Framing, StreamMessage};
use crate::types::*;

/// Live AIS API client
///
/// Streaming methods return a [`StreamResponse`] once the server has accepted
/// the request; call [`StreamResponse::open`] to start decoding. The
/// `latest_*` methods read and decode the whole body at once.
#[derive(Debug, Clone)]
pub struct AisClient {
    client: Client,
    base_url: Url,
    config: ClientConfig,
}

impl AisClient {
    /// Create a new client with default settings
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the API (e.g., "https://live.ais.barentswatch.no")
    pub fn new(base_url: &str) -> Result<Self> {
        Self::from_config(ClientConfig::with_api_base(base_url))
    }

    /// Create a new client that sends a bearer token with every request
    pub fn with_bearer_token(base_url: &str, token: &str) -> Result<Self> {
        Self::from_config(ClientConfig {
            token: Some(token.to_string()),
            ..ClientConfig::with_api_base(base_url)
        })
    }

    /// Create a new client from a full configuration
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| AisClientError::ConfigError(format!("Invalid auth token: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        // No overall timeout: streaming bodies stay open indefinitely.
        // Plain requests get `timeouts.request` individually.
        let client = Client::builder()
            .connect_timeout(config.timeouts.connect())
            .default_headers(headers)
            .build()?;

        let base_url = Url::parse(&config.api_base)?;

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get the active configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get a reference to the underlying HTTP client.
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    /// Full URL of an endpoint path
    ///
    /// Paths are appended to the base URL, so a base with a path prefix keeps it.
    pub fn endpoint_url(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}{}", base, path))?)
    }

    // =========================================================================
    // Position-class streams
    // =========================================================================

    /// Stream all position-class messages, one JSON object per line
    #[instrument(skip(self))]
    pub async fn get_ais(&self) -> Result<StreamResponse<AisMessage>> {
        let path = &self.config.endpoints.ais;
        self.open_stream(Method::GET, path, Framing::PlainObject, None::<&()>)
            .await
    }

    /// Stream filtered position-class messages, one JSON object per line
    #[instrument(skip(self, filter))]
    pub async fn post_ais(&self, filter: &FilterInput) -> Result<StreamResponse<AisMessage>> {
        let path = &self.config.endpoints.ais;
        self.open_stream(Method::POST, path, Framing::PlainObject, Some(filter))
            .await
    }

    /// Stream all position-class messages as Server-Sent Events
    #[instrument(skip(self))]
    pub async fn get_sse_ais(&self) -> Result<StreamResponse<AisMessage>> {
        let path = &self.config.endpoints.sse_ais;
        self.open_stream(Method::GET, path, Framing::EventStream, None::<&()>)
            .await
    }

    /// Stream filtered position-class messages as Server-Sent Events
    #[instrument(skip(self, filter))]
    pub async fn post_sse_ais(&self, filter: &FilterInput) -> Result<StreamResponse<AisMessage>> {
        let path = &self.config.endpoints.sse_ais;
        self.open_stream(Method::POST, path, Framing::EventStream, Some(filter))
            .await
    }

    // =========================================================================
    // Combined streams
    // =========================================================================

    /// Stream all combined messages, one JSON object per line
    #[instrument(skip(self))]
    pub async fn get_combined(&self) -> Result<StreamResponse<CombinedMessage>> {
        let path = &self.config.endpoints.combined;
        self.open_stream(Method::GET, path, Framing::PlainObject, None::<&()>)
            .await
    }

    /// Stream filtered combined messages, one JSON object per line
    #[instrument(skip(self, filter))]
    pub async fn post_combined(
        &self,
        filter: &CombinedFilterInput,
    ) -> Result<StreamResponse<CombinedMessage>> {
        let path = &self.config.endpoints.combined;
        self.open_stream(Method::POST, path, Framing::PlainObject, Some(filter))
            .await
    }

    /// Stream all combined messages as Server-Sent Events
    #[instrument(skip(self))]
    pub async fn get_sse_combined(&self) -> Result<StreamResponse<CombinedMessage>> {
        let path = &self.config.endpoints.sse_combined;
        self.open_stream(Method::GET, path, Framing::EventStream, None::<&()>)
            .await
    }

    /// Stream filtered combined messages as Server-Sent Events
    #[instrument(skip(self, filter))]
    pub async fn post_sse_combined(
        &self,
        filter: &CombinedFilterInput,
    ) -> Result<StreamResponse<CombinedMessage>> {
        let path = &self.config.endpoints.sse_combined;
        self.open_stream(Method::POST, path, Framing::EventStream, Some(filter))
            .await
    }

    // =========================================================================
    // Snapshot Operations
    // =========================================================================

    /// Latest position-class message per vessel
    #[instrument(skip(self))]
    pub async fn latest_ais(&self, since: Option<DateTime<Utc>>) -> Result<Vec<AisMessage>> {
        let url = self.since_url(&self.config.endpoints.latest_ais, since)?;
        let response = self.plain(Method::GET, url).send().await?;
        self.handle_response(response).await
    }

    /// Latest position-class message per vessel matching `filter`
    #[instrument(skip(self, filter))]
    pub async fn post_latest_ais(&self, filter: &LatestAisFilterInput) -> Result<Vec<AisMessage>> {
        let url = self.endpoint_url(&self.config.endpoints.latest_ais)?;
        let response = self.plain(Method::POST, url).json(filter).send().await?;
        self.handle_response(response).await
    }

    /// Latest combined message per vessel
    #[instrument(skip(self))]
    pub async fn latest_combined(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<CombinedMessage>> {
        let url = self.since_url(&self.config.endpoints.latest_combined, since)?;
        let response = self.plain(Method::GET, url).send().await?;
        self.handle_response(response).await
    }

    /// Area covered by the open AIS data set
    #[instrument(skip(self))]
    pub async fn open_ais_area(&self) -> Result<Geometry> {
        let url = self.endpoint_url(&self.config.endpoints.open_ais_area)?;
        let response = self.plain(Method::GET, url).send().await?;
        self.handle_response(response).await
    }

    // =========================================================================
    // Helper Methods
    // =========================================================================

    async fn open_stream<M, B>(
        &self,
        method: Method,
        path: &str,
        framing: Framing,
        body: Option<&B>,
    ) -> Result<StreamResponse<M>>
    where
        M: StreamMessage,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint_url(path)?;
        debug!("Opening {} stream: {} {}", framing, method, url);

        let mut request = self
            .client
            .request(method, url)
            .header(ACCEPT, framing.accept());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(self.extract_error(response).await);
        }

        Ok(StreamResponse::new(
            response,
            framing,
            self.config.stream.max_frame_len,
            self.config.timeouts.stream(),
        ))
    }

    fn plain(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(ACCEPT, "application/json")
            .timeout(self.config.timeouts.request())
    }

    fn since_url(&self, path: &str, since: Option<DateTime<Utc>>) -> Result<Url> {
        let mut url = self.endpoint_url(path)?;
        if let Some(since) = since {
            url.query_pairs_mut()
                .append_pair("since", &since.to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        Ok(url)
    }

    /// Handle response, extracting error if not successful
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if response.status().is_success() {
            let bytes = response.bytes().await?;
            serde_json::from_slice(&bytes).map_err(|e| AisClientError::ParseError(e.to_string()))
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Extract error from failed response
    async fn extract_error(&self, response: reqwest::Response) -> AisClientError {
        let status = response.status().as_u16();
        // The problem document is undocumented upstream; tolerate anything
        let problem = match response.bytes().await {
            Ok(body) => serde_json::from_slice::<ApiProblem>(&body).ok(),
            Err(_) => None,
        };
        debug!("Request failed with HTTP {}", status);
        AisClientError::api(status, problem)
    }
}
