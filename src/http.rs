/// HTTP client wrapper
///
/// Builds requests against a configured base URL, attaches the bearer token
/// when one is set, and normalizes every outcome into `ClientResult` so
/// callers never handle transport details. Expected failures are values, not
/// panics.
use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};
use parking_lot::RwLock;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Shared HTTP client with an in-memory bearer token slot
///
/// Token persistence is owned by the session layer; this type only caches the
/// access token for request signing.
pub struct HttpClient {
    base_url: String,
    client: reqwest::Client,
    token: RwLock<Option<String>>,
    default_headers: Vec<(String, String)>,
}

impl HttpClient {
    /// Create a new client against a base URL
    pub fn new(base_url: &str, api: &ApiConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&api.user_agent)
            .timeout(std::time::Duration::from_secs(api.timeout_secs))
            .build()
            .map_err(|e| ClientError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            token: RwLock::new(None),
            default_headers: Vec::new(),
        })
    }

    /// Attach headers sent with every request (e.g. a hosted-service api key)
    pub fn with_default_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.default_headers = headers;
        self
    }

    /// Replace the cached bearer token; `None` clears it
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write() = token;
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send_and_parse(self.builder(Method::GET, path)).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send_and_parse(self.builder(Method::POST, path).json(body))
            .await
    }

    /// POST with extra caller-supplied headers merged in
    pub async fn post_with_headers<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        extra: &[(&str, &str)],
    ) -> ClientResult<T> {
        let mut builder = self.builder(Method::POST, path).json(body);
        for (name, value) in extra {
            builder = builder.header(*name, *value);
        }
        self.send_and_parse(builder).await
    }

    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send_and_parse(self.builder(Method::PATCH, path).json(body))
            .await
    }

    pub async fn patch_with_headers<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        extra: &[(&str, &str)],
    ) -> ClientResult<T> {
        let mut builder = self.builder(Method::PATCH, path).json(body);
        for (name, value) in extra {
            builder = builder.header(*name, *value);
        }
        self.send_and_parse(builder).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send_and_parse(self.builder(Method::PUT, path).json(body))
            .await
    }

    /// DELETE expecting an empty (204-style) response
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.send_expect_empty(self.builder(Method::DELETE, path))
            .await
    }

    /// Upload a raw body (avatar assets), expecting an empty response
    pub async fn put_bytes(&self, path: &str, data: Vec<u8>, content_type: &str) -> ClientResult<()> {
        let builder = self
            .builder(Method::PUT, path)
            .header("Content-Type", content_type)
            .body(data);
        self.send_expect_empty(builder).await
    }

    fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.client.request(method, url);
        for (name, value) in &self.default_headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(token) = self.token.read().as_deref() {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder
    }

    async fn send_and_parse<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = builder.send().await.map_err(|e| {
            debug!("Transport failure: {}", e);
            ClientError::Network
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from_response(status.as_u16(), response).await);
        }

        response.json().await.map_err(|e| {
            debug!("Malformed response body: {}", e);
            ClientError::Network
        })
    }

    async fn send_expect_empty(&self, builder: RequestBuilder) -> ClientResult<()> {
        let response = builder.send().await.map_err(|e| {
            debug!("Transport failure: {}", e);
            ClientError::Network
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from_response(status.as_u16(), response).await);
        }
        Ok(())
    }

    /// Extract a human-readable message from a JSON error body
    async fn error_from_response(status: u16, response: reqwest::Response) -> ClientError {
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| Self::extract_message(&body))
            .unwrap_or_else(|| "Request failed".to_string());
        ClientError::from_status(status, message)
    }

    fn extract_message(body: &serde_json::Value) -> Option<String> {
        for field in ["detail", "message", "error", "error_description"] {
            if let Some(message) = body.get(field).and_then(|v| v.as_str()) {
                return Some(message.to_string());
            }
        }
        None
    }
}
