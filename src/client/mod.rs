//! HTTP helpers for the users API with consistent error handling. The typed
//! endpoint wrappers in [`users`] build on [`ApiClient::request`] to avoid
//! duplicating request setup. Diagnostic logging is emitted for every request
//! and its outcome but never alters control flow.

pub mod error;
pub mod users;

pub use error::ClientError;
pub use users::UserRecord;

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE},
    Client, Method,
};
use serde_json::Value;
use tracing::{debug, info_span, Instrument};
use url::Url;

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// Development base address; production deployments pass an explicit base or
/// an empty one for same-origin paths.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

/// Environment variable consulted by [`ApiClient::from_env`].
pub const BASE_URL_ENV: &str = "GRIDFOLIO_API_URL";

fn error_message(json_response: &Value) -> Option<&str> {
    json_response.get("error").and_then(Value::as_str)
}

/// Thin JSON client over the users API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for the given base address. An empty base means paths
    /// are used as-is (same-origin deployments behind a proxy).
    /// # Errors
    /// Returns an error if the base address is not a valid URL or the
    /// underlying HTTP client cannot be constructed.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        if !base_url.is_empty() {
            Url::parse(&base_url)
                .map_err(|err| ClientError::Validation(format!("Invalid base URL: {err}")))?;
        }

        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .map_err(|err| ClientError::Network(format!("network error: {err}")))?;

        Ok(Self { http, base_url })
    }

    /// Build a client from `GRIDFOLIO_API_URL`, resolved once at startup,
    /// falling back to the development base address.
    /// # Errors
    /// Returns an error if the configured base address is invalid.
    pub fn from_env() -> Result<Self, ClientError> {
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(&base_url)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, path: &str) -> String {
        let path = path.trim();

        if self.base_url.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    /// Issue a request and normalize the outcome: 2xx parses as JSON, non-2xx
    /// becomes [`ClientError::Http`] preferring the server's `error` field
    /// over the generic `HTTP error! status: <code>` message.
    /// # Errors
    /// Returns an error on transport failure, a non-success status, or an
    /// unparseable success body.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        headers: &[(String, String)],
    ) -> Result<Value, ClientError> {
        let url = self.endpoint_url(path);

        // Caller-supplied headers win on conflicting keys.
        let mut header_map = HeaderMap::new();
        header_map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|err| {
                ClientError::Validation(format!("Invalid header name {name}: {err}"))
            })?;
            let value = HeaderValue::from_str(value).map_err(|err| {
                ClientError::Validation(format!("Invalid header value for {name}: {err}"))
            })?;
            header_map.insert(name, value);
        }

        let mut builder = self.http.request(method.clone(), &url).headers(header_map);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let span = info_span!(
            "api.request",
            http.method = %method,
            url = %url
        );
        let response = builder
            .send()
            .instrument(span)
            .await
            .map_err(|err| ClientError::Network(format!("network error: {err}")))?;

        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<Value>()
                .await
                .ok()
                .as_ref()
                .and_then(error_message)
                .map_or_else(
                    || format!("HTTP error! status: {}", status.as_u16()),
                    ToString::to_string,
                );

            debug!("{} {} failed: {}", method, url, message);

            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|err| ClientError::Parse(format!("Failed to read response: {err}")))?;

        debug!("{} {} -> {}", method, url, status);

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body)
            .map_err(|err| ClientError::Parse(format!("Failed to decode response: {err}")))
    }

    /// GET a path and parse the JSON response.
    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn get(&self, path: &str) -> Result<Value, ClientError> {
        self.request(Method::GET, path, None, &[]).await
    }

    /// POST a JSON body and parse the JSON response.
    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, ClientError> {
        self.request(Method::POST, path, Some(body), &[]).await
    }

    /// PUT a JSON body and parse the JSON response.
    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn put(&self, path: &str, body: &Value) -> Result<Value, ClientError> {
        self.request(Method::PUT, path, Some(body), &[]).await
    }

    /// DELETE a path and parse the JSON response.
    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn delete(&self, path: &str) -> Result<Value, ClientError> {
        self.request(Method::DELETE, path, None, &[]).await
    }
}
