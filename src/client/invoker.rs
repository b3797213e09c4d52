//! Fezz function invocation client.

use crate::client::config::{bearer, parse_header};
use crate::client::{ClientConfig, HyperTransport, Transport};
use crate::error::{ClientError, InvokeError};
use crate::http::{InvokeData, InvokeOptions, RawResponse};
use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use hyper::{HeaderMap, Method, Request, Uri};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

/// Client for invoking functions hosted behind a Fezz gateway.
///
/// Every call is a single `POST` to `<base_url>/<path>`. The default headers
/// (including the bearer credential) are the only mutable state; each
/// invocation works on a snapshot taken when it starts, so a concurrent
/// [`set_auth`](FezzClient::set_auth) only affects later calls.
pub struct FezzClient {
    /// Base URL without a trailing slash.
    base_url: String,
    /// Default headers merged into every request.
    headers: RwLock<HeaderMap>,
    /// Response header that marks a relay failure.
    relay_error_header: HeaderName,
    transport: Arc<dyn Transport>,
}

impl FezzClient {
    /// Create a client for the given base URL with no default headers.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_config(ClientConfig::new().base_url(base_url))
    }

    /// Create a client from a config using the hyper transport.
    pub fn with_config(config: ClientConfig) -> Result<Self, ClientError> {
        Self::with_transport(config, Arc::new(HyperTransport::new()))
    }

    /// Create a client that sends requests through a custom transport.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ClientError> {
        let base_url = validate_base_url(&config.base_url)?;

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let (name, value) = parse_header(name, value)?;
            headers.insert(name, value);
        }
        if let Some(token) = &config.auth {
            headers.insert(AUTHORIZATION, bearer(token)?);
        }

        let relay_error_header = HeaderName::from_bytes(config.relay_error_header.as_bytes())
            .map_err(|e| ClientError::InvalidHeader {
                name: config.relay_error_header.clone(),
                reason: e.to_string(),
            })?;

        debug!(
            "Created function client for {} ({} default headers)",
            base_url,
            headers.len()
        );

        Ok(Self {
            base_url,
            headers: RwLock::new(headers),
            relay_error_header,
            transport,
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Snapshot of the current default headers.
    pub async fn headers(&self) -> HeaderMap {
        self.headers.read().await.clone()
    }

    /// Set the bearer credential used by subsequent invocations.
    pub async fn set_auth(&self, token: &str) -> Result<(), ClientError> {
        let value = bearer(token)?;
        self.headers.write().await.insert(AUTHORIZATION, value);
        debug!("Updated function client credential");
        Ok(())
    }

    /// Invoke a function and decode its response.
    ///
    /// `path` is appended to the base URL and may carry an already encoded
    /// query string. Network, relay, HTTP and decode failures are all
    /// returned as [`InvokeError`].
    pub async fn invoke(&self, path: &str, options: InvokeOptions) -> Result<InvokeData, InvokeError> {
        let response_type = options.response_type;
        let response = self.exchange(path, options).await?;
        response_type.decode(response)
    }

    /// Invoke a function and deserialize its JSON response into `T`.
    ///
    /// The declared response type is ignored; the body is always parsed as JSON.
    pub async fn invoke_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        options: InvokeOptions,
    ) -> Result<T, InvokeError> {
        let response = self.exchange(path, options).await?;
        Ok(serde_json::from_slice(&response.body)?)
    }

    /// Send one request and return the response once it is classified as a
    /// success.
    async fn exchange(&self, path: &str, options: InvokeOptions) -> Result<RawResponse, InvokeError> {
        let defaults = self.headers.read().await.clone();
        let request = self.build_request(path, defaults, options)?;

        debug!("Invoking {} {}", request.method(), request.uri());

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                error!("Failed to invoke '{}': {}", path, e);
                return Err(InvokeError::Fetch(e));
            }
        };

        self.check_response(path, response)
    }

    /// Build the outgoing request: target URL, merged headers and body.
    fn build_request(
        &self,
        path: &str,
        mut headers: HeaderMap,
        options: InvokeOptions,
    ) -> Result<Request<Full<Bytes>>, InvokeError> {
        let url = join_url(&self.base_url, path);
        let uri: Uri = url
            .parse()
            .map_err(|e| InvokeError::Request(format!("invalid function url '{}': {}", url, e)))?;

        // Only infer a content type when neither the defaults nor the call set one.
        if let Some(body) = &options.body {
            if !headers.contains_key(CONTENT_TYPE) && !options.has_content_type() {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(body.content_type()));
            }
        }

        for (name, value) in &options.headers {
            let (name, value) =
                parse_header(name, value).map_err(|e| InvokeError::Request(e.to_string()))?;
            headers.insert(name, value);
        }

        let body = match options.body {
            Some(body) => body.into_bytes()?,
            None => Bytes::new(),
        };

        let mut request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .body(Full::new(body))
            .map_err(|e| InvokeError::Request(e.to_string()))?;
        *request.headers_mut() = headers;

        Ok(request)
    }

    /// Classify a received response. The relay header takes precedence over
    /// the status code.
    fn check_response(&self, path: &str, response: RawResponse) -> Result<RawResponse, InvokeError> {
        if self.is_relay_failure(&response) {
            warn!(
                "Relay error invoking '{}': status {}, {}: {}",
                path,
                response.status,
                self.relay_error_header,
                response.header(self.relay_error_header.as_str()).unwrap_or_default()
            );
            return Err(InvokeError::Relay(response));
        }

        if !response.status.is_success() {
            warn!("Function '{}' returned status {}", path, response.status);
            return Err(InvokeError::Http(response));
        }

        Ok(response)
    }

    /// Some gateways send the relay header on every reply and set it to
    /// `false` when the function ran, so that value counts as absent.
    fn is_relay_failure(&self, response: &RawResponse) -> bool {
        response
            .headers
            .get(&self.relay_error_header)
            .map(|value| !value.as_bytes().eq_ignore_ascii_case(b"false"))
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for FezzClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FezzClient")
            .field("base_url", &self.base_url)
            .field("relay_error_header", &self.relay_error_header)
            .finish_non_exhaustive()
    }
}

/// Check the base URL and strip its trailing slashes.
fn validate_base_url(base_url: &str) -> Result<String, ClientError> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return Err(ClientError::InvalidUrl {
            url: base_url.to_string(),
            reason: "base url is empty".to_string(),
        });
    }

    url::Url::parse(trimmed).map_err(|e| ClientError::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;

    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Append a function path to the base URL, leaving any query string as is.
fn join_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url, path.trim_start_matches('/'))
}
