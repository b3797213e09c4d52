//! Invocation client configuration.

use crate::error::ClientError;
use hyper::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response header the gateway sets when it could not run the function.
pub const DEFAULT_RELAY_ERROR_HEADER: &str = "x-relay-error";

/// Configuration for a [`FezzClient`](crate::FezzClient).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the function gateway.
    pub base_url: String,
    /// Default headers sent with every invocation.
    pub headers: BTreeMap<String, String>,
    /// Bearer credential sent as the `Authorization` header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,
    /// Response header that marks a relay failure.
    pub relay_error_header: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            headers: BTreeMap::new(),
            auth: None,
            relay_error_header: DEFAULT_RELAY_ERROR_HEADER.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the config from `FEZZ_URL`, `FEZZ_AUTH` and
    /// `FEZZ_RELAY_ERROR_HEADER`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the config through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new();
        if let Some(url) = lookup("FEZZ_URL") {
            config.base_url = url;
        }
        config.auth = lookup("FEZZ_AUTH").filter(|token| !token.is_empty());
        if let Some(header) = lookup("FEZZ_RELAY_ERROR_HEADER") {
            config.relay_error_header = header;
        }
        config
    }

    /// Set the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Add a default header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the bearer credential.
    pub fn auth(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(token.into());
        self
    }

    /// Set the name of the relay failure header.
    pub fn relay_error_header(mut self, name: impl Into<String>) -> Self {
        self.relay_error_header = name.into();
        self
    }
}

/// Validate a header pair. Names are normalized to lowercase.
pub(crate) fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), ClientError> {
    let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| ClientError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    let header_value = HeaderValue::from_str(value).map_err(|e| ClientError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    Ok((header_name, header_value))
}

/// Build a sensitive `Bearer <token>` header value.
pub(crate) fn bearer(token: &str) -> Result<HeaderValue, ClientError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
        ClientError::InvalidHeader {
            name: "authorization".to_string(),
            reason: e.to_string(),
        }
    })?;
    value.set_sensitive(true);
    Ok(value)
}
