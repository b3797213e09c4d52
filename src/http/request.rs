//! Per-call invocation options and request bodies.

use crate::error::InvokeError;
use crate::http::{Blob, ResponseType};
use bytes::Bytes;
use serde::Serialize;

pub(crate) const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
pub(crate) const TEXT_PLAIN: &str = "text/plain";
pub(crate) const OCTET_STREAM: &str = "application/octet-stream";
pub(crate) const APPLICATION_JSON: &str = "application/json";

/// Body of an invocation request.
///
/// The variant decides the content type the client sends when the caller
/// does not set one. Structured values are never encoded implicitly; use
/// [`InvokeOptions::json`] to send JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvokeBody {
    /// UTF-8 text.
    Text(String),
    /// Ordered key/value pairs sent form-encoded.
    Form(Vec<(String, String)>),
    /// Raw byte buffer.
    Bytes(Bytes),
    /// Binary large object.
    Blob(Blob),
}

impl InvokeBody {
    /// Build a form body from ordered pairs.
    pub fn form<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        InvokeBody::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Content type implied by the body's shape.
    pub fn content_type(&self) -> &'static str {
        match self {
            InvokeBody::Text(_) => TEXT_PLAIN,
            InvokeBody::Form(_) => FORM_URLENCODED,
            InvokeBody::Bytes(_) | InvokeBody::Blob(_) => OCTET_STREAM,
        }
    }

    /// Encode the body into the bytes sent on the wire.
    pub fn into_bytes(self) -> Result<Bytes, InvokeError> {
        match self {
            InvokeBody::Text(text) => Ok(Bytes::from(text)),
            InvokeBody::Form(pairs) => serde_urlencoded::to_string(&pairs)
                .map(Bytes::from)
                .map_err(|e| InvokeError::Request(format!("failed to encode form body: {}", e))),
            InvokeBody::Bytes(bytes) => Ok(bytes),
            InvokeBody::Blob(blob) => Ok(blob.into_bytes()),
        }
    }
}

impl From<String> for InvokeBody {
    fn from(text: String) -> Self {
        InvokeBody::Text(text)
    }
}

impl From<&str> for InvokeBody {
    fn from(text: &str) -> Self {
        InvokeBody::Text(text.to_string())
    }
}

impl From<Bytes> for InvokeBody {
    fn from(bytes: Bytes) -> Self {
        InvokeBody::Bytes(bytes)
    }
}

impl From<Vec<u8>> for InvokeBody {
    fn from(bytes: Vec<u8>) -> Self {
        InvokeBody::Bytes(Bytes::from(bytes))
    }
}

impl From<Blob> for InvokeBody {
    fn from(blob: Blob) -> Self {
        InvokeBody::Blob(blob)
    }
}

impl From<Vec<(String, String)>> for InvokeBody {
    fn from(pairs: Vec<(String, String)>) -> Self {
        InvokeBody::Form(pairs)
    }
}

/// Options for a single `invoke` call.
#[derive(Debug, Clone, Default)]
pub struct InvokeOptions {
    /// Per-call headers, applied in order over the client defaults.
    pub headers: Vec<(String, String)>,
    /// Request body.
    pub body: Option<InvokeBody>,
    /// How the response body is decoded.
    pub response_type: ResponseType,
}

impl InvokeOptions {
    /// Create options with no headers, no body and a JSON response.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: impl Into<InvokeBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Send form-encoded pairs.
    pub fn form<K, V>(self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.body(InvokeBody::form(pairs))
    }

    /// Serialize `value` to JSON text and mark it as `application/json`.
    pub fn json<T: Serialize>(self, value: &T) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_string(value)?;
        Ok(self.header("Content-Type", APPLICATION_JSON).body(body))
    }

    /// Set the declared response type.
    pub fn response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    /// Get a per-call header value. Names compare case-insensitively and the
    /// last matching entry wins.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    /// Whether the caller set a content type for this call.
    pub fn has_content_type(&self) -> bool {
        self.get_header("content-type").is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inferred_content_types() {
        assert_eq!(InvokeBody::from("hi").content_type(), "text/plain");
        assert_eq!(
            InvokeBody::form([("a", "1")]).content_type(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(
            InvokeBody::from(vec![1u8, 2, 3]).content_type(),
            "application/octet-stream"
        );
        assert_eq!(
            InvokeBody::from(Blob::from_bytes("x").with_content_type("image/png")).content_type(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_form_body_keeps_order() {
        let body = InvokeBody::form([("z", "last letter"), ("a", "1&2")]);
        let encoded = body.into_bytes().unwrap();

        assert_eq!(encoded.as_ref(), b"z=last+letter&a=1%262");
    }

    #[test]
    fn test_options_builder() {
        let options = InvokeOptions::new()
            .header("X-Trace", "abc")
            .header("Content-Type", "text/csv")
            .body("a,b")
            .response_type(ResponseType::Text);

        assert_eq!(options.get_header("x-trace"), Some("abc"));
        assert!(options.has_content_type());
        assert_eq!(options.body, Some(InvokeBody::Text("a,b".to_string())));
        assert_eq!(options.response_type, ResponseType::Text);
    }

    #[test]
    fn test_json_helper_sets_content_type() {
        let options = InvokeOptions::new()
            .json(&serde_json::json!({ "name": "fezz" }))
            .unwrap();

        assert_eq!(options.get_header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(
            options.body,
            Some(InvokeBody::Text(r#"{"name":"fezz"}"#.to_string()))
        );
    }

    #[test]
    fn test_last_header_wins() {
        let options = InvokeOptions::new()
            .header("custom-header", "first")
            .header("Custom-Header", "second");

        assert_eq!(options.get_header("custom-header"), Some("second"));
    }
}
