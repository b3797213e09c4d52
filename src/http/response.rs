//! Function responses: the raw gateway reply and its decoded form.

use crate::error::{ClientError, InvokeError};
use crate::http::Blob;
use bytes::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Decoding strategy for a response body, declared by the caller.
///
/// The response's own `content-type` never changes which strategy runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseType {
    #[default]
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "arrayBuffer")]
    ArrayBuffer,
    #[serde(rename = "blob")]
    Blob,
}

impl std::fmt::Display for ResponseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseType::Json => write!(f, "json"),
            ResponseType::Text => write!(f, "text"),
            ResponseType::ArrayBuffer => write!(f, "arrayBuffer"),
            ResponseType::Blob => write!(f, "blob"),
        }
    }
}

impl FromStr for ResponseType {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ResponseType::Json),
            "text" => Ok(ResponseType::Text),
            "arraybuffer" => Ok(ResponseType::ArrayBuffer),
            "blob" => Ok(ResponseType::Blob),
            _ => Err(ClientError::UnknownResponseType(s.to_string())),
        }
    }
}

impl ResponseType {
    /// Decode a successful response body.
    pub fn decode(self, response: RawResponse) -> Result<InvokeData, InvokeError> {
        match self {
            ResponseType::Json => Ok(InvokeData::Json(serde_json::from_slice(&response.body)?)),
            ResponseType::Text => {
                // Text is decoded as UTF-8 only; another declared charset is refused.
                if let Some(charset) = response.charset() {
                    if !is_utf8_compatible(charset) {
                        return Err(InvokeError::Decode(
                            format!("unsupported response charset '{}'", charset).into(),
                        ));
                    }
                }
                Ok(InvokeData::Text(String::from_utf8(response.body.to_vec())?))
            }
            ResponseType::ArrayBuffer => Ok(InvokeData::Bytes(response.body)),
            ResponseType::Blob => {
                let content_type = response.content_type().map(str::to_string);
                Ok(InvokeData::Blob(Blob::new(response.body, content_type)))
            }
        }
    }
}

/// Fully buffered HTTP response as returned by the gateway.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Bytes,
}

impl RawResponse {
    /// Create an empty response with the given status.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Get a header value as a string.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// `charset` parameter of the content type, if any.
    pub fn charset(&self) -> Option<&str> {
        self.content_type()?
            .split(';')
            .skip(1)
            .filter_map(|param| param.split_once('='))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("charset"))
            .map(|(_, value)| value.trim().trim_matches('"'))
    }

    /// Get the body as text, replacing invalid UTF-8.
    pub fn text_body(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Parse the body as JSON.
    pub fn json_body<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

fn is_utf8_compatible(charset: &str) -> bool {
    ["utf-8", "utf8", "us-ascii", "ascii"]
        .iter()
        .any(|name| charset.eq_ignore_ascii_case(name))
}

/// Decoded response body, one variant per [`ResponseType`].
#[derive(Debug, Clone, PartialEq)]
pub enum InvokeData {
    Json(serde_json::Value),
    Text(String),
    Bytes(Bytes),
    Blob(Blob),
}

impl InvokeData {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            InvokeData::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            InvokeData::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            InvokeData::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&Blob> {
        match self {
            InvokeData::Blob(blob) => Some(blob),
            _ => None,
        }
    }

    pub fn into_json(self) -> Option<serde_json::Value> {
        match self {
            InvokeData::Json(value) => Some(value),
            _ => None,
        }
    }

    /// The response type this data was decoded with.
    pub fn response_type(&self) -> ResponseType {
        match self {
            InvokeData::Json(_) => ResponseType::Json,
            InvokeData::Text(_) => ResponseType::Text,
            InvokeData::Bytes(_) => ResponseType::ArrayBuffer,
            InvokeData::Blob(_) => ResponseType::Blob,
        }
    }
}
