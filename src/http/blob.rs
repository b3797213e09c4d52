//! Binary large object returned for `blob` responses.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Opaque byte payload tagged with a content type.
///
/// The bytes are kept as received; conversion to text or JSON happens only
/// when the caller asks for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    #[serde(skip_serializing_if = "Option::is_none")]
    content_type: Option<String>,
    bytes: Bytes,
}

impl Blob {
    /// Create a blob with an optional content type.
    pub fn new(bytes: impl Into<Bytes>, content_type: Option<String>) -> Self {
        Self {
            content_type,
            bytes: bytes.into(),
        }
    }

    /// Create an untyped blob.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self::new(bytes, None)
    }

    /// Set the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Size of the payload in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Get the raw bytes. Cloning `Bytes` does not copy the payload.
    pub fn bytes(&self) -> Bytes {
        self.bytes.clone()
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    /// Decode the payload as UTF-8 text.
    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.bytes.to_vec())
    }

    /// Parse the payload as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.bytes)
    }
}
