//! Error types for the Fezz invocation client.

use crate::http::RawResponse;
use thiserror::Error;

/// Boxed error produced by a [`Transport`](crate::client::Transport).
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while configuring a client.
///
/// These describe caller mistakes and are returned synchronously from
/// construction and [`FezzClient::set_auth`](crate::FezzClient::set_auth).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The base URL was empty or could not be parsed as an absolute URL.
    #[error("invalid base url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A header name or value could not be used in an HTTP request.
    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    /// A response type string did not name a known decoding strategy.
    #[error("unknown response type '{0}' (expected json, text, arrayBuffer or blob)")]
    UnknownResponseType(String),
}

/// Failure of a single invocation.
///
/// `invoke` reports every runtime failure through this type instead of
/// panicking. Relay and HTTP failures keep the raw response so callers can
/// inspect the status, headers and body the gateway returned.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The request never completed at the transport level.
    #[error("failed to send a request to the function: {0}")]
    Fetch(#[source] TransportError),

    /// The gateway signaled that the function could not be reached or executed.
    #[error("relay error communicating with the function (status {})", .0.status)]
    Relay(RawResponse),

    /// The function answered with a non-2xx status.
    #[error("function returned a non-2xx status code: {}", .0.status)]
    Http(RawResponse),

    /// The response body could not be decoded as the declared response type.
    #[error("failed to decode the function response: {0}")]
    Decode(#[source] TransportError),

    /// The outgoing request could not be built from the supplied options.
    #[error("invalid invocation request: {0}")]
    Request(String),
}

impl InvokeError {
    /// Raw response behind a relay or HTTP failure.
    pub fn context(&self) -> Option<&RawResponse> {
        match self {
            InvokeError::Relay(response) | InvokeError::Http(response) => Some(response),
            _ => None,
        }
    }

    pub fn is_fetch(&self) -> bool {
        matches!(self, InvokeError::Fetch(_))
    }

    pub fn is_relay(&self) -> bool {
        matches!(self, InvokeError::Relay(_))
    }

    pub fn is_http(&self) -> bool {
        matches!(self, InvokeError::Http(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, InvokeError::Decode(_))
    }
}

impl From<serde_json::Error> for InvokeError {
    fn from(err: serde_json::Error) -> Self {
        InvokeError::Decode(Box::new(err))
    }
}

impl From<std::string::FromUtf8Error> for InvokeError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        InvokeError::Decode(Box::new(err))
    }
}
