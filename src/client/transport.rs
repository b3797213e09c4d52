//! Transport used by the client to exchange one request with the gateway.

use crate::error::TransportError;
use crate::http::RawResponse;
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::Request;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tracing::debug;

/// Sends a fully built request and buffers the response.
///
/// Implementations own timeouts, retries and TLS; the client only sees the
/// buffered result or an error meaning the exchange never completed.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request<Full<Bytes>>) -> Result<RawResponse, TransportError>;
}

/// HTTP/1 transport built on the hyper client. `https://` URLs go through
/// rustls with the webpki root store; `http://` URLs stay plain.
#[derive(Clone)]
pub struct HyperTransport {
    client: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
}

impl HyperTransport {
    pub fn new() -> Self {
        let connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self { client }
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HyperTransport {
    async fn send(&self, request: Request<Full<Bytes>>) -> Result<RawResponse, TransportError> {
        let response = self.client.request(request).await?;
        let (parts, body) = response.into_parts();
        let body = body.collect().await?.to_bytes();

        debug!("Received {} ({} bytes)", parts.status, body.len());

        Ok(RawResponse {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }
}
