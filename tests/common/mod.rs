//! Mirror server used by the integration tests.
//!
//! Every request is echoed back as JSON describing what the server saw:
//! `{url, method, headers, body}`. Query parameters change the reply:
//!
//! - `status=<code>`: reply with that status
//! - `relay=<value>`: add an `x-relay-error` header with that value
//! - `reply=raw`: echo the request body and content type verbatim
//! - `reply=malformed`: reply with a body that is not JSON

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Start a mirror server on an ephemeral port and return its base URL.
pub async fn spawn_mirror() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let (stream, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => return,
            };
            let io = TokioIo::new(stream);

            tokio::task::spawn(async move {
                let _ = http1::Builder::new()
                    .serve_connection(io, service_fn(mirror))
                    .await;
            });
        }
    });

    format!("http://{}", addr)
}

/// Base URL that refuses connections.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn query_param<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

async fn mirror(req: Request<Incoming>) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let host = req
        .headers()
        .get("host")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost")
        .to_string();
    let url = format!("http://{}{}", host, req.uri());
    let method = req.method().to_string();
    let query = req.uri().query().unwrap_or("").to_string();

    let headers: Vec<(String, String)> = req
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    let request_content_type = req.headers().get("content-type").cloned();

    let body = req.collect().await?.to_bytes();

    let status = query_param(&query, "status")
        .and_then(|s| s.parse::<u16>().ok())
        .and_then(|s| StatusCode::from_u16(s).ok())
        .unwrap_or(StatusCode::OK);

    let mut builder = Response::builder().status(status);
    if let Some(relay) = query_param(&query, "relay") {
        builder = builder.header("x-relay-error", relay);
    }

    let response = match query_param(&query, "reply") {
        Some("raw") => {
            if let Some(content_type) = request_content_type {
                builder = builder.header("content-type", content_type);
            }
            builder.body(Full::new(body))
        }
        Some("malformed") => builder
            .header("content-type", "application/json")
            .body(Full::new(Bytes::from_static(b"{\"url\": "))),
        _ => {
            let echo = serde_json::json!({
                "url": url,
                "method": method,
                "headers": headers,
                "body": String::from_utf8_lossy(&body),
            });
            builder
                .header("content-type", "application/json")
                .body(Full::new(Bytes::from(echo.to_string())))
        }
    };

    Ok(response.unwrap())
}
