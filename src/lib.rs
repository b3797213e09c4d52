//! # Fezz Client - Function Invocation over HTTP
//!
//! A small client for calling Fezz functions hosted behind an HTTP gateway
//! and normalizing their responses into a single result shape, whatever the
//! payload encoding.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   POST <base>/<path>   ┌──────────────┐        ┌──────────┐
//! │  FezzClient  │ ─────────────────────▶ │   Gateway    │ ─────▶ │ Function │
//! │  (headers,   │                        │   (relay)    │        │          │
//! │   bearer)    │ ◀───────────────────── │              │ ◀───── │          │
//! └──────────────┘  status, x-relay-error └──────────────┘        └──────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fezz_client::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let client = FezzClient::new("http://localhost:8080/functions/v1")?;
//!     client.set_auth("my-token").await?;
//!
//!     let options = InvokeOptions::new()
//!         .header("X-Name", "Fezz")
//!         .body("hello")
//!         .response_type(ResponseType::Text);
//!
//!     match client.invoke("hello", options).await {
//!         Ok(data) => println!("{:?}", data),
//!         Err(InvokeError::Relay(response)) => eprintln!("relay failed: {}", response.status),
//!         Err(e) => eprintln!("invoke failed: {}", e),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Result contract
//!
//! [`FezzClient::invoke`] always returns a value: decoded [`InvokeData`] on
//! success, or an [`InvokeError`] describing a network, relay, HTTP or decode
//! failure. The decoding strategy is chosen only by the declared
//! [`ResponseType`], never by the response's content type.

pub mod client;
pub mod error;
pub mod http;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::client::{ClientConfig, FezzClient, HyperTransport, Transport};
    pub use crate::error::{ClientError, InvokeError};
    pub use crate::http::{Blob, InvokeBody, InvokeData, InvokeOptions, RawResponse, ResponseType};
}

// Re-export for convenience
pub use client::{ClientConfig, FezzClient};
pub use error::{ClientError, InvokeError};
pub use http::{Blob, InvokeBody, InvokeData, InvokeOptions, RawResponse, ResponseType};
