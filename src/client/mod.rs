//! Invocation client for Fezz functions.

mod config;
mod invoker;
mod transport;

pub use config::{ClientConfig, DEFAULT_RELAY_ERROR_HEADER};
pub use invoker::FezzClient;
pub use transport::{HyperTransport, Transport};
