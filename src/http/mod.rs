//! HTTP types for invoking Fezz functions: request options, bodies and
//! decoded responses.

mod blob;
mod request;
mod response;

pub use blob::Blob;
pub use request::{InvokeBody, InvokeOptions};
pub use response::{InvokeData, RawResponse, ResponseType};
