// crawlab-api: Transport contract and async HTTP client for the Crawlab REST API

pub mod client;
pub mod error;
pub mod request;
pub mod response;
pub mod transport;

pub use client::{HttpTransport, Transport};
pub use error::Error;
pub use request::{MultipartForm, Part, Query, RequestBody};
pub use response::{ListResponse, Response};
pub use transport::{TlsMode, TransportConfig};
