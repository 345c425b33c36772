// picfg-api: Async Rust client for the Prime Infrastructure REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod status;
pub mod transport;
pub mod xml;

pub use auth::Credentials;
pub use client::{API_PREFIX, PrimeClient};
pub use error::Error;
pub use models::{ApiResponse, ResponseFormat};
pub use status::classify_status;
pub use transport::{TlsMode, TransportConfig};
pub use xml::Element;
