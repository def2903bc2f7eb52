// wedly-api: Async Rust client for the wedding-invitation admin backend

pub mod auth;
pub mod body;
pub mod client;
mod de;
pub mod error;
pub mod transport;
pub mod types;

pub use body::{FormData, FormValue, RequestBody, Upload};
pub use client::ApiClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
