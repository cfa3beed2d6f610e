// kraken-api: Async Rust client for the Kraken transcoder management API

pub mod client;
pub mod endpoints;
pub mod error;
pub mod paths;
pub mod session;
pub mod transport;

pub use client::KrakenClient;
pub use error::Error;
pub use session::{Session, extract_token};
pub use transport::{TlsMode, TransportConfig};
