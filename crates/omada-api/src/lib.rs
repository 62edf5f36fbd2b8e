// omada-api: Async Rust client for the Omada controller v2 API

pub mod auth;
pub mod error;
pub mod transport;
pub mod v2;

pub use auth::{ControllerCredentials, Session};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
pub use v2::OmadaClient;
pub use v2::models;
