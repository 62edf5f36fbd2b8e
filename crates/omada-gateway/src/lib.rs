//! HTTP facade over [`omada_core::SsidUpdatePipeline`].
//!
//! - `POST /api/v1/networks/wifis/{ssid}` applies a [`omada_core::WifiPatch`]
//! - `GET  /api/v1/networks/wifis/{ssid}` reports the SSID's managed state
//! - `GET  /healthz` liveness

pub mod error;
pub mod response;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{AppState, router, serve, shutdown_signal};
