//! Orchestration layer between `omada-api` and the HTTP gateway.
//!
//! - **[`SsidUpdatePipeline`]**: Runs the fixed controller sequence for one
//!   SSID: identify, log in, pick site and WLAN group, locate the SSID, then
//!   [`update_wifi()`](SsidUpdatePipeline::update_wifi) attaches the always-on
//!   schedule, patches rate limits and reconciles URL filters, while
//!   [`read_wifi()`](SsidUpdatePipeline::read_wifi) only reports state.
//!
//! - **[`url_filter`]**: Pure planning of URL filter mutations over the
//!   controller's shared rules, plus the reconciler that issues them.
//!
//! - **[`rate_limit`]**: `(enable, value, unit)` ⇄ Kbps codec.
//!
//! - **[`CoreError`]**: Step-tagged error taxonomy with an [`ErrorKind`]
//!   the HTTP layer maps onto status codes.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod rate_limit;
pub mod url_filter;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ControllerConfig, DEFAULT_PIPELINE_TIMEOUT, TlsVerification};
pub use error::{CoreError, ErrorKind, PipelineStep};
pub use pipeline::{SsidUpdatePipeline, WifiPatch, WifiState, WifiUpdateOutcome};
pub use rate_limit::DISABLED as RATE_LIMIT_DISABLED;
pub use url_filter::UrlFilter;

pub use tokio_util::sync::CancellationToken;
