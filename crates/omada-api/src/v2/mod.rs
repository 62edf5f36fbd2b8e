// Omada controller v2 API
//
// Path-scoped under `/{omadacId}/api/v2/`, wrapped in the
// `{errorCode, msg, result}` envelope, authenticated by session cookies
// plus a `Csrf-Token` header obtained at login.

pub mod auth;
pub mod client;
pub mod firewall;
pub mod models;
pub mod profiles;
pub mod sites;
pub mod wlans;

pub use client::OmadaClient;
