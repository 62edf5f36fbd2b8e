// ── Runtime connection configuration ──
//
// These types describe *how* to reach an Omada controller. They carry
// credential data and connection tuning, but never touch disk.
// The gateway binary builds a `ControllerConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use omada_api::transport::{DEFAULT_MAX_BODY_BYTES, DEFAULT_TIMEOUT};
use omada_api::{ControllerCredentials, OmadaClient, TlsMode, TransportConfig};

use crate::error::CoreError;

/// Default end-to-end budget for one pipeline run.
pub const DEFAULT_PIPELINE_TIMEOUT: Duration = Duration::from_secs(30);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs). Default for local controllers.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for talking to a single controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller URL (e.g., `https://10.0.0.2:8043`).
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// End-to-end budget for one pipeline run.
    pub pipeline_timeout: Duration,
    /// Cap on a single response body.
    pub max_body_bytes: usize,
}

impl ControllerConfig {
    pub fn new(url: Url, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            url,
            username: username.into(),
            password,
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
            pipeline_timeout: DEFAULT_PIPELINE_TIMEOUT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
            max_body_bytes: self.max_body_bytes,
        }
    }

    /// Build the shared controller client.
    pub fn build_client(&self) -> Result<OmadaClient, CoreError> {
        let credentials = ControllerCredentials::new(self.username.clone(), self.password.clone());
        OmadaClient::new(self.url.clone(), credentials, &self.transport()).map_err(|e| {
            CoreError::Config {
                message: format!("cannot build controller client: {e}"),
            }
        })
    }
}
