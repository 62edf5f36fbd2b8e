//! Gateway configuration.
//!
//! A flat TOML file merged with `OMADA_*` environment variables, validated
//! and translated into `omada_core::ControllerConfig`. The binary layers its
//! CLI flags on top before calling [`Config::controller_config`].

use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use omada_core::{ControllerConfig, TlsVerification};

/// Environment prefix: `OMADA_URL`, `OMADA_PASSWORD`, ...
pub const ENV_PREFIX: &str = "OMADA_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

// ── Config ──────────────────────────────────────────────────────────

#[derive(Clone, Deserialize, Serialize)]
pub struct Config {
    /// Controller base URL (e.g. "https://10.0.0.2:8043").
    pub url: Option<String>,

    pub username: Option<String>,

    /// Plaintext in the file; prefer `OMADA_PASSWORD`.
    pub password: Option<String>,

    /// `true`: accept any certificate. `false`: verify (system roots or
    /// `ca_cert`). Unset: accept any certificate unless `ca_cert` is given.
    pub insecure: Option<bool>,

    /// PEM file with the controller's CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Per-request timeout, seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// End-to-end budget for one pipeline run, seconds.
    #[serde(default = "default_pipeline_timeout")]
    pub pipeline_timeout: u64,

    /// Cap on one controller response body.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// HTTP listen address.
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: None,
            username: None,
            password: None,
            insecure: None,
            ca_cert: None,
            timeout: default_timeout(),
            pipeline_timeout: default_pipeline_timeout(),
            max_body_bytes: default_max_body_bytes(),
            listen: default_listen(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("insecure", &self.insecure)
            .field("ca_cert", &self.ca_cert)
            .field("timeout", &self.timeout)
            .field("pipeline_timeout", &self.pipeline_timeout)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("listen", &self.listen)
            .finish()
    }
}

fn default_timeout() -> u64 {
    5
}
fn default_pipeline_timeout() -> u64 {
    30
}
fn default_max_body_bytes() -> usize {
    1024 * 1024
}
fn default_listen() -> String {
    "0.0.0.0:8080".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "omada", "omada-gateway").map_or_else(
        || PathBuf::from("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Defaults, then the TOML file at `path` (if present), then the environment.
pub fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX))
}

/// Load from `path`, or from [`config_path()`] when `None`.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    let config: Config = figment(&path).extract()?;
    Ok(config)
}

// ── Validation / translation ────────────────────────────────────────

impl Config {
    fn tls(&self) -> TlsVerification {
        match (self.insecure, &self.ca_cert) {
            (Some(true), _) => TlsVerification::DangerAcceptInvalid,
            (_, Some(path)) => TlsVerification::CustomCa(path.clone()),
            (Some(false), None) => TlsVerification::SystemDefaults,
            (None, None) => TlsVerification::DangerAcceptInvalid,
        }
    }

    /// Validate and build the runtime controller configuration.
    pub fn controller_config(&self) -> Result<ControllerConfig, ConfigError> {
        let raw_url = required(self.url.as_deref(), "url")?;
        let url: Url = raw_url
            .parse()
            .map_err(|e| ConfigError::invalid("url", format!("{raw_url}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::invalid(
                "url",
                format!("expected http or https, got '{}'", url.scheme()),
            ));
        }

        let username = required(self.username.as_deref(), "username")?;
        let password = required(self.password.as_deref(), "password")?;

        if self.timeout == 0 {
            return Err(ConfigError::invalid("timeout", "must be at least 1 second"));
        }
        if self.pipeline_timeout == 0 {
            return Err(ConfigError::invalid(
                "pipeline_timeout",
                "must be at least 1 second",
            ));
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::invalid("max_body_bytes", "must be positive"));
        }

        let mut config =
            ControllerConfig::new(url, username, SecretString::from(password.to_owned()));
        config.tls = self.tls();
        config.timeout = Duration::from_secs(self.timeout);
        config.pipeline_timeout = Duration::from_secs(self.pipeline_timeout);
        config.max_body_bytes = self.max_body_bytes;
        Ok(config)
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen
            .parse()
            .map_err(|e| ConfigError::invalid("listen", format!("{}: {e}", self.listen)))
    }

    /// Effective configuration as TOML, password masked.
    pub fn to_toml_redacted(&self) -> Result<String, ConfigError> {
        let mut shown = self.clone();
        if shown.password.is_some() {
            shown.password = Some("********".into());
        }
        Ok(toml::to_string_pretty(&shown)?)
    }
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, ConfigError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::invalid(field, "must be set")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn complete() -> Config {
        Config {
            url: Some("https://10.0.0.2:8043".into()),
            username: Some("admin".into()),
            password: Some("secret".into()),
            ..Config::default()
        }
    }

    fn invalid_field(config: &Config) -> &'static str {
        match config.controller_config() {
            Err(ConfigError::Validation { field, .. }) => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn defaults_fill_the_gaps() {
        let controller = complete().controller_config().unwrap();
        assert_eq!(controller.timeout, Duration::from_secs(5));
        assert_eq!(controller.pipeline_timeout, Duration::from_secs(30));
        assert_eq!(controller.max_body_bytes, 1024 * 1024);
        assert_eq!(controller.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(
            complete().listen_addr().unwrap(),
            "0.0.0.0:8080".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn missing_fields_are_named() {
        let mut config = complete();
        config.url = None;
        assert_eq!(invalid_field(&config), "url");

        let mut config = complete();
        config.username = Some("  ".into());
        assert_eq!(invalid_field(&config), "username");

        let mut config = complete();
        config.password = None;
        assert_eq!(invalid_field(&config), "password");
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = complete();
        config.url = Some("ftp://controller".into());
        assert_eq!(invalid_field(&config), "url");

        let mut config = complete();
        config.url = Some("not a url".into());
        assert_eq!(invalid_field(&config), "url");

        let mut config = complete();
        config.pipeline_timeout = 0;
        assert_eq!(invalid_field(&config), "pipeline_timeout");

        let mut config = complete();
        config.listen = "localhost".into();
        assert!(matches!(
            config.listen_addr(),
            Err(ConfigError::Validation { field: "listen", .. })
        ));
    }

    #[test]
    fn tls_selection() {
        let mut config = complete();
        config.insecure = Some(false);
        assert_eq!(config.tls(), TlsVerification::SystemDefaults);

        config.ca_cert = Some("/etc/omada/ca.pem".into());
        assert_eq!(
            config.tls(),
            TlsVerification::CustomCa("/etc/omada/ca.pem".into())
        );

        config.insecure = Some(true);
        assert_eq!(config.tls(), TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn password_never_printed() {
        let config = complete();
        assert!(!format!("{config:?}").contains("secret"));
        let rendered = config.to_toml_redacted().unwrap();
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("password = \"********\""));
    }
}
