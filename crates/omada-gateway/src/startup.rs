//! Startup error types with miette diagnostics.

use miette::Diagnostic;
use thiserror::Error;

use omada_config::ConfigError;
use omada_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const BIND: i32 = 3;
}

#[derive(Debug, Error, Diagnostic)]
pub enum StartupError {
    #[error("Invalid configuration: {field}: {reason}")]
    #[diagnostic(
        code(omada::config_invalid),
        help(
            "Set it in the config file, as OMADA_{env} in the environment,\n\
             or with the matching command-line flag."
        )
    )]
    Invalid {
        field: &'static str,
        env: String,
        reason: String,
    },

    #[error("Could not load configuration")]
    #[diagnostic(
        code(omada::config_load),
        help("Expected a flat TOML file, e.g.\n  url = \"https://10.0.0.2:8043\"\n  username = \"admin\"")
    )]
    Load {
        #[source]
        source: ConfigError,
    },

    #[error("Could not build the controller client")]
    #[diagnostic(
        code(omada::client),
        help("Check --ca-cert points to a readable PEM file.")
    )]
    Client {
        #[source]
        source: CoreError,
    },

    #[error("Could not listen on {addr}")]
    #[diagnostic(
        code(omada::bind),
        help("Is another process using the port? Change it with --listen or OMADA_LISTEN.")
    )]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(omada::io))]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for StartupError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Invalid {
                field,
                env: field.to_uppercase(),
                reason,
            },
            other => Self::Load { source: other },
        }
    }
}

impl StartupError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Invalid { .. } | Self::Load { .. } => exit_code::USAGE,
            Self::Bind { .. } => exit_code::BIND,
            Self::Client { .. } | Self::Io(_) => exit_code::GENERAL,
        }
    }
}
