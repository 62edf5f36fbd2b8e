//! Clap derive structures for the `omada-gateway` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use omada_config::Config;

/// omada-gateway -- Wi-Fi policy gateway for Omada controllers
#[derive(Debug, Parser)]
#[command(
    name = "omada-gateway",
    version,
    about = "HTTP gateway applying Wi-Fi schedules, rate limits and URL filters",
    long_about = "Serves a small REST API that attaches an always-on schedule,\n\
        bandwidth caps and URL filter rules to an SSID on a TP-Link Omada controller.",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Option<Command>,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config dir)
    #[arg(long, env = "OMADA_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Controller URL
    #[arg(long, short = 'u', env = "OMADA_URL", global = true)]
    pub url: Option<String>,

    /// Controller username
    #[arg(long, env = "OMADA_USERNAME", global = true)]
    pub username: Option<String>,

    /// Controller password
    #[arg(long, env = "OMADA_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true, conflicts_with = "verify_tls")]
    pub insecure: bool,

    /// Verify the controller certificate against system roots or --ca-cert
    #[arg(long, global = true)]
    pub verify_tls: bool,

    /// PEM file with the controller's CA certificate
    #[arg(long, global = true, value_name = "PATH")]
    pub ca_cert: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// End-to-end budget for one wifi update in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub pipeline_timeout: Option<u64>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line format
    #[arg(
        long,
        env = "OMADA_LOG_FORMAT",
        default_value = "text",
        global = true
    )]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve(ServeArgs),

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    /// Listen address
    #[arg(long, short = 'l', env = "OMADA_LISTEN")]
    pub listen: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (password masked)
    Show,
    /// Print the default config file location
    Path,
}

impl GlobalOpts {
    /// Layer flags over the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.url = Some(url.clone());
        }
        if let Some(username) = &self.username {
            config.username = Some(username.clone());
        }
        if let Some(password) = &self.password {
            config.password = Some(password.clone());
        }
        if self.insecure {
            config.insecure = Some(true);
        } else if self.verify_tls {
            config.insecure = Some(false);
        }
        if let Some(ca_cert) = &self.ca_cert {
            config.ca_cert = Some(ca_cert.clone());
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(budget) = self.pipeline_timeout {
            config.pipeline_timeout = budget;
        }
    }
}
