use thiserror::Error;

/// Top-level error type for the `omada-api` crate.
///
/// Covers every failure mode of the controller's v2 API: transport,
/// authentication, the `{errorCode, msg, result}` envelope, and decoding.
/// `omada-core` maps these into the pipeline's error taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected, or the session was refused (HTTP 401/403).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The controller sent more than the configured body cap.
    #[error("Response body exceeds {limit} bytes")]
    ResponseTooLarge { limit: usize },

    // ── Controller ──────────────────────────────────────────────────
    /// The envelope carried `errorCode != 0`, or the HTTP status was a failure.
    #[error("Controller error {code}: {}", msg.as_deref().unwrap_or("<no message>"))]
    Controller { code: i64, msg: Option<String> },

    /// `errorCode == 0` but the endpoint's `result` was missing.
    #[error("Controller returned no result for {endpoint}")]
    MissingResult { endpoint: &'static str },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is an I/O-level failure rather than a
    /// controller-level rejection.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_)
                | Self::Tls(_)
                | Self::ResponseTooLarge { .. }
                | Self::Deserialization { .. }
        )
    }

    /// The controller's `errorCode`, if the failure came from the envelope.
    pub fn controller_code(&self) -> Option<i64> {
        match self {
            Self::Controller { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// The controller's `msg`, passed through verbatim.
    pub fn controller_msg(&self) -> Option<&str> {
        match self {
            Self::Controller { msg, .. } => msg.as_deref(),
            Self::Authentication { message } => Some(message),
            _ => None,
        }
    }
}
