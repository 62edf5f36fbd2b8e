// ── Core error types ──
//
// The pipeline's error taxonomy. Every upstream failure carries the step
// it happened in; the HTTP layer maps `ErrorKind` onto status codes and
// never inspects `omada_api::Error` directly.

use std::time::Duration;

use strum::{Display, IntoStaticStr};
use thiserror::Error;

/// One transition of the SSID update state machine.
///
/// `Init → Identified → LoggedIn → SiteChosen → WlanChosen → SsidLocated →
/// Scheduled → SsidUpdated → FiltersReconciled → Done`; each variant names
/// the controller call that performs the transition. `Logout` runs after
/// any of them once a session exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum PipelineStep {
    ControllerInfo,
    Login,
    Sites,
    Wlans,
    Ssids,
    Schedule,
    UpdateSsid,
    UrlFilters,
    Logout,
}

/// Coarse classification consumed by the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    NotFound,
    Transport,
    Controller,
    Canceled,
    Config,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Request errors ───────────────────────────────────────────────
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("SSID not found: {name}")]
    SsidNotFound { name: String },

    // ── Upstream errors ──────────────────────────────────────────────
    #[error("{step}: transport error: {source}")]
    Transport {
        step: PipelineStep,
        #[source]
        source: omada_api::Error,
    },

    #[error("{step}: controller error: {}", msg.as_deref().unwrap_or("<no message>"))]
    Controller {
        step: PipelineStep,
        /// The controller's `errorCode` (or HTTP status), when there was one.
        code: Option<i64>,
        /// Controller `msg`, passed through verbatim.
        msg: Option<String>,
    },

    // ── Cancellation ─────────────────────────────────────────────────
    #[error("{step}: canceled by caller")]
    Canceled { step: PipelineStep },

    #[error("{step}: pipeline budget of {}s exhausted", budget.as_secs())]
    DeadlineExceeded { step: PipelineStep, budget: Duration },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Classify an `omada_api::Error` raised during `step`.
    pub fn upstream(step: PipelineStep, err: omada_api::Error) -> Self {
        if err.is_transport() {
            return Self::Transport { step, source: err };
        }
        match err {
            omada_api::Error::Controller { code, msg } => Self::Controller {
                step,
                code: Some(code),
                msg,
            },
            other => Self::Controller {
                step,
                code: None,
                msg: Some(other.to_string()),
            },
        }
    }

    /// A controller answer that decoded fine but cannot be used
    /// (empty site list, missing id, ...).
    pub fn unexpected(step: PipelineStep, msg: impl Into<String>) -> Self {
        Self::Controller {
            step,
            code: None,
            msg: Some(msg.into()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadRequest { .. } => ErrorKind::BadRequest,
            Self::SsidNotFound { .. } => ErrorKind::NotFound,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Controller { .. } => ErrorKind::Controller,
            Self::Canceled { .. } | Self::DeadlineExceeded { .. } => ErrorKind::Canceled,
            Self::Config { .. } => ErrorKind::Config,
        }
    }

    /// The pipeline step that failed, if the error came from one.
    pub fn step(&self) -> Option<PipelineStep> {
        match self {
            Self::Transport { step, .. }
            | Self::Controller { step, .. }
            | Self::Canceled { step }
            | Self::DeadlineExceeded { step, .. } => Some(*step),
            Self::BadRequest { .. } | Self::SsidNotFound { .. } | Self::Config { .. } => None,
        }
    }
}

/// Attach a pipeline step to a raw API result.
pub(crate) trait StepResultExt<T> {
    fn at(self, step: PipelineStep) -> Result<T, CoreError>;
}

impl<T> StepResultExt<T> for Result<T, omada_api::Error> {
    fn at(self, step: PipelineStep) -> Result<T, CoreError> {
        self.map_err(|e| CoreError::upstream(step, e))
    }
}
