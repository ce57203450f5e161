//! Binary error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use tswlink_config::ConfigError;
use tswlink_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach panel at {url}")]
    #[diagnostic(
        code(tswlink::connection_failed),
        help("Check that the panel is powered on and reachable.\nReason: {reason}")
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Panel request timed out")]
    #[diagnostic(
        code(tswlink::timeout),
        help("Raise timeout_secs in the profile or check the panel's network link.")
    )]
    Timeout,

    #[error("Panel returned HTTP {status}")]
    #[diagnostic(code(tswlink::http), help("{message}"))]
    Http { status: u16, message: String },

    #[error("Panel sent a response that could not be read")]
    #[diagnostic(code(tswlink::malformed), help("{message}"))]
    Malformed { message: String },

    // ── Entities ─────────────────────────────────────────────────────
    #[error("No entity named '{name}'")]
    #[diagnostic(code(tswlink::unknown_entity), help("Available: {available}"))]
    UnknownEntity { name: String, available: String },

    #[error("Invalid value for {entity}: {reason}")]
    #[diagnostic(code(tswlink::invalid_value))]
    InvalidValue { entity: String, reason: String },

    #[error("Panel did not apply {entity}")]
    #[diagnostic(code(tswlink::rejected), help("{detail}"))]
    Rejected { entity: String, detail: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(tswlink::profile_not_found),
        help("Create one with: tswlink config init <host> --name {name}\nOr pass --host directly.")
    )]
    ProfileNotFound { name: String },

    #[error("No panel configured")]
    #[diagnostic(
        code(tswlink::no_config),
        help("Create a profile with: tswlink config init <host>\nOr pass --host / set TSWLINK_HOST.\nExpected config at: {path}")
    )]
    NoConfig { path: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(tswlink::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(tswlink::config))]
    Config(ConfigError),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Http { .. } | Self::Malformed { .. } => {
                exit_code::CONNECTION
            }
            Self::Timeout => exit_code::TIMEOUT,
            Self::UnknownEntity { .. } | Self::ProfileNotFound { .. } | Self::NoConfig { .. } => {
                exit_code::NOT_FOUND
            }
            Self::InvalidValue { .. } | Self::Validation { .. } => exit_code::USAGE,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Config(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout => Self::Timeout,
            CoreError::Device { status, message } => Self::Http { status, message },
            CoreError::MalformedResponse { message } => Self::Malformed { message },
            CoreError::OutOfRange {
                entity,
                value,
                min,
                max,
            } => Self::InvalidValue {
                entity,
                reason: format!("{value} is outside {min}..={max}"),
            },
            CoreError::InvalidValue { entity, reason } => Self::InvalidValue { entity, reason },
            CoreError::EmptyPath | CoreError::InvalidPath { .. } => Self::Validation {
                field: "path".into(),
                reason: err.to_string(),
            },
            CoreError::Config { message } => Self::Validation {
                field: "panel".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::UnknownProfile { name } => Self::ProfileNotFound { name },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}
