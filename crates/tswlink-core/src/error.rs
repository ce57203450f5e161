// ── Core error types ──
//
// Errors surfaced by tswlink-core. Consumers never see reqwest errors or raw
// status codes directly; the `From<tswlink_api::Error>` impl translates
// transport-layer failures into the taxonomy below. A path that does not
// resolve is never an error; lookups return `Option`.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Transport ────────────────────────────────────────────────────
    #[error("Cannot connect to panel at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Panel request timed out")]
    Timeout,

    #[error("Panel returned HTTP {status}: {message}")]
    Device { status: u16, message: String },

    // ── Data ─────────────────────────────────────────────────────────
    #[error("Malformed panel response: {message}")]
    MalformedResponse { message: String },

    // ── Usage ────────────────────────────────────────────────────────
    #[error("Value path must contain at least one segment")]
    EmptyPath,

    #[error("Invalid value path: '{input}'")]
    InvalidPath { input: String },

    #[error("{entity}: value {value} is outside {min}..={max}")]
    OutOfRange {
        entity: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{entity}: {reason}")]
    InvalidValue { entity: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` for failures of the HTTP exchange itself, as opposed
    /// to usage or configuration errors.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. } | Self::Timeout | Self::Device { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<tswlink_api::Error> for CoreError {
    fn from(err: tswlink_api::Error) -> Self {
        match err {
            tswlink_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if let Some(status) = e.status() {
                    CoreError::Device {
                        status: status.as_u16(),
                        message: e.to_string(),
                    }
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            tswlink_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            tswlink_api::Error::ClientBuild(message) => CoreError::Config { message },
            tswlink_api::Error::Http { status, body } => CoreError::Device {
                status,
                message: body,
            },
            tswlink_api::Error::Deserialization { message, body: _ } => {
                CoreError::MalformedResponse { message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_maps_to_device_error() {
        let err = CoreError::from(tswlink_api::Error::Http {
            status: 500,
            body: "internal".into(),
        });
        assert!(matches!(err, CoreError::Device { status: 500, .. }));
        assert!(err.is_transport());
    }

    #[test]
    fn undecodable_body_maps_to_malformed_response() {
        let err = CoreError::from(tswlink_api::Error::Deserialization {
            message: "expected value".into(),
            body: "<html>".into(),
        });
        assert!(matches!(err, CoreError::MalformedResponse { .. }));
        assert!(!err.is_transport());
    }
}
