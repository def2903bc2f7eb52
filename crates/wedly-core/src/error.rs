// ── Core error types ──
//
// User-facing errors from wedly-core. Consumers see an HTTP status only
// where the failure really came from the backend. The
// `From<wedly_api::Error>` impl translates transport-layer errors into
// these variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Authorization ────────────────────────────────────────────────
    /// No session token is held. Raised before any request is sent.
    #[error("Not logged in: a session token is required")]
    Unauthorized,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to backend timed out")]
    Timeout,

    // ── API errors ───────────────────────────────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (absent for failures below the HTTP layer).
        status: Option<u16>,
    },

    /// A success response did not have the expected shape.
    #[error("Unexpected response from backend: {message}")]
    InvalidResponse { message: String },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Persisting or loading the session token failed.
    #[error("Token storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// HTTP status of the failed request, when the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns `true` for failures that mean the session is not (or no
    /// longer) valid: no token held, or the backend answered 401.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::AuthenticationFailed { .. })
            || self.status() == Some(401)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<wedly_api::Error> for CoreError {
    fn from(err: wedly_api::Error) -> Self {
        match err {
            wedly_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            wedly_api::Error::Unauthorized { message } => CoreError::Api {
                message,
                status: Some(401),
            },
            wedly_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            wedly_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            wedly_api::Error::Tls(reason) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {reason}"),
            },
            wedly_api::Error::Api {
                status,
                message,
                detail,
            } => CoreError::Api {
                message: match detail {
                    Some(detail) if detail != message => detail,
                    _ => message,
                },
                status: Some(status),
            },
            wedly_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidResponse { message }
            }
            wedly_api::Error::MissingField(field) => CoreError::InvalidResponse {
                message: format!("response is missing `{field}`"),
            },
            wedly_api::Error::Encode(e) => CoreError::Internal(format!("encoding failed: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_401_counts_as_unauthorized() {
        let err = CoreError::from(wedly_api::Error::Unauthorized {
            message: "Invalid token".into(),
        });
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn api_detail_replaces_summary_message() {
        let err = CoreError::from(wedly_api::Error::Api {
            status: 400,
            message: "Create Guest failed".into(),
            detail: Some("Create Guest failed: duplicate".into()),
        });
        assert_eq!(err.to_string(), "API error: Create Guest failed: duplicate");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn missing_token_is_a_shape_error() {
        let err = CoreError::from(wedly_api::Error::MissingField("token"));
        assert!(matches!(err, CoreError::InvalidResponse { .. }));
        assert_eq!(err.status(), None);
    }
}
