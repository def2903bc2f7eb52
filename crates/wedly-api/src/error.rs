use thiserror::Error;

/// Top-level error type for the `wedly-api` crate.
///
/// Covers every failure mode of the backend surface: authentication,
/// transport, structured HTTP errors, and response shape problems.
/// `wedly-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected (wrong credentials, inactive account, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The backend rejected the bearer token (HTTP 401).
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Backend ─────────────────────────────────────────────────────
    /// Non-success HTTP status, with the backend's `{status, message, error}` body
    /// unpacked when present.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        detail: Option<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A successful response lacked a field the client depends on.
    #[error("Response is missing required field `{0}`")]
    MissingField(&'static str),

    /// Request body could not be encoded.
    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

impl Error {
    /// HTTP status carried by this error, when one is known.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the backend rejected the session token.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
