//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use wedly_config::ConfigError;
use wedly_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the backend at {url}")]
    #[diagnostic(
        code(wedly::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Reason: {reason}\n\
             Use --insecure (-k) if it serves a self-signed certificate."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(wedly::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Login failed: {message}")]
    #[diagnostic(
        code(wedly::auth_failed),
        help("Check the email and password, then run: wedly login")
    )]
    AuthFailed { message: String },

    #[error("Not logged in to profile '{profile}'")]
    #[diagnostic(code(wedly::not_logged_in), help("Run: wedly login --profile {profile}"))]
    NotLoggedIn { profile: String },

    #[error("Session is no longer valid")]
    #[diagnostic(
        code(wedly::session_expired),
        help("The stored token was rejected. Run: wedly login")
    )]
    SessionExpired,

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({}): {message}", status_label(*status))]
    #[diagnostic(code(wedly::api_error))]
    Api { status: Option<u16>, message: String },

    #[error("Unexpected response from the backend: {message}")]
    #[diagnostic(
        code(wedly::invalid_response),
        help("Run with -vv to see the request trace.")
    )]
    InvalidResponse { message: String },

    #[error("Internal error: {0}")]
    #[diagnostic(code(wedly::internal))]
    Internal(String),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(wedly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(wedly::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: wedly config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No backend configured")]
    #[diagnostic(
        code(wedly::no_config),
        help(
            "Create a profile with: wedly config init\n\
             Or pass --api-url / set WEDLY_API_URL.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(wedly::config))]
    Config(Box<ConfigError>),

    #[error("Token storage failed: {message}")]
    #[diagnostic(
        code(wedly::storage),
        help("Check permissions on the data directory, or switch the profile's token_storage.")
    )]
    Storage { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(wedly::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(wedly::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(wedly::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

fn status_label(status: Option<u16>) -> String {
    status.map_or_else(|| "no status".into(), |s| s.to_string())
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NotLoggedIn { .. } | Self::SessionExpired => {
                exit_code::AUTH
            }
            Self::Api { status, .. } => match status {
                Some(403) => exit_code::PERMISSION,
                Some(404) => exit_code::NOT_FOUND,
                Some(409) => exit_code::CONFLICT,
                _ => exit_code::GENERAL,
            },
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Name the active profile in errors that ask for a new login.
    #[must_use]
    pub fn for_profile(self, name: &str) -> Self {
        match self {
            Self::NotLoggedIn { .. } => Self::NotLoggedIn {
                profile: name.to_owned(),
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            // The profile name is filled in by `for_profile` at dispatch.
            CoreError::Unauthorized => Self::NotLoggedIn {
                profile: String::new(),
            },
            CoreError::Api {
                status: Some(401), ..
            } => Self::SessionExpired,
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout => Self::Timeout,
            CoreError::Api { message, status } => Self::Api { status, message },
            CoreError::InvalidResponse { message } => Self::InvalidResponse { message },
            CoreError::ValidationFailed { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Storage { message } => Self::Storage { message },
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config(Box::new(other)),
        }
    }
}
