//! Shared configuration for wedly tools.
//!
//! TOML profiles, config path resolution, session token storage, and
//! translation to `wedly_core::ConsoleConfig`. The CLI layers its flag
//! overrides on top of what this crate resolves.

mod token_store;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use wedly_core::{ConsoleConfig, DEFAULT_PAGE_LIMIT, TlsVerification, TokenStore};

pub use token_store::{FileTokenStore, KeyringTokenStore};

/// Environment prefix for config overrides (`WEDLY_DEFAULTS__TIMEOUT=60`).
pub const ENV_PREFIX: &str = "WEDLY_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' is not configured")]
    NoProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles.get(name).ok_or_else(|| ConfigError::NoProfile {
            profile: name.into(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Page size for list commands.
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            page_limit: default_page_limit(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_page_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

/// Where a profile keeps its session token between runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStorage {
    /// A private file under the platform data directory.
    #[default]
    File,
    /// The operating system keyring.
    Keyring,
}

/// A named backend profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// API root (e.g., "http://localhost:8085").
    pub api_url: String,

    /// Base for relative asset paths; defaults to `api_url`.
    pub asset_base_url: Option<String>,

    /// Email used to pre-fill `wedly login`.
    pub email: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    #[serde(default)]
    pub token_storage: TokenStorage,
}

impl Profile {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            asset_base_url: None,
            email: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
            token_storage: TokenStorage::default(),
        }
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("id", "wedly", "wedly")
}

fn home_fallback(parts: &[&str]) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.extend(parts);
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(&[".config", "wedly", "config.toml"]),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory holding file-backed session tokens.
pub fn token_dir() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(&[".local", "share", "wedly", "tokens"]),
        |dirs| dirs.data_dir().join("tokens"),
    )
}

// ── Loading / saving ────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(&path, cfg)?;
    Ok(path)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation to core ─────────────────────────────────────────────

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {raw}"),
    })
}

/// Build a `ConsoleConfig` from a profile and the global defaults.
pub fn profile_to_console_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ConsoleConfig, ConfigError> {
    let mut config = ConsoleConfig::new(parse_url("api_url", &profile.api_url)?);

    config.asset_base_url = profile
        .asset_base_url
        .as_deref()
        .map(|raw| parse_url("asset_base_url", raw))
        .transpose()?;

    config.tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.page_limit = defaults.page_limit;
    Ok(config)
}

/// The token store a profile is configured to use.
pub fn token_store_for(profile_name: &str, profile: &Profile) -> Arc<dyn TokenStore> {
    match profile.token_storage {
        TokenStorage::File => Arc::new(FileTokenStore::for_profile(profile_name)),
        TokenStorage::Keyring => Arc::new(KeyringTokenStore::new(profile_name)),
    }
}
