// ── Runtime connection configuration ──
//
// These types describe *how* to reach the admin backend. They never touch
// disk; the CLI (via wedly-config) constructs a `ConsoleConfig` and hands it in.

use std::time::Duration;

use url::Url;

use wedly_api::{TlsMode, TransportConfig};

/// Default page size for list fetches when the caller has no preference.
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed development backends).
    DangerAcceptInvalid,
}

/// Configuration for one console instance.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// API root (e.g., `http://localhost:8085`).
    pub api_url: Url,
    /// Base for relative asset paths such as `uploads/cover.jpg`.
    /// Falls back to `api_url` when unset.
    pub asset_base_url: Option<Url>,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Page size used when a list is fetched without an explicit limit.
    pub page_limit: u32,
}

impl ConsoleConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            asset_base_url: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }

    /// The effective asset base, always ending in `/` so relative joins
    /// append rather than replace the last path segment.
    pub fn asset_base(&self) -> Url {
        let mut base = self
            .asset_base_url
            .clone()
            .unwrap_or_else(|| self.api_url.clone());
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }
}
