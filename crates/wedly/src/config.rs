//! CLI configuration: a thin layer over `wedly_config`.
//!
//! Picks the active profile and applies `--api-url`, `--insecure` and
//! `--timeout` on top of it before building the `ConsoleConfig`.

use wedly_core::ConsoleConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use wedly_config::{
    Config, Profile, TokenStorage, config_path, load_config_or_default, save_config,
};

/// Everything a command needs to know about where it is talking to.
#[derive(Debug, Clone)]
pub struct Context {
    pub profile_name: String,
    pub profile: Profile,
    pub console: ConsoleConfig,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names, for help text.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        return "(none)".into();
    }
    config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
}

/// Load the config file and resolve the active profile with flag overrides.
///
/// Without a matching profile, `--api-url` alone is enough to build an
/// ad-hoc one; its token is still stored under the active profile name.
pub fn resolve(global: &GlobalOpts) -> Result<Context, CliError> {
    let cfg = wedly_config::load_config()?;
    let profile_name = active_profile_name(global, &cfg);

    let mut profile = match (cfg.profiles.get(&profile_name), global.api_url.as_deref()) {
        (Some(profile), _) => profile.clone(),
        (None, Some(url)) => Profile::new(url),
        (None, None) if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    let console = wedly_config::profile_to_console_config(&profile, &cfg.defaults)?;
    Ok(Context {
        profile_name,
        profile,
        console,
    })
}
