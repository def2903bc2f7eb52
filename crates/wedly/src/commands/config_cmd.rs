//! `wedly config`: guided setup and profile management.

use dialoguer::{Input, Select};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile, TokenStorage};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

#[derive(Serialize)]
struct ProfileSummary {
    name: String,
    api_url: String,
    email: Option<String>,
    token_storage: TokenStorage,
    default: bool,
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "API URL")]
    api_url: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Token")]
    token_storage: &'static str,
}

impl From<&ProfileSummary> for ProfileRow {
    fn from(p: &ProfileSummary) -> Self {
        Self {
            marker: if p.default { "*" } else { "" },
            name: p.name.clone(),
            api_url: p.api_url.clone(),
            email: p.email.clone().unwrap_or_else(|| "-".into()),
            token_storage: match p.token_storage {
                TokenStorage::File => "file",
                TokenStorage::Keyring => "keyring",
            },
        }
    }
}

fn summaries(cfg: &Config) -> Vec<ProfileSummary> {
    cfg.profiles
        .iter()
        .map(|(name, profile)| ProfileSummary {
            name: name.clone(),
            api_url: profile.api_url.clone(),
            email: profile.email.clone(),
            token_storage: profile.token_storage,
            default: cfg.default_profile.as_deref() == Some(name.as_str()),
        })
        .collect()
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let text = toml::to_string_pretty(&cfg).map_err(wedly_config::ConfigError::from)?;
            let out = output::render_single(&global.output, &cfg, |_| text.clone(), |_| {
                config::config_path().display().to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let profiles = summaries(&cfg);
            let out = output::render_list(
                &global.output,
                &profiles,
                |p| ProfileRow::from(p),
                |p| p.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::SetDefault { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::success(global, &format!("Default profile is now '{name}'"));
            Ok(())
        }
    }
}

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();
    eprintln!("wedly configuration\n");

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default(config::active_profile_name(global, &cfg))
        .interact_text()
        .map_err(prompt_err)?;

    let api_url: String = Input::new()
        .with_prompt("Backend API URL")
        .default(
            global
                .api_url
                .clone()
                .unwrap_or_else(|| "http://localhost:8085".into()),
        )
        .validate_with(|input: &String| -> Result<(), String> {
            url::Url::parse(input)
                .map(|_| ())
                .map_err(|e| format!("invalid URL: {e}"))
        })
        .interact_text()
        .map_err(prompt_err)?;

    let email: String = Input::new()
        .with_prompt("Login email (optional)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;

    let storage = Select::new()
        .with_prompt("Where should the session token be kept?")
        .items(&["Private file in the data directory", "OS keyring"])
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let mut profile = Profile::new(api_url);
    profile.email = (!email.is_empty()).then_some(email);
    profile.token_storage = if storage == 1 {
        TokenStorage::Keyring
    } else {
        TokenStorage::File
    };
    if global.insecure {
        profile.insecure = Some(true);
    }

    let keep_default = cfg
        .default_profile
        .as_ref()
        .is_some_and(|name| cfg.profiles.contains_key(name) && *name != profile_name);
    if !keep_default {
        cfg.default_profile = Some(profile_name.clone());
    }
    cfg.profiles.insert(profile_name.clone(), profile);

    let path = config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", path.display());
    eprintln!("  Profile: {profile_name}");
    eprintln!("\n  Sign in with: wedly login --profile {profile_name}");
    Ok(())
}
