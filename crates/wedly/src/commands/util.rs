//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use wedly_core::{Console, Upload, User};

use crate::config::Context;
use crate::error::CliError;

/// Rehydrate the stored session; every backend command except `login`
/// and `logout` starts here.
pub async fn require_session(console: &Console, ctx: &Context) -> Result<User, CliError> {
    match console.initialize().await? {
        Some(user) => Ok(user),
        None => Err(CliError::NotLoggedIn {
            profile: ctx.profile_name.clone(),
        }),
    }
}

/// `--limit`, falling back to the configured page size.
pub fn page_limit(ctx: &Context, limit: Option<u32>) -> u32 {
    limit.unwrap_or(ctx.console.page_limit)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(action: &str, message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

pub fn prompt_err(err: dialoguer::Error) -> CliError {
    CliError::Io(std::io::Error::other(err))
}

/// Read an optional upload from disk.
pub async fn read_upload(path: Option<&Path>) -> Result<Option<Upload>, CliError> {
    match path {
        Some(path) => Ok(Some(Upload::from_path(path).await?)),
        None => Ok(None),
    }
}
