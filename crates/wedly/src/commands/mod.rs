//! Command handlers, one module per top-level subcommand.

pub mod auth;
pub mod config_cmd;
pub mod guests;
pub mod templates;
pub mod user_templates;
pub mod users;
mod util;

use wedly_core::Console;

use crate::cli::{Command, GlobalOpts};
use crate::config::Context;
use crate::error::CliError;

/// Route a backend command to its handler.
pub async fn dispatch(
    cmd: Command,
    console: &Console,
    ctx: &Context,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let result = match cmd {
        Command::Login(args) => auth::login(console, ctx, args, global).await,
        Command::Logout => {
            auth::logout(console, global);
            Ok(())
        }
        Command::Whoami => auth::whoami(console, ctx, global).await,
        Command::Users(args) => users::handle(console, ctx, args, global).await,
        Command::Templates(args) => templates::handle(console, ctx, args, global).await,
        Command::UserTemplates(args) => user_templates::handle(console, ctx, args, global).await,
        Command::Guests(args) => guests::handle(console, ctx, args, global).await,
        Command::Config(_) | Command::Completions(_) => unreachable!("handled in main"),
    };
    result.map_err(|e| e.for_profile(&ctx.profile_name))
}
