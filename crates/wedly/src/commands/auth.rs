//! `login`, `logout`, `whoami`.

use dialoguer::Input;
use secrecy::SecretString;

use wedly_core::{Console, User};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn login(
    console: &Console,
    ctx: &Context,
    args: LoginArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let email = match args.email.or_else(|| ctx.profile.email.clone()) {
        Some(email) => email,
        None => Input::<String>::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(util::prompt_err)?,
    };

    let password = match args.password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ")?,
    };
    if password.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }

    let user = console
        .session()
        .login(&email, &SecretString::from(password))
        .await?;

    output::success(
        global,
        &format!(
            "Logged in as {} <{}> ({}) on profile '{}'",
            user.name, user.email, user.role, ctx.profile_name
        ),
    );
    Ok(())
}

pub fn logout(console: &Console, global: &GlobalOpts) {
    console.session().logout();
    output::success(global, "Logged out");
}

pub async fn whoami(console: &Console, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let user = util::require_session(console, ctx).await?;
    let out = output::render_single(&global.output, &user, user_detail, |u| u.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn user_detail(user: &User) -> String {
    output::detail(&[
        ("ID", user.id.to_string()),
        ("Name", user.name.clone()),
        ("Email", user.email.clone()),
        ("Role", user.role.to_string()),
        ("Active", user.is_active.to_string()),
        ("Avatar", user.profile.clone().unwrap_or_else(|| "-".into())),
        ("Created", output::format_time(user.created_at.as_ref())),
    ])
}
