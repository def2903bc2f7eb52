use tabled::Tabled;

use wedly_core::{Console, User};

use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Active")]
    active: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.to_string(),
            name: output::or_dash(&u.name),
            email: u.email.clone(),
            role: u.role.to_string(),
            active: if u.is_active { "yes" } else { "no" }.into(),
            created: output::format_time(u.created_at.as_ref()),
        }
    }
}

pub async fn handle(
    console: &Console,
    ctx: &Context,
    args: UsersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_session(console, ctx).await?;

    match args.command {
        UsersCommand::List(page) => {
            let store = console.users();
            store
                .fetch_list(page.page, util::page_limit(ctx, page.limit), ())
                .await?;

            let snap = store.snapshot();
            let out = output::render_list(
                &global.output,
                &snap.items,
                |u| UserRow::from(u),
                |u| u.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            output::print_page_footer(global, snap.len(), snap.total);
            Ok(())
        }
    }
}
