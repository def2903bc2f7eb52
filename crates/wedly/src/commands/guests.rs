use tabled::Tabled;

use wedly_core::{
    Console, CreateGuestRequest, EntityId, Guest, GuestFilter, UpdateGuestRequest,
};

use crate::cli::{GlobalOpts, GuestUpdateArgs, GuestsArgs, GuestsCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct GuestRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Persons")]
    person: i32,
    #[tabled(rename = "Tags")]
    tags: String,
    #[tabled(rename = "Phone")]
    telp: String,
    #[tabled(rename = "Attend")]
    attend: String,
    #[tabled(rename = "Viewed")]
    viewed: String,
}

impl From<&Guest> for GuestRow {
    fn from(g: &Guest) -> Self {
        Self {
            id: g.id.to_string(),
            name: g.name.clone(),
            group: output::or_dash(&g.group),
            person: g.person,
            tags: output::or_dash(&g.tags.join(", ")),
            telp: output::or_dash(&g.telp),
            attend: if g.attend { "yes" } else { "no" }.into(),
            viewed: output::format_time(g.view_at.as_ref()),
        }
    }
}

fn guest_detail(g: &Guest) -> String {
    output::detail(&[
        ("ID", g.id.to_string()),
        ("Template", g.user_template_id.to_string()),
        ("Name", g.name.clone()),
        ("Group", output::or_dash(&g.group)),
        ("Persons", g.person.to_string()),
        ("Tags", output::or_dash(&g.tags.join(", "))),
        ("Phone", output::or_dash(&g.telp)),
        ("Address", output::or_dash(&g.address)),
        ("Message", output::or_dash(&g.message)),
        ("Attend", g.attend.to_string()),
        ("Viewed", output::format_time(g.view_at.as_ref())),
    ])
}

fn render_guest(global: &GlobalOpts, guest: &Guest) -> Result<(), CliError> {
    let out = output::render_single(&global.output, guest, guest_detail, |g| g.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn template_filter(id: String) -> GuestFilter {
    GuestFilter {
        user_template_id: Some(EntityId::from(id)),
    }
}

pub async fn handle(
    console: &Console,
    ctx: &Context,
    args: GuestsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_session(console, ctx).await?;
    let store = console.guests();

    match args.command {
        GuestsCommand::List {
            page,
            user_template_id,
        } => {
            store
                .fetch_list(
                    page.page,
                    util::page_limit(ctx, page.limit),
                    template_filter(user_template_id),
                )
                .await?;

            let snap = store.snapshot();
            let out = output::render_list(
                &global.output,
                &snap.items,
                |g| GuestRow::from(g),
                |g| g.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            output::print_page_footer(global, snap.len(), snap.total);
            Ok(())
        }

        GuestsCommand::Create(create) => {
            let name = create.name.clone();
            let request = CreateGuestRequest {
                user_template_id: EntityId::from(create.user_template_id),
                name: create.name,
                group: create.group,
                person: create.person,
                tags: create.tags,
                telp: create.telp,
                address: create.address,
            };

            match store.create(request).await? {
                Some(guest) => render_guest(global, &guest)?,
                None => output::success(global, &format!("Guest '{name}' added")),
            }
            Ok(())
        }

        GuestsCommand::Update(update) => {
            let id = EntityId::from(update.id.clone());

            // The merged record is only available for guests already listed.
            if let Some(template_id) = update.user_template_id.clone() {
                store
                    .fetch_list(1, ctx.console.page_limit, template_filter(template_id))
                    .await?;
            }

            let patch = build_patch(update);
            if patch.is_empty() {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "no fields to change were given".into(),
                });
            }

            match store.update(&id, patch).await? {
                Some(guest) => render_guest(global, &guest)?,
                None => output::success(global, &format!("Guest '{id}' updated")),
            }
            Ok(())
        }

        GuestsCommand::Delete { id } => {
            if !util::confirm("guests delete", &format!("Delete guest '{id}'?"), global.yes)? {
                return Ok(());
            }
            let id = EntityId::from(id);
            store.delete(&id).await?;
            output::success(global, &format!("Guest '{id}' deleted"));
            Ok(())
        }
    }
}

fn build_patch(args: GuestUpdateArgs) -> UpdateGuestRequest {
    let tags = if args.clear_tags {
        Some(Vec::new())
    } else if args.tags.is_empty() {
        None
    } else {
        Some(args.tags)
    };

    UpdateGuestRequest {
        name: args.name,
        group: args.group,
        person: args.person,
        tags,
        telp: args.telp,
        address: args.address,
        message: args.message,
        attend: args.attend,
    }
}
