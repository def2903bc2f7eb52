use chrono::{DateTime, Utc};
use tabled::Tabled;

use wedly_core::{
    Console, CreateUserTemplateRequest, EntityId, MessageTemplate, UserTemplate,
    UserTemplateFilter,
};

use crate::cli::{GlobalOpts, UserTemplateCreateArgs, UserTemplatesArgs, UserTemplatesCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

const WHATSAPP: &str = "whatsapp";

#[derive(Tabled)]
struct UserTemplateRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Slug")]
    slug: String,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Expires")]
    expires: String,
}

impl From<&UserTemplate> for UserTemplateRow {
    fn from(t: &UserTemplate) -> Self {
        Self {
            id: t.id.to_string(),
            name: t.name.clone(),
            slug: output::or_dash(&t.slug),
            url: output::or_dash(&t.url),
            expires: output::format_time(t.expire_at.as_ref()),
        }
    }
}

fn user_template_detail(t: &UserTemplate) -> String {
    let mut fields = vec![
        ("ID", t.id.to_string()),
        ("Name", t.name.clone()),
        ("Owner", output::or_dash(t.user_id.as_str())),
        ("Base", output::or_dash(t.base_template_id.as_str())),
        ("Slug", output::or_dash(&t.slug)),
        ("URL", output::or_dash(&t.url)),
        ("Expires", output::format_time(t.expire_at.as_ref())),
    ];
    if let Some(message) = t.message_template.get(WHATSAPP) {
        fields.push(("WhatsApp", message.text.clone()));
    }
    output::detail(&fields)
}

fn parse_expire_at(raw: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| CliError::Validation {
            field: "expire-at".into(),
            reason: format!("expected RFC 3339 (e.g. 2026-12-31T23:59:00Z): {e}"),
        })
}

pub async fn handle(
    console: &Console,
    ctx: &Context,
    args: UserTemplatesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_session(console, ctx).await?;

    match args.command {
        UserTemplatesCommand::List { page, user_id } => {
            let store = console.user_templates();
            let filter = UserTemplateFilter {
                user_id: user_id.map(EntityId::from),
            };
            store
                .fetch_list(page.page, util::page_limit(ctx, page.limit), filter)
                .await?;

            let snap = store.snapshot();
            let out = output::render_list(
                &global.output,
                &snap.items,
                |t| UserTemplateRow::from(t),
                |t| t.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            output::print_page_footer(global, snap.len(), snap.total);
            Ok(())
        }

        UserTemplatesCommand::Create(create) => {
            let name = create.name.clone();
            let request = build_create_request(create).await?;

            match console.user_templates().create(request).await? {
                Some(template) => {
                    let out = output::render_single(
                        &global.output,
                        &template,
                        user_template_detail,
                        |t| t.id.to_string(),
                    )?;
                    output::print_output(&out, global.quiet);
                }
                None => output::success(global, &format!("User template '{name}' created")),
            }
            Ok(())
        }
    }
}

async fn build_create_request(
    args: UserTemplateCreateArgs,
) -> Result<CreateUserTemplateRequest, CliError> {
    Ok(CreateUserTemplateRequest {
        expire_at: parse_expire_at(&args.expire_at)?,
        cover_image: util::read_upload(args.cover_image.as_deref()).await?,
        zip_file: util::read_upload(args.zip_file.as_deref()).await?,
        base_template_id: args.base_template_id.map(EntityId::from).unwrap_or_default(),
        name: args.name,
        slug: args.slug,
        url: args.url,
        message_template: vec![MessageTemplate {
            text: args.whatsapp_text,
            provider: WHATSAPP.into(),
        }],
    })
}
