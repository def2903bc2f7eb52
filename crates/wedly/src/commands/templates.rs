use tabled::Tabled;

use wedly_core::{Console, CreatePublicTemplateRequest, PublicTemplate};

use crate::cli::{GlobalOpts, TemplateCreateArgs, TemplatesArgs, TemplatesCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct TemplateRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "State")]
    state: i32,
    #[tabled(rename = "Tags")]
    tags: String,
}

impl From<&PublicTemplate> for TemplateRow {
    fn from(t: &PublicTemplate) -> Self {
        let price = if t.price_interval.is_empty() {
            t.price.to_string()
        } else {
            format!("{}/{}", t.price, t.price_interval)
        };
        Self {
            id: t.id.to_string(),
            name: t.name.clone(),
            kind: output::or_dash(&t.kind),
            price,
            state: t.state,
            tags: output::or_dash(&t.tags.join(", ")),
        }
    }
}

fn template_detail(t: &PublicTemplate) -> String {
    output::detail(&[
        ("ID", t.id.to_string()),
        ("Name", t.name.clone()),
        ("Description", output::or_dash(&t.description)),
        ("Type", output::or_dash(&t.kind)),
        ("Price", t.price.to_string()),
        ("Interval", output::or_dash(&t.price_interval)),
        ("State", t.state.to_string()),
        ("Tags", output::or_dash(&t.tags.join(", "))),
        ("Cover", t.cover_image.clone().unwrap_or_else(|| "-".into())),
    ])
}

pub async fn handle(
    console: &Console,
    ctx: &Context,
    args: TemplatesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_session(console, ctx).await?;

    match args.command {
        TemplatesCommand::List(page) => {
            let store = console.templates();
            store
                .fetch_list(page.page, util::page_limit(ctx, page.limit), ())
                .await?;

            let snap = store.snapshot();
            let out = output::render_list(
                &global.output,
                &snap.items,
                |t| TemplateRow::from(t),
                |t| t.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            output::print_page_footer(global, snap.len(), snap.total);
            Ok(())
        }

        TemplatesCommand::Create(create) => {
            let name = create.name.clone();
            let request = build_create_request(create).await?;

            match console.templates().create(request).await? {
                Some(template) => {
                    let out = output::render_single(
                        &global.output,
                        &template,
                        template_detail,
                        |t| t.id.to_string(),
                    )?;
                    output::print_output(&out, global.quiet);
                }
                None => output::success(global, &format!("Template '{name}' created")),
            }
            Ok(())
        }
    }
}

async fn build_create_request(
    args: TemplateCreateArgs,
) -> Result<CreatePublicTemplateRequest, CliError> {
    Ok(CreatePublicTemplateRequest {
        cover_image: util::read_upload(args.cover_image.as_deref()).await?,
        zip_file: util::read_upload(args.zip_file.as_deref()).await?,
        name: args.name,
        description: args.description,
        price: args.price,
        price_interval: args.price_interval,
        state: args.state,
        kind: args.kind,
        tags: args.tags,
    })
}
