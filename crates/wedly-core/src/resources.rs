// ── Backend resources ──
//
// One zero-sized descriptor per collection the console manages.

use serde_json::Value;
use url::Url;

use wedly_api::{FormData, RequestBody};

use crate::error::CoreError;
use crate::model::requests::{
    CreateGuestRequest, CreatePublicTemplateRequest, CreateUserTemplateRequest,
    UpdateGuestRequest,
};
use crate::model::{EntityId, Guest, PublicTemplate, User, UserTemplate};
use crate::store::{
    Creatable, Deletable, EntityStore, InsertPosition, ListQuery, Resource, Updatable, to_json,
};

/// Wire format for `expire_at` in multipart bodies.
pub const EXPIRE_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Page size used to reload a guest list that was never fetched.
pub const GUEST_REFRESH_LIMIT: u32 = 100;

/// Resolve a possibly-relative asset path against `base`.
///
/// Absolute URLs and empty strings are returned unchanged.
pub fn resolve_asset(path: &str, base: &Url) -> String {
    if path.is_empty() || Url::parse(path).is_ok() {
        return path.to_owned();
    }
    base.join(path.trim_start_matches('/'))
        .map_or_else(|_| path.to_owned(), String::from)
}

fn resolve_optional(path: &mut Option<String>, base: &Url) {
    if let Some(p) = path.as_mut() {
        *p = resolve_asset(p, base);
    }
}

// ── Users ────────────────────────────────────────────────────────────

/// Admin view of all accounts. Read-only.
pub struct Users;

impl Resource for Users {
    type Entity = User;
    type Filter = ();

    const PATH: &'static str = "private/users";
    const NAME: &'static str = "users";

    fn filter_params(_: &()) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn resolve_assets(user: &mut User, base: &Url) {
        resolve_optional(&mut user.profile, base);
    }
}

// ── Public templates ─────────────────────────────────────────────────

pub struct PublicTemplates;

impl Resource for PublicTemplates {
    type Entity = PublicTemplate;
    type Filter = ();

    const PATH: &'static str = "private/public-templates";
    const NAME: &'static str = "public templates";

    fn filter_params(_: &()) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn resolve_assets(template: &mut PublicTemplate, base: &Url) {
        resolve_optional(&mut template.cover_image, base);
    }
}

impl Creatable for PublicTemplates {
    type Payload = CreatePublicTemplateRequest;

    const INSERT: InsertPosition = InsertPosition::Append;

    fn encode_create(req: &CreatePublicTemplateRequest) -> Result<RequestBody, CoreError> {
        let form = req
            .tags
            .iter()
            .fold(
                FormData::new()
                    .text("name", &req.name)
                    .text("description", &req.description)
                    .text("price", req.price.to_string())
                    .text("price_interval", &req.price_interval)
                    .text("state", req.state.to_string())
                    .text("type", &req.kind),
                |form, tag| form.text("tags", tag),
            )
            .optional_file("cover_image", req.cover_image.as_ref())
            .optional_file("zip_file", req.zip_file.as_ref());
        Ok(RequestBody::Multipart(form))
    }
}

// ── User templates ───────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserTemplateFilter {
    pub user_id: Option<EntityId>,
}

pub struct UserTemplates;

impl Resource for UserTemplates {
    type Entity = UserTemplate;
    type Filter = UserTemplateFilter;

    const PATH: &'static str = "private/user-templates";
    const NAME: &'static str = "user templates";

    fn filter_params(filter: &UserTemplateFilter) -> Vec<(&'static str, String)> {
        // The backend expects the key even when empty.
        vec![(
            "user_id",
            filter
                .user_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        )]
    }

    fn resolve_assets(template: &mut UserTemplate, base: &Url) {
        resolve_optional(&mut template.cover_image, base);
    }
}

impl Creatable for UserTemplates {
    type Payload = CreateUserTemplateRequest;

    const INSERT: InsertPosition = InsertPosition::Prepend;

    fn encode_create(req: &CreateUserTemplateRequest) -> Result<RequestBody, CoreError> {
        let message_template = serde_json::to_string(&req.message_template)
            .map_err(|e| CoreError::Internal(format!("encoding message_template: {e}")))?;
        let form = FormData::new()
            .text("base_template_id", req.base_template_id.as_str())
            .text("name", &req.name)
            .text(
                "expire_at",
                req.expire_at.format(EXPIRE_AT_FORMAT).to_string(),
            )
            .text("slug", &req.slug)
            .text("url", &req.url)
            .text("message_template", message_template)
            .optional_file("cover_image", req.cover_image.as_ref())
            .optional_file("zip_file", req.zip_file.as_ref());
        Ok(RequestBody::Multipart(form))
    }
}

// ── Guests ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestFilter {
    pub user_template_id: Option<EntityId>,
}

pub struct Guests;

impl Resource for Guests {
    type Entity = Guest;
    type Filter = GuestFilter;

    const PATH: &'static str = "private/guests";
    const NAME: &'static str = "guests";
    const LOCAL_FIELDS: &'static [&'static str] = &["tags"];

    fn filter_params(filter: &GuestFilter) -> Vec<(&'static str, String)> {
        vec![(
            "user_template_id",
            filter
                .user_template_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        )]
    }
}

impl Creatable for Guests {
    type Payload = CreateGuestRequest;

    const INSERT: InsertPosition = InsertPosition::Append;

    fn encode_create(req: &CreateGuestRequest) -> Result<RequestBody, CoreError> {
        Ok(RequestBody::Json(to_json(req)?))
    }

    /// Reload the guest list of the template the guest was added to.
    fn refresh_query(
        req: &CreateGuestRequest,
        last: Option<ListQuery<GuestFilter>>,
    ) -> Option<ListQuery<GuestFilter>> {
        let filter = GuestFilter {
            user_template_id: Some(req.user_template_id.clone()),
        };
        Some(match last {
            Some(query) if query.filter.user_template_id == filter.user_template_id => query,
            Some(query) => ListQuery {
                page: 1,
                limit: query.limit,
                filter,
            },
            None => ListQuery {
                page: 1,
                limit: GUEST_REFRESH_LIMIT,
                filter,
            },
        })
    }
}

impl Updatable for Guests {
    type Patch = UpdateGuestRequest;

    /// Tags travel as a JSON-encoded string on update. Untouched tags are
    /// left out so the backend keeps its own.
    fn encode_update(patch: &UpdateGuestRequest) -> Result<RequestBody, CoreError> {
        let mut body = to_json(patch)?;
        if let (Some(tags), Value::Object(map)) = (patch.tags.as_ref(), &mut body) {
            let tags = serde_json::to_string(tags)
                .map_err(|e| CoreError::Internal(format!("encoding tags: {e}")))?;
            map.insert("tags".into(), Value::String(tags));
        }
        Ok(RequestBody::Json(body))
    }
}

impl Deletable for Guests {}

impl EntityStore<Guests> {
    /// Guests in the current list that belong to `template_id`.
    pub fn guests_for_template(&self, template_id: &EntityId) -> Vec<Guest> {
        self.snapshot()
            .items
            .iter()
            .filter(|g| &g.user_template_id == template_id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::{MessageTemplate, Upload};

    fn base() -> Url {
        Url::parse("http://localhost:8085/").unwrap()
    }

    fn form(body: RequestBody) -> FormData {
        match body {
            RequestBody::Multipart(form) => form,
            RequestBody::Json(v) => panic!("expected multipart, got JSON {v}"),
        }
    }

    fn json_body(body: RequestBody) -> Value {
        match body {
            RequestBody::Json(v) => v,
            RequestBody::Multipart(f) => panic!("expected JSON, got {f:?}"),
        }
    }

    #[test]
    fn relative_assets_gain_the_base() {
        assert_eq!(
            resolve_asset("uploads/cover.jpg", &base()),
            "http://localhost:8085/uploads/cover.jpg"
        );
        assert_eq!(
            resolve_asset("/uploads/cover.jpg", &base()),
            "http://localhost:8085/uploads/cover.jpg"
        );
    }

    #[test]
    fn absolute_and_empty_assets_are_untouched() {
        let cdn = "https://cdn.example.com/a.png";
        assert_eq!(resolve_asset(cdn, &base()), cdn);
        assert_eq!(resolve_asset("", &base()), "");
    }

    #[test]
    fn user_profile_is_resolved() {
        let mut user: User =
            serde_json::from_value(json!({ "id": "u1", "profile": "uploads/me.png" })).unwrap();
        Users::resolve_assets(&mut user, &base());
        assert_eq!(
            user.profile.as_deref(),
            Some("http://localhost:8085/uploads/me.png")
        );
    }

    #[test]
    fn public_template_form_repeats_tags() {
        let req = CreatePublicTemplateRequest {
            name: "Rustic Charm".into(),
            description: "Warm and earthy".into(),
            price: 150_000,
            price_interval: "once".into(),
            state: 1,
            kind: "premium".into(),
            tags: vec!["rustic".into(), "outdoor".into()],
            cover_image: Some(Upload::new("cover.jpg", vec![1, 2, 3])),
            zip_file: None,
        };
        let form = form(PublicTemplates::encode_create(&req).unwrap());

        assert_eq!(form.texts("tags").collect::<Vec<_>>(), vec!["rustic", "outdoor"]);
        assert_eq!(form.texts("price").collect::<Vec<_>>(), vec!["150000"]);
        assert_eq!(form.texts("type").collect::<Vec<_>>(), vec!["premium"]);
        assert_eq!(form.file_named("cover_image").unwrap().file_name, "cover.jpg");
        assert!(form.file_named("zip_file").is_none());
    }

    #[test]
    fn user_template_form_encodes_expiry_and_messages() {
        let req = CreateUserTemplateRequest {
            base_template_id: "t-1".into(),
            name: "Ayu & Bayu".into(),
            expire_at: Utc.with_ymd_and_hms(2026, 6, 1, 10, 30, 0).unwrap(),
            slug: "ayu-bayu".into(),
            url: "https://wedly.id/ayu-bayu".into(),
            message_template: vec![MessageTemplate {
                text: "Dear {name}".into(),
                provider: "whatsapp".into(),
            }],
            cover_image: None,
            zip_file: Some(Upload::new("site.zip", vec![0x50, 0x4B])),
        };
        let form = form(UserTemplates::encode_create(&req).unwrap());

        assert_eq!(
            form.texts("expire_at").collect::<Vec<_>>(),
            vec!["2026-06-01T10:30:00Z"]
        );
        let messages: Value =
            serde_json::from_str(form.texts("message_template").next().unwrap()).unwrap();
        assert_eq!(
            messages,
            json!([{ "text": "Dear {name}", "provider": "whatsapp" }])
        );
        assert!(form.file_named("zip_file").is_some());
    }

    #[test]
    fn guest_update_sends_tags_as_a_string() {
        let patch = UpdateGuestRequest {
            name: Some("Citra".into()),
            tags: Some(vec!["vip".into()]),
            ..UpdateGuestRequest::default()
        };
        let body = json_body(Guests::encode_update(&patch).unwrap());
        assert_eq!(body, json!({ "name": "Citra", "tags": "[\"vip\"]" }));

        let cleared = UpdateGuestRequest {
            tags: Some(Vec::new()),
            ..UpdateGuestRequest::default()
        };
        let body = json_body(Guests::encode_update(&cleared).unwrap());
        assert_eq!(body, json!({ "tags": "[]" }));
    }

    #[test]
    fn guest_update_leaves_out_untouched_tags() {
        let patch = UpdateGuestRequest {
            name: Some("Citra".into()),
            ..UpdateGuestRequest::default()
        };
        let body = json_body(Guests::encode_update(&patch).unwrap());
        assert_eq!(body, json!({ "name": "Citra" }));
    }

    #[test]
    fn guest_refresh_follows_the_payload_template() {
        let req = CreateGuestRequest {
            user_template_id: "t-2".into(),
            name: "Dewi".into(),
            ..CreateGuestRequest::default()
        };
        let listed = ListQuery {
            page: 3,
            limit: 20,
            filter: GuestFilter {
                user_template_id: Some("t-1".into()),
            },
        };

        let query = Guests::refresh_query(&req, Some(listed.clone())).unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 20);
        assert_eq!(query.filter.user_template_id, Some("t-2".into()));

        let same = ListQuery {
            filter: GuestFilter {
                user_template_id: Some("t-2".into()),
            },
            ..listed
        };
        assert_eq!(Guests::refresh_query(&req, Some(same.clone())), Some(same));

        let fresh = Guests::refresh_query(&req, None).unwrap();
        assert_eq!((fresh.page, fresh.limit), (1, GUEST_REFRESH_LIMIT));
    }

    #[test]
    fn filters_always_carry_their_key() {
        assert_eq!(
            Guests::filter_params(&GuestFilter::default()),
            vec![("user_template_id", String::new())]
        );
        let filter = UserTemplateFilter {
            user_id: Some("u-7".into()),
        };
        assert_eq!(
            UserTemplates::filter_params(&filter),
            vec![("user_id", "u-7".to_owned())]
        );
    }
}
