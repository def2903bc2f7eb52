#![allow(clippy::unwrap_used)]
// Entity store behavior against a mock backend.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use futures_util::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wedly_core::{
    Console, ConsoleConfig, CoreError, CreateGuestRequest, CreateUserTemplateRequest, EntityId,
    GuestFilter, MemoryTokenStore, MessageTemplate, SyncStatus, UpdateGuestRequest,
    UserTemplateFilter,
};

// ── Helpers ─────────────────────────────────────────────────────────

const TOKEN: &str = "tok-123";

async fn setup() -> (MockServer, Console) {
    let server = MockServer::start().await;
    let config = ConsoleConfig::new(Url::parse(&server.uri()).unwrap());
    let console = Console::new(config, Arc::new(MemoryTokenStore::with_token(TOKEN))).unwrap();

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-1", "email": "a@b.com", "name": "Admin", "role": 1, "is_active": true
        })))
        .mount(&server)
        .await;
    console.initialize().await.unwrap();

    (server, console)
}

async fn logged_out() -> (MockServer, Console) {
    let server = MockServer::start().await;
    let config = ConsoleConfig::new(Url::parse(&server.uri()).unwrap());
    let console = Console::new(config, Arc::new(MemoryTokenStore::new())).unwrap();
    (server, console)
}

fn guest(id: &str, name: &str) -> Value {
    json!({ "id": id, "user_template_id": "t-1", "name": name, "tags": ["family"] })
}

fn guests_page(ids: &[&str], total: u64) -> Value {
    json!({
        "data": ids.iter().map(|id| guest(id, &format!("Guest {id}"))).collect::<Vec<_>>(),
        "total": total
    })
}

fn by_template() -> GuestFilter {
    GuestFilter {
        user_template_id: Some("t-1".into()),
    }
}

async fn mount_guest_page(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/private/guests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn ids(console: &Console) -> Vec<String> {
    console
        .guests()
        .snapshot()
        .items
        .iter()
        .map(|g| g.id.to_string())
        .collect()
}

async fn requests_to(server: &MockServer, route: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == route)
        .count()
}

// ── fetch_list ──────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_list_replaces_items_and_total() {
    let (server, console) = setup().await;
    let page: Vec<String> = (1..=10).map(|n| format!("g-{n}")).collect();
    let page_ids: Vec<&str> = page.iter().map(String::as_str).collect();

    Mock::given(method("GET"))
        .and(path("/private/guests"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "10"))
        .and(query_param("user_template_id", "t-1"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(guests_page(&page_ids, 25)))
        .mount(&server)
        .await;

    assert_eq!(console.guests().status(), SyncStatus::Idle);
    console.guests().fetch_list(1, 10, by_template()).await.unwrap();

    let list = console.guests().snapshot();
    assert_eq!(list.items.len(), 10);
    assert_eq!(list.total, 25);
    assert_eq!(console.guests().status(), SyncStatus::Loaded);
    assert_eq!(console.guests().last_query().unwrap().limit, 10);
}

#[tokio::test]
async fn fetch_list_discards_previous_page() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/private/guests"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(guests_page(&["a", "b"], 4)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/private/guests"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(guests_page(&["c", "d"], 4)))
        .mount(&server)
        .await;

    console.guests().fetch_list(1, 2, by_template()).await.unwrap();
    console.guests().fetch_list(2, 2, by_template()).await.unwrap();
    assert_eq!(ids(&console), vec!["c", "d"]);
}

#[tokio::test]
async fn repeated_fetch_is_idempotent() {
    let (server, console) = setup().await;
    mount_guest_page(&server, guests_page(&["a", "b"], 2)).await;

    console.guests().fetch_list(1, 10, by_template()).await.unwrap();
    let first = console.guests().snapshot();
    console.guests().fetch_list(1, 10, by_template()).await.unwrap();
    assert_eq!(*console.guests().snapshot(), *first);
}

#[tokio::test]
async fn failed_fetch_keeps_state_and_records_error() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/private/guests"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(guests_page(&["a"], 1)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/private/guests"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": 400, "message": "get template list error", "error": "bad page"
        })))
        .mount(&server)
        .await;

    console.guests().fetch_list(1, 10, by_template()).await.unwrap();
    let err = console
        .guests()
        .fetch_list(2, 10, by_template())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(ids(&console), vec!["a"]);
    assert_eq!(console.guests().total(), 1);
    assert!(matches!(console.guests().status(), SyncStatus::Failed(msg) if msg.contains("bad page")));
}

#[tokio::test]
async fn missing_total_decodes_as_zero() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/private/user-templates"))
        .and(query_param("user_id", "u-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "ut-1", "name": "Ayu & Bayu", "cover_image": "uploads/c.jpg" }]
        })))
        .mount(&server)
        .await;

    let filter = UserTemplateFilter {
        user_id: Some("u-9".into()),
    };
    console.user_templates().fetch_list(1, 100, filter).await.unwrap();

    let list = console.user_templates().snapshot();
    assert_eq!(list.items.len(), 1);
    assert_eq!(list.total, 0);
    assert_eq!(
        list.items[0].cover_image.as_deref(),
        Some(format!("{}/uploads/c.jpg", server.uri()).as_str())
    );
}

#[tokio::test]
async fn superseded_fetch_does_not_overwrite() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/private/guests"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(guests_page(&["slow"], 1))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/private/guests"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(guests_page(&["fast"], 1)))
        .mount(&server)
        .await;

    let store = console.guests();
    let (older, newer) = tokio::join!(
        store.fetch_list(1, 10, by_template()),
        store.fetch_list(2, 10, by_template()),
    );
    older.unwrap();
    newer.unwrap();

    assert_eq!(ids(&console), vec!["fast"]);
    assert_eq!(store.last_query().unwrap().page, 2);
}

#[tokio::test]
async fn unauthorized_response_invalidates_session() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/private/users"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid token"))
        .mount(&server)
        .await;

    let err = console.users().fetch_list(1, 10, ()).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(!console.session().is_authenticated());
    assert!(console.session().active_user().is_none());
}

// ── Authorization precondition ──────────────────────────────────────

#[tokio::test]
async fn actions_without_token_fail_before_any_request() {
    let (server, console) = logged_out().await;
    let id = EntityId::from("g-1");

    let fetch = console.guests().fetch_list(1, 10, by_template()).await;
    let create = console.guests().create(CreateGuestRequest::default()).await;
    let update = console
        .guests()
        .update(&id, UpdateGuestRequest::default())
        .await;
    let delete = console.guests().delete(&id).await;
    let users = console.users().fetch_list(1, 10, ()).await;

    assert!(matches!(fetch, Err(CoreError::Unauthorized)));
    assert!(matches!(create, Err(CoreError::Unauthorized)));
    assert!(matches!(update, Err(CoreError::Unauthorized)));
    assert!(matches!(delete, Err(CoreError::Unauthorized)));
    assert!(matches!(users, Err(CoreError::Unauthorized)));
    assert!(server.received_requests().await.unwrap().is_empty());
    assert_eq!(console.guests().status(), SyncStatus::Idle);
}

// ── create ──────────────────────────────────────────────────────────

#[tokio::test]
async fn create_appends_and_counts() {
    let (server, console) = setup().await;
    mount_guest_page(&server, guests_page(&["a", "b"], 12)).await;
    console.guests().fetch_list(1, 10, by_template()).await.unwrap();

    Mock::given(method("POST"))
        .and(path("/private/guests"))
        .and(body_json(json!({
            "user_template_id": "t-1",
            "name": "T1",
            "group": "",
            "person": 2,
            "tags": [],
            "telp": "",
            "address": ""
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "99", "name": "T1" })))
        .expect(1)
        .mount(&server)
        .await;

    let created = console
        .guests()
        .create(CreateGuestRequest {
            user_template_id: "t-1".into(),
            name: "T1".into(),
            person: 2,
            ..CreateGuestRequest::default()
        })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(created.id.as_str(), "99");
    assert_eq!(created.person, 2);
    assert_eq!(ids(&console), vec!["a", "b", "99"]);
    assert_eq!(console.guests().total(), 13);
}

#[tokio::test]
async fn create_without_record_refetches_current_page() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/private/guests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(guests_page(&["a"], 1)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/private/guests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(guests_page(&["a", "new"], 2)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/private/guests"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .mount(&server)
        .await;

    console.guests().fetch_list(1, 10, by_template()).await.unwrap();
    let created = console
        .guests()
        .create(CreateGuestRequest {
            user_template_id: "t-1".into(),
            name: "New".into(),
            ..CreateGuestRequest::default()
        })
        .await
        .unwrap();

    assert!(created.is_none());
    assert_eq!(ids(&console), vec!["a", "new"]);
    assert_eq!(console.guests().total(), 2);
    assert_eq!(requests_to(&server, "/private/guests").await, 3);
}

#[tokio::test]
async fn create_without_record_reloads_the_guest_template() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/private/guests"))
        .and(query_param("user_template_id", "t-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(guests_page(&["a"], 1)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/private/guests"))
        .and(query_param("user_template_id", "t-2"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "b", "user_template_id": "t-2", "name": "Dewi" }],
            "total": 1
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/private/guests"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .mount(&server)
        .await;

    console.guests().fetch_list(2, 10, by_template()).await.unwrap();
    let created = console
        .guests()
        .create(CreateGuestRequest {
            user_template_id: "t-2".into(),
            name: "Dewi".into(),
            ..CreateGuestRequest::default()
        })
        .await
        .unwrap();

    assert!(created.is_none());
    assert_eq!(ids(&console), vec!["b"]);
    let query = console.guests().last_query().unwrap();
    assert_eq!(query.filter.user_template_id, Some("t-2".into()));
    assert_eq!(query.page, 1);
}

#[tokio::test]
async fn failed_create_changes_nothing() {
    let (server, console) = setup().await;
    mount_guest_page(&server, guests_page(&["a"], 1)).await;
    console.guests().fetch_list(1, 10, by_template()).await.unwrap();
    let before = console.guests().snapshot();

    Mock::given(method("POST"))
        .and(path("/private/guests"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": 400, "message": "Validation failed", "error": "name is required"
        })))
        .mount(&server)
        .await;

    let err = console
        .guests()
        .create(CreateGuestRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(*console.guests().snapshot(), *before);
    assert_eq!(console.guests().status(), SyncStatus::Loaded);
}

#[tokio::test]
async fn user_template_create_prepends_multipart_record() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/private/user-templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "ut-1", "name": "Existing" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/private/user-templates"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "ut-2",
            "cover_image": "uploads/ayu.jpg"
        })))
        .mount(&server)
        .await;

    console
        .user_templates()
        .fetch_list(1, 100, UserTemplateFilter::default())
        .await
        .unwrap();

    let created = console
        .user_templates()
        .create(CreateUserTemplateRequest {
            base_template_id: "t-1".into(),
            name: "Ayu & Bayu".into(),
            expire_at: Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap(),
            slug: "ayu-bayu".into(),
            url: "https://wedly.id/ayu-bayu".into(),
            message_template: vec![MessageTemplate {
                text: "Dear {name}".into(),
                provider: "whatsapp".into(),
            }],
            cover_image: None,
            zip_file: None,
        })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(created.name, "Ayu & Bayu");
    assert_eq!(created.message_template["whatsapp"].text, "Dear {name}");
    assert_eq!(
        created.cover_image.as_deref(),
        Some(format!("{}/uploads/ayu.jpg", server.uri()).as_str())
    );

    let list = console.user_templates().snapshot();
    let names: Vec<&str> = list.items.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(names, vec!["ut-2", "ut-1"]);
    assert_eq!(list.total, 1);

    let posted = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.method.as_str() == "POST")
        .unwrap();
    let body = String::from_utf8_lossy(&posted.body);
    assert!(body.contains("2026-06-01T00:00:00Z"), "{body}");
    assert!(body.contains(r#"[{"text":"Dear {name}","provider":"whatsapp"}]"#), "{body}");
}

// ── update ──────────────────────────────────────────────────────────

#[tokio::test]
async fn update_merges_server_patch_and_old() {
    let (server, console) = setup().await;
    mount_guest_page(
        &server,
        json!({
            "data": [{
                "id": "g-1", "user_template_id": "t-1", "name": "Ayu",
                "group": "family", "telp": "0812", "tags": ["family"]
            }],
            "total": 1
        }),
    )
    .await;
    console.guests().fetch_list(1, 10, by_template()).await.unwrap();

    Mock::given(method("PUT"))
        .and(path("/private/guests/g-1"))
        .and(body_json(json!({ "name": "Ayu W.", "address": "Jl. Mawar", "tags": "[\"vip\"]" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "g-1",
            "name": "Ayu Wulandari",
            "tags": "[\"ignored\"]",
            "address": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let updated = console
        .guests()
        .update(
            &"g-1".into(),
            UpdateGuestRequest {
                name: Some("Ayu W.".into()),
                address: Some("Jl. Mawar".into()),
                tags: Some(vec!["vip".into()]),
                ..UpdateGuestRequest::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    // server wins for name, patch fills address, tags stay local, rest is old
    assert_eq!(updated.name, "Ayu Wulandari");
    assert_eq!(updated.address, "Jl. Mawar");
    assert_eq!(updated.tags, vec!["vip"]);
    assert_eq!(updated.group, "family");
    assert_eq!(updated.telp, "0812");
    assert_eq!(console.guests().find(&"g-1".into()).unwrap(), updated);
    assert_eq!(console.guests().total(), 1);
}

#[tokio::test]
async fn update_without_tags_leaves_them_out_of_the_body() {
    let (server, console) = setup().await;
    mount_guest_page(&server, guests_page(&["g-1"], 1)).await;
    console.guests().fetch_list(1, 10, by_template()).await.unwrap();

    Mock::given(method("PUT"))
        .and(path("/private/guests/g-1"))
        .and(body_json(json!({ "name": "X" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "g-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let updated = console
        .guests()
        .update(
            &"g-1".into(),
            UpdateGuestRequest {
                name: Some("X".into()),
                ..UpdateGuestRequest::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.name, "X");
    assert_eq!(updated.tags, vec!["family"]);
}

#[tokio::test]
async fn update_of_unlisted_id_leaves_list_alone() {
    let (server, console) = setup().await;
    mount_guest_page(&server, guests_page(&["a"], 1)).await;
    console.guests().fetch_list(1, 10, by_template()).await.unwrap();
    let before = console.guests().snapshot();

    Mock::given(method("PUT"))
        .and(path("/private/guests/zzz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let updated = console
        .guests()
        .update(&"zzz".into(), UpdateGuestRequest::default())
        .await
        .unwrap();
    assert!(updated.is_none());
    assert_eq!(*console.guests().snapshot(), *before);
}

// ── delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_but_keeps_total() {
    let (server, console) = setup().await;
    mount_guest_page(&server, guests_page(&["a", "b"], 9)).await;
    console.guests().fetch_list(1, 10, by_template()).await.unwrap();

    Mock::given(method("DELETE"))
        .and(path("/private/guests/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    console.guests().delete(&"a".into()).await.unwrap();
    assert_eq!(ids(&console), vec!["b"]);
    assert!(console.guests().find(&"a".into()).is_none());
    assert_eq!(console.guests().total(), 9);
}

#[tokio::test]
async fn failed_delete_keeps_the_record() {
    let (server, console) = setup().await;
    mount_guest_page(&server, guests_page(&["a"], 1)).await;
    console.guests().fetch_list(1, 10, by_template()).await.unwrap();

    Mock::given(method("DELETE"))
        .and(path("/private/guests/a"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = console.guests().delete(&"a".into()).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(ids(&console), vec!["a"]);
}

// ── Lookups and subscriptions ───────────────────────────────────────

#[tokio::test]
async fn guests_for_template_filters_current_list() {
    let (server, console) = setup().await;
    mount_guest_page(
        &server,
        json!({
            "data": [
                { "id": "a", "user_template_id": "t-1", "name": "Ayu" },
                { "id": "b", "user_template_id": "t-2", "name": "Bayu" },
                { "id": "c", "user_template_id": "t-1", "name": "Citra" }
            ],
            "total": 3
        }),
    )
    .await;
    console
        .guests()
        .fetch_list(1, 10, GuestFilter::default())
        .await
        .unwrap();

    let names: Vec<String> = console
        .guests()
        .guests_for_template(&"t-1".into())
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(names, vec!["Ayu", "Citra"]);
}

#[tokio::test]
async fn subscribers_see_each_mutation() {
    let (server, console) = setup().await;
    mount_guest_page(&server, guests_page(&["a", "b"], 2)).await;
    Mock::given(method("DELETE"))
        .and(path("/private/guests/a"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut updates = console.guests().subscribe().into_stream();
    let mut watcher = console.guests().subscribe();
    assert!(watcher.current().is_empty());

    console.guests().fetch_list(1, 10, by_template()).await.unwrap();
    let fetched = updates.next().await.unwrap();
    assert_eq!(fetched.len(), 2);

    console.guests().delete(&"a".into()).await.unwrap();
    let after_delete = updates.next().await.unwrap();
    assert_eq!(after_delete.len(), 1);
    assert_eq!(after_delete.total, 2);

    let latest = watcher.changed().await.unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(watcher.latest().len(), 1);
}
