// ── Typed payloads for write operations ──
//
// These are the values callers hand to `EntityStore::create` / `update`.
// Their JSON form doubles as the local view of what was sent, which is
// merged with whatever the backend echoes back. File uploads never take
// part in that merge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, MessageTemplate, Upload};

// ── Public templates ───────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreatePublicTemplateRequest {
    pub name: String,
    pub description: String,
    pub price: i64,
    pub price_interval: String,
    pub state: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub tags: Vec<String>,
    #[serde(skip)]
    pub cover_image: Option<Upload>,
    #[serde(skip)]
    pub zip_file: Option<Upload>,
}

// ── User templates ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct CreateUserTemplateRequest {
    pub base_template_id: EntityId,
    pub name: String,
    pub expire_at: DateTime<Utc>,
    pub slug: String,
    pub url: String,
    pub message_template: Vec<MessageTemplate>,
    #[serde(skip)]
    pub cover_image: Option<Upload>,
    #[serde(skip)]
    pub zip_file: Option<Upload>,
}

// ── Guests ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateGuestRequest {
    pub user_template_id: EntityId,
    pub name: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub person: i32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub telp: String,
    #[serde(default)]
    pub address: String,
}

/// Partial guest update. Only the supplied fields are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateGuestRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attend: Option<bool>,
}

impl UpdateGuestRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.group.is_none()
            && self.person.is_none()
            && self.tags.is_none()
            && self.telp.is_none()
            && self.address.is_none()
            && self.message.is_none()
            && self.attend.is_none()
    }
}
