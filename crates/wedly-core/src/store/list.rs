// ── Entity list and its reducers ──
//
// Every store mutation is one of the pure functions below, applied to the
// current list after the backend call resolved. They know nothing about
// HTTP and are tested directly.

use serde_json::{Map, Value};

use crate::model::{EntityId, Keyed, Page};

/// The most recently fetched page of a resource plus the server total.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityList<T> {
    pub items: Vec<T>,
    /// Total across all pages, as reported by the backend.
    pub total: u64,
}

impl<T> Default for EntityList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

impl<T: Keyed> EntityList<T> {
    pub fn find(&self, id: &EntityId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Where a newly created entity lands in the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Prepend,
    Append,
}

/// Replace the list wholesale with a fetched page.
pub fn apply_page<T>(page: Page<T>) -> EntityList<T> {
    EntityList {
        items: page.data,
        total: page.total,
    }
}

pub fn apply_created<T>(list: &mut EntityList<T>, entity: T, position: InsertPosition) {
    match position {
        InsertPosition::Prepend => list.items.insert(0, entity),
        InsertPosition::Append => list.items.push(entity),
    }
    list.total += 1;
}

/// Replace the element carrying `entity`'s id. Returns `false` (and leaves
/// the list alone) when no element matches.
pub fn apply_updated<T: Keyed>(list: &mut EntityList<T>, entity: T) -> bool {
    match list.items.iter_mut().find(|item| item.id() == entity.id()) {
        Some(slot) => {
            *slot = entity;
            true
        }
        None => false,
    }
}

/// Remove the element with `id`. `total` is left as reported by the last
/// fetch.
pub fn apply_deleted<T: Keyed>(list: &mut EntityList<T>, id: &EntityId) -> bool {
    let before = list.items.len();
    list.items.retain(|item| item.id() != id);
    list.items.len() != before
}

// ── Merge ────────────────────────────────────────────────────────────

/// Combine a local record with a server response and the patch that
/// produced it.
///
/// Starting from `old`, non-null server fields win. Patch fields fill in
/// whatever the server left out or sent as `null`. Names in `local_fields`
/// never come from the server: the patch value is used when supplied,
/// otherwise the old one is kept.
pub fn merge(old: &Value, server: &Value, patch: &Value, local_fields: &[&str]) -> Value {
    let is_local = |key: &str| local_fields.contains(&key);
    let empty = Map::new();
    let server = server.as_object().unwrap_or(&empty);
    let patch = patch.as_object().unwrap_or(&empty);

    let mut merged = old.as_object().cloned().unwrap_or_default();

    for (key, value) in server {
        if !value.is_null() && !is_local(key) {
            merged.insert(key.clone(), value.clone());
        }
    }

    for (key, value) in patch {
        let server_has = server.get(key).is_some_and(|v| !v.is_null());
        if !value.is_null() && (is_local(key) || !server_has) {
            merged.insert(key.clone(), value.clone());
        }
    }

    Value::Object(merged)
}

/// A record is only insertable once it carries a non-empty id.
pub(crate) fn has_identity(record: &Value) -> bool {
    match record.get("id") {
        Some(Value::String(id)) => !id.is_empty(),
        Some(Value::Number(_)) => true,
        _ => false,
    }
}
