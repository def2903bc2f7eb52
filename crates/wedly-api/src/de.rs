// Lenient deserializers for backend payloads.
//
// The backend is written in Go: empty slices and maps arrive as `null`,
// and a few fields come back in more than one encoding depending on the
// endpoint that produced them.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

use crate::types::MessageTemplate;

/// Treat an explicit `null` as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Tags arrive as a JSON array from list endpoints, but the guest update
/// endpoint accepts (and may echo back) them as a JSON-encoded string.
pub(crate) fn tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Encoded(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(Raw::List(tags)) => Ok(tags),
        Some(Raw::Encoded(s)) if s.trim().is_empty() => Ok(Vec::new()),
        Some(Raw::Encoded(s)) => serde_json::from_str(&s).map_err(serde::de::Error::custom),
    }
}

/// Message templates are keyed by provider in list responses and sent as an
/// array on create. Accept either shape; the map form is canonical.
pub(crate) fn message_templates<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, MessageTemplate>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        ByProvider(BTreeMap<String, MessageTemplate>),
        List(Vec<MessageTemplate>),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => BTreeMap::new(),
        Some(Raw::ByProvider(map)) => map,
        Some(Raw::List(list)) => list
            .into_iter()
            .map(|m| (m.provider.clone(), m))
            .collect(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Deserialize)]
    struct Tagged {
        #[serde(default, deserialize_with = "tags")]
        tags: Vec<String>,
    }

    #[test]
    fn tags_accept_array_string_and_null() {
        let a: Tagged = serde_json::from_value(json!({ "tags": ["vip", "family"] })).unwrap();
        assert_eq!(a.tags, vec!["vip", "family"]);

        let b: Tagged = serde_json::from_value(json!({ "tags": "[\"vip\"]" })).unwrap();
        assert_eq!(b.tags, vec!["vip"]);

        let c: Tagged = serde_json::from_value(json!({ "tags": null })).unwrap();
        assert!(c.tags.is_empty());

        let d: Tagged = serde_json::from_value(json!({})).unwrap();
        assert!(d.tags.is_empty());
    }

    #[test]
    fn malformed_encoded_tags_are_rejected() {
        let result = serde_json::from_value::<Tagged>(json!({ "tags": "vip,family" }));
        assert!(result.is_err());
    }

    #[derive(Deserialize)]
    struct Messages {
        #[serde(default, deserialize_with = "message_templates")]
        message_template: BTreeMap<String, MessageTemplate>,
    }

    #[test]
    fn message_templates_accept_list_form() {
        let m: Messages = serde_json::from_value(json!({
            "message_template": [{ "text": "Dear {name}", "provider": "whatsapp" }]
        }))
        .unwrap();
        assert_eq!(m.message_template["whatsapp"].text, "Dear {name}");
    }
}
