use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// The user-authored topic, key points, and script text.
///
/// Persisted across sessions through the key-value store; every field defaults
/// to empty text and is reset to empty only on an explicit restart. Wire field
/// names match the stored shape (`topic`, `keyPoints`, `script`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PodcastDraft {
    pub topic: String,
    pub key_points: String,
    pub script: String,
}

impl PodcastDraft {
    pub fn is_empty(&self) -> bool {
        self.topic.is_empty() && self.key_points.is_empty() && self.script.is_empty()
    }

    /// Parse a stored draft, tolerating legacy shapes.
    ///
    /// Early versions of the stored record carried extra fields (for example an
    /// embedded base64 recording). Those are stripped here; missing or
    /// non-string fields fall back to empty text. Returns the clean draft and
    /// whether the stored value should be rewritten in the clean shape.
    pub fn from_stored(raw: &str) -> (PodcastDraft, bool) {
        let value: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                warn!("stored draft is not valid JSON ({}), starting empty", e);
                return (PodcastDraft::default(), true);
            }
        };

        let map = match value {
            Value::Object(map) => map,
            other => {
                warn!(
                    "stored draft has unexpected type ({}), starting empty",
                    type_name(&other)
                );
                return (PodcastDraft::default(), true);
            }
        };

        let field = |key: &str| -> (String, bool) {
            match map.get(key) {
                Some(Value::String(s)) => (s.clone(), false),
                Some(_) => (String::new(), true),
                None => (String::new(), true),
            }
        };

        let (topic, t_dirty) = field("topic");
        let (key_points, k_dirty) = field("keyPoints");
        let (script, s_dirty) = field("script");

        let has_extras = map
            .keys()
            .any(|k| !matches!(k.as_str(), "topic" | "keyPoints" | "script"));
        if has_extras {
            warn!("stored draft carries obsolete fields, normalizing to the clean shape");
        }

        let draft = PodcastDraft {
            topic,
            key_points,
            script,
        };
        (draft, has_extras || t_dirty || k_dirty || s_dirty)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
