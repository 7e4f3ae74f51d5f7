//! Schemaless document values and merge-patch semantics.

use serde::Serialize;
use serde_json::{Map, Value};

/// A stored document: the top-level field map of a JSON object.
pub type Document = Map<String, Value>;

/// A merge write against a single document.
///
/// `fields` are merged into the stored document with [`merge_fields`].
/// Every name in `server_timestamps` is then set by the store to its own
/// current time, so clients never supply those values. A dotted name such as
/// `photo.updatedAt` addresses a nested field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentPatch {
    pub fields: Document,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub server_timestamps: Vec<String>,
}

impl DocumentPatch {
    pub fn new(fields: Document) -> Self {
        Self {
            fields,
            server_timestamps: Vec::new(),
        }
    }

    /// Marks a field to be stamped with the store's clock.
    pub fn with_server_timestamp(mut self, field: impl Into<String>) -> Self {
        self.server_timestamps.push(field.into());
        self
    }

    /// True when the patch would change nothing besides timestamps.
    pub fn has_field_updates(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Applies the patch to `target`, using `now` for server timestamps.
    pub fn apply_to(&self, target: &mut Document, now: &str) {
        merge_fields(target, &self.fields);
        for path in &self.server_timestamps {
            set_path(target, path, Value::String(now.to_string()));
        }
    }
}

/// Sets the dotted `path`, replacing any non-object on the way with an object.
fn set_path(target: &mut Document, path: &str, value: Value) {
    let (parent, leaf) = match path.split_once('.') {
        None => {
            target.insert(path.to_string(), value);
            return;
        }
        Some(split) => split,
    };

    let slot = target
        .entry(parent.to_string())
        .or_insert_with(|| Value::Object(Document::new()));
    if !slot.is_object() {
        *slot = Value::Object(Document::new());
    }
    if let Value::Object(nested) = slot {
        set_path(nested, leaf, value);
    }
}

/// Merges `patch` into `target`.
///
/// Objects present on both sides merge key-by-key, recursively. Any other
/// value (array, scalar, null) replaces what was stored. Keys missing from
/// `patch` are left untouched.
pub fn merge_fields(target: &mut Document, patch: &Document) {
    for (key, value) in patch {
        if let (Some(Value::Object(existing)), Value::Object(incoming)) =
            (target.get_mut(key), value)
        {
            merge_fields(existing, incoming);
            continue;
        }
        target.insert(key.clone(), value.clone());
    }
}
