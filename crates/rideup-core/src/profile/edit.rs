//! Profile edits made from the edit screen.

use serde_json::{Value, json};

use super::document::{Document, DocumentPatch};
use super::fields::field;
use crate::auth::Identity;

/// City written when the edit form leaves it blank.
pub const DEFAULT_CITY: &str = "Atlanta";

/// Longest public description kept, in characters.
pub const PUBLIC_DESCRIPTION_MAX_CHARS: usize = 40;

/// Content type of uploaded avatars, which are re-encoded as JPEG.
pub const AVATAR_CONTENT_TYPE: &str = "image/jpeg";

/// Values submitted by the profile edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileEdit {
    pub display_name: String,
    pub school: String,
    pub city: String,
    pub has_car: bool,
    pub public_description: String,
}

impl ProfileEdit {
    /// Prefills the form from a stored document, as the edit screen does.
    pub fn from_document(doc: &Document) -> Self {
        let text = |name: &str| {
            doc.get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            display_name: text(field::DISPLAY_NAME),
            school: text(field::SCHOOL),
            city: text(field::CITY),
            has_car: doc
                .get(field::HAS_CAR)
                .and_then(Value::as_bool)
                .unwrap_or(false),
            public_description: text(field::PUBLIC_DESCRIPTION),
        }
    }

    /// Builds the merge write for the edited fields.
    ///
    /// Text is trimmed, a blank city becomes [`DEFAULT_CITY`], and the
    /// description is cut to [`PUBLIC_DESCRIPTION_MAX_CHARS`] characters.
    pub fn to_patch(&self) -> DocumentPatch {
        let city = match self.city.trim() {
            "" => DEFAULT_CITY,
            city => city,
        };

        let mut fields = Document::new();
        fields.insert(field::DISPLAY_NAME.to_string(), json!(self.display_name.trim()));
        fields.insert(field::SCHOOL.to_string(), json!(self.school.trim()));
        fields.insert(field::CITY.to_string(), json!(city));
        fields.insert(field::HAS_CAR.to_string(), json!(self.has_car));
        fields.insert(
            field::PUBLIC_DESCRIPTION.to_string(),
            json!(clamp_description(self.public_description.trim())),
        );

        DocumentPatch::new(fields).with_server_timestamp(field::UPDATED_AT)
    }
}

/// Keeps at most [`PUBLIC_DESCRIPTION_MAX_CHARS`] characters of `text`.
pub fn clamp_description(text: &str) -> String {
    text.chars().take(PUBLIC_DESCRIPTION_MAX_CHARS).collect()
}

/// Storage object path of a user's avatar.
pub fn avatar_storage_path(identity: &Identity) -> String {
    format!("user_avatars/{}/avatar.jpg", identity)
}

/// Builds the merge write recording a freshly uploaded avatar.
pub fn photo_update_patch(identity: &Identity, download_url: &str) -> DocumentPatch {
    let mut photo = Document::new();
    photo.insert(
        field::photo::STORAGE_PATH.to_string(),
        json!(avatar_storage_path(identity)),
    );
    photo.insert(field::photo::CONTENT_TYPE.to_string(), json!(AVATAR_CONTENT_TYPE));

    let mut fields = Document::new();
    fields.insert(field::PHOTO_URL.to_string(), json!(download_url));
    fields.insert(field::PHOTO.to_string(), Value::Object(photo));

    DocumentPatch::new(fields)
        .with_server_timestamp(format!("{}.{}", field::PHOTO, field::photo::UPDATED_AT))
        .with_server_timestamp(field::UPDATED_AT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit(city: &str, description: &str) -> ProfileEdit {
        ProfileEdit {
            display_name: "  Ana ".to_string(),
            school: " Emory ".to_string(),
            city: city.to_string(),
            has_car: true,
            public_description: description.to_string(),
        }
    }

    #[test]
    fn test_patch_trims_fields() {
        let patch = edit(" Decatur ", "  Weekend carpools  ").to_patch();

        assert_eq!(patch.fields["displayName"], json!("Ana"));
        assert_eq!(patch.fields["school"], json!("Emory"));
        assert_eq!(patch.fields["city"], json!("Decatur"));
        assert_eq!(patch.fields["hasCar"], json!(true));
        assert_eq!(patch.fields["publicDescription"], json!("Weekend carpools"));
        assert_eq!(patch.server_timestamps, vec!["updatedAt".to_string()]);
        assert!(patch.fields.get("stats").is_none());
    }

    #[test]
    fn test_blank_city_defaults() {
        let patch = edit("   ", "").to_patch();
        assert_eq!(patch.fields["city"], json!("Atlanta"));
        assert_eq!(patch.fields["publicDescription"], json!(""));
    }

    #[test]
    fn test_description_is_clamped_by_characters() {
        let long = "a".repeat(41);
        assert_eq!(clamp_description(&long).chars().count(), 40);
        assert_eq!(clamp_description("short"), "short");

        let multibyte = "é🚗".repeat(30);
        let clamped = clamp_description(&multibyte);
        assert_eq!(clamped.chars().count(), 40);
        assert!(multibyte.starts_with(&clamped));

        let patch = edit("", &format!("  {}  ", multibyte)).to_patch();
        assert_eq!(patch.fields["publicDescription"], json!(clamped));
    }

    #[test]
    fn test_prefill_from_document() {
        let doc = match json!({
            "displayName": "Jo",
            "city": "Athens",
            "hasCar": true,
            "stats": { "followers": 2 }
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };

        let form = ProfileEdit::from_document(&doc);

        assert_eq!(form.display_name, "Jo");
        assert_eq!(form.city, "Athens");
        assert!(form.has_car);
        assert_eq!(form.school, "");
        assert_eq!(form.public_description, "");
    }

    #[test]
    fn test_photo_update_patch() {
        let patch = photo_update_patch(&Identity::new("u1"), "https://cdn.example/a.jpg");

        assert_eq!(patch.fields["photoURL"], json!("https://cdn.example/a.jpg"));
        assert_eq!(
            patch.fields["photo"],
            json!({ "storagePath": "user_avatars/u1/avatar.jpg", "contentType": "image/jpeg" })
        );
        assert_eq!(
            patch.server_timestamps,
            vec!["photo.updatedAt".to_string(), "updatedAt".to_string()]
        );
    }
}
