pub mod repository;
pub mod schema;

use serde::{Deserialize, Serialize};

use crate::sections::schema::SectionSchema;

/// Upload cap enforced before any bytes leave the client.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// One content block of a marketing page, as it travels over the wire and
/// sits in the editor. Flat on purpose: every section type is a subset of
/// these fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub slides: Vec<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Default for SectionRecord {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            subtitle: None,
            description: None,
            content: None,
            image_url: None,
            slides: Vec::new(),
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title is required")]
    MissingTitle,

    #[error("An image is required for this section")]
    MissingImage,

    #[error("Only image files can be uploaded")]
    NotAnImage,

    #[error("Image must be 10MB or smaller")]
    TooLarge,
}

/// Client-side form validation. Runs before any save call is issued.
pub fn validate(schema: &SectionSchema, record: &SectionRecord) -> Result<(), ValidationError> {
    if record.title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    if schema.requires_image {
        let has_image = record
            .image_url
            .as_deref()
            .map(|u| !u.trim().is_empty())
            .unwrap_or(false);
        if !has_image {
            return Err(ValidationError::MissingImage);
        }
    }
    Ok(())
}

/// MIME/size gate for uploads. Runs before any bytes are posted.
pub fn check_upload(content_type: &str, len: usize) -> Result<(), ValidationError> {
    if !content_type.starts_with("image/") {
        return Err(ValidationError::NotAnImage);
    }
    if len > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge);
    }
    Ok(())
}

/// Prefix root-relative asset URLs with the configured API base.
/// Absolute URLs pass through untouched.
pub fn normalize_asset_url(base: &str, url: &str) -> String {
    if url.starts_with('/') {
        format!("{}{}", base.trim_end_matches('/'), url)
    } else {
        url.to_string()
    }
}
