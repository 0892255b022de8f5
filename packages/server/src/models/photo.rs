use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::photo;

/// A stored photo.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PhotoResponse {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = "http://127.0.0.1:5000/media/0b6f3c0e.jpg")]
    pub url: String,
    pub description: Option<String>,
    pub date_added: DateTime<Utc>,
    pub is_main: bool,
}

impl From<photo::Model> for PhotoResponse {
    fn from(m: photo::Model) -> Self {
        Self {
            id: m.id,
            url: m.url,
            description: m.description,
            date_added: m.date_added,
            is_main: m.is_main,
        }
    }
}

/// Multipart form for photo uploads (documentation only).
#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct PhotoUploadForm {
    /// Image file.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    /// Optional caption.
    pub description: Option<String>,
}

pub fn validate_description(description: &str) -> Result<(), crate::error::AppError> {
    if description.chars().count() > 256 {
        return Err(crate::error::AppError::Validation(
            "Description must be at most 256 characters".into(),
        ));
    }
    Ok(())
}
