use axum::http::HeaderValue;
use serde::{Deserialize, Deserializer, Serialize};

/// Response header carrying [`Pagination`] for list endpoints.
pub const PAGINATION_HEADER: &str = "Pagination";

/// Pagination metadata, sent out-of-band in the `Pagination` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub current_page: u64,
    /// Number of items per page.
    #[schema(example = 10)]
    pub items_per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 25)]
    pub total_items: u64,
    /// Total number of pages.
    #[schema(example = 3)]
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(current_page: u64, items_per_page: u64, total_items: u64) -> Self {
        Self {
            current_page,
            items_per_page,
            total_items,
            total_pages: total_items.div_ceil(items_per_page.max(1)),
        }
    }

    /// JSON-encode for use as a header value.
    pub fn header_value(&self) -> HeaderValue {
        let json = serde_json::to_string(self).unwrap_or_default();
        HeaderValue::from_str(&json).unwrap_or_else(|_| HeaderValue::from_static("{}"))
    }
}

/// Serde helper for PATCH semantics on nullable fields.
///
/// * JSON field absent  => `None`          (don't update)
/// * JSON field = null  => `Some(None)`    (set to NULL)
/// * JSON field = value => `Some(Some(v))` (set to value)
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}
