//! Types for catalog search responses.

use serde::{Deserialize, Serialize};

/// A catalog entry as returned by the search backend, before normalization.
///
/// Only `id` is guaranteed; everything else may be missing from the
/// upstream record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawEntry {
    /// Catalog volume identifier.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Cover image links (only the thumbnail is consumed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_links: Option<ImageLinks>,
}

impl RawEntry {
    /// Thumbnail URL, if the entry carries one.
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.image_links
            .as_ref()
            .and_then(|links| links.thumbnail.as_deref())
    }
}

/// Nested image links of a catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small_thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}
