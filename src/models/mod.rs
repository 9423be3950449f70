use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod library_item;
pub mod preferences;

pub use library_item::{LibraryItem, LibraryUpdate, NewLibraryItem, SortMode};
pub use preferences::{Category, FetchOptions, PreferenceSet};

// ============================================================================
// Catalog (Google Books) Types
// ============================================================================

/// A volume returned by the book catalog
///
/// Only the fields the discovery flow reads are modelled; everything else the
/// catalog sends is kept in `extra` and written back out unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Stable volume identifier. Items without one cannot be deduplicated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_info: Option<VolumeInfo>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_links: Option<ImageLinks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry_identifiers: Option<Vec<IndustryIdentifier>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small_thumbnail: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Typed identifier entry, e.g. `ISBN_13` / `9780261103573`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndustryIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub identifier: String,
}

/// Raw response from GET /volumes
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub items: Vec<CatalogItem>,
}

impl CatalogItem {
    /// Creates an item carrying only an id and a title
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            volume_info: Some(VolumeInfo {
                title: Some(title.into()),
                ..VolumeInfo::default()
            }),
            extra: Map::new(),
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.volume_info.as_ref()?.title.as_deref()
    }

    pub fn authors(&self) -> &[String] {
        self.volume_info
            .as_ref()
            .and_then(|info| info.authors.as_deref())
            .unwrap_or(&[])
    }

    pub fn image_links(&self) -> Option<&ImageLinks> {
        self.volume_info.as_ref()?.image_links.as_ref()
    }

    pub fn industry_identifiers(&self) -> &[IndustryIdentifier] {
        self.volume_info
            .as_ref()
            .and_then(|info| info.industry_identifiers.as_deref())
            .unwrap_or(&[])
    }
}
