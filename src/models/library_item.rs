use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CatalogItem, PreferenceSet};
use crate::{
    error::{AppError, AppResult},
    services::covers,
};

/// A book saved to a user's personal library
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct LibraryItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub google_volume_id: String,
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub thumbnail: Option<String>,
    pub is_favorite: bool,
    pub has_read: bool,
    pub created_at: DateTime<Utc>,
    pub tropes: Option<Vec<String>>,
    pub representation: Option<Vec<String>>,
    pub moods: Option<Vec<String>>,
    pub formats: Option<Vec<String>>,
}

impl LibraryItem {
    /// Authors joined for display, `None` when unknown
    pub fn display_authors(&self) -> Option<String> {
        match self.authors.as_deref() {
            Some(authors) if !authors.is_empty() => Some(authors.join(", ")),
            _ => None,
        }
    }
}

/// Fields written when saving a catalog volume to the library
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewLibraryItem {
    pub user_id: Uuid,
    pub google_volume_id: String,
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub thumbnail: Option<String>,
    pub tropes: Option<Vec<String>>,
    pub representation: Option<Vec<String>>,
    pub moods: Option<Vec<String>>,
    pub formats: Option<Vec<String>>,
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    (!values.is_empty()).then(|| values.to_vec())
}

impl NewLibraryItem {
    /// Builds a library entry from a catalog volume, resolving its cover image
    pub fn from_catalog(user_id: Uuid, item: &CatalogItem, cover_base_url: &str) -> AppResult<Self> {
        let google_volume_id = item
            .id
            .clone()
            .ok_or_else(|| AppError::InvalidInput("Catalog item has no identifier".to_string()))?;

        Ok(Self {
            user_id,
            google_volume_id,
            title: item.title().map(str::to_string),
            authors: non_empty(item.authors()),
            thumbnail: covers::resolve_cover(item, cover_base_url),
            ..Self::default()
        })
    }

    /// Tags the entry with the preference selections that surfaced it
    pub fn with_tags(mut self, prefs: &PreferenceSet) -> Self {
        self.tropes = non_empty(&prefs.tropes);
        self.representation = non_empty(&prefs.representation);
        self.moods = non_empty(&prefs.moods);
        self.formats = non_empty(&prefs.formats);
        self
    }
}

/// Partial update of a library entry's status flags
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LibraryUpdate {
    pub is_favorite: Option<bool>,
    pub has_read: Option<bool>,
}

/// Display ordering for the library list
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Keep storage order (newest first)
    #[default]
    None,
    /// Case-insensitive by title; untitled entries sort as empty
    Alpha,
    /// Favourites first
    Favorites,
    /// Read books first
    HasRead,
}

/// Sorts library entries in place. The sort is stable.
pub fn sort_library(items: &mut [LibraryItem], mode: SortMode) {
    match mode {
        SortMode::None => {}
        SortMode::Alpha => items.sort_by_cached_key(|item| {
            item.title.as_deref().unwrap_or_default().to_lowercase()
        }),
        SortMode::Favorites => items.sort_by_key(|item| !item.is_favorite),
        SortMode::HasRead => items.sort_by_key(|item| !item.has_read),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImageLinks, IndustryIdentifier, VolumeInfo};

    fn library_item(title: Option<&str>, is_favorite: bool, has_read: bool) -> LibraryItem {
        LibraryItem {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            google_volume_id: title.unwrap_or("untitled").to_string(),
            title: title.map(str::to_string),
            authors: None,
            thumbnail: None,
            is_favorite,
            has_read,
            created_at: Utc::now(),
            tropes: None,
            representation: None,
            moods: None,
            formats: None,
        }
    }

    fn titles(items: &[LibraryItem]) -> Vec<Option<&str>> {
        items.iter().map(|i| i.title.as_deref()).collect()
    }

    #[test]
    fn test_sort_alpha_is_case_insensitive() {
        let mut items = vec![
            library_item(Some("dune"), false, false),
            library_item(Some("Emma"), false, false),
            library_item(None, false, false),
            library_item(Some("Beloved"), false, false),
        ];
        sort_library(&mut items, SortMode::Alpha);
        assert_eq!(
            titles(&items),
            vec![None, Some("Beloved"), Some("dune"), Some("Emma")]
        );
    }

    #[test]
    fn test_sort_favorites_first_is_stable() {
        let mut items = vec![
            library_item(Some("A"), false, false),
            library_item(Some("B"), true, false),
            library_item(Some("C"), false, false),
            library_item(Some("D"), true, false),
        ];
        sort_library(&mut items, SortMode::Favorites);
        assert_eq!(
            titles(&items),
            vec![Some("B"), Some("D"), Some("A"), Some("C")]
        );
    }

    #[test]
    fn test_sort_has_read_and_none() {
        let mut items = vec![
            library_item(Some("A"), false, false),
            library_item(Some("B"), false, true),
        ];
        sort_library(&mut items, SortMode::None);
        assert_eq!(titles(&items), vec![Some("A"), Some("B")]);

        sort_library(&mut items, SortMode::HasRead);
        assert_eq!(titles(&items), vec![Some("B"), Some("A")]);
    }

    #[test]
    fn test_display_authors() {
        let mut item = library_item(Some("Good Omens"), false, false);
        assert_eq!(item.display_authors(), None);
        item.authors = Some(vec!["Terry Pratchett".into(), "Neil Gaiman".into()]);
        assert_eq!(
            item.display_authors().as_deref(),
            Some("Terry Pratchett, Neil Gaiman")
        );
    }

    #[test]
    fn test_from_catalog_prefers_isbn_cover() {
        let item = CatalogItem {
            id: Some("vol1".into()),
            volume_info: Some(VolumeInfo {
                title: Some("Circe".into()),
                authors: Some(vec!["Madeline Miller".into()]),
                image_links: Some(ImageLinks {
                    thumbnail: Some("http://thumb".into()),
                    ..ImageLinks::default()
                }),
                industry_identifiers: Some(vec![IndustryIdentifier {
                    kind: "ISBN_13".into(),
                    identifier: "9780316556347".into(),
                }]),
                ..VolumeInfo::default()
            }),
            ..CatalogItem::default()
        };

        let user = Uuid::new_v4();
        let prefs = PreferenceSet::new().with(crate::models::Category::Moods, "Epic & large-scale");
        let new_item = NewLibraryItem::from_catalog(user, &item, "https://covers.example")
            .unwrap()
            .with_tags(&prefs);

        assert_eq!(new_item.user_id, user);
        assert_eq!(new_item.google_volume_id, "vol1");
        assert_eq!(new_item.title.as_deref(), Some("Circe"));
        assert_eq!(
            new_item.thumbnail.as_deref(),
            Some("https://covers.example/b/isbn/9780316556347-L.jpg")
        );
        assert_eq!(new_item.moods, Some(vec!["Epic & large-scale".to_string()]));
        assert_eq!(new_item.tropes, None);
    }

    #[test]
    fn test_from_catalog_requires_id() {
        let item = CatalogItem::default();
        let result = NewLibraryItem::from_catalog(Uuid::nil(), &item, "https://covers.example");
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
