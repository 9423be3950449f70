/// Cover image resolution
///
/// The catalog's own thumbnails are low resolution, so an ISBN-keyed cover
/// service is tried first and the catalog image links are the fallback.
use crate::models::CatalogItem;

const ISBN_13: &str = "ISBN_13";
const ISBN_10: &str = "ISBN_10";

/// Picks the ISBN used for cover lookups: ISBN-13 when present, else ISBN-10
pub fn preferred_isbn(item: &CatalogItem) -> Option<&str> {
    let identifiers = item.industry_identifiers();
    let find = |kind: &str| {
        identifiers
            .iter()
            .find(|id| id.kind == kind)
            .map(|id| id.identifier.as_str())
            .filter(|isbn| !isbn.is_empty())
    };

    find(ISBN_13).or_else(|| find(ISBN_10))
}

/// Large cover image URL for an ISBN
pub fn isbn_cover_url(cover_base_url: &str, isbn: &str) -> String {
    format!("{}/b/isbn/{}-L.jpg", cover_base_url.trim_end_matches('/'), isbn)
}

/// Best available cover image: ISBN cover, then thumbnail, then small thumbnail
pub fn resolve_cover(item: &CatalogItem, cover_base_url: &str) -> Option<String> {
    if let Some(isbn) = preferred_isbn(item) {
        return Some(isbn_cover_url(cover_base_url, isbn));
    }

    let links = item.image_links()?;
    links
        .thumbnail
        .clone()
        .or_else(|| links.small_thumbnail.clone())
}
