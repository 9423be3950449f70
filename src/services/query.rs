use crate::models::{Category, PreferenceSet};

/// Categories contributing an extra search term, in the order they are appended
pub const EXTRA_TERM_CATEGORIES: [Category; 5] = [
    Category::Moods,
    Category::Tropes,
    Category::Representation,
    Category::Formats,
    Category::Authors,
];

/// Compiles the non-genre preferences into the shared extra search terms
///
/// The catalog takes a flat keyword query, so each category contributes only
/// its first selected value. Genres are excluded; they anchor each per-genre
/// query instead (see [`genre_query`]).
pub fn build_extra_terms(prefs: &PreferenceSet) -> String {
    EXTRA_TERM_CATEGORIES
        .iter()
        .filter_map(|category| prefs.values(*category).first())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Search query for one genre: `subject:<genre>` plus the extra terms, if any
pub fn genre_query(genre: &str, extra_terms: &str) -> String {
    if extra_terms.is_empty() {
        format!("subject:{}", genre)
    } else {
        format!("subject:{} {}", genre, extra_terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_optional_selection_yields_empty_terms() {
        let prefs = PreferenceSet::new()
            .with(Category::Genres, "Fantasy")
            .with(Category::Genres, "Horror");
        assert_eq!(build_extra_terms(&prefs), "");
        assert_eq!(build_extra_terms(&PreferenceSet::new()), "");
    }

    #[test]
    fn test_first_value_of_each_category_in_fixed_order() {
        let prefs = PreferenceSet::new()
            .with(Category::Authors, "Debut author")
            .with(Category::Formats, "Series")
            .with(Category::Formats, "Standalone")
            .with(Category::Moods, "Cozy")
            .with(Category::Moods, "Epic")
            .with(Category::Tropes, "Found Family")
            .with(Category::Representation, "LGBTQ+ romance");

        assert_eq!(
            build_extra_terms(&prefs),
            "Cozy Found Family LGBTQ+ romance Series Debut author"
        );
    }

    #[test]
    fn test_authors_included_alongside_formats() {
        let prefs = PreferenceSet::new()
            .with(Category::Formats, "Series")
            .with(Category::Authors, "POC author");
        assert_eq!(build_extra_terms(&prefs), "Series POC author");
    }

    #[test]
    fn test_at_most_one_term_per_category() {
        let mut prefs = PreferenceSet::new();
        for category in EXTRA_TERM_CATEGORIES {
            for n in 0..3 {
                prefs.select(category, format!("{:?}{}", category, n));
            }
        }

        let terms = build_extra_terms(&prefs);
        let parts: Vec<&str> = terms.split(' ').collect();
        assert_eq!(parts.len(), 5);
        for (part, category) in parts.iter().zip(EXTRA_TERM_CATEGORIES) {
            assert_eq!(*part, prefs.values(category)[0]);
        }
    }

    #[test]
    fn test_deterministic() {
        let prefs = PreferenceSet::new()
            .with(Category::Moods, "Dark & dramatic")
            .with(Category::Tropes, "Redemption Arc");
        assert_eq!(build_extra_terms(&prefs), build_extra_terms(&prefs.clone()));
    }

    #[test]
    fn test_genre_query() {
        assert_eq!(genre_query("Fantasy", ""), "subject:Fantasy");
        assert_eq!(
            genre_query("Romance", "Cozy Fake Dating"),
            "subject:Romance Cozy Fake Dating"
        );
    }
}
