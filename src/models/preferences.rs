use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Number of catalog pages a randomized fetch samples from
pub const RANDOM_PAGE_SPAN: u32 = 5;

/// Default catalog page size per genre
pub const DEFAULT_MAX_RESULTS_PER_GENRE: u32 = 40;

/// Largest page the catalog serves for one search
pub const MAX_CATALOG_PAGE_SIZE: u32 = 40;

/// A multi-select preference category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Genres,
    Moods,
    Tropes,
    Representation,
    Authors,
    Formats,
}

/// A user's taste selection
///
/// Every category is an ordered list of distinct values; the first selected
/// value of a category is the one used when compiling queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PreferenceSet {
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub moods: Vec<String>,
    #[serde(default)]
    pub tropes: Vec<String>,
    #[serde(default)]
    pub representation: Vec<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub formats: Vec<String>,
}

impl PreferenceSet {
    /// Creates an empty preference set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style selection of a value
    pub fn with(mut self, category: Category, value: impl Into<String>) -> Self {
        self.select(category, value);
        self
    }

    pub fn values(&self, category: Category) -> &[String] {
        match category {
            Category::Genres => &self.genres,
            Category::Moods => &self.moods,
            Category::Tropes => &self.tropes,
            Category::Representation => &self.representation,
            Category::Authors => &self.authors,
            Category::Formats => &self.formats,
        }
    }

    fn values_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Genres => &mut self.genres,
            Category::Moods => &mut self.moods,
            Category::Tropes => &mut self.tropes,
            Category::Representation => &mut self.representation,
            Category::Authors => &mut self.authors,
            Category::Formats => &mut self.formats,
        }
    }

    /// Adds a value at the end of its category, ignoring duplicates
    pub fn select(&mut self, category: Category, value: impl Into<String>) {
        let value = value.into();
        let values = self.values_mut(category);
        if !values.contains(&value) {
            values.push(value);
        }
    }

    /// Selects the value if absent, otherwise removes it
    pub fn toggle(&mut self, category: Category, value: &str) {
        let values = self.values_mut(category);
        if let Some(pos) = values.iter().position(|v| v == value) {
            values.remove(pos);
        } else {
            values.push(value.to_string());
        }
    }

    /// Whether at least one genre is selected; genre anchors every query
    pub fn has_genre(&self) -> bool {
        !self.genres.is_empty()
    }
}

/// Options controlling how many results are requested and from which offset
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FetchOptions {
    pub max_results_per_genre: u32,
    /// Explicit offset applied to every genre; wins over `randomize_start`
    pub start_index_per_genre: Option<u32>,
    pub randomize_start: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_results_per_genre: DEFAULT_MAX_RESULTS_PER_GENRE,
            start_index_per_genre: None,
            randomize_start: false,
        }
    }
}

impl FetchOptions {
    pub fn with_max_results(mut self, max_results_per_genre: u32) -> Self {
        self.max_results_per_genre = max_results_per_genre;
        self
    }

    pub fn with_start_index(mut self, start_index: u32) -> Self {
        self.start_index_per_genre = Some(start_index);
        self
    }

    pub fn randomized(mut self) -> Self {
        self.randomize_start = true;
        self
    }

    /// Rejects page sizes the catalog would not serve
    pub fn validate(&self) -> AppResult<()> {
        if self.max_results_per_genre > MAX_CATALOG_PAGE_SIZE {
            return Err(AppError::InvalidInput(format!(
                "max results per genre must be at most {}, got {}",
                MAX_CATALOG_PAGE_SIZE, self.max_results_per_genre
            )));
        }
        Ok(())
    }

    /// Start offset for one genre query
    ///
    /// Randomized offsets are drawn independently on every call, so two
    /// genres (or two successive "load more" requests) may land on the same
    /// page.
    pub fn start_offset<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if let Some(start) = self.start_index_per_genre {
            return start;
        }
        if self.randomize_start {
            let page = rng.random_range(0..RANDOM_PAGE_SPAN);
            return page.saturating_mul(self.max_results_per_genre);
        }
        0
    }
}
