use rand::Rng;
use std::{collections::HashSet, sync::Arc};

use crate::{
    error::{AppError, AppResult},
    models::{CatalogItem, FetchOptions, PreferenceSet},
    services::{
        providers::CatalogProvider,
        query::{build_extra_terms, genre_query},
    },
};

/// One planned catalog search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreSearch {
    pub genre: String,
    pub query: String,
    pub start_index: u32,
}

/// Builds one search per selected genre, in genre order
///
/// The extra terms are compiled once and shared; the start offset is computed
/// separately for every genre.
pub fn plan_searches<R: Rng + ?Sized>(
    prefs: &PreferenceSet,
    options: &FetchOptions,
    rng: &mut R,
) -> Vec<GenreSearch> {
    let extra_terms = build_extra_terms(prefs);

    prefs
        .genres
        .iter()
        .map(|genre| GenreSearch {
            genre: genre.clone(),
            query: genre_query(genre, &extra_terms),
            start_index: options.start_offset(rng),
        })
        .collect()
}

/// Flattens per-search batches and keeps the first item seen for each id
///
/// Items without an identifier are dropped. Later duplicates never replace
/// the fields of an earlier one.
pub fn merge_by_id(batches: Vec<Vec<CatalogItem>>) -> Vec<CatalogItem> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for item in batches.into_iter().flatten() {
        let Some(id) = item.id.as_deref().filter(|id| !id.is_empty()) else {
            tracing::debug!("Skipping catalog item without identifier");
            continue;
        };
        if seen.insert(id.to_string()) {
            merged.push(item);
        }
    }

    merged
}

/// Turns preferences into recommendations from the catalog
///
/// Stateless: every call re-queries the catalog.
#[derive(Clone)]
pub struct RecommendationFetcher {
    catalog: Arc<dyn CatalogProvider>,
}

impl RecommendationFetcher {
    pub fn new(catalog: Arc<dyn CatalogProvider>) -> Self {
        Self { catalog }
    }

    /// Fetches a deduplicated recommendation batch for the given preferences
    ///
    /// Returns an empty list, without touching the catalog, when no genre is
    /// selected. With several genres all searches run concurrently and the
    /// batch fails as a whole if any one of them fails. Page sizes above the
    /// catalog limit are rejected before any search is issued.
    pub async fn fetch_recommendations(
        &self,
        prefs: &PreferenceSet,
        options: &FetchOptions,
    ) -> AppResult<Vec<CatalogItem>> {
        if !prefs.has_genre() {
            tracing::debug!("No genre selected, skipping catalog search");
            return Ok(Vec::new());
        }
        options.validate()?;

        let searches = plan_searches(prefs, options, &mut rand::rng());
        let max_results = options.max_results_per_genre;

        let batches = if let [search] = searches.as_slice() {
            vec![
                self.catalog
                    .search(&search.query, max_results, search.start_index)
                    .await?,
            ]
        } else {
            self.fan_out(searches, max_results).await?
        };

        let fetched: usize = batches.iter().map(Vec::len).sum();
        let merged = merge_by_id(batches);

        tracing::info!(
            genres = prefs.genres.len(),
            fetched,
            unique = merged.len(),
            provider = self.catalog.name(),
            "Recommendations fetched"
        );

        Ok(merged)
    }

    /// Runs every search as its own task and joins them in genre order
    async fn fan_out(
        &self,
        searches: Vec<GenreSearch>,
        max_results: u32,
    ) -> AppResult<Vec<Vec<CatalogItem>>> {
        let mut tasks = Vec::with_capacity(searches.len());

        for search in searches {
            let catalog = Arc::clone(&self.catalog);
            let genre = search.genre.clone();
            let task = tokio::spawn(async move {
                catalog
                    .search(&search.query, max_results, search.start_index)
                    .await
            });
            tasks.push((genre, task));
        }

        let mut batches = Vec::with_capacity(tasks.len());

        for (genre, task) in tasks {
            match task.await {
                Ok(Ok(items)) => batches.push(items),
                Ok(Err(e)) => {
                    tracing::error!(genre = %genre, error = %e, "Genre search failed, dropping batch");
                    return Err(e);
                }
                Err(e) => {
                    tracing::error!(genre = %genre, error = %e, "Task join error");
                    return Err(AppError::Internal(e.to_string()));
                }
            }
        }

        Ok(batches)
    }
}
