use std::{collections::HashSet, sync::Arc};

use uuid::Uuid;

use crate::{
    db::ExclusionStore,
    error::AppResult,
    models::{CatalogItem, FetchOptions, PreferenceSet},
    services::recommendations::RecommendationFetcher,
};

/// Drops items the user dismissed before and items already on display
pub fn filter_unseen(
    batch: Vec<CatalogItem>,
    excluded: &HashSet<String>,
    displayed: &[CatalogItem],
) -> Vec<CatalogItem> {
    let shown: HashSet<&str> = displayed.iter().filter_map(|i| i.id.as_deref()).collect();

    batch
        .into_iter()
        .filter(|item| match item.id.as_deref() {
            Some(id) => !excluded.contains(id) && !shown.contains(id),
            None => false,
        })
        .collect()
}

/// Swipe-style discovery session for one user
///
/// Holds the displayed list and a cursor on the card currently shown.
/// Dismissed items go to the exclusion store before they leave the list, so
/// no later fetch can bring them back.
pub struct DiscoverFeed {
    fetcher: RecommendationFetcher,
    exclusions: Arc<dyn ExclusionStore>,
    user_id: Uuid,
    preferences: PreferenceSet,
    options: FetchOptions,
    items: Vec<CatalogItem>,
    cursor: usize,
}

impl DiscoverFeed {
    pub fn new(
        fetcher: RecommendationFetcher,
        exclusions: Arc<dyn ExclusionStore>,
        user_id: Uuid,
        preferences: PreferenceSet,
        options: FetchOptions,
    ) -> Self {
        Self {
            fetcher,
            exclusions,
            user_id,
            preferences,
            options,
            items: Vec::new(),
            cursor: 0,
        }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn preferences(&self) -> &PreferenceSet {
        &self.preferences
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The card under the cursor
    pub fn current(&self) -> Option<&CatalogItem> {
        self.items.get(self.cursor)
    }

    /// Fetches a batch and appends the items not seen before
    ///
    /// Returns how many items were added. A failed fetch leaves the feed
    /// unchanged.
    pub async fn load(&mut self, options: &FetchOptions) -> AppResult<usize> {
        let batch = self
            .fetcher
            .fetch_recommendations(&self.preferences, options)
            .await?;
        let fetched = batch.len();
        if batch.is_empty() {
            tracing::debug!(user_id = %self.user_id, "Empty batch, feed unchanged");
            return Ok(0);
        }

        let excluded = self.exclusions.get(self.user_id).await?;
        let fresh = filter_unseen(batch, &excluded, &self.items);
        let added = fresh.len();
        self.items.extend(fresh);

        tracing::info!(
            user_id = %self.user_id,
            fetched,
            added,
            displayed = self.items.len(),
            "Feed loaded"
        );

        Ok(added)
    }

    /// First load with the session's configured options
    pub async fn load_initial(&mut self) -> AppResult<usize> {
        let options = self.options;
        self.load(&options).await
    }

    /// Re-samples random catalog pages for more cards
    pub async fn load_more(&mut self) -> AppResult<usize> {
        let options = FetchOptions {
            start_index_per_genre: None,
            randomize_start: true,
            ..self.options
        };
        self.load(&options).await
    }

    /// Dismisses the current card and records it as excluded
    ///
    /// The cursor stays on the position of the removed card, wrapping to the
    /// first card when the last one was dismissed.
    pub async fn dismiss_current(&mut self) -> AppResult<Option<CatalogItem>> {
        let Some(item) = self.items.get(self.cursor) else {
            return Ok(None);
        };

        if let Some(id) = item.id.as_deref() {
            self.exclusions.add(self.user_id, id).await?;
        }

        let removed = self.items.remove(self.cursor);
        if self.cursor >= self.items.len() {
            self.cursor = 0;
        }

        Ok(Some(removed))
    }

    /// Moves to the next card without dismissing, wrapping around
    pub fn advance(&mut self) -> Option<&CatalogItem> {
        if self.items.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + 1) % self.items.len();
        self.current()
    }
}
