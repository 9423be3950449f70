#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Barrier;

use shelf_swipe::{
    error::{AppError, AppResult},
    models::CatalogItem,
    services::CatalogProvider,
};

/// A search call as seen by the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSearch {
    pub query: String,
    pub max_results: u32,
    pub start_index: u32,
}

/// Catalog fake answering canned results per query and recording every call
#[derive(Default)]
pub struct RecordingCatalog {
    responses: HashMap<String, Vec<CatalogItem>>,
    failing: Vec<String>,
    delays: HashMap<String, Duration>,
    barrier: Option<Arc<Barrier>>,
    calls: Mutex<Vec<RecordedSearch>>,
}

impl RecordingCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, query: &str, items: Vec<CatalogItem>) -> Self {
        self.responses.insert(query.to_string(), items);
        self
    }

    pub fn fail_on(mut self, query: &str) -> Self {
        self.failing.push(query.to_string());
        self
    }

    /// Holds back the answer to `query` for `delay`
    pub fn delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    /// Makes every search wait until `searches` of them are in flight
    pub fn rendezvous(mut self, searches: usize) -> Self {
        self.barrier = Some(Arc::new(Barrier::new(searches)));
        self
    }

    pub fn calls(&self) -> Vec<RecordedSearch> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CatalogProvider for RecordingCatalog {
    async fn search(
        &self,
        query: &str,
        max_results: u32,
        start_index: u32,
    ) -> AppResult<Vec<CatalogItem>> {
        self.calls.lock().unwrap().push(RecordedSearch {
            query: query.to_string(),
            max_results,
            start_index,
        });

        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }

        if self.failing.iter().any(|q| q == query) {
            return Err(AppError::CatalogUnavailable(format!(
                "status 503 for {}",
                query
            )));
        }

        Ok(self.responses.get(query).cloned().unwrap_or_default())
    }

    async fn fetch_by_id(&self, volume_id: &str) -> AppResult<CatalogItem> {
        self.responses
            .values()
            .flatten()
            .find(|item| item.id.as_deref() == Some(volume_id))
            .cloned()
            .ok_or_else(|| AppError::NotFound(volume_id.to_string()))
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

pub fn ids(items: &[CatalogItem]) -> Vec<&str> {
    items.iter().filter_map(|i| i.id.as_deref()).collect()
}
