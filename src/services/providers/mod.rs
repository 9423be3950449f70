/// Book catalog provider abstraction
///
/// The discovery flow only needs keyword search with paging and lookup by
/// volume id. Providers own the concrete protocol; `google_books` is the one
/// shipped implementation.
use crate::{error::AppResult, models::CatalogItem};

pub mod google_books;

pub use google_books::GoogleBooksProvider;

/// Trait for book catalog providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Search the catalog with a flat keyword query
    ///
    /// Any non-success response or transport failure is reported as
    /// `AppError::CatalogUnavailable`.
    async fn search(
        &self,
        query: &str,
        max_results: u32,
        start_index: u32,
    ) -> AppResult<Vec<CatalogItem>>;

    /// Fetch a single volume by its catalog identifier
    async fn fetch_by_id(&self, volume_id: &str) -> AppResult<CatalogItem>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
