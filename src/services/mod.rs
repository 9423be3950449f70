pub mod covers;
pub mod feed;
pub mod providers;
pub mod query;
pub mod recommendations;

pub use feed::DiscoverFeed;
pub use providers::{CatalogProvider, GoogleBooksProvider};
pub use recommendations::RecommendationFetcher;
