/// Google Books API provider
///
/// API Flow:
/// 1. Search: /volumes?q=...&maxResults=...&startIndex=... → page of volumes
/// 2. Details: /volumes/{id} → single volume
///
/// The API key is optional; anonymous requests share a lower quota.
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{CatalogItem, SearchResponse},
    services::providers::CatalogProvider,
};
use reqwest::{Client as HttpClient, Response, StatusCode};

const PROVIDER_NAME: &str = "google_books";

#[derive(Clone)]
pub struct GoogleBooksProvider {
    http_client: HttpClient,
    api_url: String,
    api_key: Option<String>,
}

impl GoogleBooksProvider {
    pub fn new(api_url: String, api_key: Option<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.catalog_api_url.clone(), config.catalog_api_key.clone())
    }

    fn key_param(&self) -> Vec<(&'static str, String)> {
        self.api_key
            .iter()
            .map(|key| ("key", key.clone()))
            .collect()
    }

    /// Turns a non-success response into an error carrying status and body
    async fn check_status(response: Response) -> AppResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::CatalogUnavailable(format!(
            "Google Books API returned status {}: {}",
            status, body
        )))
    }
}

#[async_trait::async_trait]
impl CatalogProvider for GoogleBooksProvider {
    async fn search(
        &self,
        query: &str,
        max_results: u32,
        start_index: u32,
    ) -> AppResult<Vec<CatalogItem>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let url = format!("{}/volumes", self.api_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("q", query.to_string()),
                ("maxResults", max_results.to_string()),
                ("startIndex", start_index.to_string()),
            ])
            .query(&self.key_param())
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let page: SearchResponse = response.json().await?;

        tracing::info!(
            query = %query,
            start_index,
            results = page.items.len(),
            total = page.total_items,
            provider = PROVIDER_NAME,
            "Catalog search completed"
        );

        Ok(page.items)
    }

    async fn fetch_by_id(&self, volume_id: &str) -> AppResult<CatalogItem> {
        if volume_id.trim().is_empty() || volume_id.contains('/') {
            return Err(AppError::InvalidInput(format!(
                "Invalid volume id: {:?}",
                volume_id
            )));
        }

        let url = format!("{}/volumes/{}", self.api_url, volume_id);
        let response = self
            .http_client
            .get(&url)
            .query(&self.key_param())
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("Volume {}", volume_id)));
        }

        let response = Self::check_status(response).await?;
        let item: CatalogItem = response.json().await?;

        tracing::debug!(volume_id = %volume_id, provider = PROVIDER_NAME, "Volume fetched");

        Ok(item)
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
