/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// A catalog request failed: non-success status or transport failure
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Exclusion store error: {0}")]
    Store(#[from] redis::RedisError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::CatalogUnavailable(err.to_string())
    }
}

impl AppError {
    /// Whether repeating the same operation may succeed.
    ///
    /// Callers use this to decide whether to offer a retry affordance; the
    /// library itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::CatalogUnavailable(_) | AppError::Database(_) | AppError::Store(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
