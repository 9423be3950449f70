use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AppResult;

/// Per-user history of dismissed catalog items
///
/// Identifiers are only ever added; nothing in the crate removes them.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ExclusionStore: Send + Sync {
    /// All identifiers the user has dismissed
    async fn get(&self, user_id: Uuid) -> AppResult<HashSet<String>>;

    /// Records a dismissed identifier
    async fn add(&self, user_id: Uuid, item_id: &str) -> AppResult<()>;
}

/// Process-local exclusion store, lost on exit
#[derive(Default)]
pub struct InMemoryExclusionStore {
    inner: RwLock<HashMap<Uuid, HashSet<String>>>,
}

impl InMemoryExclusionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ExclusionStore for InMemoryExclusionStore {
    async fn get(&self, user_id: Uuid) -> AppResult<HashSet<String>> {
        let inner = self.inner.read().await;
        Ok(inner.get(&user_id).cloned().unwrap_or_default())
    }

    async fn add(&self, user_id: Uuid, item_id: &str) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner
            .entry(user_id)
            .or_default()
            .insert(item_id.to_string());
        Ok(())
    }
}
