use redis::AsyncCommands;
use redis::Client;
use std::collections::HashSet;
use std::fmt::Display;
use uuid::Uuid;

use crate::db::exclusions::ExclusionStore;
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Exclusions(Uuid),
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKey::Exclusions(user_id) => write!(f, "excl:{}", user_id),
        }
    }
}

/// Dismissal history kept in one Redis set per user
///
/// Sets carry no TTL: a dismissed item stays excluded until the key is
/// removed out of band.
#[derive(Clone)]
pub struct RedisExclusionStore {
    redis_client: Client,
}

impl RedisExclusionStore {
    pub fn new(redis_client: Client) -> Self {
        Self { redis_client }
    }
}

#[async_trait::async_trait]
impl ExclusionStore for RedisExclusionStore {
    async fn get(&self, user_id: Uuid) -> AppResult<HashSet<String>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let members: HashSet<String> = conn
            .smembers(StoreKey::Exclusions(user_id).to_string())
            .await?;
        Ok(members)
    }

    async fn add(&self, user_id: Uuid, item_id: &str) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn
            .sadd(StoreKey::Exclusions(user_id).to_string(), item_id)
            .await?;

        tracing::debug!(user_id = %user_id, item_id = %item_id, "Item excluded");

        Ok(())
    }
}
