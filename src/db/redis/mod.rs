use redis::Client;

pub mod exclusions;

pub use exclusions::RedisExclusionStore;
pub use exclusions::StoreKey;

/// Creates a Redis client for the dismissal history
///
/// Connections are opened lazily per operation through the multiplexed
/// async connection.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}
