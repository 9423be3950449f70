pub mod exclusions;
pub mod library;
pub mod postgres;
pub mod preferences;
pub mod redis;

pub use exclusions::{ExclusionStore, InMemoryExclusionStore};
pub use library::{LibraryFlag, LibraryRepository};
pub use postgres::{create_pool, run_migrations};
pub use preferences::PreferencesRepository;
pub use self::redis::{create_redis_client, RedisExclusionStore};
