pub mod memory;
pub mod redis;

use async_trait::async_trait;
use thiserror::Error;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

/// Key holding the JSON-serialized `MergedRecord`.
pub const RECORD_KEY: &str = "air-quality-api";
/// Key holding the ISO-8601 instant of the last successful record write.
pub const LAST_UPDATE_KEY: &str = "air-quality-api-last-update";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Redis command failed: {0}")]
    Redis(#[from] ::redis::RedisError),
}

/// Shared string key-value store. Each `set` is atomic per key; nothing
/// spans keys.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
}
