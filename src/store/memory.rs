use async_trait::async_trait;
use moka::future::Cache;

use super::{CacheStore, StoreError};

/// In-process store for tests and for running without Redis. Entries never
/// expire; staleness is tracked through the last-update key like in Redis.
#[derive(Clone)]
pub struct MemoryStore {
    entries: Cache<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Cache::builder().max_capacity(64).build(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).await)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value).await;
        Ok(())
    }
}
