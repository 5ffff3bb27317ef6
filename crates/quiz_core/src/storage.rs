//! Key-value store trait and in-memory implementation

use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;

use crate::error::Result;

/// Shared key-value store with per-record time-to-live.
///
/// The store is the sole owner of persisted state; expiry is the only
/// cancellation mechanism. Reads of an expired record behave as a miss.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch a record, or `None` when missing or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a record, replacing any previous value and restarting its TTL.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Remove a record. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check whether a live record exists under the key.
    async fn exists(&self, key: &str) -> Result<bool>;
}

struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-memory store with lazy expiry, suitable for a single-process service
/// and for driving the engine in tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, Entry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        // The map guard must be released before removing the expired record.
        match self.entries.get(key) {
            None => return Ok(None),
            Some(entry) if entry.expires_at > Instant::now() => {
                return Ok(Some(entry.value.clone()))
            }
            Some(_) => {}
        }
        self.entries.remove(key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }
}
