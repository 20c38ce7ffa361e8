//! In-memory artifact store

use crate::error::Result;
use crate::types::{Counters, StoreStats};
use crate::{validate_key, ArtifactStore};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Artifact store holding everything in a map. Inserts replace whole values
/// under the write lock, so publishes are atomic.
#[derive(Default)]
pub struct MemoryArtifactStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
    counters: Counters,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored artifacts
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Whether `key` is stored. Not counted as a lookup.
    pub async fn contains_key(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        validate_key(key)?;
        let data = self.entries.read().await.get(key).cloned();
        self.counters.record_lookup(data.is_some());
        Ok(data)
    }

    async fn put_atomic(&self, key: &str, data: &[u8]) -> Result<()> {
        validate_key(key)?;
        self.entries
            .write()
            .await
            .insert(key.to_string(), data.to_vec());
        self.counters.record_write();
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.entries.write().await.remove(key);
        Ok(())
    }

    fn stats(&self) -> StoreStats {
        self.counters.snapshot()
    }
}
