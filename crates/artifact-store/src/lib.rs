//! Artifact store with atomic publish
//!
//! Stores binary artifacts (original profile images, resized variants) under
//! flat string keys. Writers publish through [`ArtifactStore::put_atomic`], so
//! a reader either sees no artifact or the complete one, never a partial write.

mod error;
mod fs;
mod memory;
mod types;

pub use error::{Result, StoreError};
pub use fs::FsArtifactStore;
pub use memory::MemoryArtifactStore;
pub use types::StoreStats;

use async_trait::async_trait;

/// A flat key-value store for artifact bytes
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Read the artifact stored under `key`, `None` if absent
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Publish `data` under `key`, replacing any previous artifact.
    ///
    /// Either the whole artifact becomes visible or the previous state is kept.
    async fn put_atomic(&self, key: &str, data: &[u8]) -> Result<()>;

    /// Remove the artifact under `key`. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Hit/miss/write counters since creation
    fn stats(&self) -> StoreStats;
}

/// Reject keys that could escape the store directory or collide with temp files
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty()
        || key.starts_with('.')
        || key.contains('/')
        || key.contains('\\')
        || key.contains("..")
        || key.contains('\0')
    {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}
