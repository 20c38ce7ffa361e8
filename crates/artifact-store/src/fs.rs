//! Directory-backed artifact store
//!
//! Each artifact is one file named after its key. Writes go to a uniquely
//! named temp file in the same directory and are renamed into place, so the
//! final path only ever holds complete artifacts. Concurrent writers of the
//! same key race on the rename; the last one wins.

use crate::error::Result;
use crate::types::{Counters, StoreStats};
use crate::{validate_key, ArtifactStore};
use async_trait::async_trait;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;
use tracing::{debug, info};

/// Prefix of in-flight temp files. Keys may not start with `.`, so these never
/// collide with published artifacts.
const TEMP_PREFIX: &str = ".partial-";

pub struct FsArtifactStore {
    root: PathBuf,
    counters: Counters,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            counters: Counters::default(),
        }
    }

    /// Ensure the store directory exists
    pub async fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        info!(root = ?self.root, "Artifact store initialized");
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

/// Write `data` next to `target` and rename it over `target`
fn publish(dir: &Path, target: &Path, data: &[u8]) -> Result<()> {
    let mut tmp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(dir)?;
    write_all_synced(&mut tmp, data)?;
    // On error the temp file is dropped and unlinked; `target` is untouched.
    tmp.persist(target)?;
    Ok(())
}

fn write_all_synced(tmp: &mut NamedTempFile, data: &[u8]) -> Result<()> {
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    Ok(())
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(data) => {
                self.counters.record_lookup(true);
                debug!(key, size = data.len(), "Artifact hit");
                Ok(Some(data))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.counters.record_lookup(false);
                debug!(key, "Artifact miss");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn put_atomic(&self, key: &str, data: &[u8]) -> Result<()> {
        let target = self.path_for(key)?;
        let dir = self.root.clone();
        let bytes = data.to_vec();
        let size = bytes.len();

        tokio::task::spawn_blocking(move || publish(&dir, &target, &bytes)).await??;

        self.counters.record_write();
        debug!(key, size, "Published artifact");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key, "Removed artifact");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn stats(&self) -> StoreStats {
        self.counters.snapshot()
    }
}
