//! Artifact derivation over an artifact store
//!
//! Store layout, keyed by canonical UUID:
//! - `{uuid}.png`: original profile image, written at user creation
//! - `{uuid}-{w}x{h}.png`: resize cache, written on first request
//!
//! Cached resizes are served without checking whether the original changed
//! since they were produced. Badges are not cached.

use std::sync::Arc;

use artifact_store::{ArtifactStore, StoreStats};
use image::{DynamicImage, ImageFormat};
use tracing::{debug, info, warn};

use crate::badge::{compose_badge, BadgeLayout, BADGE_TEMPLATE};
use crate::error::{ImageryError, Result};
use crate::resize::{encode, resize_png};
use crate::size::{ImageSize, SUPPORTED_DIMENSIONS};

/// Artifact requested for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Original,
    Resize(ImageSize),
    Badge,
}

pub fn original_key(uuid: &str) -> String {
    format!("{uuid}.png")
}

pub fn resized_key(uuid: &str, size: ImageSize) -> String {
    format!("{uuid}-{}x{}.png", size.width(), size.height())
}

pub struct ImagePipeline {
    store: Arc<dyn ArtifactStore>,
    template: Arc<DynamicImage>,
    layout: BadgeLayout,
}

impl ImagePipeline {
    /// Pipeline using the bundled badge template
    pub fn new(store: Arc<dyn ArtifactStore>) -> Result<Self> {
        Self::with_template(store, BADGE_TEMPLATE)
    }

    pub fn with_template(store: Arc<dyn ArtifactStore>, template: &[u8]) -> Result<Self> {
        let template = image::load_from_memory(template)?;
        Ok(Self {
            store,
            template: Arc::new(template),
            layout: BadgeLayout::STANDARD,
        })
    }

    pub fn store_stats(&self) -> StoreStats {
        self.store.stats()
    }

    /// Return the bytes of `kind` for the user with canonical `uuid`.
    /// `name` is only used for badges.
    pub async fn derive_artifact(
        &self,
        uuid: &str,
        kind: ArtifactKind,
        name: &str,
    ) -> Result<Vec<u8>> {
        match kind {
            ArtifactKind::Original => self.original(uuid).await,
            ArtifactKind::Resize(size) => self.resized(uuid, size).await,
            ArtifactKind::Badge => self.badge(uuid, name).await,
        }
    }

    /// Verbatim original image bytes
    pub async fn original(&self, uuid: &str) -> Result<Vec<u8>> {
        let key = original_key(uuid);
        self.store
            .get(&key)
            .await?
            .ok_or(ImageryError::NotFound(key))
    }

    /// Store the original image for a new user
    pub async fn store_original(&self, uuid: &str, data: &[u8]) -> Result<()> {
        self.store.put_atomic(&original_key(uuid), data).await?;
        Ok(())
    }

    /// Serve the cached resize, generating and publishing it on a miss.
    ///
    /// Concurrent misses may each generate the same bytes; whichever publish
    /// lands last wins, and readers never see a partial file.
    pub async fn resized(&self, uuid: &str, size: ImageSize) -> Result<Vec<u8>> {
        let key = resized_key(uuid, size);
        if let Some(cached) = self.store.get(&key).await? {
            return Ok(cached);
        }

        let source = self.original(uuid).await?;
        let resized = tokio::task::spawn_blocking(move || resize_png(&source, size)).await??;

        self.store.put_atomic(&key, &resized).await?;
        info!(key = %key, size = resized.len(), "Generated resized profile image");
        Ok(resized)
    }

    /// Parse `token` and serve that resize. Unsupported sizes fail before
    /// touching the store.
    pub async fn resized_from_token(&self, uuid: &str, token: &str) -> Result<Vec<u8>> {
        let size = ImageSize::from_token(token)?;
        self.resized(uuid, size).await
    }

    /// Compose the badge for `uuid` and encode it as BMP
    pub async fn badge(&self, uuid: &str, name: &str) -> Result<Vec<u8>> {
        let source = self.original(uuid).await?;
        let template = self.template.clone();
        let layout = self.layout;
        let name = name.to_string();

        let badge = tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
            let photo = image::load_from_memory(&source)?;
            let badge = compose_badge(&template, &photo, &name, &layout);
            encode(DynamicImage::ImageRgb8(badge), ImageFormat::Bmp)
        })
        .await??;

        debug!(size = badge.len(), "Composed badge");
        Ok(badge)
    }

    /// Remove the original and every cached resize for `uuid`
    pub async fn remove_artifacts(&self, uuid: &str) -> Result<()> {
        let mut keys = vec![original_key(uuid)];
        for edge in SUPPORTED_DIMENSIONS {
            let size = ImageSize::new(i64::from(edge), i64::from(edge))?;
            keys.push(resized_key(uuid, size));
        }

        for key in keys {
            if let Err(e) = self.store.remove(&key).await {
                warn!(key = %key, error = %e, "Failed to remove artifact");
                return Err(e.into());
            }
        }
        Ok(())
    }
}
