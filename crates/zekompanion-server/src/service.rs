//! User operations behind the HTTP routes
//!
//! Each operation resolves the caller's identifier first and hands only the
//! canonical UUID to the image pipeline. Records returned to the caller come
//! from [`ResolvedIdentity::visible_user`] or [`IdentityResolver::list_visible`],
//! which carry the exposed identifier instead of the UUID.
//!
//! [`ResolvedIdentity::visible_user`]: user_identity::ResolvedIdentity::visible_user

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use profile_imagery::{ArtifactKind, ImagePipeline, ImageSize};
use tracing::{info, warn};
use user_identity::{IdentityResolver, ResolveError, UpdateTarget, User, UserRepository};
use uuid::Uuid;

use crate::error::AppError;
use crate::generator::ContentGenerator;

pub struct UserService {
    resolver: IdentityResolver,
    pipeline: ImagePipeline,
    generator: Arc<dyn ContentGenerator>,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        pipeline: ImagePipeline,
        generator: Arc<dyn ContentGenerator>,
    ) -> Self {
        Self {
            resolver: IdentityResolver::new(repository),
            pipeline,
            generator,
        }
    }

    pub fn pipeline(&self) -> &ImagePipeline {
        &self.pipeline
    }

    fn repository(&self) -> &Arc<dyn UserRepository> {
        self.resolver.repository()
    }

    /// Generate and store a new user. Admin only.
    pub async fn create_user(&self, authorized: bool) -> Result<User, AppError> {
        if !authorized {
            return Err(AppError::Unauthorized);
        }

        let uuid = Uuid::new_v4().to_string();
        let name = self.generator.user_name().await?;
        let description = self.generator.user_description(&name).await?;
        let chat_phrase = self.generator.user_chat_phrase(&name, &description).await?;
        let profile = self.generator.profile_image(&name, &description).await?;

        self.pipeline.store_original(&uuid, &profile).await?;

        let user = User {
            uuid: uuid.clone(),
            name,
            description,
            profile_b64: Some(BASE64.encode(&profile)),
            chat_phrase: Some(chat_phrase),
        };

        let added = match self.repository().create_user(user).await {
            Ok(Some(added)) => added,
            Ok(None) => {
                self.discard_original(&uuid).await;
                return Err(AppError::Forbidden("invalid".to_string()));
            }
            Err(e) => {
                self.discard_original(&uuid).await;
                return Err(e.into());
            }
        };

        info!(uuid = %added, "Created user");
        self.repository()
            .get_user(&added)
            .await?
            .ok_or_else(|| AppError::Internal(format!("created user {added} vanished")))
    }

    /// Best-effort removal of an original stored for a user that was never added
    async fn discard_original(&self, uuid: &str) {
        if let Err(e) = self.pipeline.remove_artifacts(uuid).await {
            warn!(uuid = %uuid, error = %e, "Failed to clean up unsaved user's image");
        }
    }

    pub async fn fetch_user(&self, raw_id: &str, authorized: bool) -> Result<User, AppError> {
        let resolved = self.resolver.resolve(raw_id, authorized).await?;
        Ok(resolved.visible_user())
    }

    pub async fn update_user(
        &self,
        raw_id: &str,
        authorized: bool,
        payload: User,
    ) -> Result<(), AppError> {
        let updated = match self.resolver.resolve_update(raw_id, authorized, payload)? {
            UpdateTarget::ByUuid(user) => self.repository().update_user(user).await?,
            UpdateTarget::ByIndex(index, user) => {
                self.repository().update_user_by_index(index, user).await?
            }
        };

        if updated {
            Ok(())
        } else {
            Err(ResolveError::NotFound.into())
        }
    }

    /// Delete a user and its stored images. Admin only.
    pub async fn delete_user(&self, raw_id: &str, authorized: bool) -> Result<bool, AppError> {
        if !authorized {
            return Err(AppError::Unauthorized);
        }

        let resolved = self.resolver.resolve(raw_id, authorized).await?;
        let uuid = resolved.canonical_uuid();
        let deleted = self.repository().delete_user(uuid).await?;

        if deleted {
            info!(uuid = %uuid, "Deleted user");
            if let Err(e) = self.pipeline.remove_artifacts(uuid).await {
                warn!(uuid = %uuid, error = %e, "Failed to remove deleted user's images");
            }
        }
        Ok(deleted)
    }

    pub async fn list_users(&self, authorized: bool) -> Result<Vec<User>, AppError> {
        Ok(self.resolver.list_visible(authorized).await?)
    }

    pub async fn user_count(&self) -> Result<usize, AppError> {
        Ok(self.repository().get_users().await?.len())
    }

    pub async fn fetch_original_image(
        &self,
        raw_id: &str,
        authorized: bool,
    ) -> Result<Vec<u8>, AppError> {
        let resolved = self.resolver.resolve(raw_id, authorized).await?;
        let bytes = self
            .pipeline
            .derive_artifact(resolved.canonical_uuid(), ArtifactKind::Original, resolved.name())
            .await?;
        Ok(bytes)
    }

    /// Resized PNG for a size token such as `48`, `256` or `48x48`
    pub async fn fetch_resized_image(
        &self,
        raw_id: &str,
        authorized: bool,
        size_token: &str,
    ) -> Result<Vec<u8>, AppError> {
        let resolved = self.resolver.resolve(raw_id, authorized).await?;
        let size = ImageSize::from_token(size_token)?;
        let bytes = self
            .pipeline
            .derive_artifact(
                resolved.canonical_uuid(),
                ArtifactKind::Resize(size),
                resolved.name(),
            )
            .await?;
        Ok(bytes)
    }

    pub async fn fetch_badge(&self, raw_id: &str, authorized: bool) -> Result<Vec<u8>, AppError> {
        let resolved = self.resolver.resolve(raw_id, authorized).await?;
        let bytes = self
            .pipeline
            .derive_artifact(resolved.canonical_uuid(), ArtifactKind::Badge, resolved.name())
            .await?;
        Ok(bytes)
    }

    /// Stored base64 profile text, empty when the user has none
    pub async fn fetch_profile_b64(
        &self,
        raw_id: &str,
        authorized: bool,
    ) -> Result<String, AppError> {
        let resolved = self.resolver.resolve(raw_id, authorized).await?;
        Ok(resolved.profile_b64().unwrap_or_default().to_string())
    }
}
