use std::sync::Arc;

use tracing::debug;

use crate::error::{ResolveError, Result};
use crate::repository::UserRepository;
use crate::types::{parse_index, CallerIdentifier, ResolvedIdentity, UpdateTarget, User};

/// Resolves caller identifiers to user records.
///
/// Holds no state besides the repository handle; every method is a lookup
/// plus translation.
#[derive(Clone)]
pub struct IdentityResolver {
    repository: Arc<dyn UserRepository>,
}

impl IdentityResolver {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<dyn UserRepository> {
        &self.repository
    }

    /// Resolve `raw_id` in the identifier space selected by `authorized`
    pub async fn resolve(&self, raw_id: &str, authorized: bool) -> Result<ResolvedIdentity> {
        self.resolve_identifier(&CallerIdentifier::parse(raw_id, authorized))
            .await
    }

    pub async fn resolve_identifier(&self, id: &CallerIdentifier) -> Result<ResolvedIdentity> {
        let user = match id {
            CallerIdentifier::ByUuid(uuid) => self.repository.get_user(uuid).await?,
            CallerIdentifier::ByIndex(index) => match usize::try_from(*index) {
                Ok(index) => self.repository.get_user_by_index(index).await?,
                Err(_) => None,
            },
        };

        match user {
            Some(user) => Ok(ResolvedIdentity::new(user, id.exposed())),
            None => {
                debug!(identifier = %id.exposed(), "No user for identifier");
                Err(ResolveError::NotFound)
            }
        }
    }

    /// Decide where an update lands.
    ///
    /// Authorized callers target the UUID from the path and the payload's own
    /// identifier is overwritten with it. Unauthorized callers target the
    /// position named by the payload's identifier, which must be an integer.
    pub fn resolve_update(
        &self,
        path_id: &str,
        authorized: bool,
        payload: User,
    ) -> Result<UpdateTarget> {
        if authorized {
            return Ok(UpdateTarget::ByUuid(payload.with_identifier(path_id)));
        }

        let index = parse_index(&payload.uuid)
            .ok_or_else(|| ResolveError::InvalidPayload("invalid index".to_string()))?;
        let index = usize::try_from(index).map_err(|_| ResolveError::NotFound)?;
        Ok(UpdateTarget::ByIndex(index, payload))
    }

    /// All users as the caller may see them: full records when authorized,
    /// otherwise with each UUID replaced by the user's index.
    pub async fn list_visible(&self, authorized: bool) -> Result<Vec<User>> {
        let users = self.repository.get_users().await?;
        if authorized {
            return Ok(users);
        }

        Ok(users
            .iter()
            .enumerate()
            .map(|(index, user)| user.with_identifier(index.to_string()))
            .collect())
    }
}
