//! User repository
//!
//! Records are kept in insertion order. A user's positional index is its
//! offset in that order, so deleting a user shifts every later index down by
//! one and a freed index is reused by whichever user moves into it. Callers
//! that address users by index get no stronger guarantee than that.

use crate::error::RepositoryError;
use crate::types::User;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

type RepoResult<T> = std::result::Result<T, RepositoryError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user(&self, uuid: &str) -> RepoResult<Option<User>>;

    async fn get_user_by_index(&self, index: usize) -> RepoResult<Option<User>>;

    /// All users in index order
    async fn get_users(&self) -> RepoResult<Vec<User>>;

    /// Add a user, returning its UUID, or `None` if the record is rejected
    async fn create_user(&self, user: User) -> RepoResult<Option<String>>;

    /// Replace the user with the same UUID
    async fn update_user(&self, user: User) -> RepoResult<bool>;

    /// Replace the user at `index`, keeping its stored UUID
    async fn update_user_by_index(&self, index: usize, user: User) -> RepoResult<bool>;

    async fn delete_user(&self, uuid: &str) -> RepoResult<bool>;
}

/// In-memory repository with an optional JSON snapshot on disk.
///
/// The snapshot is rewritten through a temp file and rename after every
/// mutation, so a crash leaves either the old or the new list.
pub struct JsonUserRepository {
    users: RwLock<Vec<User>>,
    path: Option<PathBuf>,
}

impl JsonUserRepository {
    /// Repository without persistence
    pub fn in_memory() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            path: None,
        }
    }

    /// Load the snapshot at `path`, starting empty if it does not exist
    pub async fn open(path: impl Into<PathBuf>) -> RepoResult<Self> {
        let path = path.into();
        let users = match tokio::fs::read(&path).await {
            Ok(data) => serde_json::from_slice::<Vec<User>>(&data)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        info!(path = ?path, users = users.len(), "Loaded user repository");

        Ok(Self {
            users: RwLock::new(users),
            path: Some(path),
        })
    }

    async fn save(&self, users: &[User]) -> RepoResult<()> {
        let Some(path) = self.path.clone() else {
            return Ok(());
        };
        let json = serde_json::to_vec_pretty(users)?;
        tokio::task::spawn_blocking(move || write_snapshot(&path, &json)).await??;
        debug!(users = users.len(), "Saved user repository");
        Ok(())
    }
}

fn write_snapshot(path: &Path, data: &[u8]) -> RepoResult<()> {
    use std::io::Write;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}

#[async_trait]
impl UserRepository for JsonUserRepository {
    async fn get_user(&self, uuid: &str) -> RepoResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.uuid == uuid).cloned())
    }

    async fn get_user_by_index(&self, index: usize) -> RepoResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(index).cloned())
    }

    async fn get_users(&self) -> RepoResult<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn create_user(&self, user: User) -> RepoResult<Option<String>> {
        let mut users = self.users.write().await;
        if user.uuid.is_empty() || user.name.trim().is_empty() {
            warn!("Rejected user without uuid or name");
            return Ok(None);
        }
        if users.iter().any(|u| u.uuid == user.uuid) {
            warn!("Rejected user with duplicate uuid");
            return Ok(None);
        }

        let uuid = user.uuid.clone();
        users.push(user);
        if let Err(e) = self.save(&users).await {
            users.pop();
            return Err(e);
        }
        Ok(Some(uuid))
    }

    async fn update_user(&self, user: User) -> RepoResult<bool> {
        let mut users = self.users.write().await;
        let Some(position) = users.iter().position(|u| u.uuid == user.uuid) else {
            return Ok(false);
        };

        let previous = std::mem::replace(&mut users[position], user);
        if let Err(e) = self.save(&users).await {
            users[position] = previous;
            return Err(e);
        }
        Ok(true)
    }

    async fn update_user_by_index(&self, index: usize, user: User) -> RepoResult<bool> {
        let mut users = self.users.write().await;
        let Some(existing) = users.get(index) else {
            return Ok(false);
        };

        let replacement = user.with_identifier(existing.uuid.clone());
        let previous = std::mem::replace(&mut users[index], replacement);
        if let Err(e) = self.save(&users).await {
            users[index] = previous;
            return Err(e);
        }
        Ok(true)
    }

    async fn delete_user(&self, uuid: &str) -> RepoResult<bool> {
        let mut users = self.users.write().await;
        let Some(position) = users.iter().position(|u| u.uuid == uuid) else {
            return Ok(false);
        };

        let removed = users.remove(position);
        if let Err(e) = self.save(&users).await {
            users.insert(position, removed);
            return Err(e);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn user(uuid: &str, name: &str) -> User {
        User {
            uuid: uuid.to_string(),
            name: name.to_string(),
            description: String::new(),
            profile_b64: None,
            chat_phrase: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let repo = JsonUserRepository::in_memory();
        assert_eq!(
            repo.create_user(user("u-1", "Ada")).await.unwrap(),
            Some("u-1".to_string())
        );
        repo.create_user(user("u-2", "Grace")).await.unwrap();

        assert_eq!(repo.get_user("u-2").await.unwrap().unwrap().name, "Grace");
        assert_eq!(repo.get_user_by_index(0).await.unwrap().unwrap().uuid, "u-1");
        assert!(repo.get_user_by_index(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicates_and_blank_names() {
        let repo = JsonUserRepository::in_memory();
        repo.create_user(user("u-1", "Ada")).await.unwrap();

        assert!(repo.create_user(user("u-1", "Other")).await.unwrap().is_none());
        assert!(repo.create_user(user("u-2", "  ")).await.unwrap().is_none());
        assert_eq!(repo.get_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_by_index_keeps_uuid() {
        let repo = JsonUserRepository::in_memory();
        repo.create_user(user("u-1", "Ada")).await.unwrap();

        assert!(repo.update_user_by_index(0, user("0", "Ada L.")).await.unwrap());
        let stored = repo.get_user_by_index(0).await.unwrap().unwrap();
        assert_eq!(stored.uuid, "u-1");
        assert_eq!(stored.name, "Ada L.");

        assert!(!repo.update_user_by_index(5, user("5", "x")).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_shifts_indices() {
        let repo = JsonUserRepository::in_memory();
        repo.create_user(user("u-1", "Ada")).await.unwrap();
        repo.create_user(user("u-2", "Grace")).await.unwrap();

        assert!(repo.delete_user("u-1").await.unwrap());
        assert!(!repo.delete_user("u-1").await.unwrap());
        assert_eq!(repo.get_user_by_index(0).await.unwrap().unwrap().uuid, "u-2");
    }

    #[tokio::test]
    async fn test_snapshot_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.json");

        let repo = JsonUserRepository::open(&path).await.unwrap();
        repo.create_user(user("u-1", "Ada")).await.unwrap();
        repo.update_user(user("u-1", "Ada King")).await.unwrap();
        drop(repo);

        let reopened = JsonUserRepository::open(&path).await.unwrap();
        let users = reopened.get_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Ada King");
    }

    #[tokio::test]
    async fn test_open_rejects_corrupt_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, b"{not json").unwrap();

        assert!(matches!(
            JsonUserRepository::open(&path).await,
            Err(RepositoryError::Serialization(_))
        ));
    }
}
