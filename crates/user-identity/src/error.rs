//! Error types for identity resolution and the user repository

use std::fmt;

/// Failures of the backing user store
#[derive(Debug)]
pub enum RepositoryError {
    Io(Box<std::io::Error>),
    Serialization(String),
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryError::Io(err) => write!(f, "IO error: {}", err),
            RepositoryError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for RepositoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RepositoryError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RepositoryError {
    fn from(err: std::io::Error) -> Self {
        RepositoryError::Io(Box::new(err))
    }
}

impl From<tempfile::PersistError> for RepositoryError {
    fn from(err: tempfile::PersistError) -> Self {
        RepositoryError::Io(Box::new(err.error))
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Serialization(err.to_string())
    }
}

impl From<tokio::task::JoinError> for RepositoryError {
    fn from(err: tokio::task::JoinError) -> Self {
        RepositoryError::Io(Box::new(std::io::Error::other(err.to_string())))
    }
}

/// Reasons a caller identifier cannot be resolved
#[derive(Debug)]
pub enum ResolveError {
    /// No user with that UUID, or the index is out of range
    NotFound,
    /// The payload identifier is not an index on the unauthorized update path
    InvalidPayload(String),
    Repository(RepositoryError),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::NotFound => write!(f, "User not found"),
            ResolveError::InvalidPayload(msg) => write!(f, "Invalid payload: {}", msg),
            ResolveError::Repository(err) => write!(f, "Repository error: {}", err),
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::Repository(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepositoryError> for ResolveError {
    fn from(err: RepositoryError) -> Self {
        ResolveError::Repository(err)
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;
