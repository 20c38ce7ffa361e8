//! Error types for the image pipeline

use artifact_store::StoreError;
use std::fmt;

#[derive(Debug)]
pub enum ImageryError {
    /// The source image (or the record it belongs to) does not exist
    NotFound(String),
    /// Requested dimensions are outside the allow-list
    UnsupportedSize { width: i64, height: i64 },
    /// Decoding or encoding failed
    Image(String),
    Store(StoreError),
    /// The blocking render task was cancelled or panicked
    Task(String),
}

impl fmt::Display for ImageryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageryError::NotFound(what) => write!(f, "Image not found: {}", what),
            ImageryError::UnsupportedSize { width, height } => {
                write!(f, "Image size not supported: {}x{}", width, height)
            }
            ImageryError::Image(msg) => write!(f, "Image error: {}", msg),
            ImageryError::Store(err) => write!(f, "Store error: {}", err),
            ImageryError::Task(msg) => write!(f, "Render task failed: {}", msg),
        }
    }
}

impl std::error::Error for ImageryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImageryError::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ImageryError {
    fn from(err: StoreError) -> Self {
        ImageryError::Store(err)
    }
}

impl From<image::ImageError> for ImageryError {
    fn from(err: image::ImageError) -> Self {
        ImageryError::Image(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ImageryError {
    fn from(err: tokio::task::JoinError) -> Self {
        ImageryError::Task(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ImageryError>;
