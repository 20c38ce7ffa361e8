//! Profile image derivation pipeline
//!
//! Derives artifacts from a user's original profile image: fixed-size
//! resizes, cached in an [`artifact_store::ArtifactStore`] on first request,
//! and a badge composite rendered per request from a bundled template.
//! Every artifact is a pure function of its inputs.

mod badge;
mod error;
mod pipeline;
mod resize;
mod size;

pub use badge::{compose_badge, BadgeLayout, BADGE_TEMPLATE};
pub use error::{ImageryError, Result};
pub use pipeline::{original_key, resized_key, ArtifactKind, ImagePipeline};
pub use resize::resize_png;
pub use size::{parse_size_token, ImageSize, SUPPORTED_DIMENSIONS};
