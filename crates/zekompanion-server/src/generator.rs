//! Content for newly created users
//!
//! [`ContentGenerator`] is the seam for whatever produces a new user's name,
//! description, chat phrase and profile picture. [`OfflineGenerator`] needs no
//! external service: it picks from fixed word lists and paints a two-tone
//! portrait derived from the name.

use std::io::Cursor;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use sha2::{Digest, Sha256};

use crate::error::AppError;

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn user_name(&self) -> Result<String, AppError>;

    async fn user_description(&self, name: &str) -> Result<String, AppError>;

    async fn user_chat_phrase(&self, name: &str, description: &str) -> Result<String, AppError>;

    /// PNG bytes of the user's profile picture
    async fn profile_image(&self, name: &str, description: &str) -> Result<Vec<u8>, AppError>;
}

const FIRST_NAMES: &[&str] = &[
    "Ada", "Grace", "Alan", "Katherine", "Linus", "Margaret", "Dennis", "Barbara", "Ken", "Radia",
    "Edsger", "Frances", "Hedy", "John", "Sophie", "Tim",
];

const LAST_NAMES: &[&str] = &[
    "Lovelace", "Hopper", "Turing", "Johnson", "Torvalds", "Hamilton", "Ritchie", "Liskov",
    "Thompson", "Perlman", "Dijkstra", "Allen", "Lamarr", "Backus", "Wilson", "Berners-Lee",
];

const PORTRAIT_SIZE: u32 = 256;

/// Deterministic generator: the same seed yields the same sequence of users
pub struct OfflineGenerator {
    seed: u64,
    counter: AtomicU64,
}

impl OfflineGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            counter: AtomicU64::new(0),
        }
    }

    fn digest(parts: &[&[u8]]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        hasher.finalize().into()
    }
}

#[async_trait]
impl ContentGenerator for OfflineGenerator {
    async fn user_name(&self) -> Result<String, AppError> {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let digest = Self::digest(&[&self.seed.to_le_bytes(), &n.to_le_bytes()]);

        let first = FIRST_NAMES[usize::from(digest[0]) % FIRST_NAMES.len()];
        let last = LAST_NAMES[usize::from(digest[1]) % LAST_NAMES.len()];
        Ok(format!("{first} {last}"))
    }

    async fn user_description(&self, name: &str) -> Result<String, AppError> {
        Ok(format!(
            "{name} is a friendly badge companion who collects conference stickers."
        ))
    }

    async fn user_chat_phrase(&self, name: &str, _description: &str) -> Result<String, AppError> {
        let first = name.split_whitespace().next().unwrap_or(name);
        Ok(format!("Hi, I'm {first}! Want to swap badges?"))
    }

    async fn profile_image(&self, name: &str, _description: &str) -> Result<Vec<u8>, AppError> {
        let digest = Self::digest(&[name.as_bytes()]);
        let background = Rgb([digest[0], digest[1], digest[2]]);
        let foreground = Rgb([!digest[0], !digest[1], !digest[2]]);

        let portrait = RgbImage::from_fn(PORTRAIT_SIZE, PORTRAIT_SIZE, |x, y| {
            let dx = i64::from(x) - i64::from(PORTRAIT_SIZE / 2);
            let dy = i64::from(y) - i64::from(PORTRAIT_SIZE / 2);
            if dx * dx + dy * dy < 80 * 80 {
                foreground
            } else {
                background
            }
        });

        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(portrait)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(|e| AppError::Internal(format!("Failed to encode profile image: {e}")))?;
        Ok(buf)
    }
}
