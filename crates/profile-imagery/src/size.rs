//! Resize dimensions and their allow-list

use crate::error::{ImageryError, Result};

/// Square edge lengths that may be requested
pub const SUPPORTED_DIMENSIONS: [u32; 2] = [48, 256];

/// Substituted for any dimension that is not an integer
const DEFAULT_DIMENSION: i64 = 256;

/// Split a size token into `(width, height)`.
///
/// `"WxH"` uses the first two `x`-separated parts; a token without `x` is a
/// single edge used for both. Non-numeric parts become 256.
pub fn parse_size_token(token: &str) -> (i64, i64) {
    let dimension = |part: &str| part.parse::<i64>().unwrap_or(DEFAULT_DIMENSION);

    if token.contains('x') {
        let mut parts = token.split('x').map(dimension);
        let width = parts.next().unwrap_or(DEFAULT_DIMENSION);
        let height = parts.next().unwrap_or(DEFAULT_DIMENSION);
        (width, height)
    } else {
        let edge = dimension(token);
        (edge, edge)
    }
}

/// Dimensions that passed the allow-list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageSize {
    width: u32,
    height: u32,
}

impl ImageSize {
    pub fn new(width: i64, height: i64) -> Result<Self> {
        let supported = width == height
            && SUPPORTED_DIMENSIONS
                .iter()
                .any(|&edge| i64::from(edge) == width);
        if !supported {
            return Err(ImageryError::UnsupportedSize { width, height });
        }

        // Both fit: they equal one of the u32 entries above.
        Ok(Self {
            width: width as u32,
            height: height as u32,
        })
    }

    pub fn from_token(token: &str) -> Result<Self> {
        let (width, height) = parse_size_token(token);
        Self::new(width, height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}
