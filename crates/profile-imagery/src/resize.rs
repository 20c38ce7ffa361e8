use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

use crate::error::Result;
use crate::size::ImageSize;

/// Stretch an encoded image to exactly `size` and encode it as RGB PNG.
///
/// Nearest-neighbour sampling, no aspect-ratio preservation or letterboxing.
pub fn resize_png(source: &[u8], size: ImageSize) -> Result<Vec<u8>> {
    let image = image::load_from_memory(source)?;
    let resized = image
        .resize_exact(size.width(), size.height(), FilterType::Nearest)
        .to_rgb8();
    encode(DynamicImage::ImageRgb8(resized), ImageFormat::Png)
}

pub(crate) fn encode(image: DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), format)?;
    Ok(buf)
}
