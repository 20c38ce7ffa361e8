//! Badge composition
//!
//! A badge is the bundled template with the user's photo in a fixed frame on
//! the left and the display name on the right, one whitespace-separated word
//! per line.

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};

/// Badge template, 296x128 BMP
pub const BADGE_TEMPLATE: &[u8] = include_bytes!("../assets/badge_template.bmp");

const INK: Rgb<u8> = Rgb([0, 0, 0]);

/// Fixed geometry of a badge, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeLayout {
    pub width: u32,
    pub height: u32,
    pub photo_x: i64,
    pub photo_y: i64,
    pub photo_size: u32,
    pub text_x: i64,
    pub first_baseline: i64,
    pub line_height: i64,
    /// Horizontal and vertical magnification of the 8x8 glyphs
    pub glyph_scale: (i64, i64),
}

impl BadgeLayout {
    pub const STANDARD: BadgeLayout = BadgeLayout {
        width: 296,
        height: 128,
        photo_x: 16,
        photo_y: 16,
        photo_size: 128 - 32,
        text_x: 124,
        first_baseline: 54,
        line_height: 40,
        glyph_scale: (2, 4),
    };

    pub fn baseline(&self, line: usize) -> i64 {
        self.first_baseline + line as i64 * self.line_height
    }

    /// Height of a rendered text line; glyphs sit on the baseline
    pub fn glyph_height(&self) -> i64 {
        8 * self.glyph_scale.1
    }

    pub fn glyph_advance(&self) -> i64 {
        8 * self.glyph_scale.0
    }
}

impl Default for BadgeLayout {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Composite `template`, `photo` and `name` into a badge.
///
/// Pure: the same inputs always produce the same pixels.
pub fn compose_badge(
    template: &DynamicImage,
    photo: &DynamicImage,
    name: &str,
    layout: &BadgeLayout,
) -> RgbImage {
    let mut canvas = RgbImage::new(layout.width, layout.height);

    let base = template
        .resize_exact(layout.width, layout.height, FilterType::Nearest)
        .to_rgb8();
    imageops::replace(&mut canvas, &base, 0, 0);

    let photo = photo
        .resize_exact(layout.photo_size, layout.photo_size, FilterType::Nearest)
        .to_rgb8();
    imageops::replace(&mut canvas, &photo, layout.photo_x, layout.photo_y);

    for (line, word) in name.split_whitespace().enumerate() {
        draw_text(&mut canvas, word, layout.text_x, layout.baseline(line), layout);
    }

    canvas
}

fn glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn draw_text(canvas: &mut RgbImage, text: &str, x: i64, baseline: i64, layout: &BadgeLayout) {
    let (scale_x, scale_y) = layout.glyph_scale;
    let top = baseline - layout.glyph_height();

    for (index, ch) in text.chars().enumerate() {
        let origin_x = x + index as i64 * layout.glyph_advance();
        if origin_x >= i64::from(canvas.width()) {
            break;
        }

        // Bit 0 of each row byte is the leftmost pixel.
        for (row, bits) in glyph(ch).iter().enumerate() {
            for col in 0..8i64 {
                if bits & (1 << col) != 0 {
                    fill(
                        canvas,
                        origin_x + col * scale_x,
                        top + row as i64 * scale_y,
                        scale_x,
                        scale_y,
                    );
                }
            }
        }
    }
}

/// Fill a rectangle with ink, clipped to the canvas
fn fill(canvas: &mut RgbImage, x: i64, y: i64, width: i64, height: i64) {
    let max_x = i64::from(canvas.width());
    let max_y = i64::from(canvas.height());
    for py in y.max(0)..(y + height).min(max_y) {
        for px in x.max(0)..(x + width).min(max_x) {
            canvas.put_pixel(px as u32, py as u32, INK);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> DynamicImage {
        image::load_from_memory_with_format(BADGE_TEMPLATE, image::ImageFormat::Bmp).unwrap()
    }

    fn photo() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 40, Rgb([200, 30, 30])))
    }

    /// Pixels that differ between two badges, as (x, y)
    fn diff(a: &RgbImage, b: &RgbImage) -> Vec<(u32, u32)> {
        a.enumerate_pixels()
            .filter(|(x, y, p)| b.get_pixel(*x, *y) != *p)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    #[test]
    fn test_template_is_badge_sized() {
        let template = template();
        assert_eq!((template.width(), template.height()), (296, 128));
    }

    #[test]
    fn test_photo_fills_its_frame() {
        let layout = BadgeLayout::STANDARD;
        let badge = compose_badge(&template(), &photo(), "", &layout);

        assert_eq!(badge.dimensions(), (296, 128));
        assert_eq!(badge.get_pixel(16, 16), &Rgb([200, 30, 30]));
        assert_eq!(badge.get_pixel(111, 111), &Rgb([200, 30, 30]));
        assert_ne!(badge.get_pixel(112, 112), &Rgb([200, 30, 30]));
    }

    #[test]
    fn test_name_renders_one_word_per_line() {
        let layout = BadgeLayout::STANDARD;
        let blank = compose_badge(&template(), &photo(), "", &layout);
        let badge = compose_badge(&template(), &photo(), "Ada Lovelace", &layout);

        let changed = diff(&badge, &blank);
        assert!(!changed.is_empty());

        let line_band = |line: usize| {
            let bottom = layout.baseline(line);
            let top = bottom - layout.glyph_height();
            move |y: u32| (top..bottom).contains(&i64::from(y))
        };
        let (first, second) = (line_band(0), line_band(1));

        assert!(changed.iter().all(|&(x, _)| i64::from(x) >= layout.text_x));
        assert!(changed.iter().all(|&(_, y)| first(y) || second(y)));
        assert!(changed.iter().any(|&(_, y)| first(y)));
        assert!(changed.iter().any(|&(_, y)| second(y)));
    }

    #[test]
    fn test_first_line_matches_single_word_badge() {
        let layout = BadgeLayout::STANDARD;
        let ada = compose_badge(&template(), &photo(), "Ada", &layout);
        let full = compose_badge(&template(), &photo(), "Ada  Lovelace", &layout);

        let first_band = (layout.baseline(0) - layout.glyph_height())..layout.baseline(0);
        assert!(diff(&ada, &full)
            .iter()
            .all(|&(_, y)| !first_band.contains(&i64::from(y))));
    }

    #[test]
    fn test_composition_is_deterministic() {
        let layout = BadgeLayout::STANDARD;
        let a = compose_badge(&template(), &photo(), "Grace Brewster Hopper", &layout);
        let b = compose_badge(&template(), &photo(), "Grace Brewster Hopper", &layout);
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_long_and_unknown_glyphs_are_clipped_not_panicking() {
        let layout = BadgeLayout::STANDARD;
        let name = "Wolfeschlegelsteinhausenbergerdorff ☃ Zoë";
        let badge = compose_badge(&template(), &photo(), name, &layout);
        assert_eq!(badge.dimensions(), (296, 128));
    }
}
