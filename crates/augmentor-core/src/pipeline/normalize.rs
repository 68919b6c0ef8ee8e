//! Source normalization: RGB8 with the longest edge capped.

use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};

use super::decode::DecodedImage;
use crate::types::SourceImage;

/// Dimensions that fit inside a `max_side` square, keeping aspect ratio.
///
/// Images already within bounds keep their size. Each side is at least 1.
pub fn fit_within(width: u32, height: u32, max_side: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_side {
        return (width, height);
    }

    let scale = max_side as f64 / longest as f64;
    let scaled = |side: u32| ((side as f64 * scale).round() as u32).clamp(1, max_side);
    (scaled(width), scaled(height))
}

/// Convert to RGB8 and downscale if either side exceeds `max_side`.
///
/// Applying this to its own output is a no-op.
pub fn normalize_image(image: DynamicImage, max_side: u32) -> RgbImage {
    let (width, height) = (image.width(), image.height());
    let (target_w, target_h) = fit_within(width, height, max_side);

    let resized = if (target_w, target_h) == (width, height) {
        image
    } else {
        tracing::debug!(
            from = %format!("{width}x{height}"),
            to = %format!("{target_w}x{target_h}"),
            "Downscaling source"
        );
        image.resize_exact(target_w, target_h, FilterType::Lanczos3)
    };

    resized.into_rgb8()
}

/// Build the immutable [`SourceImage`] from a decoded image.
pub fn normalize(decoded: DecodedImage, max_side: u32) -> SourceImage {
    let DecodedImage {
        image,
        format,
        width,
        height,
    } = decoded;
    SourceImage::new(normalize_image(image, max_side), format, width, height)
}
