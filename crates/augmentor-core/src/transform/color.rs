//! Photometric adjustments. Both operate in place and clamp to `0..=255`.

use image::RgbImage;

/// Multiply every channel by `factor`.
pub fn adjust_brightness(image: &mut RgbImage, factor: f32) {
    for pixel in image.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = scale_channel(*channel as f32 * factor);
        }
    }
}

/// Scale each channel's deviation from the image's mean luma by `factor`.
pub fn adjust_contrast(image: &mut RgbImage, factor: f32) {
    let mean = mean_luma(image) as f32;
    for pixel in image.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = scale_channel(mean + (*channel as f32 - mean) * factor);
        }
    }
}

/// Rounded mean of ITU-R 601 luma over the whole image.
pub fn mean_luma(image: &RgbImage) -> u8 {
    let count = image.width() as u64 * image.height() as u64;
    if count == 0 {
        return 0;
    }
    let sum: u64 = image
        .pixels()
        .map(|p| {
            let [r, g, b] = p.0;
            // 16.16 fixed point: 0.299, 0.587, 0.114
            (r as u64 * 19595 + g as u64 * 38470 + b as u64 * 7471 + 0x8000) >> 16
        })
        .sum();
    (sum as f64 / count as f64 + 0.5).floor().min(255.0) as u8
}

#[inline]
fn scale_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
