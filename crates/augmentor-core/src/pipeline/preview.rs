//! Preview thumbnails with WebP output.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;

use crate::config::PreviewConfig;
use crate::types::AugmentedImage;

/// Renders preview images as small WebP thumbnails.
pub struct PreviewRenderer {
    config: PreviewConfig,
}

impl PreviewRenderer {
    /// Create a new renderer with the given configuration.
    pub fn new(config: PreviewConfig) -> Self {
        Self { config }
    }

    /// Render a thumbnail and return it as a base64-encoded WebP string.
    ///
    /// Returns `None` if previews are disabled or encoding fails.
    pub fn render(&self, image: &RgbImage) -> Option<String> {
        self.render_bytes(image).map(|bytes| BASE64.encode(bytes))
    }

    /// Render a thumbnail and return the raw WebP bytes.
    pub fn render_bytes(&self, image: &RgbImage) -> Option<Vec<u8>> {
        if !self.config.enabled {
            return None;
        }

        // Longest edge = thumbnail_size, aspect ratio preserved
        let size = self.config.thumbnail_size;
        let thumbnail = DynamicImage::ImageRgb8(image.clone()).thumbnail(size, size);

        let mut buffer = Cursor::new(Vec::new());
        match thumbnail.write_to(&mut buffer, ImageFormat::WebP) {
            Ok(()) => Some(buffer.into_inner()),
            Err(e) => {
                tracing::warn!("Preview thumbnail failed: {}", e);
                None
            }
        }
    }

    /// Render every image of a preview subset, skipping failures.
    pub fn render_all(&self, images: &[AugmentedImage]) -> Vec<String> {
        images
            .iter()
            .filter_map(|img| self.render(img.image()))
            .collect()
    }

    /// Check if preview rendering is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }
}
