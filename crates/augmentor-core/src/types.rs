//! Core data types shared across the augmentation pipeline.

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::transform::TransformParams;

/// Smallest accepted batch.
pub const MIN_COUNT: u32 = 1;

/// Largest accepted batch.
pub const MAX_COUNT: u32 = 50;

/// A validated number of images to generate, always in `MIN_COUNT..=MAX_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchCount(u32);

impl BatchCount {
    /// Validate a requested count.
    pub fn new(count: u32) -> PipelineResult<Self> {
        if (MIN_COUNT..=MAX_COUNT).contains(&count) {
            Ok(Self(count))
        } else {
            Err(PipelineError::InvalidCount {
                count,
                min: MIN_COUNT,
                max: MAX_COUNT,
            })
        }
    }

    /// The count as a plain integer.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Number of leading images in the preview subset.
    pub fn preview_len(self, preview_count: usize) -> usize {
        (self.0 as usize).min(preview_count)
    }
}

impl TryFrom<u32> for BatchCount {
    type Error = PipelineError;

    fn try_from(count: u32) -> PipelineResult<Self> {
        Self::new(count)
    }
}

/// Input container formats the decoder accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Jpeg,
    Png,
}

impl SourceFormat {
    /// Lowercase format name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The decoded, normalized source: RGB8 with the longest edge within the cap.
///
/// Immutable once built; augmentation always works on copies.
#[derive(Debug, Clone)]
pub struct SourceImage {
    image: RgbImage,
    format: SourceFormat,
    original_width: u32,
    original_height: u32,
}

impl SourceImage {
    pub(crate) fn new(
        image: RgbImage,
        format: SourceFormat,
        original_width: u32,
        original_height: u32,
    ) -> Self {
        Self {
            image,
            format,
            original_width,
            original_height,
        }
    }

    /// Normalized pixels.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Detected input format.
    pub fn format(&self) -> SourceFormat {
        self.format
    }

    /// Normalized width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Normalized height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Dimensions before normalization.
    pub fn original_dimensions(&self) -> (u32, u32) {
        (self.original_width, self.original_height)
    }
}

/// One generated variant with its 1-based generation index.
#[derive(Debug, Clone)]
pub struct AugmentedImage {
    index: usize,
    image: RgbImage,
    params: TransformParams,
}

impl AugmentedImage {
    pub(crate) fn new(index: usize, image: RgbImage, params: TransformParams) -> Self {
        Self {
            index,
            image,
            params,
        }
    }

    /// 1-based position in the batch.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The augmented pixels.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// The transform values that produced this image.
    pub fn params(&self) -> &TransformParams {
        &self.params
    }
}

/// One archive member as reported to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryRecord {
    /// Member name inside the archive (`augmented_<i>.jpg`)
    pub name: String,

    /// Transform values applied for this entry
    pub transform: TransformParams,
}

/// Summary of one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    // === Source ===
    /// Detected input format
    pub source_format: SourceFormat,

    /// BLAKE3 hash of the input bytes
    pub source_hash: String,

    /// Width before normalization
    pub original_width: u32,

    /// Height before normalization
    pub original_height: u32,

    // === Output ===
    /// Width of every generated image
    pub width: u32,

    /// Height of every generated image
    pub height: u32,

    /// Number of generated images
    pub count: u32,

    /// Archive size in bytes
    pub archive_size: u64,

    /// BLAKE3 hash of the archive bytes
    pub archive_hash: String,

    /// Archive members in order
    pub entries: Vec<EntryRecord>,

    /// Base64-encoded WebP thumbnails of the preview subset
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub previews: Vec<String>,

    /// Wall-clock time for the whole run in milliseconds
    pub elapsed_ms: u64,
}
