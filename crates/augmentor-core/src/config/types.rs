//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

use crate::transform::{TransformPreset, TransformSpec};

/// Batch generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Longest edge after normalization; larger sources are downscaled
    pub max_side: u32,

    /// Count used by callers that don't specify one
    pub default_count: u32,

    /// How many leading images form the preview subset
    pub preview_count: usize,

    /// Transform preset used when no explicit `transform` table is given
    pub preset: TransformPreset,

    /// Fixed seed for reproducible runs; entropy when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Explicit transform ranges, overriding `preset`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<TransformSpec>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_side: 512,
            default_count: 20,
            preview_count: 8,
            preset: TransformPreset::Basic,
            seed: None,
            transform: None,
        }
    }
}

impl GenerationConfig {
    /// The transform ranges this config resolves to.
    pub fn transform_spec(&self) -> TransformSpec {
        self.transform
            .clone()
            .unwrap_or_else(|| self.preset.spec())
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum source size in megabytes
    pub max_input_size_mb: u64,

    /// Maximum source dimension (width or height) accepted by the decoder
    pub max_image_dimension: u32,

    /// Wall-clock budget for one generation request in milliseconds
    pub generate_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_input_size_mb: 25,
            max_image_dimension: 10000,
            generate_timeout_ms: 60000,
        }
    }
}

/// Archive packaging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// JPEG quality for archive entries (1-100)
    pub jpeg_quality: u8,

    /// File name offered for the finished archive
    pub file_name: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 75,
            file_name: "augmented_images.zip".to_string(),
        }
    }
}

/// Preview thumbnail settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Whether to embed preview thumbnails in the run report
    pub enabled: bool,

    /// Thumbnail size in pixels (longest edge)
    pub thumbnail_size: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            thumbnail_size: 256,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the archive is written to when no explicit path is given
    pub dir: String,

    /// Pretty-print the JSON run report
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: ".".to_string(),
            pretty: true,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
