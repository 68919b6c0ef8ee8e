//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::types::{MAX_COUNT, MIN_COUNT};

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.generation.max_side == 0 {
            return Err(ConfigError::ValidationError(
                "generation.max_side must be > 0".into(),
            ));
        }
        if !(MIN_COUNT..=MAX_COUNT).contains(&self.generation.default_count) {
            return Err(ConfigError::ValidationError(format!(
                "generation.default_count must be between {MIN_COUNT} and {MAX_COUNT}"
            )));
        }
        if self.generation.preview_count == 0 {
            return Err(ConfigError::ValidationError(
                "generation.preview_count must be > 0".into(),
            ));
        }
        self.generation
            .transform_spec()
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("generation.transform: {e}")))?;
        if self.limits.max_input_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_input_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.generate_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.generate_timeout_ms must be > 0".into(),
            ));
        }
        if !(1..=100).contains(&self.archive.jpeg_quality) {
            return Err(ConfigError::ValidationError(
                "archive.jpeg_quality must be between 1 and 100".into(),
            ));
        }
        if self.archive.file_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "archive.file_name must not be empty".into(),
            ));
        }
        if self.preview.thumbnail_size == 0 {
            return Err(ConfigError::ValidationError(
                "preview.thumbnail_size must be > 0".into(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(
                "logging.format must be \"pretty\" or \"json\"".into(),
            ));
        }
        Ok(())
    }
}
