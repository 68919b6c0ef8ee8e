//! Error types for the augmentation pipeline.
//!
//! Errors are organized by concern so a caller can tell a bad request
//! (count, spec, input bytes) apart from an internal encoding failure. Every
//! pipeline error is fatal for the request: no partial batch or archive is
//! ever returned alongside one.

use thiserror::Error;

/// Top-level error type for Augmentor operations.
#[derive(Error, Debug)]
pub enum AugmentorError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline errors, one variant per failure the request can hit.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Requested batch size is outside the accepted range
    #[error("Invalid count {count}: must be between {min} and {max}")]
    InvalidCount { count: u32, min: u32, max: u32 },

    /// Transform ranges are malformed (inverted, non-finite, out of bounds)
    #[error("Invalid transform spec: {0}")]
    InvalidSpec(String),

    /// Input bytes are not a valid JPEG or PNG image
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// Input exceeds the byte-size limit
    #[error("Input too large: {size_mb}MB > {max_mb}MB")]
    InputTooLarge { size_mb: u64, max_mb: u64 },

    /// Image header dimensions exceed the decoder limit
    #[error("Image too large: dimensions exceed {max_dim}px")]
    ImageTooLarge { max_dim: u32 },

    /// An augmented image could not be JPEG-encoded
    #[error("Encode error for augmented image {index}: {message}")]
    Encode { index: usize, message: String },

    /// The ZIP container could not be written
    #[error("Archive error: {0}")]
    Archive(String),
}

impl PipelineError {
    /// Whether this error was caused by the caller's input rather than the pipeline.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Self::Encode { .. } | Self::Archive(_))
    }
}

impl From<zip::result::ZipError> for PipelineError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Archive(err.to_string())
    }
}

/// Convenience type alias for Augmentor results.
pub type Result<T> = std::result::Result<T, AugmentorError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
