//! Input validation before decoding.

use crate::config::LimitsConfig;
use crate::error::PipelineError;
use crate::types::SourceFormat;

/// Validates source bytes before any decoding work.
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    /// Create a new validator with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Perform quick validation before full decode.
    ///
    /// Checks:
    /// - Input is not empty
    /// - Input size is within limits
    /// - Input has JPEG or PNG magic bytes
    pub fn validate(&self, bytes: &[u8]) -> Result<SourceFormat, PipelineError> {
        if bytes.is_empty() {
            return Err(PipelineError::Decode {
                message: "Input is empty".to_string(),
            });
        }

        let max_bytes = self.limits.max_input_size_mb.saturating_mul(1024 * 1024);
        if bytes.len() as u64 > max_bytes {
            return Err(PipelineError::InputTooLarge {
                size_mb: bytes.len() as u64 / (1024 * 1024),
                max_mb: self.limits.max_input_size_mb,
            });
        }

        Self::detect_format(bytes).ok_or_else(|| PipelineError::Decode {
            message: "Unrecognized image format (expected JPEG or PNG)".to_string(),
        })
    }

    /// Identify the container from its leading bytes.
    fn detect_format(header: &[u8]) -> Option<SourceFormat> {
        // JPEG: FF D8 FF
        if header.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(SourceFormat::Jpeg);
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if header.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(SourceFormat::Png);
        }

        None
    }
}
