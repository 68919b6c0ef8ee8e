//! Augmentation pipeline components.
//!
//! This module contains the stages that turn source bytes into a batch:
//! - **validate**: Size and magic-byte checks before decoding
//! - **decode**: JPEG/PNG decoding with dimension limits
//! - **normalize**: RGB8 conversion and longest-edge downscaling
//! - **batch**: Runs the transform engine `count` times
//! - **hash**: BLAKE3 content hashes for run reports
//! - **preview**: WebP preview thumbnails

pub mod batch;
pub mod decode;
pub mod hash;
pub mod normalize;
pub mod preview;
pub mod validate;

// Re-exports for convenient access
pub use batch::{BatchGenerator, GeneratedBatch};
pub use decode::{DecodedImage, ImageDecoder};
pub use hash::Hasher;
pub use normalize::{fit_within, normalize_image};
pub use preview::PreviewRenderer;
pub use validate::Validator;
