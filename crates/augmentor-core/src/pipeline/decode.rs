//! Image decoding with format detection and dimension limits.

use image::error::{ImageError, LimitErrorKind};
use image::{DynamicImage, GenericImageView, ImageFormat, Limits};
use std::io::Cursor;

use crate::config::LimitsConfig;
use crate::error::PipelineError;
use crate::types::SourceFormat;

/// Image decoder with configurable limits.
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// Result of decoding an image.
#[derive(Debug)]
pub struct DecodedImage {
    /// The decoded image data
    pub image: DynamicImage,
    /// Detected image format
    pub format: SourceFormat,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Decode bytes already identified as `format` by the validator.
    ///
    /// Dimensions are checked against the header before pixels are allocated,
    /// so oversized images fail fast with [`PipelineError::ImageTooLarge`].
    pub fn decode(
        &self,
        bytes: &[u8],
        format: SourceFormat,
    ) -> Result<DecodedImage, PipelineError> {
        let mut reader = image::ImageReader::with_format(Cursor::new(bytes), image_format(format));

        let mut limits = Limits::default();
        limits.max_image_width = Some(self.limits.max_image_dimension);
        limits.max_image_height = Some(self.limits.max_image_dimension);
        reader.limits(limits);

        let image = reader
            .decode()
            .map_err(|e| decode_error(e, self.limits.max_image_dimension))?;

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(PipelineError::Decode {
                message: "Image has zero width or height".to_string(),
            });
        }

        tracing::debug!(%format, width, height, "Decoded source image");

        Ok(DecodedImage {
            image,
            format,
            width,
            height,
        })
    }
}

fn image_format(format: SourceFormat) -> ImageFormat {
    match format {
        SourceFormat::Jpeg => ImageFormat::Jpeg,
        SourceFormat::Png => ImageFormat::Png,
    }
}

/// Only a header dimension overrun is `ImageTooLarge`; allocation and other
/// limit failures surface as decode errors with the decoder's message.
fn decode_error(err: ImageError, max_dim: u32) -> PipelineError {
    match err {
        ImageError::Limits(ref limit) if matches!(limit.kind(), LimitErrorKind::DimensionError) => {
            PipelineError::ImageTooLarge { max_dim }
        }
        other => PipelineError::Decode {
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::error::LimitError;
    use image::{Rgb, RgbImage};

    fn encode(image: &RgbImage, format: ImageFormat) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, format).unwrap();
        buffer.into_inner()
    }

    fn decoder() -> ImageDecoder {
        ImageDecoder::new(LimitsConfig::default())
    }

    #[test]
    fn test_decode_png() {
        let img = RgbImage::from_pixel(40, 30, Rgb([10, 20, 30]));
        let decoded = decoder()
            .decode(&encode(&img, ImageFormat::Png), SourceFormat::Png)
            .unwrap();
        assert_eq!(decoded.format, SourceFormat::Png);
        assert_eq!((decoded.width, decoded.height), (40, 30));
    }

    #[test]
    fn test_decode_jpeg() {
        let img = RgbImage::from_pixel(64, 48, Rgb([200, 100, 50]));
        let decoded = decoder()
            .decode(&encode(&img, ImageFormat::Jpeg), SourceFormat::Jpeg)
            .unwrap();
        assert_eq!(decoded.format, SourceFormat::Jpeg);
        assert_eq!((decoded.width, decoded.height), (64, 48));
    }

    #[test]
    fn test_truncated_jpeg_is_decode_error() {
        let img = RgbImage::from_pixel(64, 48, Rgb([200, 100, 50]));
        let bytes = encode(&img, ImageFormat::Jpeg);
        let err = decoder().decode(&bytes[..20], SourceFormat::Jpeg).unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }

    #[test]
    fn test_decodes_with_the_given_format() {
        let img = RgbImage::from_pixel(8, 8, Rgb([1, 2, 3]));
        let png = encode(&img, ImageFormat::Png);
        let err = decoder().decode(&png, SourceFormat::Jpeg).unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }

    #[test]
    fn test_dimension_limit() {
        let decoder = ImageDecoder::new(LimitsConfig {
            max_image_dimension: 16,
            ..LimitsConfig::default()
        });
        let img = RgbImage::new(32, 8);
        let err = decoder
            .decode(&encode(&img, ImageFormat::Png), SourceFormat::Png)
            .unwrap_err();
        assert!(matches!(err, PipelineError::ImageTooLarge { max_dim: 16 }));
    }

    #[test]
    fn test_allocation_limit_is_not_reported_as_dimensions() {
        let err = ImageError::Limits(LimitError::from_kind(LimitErrorKind::InsufficientMemory));
        match decode_error(err, 10_000) {
            PipelineError::Decode { message } => assert!(!message.is_empty()),
            other => panic!("unexpected error: {other:?}"),
        }

        let err = ImageError::Limits(LimitError::from_kind(LimitErrorKind::DimensionError));
        assert!(matches!(
            decode_error(err, 10_000),
            PipelineError::ImageTooLarge { max_dim: 10_000 }
        ));
    }
}
