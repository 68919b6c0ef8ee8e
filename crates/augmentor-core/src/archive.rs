//! ZIP packaging of augmented images.
//!
//! Every image becomes one deflate-compressed `augmented_<i>.jpg` member, in
//! batch order. Entry metadata is pinned (DOS epoch timestamp, 0644
//! permissions) so the same images always produce the same archive bytes.

use std::io::{Cursor, Write};

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::config::ArchiveConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::types::AugmentedImage;

/// Member name for the image at 1-based position `index`.
pub fn entry_name(index: usize) -> String {
    format!("augmented_{}.jpg", index)
}

/// Packs a batch into an in-memory ZIP archive.
pub struct ArchivePackager {
    config: ArchiveConfig,
}

impl ArchivePackager {
    /// Create a packager with the given archive settings.
    pub fn new(config: ArchiveConfig) -> Self {
        Self { config }
    }

    /// Encode every image and return the finalized archive.
    ///
    /// Names follow sequence position, not the images' own indices. Any
    /// encoding failure aborts the whole archive.
    pub fn pack(&self, images: &[AugmentedImage]) -> PipelineResult<Vec<u8>> {
        if images.is_empty() {
            return Err(PipelineError::Archive(
                "refusing to build an archive with no entries".to_string(),
            ));
        }

        let start = std::time::Instant::now();
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = Self::entry_options();

        for (position, augmented) in images.iter().enumerate() {
            let index = position + 1;
            let jpeg = self.encode_jpeg(augmented.image(), index)?;
            let name = entry_name(index);
            tracing::trace!("  {} ({} bytes)", name, jpeg.len());

            writer.start_file(name, options)?;
            writer
                .write_all(&jpeg)
                .map_err(|e| PipelineError::Archive(e.to_string()))?;
        }

        let archive = writer.finish()?.into_inner();
        tracing::debug!(
            "Packed {} entries into {} bytes in {:?}",
            images.len(),
            archive.len(),
            start.elapsed()
        );
        Ok(archive)
    }

    /// JPEG-encode one image at the configured quality.
    pub fn encode_jpeg(&self, image: &RgbImage, index: usize) -> PipelineResult<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut buffer, self.config.jpeg_quality);
        encoder
            .encode_image(image)
            .map_err(|e| PipelineError::Encode {
                index,
                message: e.to_string(),
            })?;
        Ok(buffer)
    }

    fn entry_options() -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default())
            .unix_permissions(0o644)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::TransformParams;
    use image::Rgb;
    use std::io::Read;
    use zip::ZipArchive;

    fn batch(count: usize, width: u32, height: u32) -> Vec<AugmentedImage> {
        (1..=count)
            .map(|i| {
                let img = RgbImage::from_pixel(width, height, Rgb([(i * 20) as u8, 90, 200]));
                AugmentedImage::new(i, img, TransformParams::IDENTITY)
            })
            .collect()
    }

    fn packager() -> ArchivePackager {
        ArchivePackager::new(ArchiveConfig::default())
    }

    #[test]
    fn test_entry_name() {
        assert_eq!(entry_name(1), "augmented_1.jpg");
        assert_eq!(entry_name(50), "augmented_50.jpg");
    }

    #[test]
    fn test_pack_round_trip() {
        let bytes = packager().pack(&batch(3, 40, 30)).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 3);

        for i in 0..archive.len() {
            let mut file = archive.by_index(i).unwrap();
            assert_eq!(file.name(), format!("augmented_{}.jpg", i + 1));
            assert_eq!(file.compression(), CompressionMethod::Deflated);

            let mut jpeg = Vec::new();
            file.read_to_end(&mut jpeg).unwrap();
            let decoded = image::load_from_memory(&jpeg).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (40, 30));
        }
    }

    #[test]
    fn test_names_follow_position() {
        let mut images = batch(2, 8, 8);
        images.reverse();
        let bytes = packager().pack(&images).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<_> = archive.file_names().map(str::to_string).collect();
        assert!(names.contains(&"augmented_1.jpg".to_string()));
        assert!(names.contains(&"augmented_2.jpg".to_string()));
    }

    #[test]
    fn test_pack_is_deterministic() {
        let images = batch(4, 24, 24);
        assert_eq!(
            packager().pack(&images).unwrap(),
            packager().pack(&images).unwrap()
        );
    }

    #[test]
    fn test_empty_sequence_rejected() {
        let err = packager().pack(&[]).unwrap_err();
        assert!(matches!(err, PipelineError::Archive(_)));
    }

    #[test]
    fn test_encode_jpeg_signature() {
        let jpeg = packager()
            .encode_jpeg(&RgbImage::new(16, 16), 1)
            .unwrap();
        assert_eq!(&jpeg[..3], &[0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_higher_quality_is_larger() {
        let img = RgbImage::from_fn(64, 64, |x, y| Rgb([(x * 4) as u8, (y * 4) as u8, 0]));
        let low = ArchivePackager::new(ArchiveConfig {
            jpeg_quality: 10,
            ..ArchiveConfig::default()
        });
        let high = ArchivePackager::new(ArchiveConfig {
            jpeg_quality: 95,
            ..ArchiveConfig::default()
        });
        assert!(low.encode_jpeg(&img, 1).unwrap().len() < high.encode_jpeg(&img, 1).unwrap().len());
    }
}
