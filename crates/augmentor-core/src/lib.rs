//! Augmentor Core - Embeddable image augmentation library.
//!
//! Augmentor takes one source image and produces a batch of randomly
//! transformed variants, packaged as a ZIP archive of JPEGs.
//!
//! # Architecture
//!
//! Augmentor is a pure, synchronous pipeline with no shared state:
//!
//! ```text
//! Bytes → Validate → Decode → Normalize → Transform ×N → Preview + ZIP
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use augmentor_core::{AugmentRequest, Augmentor, BatchCount, Config};
//! use rand::SeedableRng;
//!
//! fn main() -> augmentor_core::Result<()> {
//!     let augmentor = Augmentor::new(Config::load()?)?;
//!     let bytes = std::fs::read("photo.jpg")?;
//!     let request = AugmentRequest::new(bytes, BatchCount::new(20)?);
//!     let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//!
//!     let response = augmentor.run(request, &mut rng)?;
//!     std::fs::write("augmented_images.zip", &response.archive)?;
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod archive;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod transform;
pub mod types;

use std::time::Instant;

use rand::Rng;

// Re-exports for convenient access
pub use archive::ArchivePackager;
pub use config::Config;
pub use error::{AugmentorError, ConfigError, PipelineError, PipelineResult, Result};
pub use pipeline::{BatchGenerator, GeneratedBatch};
pub use transform::{TransformEngine, TransformParams, TransformPreset, TransformSpec};
pub use types::{AugmentedImage, BatchCount, EntryRecord, RunReport, SourceFormat, SourceImage};

use pipeline::{Hasher, PreviewRenderer};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// One generation request, owned by the caller.
#[derive(Debug, Clone)]
pub struct AugmentRequest {
    /// Raw JPEG or PNG bytes
    pub source: Vec<u8>,
    /// Number of variants to generate
    pub count: BatchCount,
    /// Transform ranges for this request; the configured spec when `None`
    pub spec: Option<TransformSpec>,
}

impl AugmentRequest {
    /// Request `count` variants of `source` with the configured spec.
    pub fn new(source: Vec<u8>, count: BatchCount) -> Self {
        Self {
            source,
            count,
            spec: None,
        }
    }

    /// Override the transform ranges for this request only.
    pub fn with_spec(mut self, spec: TransformSpec) -> Self {
        self.spec = Some(spec);
        self
    }
}

/// Everything a caller gets back from one successful run.
#[derive(Debug, Clone)]
pub struct AugmentResponse {
    /// The leading images of the batch, in generation order
    pub preview: Vec<AugmentedImage>,
    /// The finalized ZIP archive
    pub archive: Vec<u8>,
    /// Width of every generated image
    pub width: u32,
    /// Height of every generated image
    pub height: u32,
    /// Run summary
    pub report: RunReport,
}

/// Augmentor - the main entry point for batch augmentation.
pub struct Augmentor {
    config: Config,
    packager: ArchivePackager,
    previews: PreviewRenderer,
}

impl Augmentor {
    /// Create a new Augmentor with the given configuration.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        tracing::debug!("Initializing Augmentor v{}", VERSION);
        Ok(Self {
            packager: ArchivePackager::new(config.archive.clone()),
            previews: PreviewRenderer::new(config.preview.clone()),
            config,
        })
    }

    /// Create a new Augmentor from the config file, or defaults if absent.
    pub fn with_defaults() -> Result<Self> {
        let config = Config::load()?;
        Self::new(config)
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generate, package and summarize one batch.
    pub fn run<R: Rng + ?Sized>(
        &self,
        request: AugmentRequest,
        rng: &mut R,
    ) -> Result<AugmentResponse> {
        self.run_with_progress(request, rng, |_, _| {})
    }

    /// Like [`Augmentor::run`], reporting `(done, total)` after each variant.
    pub fn run_with_progress<R, F>(
        &self,
        request: AugmentRequest,
        rng: &mut R,
        progress: F,
    ) -> Result<AugmentResponse>
    where
        R: Rng + ?Sized,
        F: FnMut(usize, usize),
    {
        let start = Instant::now();
        let AugmentRequest {
            source,
            count,
            spec,
        } = request;

        let spec = spec.unwrap_or_else(|| self.config.generation.transform_spec());
        let generator = BatchGenerator::new(&self.config, spec)?;
        let batch = generator.generate_with_progress(&source, count, rng, progress)?;
        let archive = self.packager.pack(batch.images())?;

        let previews = self.previews.render_all(batch.preview());
        let source_image = batch.source();
        let (original_width, original_height) = source_image.original_dimensions();
        let (width, height) = (source_image.width(), source_image.height());

        let report = RunReport {
            source_format: source_image.format(),
            source_hash: Hasher::content_hash(&source),
            original_width,
            original_height,
            width,
            height,
            count: count.get(),
            archive_size: archive.len() as u64,
            archive_hash: Hasher::content_hash(&archive),
            entries: batch
                .images()
                .iter()
                .map(|img| EntryRecord {
                    name: crate::archive::entry_name(img.index()),
                    transform: *img.params(),
                })
                .collect(),
            previews,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        tracing::info!(
            "Generated {} images at {}x{} ({} byte archive) in {:?}",
            report.count,
            width,
            height,
            report.archive_size,
            start.elapsed()
        );

        Ok(AugmentResponse {
            preview: batch.preview().to_vec(),
            archive,
            width,
            height,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Jpeg).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = Config::default();
        config.archive.jpeg_quality = 0;
        assert!(matches!(
            Augmentor::new(config),
            Err(AugmentorError::Config(_))
        ));
    }

    #[test]
    fn test_run_builds_report() {
        let augmentor = Augmentor::new(Config::default()).unwrap();
        let request = AugmentRequest::new(jpeg_bytes(200, 100), BatchCount::new(3).unwrap());
        let response = augmentor
            .run(request, &mut StdRng::seed_from_u64(3))
            .unwrap();

        assert_eq!((response.width, response.height), (200, 100));
        assert_eq!(response.preview.len(), 3);
        assert_eq!(response.report.source_format, SourceFormat::Jpeg);
        assert_eq!(response.report.count, 3);
        assert_eq!(response.report.entries.len(), 3);
        assert_eq!(response.report.entries[2].name, "augmented_3.jpg");
        assert_eq!(response.report.previews.len(), 3);
        assert_eq!(response.report.archive_size, response.archive.len() as u64);
    }

    #[test]
    fn test_request_spec_overrides_config() {
        let augmentor = Augmentor::new(Config::default()).unwrap();
        let identity = TransformSpec {
            rotation_range: 0.0,
            horizontal_flip: 0.0,
            brightness_range: [1.0, 1.0],
            contrast_range: [1.0, 1.0],
            ..TransformSpec::default()
        };
        let request = AugmentRequest::new(jpeg_bytes(64, 64), BatchCount::new(2).unwrap())
            .with_spec(identity);
        let response = augmentor
            .run(request, &mut StdRng::seed_from_u64(1))
            .unwrap();
        for entry in &response.report.entries {
            assert_eq!(entry.transform, TransformParams::IDENTITY);
        }
    }

    #[test]
    fn test_previews_omitted_when_disabled() {
        let mut config = Config::default();
        config.preview.enabled = false;
        let augmentor = Augmentor::new(config).unwrap();
        let request = AugmentRequest::new(jpeg_bytes(32, 32), BatchCount::new(2).unwrap());
        let response = augmentor
            .run(request, &mut StdRng::seed_from_u64(1))
            .unwrap();
        assert!(response.report.previews.is_empty());
        assert_eq!(response.preview.len(), 2);
    }
}
