//! Batch generation - wires validation, decoding, normalization and the engine.

use std::time::Instant;

use rand::Rng;

use crate::config::Config;
use crate::error::PipelineResult;
use crate::transform::{TransformEngine, TransformSpec};
use crate::types::{AugmentedImage, BatchCount, SourceImage};

use super::decode::ImageDecoder;
use super::normalize::normalize;
use super::validate::Validator;

/// Output of one [`BatchGenerator`] call.
#[derive(Debug, Clone)]
pub struct GeneratedBatch {
    source: SourceImage,
    images: Vec<AugmentedImage>,
    preview_len: usize,
}

impl GeneratedBatch {
    /// The normalized source every image was derived from.
    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    /// All generated images in generation order.
    pub fn images(&self) -> &[AugmentedImage] {
        &self.images
    }

    /// The leading images shown to the caller as a preview.
    pub fn preview(&self) -> &[AugmentedImage] {
        &self.images[..self.preview_len]
    }
}

/// Turns one source image into `count` augmented variants.
pub struct BatchGenerator {
    validator: Validator,
    decoder: ImageDecoder,
    engine: TransformEngine,
    max_side: u32,
    preview_count: usize,
}

impl BatchGenerator {
    /// Create a generator from config, using `spec` for every engine call.
    pub fn new(config: &Config, spec: TransformSpec) -> PipelineResult<Self> {
        Ok(Self {
            validator: Validator::new(config.limits.clone()),
            decoder: ImageDecoder::new(config.limits.clone()),
            engine: TransformEngine::new(spec)?,
            max_side: config.generation.max_side,
            preview_count: config.generation.preview_count,
        })
    }

    /// Validate, decode and normalize source bytes.
    pub fn prepare(&self, bytes: &[u8]) -> PipelineResult<SourceImage> {
        let start = Instant::now();
        let format = self.validator.validate(bytes)?;
        tracing::trace!("  Validate: {:?}", start.elapsed());

        let decode_start = Instant::now();
        let decoded = self.decoder.decode(bytes, format)?;
        tracing::trace!("  Decode: {:?}", decode_start.elapsed());

        let normalize_start = Instant::now();
        let source = normalize(decoded, self.max_side);
        tracing::trace!("  Normalize: {:?}", normalize_start.elapsed());

        tracing::debug!(
            "Prepared {} source {}x{} -> {}x{} in {:?}",
            source.format(),
            source.original_dimensions().0,
            source.original_dimensions().1,
            source.width(),
            source.height(),
            start.elapsed()
        );
        Ok(source)
    }

    /// Generate `count` variants from source bytes.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        bytes: &[u8],
        count: BatchCount,
        rng: &mut R,
    ) -> PipelineResult<GeneratedBatch> {
        self.generate_with_progress(bytes, count, rng, |_, _| {})
    }

    /// Generate `count` variants, calling `progress(done, total)` after each one.
    pub fn generate_with_progress<R, F>(
        &self,
        bytes: &[u8],
        count: BatchCount,
        rng: &mut R,
        progress: F,
    ) -> PipelineResult<GeneratedBatch>
    where
        R: Rng + ?Sized,
        F: FnMut(usize, usize),
    {
        let source = self.prepare(bytes)?;
        Ok(self.augment(source, count, rng, progress))
    }

    /// Run the engine `count` times against an already normalized source.
    pub fn augment<R, F>(
        &self,
        source: SourceImage,
        count: BatchCount,
        rng: &mut R,
        mut progress: F,
    ) -> GeneratedBatch
    where
        R: Rng + ?Sized,
        F: FnMut(usize, usize),
    {
        let start = Instant::now();
        let total = count.get() as usize;
        let mut images = Vec::with_capacity(total);

        for index in 1..=total {
            let params = self.engine.sample(rng);
            tracing::trace!(index, ?params, "Augmenting");
            let image = TransformEngine::apply_params(source.image(), &params);
            images.push(AugmentedImage::new(index, image, params));
            progress(index, total);
        }

        tracing::debug!("Generated {} images in {:?}", total, start.elapsed());

        GeneratedBatch {
            preview_len: count.preview_len(self.preview_count),
            source,
            images,
        }
    }
}
