//! The transform engine: one randomized composite augmentation per call.

use image::imageops;
use image::RgbImage;
use rand::Rng;

use crate::error::PipelineResult;

use super::affine;
use super::color;
use super::params::TransformParams;
use super::spec::TransformSpec;

/// Applies randomized augmentations described by a validated [`TransformSpec`].
///
/// The engine holds no mutable state; the random source is passed into each
/// call, so one engine can serve any number of requests.
#[derive(Debug, Clone)]
pub struct TransformEngine {
    spec: TransformSpec,
}

impl TransformEngine {
    /// Create an engine, rejecting malformed ranges up front.
    pub fn new(spec: TransformSpec) -> PipelineResult<Self> {
        spec.validate()?;
        Ok(Self { spec })
    }

    /// Draw the params for one augmentation.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> TransformParams {
        TransformParams::sample(&self.spec, rng)
    }

    /// Sample params and apply them to a copy of `image`.
    pub fn apply<R: Rng + ?Sized>(&self, image: &RgbImage, rng: &mut R) -> RgbImage {
        let params = self.sample(rng);
        tracing::trace!(?params, "Sampled transform");
        Self::apply_params(image, &params)
    }

    /// Apply fixed params: affine warp, flip, brightness, contrast, in that order.
    ///
    /// `image` is never mutated; the result is an independent buffer of the
    /// same dimensions.
    pub fn apply_params(image: &RgbImage, params: &TransformParams) -> RgbImage {
        let (width, height) = image.dimensions();

        let mut out = if params.is_geometric_identity() {
            image.clone()
        } else {
            affine::warp(image, &params.inverse_map(width, height))
        };

        if params.flip {
            imageops::flip_horizontal_in_place(&mut out);
        }
        if params.brightness != 1.0 {
            color::adjust_brightness(&mut out, params.brightness);
        }
        if params.contrast != 1.0 {
            color::adjust_contrast(&mut out, params.contrast);
        }

        out
    }
}
