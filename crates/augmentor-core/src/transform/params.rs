//! Concrete transform values drawn from a [`TransformSpec`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::affine::Affine;
use super::spec::TransformSpec;

/// One sampled augmentation: every randomized choice for a single engine call.
///
/// Applying the same params to the same image always yields the same pixels;
/// randomness lives entirely in [`TransformParams::sample`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformParams {
    /// Rotation in degrees, positive is counter-clockwise
    pub angle: f32,
    /// Horizontal shift as a fraction of width
    pub shift_x: f32,
    /// Vertical shift as a fraction of height
    pub shift_y: f32,
    /// Shear in degrees
    pub shear: f32,
    /// Horizontal zoom factor (values above 1 zoom out)
    pub zoom_x: f32,
    /// Vertical zoom factor
    pub zoom_y: f32,
    /// Mirror left-right
    pub flip: bool,
    /// Brightness multiplier
    pub brightness: f32,
    /// Contrast multiplier
    pub contrast: f32,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TransformParams {
    /// Params that leave an image unchanged.
    pub const IDENTITY: Self = Self {
        angle: 0.0,
        shift_x: 0.0,
        shift_y: 0.0,
        shear: 0.0,
        zoom_x: 1.0,
        zoom_y: 1.0,
        flip: false,
        brightness: 1.0,
        contrast: 1.0,
    };

    /// Draw one set of params from `spec`.
    ///
    /// Draw order is fixed (angle, shifts, shear, zoom, flip, brightness,
    /// contrast) and disabled ranges consume nothing from `rng`, so a seeded
    /// source reproduces the same sequence for the same spec.
    pub fn sample<R: Rng + ?Sized>(spec: &TransformSpec, rng: &mut R) -> Self {
        let angle = symmetric(rng, spec.rotation_range);
        let shift_x = symmetric(rng, spec.width_shift_range);
        let shift_y = symmetric(rng, spec.height_shift_range);
        let shear = symmetric(rng, spec.shear_range);
        let zoom_x = factor(rng, spec.zoom_range);
        let zoom_y = factor(rng, spec.zoom_range);
        let flip = chance(rng, spec.horizontal_flip);
        let brightness = factor(rng, spec.brightness_range);
        let contrast = factor(rng, spec.contrast_range);

        Self {
            angle,
            shift_x,
            shift_y,
            shear,
            zoom_x,
            zoom_y,
            flip,
            brightness,
            contrast,
        }
    }

    /// Whether the geometric part of these params is a no-op.
    pub fn is_geometric_identity(&self) -> bool {
        self.angle == 0.0
            && self.shift_x == 0.0
            && self.shift_y == 0.0
            && self.shear == 0.0
            && self.zoom_x == 1.0
            && self.zoom_y == 1.0
    }

    /// Build the output-to-source coordinate map for a `width` x `height` image.
    ///
    /// Composition matches the usual augmentation order: zoom, then shear,
    /// then shift, then rotation, all about the image center.
    pub fn inverse_map(&self, width: u32, height: u32) -> Affine {
        let rotation = Affine::rotation(self.angle);
        let shift = Affine::translation(
            -self.shift_x * width as f32,
            -self.shift_y * height as f32,
        );
        let shear = Affine::shear(self.shear);
        let zoom = Affine::scale(self.zoom_x, self.zoom_y);

        let center_x = (width as f32 - 1.0) / 2.0;
        let center_y = (height as f32 - 1.0) / 2.0;

        rotation
            .compose(&shift)
            .compose(&shear)
            .compose(&zoom)
            .centered(center_x, center_y)
    }
}

fn symmetric<R: Rng + ?Sized>(rng: &mut R, range: f32) -> f32 {
    if range > 0.0 {
        rng.gen_range(-range..=range)
    } else {
        0.0
    }
}

fn factor<R: Rng + ?Sized>(rng: &mut R, range: [f32; 2]) -> f32 {
    let [low, high] = range;
    if low < high {
        rng.gen_range(low..=high)
    } else {
        low
    }
}

fn chance<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> bool {
    if probability <= 0.0 {
        false
    } else if probability >= 1.0 {
        true
    } else {
        rng.gen_bool(probability)
    }
}
