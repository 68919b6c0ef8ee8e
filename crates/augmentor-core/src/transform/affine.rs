//! 2D affine maps and the edge-clamped warp that applies them.
//!
//! Maps are always used in the inverse direction: for every output pixel the
//! map yields the source coordinate to sample. Coordinates that land outside
//! the source are clamped to the nearest edge, so the warped image never has
//! empty or transparent regions.

use image::{Rgb, RgbImage};

/// A 2x3 affine matrix: `x' = a*x + b*y + c`, `y' = d*x + e*y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    m: [f32; 6],
}

impl Affine {
    /// The identity map.
    pub const IDENTITY: Self = Self {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
    };

    /// Rotation by `degrees` (counter-clockwise content motion in image space).
    pub fn rotation(degrees: f32) -> Self {
        if degrees == 0.0 {
            return Self::IDENTITY;
        }
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            m: [cos, -sin, 0.0, sin, cos, 0.0],
        }
    }

    /// Translation by `(dx, dy)` pixels.
    pub fn translation(dx: f32, dy: f32) -> Self {
        Self {
            m: [1.0, 0.0, dx, 0.0, 1.0, dy],
        }
    }

    /// Horizontal shear by `degrees`.
    pub fn shear(degrees: f32) -> Self {
        if degrees == 0.0 {
            return Self::IDENTITY;
        }
        Self {
            m: [1.0, -degrees.to_radians().tan(), 0.0, 0.0, 1.0, 0.0],
        }
    }

    /// Per-axis scale.
    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            m: [sx, 0.0, 0.0, 0.0, sy, 0.0],
        }
    }

    /// `self ∘ other`: apply `other` first, then `self`.
    pub fn compose(&self, other: &Self) -> Self {
        let [a1, b1, c1, d1, e1, f1] = self.m;
        let [a2, b2, c2, d2, e2, f2] = other.m;
        Self {
            m: [
                a1 * a2 + b1 * d2,
                a1 * b2 + b1 * e2,
                a1 * c2 + b1 * f2 + c1,
                d1 * a2 + e1 * d2,
                d1 * b2 + e1 * e2,
                d1 * c2 + e1 * f2 + f1,
            ],
        }
    }

    /// Re-anchor the map so it operates about `(cx, cy)` instead of the origin.
    pub fn centered(&self, cx: f32, cy: f32) -> Self {
        Self::translation(cx, cy)
            .compose(self)
            .compose(&Self::translation(-cx, -cy))
    }

    /// Map a point.
    #[inline]
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        let [a, b, c, d, e, f] = self.m;
        (a * x + b * y + c, d * x + e * y + f)
    }

    /// Whether this map leaves every point in place.
    pub fn is_identity(&self) -> bool {
        self.m == Self::IDENTITY.m
    }
}

/// Resample `image` through `map` (output → source) with bilinear
/// interpolation and nearest-edge fill.
///
/// The output has the same dimensions as the input. An identity map returns
/// an exact copy.
pub fn warp(image: &RgbImage, map: &Affine) -> RgbImage {
    if map.is_identity() {
        return image.clone();
    }

    let (width, height) = image.dimensions();
    let max_x = width.saturating_sub(1) as f32;
    let max_y = height.saturating_sub(1) as f32;

    RgbImage::from_fn(width, height, |x, y| {
        let (sx, sy) = map.apply(x as f32, y as f32);
        sample_bilinear(image, sx.clamp(0.0, max_x), sy.clamp(0.0, max_y))
    })
}

/// Bilinear sample at an in-bounds fractional coordinate.
fn sample_bilinear(image: &RgbImage, x: f32, y: f32) -> Rgb<u8> {
    let (width, height) = image.dimensions();
    let x0 = (x.floor() as u32).min(width - 1);
    let y0 = (y.floor() as u32).min(height - 1);
    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let p00 = image.get_pixel(x0, y0).0;
    let p10 = image.get_pixel(x1, y0).0;
    let p01 = image.get_pixel(x0, y1).0;
    let p11 = image.get_pixel(x1, y1).0;

    let mut out = [0u8; 3];
    for (c, value) in out.iter_mut().enumerate() {
        let top = p00[c] as f32 * (1.0 - fx) + p10[c] as f32 * fx;
        let bottom = p01[c] as f32 * (1.0 - fx) + p11[c] as f32 * fx;
        *value = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    Rgb(out)
}
