//! Declarative randomization ranges for the transform engine.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Randomization ranges for one augmentation pass.
///
/// A range of zero (or a factor range collapsed to `[1.0, 1.0]`) disables
/// that sub-transform entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformSpec {
    /// Maximum rotation in degrees; the angle is drawn from `[-r, +r]`
    pub rotation_range: f32,

    /// Probability of mirroring left-right
    pub horizontal_flip: f64,

    /// Multiplicative brightness factor range `[low, high]`
    pub brightness_range: [f32; 2],

    /// Multiplicative contrast factor range `[low, high]`
    pub contrast_range: [f32; 2],

    /// Maximum horizontal shift as a fraction of width
    pub width_shift_range: f32,

    /// Maximum vertical shift as a fraction of height
    pub height_shift_range: f32,

    /// Maximum shear angle in degrees
    pub shear_range: f32,

    /// Per-axis zoom factor range `[low, high]`
    pub zoom_range: [f32; 2],
}

impl Default for TransformSpec {
    fn default() -> Self {
        Self {
            rotation_range: 25.0,
            horizontal_flip: 0.5,
            brightness_range: [0.8, 1.2],
            contrast_range: [0.8, 1.2],
            width_shift_range: 0.0,
            height_shift_range: 0.0,
            shear_range: 0.0,
            zoom_range: [1.0, 1.0],
        }
    }
}

impl TransformSpec {
    /// The four-transform minimum: rotate, flip, brightness, contrast.
    pub fn basic() -> Self {
        Self::default()
    }

    /// Adds shift, shear and zoom with the ranges dataset tooling usually ships.
    pub fn extended() -> Self {
        Self {
            rotation_range: 20.0,
            width_shift_range: 0.2,
            height_shift_range: 0.2,
            shear_range: 0.2,
            zoom_range: [0.8, 1.2],
            ..Self::default()
        }
    }

    /// Whether any of the affine extensions (shift, shear, zoom) are active.
    pub fn has_affine_extensions(&self) -> bool {
        self.width_shift_range > 0.0
            || self.height_shift_range > 0.0
            || self.shear_range > 0.0
            || self.zoom_range != [1.0, 1.0]
    }

    /// Check every range is finite, ordered and within its domain.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let scalars = [
            ("rotation_range", self.rotation_range),
            ("width_shift_range", self.width_shift_range),
            ("height_shift_range", self.height_shift_range),
            ("shear_range", self.shear_range),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(invalid(format!("{name} must be finite")));
            }
        }

        if !(0.0..=180.0).contains(&self.rotation_range) {
            return Err(invalid("rotation_range must be between 0 and 180 degrees"));
        }
        if !self.horizontal_flip.is_finite() || !(0.0..=1.0).contains(&self.horizontal_flip) {
            return Err(invalid("horizontal_flip must be a probability in [0, 1]"));
        }
        if !(0.0..1.0).contains(&self.width_shift_range) {
            return Err(invalid("width_shift_range must be in [0, 1)"));
        }
        if !(0.0..1.0).contains(&self.height_shift_range) {
            return Err(invalid("height_shift_range must be in [0, 1)"));
        }
        if !(0.0..90.0).contains(&self.shear_range) {
            return Err(invalid("shear_range must be in [0, 90) degrees"));
        }

        check_factor_range("brightness_range", self.brightness_range)?;
        check_factor_range("contrast_range", self.contrast_range)?;
        check_factor_range("zoom_range", self.zoom_range)?;
        Ok(())
    }
}

/// Multiplicative factors must be finite, ordered and strictly positive.
fn check_factor_range(name: &str, range: [f32; 2]) -> Result<(), PipelineError> {
    let [low, high] = range;
    if !low.is_finite() || !high.is_finite() {
        return Err(invalid(format!("{name} must be finite")));
    }
    if low > high {
        return Err(invalid(format!("{name} is inverted ({low} > {high})")));
    }
    if low <= 0.0 {
        return Err(invalid(format!("{name} must be positive")));
    }
    Ok(())
}

fn invalid(message: impl Into<String>) -> PipelineError {
    PipelineError::InvalidSpec(message.into())
}

/// Named transform presets selectable from config or the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformPreset {
    /// Rotation, flip, brightness, contrast
    #[default]
    Basic,
    /// Basic plus shift, shear and zoom
    Extended,
}

impl TransformPreset {
    /// Resolve the preset into its concrete ranges.
    pub fn spec(self) -> TransformSpec {
        match self {
            Self::Basic => TransformSpec::basic(),
            Self::Extended => TransformSpec::extended(),
        }
    }

    /// Lowercase preset name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Extended => "extended",
        }
    }

    /// Parse a preset name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "basic" => Some(Self::Basic),
            "extended" => Some(Self::Extended),
            _ => None,
        }
    }
}
