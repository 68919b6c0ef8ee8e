//! Randomized image transforms.
//!
//! - **spec**: declarative ranges ([`TransformSpec`]) and named presets
//! - **params**: one concrete draw from a spec ([`TransformParams`])
//! - **affine**: geometry (rotation, shift, shear, zoom) with edge-clamped warping
//! - **color**: brightness and contrast
//! - **engine**: composes the above in a fixed order ([`TransformEngine`])

pub mod affine;
pub mod color;
pub mod engine;
pub mod params;
pub mod spec;

pub use engine::TransformEngine;
pub use params::TransformParams;
pub use spec::{TransformPreset, TransformSpec};
