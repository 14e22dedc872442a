//! Angle and per-axis range helpers shared by the armature and gesture code.
//!
//! Orientations are Euler triples stored in a `Vec3` as (x, y, z) radians;
//! the component order is storage order only, not composition order (see
//! [`crate::armature::compose`]).

use glam::Vec3;

/// Tolerance used by float comparisons in tests and validation.
pub const EPSILON: f32 = 1e-5;

/// Convert a degree triple to radians component-wise.
pub fn degrees_to_radians(v: Vec3) -> Vec3 {
    Vec3::new(v.x.to_radians(), v.y.to_radians(), v.z.to_radians())
}

/// Convert a radian triple to degrees component-wise.
pub fn radians_to_degrees(v: Vec3) -> Vec3 {
    Vec3::new(v.x.to_degrees(), v.y.to_degrees(), v.z.to_degrees())
}

/// Clamp a scalar with `max(min(..))` semantics; never panics on inverted bounds.
#[inline]
pub fn clamp_angle(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Inclusive per-axis angular bounds, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationRange {
    pub min: Vec3,
    pub max: Vec3,
}

impl RotationRange {
    /// A range that admits no rotation on any axis.
    pub const LOCKED: Self = Self {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Clamp every axis of `candidate` into the range.
    pub fn clamp(&self, candidate: Vec3) -> Vec3 {
        Vec3::new(
            clamp_angle(candidate.x, self.min.x, self.max.x),
            clamp_angle(candidate.y, self.min.y, self.max.y),
            clamp_angle(candidate.z, self.min.z, self.max.z),
        )
    }

    pub fn contains(&self, v: Vec3) -> bool {
        v.cmpge(self.min).all() && v.cmple(self.max).all()
    }
}
