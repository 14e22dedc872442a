//! Pointer deltas to rotation deltas.
//!
//! Sensitivity: a translation of `pixels_per_radian` pixels maps to pi
//! radians, i.e. `radians = pixels * PI / pixels_per_radian`.

use glam::{Vec2, Vec3};
use std::f32::consts::PI;

use crate::config::GestureConfig;
use crate::math::clamp_angle;
use crate::scene::{NodeHandle, Scene};

/// Camera rig basis vectors expressed in a segment's parent frame,
/// captured when a segment pan begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameAxes {
    pub x: Vec3,
    pub z: Vec3,
}

impl FrameAxes {
    /// Frame of an unrotated camera looking at an unrotated figure.
    pub const IDENTITY: Self = Self {
        x: Vec3::X,
        z: Vec3::Z,
    };

    /// Ask the scene for the camera's X and Z axes in `target`'s frame.
    pub fn capture<S: Scene + ?Sized>(scene: &S, camera: NodeHandle, target: NodeHandle) -> Self {
        Self {
            x: scene.convert_vector(Vec3::X, camera, target),
            z: scene.convert_vector(Vec3::Z, camera, target),
        }
    }
}

/// Per-axis rotation deltas produced by a segment pan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanDelta {
    pub x: f32,
    pub z: f32,
}

/// Stateless mapping from gesture samples to candidate orientations.
/// Candidates for segments are unclamped; the segment clamps on store.
#[derive(Debug, Clone)]
pub struct GestureMapper {
    config: GestureConfig,
}

impl GestureMapper {
    pub fn new(config: GestureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    #[inline]
    pub fn radians_for(&self, pixels: f32) -> f32 {
        pixels * PI / self.config.pixels_per_radian
    }

    /// Two-finger pan: horizontal drives yaw, vertical drives pitch, both
    /// negated. Pitch is clamped to the configured limit; yaw is free.
    pub fn camera_pan(&self, start: Vec3, translation: Vec2) -> Vec3 {
        let yaw = -self.radians_for(translation.x);
        let pitch = -self.radians_for(translation.y);
        let limit = self.config.pitch_limit_radians();
        Vec3::new(
            clamp_angle(start.x + pitch, -limit, limit),
            start.y + yaw,
            start.z,
        )
    }

    /// One-finger pan on a segment, projected through the captured camera frame.
    pub fn segment_pan_delta(&self, segment: &str, translation: Vec2, frame: &FrameAxes) -> PanDelta {
        let v = self.radians_for(translation.y);
        let mut h = self.radians_for(translation.x);
        if self.config.flips_horizontal(segment) {
            h = -h;
        }
        PanDelta {
            x: v * frame.x.x + h * frame.z.x,
            z: v * frame.x.z + h * frame.z.z,
        }
    }

    /// Candidate orientation for a segment pan. Y (twist) is untouched.
    pub fn segment_pan(&self, segment: &str, start: Vec3, translation: Vec2, frame: &FrameAxes) -> Vec3 {
        let d = self.segment_pan_delta(segment, translation, frame);
        Vec3::new(start.x + d.x, start.y, start.z + d.z)
    }

    /// Candidate orientation for a twist. Only Y changes.
    pub fn twist(&self, start: Vec3, angle: f32) -> Vec3 {
        Vec3::new(start.x, start.y + angle * self.config.twist_factor, start.z)
    }
}

impl Default for GestureMapper {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::EPSILON;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_sensitivity() {
        let m = GestureMapper::default();
        assert!((m.radians_for(360.0) - PI).abs() < EPSILON);
        assert!((m.radians_for(-180.0) + FRAC_PI_2).abs() < EPSILON);
    }

    #[test]
    fn test_camera_pan_negates_and_clamps_pitch() {
        let m = GestureMapper::default();
        let limit = 0.49 * PI;

        let o = m.camera_pan(Vec3::ZERO, Vec2::new(90.0, 0.0));
        assert!((o.y + PI / 4.0).abs() < EPSILON);
        assert_eq!(o.x, 0.0);

        let down = m.camera_pan(Vec3::ZERO, Vec2::new(0.0, 10_000.0));
        assert_eq!(down.x, -limit);
        let up = m.camera_pan(Vec3::ZERO, Vec2::new(0.0, -10_000.0));
        assert_eq!(up.x, limit);

        // Yaw is unbounded.
        let spun = m.camera_pan(Vec3::ZERO, Vec2::new(-3600.0, 0.0));
        assert!((spun.y - 10.0 * PI).abs() < 1e-3);
    }

    #[test]
    fn test_segment_pan_identity_frame() {
        let m = GestureMapper::default();
        let d = m.segment_pan_delta("Elbow", Vec2::new(90.0, 180.0), &FrameAxes::IDENTITY);
        assert!((d.x - FRAC_PI_2).abs() < EPSILON);
        assert!((d.z - PI / 4.0).abs() < EPSILON);
    }

    #[test]
    fn test_segment_pan_rotated_frame() {
        // Figure facing left: camera X is -Z and camera Z is +X in the parent frame.
        let frame = FrameAxes {
            x: Vec3::NEG_Z,
            z: Vec3::X,
        };
        let m = GestureMapper::default();
        let vertical = m.segment_pan_delta("Elbow", Vec2::new(0.0, 180.0), &frame);
        assert!(vertical.x.abs() < EPSILON);
        assert!((vertical.z + FRAC_PI_2).abs() < EPSILON);

        let horizontal = m.segment_pan_delta("Elbow", Vec2::new(180.0, 0.0), &frame);
        assert!((horizontal.x - FRAC_PI_2).abs() < EPSILON);
        assert!(horizontal.z.abs() < EPSILON);
    }

    #[test]
    fn test_head_flip_negates_horizontal_only() {
        let m = GestureMapper::default();
        let frame = FrameAxes {
            x: Vec3::new(0.6, 0.0, 0.8),
            z: Vec3::new(-0.8, 0.0, 0.6),
        };
        let horizontal = Vec2::new(75.0, 0.0);
        let head = m.segment_pan_delta("Head", horizontal, &frame);
        let arm = m.segment_pan_delta("Arm", horizontal, &frame);
        assert!((head.x + arm.x).abs() < EPSILON);
        assert!((head.z + arm.z).abs() < EPSILON);

        let vertical = Vec2::new(0.0, 75.0);
        assert_eq!(
            m.segment_pan_delta("Head", vertical, &frame),
            m.segment_pan_delta("Arm", vertical, &frame)
        );
    }

    #[test]
    fn test_segment_pan_leaves_twist_axis() {
        let m = GestureMapper::default();
        let start = Vec3::new(0.1, 0.7, -0.2);
        let c = m.segment_pan("Arm", start, Vec2::new(33.0, -51.0), &FrameAxes::IDENTITY);
        assert_eq!(c.y, start.y);
    }

    #[test]
    fn test_twist_scales_y_only() {
        let m = GestureMapper::default();
        let start = Vec3::new(0.1, 0.2, 0.3);
        let c = m.twist(start, 0.25);
        assert_eq!(c.x, start.x);
        assert_eq!(c.z, start.z);
        assert!((c.y - 0.7).abs() < EPSILON);
    }
}
