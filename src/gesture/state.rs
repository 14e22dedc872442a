//! Camera rig, selection and per-stream gesture snapshots.

use glam::{EulerRot, Mat4, Quat, Vec3};

use super::mapper::FrameAxes;
use crate::math::clamp_angle;
use crate::scene::NodeHandle;

/// Orientation of the virtual viewpoint ("selfie stick").
///
/// x is pitch about the rig's own X axis, y is yaw about the vertical.
/// Only pitch is clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    node: NodeHandle,
    position: Vec3,
    orientation: Vec3,
}

impl CameraRig {
    pub fn new(node: NodeHandle) -> Self {
        Self {
            node,
            position: Vec3::ZERO,
            orientation: Vec3::ZERO,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn node(&self) -> NodeHandle {
        self.node
    }

    pub fn orientation(&self) -> Vec3 {
        self.orientation
    }

    /// Store `candidate` with pitch clamped to `[-pitch_limit, pitch_limit]`.
    pub fn set_orientation(&mut self, candidate: Vec3, pitch_limit: f32) -> Vec3 {
        self.orientation = Vec3::new(
            clamp_angle(candidate.x, -pitch_limit, pitch_limit),
            candidate.y,
            candidate.z,
        );
        self.orientation
    }

    /// Yaw, then pitch in the yawed frame, then roll.
    pub fn transform(&self) -> Mat4 {
        let o = self.orientation;
        Mat4::from_rotation_translation(Quat::from_euler(EulerRot::YXZ, o.y, o.x, o.z), self.position)
    }
}

/// The selected segment, held by name rather than by reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    segment: Option<String>,
}

impl Selection {
    pub fn get(&self) -> Option<&str> {
        self.segment.as_deref()
    }

    pub fn set(&mut self, segment: Option<String>) {
        self.segment = segment;
    }
}

/// Pan stream snapshot. The variant doubles as the touch-count discriminator.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PanStream {
    #[default]
    Idle,
    /// Two touches: orbiting the camera.
    Camera { start: Vec3 },
    /// One touch on a selected segment.
    Segment {
        name: String,
        start: Vec3,
        frame: FrameAxes,
    },
}

impl PanStream {
    /// Touch count the active stream was started with.
    pub fn touches(&self) -> Option<u32> {
        match self {
            PanStream::Idle => None,
            PanStream::Camera { .. } => Some(2),
            PanStream::Segment { .. } => Some(1),
        }
    }
}

/// Rotation (twist) stream snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TwistStream {
    #[default]
    Idle,
    Active { name: String, start: Vec3 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::EPSILON;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_camera_pitch_clamped_yaw_free() {
        let mut rig = CameraRig::new(NodeHandle(1));
        let limit = 0.49 * PI;
        let o = rig.set_orientation(Vec3::new(3.0, 12.0, 0.0), limit);
        assert_eq!(o.x, limit);
        assert_eq!(o.y, 12.0);
        let o = rig.set_orientation(Vec3::new(-3.0, 0.0, 0.0), limit);
        assert_eq!(o.x, -limit);
    }

    #[test]
    fn test_camera_transform_yaw_then_pitch() {
        let mut rig = CameraRig::new(NodeHandle(1)).with_position(Vec3::new(0.0, 1.0, 0.0));
        rig.set_orientation(Vec3::new(0.0, FRAC_PI_2, 0.0), 1.5);
        let m = rig.transform();
        // Yawing +90 turns the rig's X axis to world -Z.
        assert!((m.transform_vector3(Vec3::X) - Vec3::NEG_Z).length() < EPSILON);
        assert!((m.transform_point3(Vec3::ZERO) - Vec3::Y).length() < EPSILON);
    }

    #[test]
    fn test_pan_stream_touches() {
        assert_eq!(PanStream::Idle.touches(), None);
        assert_eq!(PanStream::Camera { start: Vec3::ZERO }.touches(), Some(2));
        let seg = PanStream::Segment {
            name: "Arm".to_string(),
            start: Vec3::ZERO,
            frame: FrameAxes::IDENTITY,
        };
        assert_eq!(seg.touches(), Some(1));
    }

    #[test]
    fn test_selection() {
        let mut sel = Selection::default();
        assert_eq!(sel.get(), None);
        sel.set(Some("Head".to_string()));
        assert_eq!(sel.get(), Some("Head"));
        sel.set(None);
        assert_eq!(sel.get(), None);
    }
}
