//! Joint rotation composition.
//!
//! A segment's Euler triple is applied Y first, then Z, then X, and the
//! result is translated by the segment's location in the parent frame:
//!
//! `M = T(location) * Rx(x) * Rz(z) * Ry(y)`
//!
//! This is intrinsic X-Z-Y, not the X-Y-Z order most scene graphs use for
//! their own Euler properties. The two only agree when at most one axis is
//! non-zero, so the order must not be delegated to the renderer.

use glam::{Mat4, Quat, Vec3};

/// Rotation part of a segment transform.
pub fn compose_rotation(orientation: Vec3) -> Quat {
    Quat::from_rotation_x(orientation.x)
        * Quat::from_rotation_z(orientation.z)
        * Quat::from_rotation_y(orientation.y)
}

/// Full parent-relative transform of a segment.
pub fn compose_transform(orientation: Vec3, location: Vec3) -> Mat4 {
    Mat4::from_rotation_translation(compose_rotation(orientation), location)
}
