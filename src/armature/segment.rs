//! Rigid segments of the articulated figure.

use glam::{Mat4, Vec3};

use super::compose::compose_transform;
use super::spec::{RawSegment, SegmentDef};
use crate::error::ArmatureError;
use crate::math::RotationRange;
use crate::scene::{NodeHandle, Scene};

/// One rigid body in the armature tree. Owns its children.
///
/// `orientation` is only ever written through [`Segment::set_orientation`]
/// and [`Segment::reset_orientation`], both of which keep it inside `range`.
#[derive(Debug, Clone)]
pub struct Segment {
    name: String,
    node: NodeHandle,
    location: Vec3,
    range: RotationRange,
    initial: Vec3,
    orientation: Vec3,
    children: Vec<Segment>,
}

impl Segment {
    /// Validate a raw record tree and build it under `parent`.
    ///
    /// Validation of the whole subtree happens before any node is added to
    /// the scene, so a malformed description leaves the scene untouched.
    pub fn construct<S: Scene + ?Sized>(
        raw: &RawSegment,
        parent: NodeHandle,
        scene: &mut S,
    ) -> Result<Self, ArmatureError> {
        let def = SegmentDef::from_raw(raw)?;
        Ok(Self::build(&def, parent, scene))
    }

    /// Build an already validated record tree under `parent`.
    pub fn build<S: Scene + ?Sized>(def: &SegmentDef, parent: NodeHandle, scene: &mut S) -> Self {
        let node = scene.add_child(parent, def.mesh(), def.name());
        let mut segment = Self {
            name: def.name().to_string(),
            node,
            location: def.location(),
            range: def.range(),
            initial: def.rest(),
            orientation: def.rest(),
            children: Vec::with_capacity(def.children().len()),
        };
        scene.set_transform(node, segment.transform());
        tracing::debug!(segment = %segment.name, node = node.0, "Built segment");

        segment.children = def
            .children()
            .iter()
            .map(|child| Self::build(child, node, scene))
            .collect();
        segment
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node(&self) -> NodeHandle {
        self.node
    }

    pub fn location(&self) -> Vec3 {
        self.location
    }

    pub fn range(&self) -> RotationRange {
        self.range
    }

    pub fn initial_orientation(&self) -> Vec3 {
        self.initial
    }

    /// Current Euler angles (x, y, z) in radians.
    pub fn orientation(&self) -> Vec3 {
        self.orientation
    }

    pub fn children(&self) -> &[Segment] {
        &self.children
    }

    /// Parent-relative transform for the current orientation.
    pub fn transform(&self) -> Mat4 {
        compose_transform(self.orientation, self.location)
    }

    /// Depth-first, self first, children in declaration order.
    /// Duplicate names resolve to the first match in that order.
    pub fn find_by_name(&self, name: &str) -> Option<&Segment> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_name(name))
    }

    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut Segment> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_by_name_mut(name))
    }

    /// Clamp `candidate` per axis, store it and push the new transform.
    /// Returns the stored orientation.
    pub fn set_orientation<S: Scene + ?Sized>(&mut self, candidate: Vec3, scene: &mut S) -> Vec3 {
        self.orientation = self.range.clamp(candidate);
        scene.set_transform(self.node, self.transform());
        self.orientation
    }

    /// Restore the rest orientation; with `recursive`, for every descendant too (pre-order).
    pub fn reset_orientation<S: Scene + ?Sized>(&mut self, recursive: bool, scene: &mut S) {
        self.orientation = self.initial;
        scene.set_transform(self.node, self.transform());
        if recursive {
            for child in &mut self.children {
                child.reset_orientation(true, scene);
            }
        }
    }

    /// Pre-order iterator over this segment and its descendants.
    pub fn iter(&self) -> SegmentIter<'_> {
        SegmentIter { stack: vec![self] }
    }
}

/// Pre-order walk over a segment subtree.
pub struct SegmentIter<'a> {
    stack: Vec<&'a Segment>,
}

impl<'a> Iterator for SegmentIter<'a> {
    type Item = &'a Segment;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::armature::ArmatureSpec;
    use crate::math::EPSILON;
    use crate::scene::MemoryScene;

    const FIGURE: &str = r#"{
        "Name": "Hips", "Location": "0 1 0", "RotY": "-45 0 45", "ObjFile": "hips",
        "Children": [
            { "Name": "Chest", "Location": "0 0.3 0", "RotX": "-20 0 40", "RotZ": "-15 0 15", "ObjFile": "chest",
              "Children": [
                { "Name": "Head", "Location": "0 0.4 0", "RotX": "-40 0 40", "RotY": "-70 0 70", "ObjFile": "head" },
                { "Name": "Arm", "Location": "0.2 0.3 0", "RotX": "-90 10 180", "ObjFile": "arm",
                  "Children": [ { "Name": "Elbow", "Location": "0 -0.3 0", "RotX": "-10 0 90", "ObjFile": "forearm" } ] }
              ] },
            { "Name": "Arm", "Location": "-0.2 0 0", "ObjFile": "duplicate" }
        ]
    }"#;

    fn build() -> (Segment, MemoryScene) {
        let spec = ArmatureSpec::from_json_str(FIGURE).unwrap();
        let mut scene = MemoryScene::new();
        let root = scene.root();
        let seg = Segment::build(spec.root(), root, &mut scene);
        (seg, scene)
    }

    #[test]
    fn test_build_registers_nodes() {
        let (root, scene) = build();
        // scene root + 6 segments
        assert_eq!(scene.node_count(), 7);
        let elbow = root.find_by_name("Elbow").unwrap();
        assert_eq!(scene.node_name(elbow.node()), Some("Elbow"));
        assert_eq!(scene.mesh(elbow.node()).map(|m| m.as_str()), Some("forearm"));
        let arm = root.find_by_name("Arm").unwrap();
        assert_eq!(scene.parent(elbow.node()), Some(arm.node()));
        assert!(scene
            .local_transform(arm.node())
            .unwrap()
            .abs_diff_eq(arm.transform(), EPSILON));
    }

    #[test]
    fn test_construct_rejects_without_side_effects() {
        let raw: RawSegment = serde_json::from_str(
            r#"{ "Name": "Hips", "Location": "0 0 0", "ObjFile": "h",
                 "Children": [{ "Name": "Bad", "Location": "0 0 0", "RotX": "10 0 20", "ObjFile": "b" }] }"#,
        )
        .unwrap();
        let mut scene = MemoryScene::new();
        let root = scene.root();
        let err = Segment::construct(&raw, root, &mut scene).unwrap_err();
        assert_eq!(err.field(), Some("RotX"));
        assert_eq!(scene.node_count(), 1);
    }

    #[test]
    fn test_find_by_name() {
        let (root, _) = build();
        assert_eq!(root.find_by_name("Hips").map(Segment::name), Some("Hips"));
        assert_eq!(root.find_by_name("Head").map(Segment::name), Some("Head"));
        assert!(root.find_by_name("Tail").is_none());
        assert!(root.find_by_name("").is_none());
    }

    #[test]
    fn test_duplicate_name_resolves_to_first_preorder() {
        let (root, _) = build();
        // The nested Arm under Chest precedes the shallow Arm under Hips in pre-order.
        let arm = root.find_by_name("Arm").unwrap();
        assert_eq!(arm.children().len(), 1);
        assert!((arm.location().x - 0.2).abs() < EPSILON);
    }

    #[test]
    fn test_set_orientation_clamps_every_axis() {
        let (mut root, mut scene) = build();
        let chest = root.find_by_name_mut("Chest").unwrap();
        let range = chest.range();

        for delta in [0.0f32, 0.5, 3.0, 1e4, -1e4, f32::MAX] {
            let stored = chest.set_orientation(Vec3::new(delta, -delta, delta * 0.5), &mut scene);
            assert!(range.contains(stored), "{delta}: {stored:?}");
            assert_eq!(stored, chest.orientation());
        }

        let stored = chest.set_orientation(Vec3::new(10.0, 1.0, -10.0), &mut scene);
        assert!((stored.x - 40f32.to_radians()).abs() < EPSILON);
        // Y is locked for Chest
        assert_eq!(stored.y, 0.0);
        assert!((stored.z + 15f32.to_radians()).abs() < EPSILON);
        assert!(scene
            .local_transform(chest.node())
            .unwrap()
            .abs_diff_eq(chest.transform(), EPSILON));
    }

    #[test]
    fn test_reset_recursive_restores_subtree() {
        let (mut root, mut scene) = build();
        for name in ["Chest", "Head", "Arm", "Elbow"] {
            let seg = root.find_by_name_mut(name).unwrap();
            seg.set_orientation(Vec3::splat(0.3), &mut scene);
        }

        let chest = root.find_by_name_mut("Chest").unwrap();
        chest.reset_orientation(true, &mut scene);
        // Twice is the same as once.
        chest.reset_orientation(true, &mut scene);

        for seg in root.find_by_name("Chest").unwrap().iter() {
            assert_eq!(seg.orientation(), seg.initial_orientation(), "{}", seg.name());
            assert!(scene
                .local_transform(seg.node())
                .unwrap()
                .abs_diff_eq(seg.transform(), EPSILON));
        }
        // Arm rests at 10 degrees, not zero.
        let arm = root.find_by_name("Arm").unwrap();
        assert!((arm.orientation().x - 10f32.to_radians()).abs() < EPSILON);
    }

    #[test]
    fn test_reset_non_recursive_leaves_children() {
        let (mut root, mut scene) = build();
        let arm = root.find_by_name_mut("Arm").unwrap();
        arm.set_orientation(Vec3::new(1.0, 0.0, 0.0), &mut scene);
        let elbow = arm.find_by_name_mut("Elbow").unwrap();
        elbow.set_orientation(Vec3::new(1.0, 0.0, 0.0), &mut scene);

        let arm = root.find_by_name_mut("Arm").unwrap();
        arm.reset_orientation(false, &mut scene);
        assert_eq!(arm.orientation(), arm.initial_orientation());
        let elbow = arm.find_by_name("Elbow").unwrap();
        assert!((elbow.orientation().x - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_iter_is_preorder() {
        let (root, _) = build();
        let names: Vec<&str> = root.iter().map(Segment::name).collect();
        assert_eq!(names, ["Hips", "Chest", "Head", "Arm", "Elbow", "Arm"]);
    }
}
