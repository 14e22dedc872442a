//! Rendering collaborator boundary.
//!
//! The core never renders. It registers segment nodes, pushes transforms and
//! asks for frame conversions and hit tests through [`Scene`]. [`MemoryScene`]
//! is a renderer-free implementation backed by forward kinematics over the
//! registered local transforms.

use glam::{Mat4, Vec2, Vec3};

use crate::armature::MeshRef;

/// Opaque identifier of a node owned by the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(pub usize);

/// Operations the core needs from whatever owns the scene graph.
pub trait Scene {
    /// The scene's root node (world frame).
    fn root(&self) -> NodeHandle;

    /// Create a mesh node named `name` under `parent`.
    fn add_child(&mut self, parent: NodeHandle, mesh: &MeshRef, name: &str) -> NodeHandle;

    /// Replace a node's parent-relative transform.
    fn set_transform(&mut self, node: NodeHandle, transform: Mat4);

    fn parent(&self, node: NodeHandle) -> Option<NodeHandle>;

    fn node_name(&self, node: NodeHandle) -> Option<&str>;

    /// Express direction `v`, given in `from`'s frame, in `to`'s frame.
    /// Translation is ignored.
    fn convert_vector(&self, v: Vec3, from: NodeHandle, to: NodeHandle) -> Vec3;

    /// Visit `start` and all of its descendants, pre-order.
    fn enumerate_tree(&self, start: NodeHandle, visitor: &mut dyn FnMut(NodeHandle, Option<&str>));

    /// Node under a screen point, if any.
    fn hit_test(&self, point: Vec2) -> Option<NodeHandle>;

    /// Selection feedback hook. Default is a no-op.
    fn mark_selected(&mut self, _node: NodeHandle, _selected: bool) {}
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    mesh: Option<MeshRef>,
    parent: Option<NodeHandle>,
    children: Vec<NodeHandle>,
    local: Mat4,
    selected: bool,
}

/// Circular screen-space hit target.
#[derive(Debug, Clone, Copy)]
struct HitRegion {
    node: NodeHandle,
    center: Vec2,
    radius: f32,
}

/// In-memory scene graph used for tests and scripted replay.
#[derive(Debug, Clone)]
pub struct MemoryScene {
    nodes: Vec<Node>,
    hit_regions: Vec<HitRegion>,
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryScene {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                name: "root".to_string(),
                mesh: None,
                parent: None,
                children: Vec::new(),
                local: Mat4::IDENTITY,
                selected: false,
            }],
            hit_regions: Vec::new(),
        }
    }

    /// Add a node without geometry (camera rigs, pivots).
    pub fn add_empty(&mut self, parent: NodeHandle, name: &str) -> NodeHandle {
        self.insert(parent, None, name)
    }

    /// Unknown parents fall back to the root.
    fn insert(&mut self, parent: NodeHandle, mesh: Option<MeshRef>, name: &str) -> NodeHandle {
        let parent = if parent.0 < self.nodes.len() {
            parent
        } else {
            tracing::warn!(node = name, parent = parent.0, "Unknown parent node, attaching to root");
            self.root()
        };
        let handle = NodeHandle(self.nodes.len());
        self.nodes.push(Node {
            name: name.to_string(),
            mesh,
            parent: Some(parent),
            children: Vec::new(),
            local: Mat4::IDENTITY,
            selected: false,
        });
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.push(handle);
        }
        handle
    }

    /// Register a circular hit target for `node` in screen coordinates.
    pub fn set_hit_region(&mut self, node: NodeHandle, center: Vec2, radius: f32) {
        self.hit_regions.retain(|r| r.node != node);
        self.hit_regions.push(HitRegion {
            node,
            center,
            radius,
        });
    }

    pub fn local_transform(&self, node: NodeHandle) -> Option<Mat4> {
        self.nodes.get(node.0).map(|n| n.local)
    }

    /// Node-to-world transform by walking the parent chain.
    pub fn world_transform(&self, node: NodeHandle) -> Option<Mat4> {
        let start = self.nodes.get(node.0)?;
        let mut world = start.local;
        let mut cursor = start.parent;
        while let Some(p) = cursor.and_then(|h| self.nodes.get(h.0)) {
            world = p.local * world;
            cursor = p.parent;
        }
        Some(world)
    }

    pub fn mesh(&self, node: NodeHandle) -> Option<&MeshRef> {
        self.nodes.get(node.0).and_then(|n| n.mesh.as_ref())
    }

    pub fn is_selected(&self, node: NodeHandle) -> bool {
        self.nodes.get(node.0).is_some_and(|n| n.selected)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl Scene for MemoryScene {
    fn root(&self) -> NodeHandle {
        NodeHandle(0)
    }

    fn add_child(&mut self, parent: NodeHandle, mesh: &MeshRef, name: &str) -> NodeHandle {
        self.insert(parent, Some(mesh.clone()), name)
    }

    fn set_transform(&mut self, node: NodeHandle, transform: Mat4) {
        match self.nodes.get_mut(node.0) {
            Some(n) => n.local = transform,
            None => tracing::trace!(node = node.0, "Transform for unknown node ignored"),
        }
    }

    fn parent(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    fn node_name(&self, node: NodeHandle) -> Option<&str> {
        self.nodes.get(node.0).map(|n| n.name.as_str())
    }

    /// Unknown nodes are treated as the world frame.
    fn convert_vector(&self, v: Vec3, from: NodeHandle, to: NodeHandle) -> Vec3 {
        let from = self.world_transform(from).unwrap_or(Mat4::IDENTITY);
        let to = self.world_transform(to).unwrap_or(Mat4::IDENTITY);
        to.inverse().transform_vector3(from.transform_vector3(v))
    }

    fn enumerate_tree(&self, start: NodeHandle, visitor: &mut dyn FnMut(NodeHandle, Option<&str>)) {
        let mut stack = vec![start];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle.0) else { continue };
            visitor(handle, Some(node.name.as_str()));
            stack.extend(node.children.iter().rev().copied());
        }
    }

    fn hit_test(&self, point: Vec2) -> Option<NodeHandle> {
        self.hit_regions
            .iter()
            .map(|r| (r.node, r.center.distance(point), r.radius))
            .filter(|&(_, dist, radius)| dist <= radius)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(node, _, _)| node)
    }

    fn mark_selected(&mut self, node: NodeHandle, selected: bool) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.selected = selected;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::EPSILON;
    use glam::Quat;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_world_transform_chains_parents() {
        let mut scene = MemoryScene::new();
        let a = scene.add_empty(scene.root(), "a");
        let b = scene.add_empty(a, "b");
        scene.set_transform(a, Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)));
        scene.set_transform(b, Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)));

        let p = scene.world_transform(b).unwrap().transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(1.0, 2.0, 0.0)).length() < EPSILON);
    }

    #[test]
    fn test_convert_vector_ignores_translation() {
        let mut scene = MemoryScene::new();
        let cam = scene.add_empty(scene.root(), "cam");
        let body = scene.add_empty(scene.root(), "body");
        scene.set_transform(
            cam,
            Mat4::from_rotation_translation(Quat::from_rotation_y(FRAC_PI_2), Vec3::new(5.0, 0.0, 0.0)),
        );
        scene.set_transform(body, Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0)));

        // Camera X rotated +90 about Y points along world -Z.
        let x = scene.convert_vector(Vec3::X, cam, body);
        assert!((x - Vec3::NEG_Z).length() < EPSILON);
    }

    #[test]
    fn test_enumerate_is_preorder() {
        let mut scene = MemoryScene::new();
        let a = scene.add_empty(scene.root(), "a");
        let _a1 = scene.add_empty(a, "a1");
        let _b = scene.add_empty(scene.root(), "b");

        let mut names = Vec::new();
        scene.enumerate_tree(scene.root(), &mut |_, name| names.push(name.unwrap_or("").to_string()));
        assert_eq!(names, ["root", "a", "a1", "b"]);
    }

    #[test]
    fn test_hit_test_nearest_wins() {
        let mut scene = MemoryScene::new();
        let a = scene.add_empty(scene.root(), "a");
        let b = scene.add_empty(scene.root(), "b");
        scene.set_hit_region(a, Vec2::new(0.0, 0.0), 20.0);
        scene.set_hit_region(b, Vec2::new(10.0, 0.0), 20.0);

        assert_eq!(scene.hit_test(Vec2::new(8.0, 0.0)), Some(b));
        assert_eq!(scene.hit_test(Vec2::new(-5.0, 0.0)), Some(a));
        assert_eq!(scene.hit_test(Vec2::new(100.0, 100.0)), None);
    }

    #[test]
    fn test_unknown_handles_do_not_panic() {
        let mut scene = MemoryScene::new();
        let ghost = NodeHandle(42);
        scene.set_transform(ghost, Mat4::from_translation(Vec3::X));
        scene.mark_selected(ghost, true);

        assert_eq!(scene.local_transform(ghost), None);
        assert_eq!(scene.world_transform(ghost), None);
        assert_eq!(scene.mesh(ghost), None);
        assert!(!scene.is_selected(ghost));
        let z = scene.convert_vector(Vec3::Z, ghost, scene.root());
        assert!((z - Vec3::Z).length() < EPSILON);

        let orphan = scene.add_empty(ghost, "orphan");
        assert_eq!(scene.parent(orphan), Some(scene.root()));
        assert_eq!(scene.node_count(), 2);
    }
}
