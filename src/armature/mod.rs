//! Articulated figure: declarative description, segment tree and joint
//! rotation composition.

pub mod compose;
pub mod segment;
pub mod spec;

pub use compose::{compose_rotation, compose_transform};
pub use segment::{Segment, SegmentIter};
pub use spec::{ArmatureSpec, MeshRef, RawSegment, SegmentDef};

use crate::scene::{NodeHandle, Scene};

/// The whole figure, rooted at its base segment.
#[derive(Debug, Clone)]
pub struct Armature {
    root: Segment,
}

impl Armature {
    /// Register every segment of `spec` under `parent` and pose it at rest.
    pub fn build<S: Scene + ?Sized>(spec: &ArmatureSpec, parent: NodeHandle, scene: &mut S) -> Self {
        let root = Segment::build(spec.root(), parent, scene);
        tracing::debug!(
            root = %root.name(),
            segments = spec.root().segment_count(),
            "Armature built"
        );
        Self { root }
    }

    pub fn root(&self) -> &Segment {
        &self.root
    }

    pub fn find(&self, name: &str) -> Option<&Segment> {
        self.root.find_by_name(name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Segment> {
        self.root.find_by_name_mut(name)
    }

    /// Put every segment back at rest.
    pub fn reset<S: Scene + ?Sized>(&mut self, scene: &mut S) {
        self.root.reset_orientation(true, scene);
    }

    pub fn segments(&self) -> SegmentIter<'_> {
        self.root.iter()
    }
}
