//! Interaction session: owns the armature, the camera rig and all gesture
//! state, and applies input events to them one at a time.

use glam::{Vec2, Vec3};
use serde::Serialize;

use crate::armature::{Armature, ArmatureSpec};
use crate::config::GestureConfig;
use crate::gesture::{
    CameraRig, FrameAxes, GestureMapper, GesturePhase, InputEvent, PanStream, Selection, TwistStream,
};
use crate::scene::Scene;

/// What an event changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PoseChange {
    /// Selection set or cleared by a tap.
    Selection { segment: Option<String> },
    /// A segment's stored (clamped) orientation.
    Segment { name: String, orientation: Vec3 },
    /// The camera rig's stored orientation.
    Camera { orientation: Vec3 },
    /// A segment and its descendants returned to rest.
    Reset { name: String },
}

/// Single owner of all mutable pose state.
pub struct Poser<S: Scene> {
    scene: S,
    armature: Armature,
    camera: CameraRig,
    mapper: GestureMapper,
    selection: Selection,
    pan: PanStream,
    twist: TwistStream,
}

impl<S: Scene> Poser<S> {
    /// Build the armature under the scene root and attach the camera rig,
    /// whose node must already exist in `scene`.
    pub fn new(spec: &ArmatureSpec, camera: CameraRig, config: GestureConfig, mut scene: S) -> Self {
        let root = scene.root();
        let armature = Armature::build(spec, root, &mut scene);
        for name in &config.flip_horizontal {
            if armature.find(name).is_none() {
                tracing::warn!(segment = %name, "Horizontal flip configured for unknown segment");
            }
        }
        scene.set_transform(camera.node(), camera.transform());
        Self {
            scene,
            armature,
            camera,
            mapper: GestureMapper::new(config),
            selection: Selection::default(),
            pan: PanStream::Idle,
            twist: TwistStream::Idle,
        }
    }

    pub fn armature(&self) -> &Armature {
        &self.armature
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn selected(&self) -> Option<&str> {
        self.selection.get()
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn config(&self) -> &GestureConfig {
        self.mapper.config()
    }

    /// Apply one input event.
    pub fn dispatch(&mut self, event: InputEvent) -> Option<PoseChange> {
        match event {
            InputEvent::Tap { point } => Some(self.tap(point)),
            InputEvent::DoubleTap { .. } => self.reset_selected(),
            InputEvent::Pan {
                phase,
                touches,
                translation,
            } => self.pan(phase, touches, translation),
            InputEvent::Rotation { phase, angle } => self.rotate(phase, angle),
        }
    }

    fn tap(&mut self, point: Vec2) -> PoseChange {
        let hit = self
            .scene
            .hit_test(point)
            .and_then(|node| self.scene.node_name(node))
            .map(str::to_owned);
        self.select(hit.as_deref())
    }

    /// Apply a hit-test outcome. Names that are not segments clear the selection.
    pub fn select(&mut self, hit: Option<&str>) -> PoseChange {
        let resolved = hit
            .and_then(|name| self.armature.find(name))
            .map(|seg| seg.name().to_string());
        tracing::debug!(hit = ?hit, selected = ?resolved, "Selection changed");
        self.selection.set(resolved.clone());
        self.highlight(hit);
        PoseChange::Selection { segment: resolved }
    }

    fn highlight(&mut self, hit: Option<&str>) {
        let mut marks = Vec::new();
        self.scene
            .enumerate_tree(self.armature.root().node(), &mut |node, name| {
                marks.push((node, hit.is_some() && name == hit));
            });
        for (node, selected) in marks {
            self.scene.mark_selected(node, selected);
        }
    }

    /// Double tap: put the selected segment and its subtree back at rest.
    pub fn reset_selected(&mut self) -> Option<PoseChange> {
        let name = self.selection.get()?.to_string();
        let segment = self.armature.find_mut(&name)?;
        segment.reset_orientation(true, &mut self.scene);
        tracing::debug!(segment = %name, "Reset to rest pose");
        Some(PoseChange::Reset { name })
    }

    fn pan(&mut self, phase: GesturePhase, touches: u32, translation: Vec2) -> Option<PoseChange> {
        match phase {
            GesturePhase::Began => {
                self.pan = self.begin_pan(touches);
                tracing::debug!(touches, stream = ?self.pan, "Pan began");
                None
            }
            GesturePhase::Changed => self.pan_changed(touches, translation),
            GesturePhase::Ended | GesturePhase::Cancelled => {
                if self.pan != PanStream::Idle {
                    tracing::debug!(?phase, "Pan finished");
                }
                self.pan = PanStream::Idle;
                None
            }
        }
    }

    fn begin_pan(&self, touches: u32) -> PanStream {
        match touches {
            2 => PanStream::Camera {
                start: self.camera.orientation(),
            },
            1 => {
                let Some(segment) = self.selection.get().and_then(|n| self.armature.find(n)) else {
                    return PanStream::Idle;
                };
                let parent = self
                    .scene
                    .parent(segment.node())
                    .unwrap_or_else(|| self.scene.root());
                let frame = FrameAxes::capture(&self.scene, self.camera.node(), parent);
                tracing::debug!(
                    segment = %segment.name(),
                    camera_x = ?frame.x,
                    camera_z = ?frame.z,
                    "Captured camera frame"
                );
                PanStream::Segment {
                    name: segment.name().to_string(),
                    start: segment.orientation(),
                    frame,
                }
            }
            _ => PanStream::Idle,
        }
    }

    fn pan_changed(&mut self, touches: u32, translation: Vec2) -> Option<PoseChange> {
        match self.pan.touches() {
            None => {
                tracing::trace!(touches, "Pan change without an active stream, ignored");
                return None;
            }
            Some(n) if n != touches => {
                tracing::debug!(from = n, to = touches, "Touch count changed, pan invalidated");
                self.pan = PanStream::Idle;
                return None;
            }
            Some(_) => {}
        }
        if !translation.is_finite() {
            tracing::trace!(?translation, "Non-finite pan sample, ignored");
            return None;
        }

        match &self.pan {
            PanStream::Idle => None,
            PanStream::Camera { start } => {
                let candidate = self.mapper.camera_pan(*start, translation);
                let limit = self.mapper.config().pitch_limit_radians();
                let orientation = self.camera.set_orientation(candidate, limit);
                self.scene.set_transform(self.camera.node(), self.camera.transform());
                tracing::trace!(?orientation, "Camera orbit");
                Some(PoseChange::Camera { orientation })
            }
            PanStream::Segment { name, start, frame } => {
                let candidate = self.mapper.segment_pan(name, *start, translation, frame);
                let segment = self.armature.find_mut(name)?;
                let orientation = segment.set_orientation(candidate, &mut self.scene);
                tracing::trace!(segment = %name, ?orientation, "Segment pan");
                Some(PoseChange::Segment {
                    name: name.clone(),
                    orientation,
                })
            }
        }
    }

    fn rotate(&mut self, phase: GesturePhase, angle: f32) -> Option<PoseChange> {
        match phase {
            GesturePhase::Began => {
                self.twist = match self.selection.get().and_then(|n| self.armature.find(n)) {
                    Some(seg) => TwistStream::Active {
                        name: seg.name().to_string(),
                        start: seg.orientation(),
                    },
                    None => TwistStream::Idle,
                };
                tracing::debug!(stream = ?self.twist, "Twist began");
                None
            }
            GesturePhase::Changed => {
                let TwistStream::Active { name, start } = &self.twist else {
                    tracing::trace!("Twist change without an active stream, ignored");
                    return None;
                };
                if !angle.is_finite() {
                    tracing::trace!(angle, "Non-finite twist sample, ignored");
                    return None;
                }
                let candidate = self.mapper.twist(*start, angle);
                let segment = self.armature.find_mut(name)?;
                let orientation = segment.set_orientation(candidate, &mut self.scene);
                tracing::trace!(segment = %name, ?orientation, "Segment twist");
                Some(PoseChange::Segment {
                    name: name.clone(),
                    orientation,
                })
            }
            GesturePhase::Ended | GesturePhase::Cancelled => {
                self.twist = TwistStream::Idle;
                None
            }
        }
    }

    /// Put the whole figure back at rest and drop any active gesture.
    pub fn reset_all(&mut self) {
        self.armature.reset(&mut self.scene);
        self.pan = PanStream::Idle;
        self.twist = TwistStream::Idle;
    }

    /// Current orientation of a segment, if it exists.
    pub fn orientation_of(&self, name: &str) -> Option<Vec3> {
        self.armature.find(name).map(|s| s.orientation())
    }
}
