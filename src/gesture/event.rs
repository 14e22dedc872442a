//! Discrete input events delivered by the host UI loop.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Lifecycle phase of a continuous gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    /// Treated exactly like `Ended`.
    Cancelled,
}

impl GesturePhase {
    /// True for the phases that close a gesture stream.
    pub fn is_terminal(self) -> bool {
        matches!(self, GesturePhase::Ended | GesturePhase::Cancelled)
    }
}

/// One input event. Pan translations and rotation angles are cumulative
/// since the gesture began, as reported by platform recognizers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Single tap at a screen point.
    Tap { point: Vec2 },
    /// Double tap. The point is informational; the current selection is reset.
    DoubleTap {
        #[serde(default)]
        point: Vec2,
    },
    /// Pan sample. `translation` is in screen pixels, Y increasing downward.
    Pan {
        phase: GesturePhase,
        touches: u32,
        #[serde(default)]
        translation: Vec2,
    },
    /// Two-finger rotation sample, radians.
    Rotation {
        phase: GesturePhase,
        #[serde(default)]
        angle: f32,
    },
}
