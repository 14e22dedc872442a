//! Mannequin - Interactive Articulated Figure Posing
//!
//! A library for posing a jointed figure with touch gestures:
//! - Builds a segment hierarchy from a declarative JSON/TOML description
//! - Maps pan, twist and tap gestures to clamped per-axis joint rotations
//! - Orbits a camera rig with a two-finger pan
//! - Talks to any scene graph through the [`Scene`] trait

pub mod armature;
pub mod config;
pub mod error;
pub mod gesture;
pub mod math;
pub mod poser;
pub mod scene;
pub mod shared;

pub use armature::{Armature, ArmatureSpec, Segment};
pub use config::Config;
pub use error::{ArmatureError, MannequinError, Result};
pub use gesture::{CameraRig, GesturePhase, InputEvent};
pub use poser::{PoseChange, Poser};
pub use scene::{MemoryScene, NodeHandle, Scene};
pub use shared::SharedPoser;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
