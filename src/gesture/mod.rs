//! Gesture input: event types, delta mapping and stream state.

pub mod event;
pub mod mapper;
pub mod state;

pub use event::{GesturePhase, InputEvent};
pub use mapper::{FrameAxes, GestureMapper, PanDelta};
pub use state::{CameraRig, PanStream, Selection, TwistStream};
