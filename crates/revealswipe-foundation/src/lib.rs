//! Foundation elements for RevealSwipe
//!
//! Pointer events, velocity tracking and the anchored-drag state machine the
//! component is built on.

pub mod anchored;
pub mod gesture_constants;
pub mod input;
pub mod velocity_tracker;

pub use anchored::*;
pub use gesture_constants::*;
pub use input::*;
pub use velocity_tracker::VelocityTracker1D;

pub mod prelude {
    pub use crate::anchored::{AnchoredDraggableState, DraggableAnchors, ResistanceConfig};
    pub use crate::input::{PointerEvent, PointerEventKind};
    pub use crate::velocity_tracker::VelocityTracker1D;
}
