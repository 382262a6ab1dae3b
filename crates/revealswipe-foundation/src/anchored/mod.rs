//! Anchored dragging: a 1-D offset that is dragged freely and settles on
//! one of a small set of named anchors.

mod anchors;
mod resistance;
mod state;

pub use anchors::DraggableAnchors;
pub use resistance::ResistanceConfig;
pub use state::{
    AnchoredDraggableState, ConfirmValueChange, DragPhase, PositionalThreshold, VelocityThreshold,
};
