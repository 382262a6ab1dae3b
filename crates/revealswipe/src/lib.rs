//! RevealSwipe: a card whose content slides horizontally to reveal a start
//! or end background action.
//!
//! [`RevealState`] owns the offset and settles it onto the anchors
//! `{Default, FullyRevealedEnd, FullyRevealedStart}`. [`RevealSwipe`] turns
//! pointer events into drags, taps and background clicks, and exposes the
//! per-frame [`RevealVisuals`] a host draws from.

mod accessibility;
mod config;
mod direction;
mod options;
mod state;
mod swipe;
mod value;
pub mod visuals;

pub use accessibility::{AccessibilityAction, BackgroundSide};
pub use config::{
    default_resistance, resolve_anchors, RevealConfig, RevealConfigError, DEFAULT_MAX_REVEAL,
    DEFAULT_VELOCITY_THRESHOLD,
};
pub use direction::{RevealDirection, RevealDirections};
pub use options::{
    RevealCallbacks, RevealSwipeOptions, DEFAULT_BACKGROUND_END_COLOR,
    DEFAULT_BACKGROUND_START_COLOR,
};
pub use revealswipe_foundation::DragPhase;
pub use state::RevealState;
pub use swipe::{BackgroundRegion, HitRegion, RevealSwipe};
pub use value::RevealValue;
pub use visuals::{CornerFactors, RevealVisuals, DEFAULT_ALPHA_EASING};

pub mod prelude {
    pub use crate::{
        BackgroundSide, RevealCallbacks, RevealConfig, RevealDirection, RevealDirections,
        RevealState, RevealSwipe, RevealSwipeOptions, RevealValue,
    };
}
