//! Frame-clock driven animations for RevealSwipe.
//!
//! [`Animatable`] moves a value toward a target on every frame the host
//! drives. Each animation hands back an [`AnimationJob`] that can be awaited,
//! observed or cancelled; starting another animation supersedes it.

mod animation;
mod job;

pub use animation::*;
pub use job::{AnimationJob, AnimationOutcome};
