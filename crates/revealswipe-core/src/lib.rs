//! Core runtime for RevealSwipe.
//!
//! Everything here is single-threaded and cooperative: the host drives frames
//! with [`Runtime::drain_frame_callbacks`] and polls spawned work with
//! [`Runtime::poll_tasks`] from its own event loop.

mod frame_clock;
mod platform;
mod runtime;
mod state;

pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use platform::{DefaultScheduler, RuntimeScheduler};
pub use runtime::{Runtime, RuntimeHandle, TaskHandle, TaskId};
pub use state::{MutableState, State, Subscription};

pub type FrameCallbackId = u64;

pub mod prelude {
    pub use crate::{
        DefaultScheduler, FrameClock, MutableState, Runtime, RuntimeHandle, State, Subscription,
    };
}
