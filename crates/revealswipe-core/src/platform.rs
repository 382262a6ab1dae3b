//! Platform abstraction traits for the RevealSwipe runtime.
//!
//! The host event loop implements [`RuntimeScheduler`] so the runtime can ask
//! for another frame whenever an animation or a woken task needs one.

use std::sync::atomic::{AtomicBool, Ordering};

/// Schedules work for the runtime.
///
/// Implementations must be safe to use from multiple threads because task
/// wakers may be cloned and woken from anywhere.
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host schedule a new frame.
    fn schedule_frame(&self);
}

/// Scheduler that only remembers whether a frame was requested.
///
/// Useful for headless hosts and tests that pump frames manually.
#[derive(Debug, Default)]
pub struct DefaultScheduler {
    frame_requested: AtomicBool,
}

impl DefaultScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a frame has been requested since the last call.
    pub fn take_frame_request(&self) -> bool {
        self.frame_requested.swap(false, Ordering::SeqCst)
    }
}

impl RuntimeScheduler for DefaultScheduler {
    fn schedule_frame(&self) {
        self.frame_requested.store(true, Ordering::SeqCst);
    }
}
