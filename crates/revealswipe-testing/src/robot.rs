//! Robot-style driver for a headless [`RevealSwipe`].
//!
//! The robot owns the runtime, a single clock shared by pointer timestamps
//! and frame times, and the component under test. Tests script pointer
//! sequences and pump frames without a real event loop.
//!
//! # Example
//!
//! ```
//! use revealswipe::{RevealConfig, RevealValue};
//! use revealswipe_testing::SwipeRobot;
//!
//! let mut robot = SwipeRobot::new(RevealConfig::default()).unwrap();
//! robot.drag_content_by(60.0, 200);
//! robot.wait_for_idle();
//! assert_eq!(robot.state().current_value(), RevealValue::FullyRevealedEnd);
//! ```

use std::sync::Arc;

use revealswipe::{
    RevealCallbacks, RevealConfig, RevealConfigError, RevealState, RevealSwipe, RevealSwipeOptions,
};
use revealswipe_core::{DefaultScheduler, Runtime};
use revealswipe_foundation::{PointerEvent, DRAG_THRESHOLD};
use revealswipe_ui_graphics::{LayoutDirection, Point, Size};

/// Card size used when a test does not pick one.
pub const DEFAULT_CARD_SIZE: Size = Size::new(320.0, 72.0);

/// Frame interval used while pumping animations.
pub const FRAME_MILLIS: i64 = 16;

const MAX_IDLE_ITERATIONS: usize = 10_000;

/// Drives one [`RevealSwipe`] with scripted pointer input and frames.
pub struct SwipeRobot {
    runtime: Runtime,
    scheduler: Arc<DefaultScheduler>,
    swipe: RevealSwipe,
    time_millis: i64,
    pointer: Option<Point>,
}

impl SwipeRobot {
    /// Robot at density 1 with default options and no callbacks.
    pub fn new(config: RevealConfig) -> Result<Self, RevealConfigError> {
        Self::launch(
            config,
            RevealSwipeOptions::default(),
            RevealCallbacks::default(),
            1.0,
            DEFAULT_CARD_SIZE,
        )
    }

    pub fn launch(
        config: RevealConfig,
        options: RevealSwipeOptions,
        callbacks: RevealCallbacks,
        density: f32,
        size: Size,
    ) -> Result<Self, RevealConfigError> {
        let scheduler = Arc::new(DefaultScheduler::new());
        let runtime = Runtime::new(scheduler.clone());
        let state = RevealState::new(config, density, runtime.handle())?;
        let mut swipe = RevealSwipe::new(state, options, callbacks, runtime.handle());
        swipe.set_size(size);
        Ok(Self {
            runtime,
            scheduler,
            swipe,
            time_millis: 0,
            pointer: None,
        })
    }

    pub fn swipe(&self) -> &RevealSwipe {
        &self.swipe
    }

    pub fn swipe_mut(&mut self) -> &mut RevealSwipe {
        &mut self.swipe
    }

    pub fn state(&self) -> &RevealState {
        self.swipe.state()
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Current robot time in milliseconds.
    pub fn now_millis(&self) -> i64 {
        self.time_millis
    }

    /// Center of the card in its unmoved position.
    pub fn center(&self) -> Point {
        let size = self.swipe.size();
        Point::new(size.width / 2.0, size.height / 2.0)
    }

    /// Advances the shared clock without producing a frame.
    pub fn advance_time(&mut self, millis: i64) {
        self.time_millis += millis;
    }

    /// Advances the clock by `millis`, polls tasks and runs one frame.
    pub fn advance_frame(&mut self, millis: i64) {
        self.advance_time(millis);
        self.runtime.poll_tasks();
        let frame_time_nanos = (self.time_millis.max(0) as u64) * 1_000_000;
        self.runtime.drain_frame_callbacks(frame_time_nanos);
    }

    /// Pumps tasks and frames until nothing is animating or pending.
    pub fn wait_for_idle(&mut self) {
        for _ in 0..MAX_IDLE_ITERATIONS {
            self.scheduler.take_frame_request();
            self.runtime.poll_tasks();
            if self.runtime.has_frame_callbacks() {
                self.advance_frame(FRAME_MILLIS);
            } else if !self.runtime.has_pending_tasks() {
                return;
            } else if !self.scheduler.take_frame_request() {
                log::warn!("robot idle with tasks waiting on nothing");
                return;
            }
        }
        log::warn!("robot gave up waiting for idle");
    }

    pub fn press(&mut self, x: f32, y: f32) -> bool {
        self.pointer = Some(Point::new(x, y));
        let event = PointerEvent::down(x, y).at_time(self.time_millis);
        self.swipe.on_pointer_event(&event)
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> bool {
        self.pointer = Some(Point::new(x, y));
        let event = PointerEvent::moved(x, y).at_time(self.time_millis);
        self.swipe.on_pointer_event(&event)
    }

    /// Releases at the last pointer position.
    pub fn release(&mut self) -> bool {
        let Some(position) = self.pointer.take() else {
            return false;
        };
        let event = PointerEvent::up(position.x, position.y).at_time(self.time_millis);
        self.swipe.on_pointer_event(&event)
    }

    /// Cancels the gesture at the last pointer position.
    pub fn cancel(&mut self) -> bool {
        let Some(position) = self.pointer.take() else {
            return false;
        };
        let event = PointerEvent::cancel(position.x, position.y).at_time(self.time_millis);
        self.swipe.on_pointer_event(&event)
    }

    /// Press, release and settle.
    pub fn click_at(&mut self, x: f32, y: f32) -> bool {
        let pressed = self.press(x, y);
        self.advance_time(FRAME_MILLIS);
        let released = self.release();
        self.wait_for_idle();
        pressed && released
    }

    /// Presses at `(from_x, y)` and moves to `to_x` in `steps` evenly timed
    /// moves spread over `duration_millis`. The pointer stays down.
    pub fn drag(&mut self, from_x: f32, to_x: f32, y: f32, duration_millis: i64, steps: u32) {
        let steps = steps.max(1);
        self.press(from_x, y);
        for step in 1..=steps {
            let fraction = step as f32 / steps as f32;
            self.advance_time(duration_millis / i64::from(steps));
            self.move_to(from_x + (to_x - from_x) * fraction, y);
        }
    }

    /// Drags the content from its center so the offset moves by `delta`
    /// before resistance, then releases. Pointer travel includes the touch
    /// slop and follows the layout direction.
    pub fn drag_content_by(&mut self, delta: f32, duration_millis: i64) {
        self.drag_content(delta, duration_millis, false);
    }

    /// Like [`SwipeRobot::drag_content_by`], but holds still before lifting so
    /// the release carries no velocity.
    pub fn drag_content_by_and_hold(&mut self, delta: f32, duration_millis: i64) {
        self.drag_content(delta, duration_millis, true);
    }

    fn drag_content(&mut self, delta: f32, duration_millis: i64, hold: bool) {
        let touch_slop = DRAG_THRESHOLD * self.state().density();
        let screen_delta = match self.swipe.options().layout_direction {
            LayoutDirection::Ltr => delta,
            LayoutDirection::Rtl => -delta,
        };
        let from = self.swipe.content_rect().x + self.swipe.size().width / 2.0;
        let to = from + screen_delta + touch_slop.copysign(screen_delta);
        let y = self.center().y;
        let steps = (duration_millis / 8).clamp(1, 60) as u32;
        self.drag(from, to, y, duration_millis, steps);
        if hold {
            self.advance_time(200);
            self.move_to(to, y);
        }
        self.release();
    }
}
