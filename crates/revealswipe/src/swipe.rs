use revealswipe_core::{MutableState, RuntimeHandle, State, TaskHandle};
use revealswipe_foundation::{
    PointerEvent, PointerEventKind, PointerId, VelocityTracker1D, DRAG_THRESHOLD, MAX_FLING_VELOCITY,
};
use revealswipe_ui_graphics::{LayoutDirection, Point, Rect, Size};
use smallvec::SmallVec;

use crate::visuals::{
    animated_corners, background_alpha, background_color, corner_factors, RevealVisuals,
};
use crate::{
    AccessibilityAction, BackgroundSide, RevealCallbacks, RevealDirection, RevealState,
    RevealSwipeOptions, RevealValue,
};

/// Part of the component under a pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitRegion {
    Content,
    Background(BackgroundSide),
}

/// Clickable background area for one enabled side, in local px.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackgroundRegion {
    pub side: BackgroundSide,
    pub rect: Rect,
}

struct Gesture {
    pointer: PointerId,
    region: HitRegion,
    down_position: Point,
    last_x: f32,
    dragging: bool,
}

enum ContentClick {
    Invoke,
    Close,
    Ignore,
}

/// Swipeable card controller.
///
/// The host lays the card out, reports its size with [`RevealSwipe::set_size`],
/// forwards pointer events in local coordinates and draws from
/// [`RevealSwipe::visuals`] and [`RevealSwipe::background_regions`].
/// Closing after a click runs as a UI task on the runtime, so the host has to
/// poll tasks as well as drive frames.
pub struct RevealSwipe {
    state: RevealState,
    options: RevealSwipeOptions,
    callbacks: RevealCallbacks,
    runtime: RuntimeHandle,
    size: Size,
    gesture: Option<Gesture>,
    velocity: VelocityTracker1D,
    close_task: Option<TaskHandle>,
    pressed: MutableState<Option<HitRegion>>,
}

impl RevealSwipe {
    pub fn new(
        state: RevealState,
        options: RevealSwipeOptions,
        callbacks: RevealCallbacks,
        runtime: RuntimeHandle,
    ) -> Self {
        Self {
            state,
            options,
            callbacks,
            runtime,
            size: Size::ZERO,
            gesture: None,
            velocity: VelocityTracker1D::new(),
            close_task: None,
            pressed: MutableState::new(None),
        }
    }

    pub fn state(&self) -> &RevealState {
        &self.state
    }

    pub fn options(&self) -> &RevealSwipeOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: RevealSwipeOptions) {
        self.options = options;
    }

    pub fn callbacks_mut(&mut self) -> &mut RevealCallbacks {
        &mut self.callbacks
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Measured size of the card in px.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Region currently held down, for press feedback.
    pub fn pressed_region(&self) -> Option<HitRegion> {
        self.pressed.get()
    }

    pub fn pressed_state(&self) -> State<Option<HitRegion>> {
        self.pressed.as_state()
    }

    /// Bounds of the content after applying the offset.
    pub fn content_rect(&self) -> Rect {
        Rect::from_size(self.size).translate(self.translation(self.state.offset()), 0.0)
    }

    /// Clickable background areas, one per enabled direction.
    ///
    /// With both directions enabled the start side takes the first half of the
    /// width; a single enabled side takes all of it. Mirrored in RTL.
    pub fn background_regions(&self) -> SmallVec<[BackgroundRegion; 2]> {
        let directions = self.state.directions();
        let has_start = directions.contains(RevealDirection::StartToEnd);
        let has_end = directions.contains(RevealDirection::EndToStart);
        let width = self.size.width;
        let height = self.size.height;
        let mut regions = SmallVec::new();

        let start_width = match (has_start, has_end) {
            (true, true) => width * 0.5,
            (true, false) => width,
            _ => 0.0,
        };
        if has_start {
            regions.push(BackgroundRegion {
                side: BackgroundSide::Start,
                rect: self.mirrored(Rect::new(0.0, 0.0, start_width, height)),
            });
        }
        if has_end {
            regions.push(BackgroundRegion {
                side: BackgroundSide::End,
                rect: self.mirrored(Rect::new(start_width, 0.0, width - start_width, height)),
            });
        }
        regions
    }

    /// The region under `position`; the content wins over the backgrounds.
    pub fn hit_test(&self, position: Point) -> Option<HitRegion> {
        if self.size.width <= 0.0 || self.size.height <= 0.0 {
            return None;
        }
        if self.content_rect().contains(position.x, position.y) {
            return Some(HitRegion::Content);
        }
        self.background_regions()
            .into_iter()
            .find(|region| region.rect.contains(position.x, position.y))
            .map(|region| HitRegion::Background(region.side))
    }

    /// Feeds one pointer event. Returns whether the component handled it.
    pub fn on_pointer_event(&mut self, event: &PointerEvent) -> bool {
        match event.kind {
            PointerEventKind::Down => self.on_down(event),
            PointerEventKind::Move => self.on_move(event),
            PointerEventKind::Up => self.on_up(event),
            PointerEventKind::Cancel if self.tracks(event) => self.on_cancel(),
            PointerEventKind::Cancel => false,
        }
    }

    fn on_down(&mut self, event: &PointerEvent) -> bool {
        if self.gesture.is_some() {
            return false;
        }
        let Some(region) = self.hit_test(event.position) else {
            return false;
        };
        if region == HitRegion::Content {
            if !self.content_takes_input() {
                return false;
            }
            if self.options.enable_swipe {
                self.cancel_pending_close();
                self.state.start_drag();
                self.velocity.reset();
                self.velocity
                    .add_data_point(event.uptime_millis, event.position.x);
            }
        }
        self.pressed.set(Some(region));
        self.gesture = Some(Gesture {
            pointer: event.id,
            region,
            down_position: event.position,
            last_x: event.position.x,
            dragging: false,
        });
        event.consume();
        true
    }

    fn on_move(&mut self, event: &PointerEvent) -> bool {
        let touch_slop = DRAG_THRESHOLD * self.state.density();
        let layout_direction = self.options.layout_direction;
        let enable_swipe = self.options.enable_swipe;
        let Some(gesture) = self.gesture.as_mut() else {
            return false;
        };
        if gesture.pointer != event.id || gesture.region != HitRegion::Content || !enable_swipe {
            return false;
        }
        let x = event.position.x;
        self.velocity.add_data_point(event.uptime_millis, x);

        let delta = if gesture.dragging {
            x - gesture.last_x
        } else {
            let total = x - gesture.down_position.x;
            if total.abs() <= touch_slop {
                return false;
            }
            gesture.dragging = true;
            total - touch_slop.copysign(total)
        };
        gesture.last_x = x;
        self.pressed.set(None);
        self.state.drag_by(directional(layout_direction, delta));
        event.consume();
        true
    }

    fn on_up(&mut self, event: &PointerEvent) -> bool {
        if !self.tracks(event) {
            return false;
        }
        let Some(gesture) = self.gesture.take() else {
            return false;
        };
        self.pressed.set(None);
        match gesture.region {
            HitRegion::Content if gesture.dragging => {
                self.velocity
                    .add_data_point(event.uptime_millis, event.position.x);
                let max_velocity = MAX_FLING_VELOCITY * self.state.density();
                let velocity = self.velocity.calculate_velocity_with_max(max_velocity);
                self.state
                    .settle(directional(self.options.layout_direction, velocity));
                event.consume();
                true
            }
            HitRegion::Content => {
                if self.options.enable_swipe {
                    self.state.settle(0.0);
                }
                if !event.is_consumed() {
                    self.content_click();
                }
                event.consume();
                true
            }
            HitRegion::Background(side) => {
                if event.is_consumed() || self.hit_test(event.position) != Some(gesture.region) {
                    return false;
                }
                self.background_click(side);
                event.consume();
                true
            }
        }
    }

    fn on_cancel(&mut self) -> bool {
        let Some(gesture) = self.gesture.take() else {
            return false;
        };
        self.pressed.set(None);
        if gesture.region == HitRegion::Content && self.options.enable_swipe {
            self.state.settle(0.0);
        }
        true
    }

    fn tracks(&self, event: &PointerEvent) -> bool {
        self.gesture
            .as_ref()
            .is_some_and(|gesture| gesture.pointer == event.id)
    }

    fn content_takes_input(&self) -> bool {
        self.options.enable_swipe
            || self.options.close_on_content_click
            || self.callbacks.on_content_click.is_some()
    }

    fn content_click(&mut self) {
        let is_open = self.state.target_value() != RevealValue::Default;
        let has_handler = self.callbacks.on_content_click.is_some();
        let action = match (has_handler, self.options.close_on_content_click) {
            (true, false) => ContentClick::Invoke,
            (false, true) if is_open => ContentClick::Close,
            (true, true) if is_open => ContentClick::Close,
            (true, true) => ContentClick::Invoke,
            _ => ContentClick::Ignore,
        };
        match action {
            ContentClick::Invoke => {
                if let Some(handler) = self.callbacks.on_content_click.as_mut() {
                    handler();
                }
            }
            ContentClick::Close => {
                log::debug!("content click closes the reveal");
                self.schedule_close();
            }
            ContentClick::Ignore => {}
        }
    }

    fn background_click(&mut self, side: BackgroundSide) {
        let allowed = self.invoke_background_callback(side);
        let revealed_toward = match side {
            BackgroundSide::Start => RevealValue::FullyRevealedEnd,
            BackgroundSide::End => RevealValue::FullyRevealedStart,
        };
        if !allowed {
            log::debug!("{side:?} background click vetoed the close");
            return;
        }
        if self.options.close_on_background_click
            && self.state.target_value() == revealed_toward
        {
            self.schedule_close();
        }
    }

    fn invoke_background_callback(&mut self, side: BackgroundSide) -> bool {
        match side {
            BackgroundSide::Start => (self.callbacks.on_background_start_click)(),
            BackgroundSide::End => (self.callbacks.on_background_end_click)(),
        }
    }

    /// Runs [`RevealState::reset`] as a UI task; a later drag cancels it.
    fn schedule_close(&mut self) {
        self.cancel_pending_close();
        let state = self.state.clone();
        self.close_task = self.runtime.spawn_ui(async move {
            let outcome = state.reset().await;
            log::debug!("close ended {outcome:?}");
        });
    }

    fn cancel_pending_close(&mut self) {
        if let Some(task) = self.close_task.take() {
            task.cancel();
        }
    }

    /// Drawing inputs for the current offset.
    pub fn visuals(&self) -> RevealVisuals {
        let offset = self.state.offset();
        let radii = self.options.shape.resolve(self.size);
        let factors = corner_factors(offset, radii, self.state.directions());
        let alpha = background_alpha(offset, self.state.max_reveal_px(), self.options.alpha_easing);
        let animate = self.options.animate_background_color;
        let is_open = self.state.target_value() != RevealValue::Default;
        RevealVisuals {
            content_translation: self.translation(offset),
            content_corners: animated_corners(radii, factors),
            background_corners: radii,
            corner_factors: factors,
            background_alpha: alpha,
            background_start_color: background_color(
                self.options.background_start_color,
                alpha,
                animate,
            ),
            background_end_color: background_color(self.options.background_end_color, alpha, animate),
            content_indication: self.callbacks.on_content_click.is_some()
                && !(self.options.close_on_content_click && is_open),
        }
    }

    /// Custom actions for assistive technology; none while swipe is disabled.
    pub fn accessibility_actions(&self) -> Vec<AccessibilityAction> {
        if !self.options.enable_swipe {
            return Vec::new();
        }
        [
            (BackgroundSide::Start, &self.options.background_start_action_label),
            (BackgroundSide::End, &self.options.background_end_action_label),
        ]
        .into_iter()
        .filter_map(|(side, label)| {
            label.as_ref().map(|label| AccessibilityAction {
                side,
                label: label.clone(),
            })
        })
        .collect()
    }

    /// Runs the background callback for `side` without a gesture and without
    /// closing. Returns the callback's result, or `None` when no such action
    /// is exposed.
    pub fn perform_accessibility_action(&mut self, side: BackgroundSide) -> Option<bool> {
        if !self
            .accessibility_actions()
            .iter()
            .any(|action| action.side == side)
        {
            return None;
        }
        log::debug!("accessibility action on {side:?} background");
        Some(self.invoke_background_callback(side))
    }

    fn translation(&self, offset: f32) -> f32 {
        directional(self.options.layout_direction, offset)
    }

    fn mirrored(&self, rect: Rect) -> Rect {
        match self.options.layout_direction {
            LayoutDirection::Ltr => rect,
            LayoutDirection::Rtl => Rect::new(
                self.size.width - rect.right(),
                rect.y,
                rect.width,
                rect.height,
            ),
        }
    }
}

impl Drop for RevealSwipe {
    fn drop(&mut self) {
        self.cancel_pending_close();
    }
}

/// Converts between screen x and the offset axis, which points toward the end.
fn directional(layout_direction: LayoutDirection, value: f32) -> f32 {
    match layout_direction {
        LayoutDirection::Ltr => value,
        LayoutDirection::Rtl => -value,
    }
}

#[cfg(test)]
#[path = "tests/swipe_tests.rs"]
mod tests;
