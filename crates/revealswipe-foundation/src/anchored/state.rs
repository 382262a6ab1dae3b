use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::{Rc, Weak};

use revealswipe_animation::{Animatable, AnimationJob, AnimationOutcome, AnimationType};
use revealswipe_core::{MutableState, RuntimeHandle, State, Subscription};

use super::{DraggableAnchors, ResistanceConfig};
use crate::gesture_constants::SETTLE_VELOCITY_THRESHOLD;

/// Maps the distance between two anchors to the travel needed to reach the far one.
pub type PositionalThreshold = Rc<dyn Fn(f32) -> f32>;
/// Release speed in px/s above which the direction of motion decides the target.
pub type VelocityThreshold = Rc<dyn Fn() -> f32>;
/// Veto for a proposed value change; `false` keeps the current value.
pub type ConfirmValueChange<T> = Rc<dyn Fn(T) -> bool>;

/// Which phase owns the offset right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging,
    Animating,
}

struct DragSession {
    /// Drag position before resistance.
    raw_offset: f32,
}

struct Inner<T: Copy + PartialEq + Debug + 'static> {
    anchors: DraggableAnchors<T>,
    positional_threshold: PositionalThreshold,
    velocity_threshold: VelocityThreshold,
    confirm_value_change: ConfirmValueChange<T>,
    animation: AnimationType,
    resistance: ResistanceConfig,
    drag: Option<DragSession>,
    animation_target: Option<T>,
    // Bumped whenever a drag, snap or animation takes over, so completions of
    // superseded animations are ignored.
    generation: u64,
}

/// Drag-to-anchor state machine over a single axis.
///
/// A drag session moves the offset directly (with resistance past the outer
/// anchors). Releasing picks an anchor from the bracketing pair by velocity,
/// then by positional threshold, and animates there. Every drag, snap or
/// animation supersedes whichever operation owned the offset before.
pub struct AnchoredDraggableState<T: Copy + PartialEq + Debug + 'static> {
    inner: Rc<RefCell<Inner<T>>>,
    offset: Animatable<f32>,
    current_value: MutableState<T>,
}

impl<T: Copy + PartialEq + Debug + 'static> Clone for AnchoredDraggableState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            offset: self.offset.clone(),
            current_value: self.current_value.clone(),
        }
    }
}

impl<T: Copy + PartialEq + Debug + 'static> AnchoredDraggableState<T> {
    /// Creates an idle state resting on `initial`.
    ///
    /// An `initial` value without an anchor rests at the closest anchor to 0
    /// instead; with no anchors at all the offset is 0.
    pub fn new(initial: T, anchors: DraggableAnchors<T>, runtime: RuntimeHandle) -> Self {
        let (initial, position) = match anchors.position_of(initial) {
            Some(position) => (initial, position),
            None => match anchors.closest_anchor(0.0) {
                Some(fallback) => {
                    log::warn!("no anchor for initial value {initial:?}, starting at {fallback:?}");
                    (fallback, anchors.position_of(fallback).unwrap_or(0.0))
                }
                None => (initial, 0.0),
            },
        };
        let inner = Inner {
            anchors,
            positional_threshold: Rc::new(|distance| distance * 0.5),
            velocity_threshold: Rc::new(|| SETTLE_VELOCITY_THRESHOLD),
            confirm_value_change: Rc::new(|_| true),
            animation: AnimationType::default(),
            resistance: ResistanceConfig::default(),
            drag: None,
            animation_target: None,
            generation: 0,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
            offset: Animatable::new(position, runtime),
            current_value: MutableState::new(initial),
        }
    }

    pub fn with_positional_threshold(self, threshold: impl Fn(f32) -> f32 + 'static) -> Self {
        self.inner.borrow_mut().positional_threshold = Rc::new(threshold);
        self
    }

    pub fn with_velocity_threshold(self, threshold: impl Fn() -> f32 + 'static) -> Self {
        self.inner.borrow_mut().velocity_threshold = Rc::new(threshold);
        self
    }

    pub fn with_confirm_value_change(self, confirm: impl Fn(T) -> bool + 'static) -> Self {
        self.inner.borrow_mut().confirm_value_change = Rc::new(confirm);
        self
    }

    pub fn with_animation(self, animation: AnimationType) -> Self {
        self.inner.borrow_mut().animation = animation;
        self
    }

    pub fn with_resistance(self, resistance: ResistanceConfig) -> Self {
        self.inner.borrow_mut().resistance = resistance;
        self
    }

    pub fn offset(&self) -> f32 {
        self.offset.value()
    }

    pub fn offset_state(&self) -> State<f32> {
        self.offset.state()
    }

    pub fn current_value(&self) -> T {
        self.current_value.get()
    }

    pub fn current_value_state(&self) -> State<T> {
        self.current_value.as_state()
    }

    pub fn subscribe_offset(&self, observer: impl Fn(&f32) + 'static) -> Subscription {
        self.offset.state().subscribe(observer)
    }

    pub fn subscribe_value(&self, observer: impl Fn(&T) + 'static) -> Subscription {
        self.current_value.subscribe(observer)
    }

    /// The value the state is heading to.
    ///
    /// While animating this is the animation's target. While dragging it is
    /// where a slow release would settle. Otherwise it is the current value.
    pub fn target_value(&self) -> T {
        let (animation_target, dragging) = {
            let inner = self.inner.borrow();
            (inner.animation_target, inner.drag.is_some())
        };
        if let Some(target) = animation_target {
            return target;
        }
        if dragging {
            return self.compute_target(self.offset(), 0.0);
        }
        self.current_value()
    }

    pub fn anchors(&self) -> DraggableAnchors<T> {
        self.inner.borrow().anchors.clone()
    }

    pub fn resistance(&self) -> ResistanceConfig {
        self.inner.borrow().resistance
    }

    pub fn animation(&self) -> AnimationType {
        self.inner.borrow().animation
    }

    pub fn is_dragging(&self) -> bool {
        self.inner.borrow().drag.is_some()
    }

    pub fn is_animation_running(&self) -> bool {
        self.offset.is_running()
    }

    pub fn phase(&self) -> DragPhase {
        if self.is_dragging() {
            DragPhase::Dragging
        } else if self.is_animation_running() {
            DragPhase::Animating
        } else {
            DragPhase::Idle
        }
    }

    /// Starts a drag session, taking the offset over from any running animation.
    pub fn start_drag(&self) {
        let offset = self.offset();
        {
            let mut inner = self.inner.borrow_mut();
            inner.generation += 1;
            inner.animation_target = None;
            let (min, max) = bounds(&inner.anchors, offset);
            let raw_offset = inner.resistance.unapply(offset, min, max);
            inner.drag = Some(DragSession { raw_offset });
        }
        // Resolves the superseded job; its listener sees the bumped generation.
        self.offset.stop();
        log::trace!("drag started at {offset}");
    }

    /// Moves the drag by `delta` px and returns how far the offset actually moved.
    ///
    /// Starts a session first if none is active. Non-finite deltas are ignored.
    pub fn dispatch_raw_delta(&self, delta: f32) -> f32 {
        if !delta.is_finite() {
            return 0.0;
        }
        if !self.is_dragging() {
            self.start_drag();
        }
        let previous = self.offset();
        let next = {
            let mut inner = self.inner.borrow_mut();
            let Inner {
                anchors,
                resistance,
                drag,
                ..
            } = &mut *inner;
            let Some(session) = drag.as_mut() else {
                return 0.0;
            };
            session.raw_offset += delta;
            let (min, max) = bounds(anchors, session.raw_offset);
            resistance.apply(session.raw_offset, min, max)
        };
        self.offset.snapTo(next);
        log::trace!("drag delta {delta} moved offset {previous} -> {next}");
        next - previous
    }

    /// Ends the drag session and animates to the anchor chosen for `velocity`.
    pub fn settle(&self, velocity: f32) -> AnimationJob {
        self.inner.borrow_mut().drag = None;
        let offset = self.offset();
        let velocity = if velocity.is_finite() { velocity } else { 0.0 };
        let candidate = self.compute_target(offset, velocity);
        let current = self.current_value();

        let confirm = Rc::clone(&self.inner.borrow().confirm_value_change);
        let target = if candidate == current || confirm(candidate) {
            candidate
        } else {
            log::debug!("value change to {candidate:?} vetoed, staying at {current:?}");
            current
        };
        log::debug!("settling from {offset} at {velocity}px/s to {target:?}");
        self.animate_to(target)
    }

    /// Picks the anchor a release at `offset` with `velocity` would settle at.
    pub fn compute_target(&self, offset: f32, velocity: f32) -> T {
        let current = self.current_value();
        let (bracket, positional_threshold, velocity_threshold) = {
            let inner = self.inner.borrow();
            (
                inner.anchors.bracketing(nan_to_zero(offset)),
                Rc::clone(&inner.positional_threshold),
                Rc::clone(&inner.velocity_threshold),
            )
        };
        let Some(((lower, lower_pos), (upper, upper_pos))) = bracket else {
            return current;
        };
        if lower == upper {
            return lower;
        }

        if velocity.abs() > velocity_threshold().abs() {
            return if velocity > 0.0 { upper } else { lower };
        }

        let current_pos = self
            .inner
            .borrow()
            .anchors
            .position_of(current)
            .unwrap_or(lower_pos);
        let ((near, near_pos), far) = if current_pos >= upper_pos {
            ((upper, upper_pos), lower)
        } else {
            ((lower, lower_pos), upper)
        };
        let distance = (upper_pos - lower_pos).abs();
        let threshold = nan_to_zero(positional_threshold(distance)).abs();
        if (offset - near_pos).abs() >= threshold {
            far
        } else {
            near
        }
    }

    /// Animates to the anchor of `target` with the configured animation.
    pub fn animate_to(&self, target: T) -> AnimationJob {
        let animation = self.animation();
        self.animate_to_with(target, animation)
    }

    /// Animates to the anchor of `target` with an explicit animation.
    ///
    /// Without an anchor for `target` nothing moves and a finished job is returned.
    pub fn animate_to_with(&self, target: T, animation: AnimationType) -> AnimationJob {
        let position = self.inner.borrow().anchors.position_of(target);
        let Some(position) = position else {
            log::warn!("no anchor for {target:?}, animation skipped");
            return AnimationJob::finished();
        };
        let generation = {
            let mut inner = self.inner.borrow_mut();
            inner.generation += 1;
            inner.drag = None;
            inner.animation_target = Some(target);
            inner.generation
        };

        let job = self.offset.animateTo(position, animation);
        let weak: Weak<RefCell<Inner<T>>> = Rc::downgrade(&self.inner);
        let current_value = self.current_value.clone();
        job.on_complete(move |outcome| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            {
                let mut inner = inner.borrow_mut();
                if inner.generation != generation {
                    return;
                }
                inner.animation_target = None;
            }
            if outcome == AnimationOutcome::Finished && current_value.set(target) {
                log::debug!("settled at {target:?}");
            }
        });
        job
    }

    /// Jumps to the anchor of `target` without animating.
    pub fn snap_to(&self, target: T) {
        let position = self.inner.borrow().anchors.position_of(target);
        let Some(position) = position else {
            log::warn!("no anchor for {target:?}, snap skipped");
            return;
        };
        {
            let mut inner = self.inner.borrow_mut();
            inner.generation += 1;
            inner.drag = None;
            inner.animation_target = None;
        }
        self.offset.snapTo(position);
        self.current_value.set(target);
    }

    /// Replaces the anchors (and optionally the resistance) after a resize.
    ///
    /// An idle state moves onto its value's new position, or onto the anchor
    /// closest to the offset when its value lost its anchor. A running
    /// animation is retargeted the same way. A drag keeps going and settles
    /// against the new anchors.
    pub fn update_anchors(&self, anchors: DraggableAnchors<T>, resistance: Option<ResistanceConfig>) {
        let phase = self.phase();
        let destination = {
            let mut inner = self.inner.borrow_mut();
            inner.anchors = anchors;
            if let Some(resistance) = resistance {
                inner.resistance = resistance;
            }
            let wanted = inner.animation_target.unwrap_or_else(|| self.current_value.get());
            if inner.anchors.has_anchor_for(wanted) {
                Some(wanted)
            } else {
                inner.anchors.closest_anchor(self.offset.value())
            }
        };
        let Some(destination) = destination else {
            return;
        };
        match phase {
            DragPhase::Dragging => {}
            DragPhase::Animating => {
                self.animate_to(destination);
            }
            DragPhase::Idle => self.snap_to(destination),
        }
    }
}

/// Anchor range, or a degenerate range at `fallback` when there are no anchors.
fn bounds<T: Copy + PartialEq>(anchors: &DraggableAnchors<T>, fallback: f32) -> (f32, f32) {
    match (anchors.min_position(), anchors.max_position()) {
        (Some(min), Some(max)) => (min, max),
        _ => (fallback, fallback),
    }
}

fn nan_to_zero(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
#[path = "../tests/anchored_state_tests.rs"]
mod tests;
