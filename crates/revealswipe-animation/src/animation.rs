//! Time-based animations with easing curves and spring physics.
//!
//! Note: [`Animatable`] uses camelCase for `animateTo`/`snapTo` to keep 1:1
//! naming with Jetpack Compose's `Animatable`.

#![allow(non_snake_case)]

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use revealswipe_core::{FrameCallbackRegistration, FrameClock, MutableState, RuntimeHandle, State};

use crate::job::{AnimationJob, AnimationOutcome};

/// Trait for types that can be linearly interpolated.
pub trait Lerp {
    fn lerp(&self, target: &Self, fraction: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction
    }
}

/// Trait for values that can be driven by an [`Animatable`].
pub trait SpringScalar: Lerp + Clone + PartialEq {
    /// Convert the value to `f32` for physics calculations.
    fn to_f32(&self) -> f32;

    /// Compute the current progress between the start and target values.
    fn spring_progress(start: &Self, target: &Self, current: &Self) -> f32 {
        let start_val = start.to_f32();
        let target_val = target.to_f32();
        let current_val = current.to_f32();

        if (target_val - start_val).abs() < f32::EPSILON {
            1.0
        } else {
            (current_val - start_val) / (target_val - start_val)
        }
    }

    /// Determine whether the current value is close enough to the target to
    /// consider the animation finished.
    fn is_near_target(current: &Self, target: &Self, threshold: f32) -> bool {
        (current.to_f32() - target.to_f32()).abs() < threshold
    }
}

impl SpringScalar for f32 {
    fn to_f32(&self) -> f32 {
        *self
    }
}

/// Distance under which an animation is treated as already at its target.
pub const VISIBILITY_THRESHOLD: f32 = 0.01;

/// Easing functions for animations matching Jetpack Compose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    /// Linear interpolation (no easing).
    LinearEasing,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Fast out, slow in (material design standard).
    FastOutSlowInEasing,
    LinearOutSlowInEasing,
    FastOutLinearEasing,
    /// Arbitrary cubic bezier through (0,0), (x1,y1), (x2,y2), (1,1).
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Easing {
    pub const fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Easing::CubicBezier { x1, y1, x2, y2 }
    }

    /// Apply the easing function to a linear fraction [0, 1].
    pub fn transform(&self, fraction: f32) -> f32 {
        match *self {
            Easing::LinearEasing => fraction,
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, fraction),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, fraction),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, fraction),
            Easing::FastOutSlowInEasing => cubic_bezier(0.4, 0.0, 0.2, 1.0, fraction),
            Easing::LinearOutSlowInEasing => cubic_bezier(0.0, 0.0, 0.2, 1.0, fraction),
            Easing::FastOutLinearEasing => cubic_bezier(0.4, 0.0, 1.0, 1.0, fraction),
            Easing::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(x1, y1, x2, y2, fraction),
        }
    }
}

/// Cubic bezier curve approximation for easing.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, fraction: f32) -> f32 {
    if fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;

    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    fn sample_curve(a: f32, b: f32, c: f32, t: f32) -> f32 {
        ((a * t + b) * t + c) * t
    }

    fn sample_derivative(a: f32, b: f32, c: f32, t: f32) -> f32 {
        (3.0 * a * t + 2.0 * b) * t + c
    }

    // Newton-Raphson for the parametric `t` matching the x fraction, clamped to [0, 1].
    let mut t = fraction;
    let mut newton_success = false;
    for _ in 0..8 {
        let x = sample_curve(ax, bx, cx, t) - fraction;
        if x.abs() < 1e-6 {
            newton_success = true;
            break;
        }
        let dx = sample_derivative(ax, bx, cx, t);
        if dx.abs() < 1e-6 {
            break;
        }
        t = (t - x / dx).clamp(0.0, 1.0);
    }

    if !newton_success {
        let mut t0 = 0.0;
        let mut t1 = 1.0;
        t = fraction;
        for _ in 0..16 {
            let x = sample_curve(ax, bx, cx, t);
            let delta = x - fraction;
            if delta.abs() < 1e-6 {
                break;
            }
            if delta > 0.0 {
                t1 = t;
            } else {
                t0 = t;
            }
            t = 0.5 * (t0 + t1);
        }
    }

    sample_curve(ay, by, cy, t)
}

/// Animation specification combining duration and easing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    /// Duration in milliseconds.
    pub duration_millis: u64,
    /// Easing function to apply.
    pub easing: Easing,
    /// Delay before starting animation in milliseconds.
    pub delay_millis: u64,
}

impl AnimationSpec {
    /// Create a tween animation with duration and easing.
    pub fn tween(duration_millis: u64, easing: Easing) -> Self {
        Self {
            duration_millis,
            easing,
            delay_millis: 0,
        }
    }

    /// Create a linear tween animation.
    pub fn linear(duration_millis: u64) -> Self {
        Self::tween(duration_millis, Easing::LinearEasing)
    }

    /// Add a delay before the animation starts.
    pub fn with_delay(mut self, delay_millis: u64) -> Self {
        self.delay_millis = delay_millis;
        self
    }

    fn is_instant(&self) -> bool {
        self.duration_millis == 0 && self.delay_millis == 0
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::tween(300, Easing::FastOutSlowInEasing)
    }
}

/// Spring animation configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    /// Damping ratio. 1.0 = critically damped, < 1.0 = under-damped (bouncy), > 1.0 = over-damped.
    pub damping_ratio: f32,
    /// Stiffness constant. Higher values = faster animation.
    pub stiffness: f32,
    /// Velocity threshold to stop animation.
    pub velocity_threshold: f32,
    /// Position threshold to stop animation.
    pub position_threshold: f32,
}

impl SpringSpec {
    pub fn default_spring() -> Self {
        Self {
            damping_ratio: 1.0,
            stiffness: 1500.0,
            velocity_threshold: 0.01,
            position_threshold: 0.001,
        }
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::default_spring()
    }
}

/// Animation type specification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationType {
    /// Time-based tween animation.
    Tween(AnimationSpec),
    /// Physics-based spring animation.
    Spring(SpringSpec),
}

impl AnimationType {
    /// Zero-duration tween: the value jumps to the target without waiting for a frame.
    pub fn snap() -> Self {
        AnimationType::Tween(AnimationSpec::linear(0))
    }
}

impl Default for AnimationType {
    fn default() -> Self {
        AnimationType::Tween(AnimationSpec::default())
    }
}

/// Value holder that animates toward targets on frame ticks.
///
/// Only one animation runs at a time: `animateTo`, `snapTo` and `stop`
/// cancel the animation in flight, whose job then resolves
/// [`AnimationOutcome::Cancelled`].
pub struct Animatable<T: SpringScalar + 'static> {
    inner: Rc<RefCell<AnimatableInner<T>>>,
}

struct AnimatableInner<T: SpringScalar + 'static> {
    state: MutableState<T>,
    clock: FrameClock,
    current: T,
    velocity: f32,
    start: T,
    target: T,
    animation_type: AnimationType,
    start_time_nanos: Option<u64>,
    registration: Option<FrameCallbackRegistration>,
    job: Option<AnimationJob>,
}

impl<T: SpringScalar + 'static> AnimatableInner<T> {
    /// Detaches the running animation and hands back its job so it can be
    /// resolved after the borrow is released.
    fn take_running(&mut self) -> Option<AnimationJob> {
        if let Some(registration) = self.registration.take() {
            registration.cancel();
        }
        self.start_time_nanos = None;
        self.velocity = 0.0;
        self.job.take()
    }
}

/// Work left over once the inner borrow is released: observers and job
/// listeners may call back into the animatable.
struct Settled<T: SpringScalar + 'static> {
    state: MutableState<T>,
    publish: Option<T>,
    superseded: Option<AnimationJob>,
}

impl<T: SpringScalar + 'static> Settled<T> {
    fn apply(self) {
        if let Some(previous) = self.superseded {
            previous.resolve(AnimationOutcome::Cancelled);
        }
        if let Some(value) = self.publish {
            self.state.set(value);
        }
    }
}

impl<T: SpringScalar + 'static> Animatable<T> {
    /// Create a new animatable with the given initial value.
    pub fn new(initial: T, runtime: RuntimeHandle) -> Self {
        let inner = AnimatableInner {
            state: MutableState::new(initial.clone()),
            clock: runtime.frame_clock(),
            current: initial.clone(),
            velocity: 0.0,
            start: initial.clone(),
            target: initial,
            animation_type: AnimationType::default(),
            start_time_nanos: None,
            registration: None,
            job: None,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    /// Animate to the target value using the specified animation.
    ///
    /// Returns a job that is already finished when the value is within
    /// [`VISIBILITY_THRESHOLD`] of `target` or the animation has no duration.
    pub fn animateTo(&self, target: T, animation: AnimationType) -> AnimationJob {
        let (settled, job, schedule) = {
            let mut inner = self.inner.borrow_mut();
            let superseded = inner.take_running();
            inner.start = inner.current.clone();
            inner.target = target.clone();
            inner.animation_type = animation;

            let instant = matches!(animation, AnimationType::Tween(spec) if spec.is_instant());
            if instant
                || <T as SpringScalar>::is_near_target(&inner.current, &target, VISIBILITY_THRESHOLD)
            {
                inner.start = target.clone();
                inner.current = target.clone();
                let settled = Settled {
                    state: inner.state.clone(),
                    publish: Some(target),
                    superseded,
                };
                (settled, AnimationJob::finished(), false)
            } else {
                let job = AnimationJob::pending();
                inner.job = Some(job.clone());
                let settled = Settled {
                    state: inner.state.clone(),
                    publish: None,
                    superseded,
                };
                (settled, job, true)
            }
        };

        if schedule {
            let weak = Rc::downgrade(&self.inner);
            let job_id = job.id();
            job.set_canceller(move || {
                if let Some(strong) = weak.upgrade() {
                    Self::stop_job(&strong, job_id);
                }
            });
            Self::schedule_frame(&self.inner, job_id);
        }
        settled.apply();
        job
    }

    /// Snap immediately to the target value without animating.
    pub fn snapTo(&self, target: T) {
        let settled = {
            let mut inner = self.inner.borrow_mut();
            let superseded = inner.take_running();
            inner.start = target.clone();
            inner.target = target.clone();
            inner.current = target.clone();
            Settled {
                state: inner.state.clone(),
                publish: Some(target),
                superseded,
            }
        };
        settled.apply();
    }

    /// Stop the running animation, leaving the value where it is.
    pub fn stop(&self) {
        let settled = {
            let mut inner = self.inner.borrow_mut();
            let superseded = inner.take_running();
            inner.start = inner.current.clone();
            inner.target = inner.current.clone();
            Settled {
                state: inner.state.clone(),
                publish: None,
                superseded,
            }
        };
        settled.apply();
    }

    pub fn value(&self) -> T {
        self.inner.borrow().current.clone()
    }

    /// Return the current animation target.
    pub fn target(&self) -> T {
        self.inner.borrow().target.clone()
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().job.is_some()
    }

    /// Observable view of the animated value.
    pub fn state(&self) -> State<T> {
        self.inner.borrow().state.as_state()
    }

    fn stop_job(this: &Rc<RefCell<AnimatableInner<T>>>, job_id: u64) {
        let settled = {
            let mut inner = this.borrow_mut();
            if inner.job.as_ref().map(AnimationJob::id) != Some(job_id) {
                return;
            }
            let superseded = inner.take_running();
            inner.start = inner.current.clone();
            inner.target = inner.current.clone();
            Settled {
                state: inner.state.clone(),
                publish: None,
                superseded,
            }
        };
        settled.apply();
    }

    fn schedule_frame(this: &Rc<RefCell<AnimatableInner<T>>>, job_id: u64) {
        let clock = {
            let inner = this.borrow();
            if inner.registration.is_some() {
                return;
            }
            inner.clock.clone()
        };
        let weak: Weak<RefCell<AnimatableInner<T>>> = Rc::downgrade(this);
        let registration = clock.with_frame_nanos(move |time| {
            if let Some(strong) = weak.upgrade() {
                Self::on_frame(&strong, time, job_id);
            }
        });
        this.borrow_mut().registration = Some(registration);
    }

    fn on_frame(this: &Rc<RefCell<AnimatableInner<T>>>, frame_time_nanos: u64, job_id: u64) {
        let mut schedule_next = false;
        let mut finished = None;
        let (state, publish) = {
            let mut inner = this.borrow_mut();
            if inner.job.as_ref().map(AnimationJob::id) != Some(job_id) {
                // Superseded between registration and this frame.
                return;
            }
            inner.registration = None;
            let mut publish = None;

            match inner.animation_type {
                AnimationType::Tween(spec) => {
                    let start_time = *inner.start_time_nanos.get_or_insert(frame_time_nanos);
                    let elapsed_nanos = frame_time_nanos.saturating_sub(start_time);
                    let delay_nanos = spec.delay_millis * 1_000_000;

                    if elapsed_nanos < delay_nanos {
                        schedule_next = true;
                    } else {
                        let animation_elapsed = elapsed_nanos - delay_nanos;
                        let duration_nanos = (spec.duration_millis * 1_000_000).max(1);
                        let linear_progress =
                            (animation_elapsed as f32 / duration_nanos as f32).clamp(0.0, 1.0);
                        let progress = spec.easing.transform(linear_progress);

                        if linear_progress >= 1.0 {
                            let target = inner.target.clone();
                            inner.start = target.clone();
                            inner.start_time_nanos = None;
                            inner.current = target.clone();
                            publish = Some(target);
                            finished = inner.job.take();
                        } else {
                            let new_value = inner.start.lerp(&inner.target, progress);
                            inner.current = new_value.clone();
                            publish = Some(new_value);
                            schedule_next = true;
                        }
                    }
                }
                AnimationType::Spring(spec) => {
                    let start_time = *inner.start_time_nanos.get_or_insert(frame_time_nanos);
                    let elapsed_nanos = frame_time_nanos.saturating_sub(start_time);
                    let dt = elapsed_nanos as f32 / 1_000_000_000.0;

                    if dt == 0.0 {
                        schedule_next = true;
                    } else {
                        // Semi-implicit Euler on progress from start (0) to target (1).
                        let stiffness = spec.stiffness;
                        let damping = 2.0 * spec.damping_ratio * stiffness.sqrt();
                        let timestep: f32 = 0.016;
                        let mut simulated = 0.0f32;

                        while simulated < dt {
                            let step = timestep.min(dt - simulated);
                            let current_progress = <T as SpringScalar>::spring_progress(
                                &inner.start,
                                &inner.target,
                                &inner.current,
                            );
                            let displacement = current_progress - 1.0;
                            let spring_force = -stiffness * displacement - damping * inner.velocity;
                            inner.velocity += spring_force * step;
                            let new_progress = current_progress + inner.velocity * step;
                            inner.current = inner
                                .start
                                .lerp(&inner.target, new_progress.clamp(0.0, 2.0));
                            simulated += step;
                        }
                        // Later frames integrate from here.
                        inner.start_time_nanos = Some(frame_time_nanos);

                        let at_rest = inner.velocity.abs() < spec.velocity_threshold;
                        let near_target = <T as SpringScalar>::is_near_target(
                            &inner.current,
                            &inner.target,
                            spec.position_threshold,
                        );

                        if at_rest && near_target {
                            let target = inner.target.clone();
                            inner.start = target.clone();
                            inner.start_time_nanos = None;
                            inner.velocity = 0.0;
                            inner.current = target.clone();
                            publish = Some(target);
                            finished = inner.job.take();
                        } else {
                            publish = Some(inner.current.clone());
                            schedule_next = true;
                        }
                    }
                }
            }
            (inner.state.clone(), publish)
        };

        if schedule_next {
            Self::schedule_frame(this, job_id);
        }
        if let Some(value) = publish {
            state.set(value);
        }
        if let Some(job) = finished {
            log::trace!("animation job {} finished", job.id());
            job.resolve(AnimationOutcome::Finished);
        }
    }
}

impl<T: SpringScalar + 'static> Clone for Animatable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

#[cfg(test)]
#[path = "tests/animation_tests.rs"]
mod tests;
