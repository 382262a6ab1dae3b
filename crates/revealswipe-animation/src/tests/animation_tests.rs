use super::*;
use revealswipe_core::{DefaultScheduler, Runtime};
use std::cell::Cell;
use std::sync::Arc;

fn test_runtime() -> Runtime {
    Runtime::new(Arc::new(DefaultScheduler::new()))
}

fn frame(runtime: &Runtime, millis: u64) {
    runtime.drain_frame_callbacks(millis * 1_000_000);
}

#[test]
fn easings_pin_endpoints() {
    let easings = [
        Easing::LinearEasing,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::FastOutSlowInEasing,
        Easing::LinearOutSlowInEasing,
        Easing::FastOutLinearEasing,
        Easing::cubic_bezier(0.4, 0.4, 0.17, 0.9),
    ];
    for easing in easings {
        assert_eq!(easing.transform(0.0), 0.0, "{easing:?}");
        assert_eq!(easing.transform(1.0), 1.0, "{easing:?}");
        let mid = easing.transform(0.5);
        assert!((0.0..=1.0).contains(&mid), "{easing:?} -> {mid}");
    }
}

#[test]
fn custom_bezier_is_monotonic() {
    let easing = Easing::cubic_bezier(0.4, 0.4, 0.17, 0.9);
    let mut previous = 0.0;
    for step in 1..=20 {
        let value = easing.transform(step as f32 / 20.0);
        assert!(value >= previous - 1e-4, "step {step}: {value} < {previous}");
        previous = value;
    }
    // Front-loaded curve: halfway through time is well past halfway in value.
    assert!(easing.transform(0.5) > 0.6);
}

#[test]
fn linear_easing_is_identity() {
    for step in 0..=10 {
        let fraction = step as f32 / 10.0;
        assert_eq!(Easing::LinearEasing.transform(fraction), fraction);
    }
}

#[test]
fn default_animation_is_300ms_tween() {
    assert_eq!(
        AnimationType::default(),
        AnimationType::Tween(AnimationSpec::tween(300, Easing::FastOutSlowInEasing))
    );
    assert_eq!(AnimationSpec::linear(0).with_delay(10).delay_millis, 10);
}

#[test]
fn tween_reaches_target_on_frames() {
    let runtime = test_runtime();
    let animatable = Animatable::new(0.0f32, runtime.handle());

    let job = animatable.animateTo(100.0, AnimationType::Tween(AnimationSpec::linear(100)));
    assert!(animatable.is_running());
    assert!(!job.is_complete());
    assert_eq!(animatable.target(), 100.0);

    frame(&runtime, 1_000);
    assert_eq!(animatable.value(), 0.0);
    frame(&runtime, 1_050);
    assert!((animatable.value() - 50.0).abs() < 0.01);
    frame(&runtime, 1_100);

    assert_eq!(animatable.value(), 100.0);
    assert_eq!(job.outcome(), Some(AnimationOutcome::Finished));
    assert!(!animatable.is_running());
    assert!(!runtime.has_frame_callbacks());
}

#[test]
fn delayed_tween_holds_until_delay_elapses() {
    let runtime = test_runtime();
    let animatable = Animatable::new(0.0f32, runtime.handle());
    let job = animatable.animateTo(
        10.0,
        AnimationType::Tween(AnimationSpec::linear(100).with_delay(50)),
    );

    frame(&runtime, 0);
    frame(&runtime, 40);
    assert_eq!(animatable.value(), 0.0);
    frame(&runtime, 100);
    assert!((animatable.value() - 5.0).abs() < 0.01);
    frame(&runtime, 150);
    assert!(job.is_complete());
}

#[test]
fn state_observers_see_each_frame_and_may_read_back() {
    let runtime = test_runtime();
    let animatable = Animatable::new(0.0f32, runtime.handle());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let reader = animatable.clone();
    let _subscription = animatable.state().subscribe(move |value| {
        // Reading back from inside the observer must not trip a borrow.
        assert_eq!(reader.value(), *value);
        sink.borrow_mut().push(*value);
    });

    animatable.animateTo(20.0, AnimationType::Tween(AnimationSpec::linear(20)));
    frame(&runtime, 0);
    frame(&runtime, 10);
    frame(&runtime, 20);

    assert_eq!(*seen.borrow(), vec![10.0, 20.0]);
}

#[test]
fn superseded_job_resolves_cancelled() {
    let runtime = test_runtime();
    let animatable = Animatable::new(0.0f32, runtime.handle());

    let first = animatable.animateTo(100.0, AnimationType::Tween(AnimationSpec::linear(100)));
    frame(&runtime, 0);
    frame(&runtime, 50);

    let second = animatable.animateTo(0.0, AnimationType::Tween(AnimationSpec::linear(100)));
    assert_eq!(first.outcome(), Some(AnimationOutcome::Cancelled));
    assert!(!second.is_complete());

    frame(&runtime, 60);
    frame(&runtime, 160);
    assert_eq!(animatable.value(), 0.0);
    assert_eq!(second.outcome(), Some(AnimationOutcome::Finished));
}

#[test]
fn instant_and_near_target_moves_finish_immediately() {
    let runtime = test_runtime();
    let animatable = Animatable::new(5.0f32, runtime.handle());

    let same = animatable.animateTo(5.001, AnimationType::default());
    assert_eq!(same.outcome(), Some(AnimationOutcome::Finished));
    assert_eq!(animatable.value(), 5.001);

    let snap = animatable.animateTo(42.0, AnimationType::snap());
    assert_eq!(snap.outcome(), Some(AnimationOutcome::Finished));
    assert_eq!(animatable.value(), 42.0);
    assert!(!runtime.has_frame_callbacks());
}

#[test]
fn snap_cancels_running_animation() {
    let runtime = test_runtime();
    let animatable = Animatable::new(0.0f32, runtime.handle());
    let job = animatable.animateTo(100.0, AnimationType::default());

    animatable.snapTo(7.0);

    assert_eq!(job.outcome(), Some(AnimationOutcome::Cancelled));
    assert_eq!(animatable.value(), 7.0);
    assert_eq!(animatable.target(), 7.0);
    assert!(!animatable.is_running());
    frame(&runtime, 500);
    assert_eq!(animatable.value(), 7.0);
}

#[test]
fn job_cancel_stops_in_place() {
    let runtime = test_runtime();
    let animatable = Animatable::new(0.0f32, runtime.handle());
    let job = animatable.animateTo(100.0, AnimationType::Tween(AnimationSpec::linear(100)));
    frame(&runtime, 0);
    frame(&runtime, 25);
    let before = animatable.value();

    job.cancel();

    assert_eq!(job.outcome(), Some(AnimationOutcome::Cancelled));
    assert!(!animatable.is_running());
    frame(&runtime, 200);
    assert_eq!(animatable.value(), before);
}

#[test]
fn completion_listener_can_start_next_animation() {
    let runtime = test_runtime();
    let animatable = Animatable::new(0.0f32, runtime.handle());
    let chained = Rc::new(Cell::new(false));

    let job = animatable.animateTo(10.0, AnimationType::Tween(AnimationSpec::linear(10)));
    let follower = animatable.clone();
    let flag = Rc::clone(&chained);
    job.on_complete(move |outcome| {
        if outcome == AnimationOutcome::Finished {
            follower.snapTo(0.0);
            flag.set(true);
        }
    });

    frame(&runtime, 0);
    frame(&runtime, 10);

    assert!(chained.get());
    assert_eq!(animatable.value(), 0.0);
}

#[test]
fn spring_settles_on_target() {
    let runtime = test_runtime();
    let animatable = Animatable::new(0.0f32, runtime.handle());
    let job = animatable.animateTo(1.0, AnimationType::Spring(SpringSpec::default_spring()));

    let mut time = 0;
    while !job.is_complete() && time < 5_000 {
        frame(&runtime, time);
        time += 16;
    }

    assert_eq!(job.outcome(), Some(AnimationOutcome::Finished));
    assert_eq!(animatable.value(), 1.0);
}
