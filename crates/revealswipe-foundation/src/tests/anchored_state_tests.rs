use super::*;
use revealswipe_animation::AnimationSpec;
use revealswipe_core::{DefaultScheduler, Runtime};
use std::cell::Cell;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Position {
    Closed,
    Left,
    Right,
}

fn runtime() -> Runtime {
    Runtime::new(Arc::new(DefaultScheduler::new()))
}

fn anchors() -> DraggableAnchors<Position> {
    DraggableAnchors::new()
        .with(Position::Left, -100.0)
        .with(Position::Closed, 0.0)
        .with(Position::Right, 100.0)
}

fn state(runtime: &Runtime) -> AnchoredDraggableState<Position> {
    AnchoredDraggableState::new(Position::Closed, anchors(), runtime.handle())
        .with_animation(AnimationType::Tween(AnimationSpec::linear(100)))
        .with_resistance(ResistanceConfig::new(25.0, 1.0, 1.0))
}

/// Runs frames 16ms apart until no animation asks for another one.
fn run_frames(runtime: &Runtime) {
    let mut time = 0;
    while runtime.has_frame_callbacks() && time < 10_000 {
        runtime.drain_frame_callbacks(time * 1_000_000);
        time += 16;
    }
}

#[test]
fn drag_moves_offset_one_to_one_inside_range() {
    let runtime = runtime();
    let state = state(&runtime);

    state.start_drag();
    assert_eq!(state.dispatch_raw_delta(30.0), 30.0);
    assert_eq!(state.dispatch_raw_delta(-10.0), -10.0);

    assert_eq!(state.offset(), 20.0);
    assert_eq!(state.phase(), DragPhase::Dragging);
    assert_eq!(state.target_value(), Position::Closed);
    state.dispatch_raw_delta(40.0);
    assert_eq!(state.target_value(), Position::Right);
}

#[test]
fn slow_release_uses_half_distance_threshold() {
    let runtime = runtime();
    let state = state(&runtime);

    state.dispatch_raw_delta(40.0);
    state.settle(0.0);
    assert_eq!(state.target_value(), Position::Closed);
    run_frames(&runtime);
    assert_eq!(state.offset(), 0.0);
    assert_eq!(state.current_value(), Position::Closed);

    state.dispatch_raw_delta(-60.0);
    state.settle(0.0);
    run_frames(&runtime);
    assert_eq!(state.current_value(), Position::Left);
    assert_eq!(state.offset(), -100.0);
}

#[test]
fn threshold_is_measured_from_current_value_side() {
    let runtime = runtime();
    let state = state(&runtime);
    state.snap_to(Position::Right);

    // 30px back from Right is not enough to close.
    state.dispatch_raw_delta(-30.0);
    assert_eq!(state.compute_target(state.offset(), 0.0), Position::Right);
    state.dispatch_raw_delta(-30.0);
    assert_eq!(state.compute_target(state.offset(), 0.0), Position::Closed);
}

#[test]
fn fast_release_follows_direction_of_motion() {
    let runtime = runtime();
    let state = state(&runtime);

    state.dispatch_raw_delta(10.0);
    state.settle(2_000.0);
    run_frames(&runtime);
    assert_eq!(state.current_value(), Position::Right);

    state.dispatch_raw_delta(-5.0);
    state.settle(-2_000.0);
    run_frames(&runtime);
    assert_eq!(state.current_value(), Position::Closed);
}

#[test]
fn overflow_is_resisted_and_settles_on_outer_anchor() {
    let runtime = runtime();
    let state = state(&runtime);

    state.dispatch_raw_delta(400.0);
    let offset = state.offset();
    assert!(offset > 100.0 && offset < 125.0, "offset {offset}");

    let job = state.settle(0.0);
    assert_eq!(state.target_value(), Position::Right);
    run_frames(&runtime);
    assert_eq!(job.outcome(), Some(AnimationOutcome::Finished));
    assert_eq!(state.offset(), 100.0);
    assert_eq!(state.current_value(), Position::Right);
}

#[test]
fn stiff_side_stays_near_anchor() {
    let runtime = runtime();
    let state = AnchoredDraggableState::new(
        Position::Closed,
        DraggableAnchors::new()
            .with(Position::Closed, 0.0)
            .with(Position::Right, 100.0),
        runtime.handle(),
    )
    .with_resistance(ResistanceConfig::new(
        25.0,
        ResistanceConfig::STIFF_FACTOR,
        1.0,
    ));

    for _ in 0..50 {
        state.dispatch_raw_delta(-1_000.0);
    }
    assert!(state.offset() <= 0.0 && state.offset() > -0.25);
    state.settle(-8_000.0);
    assert_eq!(state.target_value(), Position::Closed);
}

#[test]
fn veto_keeps_current_value() {
    let runtime = runtime();
    let asked = Rc::new(Cell::new(0));
    let counter = Rc::clone(&asked);
    let state = state(&runtime).with_confirm_value_change(move |_| {
        counter.set(counter.get() + 1);
        false
    });

    state.dispatch_raw_delta(90.0);
    state.settle(5_000.0);
    run_frames(&runtime);

    assert_eq!(asked.get(), 1);
    assert_eq!(state.current_value(), Position::Closed);
    assert_eq!(state.offset(), 0.0);
}

#[test]
fn drag_supersedes_running_animation() {
    let runtime = runtime();
    let state = state(&runtime);
    let job = state.animate_to(Position::Right);
    runtime.drain_frame_callbacks(0);
    runtime.drain_frame_callbacks(50_000_000);
    let halfway = state.offset();
    assert!(halfway > 0.0 && halfway < 100.0);

    state.start_drag();
    assert_eq!(job.outcome(), Some(AnimationOutcome::Cancelled));
    assert_eq!(state.current_value(), Position::Closed);
    assert_eq!(state.offset(), halfway);

    state.dispatch_raw_delta(5.0);
    assert_eq!(state.offset(), halfway + 5.0);
}

#[test]
fn settle_always_lands_on_an_anchor() {
    let runtime = runtime();
    let state = state(&runtime);
    let positions = [-500.0, -100.0, -51.0, -49.0, -0.5, 0.0, 12.0, 50.0, 99.0, 250.0];
    let velocities = [-3_000.0, -50.0, 0.0, 50.0, 3_000.0];

    for raw in positions {
        for velocity in velocities {
            state.snap_to(Position::Closed);
            state.dispatch_raw_delta(raw);
            state.settle(velocity);
            run_frames(&runtime);
            let value = state.current_value();
            assert_eq!(
                anchors().position_of(value),
                Some(state.offset()),
                "raw {raw} velocity {velocity}"
            );
        }
    }
}

#[test]
fn zero_duration_animation_finishes_immediately() {
    let runtime = runtime();
    let state = state(&runtime);
    state.dispatch_raw_delta(70.0);

    let job = state.animate_to_with(Position::Closed, AnimationType::snap());

    assert_eq!(job.outcome(), Some(AnimationOutcome::Finished));
    assert_eq!(state.offset(), 0.0);
    assert_eq!(state.phase(), DragPhase::Idle);
    assert!(!runtime.has_frame_callbacks());
}

#[test]
fn observers_see_offset_and_value_changes() {
    let runtime = runtime();
    let state = state(&runtime);
    let offsets = Rc::new(RefCell::new(Vec::new()));
    let values = Rc::new(RefCell::new(Vec::new()));
    let offset_sink = Rc::clone(&offsets);
    let value_sink = Rc::clone(&values);
    let reader = state.clone();
    let _offset_sub = state.subscribe_offset(move |offset| {
        assert_eq!(reader.offset(), *offset);
        offset_sink.borrow_mut().push(*offset);
    });
    let _value_sub = state.subscribe_value(move |value| value_sink.borrow_mut().push(*value));

    state.dispatch_raw_delta(80.0);
    state.settle(0.0);
    run_frames(&runtime);

    assert_eq!(offsets.borrow().first(), Some(&80.0));
    assert_eq!(offsets.borrow().last(), Some(&100.0));
    assert_eq!(*values.borrow(), vec![Position::Right]);
}

#[test]
fn update_anchors_moves_idle_state() {
    let runtime = runtime();
    let state = state(&runtime);
    state.snap_to(Position::Right);

    state.update_anchors(
        DraggableAnchors::new()
            .with(Position::Closed, 0.0)
            .with(Position::Right, 150.0),
        None,
    );
    assert_eq!(state.offset(), 150.0);

    state.update_anchors(DraggableAnchors::new().with(Position::Closed, 0.0), None);
    assert_eq!(state.offset(), 0.0);
    assert_eq!(state.current_value(), Position::Closed);
}

#[test]
fn initial_value_without_anchor_falls_back() {
    let runtime = runtime();
    let state = AnchoredDraggableState::new(
        Position::Left,
        DraggableAnchors::new()
            .with(Position::Closed, 0.0)
            .with(Position::Right, 100.0),
        runtime.handle(),
    );
    assert_eq!(state.current_value(), Position::Closed);
    assert_eq!(state.offset(), 0.0);
}
