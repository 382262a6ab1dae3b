//! Assertion helpers for robot tests.

use revealswipe::RevealSwipe;
use revealswipe_ui_graphics::Rect;

/// Assert that a value is within `tolerance` of the expected one.
pub fn assert_approx_eq(actual: f32, expected: f32, tolerance: f32, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{}: expected {} (±{}), got {} (diff: {})",
        msg,
        expected,
        tolerance,
        actual,
        diff
    );
}

pub fn assert_rect_approx_eq(actual: Rect, expected: Rect, tolerance: f32, msg: &str) {
    assert_approx_eq(actual.x, expected.x, tolerance, &format!("{} - x", msg));
    assert_approx_eq(actual.y, expected.y, tolerance, &format!("{} - y", msg));
    assert_approx_eq(
        actual.width,
        expected.width,
        tolerance,
        &format!("{} - width", msg),
    );
    assert_approx_eq(
        actual.height,
        expected.height,
        tolerance,
        &format!("{} - height", msg),
    );
}

/// Assert that the offset sits inside the anchor range, widened by the
/// rubber band allowance `slack`.
pub fn assert_offset_within_anchors(swipe: &RevealSwipe, slack: f32) {
    let anchors = swipe.state().anchors();
    let (Some(min), Some(max)) = (anchors.min_position(), anchors.max_position()) else {
        panic!("no anchors on {:?}", swipe.state());
    };
    let offset = swipe.state().offset();
    assert!(
        offset >= min - slack && offset <= max + slack,
        "offset {} outside [{}, {}] ± {}",
        offset,
        min,
        max,
        slack
    );
}
