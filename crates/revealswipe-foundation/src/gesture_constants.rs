//! Shared gesture constants for consistent touch/pointer handling.
//!
//! Values are in logical pixels. Callers working in physical pixels scale
//! them by the display density first.

/// Drag threshold in logical pixels.
///
/// A press that moves further than this from its down position stops being a
/// tap candidate and becomes a drag. Matches Android's `TOUCH_SLOP` of ~8dp.
pub const DRAG_THRESHOLD: f32 = 8.0;

/// Maximum fling velocity in logical pixels per second.
pub const MAX_FLING_VELOCITY: f32 = 8_000.0;

/// Release velocity, in logical pixels per second, above which a settle
/// follows the direction of motion instead of the positional threshold.
pub const SETTLE_VELOCITY_THRESHOLD: f32 = 100.0;
