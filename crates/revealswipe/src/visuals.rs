//! Visual factors derived from the offset: corner straightening and the
//! background fade. Hosts apply them when drawing; nothing here renders.

use revealswipe_animation::{Easing, Lerp};
use revealswipe_ui_graphics::{Color, CornerRadii};

use crate::{RevealDirection, RevealDirections};

/// Front-loaded fade: the background is mostly opaque halfway through a reveal.
pub const DEFAULT_ALPHA_EASING: Easing = Easing::cubic_bezier(0.4, 0.4, 0.17, 0.9);

/// How far each side's corners have straightened, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CornerFactors {
    pub start: f32,
    pub end: f32,
}

/// Everything a host needs to draw one frame of the component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealVisuals {
    /// Horizontal translation of the content in px, already mirrored for RTL.
    pub content_translation: f32,
    /// Corner radii of the content shape at this offset.
    pub content_corners: CornerRadii,
    /// Corner radii of the background card; these never animate.
    pub background_corners: CornerRadii,
    pub corner_factors: CornerFactors,
    pub background_alpha: f32,
    pub background_start_color: Color,
    pub background_end_color: Color,
    /// Whether a tap on the content should show press feedback. Taps that
    /// only close the reveal show none.
    pub content_indication: bool,
}

pub(crate) fn nan_to_zero(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

/// Corner straightening for `offset`.
///
/// Both sides divide by the larger end-side radius. A zero radius yields a
/// NaN or infinite ratio, which is coerced into `[0, 1]`. A side whose
/// direction is disabled never straightens.
pub fn corner_factors(offset: f32, radii: CornerRadii, directions: RevealDirections) -> CornerFactors {
    let min_drag_for_straight_corner = radii.top_end.max(radii.bottom_end);
    let factor = |signed: f32, direction| {
        if directions.contains(direction) {
            nan_to_zero(signed / min_drag_for_straight_corner).clamp(0.0, 1.0)
        } else {
            0.0
        }
    };
    CornerFactors {
        start: factor(offset, RevealDirection::StartToEnd),
        end: factor(-offset, RevealDirection::EndToStart),
    }
}

pub fn animated_corners(radii: CornerRadii, factors: CornerFactors) -> CornerRadii {
    CornerRadii {
        top_start: radii.top_start.lerp(&0.0, factors.start),
        bottom_start: radii.bottom_start.lerp(&0.0, factors.start),
        top_end: radii.top_end.lerp(&0.0, factors.end),
        bottom_end: radii.bottom_end.lerp(&0.0, factors.end),
    }
}

/// Background opacity for `offset`, eased by `easing`.
pub fn background_alpha(offset: f32, max_reveal_px: f32, easing: Easing) -> f32 {
    let dragged_ratio = nan_to_zero(offset.abs() / max_reveal_px.abs()).clamp(0.0, 1.0);
    easing.transform(dragged_ratio)
}

pub fn background_color(color: Color, alpha: f32, animate: bool) -> Color {
    if animate && (0.0..=1.0).contains(&alpha) {
        color.with_alpha(alpha)
    } else {
        color
    }
}
