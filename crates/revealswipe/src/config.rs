use std::fmt;
use std::rc::Rc;

use revealswipe_animation::AnimationType;
use revealswipe_foundation::{
    ConfirmValueChange, DraggableAnchors, PositionalThreshold, ResistanceConfig,
    VelocityThreshold, SETTLE_VELOCITY_THRESHOLD,
};
use revealswipe_ui_graphics::Dp;

use crate::{RevealDirection, RevealDirections, RevealValue};

/// Distance the content travels to fully reveal a background.
pub const DEFAULT_MAX_REVEAL: Dp = Dp(75.0);

/// Release speed above which a settle follows the swipe direction.
pub const DEFAULT_VELOCITY_THRESHOLD: Dp = Dp(SETTLE_VELOCITY_THRESHOLD);

/// Rejected configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RevealConfigError {
    /// The max reveal distance is zero, negative or not finite.
    InvalidMaxReveal { px: f32 },
    /// The display density is zero, negative or not finite.
    InvalidDensity { density: f32 },
}

impl fmt::Display for RevealConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevealConfigError::InvalidMaxReveal { px } => {
                write!(f, "max reveal distance must be positive and finite, got {px}px")
            }
            RevealConfigError::InvalidDensity { density } => {
                write!(f, "density must be positive and finite, got {density}")
            }
        }
    }
}

impl std::error::Error for RevealConfigError {}

/// Behavior of a [`RevealState`](crate::RevealState).
///
/// ```
/// use revealswipe::{RevealConfig, RevealDirection, RevealValue};
/// use revealswipe_ui_graphics::Dp;
///
/// let config = RevealConfig::default()
///     .with_max_reveal(Dp(96.0))
///     .with_directions(RevealDirection::EndToStart.into())
///     .with_confirm_value_change(|value| value != RevealValue::FullyRevealedEnd);
/// assert_eq!(config.max_reveal, Dp(96.0));
/// ```
#[derive(Clone)]
pub struct RevealConfig {
    pub max_reveal: Dp,
    pub directions: RevealDirections,
    pub initial_value: RevealValue,
    /// Travel, in px, past which a slow release settles on the far anchor.
    pub positional_threshold: PositionalThreshold,
    /// Release speed threshold in px/s; `None` means [`DEFAULT_VELOCITY_THRESHOLD`]
    /// at the current density.
    pub velocity_threshold: Option<VelocityThreshold>,
    pub animation: AnimationType,
    pub confirm_value_change: ConfirmValueChange<RevealValue>,
    /// Overrides the rubber band derived from the directions and max reveal.
    pub resistance: Option<ResistanceConfig>,
}

impl RevealConfig {
    pub fn with_max_reveal(mut self, max_reveal: Dp) -> Self {
        self.max_reveal = max_reveal;
        self
    }

    pub fn with_directions(mut self, directions: RevealDirections) -> Self {
        self.directions = directions;
        self
    }

    pub fn with_initial_value(mut self, initial_value: RevealValue) -> Self {
        self.initial_value = initial_value;
        self
    }

    pub fn with_positional_threshold(mut self, threshold: impl Fn(f32) -> f32 + 'static) -> Self {
        self.positional_threshold = Rc::new(threshold);
        self
    }

    pub fn with_velocity_threshold(mut self, threshold: impl Fn() -> f32 + 'static) -> Self {
        self.velocity_threshold = Some(Rc::new(threshold));
        self
    }

    pub fn with_animation(mut self, animation: AnimationType) -> Self {
        self.animation = animation;
        self
    }

    pub fn with_confirm_value_change(
        mut self,
        confirm: impl Fn(RevealValue) -> bool + 'static,
    ) -> Self {
        self.confirm_value_change = Rc::new(confirm);
        self
    }

    pub fn with_resistance(mut self, resistance: ResistanceConfig) -> Self {
        self.resistance = Some(resistance);
        self
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            max_reveal: DEFAULT_MAX_REVEAL,
            directions: RevealDirections::BOTH,
            initial_value: RevealValue::Default,
            positional_threshold: Rc::new(|distance| distance * 0.5),
            velocity_threshold: None,
            animation: AnimationType::default(),
            confirm_value_change: Rc::new(|_| true),
            resistance: None,
        }
    }
}

impl fmt::Debug for RevealConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevealConfig")
            .field("max_reveal", &self.max_reveal)
            .field("directions", &self.directions)
            .field("initial_value", &self.initial_value)
            .field("custom_velocity_threshold", &self.velocity_threshold.is_some())
            .field("animation", &self.animation)
            .field("resistance", &self.resistance)
            .finish_non_exhaustive()
    }
}

/// Anchors for the enabled directions: `Default` at 0, `FullyRevealedEnd` at
/// `+max_reveal_px` and `FullyRevealedStart` at `-max_reveal_px`.
pub fn resolve_anchors(
    directions: RevealDirections,
    max_reveal_px: f32,
) -> Result<DraggableAnchors<RevealValue>, RevealConfigError> {
    if !max_reveal_px.is_finite() || max_reveal_px <= 0.0 {
        return Err(RevealConfigError::InvalidMaxReveal { px: max_reveal_px });
    }
    let mut anchors = DraggableAnchors::new().with(RevealValue::Default, 0.0);
    if directions.contains(RevealDirection::StartToEnd) {
        anchors.insert(RevealValue::FullyRevealedEnd, max_reveal_px);
    }
    if directions.contains(RevealDirection::EndToStart) {
        anchors.insert(RevealValue::FullyRevealedStart, -max_reveal_px);
    }
    Ok(anchors)
}

/// Rubber band past the outer anchors: a quarter of the reveal distance of
/// give on an enabled side, next to none on a disabled one.
pub fn default_resistance(directions: RevealDirections, max_reveal_px: f32) -> ResistanceConfig {
    let factor = |direction| {
        if directions.contains(direction) {
            ResistanceConfig::SOFT_FACTOR
        } else {
            ResistanceConfig::STIFF_FACTOR
        }
    };
    ResistanceConfig::new(
        max_reveal_px / 4.0,
        factor(RevealDirection::EndToStart),
        factor(RevealDirection::StartToEnd),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_follow_directions() {
        let both = resolve_anchors(RevealDirections::BOTH, 150.0).unwrap();
        assert_eq!(
            both.iter().collect::<Vec<_>>(),
            vec![
                (RevealValue::FullyRevealedStart, -150.0),
                (RevealValue::Default, 0.0),
                (RevealValue::FullyRevealedEnd, 150.0),
            ]
        );

        let end_only = resolve_anchors(RevealDirections::END_TO_START, 75.0).unwrap();
        assert!(end_only.has_anchor_for(RevealValue::FullyRevealedStart));
        assert!(!end_only.has_anchor_for(RevealValue::FullyRevealedEnd));

        let none = resolve_anchors(RevealDirections::NONE, 75.0).unwrap();
        assert_eq!(none.len(), 1);
        assert_eq!(none.position_of(RevealValue::Default), Some(0.0));
    }

    #[test]
    fn rejects_non_positive_distance() {
        for px in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let error = resolve_anchors(RevealDirections::BOTH, px).unwrap_err();
            assert!(matches!(error, RevealConfigError::InvalidMaxReveal { .. }));
        }
        assert_eq!(
            RevealConfigError::InvalidMaxReveal { px: -2.0 }.to_string(),
            "max reveal distance must be positive and finite, got -2px"
        );
    }

    #[test]
    fn resistance_is_stiff_on_disabled_side() {
        let resistance = default_resistance(RevealDirections::START_TO_END, 100.0);
        assert_eq!(resistance.basis, 25.0);
        assert_eq!(resistance.factor_at_max, ResistanceConfig::SOFT_FACTOR);
        assert_eq!(resistance.factor_at_min, ResistanceConfig::STIFF_FACTOR);
    }
}
