use std::cell::Cell;
use std::rc::Rc;

use revealswipe_animation::{AnimationJob, AnimationType};
use revealswipe_core::{RuntimeHandle, State, Subscription};
use revealswipe_foundation::{
    AnchoredDraggableState, DragPhase, DraggableAnchors, ResistanceConfig,
};
use revealswipe_ui_graphics::Dp;

use crate::config::{default_resistance, resolve_anchors, DEFAULT_VELOCITY_THRESHOLD};
use crate::{RevealConfig, RevealConfigError, RevealDirections, RevealValue};

/// Geometry inputs the anchors are derived from.
struct Geometry {
    max_reveal: Cell<Dp>,
    density: Cell<f32>,
    directions: RevealDirections,
    resistance_override: Option<ResistanceConfig>,
}

impl Geometry {
    fn max_reveal_px(&self) -> f32 {
        self.max_reveal.get().to_px(self.density.get())
    }

    fn resistance(&self, max_reveal_px: f32) -> ResistanceConfig {
        self.resistance_override
            .unwrap_or_else(|| default_resistance(self.directions, max_reveal_px))
    }
}

/// Offset and discrete value of one swipeable card.
///
/// The offset is published, never assigned: it only changes through a drag
/// session, a settle, [`RevealState::reset`] or [`RevealState::reset_fast`].
/// Clones share the same state.
#[derive(Clone)]
pub struct RevealState {
    draggable: AnchoredDraggableState<RevealValue>,
    geometry: Rc<Geometry>,
}

impl RevealState {
    /// Builds the state for `density` physical px per dp.
    pub fn new(
        config: RevealConfig,
        density: f32,
        runtime: RuntimeHandle,
    ) -> Result<Self, RevealConfigError> {
        validate_density(density)?;
        let geometry = Rc::new(Geometry {
            max_reveal: Cell::new(config.max_reveal),
            density: Cell::new(density),
            directions: config.directions,
            resistance_override: config.resistance,
        });
        let max_reveal_px = geometry.max_reveal_px();
        let anchors = resolve_anchors(config.directions, max_reveal_px)?;

        let velocity_threshold = match config.velocity_threshold {
            Some(threshold) => threshold,
            None => {
                let geometry = Rc::downgrade(&geometry);
                Rc::new(move || {
                    let density = geometry.upgrade().map_or(1.0, |g| g.density.get());
                    DEFAULT_VELOCITY_THRESHOLD.to_px(density)
                })
            }
        };
        let positional_threshold = config.positional_threshold;
        let confirm_value_change = config.confirm_value_change;

        let draggable = AnchoredDraggableState::new(config.initial_value, anchors, runtime)
            .with_positional_threshold(move |distance| positional_threshold(distance))
            .with_velocity_threshold(move || velocity_threshold())
            .with_confirm_value_change(move |value| confirm_value_change(value))
            .with_animation(config.animation)
            .with_resistance(geometry.resistance(max_reveal_px));

        log::debug!(
            "reveal state created: {:?} at {max_reveal_px}px, initial {:?}",
            config.directions,
            draggable.current_value()
        );
        Ok(Self {
            draggable,
            geometry,
        })
    }

    /// Animates back to [`RevealValue::Default`].
    pub fn reset(&self) -> AnimationJob {
        self.draggable.animate_to(RevealValue::Default)
    }

    /// Jumps to [`RevealValue::Default`]. The offset reads 0 as soon as this
    /// returns and the job is already finished.
    pub fn reset_fast(&self) -> AnimationJob {
        self.draggable
            .animate_to_with(RevealValue::Default, AnimationType::snap())
    }

    pub fn offset(&self) -> f32 {
        self.draggable.offset()
    }

    pub fn current_value(&self) -> RevealValue {
        self.draggable.current_value()
    }

    /// Where the state is heading: the animation target, the value a slow
    /// release would settle on during a drag, or the current value.
    pub fn target_value(&self) -> RevealValue {
        self.draggable.target_value()
    }

    pub fn is_animation_running(&self) -> bool {
        self.draggable.is_animation_running()
    }

    pub fn is_dragging(&self) -> bool {
        self.draggable.is_dragging()
    }

    pub fn phase(&self) -> DragPhase {
        self.draggable.phase()
    }

    pub fn offset_state(&self) -> State<f32> {
        self.draggable.offset_state()
    }

    pub fn value_state(&self) -> State<RevealValue> {
        self.draggable.current_value_state()
    }

    pub fn subscribe_offset(&self, observer: impl Fn(&f32) + 'static) -> Subscription {
        self.draggable.subscribe_offset(observer)
    }

    pub fn subscribe_value(&self, observer: impl Fn(&RevealValue) + 'static) -> Subscription {
        self.draggable.subscribe_value(observer)
    }

    pub fn directions(&self) -> RevealDirections {
        self.geometry.directions
    }

    pub fn max_reveal(&self) -> Dp {
        self.geometry.max_reveal.get()
    }

    pub fn density(&self) -> f32 {
        self.geometry.density.get()
    }

    pub fn max_reveal_px(&self) -> f32 {
        self.geometry.max_reveal_px()
    }

    pub fn anchors(&self) -> DraggableAnchors<RevealValue> {
        self.draggable.anchors()
    }

    /// Recomputes the anchors for a new display density.
    pub fn set_density(&self, density: f32) -> Result<(), RevealConfigError> {
        validate_density(density)?;
        let previous = self.geometry.density.replace(density);
        if let Err(error) = self.refresh_anchors() {
            self.geometry.density.set(previous);
            return Err(error);
        }
        Ok(())
    }

    /// Recomputes the anchors for a new max reveal distance.
    pub fn set_max_reveal(&self, max_reveal: Dp) -> Result<(), RevealConfigError> {
        let previous = self.geometry.max_reveal.replace(max_reveal);
        if let Err(error) = self.refresh_anchors() {
            self.geometry.max_reveal.set(previous);
            return Err(error);
        }
        Ok(())
    }

    fn refresh_anchors(&self) -> Result<(), RevealConfigError> {
        let max_reveal_px = self.geometry.max_reveal_px();
        let anchors = resolve_anchors(self.geometry.directions, max_reveal_px)?;
        log::debug!("reveal anchors now at {max_reveal_px}px");
        self.draggable
            .update_anchors(anchors, Some(self.geometry.resistance(max_reveal_px)));
        Ok(())
    }

    pub(crate) fn start_drag(&self) {
        self.draggable.start_drag();
    }

    pub(crate) fn drag_by(&self, delta: f32) -> f32 {
        self.draggable.dispatch_raw_delta(delta)
    }

    pub(crate) fn settle(&self, velocity: f32) -> AnimationJob {
        self.draggable.settle(velocity)
    }
}

impl std::fmt::Debug for RevealState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealState")
            .field("offset", &self.offset())
            .field("current_value", &self.current_value())
            .field("phase", &self.phase())
            .field("directions", &self.directions())
            .finish()
    }
}

fn validate_density(density: f32) -> Result<(), RevealConfigError> {
    if density.is_finite() && density > 0.0 {
        Ok(())
    } else {
        Err(RevealConfigError::InvalidDensity { density })
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
