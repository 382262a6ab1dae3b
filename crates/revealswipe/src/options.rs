use std::fmt;

use revealswipe_animation::Easing;
use revealswipe_ui_graphics::{Color, LayoutDirection, RoundedCornerShape};

use crate::visuals::DEFAULT_ALPHA_EASING;

/// Default start background, Material 3 baseline tertiary container.
pub const DEFAULT_BACKGROUND_START_COLOR: Color = Color::from_argb(0xFFFFD8E4);
/// Default end background, Material 3 baseline secondary container.
pub const DEFAULT_BACKGROUND_END_COLOR: Color = Color::from_argb(0xFFE8DEF8);

/// Presentation and click behavior of a [`RevealSwipe`](crate::RevealSwipe).
#[derive(Clone, Debug, PartialEq)]
pub struct RevealSwipeOptions {
    /// Without swipe the content only takes clicks and no accessibility
    /// actions are exposed.
    pub enable_swipe: bool,
    pub close_on_content_click: bool,
    pub close_on_background_click: bool,
    /// Fade background colors in with the reveal progress.
    pub animate_background_color: bool,
    pub layout_direction: LayoutDirection,
    pub shape: RoundedCornerShape,
    pub alpha_easing: Easing,
    pub background_start_color: Color,
    pub background_end_color: Color,
    pub background_start_action_label: Option<String>,
    pub background_end_action_label: Option<String>,
}

impl RevealSwipeOptions {
    pub fn with_enable_swipe(mut self, enable_swipe: bool) -> Self {
        self.enable_swipe = enable_swipe;
        self
    }

    pub fn with_close_on_content_click(mut self, close: bool) -> Self {
        self.close_on_content_click = close;
        self
    }

    pub fn with_close_on_background_click(mut self, close: bool) -> Self {
        self.close_on_background_click = close;
        self
    }

    pub fn with_animate_background_color(mut self, animate: bool) -> Self {
        self.animate_background_color = animate;
        self
    }

    pub fn with_layout_direction(mut self, layout_direction: LayoutDirection) -> Self {
        self.layout_direction = layout_direction;
        self
    }

    pub fn with_shape(mut self, shape: RoundedCornerShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_alpha_easing(mut self, easing: Easing) -> Self {
        self.alpha_easing = easing;
        self
    }

    pub fn with_background_colors(mut self, start: Color, end: Color) -> Self {
        self.background_start_color = start;
        self.background_end_color = end;
        self
    }

    pub fn with_start_action_label(mut self, label: impl Into<String>) -> Self {
        self.background_start_action_label = Some(label.into());
        self
    }

    pub fn with_end_action_label(mut self, label: impl Into<String>) -> Self {
        self.background_end_action_label = Some(label.into());
        self
    }
}

impl Default for RevealSwipeOptions {
    fn default() -> Self {
        Self {
            enable_swipe: true,
            close_on_content_click: true,
            close_on_background_click: true,
            animate_background_color: true,
            layout_direction: LayoutDirection::Ltr,
            shape: RoundedCornerShape::default(),
            alpha_easing: DEFAULT_ALPHA_EASING,
            background_start_color: DEFAULT_BACKGROUND_START_COLOR,
            background_end_color: DEFAULT_BACKGROUND_END_COLOR,
            background_start_action_label: None,
            background_end_action_label: None,
        }
    }
}

type ClickHandler = Box<dyn FnMut()>;
type BackgroundClickHandler = Box<dyn FnMut() -> bool>;

/// Named callback slots.
///
/// Background callbacks return whether the default close may happen;
/// `false` keeps the reveal open.
pub struct RevealCallbacks {
    pub on_content_click: Option<ClickHandler>,
    pub on_background_start_click: BackgroundClickHandler,
    pub on_background_end_click: BackgroundClickHandler,
}

impl RevealCallbacks {
    pub fn on_content_click(mut self, handler: impl FnMut() + 'static) -> Self {
        self.on_content_click = Some(Box::new(handler));
        self
    }

    pub fn on_background_start_click(mut self, handler: impl FnMut() -> bool + 'static) -> Self {
        self.on_background_start_click = Box::new(handler);
        self
    }

    pub fn on_background_end_click(mut self, handler: impl FnMut() -> bool + 'static) -> Self {
        self.on_background_end_click = Box::new(handler);
        self
    }
}

impl Default for RevealCallbacks {
    fn default() -> Self {
        Self {
            on_content_click: None,
            on_background_start_click: Box::new(|| true),
            on_background_end_click: Box::new(|| true),
        }
    }
}

impl fmt::Debug for RevealCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevealCallbacks")
            .field("on_content_click", &self.on_content_click.is_some())
            .finish_non_exhaustive()
    }
}
