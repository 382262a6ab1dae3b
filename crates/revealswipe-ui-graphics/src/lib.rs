//! Pure math/data for RevealSwipe
//!
//! Geometry primitives, colors and unit types shared by the gesture and
//! component crates. Nothing in here knows about gestures or animation.

mod color;
mod geometry;
mod unit;

pub use color::*;
pub use geometry::*;
pub use unit::*;

pub mod prelude {
    pub use crate::color::Color;
    pub use crate::geometry::{CornerRadii, LayoutDirection, Point, Rect, RoundedCornerShape, Size};
    pub use crate::unit::Dp;
}
