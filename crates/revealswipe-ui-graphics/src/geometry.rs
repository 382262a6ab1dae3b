//! Geometric primitives: Point, Size, Rect and corner shapes

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: size.width,
            height: size.height,
        }
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            width: self.width,
            height: self.height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && y >= self.y && x <= self.x + self.width && y <= self.y + self.height
    }
}

/// Reading direction of the host layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayoutDirection {
    #[default]
    Ltr,
    Rtl,
}

/// Corner radii in pixels, named relative to the reading direction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CornerRadii {
    pub top_start: f32,
    pub top_end: f32,
    pub bottom_end: f32,
    pub bottom_start: f32,
}

impl CornerRadii {
    pub fn uniform(radius: f32) -> Self {
        Self {
            top_start: radius,
            top_end: radius,
            bottom_end: radius,
            bottom_start: radius,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundedCornerShape {
    radii: CornerRadii,
}

impl RoundedCornerShape {
    pub fn new(top_start: f32, top_end: f32, bottom_end: f32, bottom_start: f32) -> Self {
        Self {
            radii: CornerRadii {
                top_start,
                top_end,
                bottom_end,
                bottom_start,
            },
        }
    }

    pub fn uniform(radius: f32) -> Self {
        Self {
            radii: CornerRadii::uniform(radius),
        }
    }

    pub fn with_radii(radii: CornerRadii) -> Self {
        Self { radii }
    }

    /// Radii clamped so no corner exceeds half of either side of `size`.
    pub fn resolve(&self, size: Size) -> CornerRadii {
        let mut resolved = self.radii;
        let max_width = (size.width / 2.0).max(0.0);
        let max_height = (size.height / 2.0).max(0.0);
        resolved.top_start = resolved.top_start.clamp(0.0, max_width).min(max_height);
        resolved.top_end = resolved.top_end.clamp(0.0, max_width).min(max_height);
        resolved.bottom_end = resolved.bottom_end.clamp(0.0, max_width).min(max_height);
        resolved.bottom_start = resolved.bottom_start.clamp(0.0, max_width).min(max_height);
        resolved
    }

    pub fn radii(&self) -> CornerRadii {
        self.radii
    }
}

impl Default for RoundedCornerShape {
    /// Medium rounded corners, 12 logical px.
    fn default() -> Self {
        Self::uniform(12.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_clamps_to_half_of_smaller_side() {
        let shape = RoundedCornerShape::uniform(40.0);
        let radii = shape.resolve(Size::new(200.0, 50.0));
        assert_eq!(radii, CornerRadii::uniform(25.0));
    }

    #[test]
    fn resolve_on_empty_size_yields_zero() {
        let radii = RoundedCornerShape::default().resolve(Size::ZERO);
        assert_eq!(radii, CornerRadii::uniform(0.0));
    }

    #[test]
    fn rect_contains_edges() {
        let rect = Rect::new(10.0, 0.0, 20.0, 10.0);
        assert!(rect.contains(10.0, 0.0));
        assert!(rect.contains(30.0, 10.0));
        assert!(!rect.contains(30.1, 5.0));
        assert_eq!(rect.translate(5.0, 0.0).right(), 35.0);
    }
}
