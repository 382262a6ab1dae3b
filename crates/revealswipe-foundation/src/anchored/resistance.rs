/// Rubber-band transform for drags past the outermost anchors.
///
/// Overflow `e` beyond a bound is compressed to `basis * factor * e / (e + basis)`,
/// which starts with slope `factor` and approaches `basis * factor`
/// asymptotically. Each side has its own factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResistanceConfig {
    /// Overflow distance, in px, at which half of the bound is reached.
    pub basis: f32,
    /// Factor past the lowest anchor.
    pub factor_at_min: f32,
    /// Factor past the highest anchor.
    pub factor_at_max: f32,
}

impl ResistanceConfig {
    /// Factor for an enabled side: slope 1 at the anchor, bounded at `basis`.
    pub const SOFT_FACTOR: f32 = 1.0;
    /// Factor for a side that should barely move.
    pub const STIFF_FACTOR: f32 = 0.01;

    pub const fn new(basis: f32, factor_at_min: f32, factor_at_max: f32) -> Self {
        Self {
            basis,
            factor_at_min,
            factor_at_max,
        }
    }

    /// No overflow at all.
    pub const fn hard_clamp() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Compressed overflow for a signed raw overflow (negative past the min bound).
    pub fn compute_resistance(&self, overflow: f32) -> f32 {
        if overflow == 0.0 || !overflow.is_finite() || self.basis <= 0.0 {
            return 0.0;
        }
        let factor = if overflow > 0.0 {
            self.factor_at_max
        } else {
            self.factor_at_min
        };
        let extent = overflow.abs();
        let compressed = self.basis * factor.max(0.0) * extent / (extent + self.basis);
        compressed.copysign(overflow)
    }

    /// Maps an unresisted drag position onto the visible offset.
    pub fn apply(&self, raw: f32, min: f32, max: f32) -> f32 {
        if raw > max {
            max + self.compute_resistance(raw - max)
        } else if raw < min {
            min + self.compute_resistance(raw - min)
        } else {
            raw
        }
    }

    /// Inverse of [`ResistanceConfig::apply`], so a drag can resume from an
    /// offset that is already in the overflow region.
    pub fn unapply(&self, offset: f32, min: f32, max: f32) -> f32 {
        if offset > max {
            max + self.invert(offset - max, self.factor_at_max)
        } else if offset < min {
            min - self.invert(min - offset, self.factor_at_min)
        } else {
            offset
        }
    }

    fn invert(&self, compressed: f32, factor: f32) -> f32 {
        let bound = self.basis * factor;
        if bound <= 0.0 {
            return 0.0;
        }
        // Offsets at or past the bound are unreachable; pin them just inside.
        let compressed = compressed.min(bound * 0.999);
        compressed * self.basis / (bound - compressed)
    }
}

impl Default for ResistanceConfig {
    fn default() -> Self {
        Self::hard_clamp()
    }
}
