use smallvec::SmallVec;
use std::fmt;

/// Named positions a drag can settle at, sorted by position.
///
/// Each value has at most one position. Inserting a value again moves it.
#[derive(Clone, PartialEq)]
pub struct DraggableAnchors<T> {
    entries: SmallVec<[(T, f32); 3]>,
}

impl<T: Copy + PartialEq> DraggableAnchors<T> {
    pub fn new() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }

    /// Builder-style [`DraggableAnchors::insert`].
    pub fn with(mut self, value: T, position: f32) -> Self {
        self.insert(value, position);
        self
    }

    pub fn insert(&mut self, value: T, position: f32) {
        self.entries.retain(|(existing, _)| *existing != value);
        let index = self
            .entries
            .iter()
            .position(|(_, other)| *other > position)
            .unwrap_or(self.entries.len());
        self.entries.insert(index, (value, position));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position_of(&self, value: T) -> Option<f32> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == value)
            .map(|(_, position)| *position)
    }

    pub fn has_anchor_for(&self, value: T) -> bool {
        self.position_of(value).is_some()
    }

    pub fn min_position(&self) -> Option<f32> {
        self.entries.first().map(|(_, position)| *position)
    }

    pub fn max_position(&self) -> Option<f32> {
        self.entries.last().map(|(_, position)| *position)
    }

    /// The anchor nearest to `position`; ties go to the lower one.
    pub fn closest_anchor(&self, position: f32) -> Option<T> {
        self.entries
            .iter()
            .min_by(|(_, a), (_, b)| {
                (a - position)
                    .abs()
                    .partial_cmp(&(b - position).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(value, _)| *value)
    }

    /// The anchors at or just below and at or just above `position`.
    ///
    /// Both sides are the same anchor when `position` sits on an anchor or
    /// lies outside the anchor range.
    pub fn bracketing(&self, position: f32) -> Option<((T, f32), (T, f32))> {
        let first = *self.entries.first()?;
        let last = *self.entries.last()?;
        if position <= first.1 {
            return Some((first, first));
        }
        if position >= last.1 {
            return Some((last, last));
        }
        let upper_index = self
            .entries
            .iter()
            .position(|(_, anchor)| *anchor >= position)?;
        let upper = self.entries[upper_index];
        if upper.1 == position {
            return Some((upper, upper));
        }
        Some((self.entries[upper_index - 1], upper))
    }

    pub fn iter(&self) -> impl Iterator<Item = (T, f32)> + '_ {
        self.entries.iter().copied()
    }
}

impl<T: Copy + PartialEq> Default for DraggableAnchors<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + PartialEq> FromIterator<(T, f32)> for DraggableAnchors<T> {
    fn from_iter<I: IntoIterator<Item = (T, f32)>>(iter: I) -> Self {
        let mut anchors = Self::new();
        for (value, position) in iter {
            anchors.insert(value, position);
        }
        anchors
    }
}

impl<T: fmt::Debug> fmt::Debug for DraggableAnchors<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(value, position)| (value, position)))
            .finish()
    }
}
