use std::fmt;

/// Direction in which the content can be swiped away.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RevealDirection {
    /// Swiping in the reading direction; reveals the start background.
    StartToEnd,
    /// Swiping against the reading direction; reveals the end background.
    EndToStart,
}

impl RevealDirection {
    const fn bit(self) -> u8 {
        match self {
            RevealDirection::StartToEnd => 1,
            RevealDirection::EndToStart => 1 << 1,
        }
    }
}

/// Set of enabled [`RevealDirection`]s.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RevealDirections(u8);

impl RevealDirections {
    pub const NONE: Self = Self(0);
    pub const START_TO_END: Self = Self(RevealDirection::StartToEnd.bit());
    pub const END_TO_START: Self = Self(RevealDirection::EndToStart.bit());
    pub const BOTH: Self = Self(Self::START_TO_END.0 | Self::END_TO_START.0);

    pub fn with(mut self, direction: RevealDirection) -> Self {
        self.insert(direction);
        self
    }

    pub fn insert(&mut self, direction: RevealDirection) {
        self.0 |= direction.bit();
    }

    pub fn remove(&mut self, direction: RevealDirection) {
        self.0 &= !direction.bit();
    }

    pub fn contains(&self, direction: RevealDirection) -> bool {
        self.0 & direction.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = RevealDirection> + '_ {
        [RevealDirection::StartToEnd, RevealDirection::EndToStart]
            .into_iter()
            .filter(move |direction| self.contains(*direction))
    }
}

impl Default for RevealDirections {
    fn default() -> Self {
        Self::BOTH
    }
}

impl From<RevealDirection> for RevealDirections {
    fn from(direction: RevealDirection) -> Self {
        Self::NONE.with(direction)
    }
}

impl FromIterator<RevealDirection> for RevealDirections {
    fn from_iter<I: IntoIterator<Item = RevealDirection>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}

impl fmt::Debug for RevealDirections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
