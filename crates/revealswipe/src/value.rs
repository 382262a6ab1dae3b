/// Discrete positions of a [`RevealState`](crate::RevealState).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RevealValue {
    /// Not revealed; offset 0.
    #[default]
    Default,
    /// Content moved toward the end, start background fully revealed.
    FullyRevealedEnd,
    /// Content moved toward the start, end background fully revealed.
    FullyRevealedStart,
}

impl RevealValue {
    pub fn is_revealed(&self) -> bool {
        *self != RevealValue::Default
    }
}
