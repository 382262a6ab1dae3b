/// Side of the card behind the content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BackgroundSide {
    /// Revealed by swiping toward the end (`FullyRevealedEnd`).
    Start,
    /// Revealed by swiping toward the start (`FullyRevealedStart`).
    End,
}

/// Custom action assistive technology can trigger instead of swiping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessibilityAction {
    pub side: BackgroundSide,
    pub label: String,
}
