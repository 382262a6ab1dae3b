use revealswipe_ui_graphics::Point;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::OnceLock;
use web_time::Instant;

pub type PointerId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    Start,
    Move,
    End,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
}

/// Milliseconds since the first call in this process.
pub fn uptime_millis() -> i64 {
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    EPOCH.get_or_init(Instant::now).elapsed().as_millis() as i64
}

/// Pointer event with consumption tracking for gesture disambiguation.
///
/// `position` is local to the swipeable element. A handler that claims the
/// event (a drag past touch slop, say) consumes it so that sibling handlers,
/// such as a click on the content, do not act on the same stream.
#[derive(Clone, Debug)]
pub struct PointerEvent {
    pub id: PointerId,
    pub kind: PointerEventKind,
    pub phase: PointerPhase,
    pub position: Point,
    /// Event time in milliseconds, used for velocity tracking.
    pub uptime_millis: i64,
    /// Shared via `Rc<Cell>` so consumption is visible across copies.
    consumed: Rc<Cell<bool>>,
}

impl PointerEvent {
    /// Creates an event stamped with the current [`uptime_millis`].
    pub fn new(kind: PointerEventKind, position: Point) -> Self {
        Self {
            id: 0,
            kind,
            phase: match kind {
                PointerEventKind::Down => PointerPhase::Start,
                PointerEventKind::Move => PointerPhase::Move,
                PointerEventKind::Up => PointerPhase::End,
                PointerEventKind::Cancel => PointerPhase::Cancel,
            },
            position,
            uptime_millis: uptime_millis(),
            consumed: Rc::new(Cell::new(false)),
        }
    }

    pub fn down(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Down, Point::new(x, y))
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Move, Point::new(x, y))
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Up, Point::new(x, y))
    }

    pub fn cancel(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Cancel, Point::new(x, y))
    }

    /// Overrides the timestamp, for hosts with their own event clock and for tests.
    pub fn at_time(mut self, uptime_millis: i64) -> Self {
        self.uptime_millis = uptime_millis;
        self
    }

    pub fn with_id(mut self, id: PointerId) -> Self {
        self.id = id;
        self
    }

    /// Marks this event as consumed, preventing other handlers from processing it.
    pub fn consume(&self) {
        self.consumed.set(true);
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed.get()
    }

    /// Creates a copy with a new local position, sharing the consumption state.
    pub fn copy_with_local_position(&self, position: Point) -> Self {
        Self {
            id: self.id,
            kind: self.kind,
            phase: self.phase,
            position,
            uptime_millis: self.uptime_millis,
            consumed: self.consumed.clone(),
        }
    }
}
