use crate::grid::Direction;

/// Minimum displacement (in input units) for a drag to count as a swipe.
pub const SWIPE_THRESHOLD: f32 = 30.0;

/// One-slot direction buffer shared by every input source.
///
/// Keyboard, D-pad and swipe all funnel into [`InputBuffer::set_intent`]. The
/// last accepted intent before a tick wins; the tick takes it with
/// [`InputBuffer::consume`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InputBuffer {
    current: Direction,
    pending: Direction,
}

impl InputBuffer {
    pub fn new(initial: Direction) -> Self {
        Self { current: initial, pending: initial }
    }

    /// Buffers `dir` unless it reverses the direction in effect this tick.
    /// Returns whether the intent was accepted.
    pub fn set_intent(&mut self, dir: Direction) -> bool {
        if dir.is_opposite(self.current) {
            return false;
        }
        self.pending = dir;
        true
    }

    pub fn consume(&mut self) -> Direction {
        self.current = self.pending;
        self.current
    }

    pub fn current(&self) -> Direction {
        self.current
    }

    pub fn pending(&self) -> Direction {
        self.pending
    }
}

/// Resolves a drag from `start` to `end` into a direction.
///
/// Short drags on both axes are taps and yield nothing. Otherwise the larger
/// axis wins, with ties going to the vertical axis.
pub fn swipe_direction(start: (f32, f32), end: (f32, f32)) -> Option<Direction> {
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    if dx.abs() < SWIPE_THRESHOLD && dy.abs() < SWIPE_THRESHOLD {
        return None;
    }
    let dir = if dx.abs() > dy.abs() {
        if dx > 0.0 { Direction::Right } else { Direction::Left }
    } else if dy > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    };
    Some(dir)
}
