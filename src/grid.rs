use serde::{Deserialize, Serialize};

// Logical board is square; pixels are derived from the window at draw time.
pub const GRID_SIZE: i32 = 24;
pub const CELL_COUNT: usize = (GRID_SIZE * GRID_SIZE) as usize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbouring cell one step away; may land off the board.
    pub fn step(self, dir: Direction) -> Cell {
        let (dx, dy) = dir.delta();
        Cell { x: self.x + dx, y: self.y + dy }
    }

    pub fn in_bounds(self) -> bool {
        (0..GRID_SIZE).contains(&self.x) && (0..GRID_SIZE).contains(&self.y)
    }

    /// Folds an out-of-range coordinate back onto the opposite edge.
    pub fn wrapped(self) -> Cell {
        Cell { x: self.x.rem_euclid(GRID_SIZE), y: self.y.rem_euclid(GRID_SIZE) }
    }

    pub fn index(self) -> usize {
        (self.y * GRID_SIZE + self.x) as usize
    }

    pub fn from_index(index: usize) -> Cell {
        let i = index as i32;
        Cell { x: i % GRID_SIZE, y: i / GRID_SIZE }
    }
}
