use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::{CELL_COUNT, Cell, GRID_SIZE};

pub const STAR_CHANCE: f64 = 0.2;
// Rejection draws before switching to an exhaustive scan of free cells.
const MAX_DRAWS: usize = CELL_COUNT * 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodKind {
    Normal,
    Star,
}

impl FoodKind {
    pub fn points(self) -> u32 {
        match self {
            FoodKind::Normal => 10,
            FoodKind::Star => 30,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub cell: Cell,
    pub kind: FoodKind,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpawnError {
    #[error("no free cell left on the board")]
    BoardFull,
}

/// Randomness consumed by the spawner.
///
/// Kept as a narrow trait so rounds can be replayed from a scripted sequence.
pub trait FoodRng {
    /// Uniform integer in `0..bound`.
    fn below(&mut self, bound: u32) -> u32;
    /// Uniform float in `0.0..1.0`.
    fn chance(&mut self) -> f64;
}

/// Adapts any `rand` generator to [`FoodRng`].
#[derive(Clone, Debug)]
pub struct RngSource<R>(pub R);

pub type SeededRng = RngSource<ChaCha8Rng>;

impl SeededRng {
    pub fn seeded(seed: u64) -> Self {
        RngSource(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        RngSource(ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> FoodRng for RngSource<R> {
    fn below(&mut self, bound: u32) -> u32 {
        self.0.gen_range(0..bound)
    }

    fn chance(&mut self) -> f64 {
        self.0.gen_range(0.0..1.0)
    }
}

/// Picks an unoccupied cell and a food type.
///
/// Draws uniformly and redraws on occupied cells. The draw count is bounded:
/// past the bound the free cells are enumerated and one is picked directly, and
/// a board with no free cell reports [`SpawnError::BoardFull`].
pub fn spawn_food<'a, R>(rng: &mut R, snake: impl IntoIterator<Item = &'a Cell>) -> Result<Food, SpawnError>
where
    R: FoodRng + ?Sized,
{
    let mut taken = vec![false; CELL_COUNT];
    let mut occupied = 0;
    for c in snake {
        if c.in_bounds() && !taken[c.index()] {
            taken[c.index()] = true;
            occupied += 1;
        }
    }
    if occupied >= CELL_COUNT {
        return Err(SpawnError::BoardFull);
    }

    let mut found = None;
    for _ in 0..MAX_DRAWS {
        let x = rng.below(GRID_SIZE as u32) as i32;
        let y = rng.below(GRID_SIZE as u32) as i32;
        let cell = Cell { x, y };
        if !taken[cell.index()] {
            found = Some(cell);
            break;
        }
    }

    let cell = match found {
        Some(cell) => cell,
        None => {
            let free: Vec<usize> = (0..CELL_COUNT).filter(|&i| !taken[i]).collect();
            warn!("food spawn hit the draw limit, picking from {} free cells", free.len());
            Cell::from_index(free[rng.below(free.len() as u32) as usize])
        }
    };

    let kind = if rng.chance() < STAR_CHANCE { FoodKind::Star } else { FoodKind::Normal };
    debug!("food spawned at ({}, {}) as {:?}", cell.x, cell.y, kind);
    Ok(Food { cell, kind })
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    struct Scripted {
        ints: VecDeque<u32>,
        rolls: VecDeque<f64>,
    }

    impl FoodRng for Scripted {
        fn below(&mut self, bound: u32) -> u32 {
            self.ints.pop_front().unwrap_or(0) % bound
        }

        fn chance(&mut self) -> f64 {
            self.rolls.pop_front().unwrap_or(0.5)
        }
    }

    fn scripted(ints: &[u32], rolls: &[f64]) -> Scripted {
        Scripted { ints: ints.iter().copied().collect(), rolls: rolls.iter().copied().collect() }
    }

    #[test]
    fn skips_occupied_cell_and_takes_next_draw() {
        let snake = [Cell::new(4, 4)];
        let mut rng = scripted(&[4, 4, 4, 4, 9, 2], &[0.9]);
        let food = spawn_food(&mut rng, &snake).unwrap();
        assert_eq!(food.cell, Cell::new(9, 2));
        assert_eq!(food.kind, FoodKind::Normal);
    }

    #[test]
    fn low_roll_spawns_star() {
        let mut rng = scripted(&[1, 1], &[0.1]);
        let food = spawn_food(&mut rng, std::iter::empty()).unwrap();
        assert_eq!(food.kind, FoodKind::Star);
    }

    #[test]
    fn full_board_fails_instead_of_looping() {
        let snake: Vec<Cell> = (0..CELL_COUNT).map(Cell::from_index).collect();
        let mut rng = scripted(&[], &[]);
        assert_eq!(spawn_food(&mut rng, &snake), Err(SpawnError::BoardFull));
    }

    #[test]
    fn single_free_cell_is_found_after_draw_limit() {
        let hole = Cell::new(23, 23);
        let snake: Vec<Cell> = (0..CELL_COUNT).map(Cell::from_index).filter(|c| *c != hole).collect();
        // Every scripted draw lands on (0, 0), which is occupied.
        let mut rng = scripted(&[], &[0.5]);
        let food = spawn_food(&mut rng, &snake).unwrap();
        assert_eq!(food.cell, hole);
    }

    #[test]
    fn seeded_source_never_lands_on_snake() {
        let snake: Vec<Cell> = (0..GRID_SIZE).map(|x| Cell::new(x, 12)).collect();
        let mut rng = SeededRng::seeded(7);
        for _ in 0..200 {
            let food = spawn_food(&mut rng, &snake).unwrap();
            assert!(food.cell.in_bounds());
            assert!(!snake.contains(&food.cell));
        }
    }
}
