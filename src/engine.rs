use std::collections::VecDeque;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::grid::{Cell, Direction};
use crate::input::InputBuffer;
use crate::spawner::{Food, FoodKind, FoodRng, spawn_food};

pub const COMBO_BONUS: u32 = 5;
pub const START_HEADING: Direction = Direction::Up;
pub const START_SNAKE: [Cell; 3] = [Cell::new(10, 10), Cell::new(10, 11), Cell::new(10, 12)];

/// Why a round ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndCause {
    WallCollision,
    SelfCollision,
    TimeUp,
    /// The snake filled every cell; there is nowhere left to put food.
    BoardFull,
}

impl EndCause {
    pub fn message(self) -> &'static str {
        match self {
            EndCause::WallCollision => "Bonk! You hit the wall",
            EndCause::SelfCollision => "Ouch! You bit your own tail",
            EndCause::TimeUp => "Time's up!",
            EndCause::BoardFull => "The whole board is jelly. Perfect!",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pickup {
    pub kind: FoodKind,
    pub points: u32,
    pub combo: u32,
    /// Streak of two or more: the presentation layer flashes the combo badge.
    pub combo_visual: bool,
    /// No replacement food could be placed.
    pub board_full: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Moved,
    Ate(Pickup),
    Ended(EndCause),
}

/// Snake, food and scoring for one round.
///
/// All mutation happens in [`Simulation::tick`] (movement and pickups) and
/// [`Simulation::expire_combo`]; input only reaches the pending direction slot.
#[derive(Clone, Debug)]
pub struct Simulation {
    snake: VecDeque<Cell>,
    input: InputBuffer,
    food: Option<Food>,
    score: u32,
    combo: u32,
}

impl Simulation {
    /// Fresh round layout: three segments heading up, food placed off the body.
    pub fn new<R: FoodRng + ?Sized>(rng: &mut R) -> Self {
        let mut sim = Self::with_snake(START_SNAKE, START_HEADING, None);
        sim.food = spawn_food(rng, &sim.snake).ok();
        sim
    }

    /// Builds a simulation from an explicit body (head first).
    pub fn with_snake(body: impl IntoIterator<Item = Cell>, heading: Direction, food: Option<Food>) -> Self {
        Self {
            snake: body.into_iter().collect(),
            input: InputBuffer::new(heading),
            food,
            score: 0,
            combo: 0,
        }
    }

    pub fn set_intent(&mut self, dir: Direction) -> bool {
        self.input.set_intent(dir)
    }

    pub fn tick<R: FoodRng + ?Sized>(&mut self, wrap: bool, rng: &mut R) -> TickOutcome {
        let dir = self.input.consume();
        let Some(&head) = self.snake.front() else {
            return TickOutcome::Ended(EndCause::SelfCollision);
        };

        let mut next = head.step(dir);
        if !next.in_bounds() {
            if !wrap {
                return TickOutcome::Ended(EndCause::WallCollision);
            }
            next = next.wrapped();
        }

        // The tail still counts: it has not moved out yet.
        if self.snake.contains(&next) {
            return TickOutcome::Ended(EndCause::SelfCollision);
        }

        self.snake.push_front(next);

        match self.food {
            Some(food) if food.cell == next => TickOutcome::Ate(self.resolve_pickup(food.kind, rng)),
            _ => {
                self.snake.pop_back();
                TickOutcome::Moved
            }
        }
    }

    fn resolve_pickup<R: FoodRng + ?Sized>(&mut self, kind: FoodKind, rng: &mut R) -> Pickup {
        self.combo += 1;
        let combo_visual = self.combo > 1;
        let mut points = kind.points();
        if combo_visual {
            points += self.combo * COMBO_BONUS;
        }
        self.score += points;
        debug!("ate {:?} for {} points (combo {})", kind, points, self.combo);

        self.food = spawn_food(rng, &self.snake).ok();
        let board_full = self.food.is_none();
        if board_full {
            info!("snake filled the board at length {}", self.snake.len());
        }

        Pickup { kind, points, combo: self.combo, combo_visual, board_full }
    }

    /// Ends the current streak. Returns whether there was one.
    pub fn expire_combo(&mut self) -> bool {
        let had = self.combo > 0;
        self.combo = 0;
        had
    }

    pub fn snake(&self) -> &VecDeque<Cell> {
        &self.snake
    }

    pub fn head(&self) -> Option<Cell> {
        self.snake.front().copied()
    }

    pub fn food(&self) -> Option<Food> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn heading(&self) -> Direction {
        self.input.current()
    }

    pub fn pending(&self) -> Direction {
        self.input.pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GRID_SIZE;
    use crate::spawner::SeededRng;

    fn food_at(x: i32, y: i32) -> Option<Food> {
        Some(Food { cell: Cell::new(x, y), kind: FoodKind::Normal })
    }

    #[test]
    fn plain_move_keeps_length() {
        let mut rng = SeededRng::seeded(1);
        let mut sim = Simulation::with_snake(START_SNAKE, Direction::Up, food_at(0, 0));
        assert_eq!(sim.tick(false, &mut rng), TickOutcome::Moved);
        assert_eq!(sim.snake().len(), 3);
        assert_eq!(sim.head(), Some(Cell::new(10, 9)));
        assert_eq!(sim.snake().back(), Some(&Cell::new(10, 11)));
    }

    #[test]
    fn pickup_grows_and_respawns_off_body() {
        let mut rng = SeededRng::seeded(2);
        let mut sim = Simulation::with_snake(START_SNAKE, Direction::Up, food_at(10, 9));
        let outcome = sim.tick(false, &mut rng);
        assert!(matches!(outcome, TickOutcome::Ate(Pickup { points: 10, combo: 1, combo_visual: false, .. })));
        assert_eq!(sim.snake().len(), 4);
        let food = sim.food().unwrap();
        assert_ne!(food.cell, Cell::new(10, 9));
        assert!(!sim.snake().contains(&food.cell));
    }

    #[test]
    fn wall_ends_round_without_mutation() {
        let mut rng = SeededRng::seeded(3);
        let body = [Cell::new(0, 5), Cell::new(1, 5), Cell::new(2, 5)];
        let mut sim = Simulation::with_snake(body, Direction::Left, food_at(9, 9));
        assert_eq!(sim.tick(false, &mut rng), TickOutcome::Ended(EndCause::WallCollision));
        assert_eq!(sim.snake().iter().copied().collect::<Vec<_>>(), body.to_vec());
    }

    #[test]
    fn wrap_reenters_from_opposite_edge() {
        let mut rng = SeededRng::seeded(4);
        let body = [Cell::new(0, 5), Cell::new(1, 5), Cell::new(2, 5)];
        let mut sim = Simulation::with_snake(body, Direction::Left, food_at(9, 9));
        assert_eq!(sim.tick(true, &mut rng), TickOutcome::Moved);
        assert_eq!(sim.head(), Some(Cell::new(GRID_SIZE - 1, 5)));
    }

    #[test]
    fn neck_bite_is_self_collision() {
        let mut rng = SeededRng::seeded(5);
        let body = [Cell::new(5, 5), Cell::new(5, 6), Cell::new(5, 7)];
        let mut sim = Simulation::with_snake(body, Direction::Down, food_at(0, 0));
        assert_eq!(sim.tick(false, &mut rng), TickOutcome::Ended(EndCause::SelfCollision));
    }

    #[test]
    fn tail_cell_counts_as_occupied() {
        let mut rng = SeededRng::seeded(6);
        // A 2x2 loop: the head steps into the cell the tail is about to leave.
        let body = [Cell::new(5, 5), Cell::new(6, 5), Cell::new(6, 6), Cell::new(5, 6)];
        let mut sim = Simulation::with_snake(body, Direction::Down, food_at(0, 0));
        assert_eq!(sim.tick(false, &mut rng), TickOutcome::Ended(EndCause::SelfCollision));
    }

    #[test]
    fn eating_the_last_free_cell_reports_full_board() {
        let mut rng = SeededRng::seeded(9);
        let hole = Cell::new(GRID_SIZE - 1, GRID_SIZE - 1);
        let head = Cell::new(GRID_SIZE - 2, GRID_SIZE - 1);
        let rest = (0..crate::grid::CELL_COUNT).map(Cell::from_index).filter(|c| *c != hole && *c != head);
        let body: Vec<Cell> = std::iter::once(head).chain(rest).collect();
        let mut sim = Simulation::with_snake(body, Direction::Right, Some(Food { cell: hole, kind: FoodKind::Normal }));
        match sim.tick(false, &mut rng) {
            TickOutcome::Ate(p) => assert!(p.board_full),
            other => panic!("expected pickup, got {other:?}"),
        }
        assert_eq!(sim.food(), None);
        assert_eq!(sim.snake().len(), crate::grid::CELL_COUNT);
    }

    #[test]
    fn star_pays_thirty_and_combo_adds_bonus() {
        let mut rng = SeededRng::seeded(8);
        let star = Some(Food { cell: Cell::new(10, 9), kind: FoodKind::Star });
        let mut sim = Simulation::with_snake(START_SNAKE, Direction::Up, star);
        sim.combo = 1;
        match sim.tick(false, &mut rng) {
            TickOutcome::Ate(p) => {
                assert_eq!(p.points, 30 + 2 * COMBO_BONUS);
                assert!(p.combo_visual);
            }
            other => panic!("expected pickup, got {other:?}"),
        }
        assert!(sim.expire_combo());
        assert_eq!(sim.combo(), 0);
        assert!(!sim.expire_combo());
    }
}
