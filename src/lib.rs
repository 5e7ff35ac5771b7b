//! Jelly Snake: a timed arcade snake with combo scoring.
//!
//! The library is the whole game minus the window: movement and collisions
//! ([`engine`]), food placement ([`spawner`]), the round state machine
//! ([`session`]) and its timers, persistence, and the share pipeline. The
//! macroquad front-end in `main.rs` only draws what [`session::GameSession`]
//! exposes and forwards input to it.

pub mod card;
pub mod clock;
pub mod config;
pub mod engine;
pub mod grid;
pub mod input;
pub mod session;
pub mod share;
pub mod spawner;
pub mod storage;
pub mod timer;

pub use clock::Level;
pub use engine::{EndCause, Simulation, TickOutcome};
pub use grid::{Cell, Direction, GRID_SIZE};
pub use session::{GameSession, RoundState, RoundSummary, SessionEvent, Settings};
pub use spawner::{Food, FoodKind, FoodRng};
