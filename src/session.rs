//! The round state machine.
//!
//! [`GameSession`] owns everything a round needs: the simulation, the selected
//! level and settings, the countdown, and the timers that drive them. The
//! front-end calls [`GameSession::update`] once per frame with the current
//! time, feeds directional intents through [`GameSession::set_intent`], and
//! reads back [`SessionEvent`]s plus a read-only [`FrameView`].

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::{Level, TickClock};
use crate::engine::{EndCause, Simulation, TickOutcome};
use crate::grid::{Cell, Direction};
use crate::spawner::{Food, FoodKind, FoodRng, SeededRng};
use crate::storage::{Profile, SETTINGS_KEY};
use crate::timer::{Scheduler, TimerHandle, TimerKind};

pub const ROUND_SECONDS: u32 = 30;
pub const COMBO_WINDOW: f64 = 4.0;
const COUNTDOWN_PERIOD: f64 = 1.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RoundState {
    Intro,
    Playing,
    Paused,
    GameOver(EndCause),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Audio only; the simulation never reads it.
    pub sound: bool,
    /// Crossing an edge re-enters from the opposite side instead of ending the round.
    pub wrap: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self { sound: true, wrap: false }
    }
}

#[derive(Serialize, Deserialize)]
struct SavedPrefs {
    level: Level,
    #[serde(flatten)]
    settings: Settings,
}

/// Read-only result of a finished round, for the game-over screen and sharing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundSummary {
    pub score: u32,
    pub high_score: u32,
    pub new_best: bool,
    pub cause: EndCause,
    pub level: Level,
}

impl RoundSummary {
    pub fn message(&self) -> &'static str {
        self.cause.message()
    }
}

/// Discrete UI updates, drained by the front-end after each frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    RoundStarted(Level),
    ScoreChanged(u32),
    ComboShown(u32),
    ComboCleared,
    TimeChanged(u32),
    FoodEaten(FoodKind),
    PauseChanged(bool),
    SettingsChanged(Settings),
    RoundEnded(RoundSummary),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot {action} while {state:?}")]
    InvalidTransition { action: &'static str, state: RoundState },
    #[error("there is no level {0}, pick 1 to 5")]
    UnknownLevel(u8),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub cell: Cell,
    pub head: bool,
}

/// What the renderer needs for one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameView {
    pub segments: Vec<Segment>,
    pub food: Option<Food>,
}

pub struct GameSession<R = SeededRng> {
    state: RoundState,
    level: Level,
    settings: Settings,
    sim: Simulation,
    time_left: u32,
    profile: Profile,
    clock: TickClock,
    timers: Scheduler,
    countdown: Option<TimerHandle>,
    combo_timer: Option<TimerHandle>,
    summary: Option<RoundSummary>,
    events: Vec<SessionEvent>,
    rng: R,
}

impl GameSession<SeededRng> {
    /// Session with a seeded generator when `seed` is given, entropy otherwise.
    pub fn new(profile: Profile, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SeededRng::seeded(seed),
            None => SeededRng::from_entropy(),
        };
        Self::with_rng(profile, rng)
    }
}

impl<R: FoodRng> GameSession<R> {
    pub fn with_rng(profile: Profile, mut rng: R) -> Self {
        let (level, settings) = match profile.load_json::<SavedPrefs>(SETTINGS_KEY) {
            Some(prefs) => (prefs.level, prefs.settings),
            None => (Level::default(), Settings::default()),
        };
        let sim = Simulation::new(&mut rng);
        Self {
            state: RoundState::Intro,
            level,
            settings,
            sim,
            time_left: ROUND_SECONDS,
            profile,
            clock: TickClock::new(level.tick_rate()),
            timers: Scheduler::new(),
            countdown: None,
            combo_timer: None,
            summary: None,
            events: Vec::new(),
            rng,
        }
    }

    pub fn select_level(&mut self, n: u8) -> Result<Level, SessionError> {
        if self.state != RoundState::Intro {
            return Err(self.refuse("change level"));
        }
        let level = Level::new(n).ok_or(SessionError::UnknownLevel(n))?;
        self.level = level;
        self.clock = TickClock::new(level.tick_rate());
        self.save_prefs();
        debug!("level {} selected ({} ticks/s)", n, level.tick_rate());
        Ok(level)
    }

    pub fn start_game(&mut self, now: f64) -> Result<(), SessionError> {
        match self.state {
            RoundState::Intro | RoundState::GameOver(_) => {
                self.begin_round(now);
                Ok(())
            }
            _ => Err(self.refuse("start a round")),
        }
    }

    pub fn restart_game(&mut self, now: f64) -> Result<(), SessionError> {
        match self.state {
            RoundState::GameOver(_) => {
                self.begin_round(now);
                Ok(())
            }
            _ => Err(self.refuse("restart")),
        }
    }

    pub fn toggle_pause(&mut self, now: f64) -> Result<RoundState, SessionError> {
        let next = match self.state {
            RoundState::Playing => {
                if let Some(h) = self.countdown {
                    self.timers.suspend(h, now);
                }
                RoundState::Paused
            }
            RoundState::Paused => {
                if let Some(h) = self.countdown {
                    self.timers.resume(h, now);
                }
                RoundState::Playing
            }
            _ => return Err(self.refuse("pause")),
        };
        self.state = next;
        self.events.push(SessionEvent::PauseChanged(next == RoundState::Paused));
        Ok(next)
    }

    /// Abandons the round in progress and returns to the intro screen.
    pub fn quit_game(&mut self) -> Result<(), SessionError> {
        match self.state {
            RoundState::Playing | RoundState::Paused => {
                info!("round abandoned at score {}", self.sim.score());
                self.enter_intro();
                Ok(())
            }
            _ => Err(self.refuse("quit")),
        }
    }

    pub fn go_to_home(&mut self) -> Result<(), SessionError> {
        match self.state {
            RoundState::Intro => Err(self.refuse("go home")),
            _ => {
                self.enter_intro();
                Ok(())
            }
        }
    }

    /// Routes a directional intent to the input buffer. Ignored outside a round.
    pub fn set_intent(&mut self, dir: Direction) -> bool {
        match self.state {
            RoundState::Playing | RoundState::Paused => self.sim.set_intent(dir),
            _ => false,
        }
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.settings.sound = !self.settings.sound;
        self.settings_changed();
        self.settings.sound
    }

    pub fn toggle_wrap(&mut self) -> bool {
        self.settings.wrap = !self.settings.wrap;
        self.settings_changed();
        self.settings.wrap
    }

    /// Frame callback: fires due timers, then runs a tick if one is due.
    pub fn update(&mut self, now: f64) {
        if !matches!(self.state, RoundState::Playing | RoundState::Paused) {
            return;
        }

        for kind in self.timers.advance(now) {
            match kind {
                TimerKind::Countdown => self.countdown_step(),
                TimerKind::ComboExpiry => {
                    self.combo_timer = None;
                    if self.sim.expire_combo() {
                        self.events.push(SessionEvent::ComboCleared);
                    }
                }
            }
            if matches!(self.state, RoundState::GameOver(_)) {
                return;
            }
        }

        // A paused frame still uses up its tick slot.
        if self.clock.poll(now) && self.state == RoundState::Playing {
            self.step(now);
        }
    }

    fn begin_round(&mut self, now: f64) {
        self.timers.clear();
        self.sim = Simulation::new(&mut self.rng);
        self.time_left = ROUND_SECONDS;
        self.clock.reset();
        self.countdown = Some(self.timers.repeating(now, COUNTDOWN_PERIOD, TimerKind::Countdown));
        self.combo_timer = None;
        self.summary = None;
        self.state = RoundState::Playing;
        info!("round started at level {} ({} ticks/s, wrap {})", self.level.number(), self.level.tick_rate(), self.settings.wrap);
        self.events.push(SessionEvent::RoundStarted(self.level));
        self.events.push(SessionEvent::ScoreChanged(0));
        self.events.push(SessionEvent::ComboCleared);
        self.events.push(SessionEvent::TimeChanged(self.time_left));
    }

    fn step(&mut self, now: f64) {
        match self.sim.tick(self.settings.wrap, &mut self.rng) {
            TickOutcome::Moved => {}
            TickOutcome::Ate(pickup) => {
                self.events.push(SessionEvent::FoodEaten(pickup.kind));
                self.events.push(SessionEvent::ScoreChanged(self.sim.score()));
                if pickup.combo_visual {
                    self.events.push(SessionEvent::ComboShown(pickup.combo));
                }
                if let Some(h) = self.combo_timer.take() {
                    self.timers.cancel(h);
                }
                self.combo_timer = Some(self.timers.once(now, COMBO_WINDOW, TimerKind::ComboExpiry));
                if pickup.board_full {
                    self.end_round(EndCause::BoardFull);
                }
            }
            TickOutcome::Ended(cause) => self.end_round(cause),
        }
    }

    fn countdown_step(&mut self) {
        self.time_left = self.time_left.saturating_sub(1);
        self.events.push(SessionEvent::TimeChanged(self.time_left));
        if self.time_left == 0 {
            self.end_round(EndCause::TimeUp);
        }
    }

    fn end_round(&mut self, cause: EndCause) {
        self.stop_timers();
        let score = self.sim.score();
        let new_best = self.profile.record(score);
        let summary = RoundSummary { score, high_score: self.profile.best(), new_best, cause, level: self.level };
        info!("round over: {:?}, score {}, best {}{}", cause, score, summary.high_score, if new_best { " (new)" } else { "" });
        self.state = RoundState::GameOver(cause);
        self.summary = Some(summary.clone());
        self.events.push(SessionEvent::RoundEnded(summary));
    }

    fn enter_intro(&mut self) {
        self.stop_timers();
        self.sim = Simulation::new(&mut self.rng);
        self.time_left = ROUND_SECONDS;
        self.summary = None;
        self.state = RoundState::Intro;
    }

    fn stop_timers(&mut self) {
        self.timers.clear();
        self.countdown = None;
        self.combo_timer = None;
    }

    fn settings_changed(&mut self) {
        debug!("settings now {:?}", self.settings);
        self.save_prefs();
        self.events.push(SessionEvent::SettingsChanged(self.settings));
    }

    fn save_prefs(&mut self) {
        let prefs = SavedPrefs { level: self.level, settings: self.settings };
        self.profile.save_json(SETTINGS_KEY, &prefs);
    }

    fn refuse(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition { action, state: self.state }
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn frame(&self) -> FrameView {
        let segments = self
            .sim
            .snake()
            .iter()
            .enumerate()
            .map(|(i, &cell)| Segment { cell, head: i == 0 })
            .collect();
        FrameView { segments, food: self.sim.food() }
    }

    pub fn summary(&self) -> Option<&RoundSummary> {
        self.summary.as_ref()
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn score(&self) -> u32 {
        self.sim.score()
    }

    pub fn combo(&self) -> u32 {
        self.sim.combo()
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn high_score(&self) -> u32 {
        self.profile.best()
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Number of live timers; zero whenever no round is running.
    pub fn active_timers(&self) -> usize {
        self.timers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{CELL_COUNT, GRID_SIZE};
    use crate::storage::JsonFileStore;

    fn session() -> GameSession {
        GameSession::new(Profile::in_memory(), Some(11))
    }

    #[test]
    fn starts_in_intro_with_defaults() {
        let s = session();
        assert_eq!(s.state(), RoundState::Intro);
        assert_eq!(s.level(), Level::default());
        assert_eq!(s.settings(), Settings::default());
        assert_eq!(s.active_timers(), 0);
    }

    #[test]
    fn illegal_transitions_are_refused() {
        let mut s = session();
        assert!(matches!(s.toggle_pause(0.0), Err(SessionError::InvalidTransition { .. })));
        assert!(s.restart_game(0.0).is_err());
        assert!(s.quit_game().is_err());
        s.start_game(0.0).unwrap();
        assert!(s.start_game(0.1).is_err());
        assert!(s.select_level(2).is_err(), "level is fixed during a round");
    }

    #[test]
    fn unknown_level_is_rejected() {
        let mut s = session();
        assert_eq!(s.select_level(7), Err(SessionError::UnknownLevel(7)));
        assert_eq!(s.select_level(5).unwrap().tick_rate(), 15);
    }

    #[test]
    fn prefs_survive_a_new_session_on_the_same_store() {
        let path = std::env::temp_dir().join(format!("jelly_snake_prefs_{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let open = || Profile::load(Box::new(JsonFileStore::open(&path).unwrap()));

        let mut first = GameSession::new(open(), Some(1));
        first.select_level(1).unwrap();
        first.toggle_wrap();
        first.toggle_sound();
        drop(first);

        let mut second = GameSession::new(open(), Some(2));
        assert_eq!(second.level().number(), 1);
        assert_eq!(second.settings(), Settings { sound: false, wrap: true });

        // Level 1 runs at 3 ticks per second.
        second.start_game(0.0).unwrap();
        second.update(0.0);
        assert_eq!(second.simulation().head(), Some(Cell::new(10, 9)));
        second.update(0.2);
        assert_eq!(second.simulation().head(), Some(Cell::new(10, 9)));
        second.update(0.34);
        assert_eq!(second.simulation().head(), Some(Cell::new(10, 8)));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn filling_the_board_ends_the_round() {
        let mut s = session();
        s.start_game(0.0).unwrap();
        let hole = Cell::new(GRID_SIZE - 1, GRID_SIZE - 1);
        let head = Cell::new(GRID_SIZE - 2, GRID_SIZE - 1);
        let rest = (0..CELL_COUNT).map(Cell::from_index).filter(|c| *c != hole && *c != head);
        let body: Vec<Cell> = std::iter::once(head).chain(rest).collect();
        s.sim = Simulation::with_snake(body, Direction::Right, Some(Food { cell: hole, kind: FoodKind::Normal }));

        s.update(0.0);
        assert_eq!(s.state(), RoundState::GameOver(EndCause::BoardFull));
        assert_eq!(s.active_timers(), 0);
        let summary = s.summary().unwrap();
        assert_eq!(summary.score, 10);
        assert_eq!(summary.cause, EndCause::BoardFull);
        assert_eq!(s.high_score(), 10);

        // A fresh round ticks on its first frame even right after the last tick.
        s.restart_game(0.05).unwrap();
        s.update(0.05);
        assert_eq!(s.simulation().head(), Some(Cell::new(10, 9)));
    }

    #[test]
    fn intents_are_ignored_outside_a_round() {
        let mut s = session();
        assert!(!s.set_intent(Direction::Left));
        s.start_game(0.0).unwrap();
        assert!(s.set_intent(Direction::Left));
        assert!(!s.set_intent(Direction::Down), "down reverses the starting heading");
    }
}
