use serde::{Deserialize, Serialize};

// Ticks per second for levels 1 through 5.
const TICK_RATES: [u32; 5] = [3, 5, 7, 10, 15];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = TICK_RATES.len() as u8;

    pub fn new(n: u8) -> Option<Level> {
        (Self::MIN..=Self::MAX).contains(&n).then_some(Level(n))
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn tick_rate(self) -> u32 {
        TICK_RATES[(self.0 - 1) as usize]
    }

    pub fn all() -> impl Iterator<Item = Level> {
        (Self::MIN..=Self::MAX).map(Level)
    }
}

impl Default for Level {
    fn default() -> Self {
        Level(3)
    }
}

impl TryFrom<u8> for Level {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Level::new(n).ok_or_else(|| format!("level {n} is outside 1..=5"))
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.0
    }
}

/// Throttles frame callbacks down to a fixed simulation rate.
///
/// A tick is due once at least `1 / rate` seconds have passed since the last
/// one; the first poll after a reset always ticks.
#[derive(Copy, Clone, Debug)]
pub struct TickClock {
    interval: f64,
    last_tick: Option<f64>,
}

impl TickClock {
    pub fn new(rate: u32) -> Self {
        Self { interval: 1.0 / rate.max(1) as f64, last_tick: None }
    }

    pub fn reset(&mut self) {
        self.last_tick = None;
    }

    pub fn poll(&mut self, now: f64) -> bool {
        if let Some(last) = self.last_tick {
            if now - last < self.interval {
                return false;
            }
        }
        self.last_tick = Some(now);
        true
    }
}
