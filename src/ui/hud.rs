use jelly_snake::session::ROUND_SECONDS;
use jelly_snake::{RoundSummary, SessionEvent};

const COMBO_POPUP_SECONDS: f64 = 0.8;
const STATUS_SECONDS: f64 = 3.0;

/// Presentation-side copy of the numbers the session announces through
/// events, plus transient overlays.
pub struct Hud {
    pub score: u32,
    pub time_left: u32,
    pub combo_popup: Option<(u32, f64)>,
    pub paused: bool,
    pub result: Option<RoundSummary>,
    pub settings_open: bool,
    status: Option<(String, f64)>,
    pub manual_text: Option<String>,
}

impl Default for Hud {
    fn default() -> Self {
        Self {
            score: 0,
            time_left: ROUND_SECONDS,
            combo_popup: None,
            paused: false,
            result: None,
            settings_open: false,
            status: None,
            manual_text: None,
        }
    }
}

impl Hud {
    pub fn apply(&mut self, event: &SessionEvent, now: f64) {
        match event {
            SessionEvent::RoundStarted(_) => {
                self.result = None;
                self.paused = false;
                self.status = None;
                self.manual_text = None;
            }
            SessionEvent::ScoreChanged(score) => self.score = *score,
            SessionEvent::TimeChanged(left) => self.time_left = *left,
            SessionEvent::ComboShown(combo) => self.combo_popup = Some((*combo, now + COMBO_POPUP_SECONDS)),
            SessionEvent::ComboCleared => self.combo_popup = None,
            SessionEvent::PauseChanged(paused) => self.paused = *paused,
            SessionEvent::RoundEnded(summary) => {
                self.combo_popup = None;
                self.result = Some(summary.clone());
            }
            SessionEvent::FoodEaten(_) | SessionEvent::SettingsChanged(_) => {}
        }
    }

    pub fn combo(&self, now: f64) -> Option<u32> {
        self.combo_popup.filter(|(_, until)| now < *until).map(|(combo, _)| combo)
    }

    pub fn set_status(&mut self, text: String, now: f64) {
        if !text.is_empty() {
            self.status = Some((text, now + STATUS_SECONDS));
        }
    }

    pub fn status(&self, now: f64) -> Option<&str> {
        self.status.as_ref().filter(|(_, until)| now < *until).map(|(text, _)| text.as_str())
    }

    pub fn time_low(&self) -> bool {
        self.time_left <= 10
    }
}
