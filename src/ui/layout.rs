use jelly_snake::{Direction, GRID_SIZE, RoundState};
use macroquad::prelude::*;

const MARGIN: f32 = 12.0;
const HUD_HEIGHT: f32 = 56.0;
const PAD_AREA: f32 = 170.0;
const PAD_BUTTON: f32 = 52.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Button {
    Level(u8),
    Start,
    Settings,
    Sound,
    Wrap,
    Pause,
    Quit,
    Pad(Direction),
    Restart,
    Home,
    Share,
}

/// Screen geometry for the current frame: where the board sits and which
/// buttons are live.
pub struct Layout {
    pub board: Rect,
    pub tile: f32,
    pub buttons: Vec<(Button, Rect)>,
}

impl Layout {
    pub fn compute(sw: f32, sh: f32, state: RoundState, settings_open: bool) -> Self {
        let side = (sw - 2.0 * MARGIN).min(sh - HUD_HEIGHT - PAD_AREA - 2.0 * MARGIN).max(120.0);
        let board = Rect::new((sw - side) * 0.5, HUD_HEIGHT + MARGIN, side, side);
        let tile = side / GRID_SIZE as f32;
        let mut buttons = Vec::new();

        match state {
            RoundState::Intro => {
                let w = 52.0;
                let gap = 10.0;
                let row_w = 5.0 * w + 4.0 * gap;
                let y = sh * 0.42;
                for n in 1..=5u8 {
                    let x = (sw - row_w) * 0.5 + (n - 1) as f32 * (w + gap);
                    buttons.push((Button::Level(n), Rect::new(x, y, w, w)));
                }
                let cx = sw * 0.5 - 100.0;
                buttons.push((Button::Start, Rect::new(cx, y + w + 24.0, 200.0, 52.0)));
                buttons.push((Button::Settings, Rect::new(cx, y + w + 88.0, 200.0, 40.0)));
                if settings_open {
                    buttons.push((Button::Sound, Rect::new(cx, y + w + 140.0, 200.0, 40.0)));
                    buttons.push((Button::Wrap, Rect::new(cx, y + w + 188.0, 200.0, 40.0)));
                }
            }
            RoundState::Playing | RoundState::Paused => {
                buttons.push((Button::Pause, Rect::new(sw - MARGIN - 48.0, MARGIN, 48.0, 40.0)));
                buttons.push((Button::Quit, Rect::new(sw - MARGIN - 104.0, MARGIN, 48.0, 40.0)));

                let cx = sw * 0.5;
                let cy = board.bottom() + MARGIN + PAD_AREA * 0.5;
                let half = PAD_BUTTON * 0.5;
                let reach = PAD_BUTTON + 4.0;
                let pads = [
                    (Direction::Up, cx - half, cy - reach - half),
                    (Direction::Down, cx - half, cy + reach - half),
                    (Direction::Left, cx - reach - half, cy - half),
                    (Direction::Right, cx + reach - half, cy - half),
                ];
                for (dir, x, y) in pads {
                    buttons.push((Button::Pad(dir), Rect::new(x, y, PAD_BUTTON, PAD_BUTTON)));
                }
            }
            RoundState::GameOver(_) => {
                let x = sw * 0.5 - 80.0;
                let top = sh * 0.56;
                for (i, b) in [Button::Restart, Button::Home, Button::Share].into_iter().enumerate() {
                    buttons.push((b, Rect::new(x, top + i as f32 * 58.0, 160.0, 48.0)));
                }
            }
        }

        Self { board, tile, buttons }
    }

    pub fn hit(&self, x: f32, y: f32) -> Option<Button> {
        self.buttons.iter().find(|(_, r)| r.contains(vec2(x, y))).map(|(b, _)| *b)
    }

    pub fn cell_rect(&self, cell: jelly_snake::Cell) -> Rect {
        Rect::new(
            self.board.x + cell.x as f32 * self.tile,
            self.board.y + cell.y as f32 * self.tile,
            self.tile,
            self.tile,
        )
    }
}
