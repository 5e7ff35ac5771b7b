use jelly_snake::{FoodKind, GameSession, RoundState};
use macroquad::prelude::*;

use super::hud::Hud;
use super::layout::{Button, Layout};

const fn hex(rgb: u32) -> Color {
    Color::new(
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
        1.0,
    )
}

// Jelly palette
const BACKGROUND: Color = hex(0xFFF0F5);
const BOARD: Color = hex(0xFFE4EC);
const SNAKE_HEAD: Color = hex(0xFF6B9D);
const SNAKE_BODY: Color = hex(0xFF9A9E);
const FOOD: Color = hex(0x18DCFF);
const FOOD_STAR: Color = hex(0xFFC312);
const INK: Color = hex(0x4A2C3F);
const ALERT: Color = hex(0xFF6B6B);
const BUTTON: Color = hex(0xFFFFFF);

fn centered_text(text: &str, cx: f32, y: f32, size: u16, color: Color) {
    let m = measure_text(text, None, size, 1.0);
    draw_text(text, cx - m.width * 0.5, y, size as f32, color);
}

fn button(rect: Rect, label: &str, fill: Color, text: Color) {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, fill);
    draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 2.0, SNAKE_HEAD);
    let size = (rect.h * 0.45).clamp(14.0, 28.0) as u16;
    let m = measure_text(label, None, size, 1.0);
    draw_text(label, rect.x + (rect.w - m.width) * 0.5, rect.y + rect.h * 0.5 + m.offset_y * 0.5, size as f32, text);
}

fn on_off(flag: bool) -> &'static str {
    if flag { "ON" } else { "OFF" }
}

pub fn scene(session: &GameSession, hud: &Hud, layout: &Layout, now: f64) {
    clear_background(BACKGROUND);
    match session.state() {
        RoundState::Intro => intro(session, hud, layout),
        RoundState::Playing | RoundState::Paused => {
            playfield(session, hud, layout, now);
            if session.state() == RoundState::Paused {
                let b = layout.board;
                draw_rectangle(b.x, b.y, b.w, b.h, Color::new(1.0, 1.0, 1.0, 0.6));
                centered_text("PAUSED", b.x + b.w * 0.5, b.y + b.h * 0.5, 40, INK);
            }
        }
        RoundState::GameOver(_) => {
            playfield(session, hud, layout, now);
            game_over(hud, layout, now);
        }
    }
}

fn intro(session: &GameSession, hud: &Hud, layout: &Layout) {
    let sw = screen_width();
    let sh = screen_height();
    centered_text("JELLY SNAKE", sw * 0.5, sh * 0.2, 48, SNAKE_HEAD);
    centered_text("Grab the candy before time runs out!", sw * 0.5, sh * 0.2 + 36.0, 20, INK);
    centered_text(&format!("Best: {}", session.high_score()), sw * 0.5, sh * 0.2 + 70.0, 24, INK);
    centered_text("Level", sw * 0.5, sh * 0.42 - 12.0, 20, INK);

    let settings = session.settings();
    for (b, rect) in &layout.buttons {
        match b {
            Button::Level(n) => {
                let selected = session.level().number() == *n;
                let fill = if selected { SNAKE_HEAD } else { BUTTON };
                let text = if selected { WHITE } else { INK };
                button(*rect, &n.to_string(), fill, text);
            }
            Button::Start => button(*rect, "START", SNAKE_HEAD, WHITE),
            Button::Settings => {
                let label = if hud.settings_open { "Settings ^" } else { "Settings v" };
                button(*rect, label, BUTTON, INK);
            }
            Button::Sound => button(*rect, &format!("Sound: {}", on_off(settings.sound)), BUTTON, INK),
            Button::Wrap => button(*rect, &format!("Wall wrap: {}", on_off(settings.wrap)), BUTTON, INK),
            _ => {}
        }
    }
}

fn playfield(session: &GameSession, hud: &Hud, layout: &Layout, now: f64) {
    // HUD
    draw_text(&format!("Score {}", hud.score), 12.0, 30.0, 28.0, INK);
    draw_text(&format!("Best {}", session.high_score()), 12.0, 50.0, 18.0, INK);
    let timer_color = if hud.time_low() { ALERT } else { INK };
    centered_text(&format!("{}", hud.time_left), screen_width() * 0.5, 40.0, 36, timer_color);

    let b = layout.board;
    draw_rectangle(b.x, b.y, b.w, b.h, BOARD);
    draw_rectangle_lines(b.x, b.y, b.w, b.h, 3.0, SNAKE_BODY);

    let frame = session.frame();
    for seg in &frame.segments {
        let r = layout.cell_rect(seg.cell);
        let color = if seg.head { SNAKE_HEAD } else { SNAKE_BODY };
        draw_rectangle(r.x + 1.0, r.y + 1.0, r.w - 2.0, r.h - 2.0, color);
        if seg.head {
            let eye = (r.w * 0.1).max(1.5);
            draw_circle(r.x + r.w / 3.0, r.y + r.h / 3.0, eye, WHITE);
            draw_circle(r.x + r.w * 2.0 / 3.0, r.y + r.h / 3.0, eye, WHITE);
        }
    }

    if let Some(food) = frame.food {
        let r = layout.cell_rect(food.cell);
        let (cx, cy) = (r.x + r.w * 0.5, r.y + r.h * 0.5);
        match food.kind {
            FoodKind::Normal => draw_circle(cx, cy, r.w * 0.5 - 2.0, FOOD),
            FoodKind::Star => {
                draw_circle(cx, cy, r.w * 0.5 + 2.0, Color::new(1.0, 1.0, 1.0, 0.7));
                draw_circle(cx, cy, r.w * 0.5 - 2.0, FOOD_STAR);
                centered_text("*", cx, cy + r.h * 0.35, r.h as u16, WHITE);
            }
        }
    }

    if let Some(combo) = hud.combo(now) {
        centered_text(&format!("COMBO x{combo}!"), b.x + b.w * 0.5, b.y + 48.0, 36, FOOD_STAR);
    }

    for (button_kind, rect) in &layout.buttons {
        match button_kind {
            Button::Pause => button(*rect, if hud.paused { ">" } else { "II" }, BUTTON, INK),
            Button::Quit => button(*rect, "X", BUTTON, INK),
            Button::Pad(dir) => {
                let label = match dir {
                    jelly_snake::Direction::Up => "^",
                    jelly_snake::Direction::Down => "v",
                    jelly_snake::Direction::Left => "<",
                    jelly_snake::Direction::Right => ">",
                };
                button(*rect, label, BUTTON, SNAKE_HEAD);
            }
            _ => {}
        }
    }
}

fn game_over(hud: &Hud, layout: &Layout, now: f64) {
    let sw = screen_width();
    let sh = screen_height();
    draw_rectangle(0.0, 0.0, sw, sh, Color::new(0.0, 0.0, 0.0, 0.4));
    let panel = Rect::new(sw * 0.5 - 170.0, sh * 0.18, 340.0, sh * 0.74);
    draw_rectangle(panel.x, panel.y, panel.w, panel.h, BACKGROUND);
    draw_rectangle_lines(panel.x, panel.y, panel.w, panel.h, 3.0, SNAKE_HEAD);

    let cx = sw * 0.5;
    centered_text("GAME OVER", cx, sh * 0.18 + 44.0, 40, SNAKE_HEAD);
    if let Some(result) = &hud.result {
        centered_text(result.message(), cx, sh * 0.18 + 80.0, 20, INK);
        let score = if result.new_best { format!("{} (NEW!)", result.score) } else { result.score.to_string() };
        centered_text(&score, cx, sh * 0.18 + 130.0, 44, INK);
        centered_text(&format!("Best {}", result.high_score), cx, sh * 0.18 + 162.0, 22, INK);
    }

    for (b, rect) in &layout.buttons {
        let label = match b {
            Button::Restart => "Play again",
            Button::Home => "Home",
            Button::Share => "Share",
            _ => continue,
        };
        let fill = if *b == Button::Restart { SNAKE_HEAD } else { BUTTON };
        let text = if *b == Button::Restart { WHITE } else { INK };
        button(*rect, label, fill, text);
    }

    let bottom = panel.y + panel.h;
    if let Some(status) = hud.status(now) {
        centered_text(status, cx, bottom - 40.0, 18, INK);
    }
    if let Some(text) = &hud.manual_text {
        for (i, line) in text.lines().enumerate() {
            centered_text(line, cx, bottom - 16.0 + i as f32 * 18.0, 16, INK);
        }
    }
}
