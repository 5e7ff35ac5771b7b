use jelly_snake::Direction;
use jelly_snake::input::swipe_direction;
use macroquad::prelude::*;

use super::layout::{Button, Layout};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Control {
    Intent(Direction),
    Press(Button),
    /// Enter: start from the intro, restart after a game over.
    Confirm,
    /// Escape: back to the intro.
    Back,
    Quit,
}

/// Remembers where a drag began so its release can be read as a swipe.
#[derive(Default)]
pub struct SwipeTracker {
    start: Option<(f32, f32)>,
}

const KEY_INTENTS: [(KeyCode, Direction); 8] = [
    (KeyCode::Up, Direction::Up),
    (KeyCode::W, Direction::Up),
    (KeyCode::Down, Direction::Down),
    (KeyCode::S, Direction::Down),
    (KeyCode::Left, Direction::Left),
    (KeyCode::A, Direction::Left),
    (KeyCode::Right, Direction::Right),
    (KeyCode::D, Direction::Right),
];

const LEVEL_KEYS: [KeyCode; 5] = [KeyCode::Key1, KeyCode::Key2, KeyCode::Key3, KeyCode::Key4, KeyCode::Key5];

pub fn poll(layout: &Layout, swipe: &mut SwipeTracker) -> Vec<Control> {
    let mut controls = Vec::new();

    for (key, dir) in KEY_INTENTS {
        if is_key_pressed(key) {
            controls.push(Control::Intent(dir));
        }
    }
    for (i, key) in LEVEL_KEYS.into_iter().enumerate() {
        if is_key_pressed(key) {
            controls.push(Control::Press(Button::Level(i as u8 + 1)));
        }
    }
    if is_key_pressed(KeyCode::Space) {
        controls.push(Control::Press(Button::Pause));
    }
    if is_key_pressed(KeyCode::Enter) {
        controls.push(Control::Confirm);
    }
    if is_key_pressed(KeyCode::Escape) {
        controls.push(Control::Back);
    }
    if is_key_pressed(KeyCode::Q) {
        controls.push(Control::Quit);
    }

    // Touches arrive as simulated mouse events.
    let pos = mouse_position();
    if is_mouse_button_pressed(MouseButton::Left) {
        match layout.hit(pos.0, pos.1) {
            Some(button) => {
                swipe.start = None;
                controls.push(Control::Press(button));
            }
            None => swipe.start = Some(pos),
        }
    }
    if is_mouse_button_released(MouseButton::Left) {
        if let Some(start) = swipe.start.take() {
            if let Some(dir) = swipe_direction(start, pos) {
                controls.push(Control::Intent(dir));
            }
        }
    }

    controls
}
