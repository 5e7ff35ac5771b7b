pub mod clipboard;
pub mod controls;
pub mod draw;
pub mod hud;
pub mod layout;
pub mod sound;
