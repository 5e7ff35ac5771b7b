use jelly_snake::share::{Delivery, ShareChannel, ShareError, SharePayload};
use macroquad::miniquad::window::clipboard_set;

/// Copies the share text and link to the system clipboard.
pub struct WindowClipboard;

impl ShareChannel for WindowClipboard {
    fn name(&self) -> &'static str {
        "clipboard"
    }

    fn deliver(&mut self, payload: &SharePayload) -> Result<Delivery, ShareError> {
        let text = payload.full_text();
        if text.trim().is_empty() {
            return Err(ShareError::Clipboard("nothing to copy".to_string()));
        }
        clipboard_set(&text);
        Ok(Delivery::Copied)
    }
}
