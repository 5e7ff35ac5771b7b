//! Sharing a finished round.
//!
//! Sharing only reads a [`RoundSummary`]; it never touches the session. A
//! payload is prepared once per result and then offered to a chain of
//! [`ShareChannel`]s, falling through on failure until one succeeds. When all
//! of them fail the text is handed back for the player to copy by hand.

use std::fs;
use std::path::PathBuf;

use log::{info, warn};
use thiserror::Error;

use crate::card::ResultCard;
use crate::session::RoundSummary;

pub const SHARE_LINK: &str = "https://moahub.co.kr";
pub const CARD_FILE_NAME: &str = "jelly-snake-score.bmp";

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("channel not available here")]
    Unsupported,
    #[error("share cancelled")]
    Cancelled,
    #[error("share i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("clipboard rejected the text: {0}")]
    Clipboard(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SharePayload {
    pub image: Vec<u8>,
    pub text: String,
    pub link: String,
}

impl SharePayload {
    pub fn prepare(summary: &RoundSummary) -> Self {
        let card = ResultCard::render(summary);
        Self {
            image: card.to_bmp(),
            text: format!("I scored {} points in Jelly Snake! ({})", summary.score, summary.message()),
            link: SHARE_LINK.to_string(),
        }
    }

    /// Text plus link, for channels that only carry text.
    pub fn full_text(&self) -> String {
        format!("{}\n{}", self.text, self.link)
    }
}

/// Keeps the last prepared payload so repeated shares of the same result
/// skip re-rendering the card.
#[derive(Debug, Default)]
pub struct ShareCache {
    entry: Option<(RoundSummary, SharePayload)>,
}

impl ShareCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn payload(&mut self, summary: &RoundSummary) -> &SharePayload {
        if !matches!(&self.entry, Some((cached, _)) if cached == summary) {
            self.entry = None;
        }
        let (_, payload) = self.entry.get_or_insert_with(|| (summary.clone(), SharePayload::prepare(summary)));
        payload
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    Saved(PathBuf),
    Copied,
}

pub trait ShareChannel {
    fn name(&self) -> &'static str;
    fn deliver(&mut self, payload: &SharePayload) -> Result<Delivery, ShareError>;
}

/// Writes the card image to a directory.
#[derive(Clone, Debug)]
pub struct FileExport {
    dir: PathBuf,
}

impl FileExport {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ShareChannel for FileExport {
    fn name(&self) -> &'static str {
        "image export"
    }

    fn deliver(&mut self, payload: &SharePayload) -> Result<Delivery, ShareError> {
        if payload.image.is_empty() {
            return Err(ShareError::Unsupported);
        }
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(CARD_FILE_NAME);
        fs::write(&path, &payload.image)?;
        Ok(Delivery::Saved(path))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShareReport {
    Delivered { channel: &'static str, delivery: Delivery },
    Cancelled,
    /// Every channel failed; show this text for a manual copy.
    Manual(String),
}

impl ShareReport {
    /// Short status line for the game-over screen.
    pub fn status_text(&self) -> String {
        match self {
            ShareReport::Delivered { delivery: Delivery::Saved(path), .. } => {
                format!("Result card saved to {}", path.display())
            }
            ShareReport::Delivered { delivery: Delivery::Copied, .. } => "Result copied to clipboard!".to_string(),
            ShareReport::Cancelled => String::new(),
            ShareReport::Manual(_) => "Copy the text below to share".to_string(),
        }
    }
}

pub fn share(channels: &mut [Box<dyn ShareChannel>], payload: &SharePayload) -> ShareReport {
    for channel in channels.iter_mut() {
        match channel.deliver(payload) {
            Ok(delivery) => {
                info!("shared via {}", channel.name());
                return ShareReport::Delivered { channel: channel.name(), delivery };
            }
            Err(ShareError::Cancelled) => {
                info!("share cancelled in {}", channel.name());
                return ShareReport::Cancelled;
            }
            Err(e) => warn!("{} failed, trying next: {e}", channel.name()),
        }
    }
    ShareReport::Manual(payload.full_text())
}
