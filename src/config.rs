use std::env;
use std::path::PathBuf;

use log::LevelFilter;

pub const SAVE_ENV: &str = "JELLY_SNAKE_SAVE";
pub const SEED_ENV: &str = "JELLY_SNAKE_SEED";
pub const LOG_ENV: &str = "JELLY_SNAKE_LOG";
pub const SHARE_DIR_ENV: &str = "JELLY_SNAKE_SHARE_DIR";

const DEFAULT_SAVE: &str = "jelly_snake_save.json";

/// Startup options, taken from the environment.
#[derive(Clone, Debug, PartialEq)]
pub struct LaunchConfig {
    pub save_path: PathBuf,
    pub seed: Option<u64>,
    pub log_level: LevelFilter,
    pub share_dir: PathBuf,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            save_path: PathBuf::from(DEFAULT_SAVE),
            seed: None,
            log_level: LevelFilter::Info,
            share_dir: PathBuf::from("."),
        }
    }
}

impl LaunchConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any variable source. Unparsable values keep the
    /// default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(path) = lookup(SAVE_ENV).filter(|p| !p.trim().is_empty()) {
            config.save_path = PathBuf::from(path);
        }
        if let Some(seed) = lookup(SEED_ENV) {
            config.seed = seed.trim().parse().ok();
        }
        if let Some(level) = lookup(LOG_ENV) {
            config.log_level = level.trim().parse().unwrap_or(LevelFilter::Info);
        }
        if let Some(dir) = lookup(SHARE_DIR_ENV).filter(|d| !d.trim().is_empty()) {
            config.share_dir = PathBuf::from(dir);
        }
        config
    }
}
