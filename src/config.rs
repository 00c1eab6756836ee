//! Host configuration, loaded from environment variables.
//!
//! Unset or unparsable variables fall back to their defaults with a `warn`
//! log. Values that parse but make no sense (a zero frame interval, a
//! non-positive zoom) are rejected with [`ConfigError`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::time::Duration;

use timeline::config::TimelineConfig;
use timeline::consts::PIXELS_PER_SECOND;
use tracing::warn;

const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("QUICKBOARD_FRAME_INTERVAL_MS must be at least 1")]
    ZeroFrameInterval,
    #[error("QUICKBOARD_PIXELS_PER_SECOND must be a positive number, got {0}")]
    InvalidPixelsPerSecond(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    /// How often the playback runner delivers frames.
    pub frame_interval_ms: u64,
    pub pixels_per_second: f64,
    /// Where the last-used directory is remembered between runs.
    pub settings_path: PathBuf,
    /// Fallback directory for new documents.
    pub documents_dir: PathBuf,
}

impl HostConfig {
    /// Read `QUICKBOARD_*` variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value parses but is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        let home = std::env::var_os("HOME").map_or_else(|| PathBuf::from("."), PathBuf::from);
        let config = Self {
            frame_interval_ms: env_parse("QUICKBOARD_FRAME_INTERVAL_MS", DEFAULT_FRAME_INTERVAL_MS),
            pixels_per_second: env_parse("QUICKBOARD_PIXELS_PER_SECOND", PIXELS_PER_SECOND),
            settings_path: env_path("QUICKBOARD_SETTINGS_PATH")
                .unwrap_or_else(|| home.join(".config").join("quickboard").join(SETTINGS_FILE)),
            documents_dir: env_path("QUICKBOARD_DOCUMENTS_DIR").unwrap_or_else(|| home.join("Documents")),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot drive playback.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range field as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::ZeroFrameInterval);
        }
        if !self.pixels_per_second.is_finite() || self.pixels_per_second <= 0.0 {
            return Err(ConfigError::InvalidPixelsPerSecond(self.pixels_per_second));
        }
        Ok(())
    }

    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// Core tunables with this host's zoom applied.
    #[must_use]
    pub fn timeline(&self) -> TimelineConfig {
        TimelineConfig::default().with_pixels_per_second(self.pixels_per_second)
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    let Ok(raw) = std::env::var(key) else {
        return default;
    };
    if let Ok(value) = raw.trim().parse::<T>() {
        return value;
    }
    warn!(key, value = %raw, "ignoring unparsable environment value");
    default
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key).filter(|v| !v.is_empty()).map(PathBuf::from)
}
