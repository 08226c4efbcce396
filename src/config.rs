//! Puzzle configuration.

use crate::games::hanoi::{DiskBounds, MAX_SUPPORTED_DISKS};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Configuration for puzzle sessions.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct PuzzleConfig {
    /// Smallest disk count a new puzzle may use.
    #[serde(default = "default_min_disks")]
    min_disks: u8,

    /// Largest disk count a new puzzle may use.
    #[serde(default = "default_max_disks")]
    max_disks: u8,

    /// Pause between solver moves, in milliseconds.
    #[serde(default = "default_step_delay_ms")]
    step_delay_ms: u64,
}

#[instrument]
fn default_min_disks() -> u8 {
    2
}

#[instrument]
fn default_max_disks() -> u8 {
    8
}

#[instrument]
fn default_step_delay_ms() -> u64 {
    500
}

impl PuzzleConfig {
    /// Creates a validated configuration.
    #[instrument]
    pub fn new(min_disks: u8, max_disks: u8, step_delay_ms: u64) -> Result<Self, ConfigError> {
        let config = Self {
            min_disks,
            max_disks,
            step_delay_ms,
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// Missing keys fall back to their defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(
            min_disks = config.min_disks,
            max_disks = config.max_disks,
            step_delay_ms = config.step_delay_ms,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Returns a copy with a different solver delay.
    pub fn with_step_delay_ms(mut self, step_delay_ms: u64) -> Self {
        self.step_delay_ms = step_delay_ms;
        self
    }

    /// Disk-count bounds for new puzzles.
    pub fn disk_bounds(&self) -> DiskBounds {
        DiskBounds::new(self.min_disks, self.max_disks)
    }

    /// Pause between solver moves.
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    #[track_caller]
    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_disks == 0 {
            return Err(ConfigError::new("min_disks must be at least 1".to_string()));
        }
        if self.min_disks > self.max_disks {
            return Err(ConfigError::new(format!(
                "min_disks ({}) exceeds max_disks ({})",
                self.min_disks, self.max_disks
            )));
        }
        if self.max_disks > MAX_SUPPORTED_DISKS {
            return Err(ConfigError::new(format!(
                "max_disks ({}) exceeds the supported maximum of {}",
                self.max_disks, MAX_SUPPORTED_DISKS
            )));
        }
        Ok(())
    }
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            min_disks: default_min_disks(),
            max_disks: default_max_disks(),
            step_delay_ms: default_step_delay_ms(),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
