//! Configuration loading for mazelab

use std::path::Path;

use serde::Deserialize;

use crate::{
    error::{LabError, Result},
    generators::Generator,
    maze::Grid,
    solvers::{Family, RobotLimits},
};

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    pub maze: MazeConfig,
    pub race: RaceConfig,
    pub playback: PlaybackConfig,
    pub robot: RobotLimits,
    pub logging: LoggingConfig,
}

/// Maze generation settings
#[derive(Clone, Debug, Deserialize)]
pub struct MazeConfig {
    /// Side length of the square grid, odd and at least 5 (default: 21)
    #[serde(default = "default_size")]
    pub size: u16,

    /// Generation algorithm (default: recursive backtracker)
    #[serde(default)]
    pub generator: Generator,

    /// Seed for every random choice; OS entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,

    /// Loop-creating openings punched before a robot race (default: 6)
    #[serde(default = "default_extra_openings")]
    pub extra_openings: usize,
}

/// Which solvers race once the maze is carved
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RaceConfig {
    #[serde(default)]
    pub family: Family,
}

/// Animation timing and rewind depth
#[derive(Clone, Debug, Deserialize)]
pub struct PlaybackConfig {
    /// Time between steps in milliseconds (default: 50)
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Fastest allowed interval (default: 1)
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,

    /// Slowest allowed interval (default: 1000)
    #[serde(default = "default_max_interval_ms")]
    pub max_interval_ms: u64,

    /// States kept for stepping back (default: 10000)
    #[serde(default = "default_max_history")]
    pub max_history: usize,
}

/// Log file output
#[derive(Clone, Debug, Deserialize)]
pub struct LoggingConfig {
    /// Directory for rolling log files (default: logs)
    #[serde(default = "default_log_directory")]
    pub directory: String,

    /// Log file name prefix (default: mazelab.log)
    #[serde(default = "default_log_prefix")]
    pub file_prefix: String,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            generator: Generator::default(),
            seed: None,
            extra_openings: default_extra_openings(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            min_interval_ms: default_min_interval_ms(),
            max_interval_ms: default_max_interval_ms(),
            max_history: default_max_history(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_log_directory(),
            file_prefix: default_log_prefix(),
        }
    }
}

// Default value functions
fn default_size() -> u16 {
    21
}
fn default_extra_openings() -> usize {
    6
}
fn default_interval_ms() -> u64 {
    50
}
fn default_min_interval_ms() -> u64 {
    1
}
fn default_max_interval_ms() -> u64 {
    1000
}
fn default_max_history() -> usize {
    10000
}
fn default_log_directory() -> String {
    "logs".to_string()
}
fn default_log_prefix() -> String {
    "mazelab.log".to_string()
}

impl LabConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LabError::Config(format!("Failed to read config file: {}", e)))?;
        Self::parse(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: LabConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        Grid::validate_size(self.maze.size)?;
        if self.playback.min_interval_ms > self.playback.max_interval_ms {
            return Err(LabError::Config(format!(
                "min_interval_ms ({}) exceeds max_interval_ms ({})",
                self.playback.min_interval_ms, self.playback.max_interval_ms
            )));
        }
        Ok(())
    }
}
