//! Configuration module
//!
//! Compiled-in defaults for the target game, timers, movement and
//! recognition, with an optional JSON override file.

pub mod settings;

pub use settings::{
    ActionBitmapSpec, IntervalRange, KeyBindings, MovementSettings, RecognitionSettings,
    Settings, Strategy, TargetSettings, TimerSettings,
};

use std::path::PathBuf;

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid interval `{name}`: min {min_ms} ms must be below max {max_ms} ms")]
    InvalidInterval {
        name: &'static str,
        min_ms: u64,
        max_ms: u64,
    },
    #[error("match tolerance {0} is outside (0, 1]")]
    InvalidTolerance(f32),
    #[error("`{0}` must be greater than zero")]
    Zero(&'static str),
    #[error("`{name}` must be positive, got {value}")]
    NotPositive { name: &'static str, value: i32 },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
