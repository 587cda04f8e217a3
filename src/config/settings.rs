//! Gatherer settings
//!
//! Every knob the bot uses, with the values tuned for New World at
//! 1920x1080 compiled in as defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Main settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Game window and process to attach to
    pub target: TargetSettings,
    /// Reference image used to recognize the interact prompt
    pub action_bitmap: ActionBitmapSpec,
    /// Periodic behaviors of the timer strategy
    pub timers: TimerSettings,
    /// Running and turning
    pub movement: MovementSettings,
    /// Screen scanning and cooldowns
    pub recognition: RecognitionSettings,
    /// Key bindings used in game
    pub keys: KeyBindings,
    /// Gathering strategy run by default
    pub strategy: Strategy,
    /// Fixed RNG seed, for reproducible runs
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target: TargetSettings::default(),
            action_bitmap: ActionBitmapSpec::default(),
            timers: TimerSettings::default(),
            movement: MovementSettings::default(),
            recognition: RecognitionSettings::default(),
            keys: KeyBindings::default(),
            strategy: Strategy::Timers,
            seed: None,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check every invariant the runtime relies on.
    ///
    /// Interval sampling assumes `min < max`, so this must succeed before
    /// any schedule is armed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target.width == 0 {
            return Err(ConfigError::Zero("target.width"));
        }
        if self.target.height == 0 {
            return Err(ConfigError::Zero("target.height"));
        }

        self.action_bitmap.validate()?;

        self.timers.sustain_run.validate("timers.sustain_run")?;
        self.timers.interact.validate("timers.interact")?;
        self.timers.recenter_turn.validate("timers.recenter_turn")?;

        self.movement.run_duration.validate("movement.run_duration")?;
        positive("movement.run_turn_gap_max", self.movement.run_turn_gap_max)?;
        positive("movement.turn_gap_max", self.movement.turn_gap_max)?;
        positive("movement.glide_step_px", self.movement.glide_step_px)?;
        if self.movement.hold_tick_ms == 0 {
            return Err(ConfigError::Zero("movement.hold_tick_ms"));
        }
        if self.movement.glide_step_ms == 0 {
            return Err(ConfigError::Zero("movement.glide_step_ms"));
        }

        self.recognition.cooldown.validate("recognition.cooldown")?;

        Ok(())
    }
}

fn positive(name: &'static str, value: i32) -> Result<(), ConfigError> {
    if value > 0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

/// Target application identity and its fixed resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetSettings {
    /// Exact title of the top-level game window
    pub window_title: String,
    /// Executable name of the game process
    pub process_name: String,
    /// Game resolution width (not introspected)
    pub width: u32,
    /// Game resolution height (not introspected)
    pub height: u32,
}

impl Default for TargetSettings {
    fn default() -> Self {
        Self {
            window_title: "New World".to_string(),
            process_name: "NewWorld.exe".to_string(),
            width: 1920,
            height: 1080,
        }
    }
}

/// Reference image for the interact prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionBitmapSpec {
    /// Path of the reference PNG
    pub image_path: PathBuf,
    /// Allowed dissimilarity, in (0, 1]
    pub match_tolerance: f32,
}

impl Default for ActionBitmapSpec {
    fn default() -> Self {
        Self {
            // Part of the action square; the bare "E" glyph matched too loosely.
            image_path: PathBuf::from("action_side_1920x1080.png"),
            match_tolerance: 0.4,
        }
    }
}

impl ActionBitmapSpec {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tolerance = self.match_tolerance;
        if tolerance > 0.0 && tolerance <= 1.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidTolerance(tolerance))
        }
    }
}

/// Half-open millisecond range `[min_ms, max_ms)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl IntervalRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.min_ms < self.max_ms {
            Ok(())
        } else {
            Err(ConfigError::InvalidInterval {
                name,
                min_ms: self.min_ms,
                max_ms: self.max_ms,
            })
        }
    }

    /// Whether `ms` falls inside the range
    pub fn contains(&self, ms: u64) -> bool {
        (self.min_ms..self.max_ms).contains(&ms)
    }
}

/// Re-arm ranges of the three periodic behaviors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerSettings {
    /// Toggle always-run
    pub sustain_run: IntervalRange,
    /// Press interact
    pub interact: IntervalRange,
    /// Re-center the view and turn randomly
    pub recenter_turn: IntervalRange,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            sustain_run: IntervalRange::new(4000, 8000),
            interact: IntervalRange::new(800, 1500),
            recenter_turn: IntervalRange::new(1500, 6000),
        }
    }
}

/// Running and turning parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementSettings {
    /// How long a randomized run holds the forward key
    pub run_duration: IntervalRange,
    /// Exclusive upper bound of the per-tick turn while running, in pixels
    pub run_turn_gap_max: i32,
    /// Exclusive upper bound of a random turn, in pixels
    pub turn_gap_max: i32,
    /// View re-center point, relative to the window origin
    pub center_point: (i32, i32),
    /// Re-press interval of a held key
    pub hold_tick_ms: u64,
    /// Pixels covered per step of a smooth pointer move
    pub glide_step_px: i32,
    /// Delay between smooth move steps
    pub glide_step_ms: u64,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            run_duration: IntervalRange::new(1500, 4500),
            run_turn_gap_max: 30,
            turn_gap_max: 300,
            center_point: (500, 600),
            hold_tick_ms: 10,
            glide_step_px: 8,
            glide_step_ms: 4,
        }
    }
}

/// Screen scanning parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionSettings {
    /// Wait before capturing, so the frame reflects the latest movement
    pub capture_lag_ms: u64,
    /// Wait after a successful interact before scanning again
    pub cooldown: IntervalRange,
    /// Wait between a movement and the first scan
    pub settle_ms: u64,
}

impl Default for RecognitionSettings {
    fn default() -> Self {
        Self {
            capture_lag_ms: 400,
            cooldown: IntervalRange::new(4000, 9000),
            settle_ms: 800,
        }
    }
}

/// In-game key bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub always_run: char,
    pub interact: char,
    pub forward: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            always_run: '=',
            interact: 'e',
            forward: 'w',
        }
    }
}

/// Gathering strategy
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Three independent randomized timers (always-run, interact, turn)
    #[default]
    Timers,
    /// Turn randomly, then interact while the prompt is on screen
    TurnAndScan,
    /// Run randomly, then interact while the prompt is on screen
    RunAndScan,
}
