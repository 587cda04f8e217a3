//! Action engine
//!
//! Turns randomized decisions into timed input: the periodic timer
//! strategy, the one-shot run/turn/interact sequences and the scan-based
//! strategies built from them.

pub mod action_loop;
pub mod actor;
pub mod hold;
pub mod schedule;
pub mod stop;
pub mod strategy;

pub use action_loop::{ActionLoop, LoopSummary};
pub use actor::Actor;
pub use hold::{hold_key, HoldOutcome, HoldSpec};
pub use schedule::{Behavior, PeriodicSchedule};
pub use stop::StopSignal;
pub use strategy::{run_and_scan, scan_until_stopped, turn_and_scan};

use crate::platform::PlatformError;
use crate::vision::VisionError;

/// Errors raised while performing an action
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    Vision(#[from] VisionError),
    #[error("key hold failed: {0}")]
    Hold(String),
}
