//! Periodic schedules
//!
//! Each periodic behavior owns one [`PeriodicSchedule`] and re-arms it
//! with a freshly drawn interval every time it fires.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::IntervalRange;
use crate::stealth::Humanizer;

/// The independent behaviors of the timer strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Behavior {
    /// Toggle always-run so the character keeps moving
    SustainRun,
    /// Press interact
    Interact,
    /// Re-center the view and turn randomly
    RecenterTurn,
}

impl Behavior {
    pub const ALL: [Behavior; 3] = [
        Behavior::SustainRun,
        Behavior::Interact,
        Behavior::RecenterTurn,
    ];
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Behavior::SustainRun => "sustain-run",
            Behavior::Interact => "interact",
            Behavior::RecenterTurn => "recenter-turn",
        };
        f.write_str(name)
    }
}

/// Randomized re-arming timer state
#[derive(Debug, Clone)]
pub struct PeriodicSchedule {
    range: IntervalRange,
    next_fire_at: Option<Instant>,
}

impl PeriodicSchedule {
    pub fn new(range: IntervalRange) -> Self {
        Self {
            range,
            next_fire_at: None,
        }
    }

    pub fn range(&self) -> IntervalRange {
        self.range
    }

    /// When the schedule fires next, if armed
    pub fn next_fire_at(&self) -> Option<Instant> {
        self.next_fire_at
    }

    /// Draw a new interval from the range and arm relative to `now`.
    ///
    /// Returns the new firing time.
    pub fn rearm(&mut self, now: Instant, humanizer: &mut Humanizer) -> Instant {
        let interval = humanizer.sample(self.range);
        let at = now + interval;
        self.next_fire_at = Some(at);
        at
    }

    /// Time left until the next firing, zero if unarmed or overdue
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next_fire_at
            .map(|at| at.saturating_duration_since(now))
            .unwrap_or_default()
    }
}
