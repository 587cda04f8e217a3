//! Timer strategy
//!
//! Three periodic behaviors (always-run toggle, interact, re-center and
//! turn) each run in their own task with their own schedule. They share
//! nothing but the stop signal, so a slow firing of one never delays the
//! others.

use std::sync::Arc;

use tokio::task::JoinSet;
use tokio::time::Instant;

use super::actor::Actor;
use super::schedule::{Behavior, PeriodicSchedule};
use crate::config::TimerSettings;
use crate::stealth::Humanizer;

/// How many times each behavior fired before the loop stopped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    pub sustain_run: u64,
    pub interact: u64,
    pub recenter_turn: u64,
}

impl LoopSummary {
    fn record(&mut self, behavior: Behavior, fired: u64) {
        match behavior {
            Behavior::SustainRun => self.sustain_run = fired,
            Behavior::Interact => self.interact = fired,
            Behavior::RecenterTurn => self.recenter_turn = fired,
        }
    }
}

/// The persistent timer-driven action loop
pub struct ActionLoop {
    actor: Arc<Actor>,
    timers: TimerSettings,
}

impl ActionLoop {
    pub fn new(actor: Arc<Actor>, timers: TimerSettings) -> Self {
        Self { actor, timers }
    }

    fn range_for(&self, behavior: Behavior) -> crate::config::IntervalRange {
        match behavior {
            Behavior::SustainRun => self.timers.sustain_run,
            Behavior::Interact => self.timers.interact,
            Behavior::RecenterTurn => self.timers.recenter_turn,
        }
    }

    /// Start all behaviors and run until the actor's stop signal fires.
    ///
    /// Each behavior draws from its own fork of `humanizer`.
    pub async fn run(&self, humanizer: &mut Humanizer) -> LoopSummary {
        let mut tasks = JoinSet::new();

        for behavior in Behavior::ALL {
            let schedule = PeriodicSchedule::new(self.range_for(behavior));
            tasks.spawn(drive(
                self.actor.clone(),
                behavior,
                schedule,
                humanizer.fork(),
            ));
        }
        log::info!("action loop started");

        let mut summary = LoopSummary::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((behavior, fired)) => {
                    log::debug!("{} stopped after {} firings", behavior, fired);
                    summary.record(behavior, fired);
                }
                Err(e) => log::error!("behavior task failed: {}", e),
            }
        }

        log::info!("action loop stopped");
        summary
    }
}

/// Fire `behavior` every time its schedule comes due, re-arming after each
/// firing, until stopped.
async fn drive(
    actor: Arc<Actor>,
    behavior: Behavior,
    mut schedule: PeriodicSchedule,
    mut humanizer: Humanizer,
) -> (Behavior, u64) {
    let stop = actor.stop_signal().clone();
    let mut fired = 0;

    loop {
        let deadline = schedule.rearm(Instant::now(), &mut humanizer);
        log::debug!(
            "{} armed for {} ms",
            behavior,
            schedule.remaining(Instant::now()).as_millis()
        );

        tokio::select! {
            _ = stop.stopped() => break,
            _ = tokio::time::sleep_until(deadline) => {}
        }

        if let Err(e) = actor.fire(behavior, &mut humanizer).await {
            log::error!("{} failed: {}", behavior, e);
        }
        fired += 1;
    }

    (behavior, fired)
}
