//! Bounded key hold
//!
//! A held key is re-pressed by a background task until the hold ends.
//! The task owns a release guard, so the key goes up exactly once however
//! the task is torn down: normal expiry, stop signal, or the caller being
//! dropped mid-hold.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::{ActionError, StopSignal};
use crate::platform::{InputDevice, KeyAction, Pointer};

/// Parameters of one hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldSpec {
    pub key: char,
    pub duration: Duration,
    /// Re-press interval
    pub tick: Duration,
    /// Horizontal pointer nudge applied every tick, 0 for none
    pub nudge_px: i32,
}

/// How a hold ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldOutcome {
    /// The full duration elapsed
    Completed,
    /// The stop signal cut the hold short
    Stopped,
}

/// Releases the key when dropped
struct KeyRelease {
    input: Arc<dyn InputDevice>,
    key: char,
}

impl Drop for KeyRelease {
    fn drop(&mut self) {
        if let Err(e) = self.input.key(self.key, KeyAction::Release) {
            log::error!("failed to release key `{}`: {}", self.key, e);
        }
    }
}

/// Aborts the task when dropped
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Hold `spec.key` for `spec.duration`, or until `stop` fires.
///
/// The key is released before this returns on every path. If this future
/// is dropped early, the background task is aborted and releases the key
/// as it unwinds.
pub async fn hold_key(
    input: Arc<dyn InputDevice>,
    pointer: Arc<Pointer>,
    spec: HoldSpec,
    stop: &StopSignal,
) -> Result<HoldOutcome, ActionError> {
    let mut task = AbortOnDrop(tokio::spawn(press_until_cancelled(input, pointer, spec)));

    let outcome = tokio::select! {
        _ = tokio::time::sleep(spec.duration) => HoldOutcome::Completed,
        _ = stop.stopped() => HoldOutcome::Stopped,
        ended = &mut task.0 => {
            // The press loop only ends on its own when input fails
            return match ended {
                Ok(Err(e)) => Err(e),
                Ok(Ok(())) => Err(ActionError::Hold("press loop ended early".to_string())),
                Err(e) => Err(ActionError::Hold(e.to_string())),
            };
        }
    };

    task.0.abort();
    // Wait for the task to unwind so the release has happened on return
    let _ = (&mut task.0).await;

    Ok(outcome)
}

async fn press_until_cancelled(
    input: Arc<dyn InputDevice>,
    pointer: Arc<Pointer>,
    spec: HoldSpec,
) -> Result<(), ActionError> {
    let _release = KeyRelease {
        input: input.clone(),
        key: spec.key,
    };

    loop {
        if spec.nudge_px != 0 {
            pointer.nudge(spec.nudge_px, 0).await?;
        }
        input.key(spec.key, KeyAction::Press)?;
        tokio::time::sleep(spec.tick).await;
    }
}
