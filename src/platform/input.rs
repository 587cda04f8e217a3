//! Pointer movement
//!
//! Wraps an [`InputDevice`] with absolute, relative and smoothed moves.
//! All moves go through one lock so a glide is never interleaved with
//! another writer.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use super::{InputDevice, PlatformError};
use crate::config::MovementSettings;

/// Serialized access to the OS pointer
pub struct Pointer {
    device: Arc<dyn InputDevice>,
    /// Pixels per glide step
    step_px: i32,
    /// Delay between glide steps
    step_delay: Duration,
    lock: Mutex<()>,
}

impl Pointer {
    pub fn new(device: Arc<dyn InputDevice>, step_px: i32, step_delay: Duration) -> Self {
        Self {
            device,
            step_px: step_px.max(1),
            step_delay,
            lock: Mutex::new(()),
        }
    }

    pub fn from_settings(device: Arc<dyn InputDevice>, movement: &MovementSettings) -> Self {
        Self::new(
            device,
            movement.glide_step_px,
            Duration::from_millis(movement.glide_step_ms),
        )
    }

    /// Move to absolute coordinates in one step
    pub async fn jump_to(&self, x: i32, y: i32) -> Result<(), PlatformError> {
        let _guard = self.lock.lock().await;
        self.device.move_pointer(x, y)
    }

    /// Move relative to the current position in one step
    pub async fn nudge(&self, dx: i32, dy: i32) -> Result<(), PlatformError> {
        let _guard = self.lock.lock().await;
        let (x, y) = self.device.pointer_position()?;
        self.device.move_pointer(x + dx, y + dy)
    }

    /// Move relative to the current position, smoothed over time
    pub async fn glide_by(&self, dx: i32, dy: i32) -> Result<(), PlatformError> {
        let _guard = self.lock.lock().await;
        let from = self.device.pointer_position()?;
        self.glide_locked(from, (from.0 + dx, from.1 + dy)).await
    }

    /// Move to absolute coordinates, smoothed over time
    pub async fn glide_to(&self, x: i32, y: i32) -> Result<(), PlatformError> {
        let _guard = self.lock.lock().await;
        let from = self.device.pointer_position()?;
        self.glide_locked(from, (x, y)).await
    }

    async fn glide_locked(&self, from: (i32, i32), to: (i32, i32)) -> Result<(), PlatformError> {
        let path = glide_path(from, to, self.step_px);
        let last = path.len().saturating_sub(1);

        for (i, (x, y)) in path.into_iter().enumerate() {
            self.device.move_pointer(x, y)?;
            if i < last {
                tokio::time::sleep(self.step_delay).await;
            }
        }

        Ok(())
    }
}

/// Intermediate points from `from` (exclusive) to `to` (inclusive).
///
/// The longer axis advances by at most `step_px` per point. A zero-length
/// move yields no points.
pub fn glide_path(from: (i32, i32), to: (i32, i32), step_px: i32) -> Vec<(i32, i32)> {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let distance = dx.abs().max(dy.abs());
    if distance == 0 {
        return Vec::new();
    }

    let step_px = step_px.max(1);
    let steps = (distance + step_px - 1) / step_px;

    (1..=steps)
        .map(|i| (from.0 + dx * i / steps, from.1 + dy * i / steps))
        .collect()
}
