//! Resolved target window

use crate::platform::Region;

/// Identifiers and geometry of the game window.
///
/// Built once by [`locate_target`](super::locate_target) and never
/// modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowContext {
    pub process_id: u32,
    pub window_handle: u64,
    pub origin_x: i32,
    pub origin_y: i32,
    pub width: u32,
    pub height: u32,
}

impl WindowContext {
    /// Whole window as a screen region
    pub fn region(&self) -> Region {
        Region {
            x: self.origin_x,
            y: self.origin_y,
            width: self.width,
            height: self.height,
        }
    }

    /// Convert window-relative coordinates to screen coordinates
    pub fn to_screen(&self, x: i32, y: i32) -> (i32, i32) {
        (self.origin_x + x, self.origin_y + y)
    }
}
