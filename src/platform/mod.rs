//! Platform capability layer
//!
//! The core never talks to the OS directly. Everything it needs from the
//! desktop goes through the three traits here: simulated input, screen
//! capture and window/process lookup. `desktop` binds them to real
//! devices, `testing` provides recording fakes.

pub mod desktop;
pub mod input;

#[cfg(test)]
pub(crate) mod testing;

use image::RgbaImage;

pub use desktop::{DesktopInput, DesktopScreen, DesktopWindows};
pub use input::Pointer;

/// How a key signal is emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Release,
    Tap,
}

/// Screen rectangle in absolute pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Keyboard and pointer simulation
///
/// Calls must return quickly; anything spread over time (smooth moves,
/// held keys) is driven by the caller.
pub trait InputDevice: Send + Sync {
    fn key(&self, key: char, action: KeyAction) -> Result<(), PlatformError>;
    fn move_pointer(&self, x: i32, y: i32) -> Result<(), PlatformError>;
    fn pointer_position(&self) -> Result<(i32, i32), PlatformError>;
}

/// Screen capture
pub trait ScreenSource: Send + Sync {
    fn capture(&self, region: Region) -> Result<RgbaImage, PlatformError>;
}

/// Native window and process lookup
pub trait WindowSystem {
    /// Top-level window whose title matches exactly
    fn find_window(&self, title: &str) -> Result<Option<u64>, PlatformError>;
    /// Process ids whose executable name matches
    fn process_ids(&self, executable: &str) -> Result<Vec<u32>, PlatformError>;
    /// Top-left corner of the main window of `pid`
    fn window_origin(&self, pid: u32) -> Result<(i32, i32), PlatformError>;
    /// Bring the window to the foreground
    fn activate(&self, handle: u64) -> Result<(), PlatformError>;
}

/// Platform errors
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("input simulation failed: {0}")]
    Input(String),
    #[error("screen capture failed: {0}")]
    Capture(String),
    #[error("window lookup failed: {0}")]
    Window(String),
    #[error("no window found for process {0}")]
    NoWindowForProcess(u32),
}
