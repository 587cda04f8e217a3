//! Target locator
//!
//! Resolves the game window and process once, before anything else runs.

use crate::config::TargetSettings;
use crate::platform::{PlatformError, WindowSystem};

use super::WindowContext;

/// Why the game could not be located. Every variant is fatal.
#[derive(Debug, thiserror::Error)]
pub enum LocateError {
    #[error("application `{0}` not found: no window with that title")]
    WindowNotFound(String),
    #[error("application process `{0}` not found")]
    ProcessNotFound(String),
    #[error("application `{name}` is ambiguous: {count} matching processes {pids:?}")]
    AmbiguousProcess {
        name: String,
        count: usize,
        pids: Vec<u32>,
    },
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Find the game window and its single process.
///
/// Width and height come from the configured resolution rather than the
/// window itself.
pub fn locate_target(
    windows: &dyn WindowSystem,
    target: &TargetSettings,
) -> Result<WindowContext, LocateError> {
    let handle = windows
        .find_window(&target.window_title)?
        .filter(|&handle| handle != 0)
        .ok_or_else(|| LocateError::WindowNotFound(target.window_title.clone()))?;

    let pids = windows.process_ids(&target.process_name)?;
    let pid = match pids.len() {
        0 => return Err(LocateError::ProcessNotFound(target.process_name.clone())),
        1 => pids[0],
        count => {
            return Err(LocateError::AmbiguousProcess {
                name: target.process_name.clone(),
                count,
                pids,
            })
        }
    };

    let (origin_x, origin_y) = windows.window_origin(pid)?;
    log::info!(
        "`{}` found, pid: `{}`, geometry rect is: left: `{}`, top: `{}`",
        target.window_title,
        pid,
        origin_x,
        origin_y
    );

    Ok(WindowContext {
        process_id: pid,
        window_handle: handle,
        origin_x,
        origin_y,
        width: target.width,
        height: target.height,
    })
}
