//! Desktop bindings for the platform traits
//!
//! Input goes through `enigo`, screen capture and window enumeration
//! through `xcap`. Process lookup by executable name and bringing a
//! window to the foreground go through the Win32 API on Windows, where
//! the game runs.

use std::sync::Mutex;

use enigo::{Coordinate, Direction, Enigo, Key, Keyboard, Mouse};
use image::RgbaImage;

use super::{InputDevice, KeyAction, PlatformError, Region, ScreenSource, WindowSystem};

/// Keyboard and mouse simulation via `enigo`
pub struct DesktopInput {
    enigo: Mutex<Enigo>,
}

impl DesktopInput {
    pub fn new() -> Result<Self, PlatformError> {
        let enigo = Enigo::new(&enigo::Settings::default())
            .map_err(|e| PlatformError::Input(e.to_string()))?;

        Ok(Self {
            enigo: Mutex::new(enigo),
        })
    }

    fn with_enigo<T>(
        &self,
        f: impl FnOnce(&mut Enigo) -> enigo::InputResult<T>,
    ) -> Result<T, PlatformError> {
        let mut enigo = self
            .enigo
            .lock()
            .map_err(|_| PlatformError::Input("input device lock poisoned".to_string()))?;

        f(&mut enigo).map_err(|e| PlatformError::Input(e.to_string()))
    }
}

impl InputDevice for DesktopInput {
    fn key(&self, key: char, action: KeyAction) -> Result<(), PlatformError> {
        let direction = match action {
            KeyAction::Press => Direction::Press,
            KeyAction::Release => Direction::Release,
            KeyAction::Tap => Direction::Click,
        };

        self.with_enigo(|enigo| enigo.key(Key::Unicode(key), direction))
    }

    fn move_pointer(&self, x: i32, y: i32) -> Result<(), PlatformError> {
        self.with_enigo(|enigo| enigo.move_mouse(x, y, Coordinate::Abs))
    }

    fn pointer_position(&self) -> Result<(i32, i32), PlatformError> {
        self.with_enigo(|enigo| enigo.location())
    }
}

/// Screen capture via `xcap`
///
/// Captures the monitor containing the region origin and crops it.
#[derive(Debug, Default)]
pub struct DesktopScreen;

impl ScreenSource for DesktopScreen {
    fn capture(&self, region: Region) -> Result<RgbaImage, PlatformError> {
        let capture_err = |e: xcap::XCapError| PlatformError::Capture(e.to_string());

        let monitor = xcap::Monitor::from_point(region.x, region.y).map_err(capture_err)?;
        let monitor_x = monitor.x().map_err(capture_err)?;
        let monitor_y = monitor.y().map_err(capture_err)?;
        let frame = monitor.capture_image().map_err(capture_err)?;

        let x = (region.x - monitor_x).max(0) as u32;
        let y = (region.y - monitor_y).max(0) as u32;
        if x >= frame.width() || y >= frame.height() {
            return Err(PlatformError::Capture(format!(
                "region {:?} lies outside the monitor",
                region
            )));
        }

        let width = region.width.min(frame.width() - x);
        let height = region.height.min(frame.height() - y);

        Ok(image::imageops::crop_imm(&frame, x, y, width, height).to_image())
    }
}

/// Window and process lookup via `xcap`
#[derive(Debug, Default)]
pub struct DesktopWindows;

impl DesktopWindows {
    fn windows() -> Result<Vec<xcap::Window>, PlatformError> {
        xcap::Window::all().map_err(|e| PlatformError::Window(e.to_string()))
    }
}

impl WindowSystem for DesktopWindows {
    fn find_window(&self, title: &str) -> Result<Option<u64>, PlatformError> {
        for window in Self::windows()? {
            if window.title().is_ok_and(|t| t == title) {
                let id = window
                    .id()
                    .map_err(|e| PlatformError::Window(e.to_string()))?;
                return Ok(Some(u64::from(id)));
            }
        }

        Ok(None)
    }

    fn process_ids(&self, executable: &str) -> Result<Vec<u32>, PlatformError> {
        Ok(pids_matching(running_processes()?, executable))
    }

    fn window_origin(&self, pid: u32) -> Result<(i32, i32), PlatformError> {
        let window = Self::windows()?
            .into_iter()
            .find(|w| w.pid().is_ok_and(|p| p == pid))
            .ok_or(PlatformError::NoWindowForProcess(pid))?;

        let x = window.x().map_err(|e| PlatformError::Window(e.to_string()))?;
        let y = window.y().map_err(|e| PlatformError::Window(e.to_string()))?;
        Ok((x, y))
    }

    #[cfg(target_os = "windows")]
    fn activate(&self, handle: u64) -> Result<(), PlatformError> {
        use windows_sys::Win32::UI::WindowsAndMessaging::SetForegroundWindow;

        // xcap hands out the HWND value as the window id
        let ok = unsafe { SetForegroundWindow(handle as usize as *mut std::ffi::c_void) };
        if ok == 0 {
            return Err(PlatformError::Window(format!(
                "failed to bring window {:#x} to the foreground",
                handle
            )));
        }
        Ok(())
    }

    #[cfg(not(target_os = "windows"))]
    fn activate(&self, handle: u64) -> Result<(), PlatformError> {
        log::warn!(
            "window activation is not supported on this platform (window {:#x})",
            handle
        );
        Ok(())
    }
}

/// Running processes as `(pid, executable name)`
#[cfg(target_os = "windows")]
fn running_processes() -> Result<Vec<(u32, String)>, PlatformError> {
    use windows_sys::Win32::Foundation::{CloseHandle, INVALID_HANDLE_VALUE};
    use windows_sys::Win32::System::Diagnostics::ToolHelp::{
        CreateToolhelp32Snapshot, Process32FirstW, Process32NextW, PROCESSENTRY32W,
        TH32CS_SNAPPROCESS,
    };

    let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) };
    if snapshot == INVALID_HANDLE_VALUE {
        return Err(PlatformError::Window(
            "failed to snapshot running processes".to_string(),
        ));
    }

    let mut processes = Vec::new();
    let mut entry: PROCESSENTRY32W = unsafe { std::mem::zeroed() };
    entry.dwSize = std::mem::size_of::<PROCESSENTRY32W>() as u32;

    let mut more = unsafe { Process32FirstW(snapshot, &mut entry) } != 0;
    while more {
        let len = entry
            .szExeFile
            .iter()
            .position(|&c| c == 0)
            .unwrap_or(entry.szExeFile.len());
        processes.push((
            entry.th32ProcessID,
            String::from_utf16_lossy(&entry.szExeFile[..len]),
        ));
        more = unsafe { Process32NextW(snapshot, &mut entry) } != 0;
    }

    unsafe { CloseHandle(snapshot) };
    Ok(processes)
}

/// Running processes that own a window, named by their application name
#[cfg(not(target_os = "windows"))]
fn running_processes() -> Result<Vec<(u32, String)>, PlatformError> {
    Ok(DesktopWindows::windows()?
        .iter()
        .filter_map(|w| Some((w.pid().ok()?, w.app_name().ok()?)))
        .collect())
}

/// Sorted, deduplicated pids whose executable is `executable`
fn pids_matching(processes: Vec<(u32, String)>, executable: &str) -> Vec<u32> {
    let wanted = normalize_process_name(executable);

    let mut pids: Vec<u32> = processes
        .into_iter()
        .filter(|(_, name)| normalize_process_name(name) == wanted)
        .map(|(pid, _)| pid)
        .collect();
    pids.sort_unstable();
    pids.dedup();
    pids
}

/// Lowercased executable basename without a trailing `.exe`
fn normalize_process_name(name: &str) -> String {
    let base = name
        .trim()
        .rsplit(|c: char| c == '\\' || c == '/')
        .next()
        .unwrap_or_default();
    let lower = base.to_lowercase();
    match lower.strip_suffix(".exe") {
        Some(stem) => stem.to_string(),
        None => lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_process_name() {
        assert_eq!(normalize_process_name("NewWorld.exe"), "newworld");
        assert_eq!(normalize_process_name("NewWorld"), "newworld");
        assert_eq!(normalize_process_name(" newworld.EXE "), "newworld");
        assert_ne!(normalize_process_name("NewWorldLauncher.exe"), "newworld");
        assert_eq!(
            normalize_process_name(r"C:\Games\New World\Bin64\NewWorld.exe"),
            "newworld"
        );
    }

    #[test]
    fn test_pids_matching_executable_basename() {
        let processes = vec![
            (40, "NewWorld.exe".to_string()),
            (12, "explorer.exe".to_string()),
            (7, "NEWWORLD.EXE".to_string()),
            (40, "NewWorld.exe".to_string()),
            // A version-resource description is not an executable name
            (99, "New World".to_string()),
            (5, "NewWorldLauncher.exe".to_string()),
        ];

        assert_eq!(pids_matching(processes, "NewWorld.exe"), vec![7, 40]);
    }

    #[test]
    fn test_pids_matching_nothing() {
        let processes = vec![(1, "explorer.exe".to_string())];
        assert!(pids_matching(processes, "NewWorld.exe").is_empty());
    }
}
