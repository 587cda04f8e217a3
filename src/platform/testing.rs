//! Fakes for the platform traits

use std::collections::VecDeque;
use std::sync::Mutex;

use image::RgbaImage;
use tokio::time::Instant;

use super::{InputDevice, KeyAction, PlatformError, Region, ScreenSource, WindowSystem};
use crate::vision::{ActionScanner, ScanOutcome, VisionError};

/// Something the fake input device was asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputEvent {
    Key {
        key: char,
        action: KeyAction,
        at: Instant,
    },
    Move {
        x: i32,
        y: i32,
        at: Instant,
    },
}

struct RecordingState {
    position: (i32, i32),
    events: Vec<InputEvent>,
}

/// Input device that records every call with a (virtual) timestamp
pub(crate) struct RecordingInput {
    state: Mutex<RecordingState>,
}

impl RecordingInput {
    pub(crate) fn at(x: i32, y: i32) -> Self {
        Self {
            state: Mutex::new(RecordingState {
                position: (x, y),
                events: Vec::new(),
            }),
        }
    }

    pub(crate) fn events(&self) -> Vec<InputEvent> {
        self.state.lock().unwrap().events.clone()
    }

    pub(crate) fn position(&self) -> (i32, i32) {
        self.state.lock().unwrap().position
    }

    /// Timestamps of every `action` on `key`
    pub(crate) fn key_times(&self, key: char, action: KeyAction) -> Vec<Instant> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                InputEvent::Key { key: k, action: a, at } if k == key && a == action => Some(at),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn count(&self, key: char, action: KeyAction) -> usize {
        self.key_times(key, action).len()
    }

    pub(crate) fn moves(&self) -> Vec<(i32, i32)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                InputEvent::Move { x, y, .. } => Some((x, y)),
                _ => None,
            })
            .collect()
    }
}

impl InputDevice for RecordingInput {
    fn key(&self, key: char, action: KeyAction) -> Result<(), PlatformError> {
        let mut state = self.state.lock().unwrap();
        state.events.push(InputEvent::Key {
            key,
            action,
            at: Instant::now(),
        });
        Ok(())
    }

    fn move_pointer(&self, x: i32, y: i32) -> Result<(), PlatformError> {
        let mut state = self.state.lock().unwrap();
        state.position = (x, y);
        state.events.push(InputEvent::Move {
            x,
            y,
            at: Instant::now(),
        });
        Ok(())
    }

    fn pointer_position(&self) -> Result<(i32, i32), PlatformError> {
        Ok(self.state.lock().unwrap().position)
    }
}

/// Window system answering from fixed data
pub(crate) struct FakeWindows {
    pub(crate) window: Option<u64>,
    pub(crate) pids: Vec<u32>,
    pub(crate) origin: (i32, i32),
    pub(crate) activated: Mutex<Vec<u64>>,
}

impl FakeWindows {
    pub(crate) fn new(window: Option<u64>, pids: Vec<u32>, origin: (i32, i32)) -> Self {
        Self {
            window,
            pids,
            origin,
            activated: Mutex::new(Vec::new()),
        }
    }
}

impl WindowSystem for FakeWindows {
    fn find_window(&self, _title: &str) -> Result<Option<u64>, PlatformError> {
        Ok(self.window)
    }

    fn process_ids(&self, _executable: &str) -> Result<Vec<u32>, PlatformError> {
        Ok(self.pids.clone())
    }

    fn window_origin(&self, pid: u32) -> Result<(i32, i32), PlatformError> {
        if self.pids.contains(&pid) {
            Ok(self.origin)
        } else {
            Err(PlatformError::NoWindowForProcess(pid))
        }
    }

    fn activate(&self, handle: u64) -> Result<(), PlatformError> {
        self.activated.lock().unwrap().push(handle);
        Ok(())
    }
}

/// Screen source serving crops of one fixed frame
pub(crate) struct StaticScreen {
    frame: RgbaImage,
    pub(crate) captures: Mutex<Vec<Region>>,
}

impl StaticScreen {
    pub(crate) fn new(frame: RgbaImage) -> Self {
        Self {
            frame,
            captures: Mutex::new(Vec::new()),
        }
    }
}

impl ScreenSource for StaticScreen {
    fn capture(&self, region: Region) -> Result<RgbaImage, PlatformError> {
        self.captures.lock().unwrap().push(region);
        let x = region.x.max(0) as u32;
        let y = region.y.max(0) as u32;
        let width = region.width.min(self.frame.width().saturating_sub(x));
        let height = region.height.min(self.frame.height().saturating_sub(y));
        Ok(image::imageops::crop_imm(&self.frame, x, y, width, height).to_image())
    }
}

/// Scanner replaying a fixed list of outcomes, then reporting misses
pub(crate) struct ScriptedScanner {
    outcomes: VecDeque<ScanOutcome>,
    pub(crate) scans: usize,
}

impl ScriptedScanner {
    pub(crate) fn new(outcomes: impl IntoIterator<Item = ScanOutcome>) -> Self {
        Self {
            outcomes: outcomes.into_iter().collect(),
            scans: 0,
        }
    }
}

impl ActionScanner for ScriptedScanner {
    fn scan(&mut self) -> Result<ScanOutcome, VisionError> {
        self.scans += 1;
        Ok(self.outcomes.pop_front().unwrap_or(ScanOutcome::NotFound))
    }
}
