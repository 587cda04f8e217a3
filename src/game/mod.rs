//! Game-facing domain types
//!
//! The resolved target window and the movement directions the bot picks
//! from, plus the one-shot routine that locates the game at startup.

pub mod locator;
pub mod window;

pub use locator::{locate_target, LocateError};
pub use window::WindowContext;

use serde::{Deserialize, Serialize};

/// Movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Left,
    Right,
    /// Resolved to a concrete direction when the action runs
    Random,
}

impl Direction {
    /// Horizontal pointer sign for a turn in this direction
    pub fn turn_sign(&self) -> Option<i32> {
        match self {
            Direction::Left => Some(-1),
            Direction::Right => Some(1),
            Direction::Forward | Direction::Random => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Forward => "forward",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Random => "random",
        };
        f.write_str(name)
    }
}
