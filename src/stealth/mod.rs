//! Randomized decision making
//!
//! Every random choice the bot makes (directions, turn offsets, run
//! times, timer intervals, cooldowns) is drawn here so that a fixed seed
//! reproduces a whole session's decisions.

pub mod humanize;

pub use humanize::*;
