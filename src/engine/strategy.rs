//! Scan-based gathering strategies
//!
//! Alternatives to the timer strategy: move (turn or run), let the view
//! settle, then interact for as long as the prompt is recognized.

use super::actor::Actor;
use super::ActionError;
use crate::config::Strategy;
use crate::game::Direction;
use crate::stealth::Humanizer;
use crate::vision::ActionScanner;

/// Re-center, turn randomly, then interact while the prompt shows.
///
/// Returns the number of interactions.
pub async fn turn_and_scan(
    actor: &Actor,
    scanner: &mut dyn ActionScanner,
    humanizer: &mut Humanizer,
) -> Result<usize, ActionError> {
    actor.center_view().await?;
    actor.random_turn(humanizer, Direction::Random).await?;
    if !actor.settle().await {
        return Ok(0);
    }

    actor.interact_while_recognized(scanner, humanizer).await
}

/// Re-center, run randomly, then interact while the prompt shows.
///
/// Returns the number of interactions.
pub async fn run_and_scan(
    actor: &Actor,
    scanner: &mut dyn ActionScanner,
    humanizer: &mut Humanizer,
) -> Result<usize, ActionError> {
    actor.center_view().await?;
    actor.random_run(humanizer, Direction::Random).await?;
    if !actor.settle().await {
        return Ok(0);
    }

    actor.interact_while_recognized(scanner, humanizer).await
}

/// Repeat a scan strategy round after round until stopped.
///
/// Returns the total number of interactions. The timer strategy is not a
/// scan strategy and is rejected here by running nothing.
pub async fn scan_until_stopped(
    actor: &Actor,
    strategy: Strategy,
    scanner: &mut dyn ActionScanner,
    humanizer: &mut Humanizer,
) -> Result<usize, ActionError> {
    let mut total = 0;

    while !actor.stop_signal().is_stopped() {
        total += match strategy {
            Strategy::TurnAndScan => turn_and_scan(actor, scanner, humanizer).await?,
            Strategy::RunAndScan => run_and_scan(actor, scanner, humanizer).await?,
            Strategy::Timers => {
                log::warn!("timer strategy has no scan rounds");
                break;
            }
        };
    }

    Ok(total)
}
