//! NW Gatherer - randomized resource-gathering automation for New World
//!
//! This library locates the game window once, then drives simulated
//! keyboard and mouse input on randomized timers to keep the character
//! running, turning and interacting. Optional strategies recognize the
//! interact prompt on screen before acting.
//!
//! ## Humanization
//!
//! The `stealth` module draws every interval, direction and offset, so
//! the bot never settles into a fixed rhythm. A fixed seed reproduces a
//! whole session's decisions.

pub mod config;
pub mod engine;
pub mod game;
pub mod platform;
pub mod stealth;
pub mod vision;

use std::sync::Arc;

use crate::config::{ConfigError, Settings, Strategy};
use crate::engine::{ActionError, ActionLoop, Actor, StopSignal};
use crate::game::{locate_target, Direction, LocateError, WindowContext};
use crate::platform::{InputDevice, ScreenSource, WindowSystem};
use crate::stealth::Humanizer;
use crate::vision::{ActionRecognizer, VisionError};

/// One-shot actions for trying the bot out
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DebugAction {
    /// Recognize the interact prompt once and press interact if found
    Action,
    /// Perform one random turn
    Turn,
}

/// Top-level errors
#[derive(Debug, thiserror::Error)]
pub enum GathererError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Locate(#[from] LocateError),
    #[error(transparent)]
    Vision(#[from] VisionError),
    #[error(transparent)]
    Action(#[from] ActionError),
}

/// The bot, attached to one game window
pub struct Gatherer {
    settings: Settings,
    actor: Arc<Actor>,
    screen: Arc<dyn ScreenSource>,
    humanizer: Humanizer,
}

impl std::fmt::Debug for Gatherer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gatherer")
            .field("strategy", &self.settings.strategy)
            .field("context", self.actor.context())
            .finish_non_exhaustive()
    }
}

impl Gatherer {
    /// Validate settings, locate the game and bring it to the foreground
    pub fn attach(
        settings: Settings,
        windows: &dyn WindowSystem,
        input: Arc<dyn InputDevice>,
        screen: Arc<dyn ScreenSource>,
    ) -> Result<Self, GathererError> {
        settings.validate()?;

        let ctx = locate_target(windows, &settings.target)?;
        if let Err(e) = windows.activate(ctx.window_handle) {
            log::warn!("could not activate game window: {}", e);
        }

        Ok(Self::new(settings, ctx, input, screen))
    }

    /// Build a gatherer for an already located window.
    ///
    /// `settings` must have passed [`Settings::validate`].
    pub fn new(
        settings: Settings,
        ctx: WindowContext,
        input: Arc<dyn InputDevice>,
        screen: Arc<dyn ScreenSource>,
    ) -> Self {
        let actor = Arc::new(Actor::new(input, ctx, &settings, StopSignal::new()));
        let humanizer = Humanizer::from_seed(settings.seed);

        Self {
            settings,
            actor,
            screen,
            humanizer,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn context(&self) -> &WindowContext {
        self.actor.context()
    }

    /// Signal that ends [`Gatherer::run`] when stopped
    pub fn stop_signal(&self) -> StopSignal {
        self.actor.stop_signal().clone()
    }

    /// Run the configured strategy until the stop signal fires
    pub async fn run(&mut self) -> Result<(), GathererError> {
        let strategy = self.settings.strategy;
        log::info!("running {:?} strategy", strategy);

        match strategy {
            Strategy::Timers => {
                let action_loop = ActionLoop::new(self.actor.clone(), self.settings.timers.clone());
                let summary = action_loop.run(&mut self.humanizer).await;
                log::info!(
                    "fired always-run {} times, interact {} times, turn {} times",
                    summary.sustain_run,
                    summary.interact,
                    summary.recenter_turn
                );
            }
            Strategy::TurnAndScan | Strategy::RunAndScan => {
                let mut recognizer = self.recognizer()?;
                let total = engine::scan_until_stopped(
                    &self.actor,
                    strategy,
                    &mut recognizer,
                    &mut self.humanizer,
                )
                .await?;
                log::info!("interacted {} times", total);
            }
        }

        Ok(())
    }

    /// Perform one debug action
    pub async fn run_debug(&mut self, action: DebugAction) -> Result<(), GathererError> {
        match action {
            DebugAction::Action => {
                let mut recognizer = self.recognizer()?;
                if self.actor.recognize_and_invoke(&mut recognizer).await? {
                    self.actor.cooldown(&mut self.humanizer).await;
                }
            }
            DebugAction::Turn => {
                self.actor
                    .random_turn(&mut self.humanizer, Direction::Random)
                    .await?;
            }
        }

        Ok(())
    }

    fn recognizer(&self) -> Result<ActionRecognizer, VisionError> {
        ActionRecognizer::load(
            &self.settings.action_bitmap,
            self.screen.clone(),
            self.actor.context(),
        )
    }
}
