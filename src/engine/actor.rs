//! In-game actions
//!
//! Every action the bot can perform on the game window, from single key
//! taps to the randomized run and the recognize-then-interact loop.

use std::sync::Arc;
use std::time::Duration;

use super::hold::{hold_key, HoldOutcome, HoldSpec};
use super::schedule::Behavior;
use super::{ActionError, StopSignal};
use crate::config::{KeyBindings, MovementSettings, RecognitionSettings, Settings};
use crate::game::{Direction, WindowContext};
use crate::platform::{InputDevice, KeyAction, Pointer};
use crate::stealth::Humanizer;
use crate::vision::{ActionScanner, ScanOutcome};

/// Performs actions against one game window
pub struct Actor {
    input: Arc<dyn InputDevice>,
    pointer: Arc<Pointer>,
    ctx: WindowContext,
    keys: KeyBindings,
    movement: MovementSettings,
    recognition: RecognitionSettings,
    stop: StopSignal,
}

impl Actor {
    pub fn new(
        input: Arc<dyn InputDevice>,
        ctx: WindowContext,
        settings: &Settings,
        stop: StopSignal,
    ) -> Self {
        let pointer = Arc::new(Pointer::from_settings(input.clone(), &settings.movement));

        Self {
            input,
            pointer,
            ctx,
            keys: settings.keys,
            movement: settings.movement.clone(),
            recognition: settings.recognition.clone(),
            stop,
        }
    }

    pub fn context(&self) -> &WindowContext {
        &self.ctx
    }

    pub fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }

    /// Perform one firing of a periodic behavior
    pub async fn fire(
        &self,
        behavior: Behavior,
        humanizer: &mut Humanizer,
    ) -> Result<(), ActionError> {
        match behavior {
            Behavior::SustainRun => self.toggle_always_run(),
            Behavior::Interact => self.invoke_action(),
            Behavior::RecenterTurn => {
                self.center_view().await?;
                self.random_turn(humanizer, Direction::Random).await?;
                Ok(())
            }
        }
    }

    /// Toggle the game's always-run
    pub fn toggle_always_run(&self) -> Result<(), ActionError> {
        log::info!("always run");
        self.input.key(self.keys.always_run, KeyAction::Tap)?;
        Ok(())
    }

    /// Press interact
    pub fn invoke_action(&self) -> Result<(), ActionError> {
        log::info!("action invoke");
        self.input.key(self.keys.interact, KeyAction::Tap)?;
        Ok(())
    }

    /// Put the pointer back on the fixed reference point
    pub async fn center_view(&self) -> Result<(), ActionError> {
        let (x, y) = self.movement.center_point;
        let (x, y) = self.ctx.to_screen(x, y);
        self.pointer.jump_to(x, y).await?;
        Ok(())
    }

    /// Rotate the view by `gap` pixels. Forward (or unresolved) is a no-op.
    pub async fn turn(&self, direction: Direction, gap: i32) -> Result<(), ActionError> {
        log::info!("turn start, direction: `{}`, gap: `{}`", direction, gap);

        match direction.turn_sign() {
            Some(sign) => self.pointer.glide_by(sign * gap, 0).await?,
            None => log::debug!("no turn for direction `{}`", direction),
        }

        log::info!("turn finish");
        Ok(())
    }

    /// Turn left or right by a random offset below the configured maximum.
    ///
    /// Returns the direction and offset used.
    pub async fn random_turn(
        &self,
        humanizer: &mut Humanizer,
        direction: Direction,
    ) -> Result<(Direction, i32), ActionError> {
        let direction = humanizer.turn_direction(direction);
        let gap = humanizer.gap(self.movement.turn_gap_max);
        self.turn(direction, gap).await?;
        Ok((direction, gap))
    }

    /// Hold forward for `duration`, turning by `turn_gap` every tick when
    /// running left or right.
    pub async fn run(
        &self,
        direction: Direction,
        turn_gap: i32,
        duration: Duration,
    ) -> Result<HoldOutcome, ActionError> {
        log::info!(
            "run start, direction: `{}`, run time: `{}` ms",
            direction,
            duration.as_millis()
        );

        let spec = HoldSpec {
            key: self.keys.forward,
            duration,
            tick: Duration::from_millis(self.movement.hold_tick_ms),
            nudge_px: direction.turn_sign().map_or(0, |sign| sign * turn_gap),
        };
        let outcome = hold_key(self.input.clone(), self.pointer.clone(), spec, &self.stop).await?;

        log::info!("run finish");
        Ok(outcome)
    }

    /// Run in a random direction for a random time
    pub async fn random_run(
        &self,
        humanizer: &mut Humanizer,
        direction: Direction,
    ) -> Result<HoldOutcome, ActionError> {
        let direction = humanizer.run_direction(direction);
        let turn_gap = humanizer.gap(self.movement.run_turn_gap_max);
        let duration = humanizer.sample(self.movement.run_duration);
        self.run(direction, turn_gap, duration).await
    }

    /// Sleep unless stopped. Returns `true` if the full time elapsed.
    pub async fn sleep(&self, duration: Duration) -> bool {
        log::info!("sleep for {} ms", duration.as_millis());
        self.stop.sleep(duration).await
    }

    /// Wait out the post-interact cooldown
    pub async fn cooldown(&self, humanizer: &mut Humanizer) -> bool {
        let duration = humanizer.sample(self.recognition.cooldown);
        self.sleep(duration).await
    }

    /// Wait for movement to settle before scanning
    pub async fn settle(&self) -> bool {
        self.sleep(Duration::from_millis(self.recognition.settle_ms)).await
    }

    /// Scan once for the interact prompt and press interact if it is there.
    ///
    /// Returns whether the prompt was found.
    pub async fn recognize_and_invoke(
        &self,
        scanner: &mut dyn ActionScanner,
    ) -> Result<bool, ActionError> {
        let lag = Duration::from_millis(self.recognition.capture_lag_ms);
        if !self.stop.sleep(lag).await {
            return Ok(false);
        }

        match scanner.scan()? {
            ScanOutcome::Found { .. } => {
                self.invoke_action()?;
                Ok(true)
            }
            ScanOutcome::NotFound => Ok(false),
        }
    }

    /// Keep interacting while the prompt is recognized, cooling down after
    /// each interaction. Stops at the first miss.
    ///
    /// Returns the number of interactions.
    pub async fn interact_while_recognized(
        &self,
        scanner: &mut dyn ActionScanner,
        humanizer: &mut Humanizer,
    ) -> Result<usize, ActionError> {
        let mut interactions = 0;

        while !self.stop.is_stopped() && self.recognize_and_invoke(scanner).await? {
            interactions += 1;
            if !self.cooldown(humanizer).await {
                break;
            }
        }

        Ok(interactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::testing::{RecordingInput, ScriptedScanner};

    fn context() -> WindowContext {
        WindowContext {
            process_id: 1,
            window_handle: 1,
            origin_x: 0,
            origin_y: 0,
            width: 1920,
            height: 1080,
        }
    }

    fn actor(device: &Arc<RecordingInput>) -> Actor {
        Actor::new(
            device.clone(),
            context(),
            &Settings::default(),
            StopSignal::new(),
        )
    }

    fn found() -> ScanOutcome {
        ScanOutcome::Found { x: 10, y: 10 }
    }

    #[tokio::test]
    async fn test_key_taps_use_bindings() {
        let device = Arc::new(RecordingInput::at(0, 0));
        let actor = actor(&device);

        actor.toggle_always_run().unwrap();
        actor.invoke_action().unwrap();

        assert_eq!(device.count('=', KeyAction::Tap), 1);
        assert_eq!(device.count('e', KeyAction::Tap), 1);
    }

    #[tokio::test]
    async fn test_center_view_uses_window_origin() {
        let device = Arc::new(RecordingInput::at(0, 0));
        let ctx = WindowContext {
            origin_x: 100,
            origin_y: 40,
            ..context()
        };
        let actor = Actor::new(device.clone(), ctx, &Settings::default(), StopSignal::new());

        actor.center_view().await.unwrap();
        assert_eq!(device.position(), (600, 640));
    }

    #[tokio::test(start_paused = true)]
    async fn test_turn_directions() {
        let device = Arc::new(RecordingInput::at(500, 600));
        let actor = actor(&device);

        actor.turn(Direction::Left, 120).await.unwrap();
        assert_eq!(device.position(), (380, 600));

        actor.turn(Direction::Right, 200).await.unwrap();
        assert_eq!(device.position(), (580, 600));

        actor.turn(Direction::Forward, 200).await.unwrap();
        assert_eq!(device.position(), (580, 600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_random_turn_within_bounds() {
        let device = Arc::new(RecordingInput::at(1000, 600));
        let actor = actor(&device);
        let mut humanizer = Humanizer::seeded(5);

        for _ in 0..20 {
            let before = device.position();
            let (direction, gap) = actor.random_turn(&mut humanizer, Direction::Random).await.unwrap();
            let moved = device.position().0 - before.0;

            assert!((0..300).contains(&gap));
            match direction {
                Direction::Left => assert_eq!(moved, -gap),
                Direction::Right => assert_eq!(moved, gap),
                other => panic!("Unexpected turn direction {other}"),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_random_run_holds_forward() {
        let device = Arc::new(RecordingInput::at(500, 600));
        let actor = actor(&device);
        let mut humanizer = Humanizer::seeded(11);

        let started = tokio::time::Instant::now();
        let outcome = actor
            .random_run(&mut humanizer, Direction::Forward)
            .await
            .unwrap();

        assert_eq!(outcome, HoldOutcome::Completed);
        assert_eq!(device.count('w', KeyAction::Release), 1);
        let held = device.key_times('w', KeyAction::Release)[0] - started;
        assert!(held >= Duration::from_millis(1500));
        assert!(held < Duration::from_millis(4600));
        // Forward runs never move the pointer
        assert!(device.moves().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_interact_until_first_miss() {
        let device = Arc::new(RecordingInput::at(0, 0));
        let actor = actor(&device);
        let mut scanner = ScriptedScanner::new([found(), found(), ScanOutcome::NotFound, found()]);
        let mut humanizer = Humanizer::seeded(3);

        let interactions = actor
            .interact_while_recognized(&mut scanner, &mut humanizer)
            .await
            .unwrap();

        assert_eq!(interactions, 2);
        assert_eq!(scanner.scans, 3);
        assert_eq!(device.count('e', KeyAction::Tap), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cooldown_between_interactions() {
        let device = Arc::new(RecordingInput::at(0, 0));
        let actor = actor(&device);
        let mut scanner = ScriptedScanner::new([found(), found()]);
        let mut humanizer = Humanizer::seeded(8);

        actor
            .interact_while_recognized(&mut scanner, &mut humanizer)
            .await
            .unwrap();

        let taps = device.key_times('e', KeyAction::Tap);
        assert_eq!(taps.len(), 2);
        // cooldown [4000, 9000) plus the 400 ms capture lag
        let gap = taps[1] - taps[0];
        assert!(gap >= Duration::from_millis(4400));
        assert!(gap < Duration::from_millis(9400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_interaction_stops_on_signal() {
        let device = Arc::new(RecordingInput::at(0, 0));
        let stop = StopSignal::new();
        let actor = Actor::new(device.clone(), context(), &Settings::default(), stop.clone());
        let mut scanner = ScriptedScanner::new(std::iter::repeat(found()).take(100));
        let mut humanizer = Humanizer::seeded(8);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(20)).await;
            stop.stop();
        });

        let interactions = actor
            .interact_while_recognized(&mut scanner, &mut humanizer)
            .await
            .unwrap();

        // At most one interaction per 4.4 s over 20 s
        assert!((2..=5).contains(&interactions));
    }
}
