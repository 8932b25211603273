//! Core application logic and state management.
//!
//! This module encapsulates the main logic of turnr, running the
//! press/tick/render loop. It handles:
//!
//! - Button polling and turn handover
//! - Deadline checks and the one-shot timeout alarm
//! - LED rendering through the urgency tiers
//! - Audio cue playback
//! - Signal processing for graceful shutdown
//!
//! The `Core` struct owns all runtime resources, providing encapsulation
//! and making the shutdown path easy to reason about.

pub mod feedback;
pub mod machine;

use anyhow::Result;
use std::fs::File;
use std::sync::atomic::Ordering;
use std::sync::mpsc::{RecvTimeoutError, TryRecvError};
use std::time::{Duration, Instant};

use crate::{
    audio::CueProvider,
    board::{AudioOutput, Button, Indicator},
    common::{constants::*, utils},
    config::Config,
    core::{
        feedback::{FeedbackTier, LedPattern, select_pattern},
        machine::{Cue, TimerMachine, TimerState},
    },
    io::signals::{SignalState, handle_signal_message},
};

/// Parameters for creating a Core instance.
///
/// This struct bundles all the dependencies needed to create a Core,
/// following the idiomatic Rust pattern to avoid functions with too many parameters.
pub(crate) struct CoreParams {
    pub config: Config,
    pub button: Box<dyn Button>,
    pub indicator: Box<dyn Indicator>,
    pub speaker: Box<dyn AudioOutput>,
    pub cues: CueProvider,
    pub signal_state: SignalState,
    pub lock_info: Option<(File, String)>,
    pub debug_enabled: bool,
}

/// Core state machine managing the main application loop.
///
/// This struct encapsulates all the runtime state. It provides methods for:
/// - Executing the main application flow
/// - Polling the button and advancing the rotation
/// - Rendering the LED for the current urgency tier
/// - Handling shutdown signals and final cleanup
pub(crate) struct Core {
    config: Config,
    button: Box<dyn Button>,
    indicator: Box<dyn Indicator>,
    speaker: Box<dyn AudioOutput>,
    cues: CueProvider,
    signal_state: SignalState,
    lock_info: Option<(File, String)>,
    debug_enabled: bool,
    machine: TimerMachine,
    // Last pattern applied to the indicator, None forces a re-render
    last_pattern: Option<LedPattern>,
}

impl Core {
    /// Create a new Core instance from parameters.
    pub fn new(params: CoreParams) -> Self {
        let players = params.config.players.unwrap_or(DEFAULT_PLAYERS);
        let turn_length =
            Duration::from_secs(params.config.turn_seconds.unwrap_or(DEFAULT_TURN_SECONDS));

        Self {
            config: params.config,
            button: params.button,
            indicator: params.indicator,
            speaker: params.speaker,
            cues: params.cues,
            signal_state: params.signal_state,
            lock_info: params.lock_info,
            debug_enabled: params.debug_enabled,
            machine: TimerMachine::new(players, turn_length),
            last_pattern: None,
        }
    }

    /// Execute the core application logic.
    ///
    /// This method orchestrates the main turnr loop using the resources
    /// and configuration provided during construction. The indicator is
    /// turned off and the lock file released on every exit route.
    ///
    /// # Returns
    /// Result indicating success or failure of the application run
    pub fn execute(mut self) -> Result<()> {
        // Welcome cue before the loop starts; sessions without a welcome
        // asset or system clip stay silent here
        if let Err(e) = self.cues.play(Cue::Welcome, self.speaker.as_mut()) {
            log_warning!("Failed to play welcome cue: {e}");
        }

        // Idle starts dark
        self.apply_pattern(LedPattern::Off);

        let loop_result = self.main_loop();

        // Ensure proper cleanup on shutdown
        log_block_start!("Shutting down turnr...");

        if let Some((lock_file, lock_path)) = self.lock_info.take() {
            utils::cleanup_application(self.indicator, lock_file, &lock_path, self.debug_enabled);
        } else {
            // No lock file to clean, still leave the LED dark
            if let Err(e) = self.indicator.apply(LedPattern::Off) {
                log_warning!("Failed to turn off indicator: {e}");
            }
        }
        log_end!();

        loop_result
    }

    /// Run the main loop that polls the button and drives the timer.
    ///
    /// Each iteration waits up to the poll interval for a press, drains
    /// pending signal messages, checks the turn deadline, and re-renders
    /// the LED when the urgency tier changed. Idle and timed-out states
    /// sleep a little longer between iterations since no deadline is
    /// approaching.
    fn main_loop(&mut self) -> Result<()> {
        let poll_timeout = Duration::from_millis(BUTTON_POLL_MS);

        while self.signal_state.running.load(Ordering::SeqCst) {
            // The button poll doubles as the loop tick
            let pressed = self.button.wait_for_press(poll_timeout)?;

            if pressed {
                let cue = self.machine.press(Instant::now());
                self.announce_turn(cue);
            }

            // Drain pending signal messages before rendering
            if !self.drain_signals()? {
                break;
            }

            // Deadline check fires the alarm exactly once per expired turn
            if let Some(alarm) = self.machine.tick(Instant::now()) {
                self.announce_timeout(alarm);
            }

            self.render_state(Instant::now());

            // Nothing is counting down while idle or timed out, so ease off
            // the CPU while staying responsive to shutdown signals
            if !matches!(self.machine.state(), TimerState::Running { .. }) {
                match self
                    .signal_state
                    .signal_receiver
                    .recv_timeout(Duration::from_millis(IDLE_SLEEP_MS))
                {
                    Ok(signal_msg) => handle_signal_message(signal_msg, &self.signal_state),
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => {
                        return self.signal_channel_lost();
                    }
                }
            }
        }

        Ok(())
    }

    /// Drain queued signal messages without blocking.
    ///
    /// Returns false when the loop should stop, either because a shutdown
    /// message arrived or was requested earlier.
    fn drain_signals(&mut self) -> Result<bool> {
        loop {
            match self.signal_state.signal_receiver.try_recv() {
                Ok(signal_msg) => handle_signal_message(signal_msg, &self.signal_state),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.signal_state.running.load(Ordering::SeqCst) {
                        self.signal_channel_lost()?;
                    }
                    break;
                }
            }
        }

        Ok(self.signal_state.running.load(Ordering::SeqCst))
    }

    /// The signal channel closing while running means neither Ctrl+C nor the
    /// keyboard quit key could reach the loop anymore, so the session would
    /// only die to SIGKILL. Treat it as fatal.
    fn signal_channel_lost(&self) -> Result<()> {
        log_pipe!();
        log_critical!("Signal handler disconnected unexpectedly");
        anyhow::bail!("signal channel closed while the timer was running")
    }

    /// Log and sound the start of a turn, then force a fresh LED render.
    fn announce_turn(&mut self, cue: Cue) {
        if let Cue::StartTurn(player) = cue {
            log_block_start!("Player {player}'s turn");
            if self.debug_enabled {
                log_debug!(
                    "Turn length {}s, rotation of {}",
                    self.config.turn_seconds.unwrap_or(DEFAULT_TURN_SECONDS),
                    self.config.players.unwrap_or(DEFAULT_PLAYERS)
                );
            }
        }
        self.play_cue(cue);
        self.last_pattern = None;
    }

    /// Handle an expired deadline: flash the alarm pattern, then play the cue.
    ///
    /// The pattern is applied before the audio so the LED already signals the
    /// timeout while the melody plays.
    fn announce_timeout(&mut self, alarm: Cue) {
        if let TimerState::Timeout { last_player } = self.machine.state() {
            log_block_start!("Player {last_player} ran out of time");
        }

        let pattern = select_pattern(FeedbackTier::TimeoutAlarm, self.indicator.as_ref());
        self.apply_pattern(pattern);
        self.play_cue(alarm);
    }

    /// Render the LED for the machine's current state.
    ///
    /// Running turns map their remaining time to an urgency tier. Idle shows
    /// a dark LED and a timed-out turn keeps the alarm pattern until the next
    /// press hands the turn over.
    fn render_state(&mut self, now: Instant) {
        let pattern = match self.machine.state() {
            TimerState::Idle => LedPattern::Off,
            TimerState::Timeout { .. } => {
                select_pattern(FeedbackTier::TimeoutAlarm, self.indicator.as_ref())
            }
            TimerState::Running { .. } => {
                let remaining = self.machine.remaining(now);
                let yellow =
                    Duration::from_secs(self.config.warn_yellow.unwrap_or(DEFAULT_WARN_YELLOW));
                let red = Duration::from_secs(self.config.warn_red.unwrap_or(DEFAULT_WARN_RED));
                let tier = FeedbackTier::classify(remaining, yellow, red);
                select_pattern(tier, self.indicator.as_ref())
            }
        };

        self.apply_pattern(pattern);
    }

    /// Apply a pattern unless it is already showing.
    fn apply_pattern(&mut self, pattern: LedPattern) {
        if self.last_pattern == Some(pattern) {
            return;
        }

        if let Err(e) = self.indicator.apply(pattern) {
            log_warning!("Failed to apply LED pattern {}: {e}", pattern.name());
        }
        self.last_pattern = Some(pattern);
    }

    fn play_cue(&mut self, cue: Cue) {
        if let Err(e) = self.cues.play(cue, self.speaker.as_mut()) {
            log_warning!("Failed to play cue: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{MockAudioOutput, MockButton, MockIndicator};
    use crate::io::signals::SignalMessage;
    use std::sync::atomic::AtomicBool;
    use std::sync::{Arc, Mutex};

    fn test_signal_state() -> SignalState {
        let (signal_sender, signal_receiver) = std::sync::mpsc::channel();
        SignalState {
            running: Arc::new(AtomicBool::new(true)),
            signal_receiver,
            signal_sender,
        }
    }

    fn test_config(audio_dir: &std::path::Path) -> Config {
        let mut config: Config = toml::from_str("").unwrap();
        config.audio_dir = Some(audio_dir.to_string_lossy().into_owned());
        config
    }

    fn recording_indicator(applied: &Arc<Mutex<Vec<LedPattern>>>) -> MockIndicator {
        let mut indicator = MockIndicator::new();
        indicator.expect_supports().returning(|_| true);
        let sink = Arc::clone(applied);
        indicator.expect_apply().returning(move |pattern| {
            sink.lock().unwrap().push(pattern);
            Ok(())
        });
        indicator
    }

    fn silent_speaker() -> MockAudioOutput {
        let mut speaker = MockAudioOutput::new();
        speaker.expect_play().returning(|_| Ok(()));
        speaker
    }

    fn test_core(
        config: Config,
        button: MockButton,
        indicator: MockIndicator,
        speaker: MockAudioOutput,
        signal_state: SignalState,
    ) -> Core {
        let cues = CueProvider::from_config(&config, false).unwrap();
        Core::new(CoreParams {
            config,
            button: Box::new(button),
            indicator: Box::new(indicator),
            speaker: Box::new(speaker),
            cues,
            signal_state,
            lock_info: None,
            debug_enabled: false,
        })
    }

    #[test]
    fn test_execute_stops_when_shutdown_requested() {
        let assets = tempfile::tempdir().unwrap();
        let state = test_signal_state();
        let running = state.running.clone();

        let mut button = MockButton::new();
        button.expect_wait_for_press().returning(move |_| {
            running.store(false, Ordering::SeqCst);
            Ok(false)
        });

        let applied = Arc::new(Mutex::new(Vec::new()));
        let indicator = recording_indicator(&applied);

        let core = test_core(
            test_config(assets.path()),
            button,
            indicator,
            silent_speaker(),
            state,
        );
        core.execute().unwrap();

        let applied = applied.lock().unwrap();
        // Dark at startup and dark again during cleanup
        assert_eq!(applied.first(), Some(&LedPattern::Off));
        assert_eq!(applied.last(), Some(&LedPattern::Off));
    }

    #[test]
    fn test_press_starts_turn_and_renders_safe_tier() {
        let assets = tempfile::tempdir().unwrap();
        let state = test_signal_state();
        let running = state.running.clone();

        let mut button = MockButton::new();
        let mut presses = 0;
        button.expect_wait_for_press().returning(move |_| {
            presses += 1;
            match presses {
                1 => Ok(true),
                _ => {
                    running.store(false, Ordering::SeqCst);
                    Ok(false)
                }
            }
        });

        let applied = Arc::new(Mutex::new(Vec::new()));
        let indicator = recording_indicator(&applied);

        let played = Arc::new(Mutex::new(Vec::new()));
        let mut speaker = MockAudioOutput::new();
        let sink = Arc::clone(&played);
        speaker.expect_play().returning(move |path| {
            sink.lock().unwrap().push(path.to_path_buf());
            Ok(())
        });

        let core = test_core(
            test_config(assets.path()),
            button,
            indicator,
            speaker,
            state,
        );
        core.execute().unwrap();

        // A fresh 10 second turn renders the calm tier
        assert!(applied.lock().unwrap().contains(&LedPattern::SlowPulse));

        // Player 1's start melody has two synthesized tones
        let tone_files = played
            .lock()
            .unwrap()
            .iter()
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with("turnr-tone-"))
            })
            .count();
        assert_eq!(tone_files, 2);
    }

    #[test]
    fn test_keyboard_shutdown_message_stops_loop() {
        let assets = tempfile::tempdir().unwrap();
        let state = test_signal_state();
        let sender = state.signal_sender.clone();

        let mut button = MockButton::new();
        button.expect_wait_for_press().returning(move |_| {
            // A quit key routes through the same channel as Unix signals
            sender.send(SignalMessage::Shutdown).unwrap();
            Ok(false)
        });

        let applied = Arc::new(Mutex::new(Vec::new()));
        let indicator = recording_indicator(&applied);

        let core = test_core(
            test_config(assets.path()),
            button,
            indicator,
            silent_speaker(),
            state,
        );
        core.execute().unwrap();

        assert_eq!(applied.lock().unwrap().last(), Some(&LedPattern::Off));
    }

    #[test]
    fn test_announce_timeout_applies_alarm_pattern_and_melody() {
        let assets = tempfile::tempdir().unwrap();
        let state = test_signal_state();

        let applied = Arc::new(Mutex::new(Vec::new()));
        let indicator = recording_indicator(&applied);

        let played = Arc::new(Mutex::new(Vec::new()));
        let mut speaker = MockAudioOutput::new();
        let sink = Arc::clone(&played);
        speaker.expect_play().returning(move |path| {
            sink.lock().unwrap().push(path.to_path_buf());
            Ok(())
        });

        let mut core = test_core(
            test_config(assets.path()),
            MockButton::new(),
            indicator,
            speaker,
            state,
        );

        let start = Instant::now();
        core.machine.press(start);
        let alarm = core.machine.tick(start + Duration::from_secs(11));
        assert_eq!(alarm, Some(Cue::TimeoutAlarm));

        core.announce_timeout(alarm.unwrap());

        assert!(applied.lock().unwrap().contains(&LedPattern::TripleBlink));
        // The descending timeout melody renders five tones
        assert_eq!(played.lock().unwrap().len(), 5);
    }

    #[test]
    fn test_render_state_skips_repeat_patterns() {
        let assets = tempfile::tempdir().unwrap();
        let state = test_signal_state();

        let applied = Arc::new(Mutex::new(Vec::new()));
        let indicator = recording_indicator(&applied);

        let mut core = test_core(
            test_config(assets.path()),
            MockButton::new(),
            indicator,
            silent_speaker(),
            state,
        );

        let now = Instant::now();
        core.render_state(now);
        core.render_state(now);
        core.render_state(now);

        // Idle renders Off once, repeats are deduplicated
        assert_eq!(applied.lock().unwrap().as_slice(), &[LedPattern::Off]);
    }

    #[test]
    fn test_alarm_pattern_downgrades_on_reduced_indicator() {
        let assets = tempfile::tempdir().unwrap();
        let state = test_signal_state();

        let applied = Arc::new(Mutex::new(Vec::new()));
        let mut indicator = MockIndicator::new();
        indicator
            .expect_supports()
            .returning(|pattern| matches!(pattern, LedPattern::Off | LedPattern::Steady));
        let sink = Arc::clone(&applied);
        indicator.expect_apply().returning(move |pattern| {
            sink.lock().unwrap().push(pattern);
            Ok(())
        });

        let mut core = test_core(
            test_config(assets.path()),
            MockButton::new(),
            indicator,
            silent_speaker(),
            state,
        );

        let start = Instant::now();
        core.machine.press(start);
        let alarm = core.machine.tick(start + Duration::from_secs(11));
        core.announce_timeout(alarm.unwrap());

        // TripleBlink and FastBlink are unsupported, the chain lands on Steady
        assert!(applied.lock().unwrap().contains(&LedPattern::Steady));
    }
}
