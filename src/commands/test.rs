//! Implementation of the `test` command for checking board wiring.
//!
//! Cycles the indicator through every LED pattern with a short hold, then
//! plays every melody the session can emit: each player's start cue and
//! the timeout alarm. A pattern the board cannot render is reported and
//! skipped, so capability gaps show up here instead of mid-game.
//!
//! The command runs without the instance lock; it can be used while a
//! session is active on another board.

use anyhow::Result;
use std::sync::mpsc;
use std::time::Duration;

use crate::audio::CueProvider;
use crate::board::{create_audio, create_board, detect_board};
use crate::common::constants::DEFAULT_PLAYERS;
use crate::config::Config;
use crate::core::feedback::LedPattern;
use crate::core::machine::Cue;

/// How long each LED pattern stays applied during the check.
const PATTERN_HOLD: Duration = Duration::from_millis(500);

/// Handle the test command: blink every pattern, then play every cue.
pub fn handle_test_command(debug_enabled: bool) -> Result<()> {
    log_version!();

    // Load and validate configuration first so the check exercises the
    // same board and audio a real session would use
    let config = Config::load()?;

    let board_type = detect_board(&config)?;
    log_block_start!("Checking {} board", board_type.name());

    // The check never reads the button; the channel only satisfies the
    // board factory and is dropped together with the button
    let (press_sender, _press_receiver) = mpsc::channel();
    let (_button, mut indicator) = create_board(board_type, debug_enabled, press_sender)?;
    let mut speaker = create_audio(&config, debug_enabled)?;
    let cues = CueProvider::from_config(&config, debug_enabled)?;

    log_block_start!("LED patterns");
    let patterns = [
        LedPattern::Steady,
        LedPattern::SlowPulse,
        LedPattern::DimPulse,
        LedPattern::FastBlink,
        LedPattern::TripleBlink,
    ];
    for pattern in patterns {
        if indicator.supports(pattern) {
            indicator.apply(pattern)?;
            std::thread::sleep(PATTERN_HOLD);
        } else {
            log_indented!("{} not supported by this board, skipping", pattern.name());
        }
    }
    indicator.apply(LedPattern::Off)?;

    let players = config.players.unwrap_or(DEFAULT_PLAYERS);
    log_block_start!("Audio cues ({players} players)");
    for player in 1..=players {
        log_decorated!("Player {player} start melody");
        cues.play(Cue::StartTurn(player), speaker.as_mut())?;
    }
    log_decorated!("Timeout alarm");
    cues.play(Cue::TimeoutAlarm, speaker.as_mut())?;

    log_block_start!("Hardware check complete");
    log_end!();
    Ok(())
}
