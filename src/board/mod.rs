//! Hardware collaborator seams and board selection.
//!
//! The timer core only ever talks to three traits: the button it waits
//! on, the indicator it renders LED patterns through, and the audio
//! output it hands WAV files to. Which implementations back those traits
//! is decided once at startup, from config or by environment detection,
//! and never changes during a run.

pub mod headless;
pub mod speaker;
pub mod terminal;

use anyhow::Result;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::mpsc::Sender;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;

use crate::common::constants::{DEFAULT_AUDIO_BACKEND, DEFAULT_BOARD, EXIT_FAILURE};
use crate::config::{AudioBackend, Board, Config};
use crate::core::feedback::LedPattern;
use crate::io::signals::SignalMessage;

/// The one button on the device.
#[cfg_attr(test, automock)]
pub trait Button {
    /// Wait up to `timeout` for a press. Returns `Ok(true)` on a press,
    /// `Ok(false)` when the timeout elapsed quietly.
    fn wait_for_press(&mut self, timeout: Duration) -> Result<bool>;
}

/// The one LED on the device.
#[cfg_attr(test, automock)]
pub trait Indicator {
    /// Whether this indicator can render the pattern. Queried up front;
    /// callers degrade to a supported pattern instead of probing errors.
    fn supports(&self, pattern: LedPattern) -> bool;

    /// Render a pattern. Callers only request patterns that passed
    /// [`Indicator::supports`], plus `Off` which is always accepted.
    fn apply(&mut self, pattern: LedPattern) -> Result<()>;
}

/// The speaker path: plays a WAV file synchronously to completion.
#[cfg_attr(test, automock)]
pub trait AudioOutput {
    fn play(&mut self, path: &Path) -> Result<()>;
}

/// Board implementation selected for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardType {
    /// Keyboard-driven board for development at an interactive terminal.
    Terminal,
    /// Inert board for running without any input hardware attached.
    Headless,
}

impl BoardType {
    pub fn name(&self) -> &'static str {
        match self {
            BoardType::Terminal => "Terminal",
            BoardType::Headless => "Headless",
        }
    }
}

/// Decide which board to drive.
///
/// An explicit config choice wins. A terminal board without an
/// interactive stdin is a misconfiguration and exits with guidance
/// rather than failing later inside the main loop.
pub fn detect_board(config: &Config) -> Result<BoardType> {
    match config.board.unwrap_or(DEFAULT_BOARD) {
        Board::Terminal => {
            if !std::io::stdin().is_terminal() {
                log_pipe!();
                log_error!("Terminal board requested but stdin is not an interactive terminal");
                log_indented!("Run turnr from an interactive terminal, or");
                log_indented!("set board = \"headless\" in the config file");
                log_end!();
                std::process::exit(EXIT_FAILURE);
            }
            Ok(BoardType::Terminal)
        }
        Board::Headless => Ok(BoardType::Headless),
        Board::Auto => {
            if std::io::stdin().is_terminal() {
                Ok(BoardType::Terminal)
            } else {
                Ok(BoardType::Headless)
            }
        }
    }
}

/// Create the button and indicator for the selected board.
///
/// The terminal button forwards quit keys through `signal_sender` so the
/// keyboard can request shutdown the same way a signal does.
pub fn create_board(
    board_type: BoardType,
    debug_enabled: bool,
    signal_sender: Sender<SignalMessage>,
) -> Result<(Box<dyn Button>, Box<dyn Indicator>)> {
    match board_type {
        BoardType::Terminal => Ok((
            Box::new(terminal::TerminalButton::new(signal_sender)),
            Box::new(terminal::TerminalIndicator::new()),
        )),
        BoardType::Headless => Ok((
            Box::new(headless::HeadlessButton::new()),
            Box::new(headless::HeadlessIndicator::new(debug_enabled)),
        )),
    }
}

/// Create the audio output according to config.
///
/// `auto` tries the system audio device and degrades to the silent
/// output with a warning; an explicit `rodio` request propagates the
/// device error instead.
pub fn create_audio(config: &Config, debug_enabled: bool) -> Result<Box<dyn AudioOutput>> {
    match config.audio.unwrap_or(DEFAULT_AUDIO_BACKEND) {
        AudioBackend::Null => {
            log_block_start!("Audio output: null (silent)");
            Ok(Box::new(speaker::NullSpeaker::new(debug_enabled)))
        }
        AudioBackend::Rodio => {
            let speaker = speaker::RodioSpeaker::new()?;
            log_block_start!("Audio output: rodio");
            Ok(Box::new(speaker))
        }
        AudioBackend::Auto => match speaker::RodioSpeaker::new() {
            Ok(speaker) => {
                log_block_start!("Audio output: rodio");
                Ok(Box::new(speaker))
            }
            Err(e) => {
                log_pipe!();
                log_warning!("No audio device available: {e}");
                log_indented!("Continuing with silent audio output");
                Ok(Box::new(speaker::NullSpeaker::new(debug_enabled)))
            }
        },
    }
}
