//! Keyboard-driven board for development at a terminal.
//!
//! Space or Enter stands in for the physical button; `q` or Ctrl+C
//! requests shutdown through the signal channel, so the keyboard path
//! and the real SIGINT path converge on the same cleanup. The LED is
//! rendered as a colored glyph in the structured log output.
//!
//! Key events arrive through crossterm, which needs the raw mode that
//! `TerminalGuard` enabled at startup.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use super::{Button, Indicator};
use crate::core::feedback::LedPattern;
use crate::io::signals::SignalMessage;

pub struct TerminalButton {
    signal_sender: Sender<SignalMessage>,
}

impl TerminalButton {
    pub fn new(signal_sender: Sender<SignalMessage>) -> Self {
        Self { signal_sender }
    }

    fn request_shutdown(&self) {
        log_pipe!();
        log_info!("Quit requested from keyboard, initiating shutdown...");
        let _ = self.signal_sender.send(SignalMessage::Shutdown);
    }
}

impl Button for TerminalButton {
    fn wait_for_press(&mut self, timeout: Duration) -> Result<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                return Ok(false);
            }

            if let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                match key.code {
                    KeyCode::Char(' ') | KeyCode::Enter => return Ok(true),
                    KeyCode::Char('q') | KeyCode::Char('Q') => {
                        self.request_shutdown();
                        return Ok(false);
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.request_shutdown();
                        return Ok(false);
                    }
                    // Any other key is not a press
                    _ => {}
                }
            }

            if Instant::now() >= deadline {
                return Ok(false);
            }
        }
    }
}

/// Renders LED patterns as colored glyph lines in the log stream.
pub struct TerminalIndicator;

impl TerminalIndicator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalIndicator {
    fn default() -> Self {
        Self::new()
    }
}

fn glyph_for(pattern: LedPattern) -> &'static str {
    match pattern {
        LedPattern::Off => "\x1b[2m○\x1b[0m",
        LedPattern::Steady | LedPattern::SlowPulse => "\x1b[32m●\x1b[0m",
        LedPattern::DimPulse => "\x1b[33m●\x1b[0m",
        LedPattern::FastBlink | LedPattern::TripleBlink => "\x1b[31m●\x1b[0m",
    }
}

impl Indicator for TerminalIndicator {
    fn supports(&self, _pattern: LedPattern) -> bool {
        // The terminal can fake every pattern, so nothing ever degrades here
        true
    }

    fn apply(&mut self, pattern: LedPattern) -> Result<()> {
        log_decorated!("{} LED {}", glyph_for(pattern), pattern.name());
        Ok(())
    }
}
