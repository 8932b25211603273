//! Configuration system for turnr with validation and default generation.
//!
//! This module provides configuration management for the turnr application,
//! handling the TOML-based configuration file, validation, and default value
//! generation on first run.
//!
//! ## Configuration Sources
//!
//! The configuration system looks for `turnr.toml` in:
//! 1. The directory passed via `--config <dir>` (if any)
//! 2. **XDG_CONFIG_HOME**/turnr/turnr.toml otherwise
//!
//! A default configuration file is generated at the resolved path when none
//! exists yet.
//!
//! ## Configuration Structure
//!
//! ```toml
//! #[Board]
//! board = "auto"        # Board to use: "auto", "terminal" or "headless"
//! audio = "auto"        # Audio backend: "auto", "rodio" or "null"
//!
//! #[Timer]
//! turn_seconds = 10     # Length of one turn in seconds (1-3600)
//! warn_yellow = 4       # Remaining seconds where the warning tier begins
//! warn_red = 2          # Remaining seconds where the critical tier begins
//! players = 4           # Number of players in the rotation (2-8)
//!
//! #[Audio synthesis]
//! volume = 0.7          # Playback volume (0-1)
//! beep_ms = 120         # Length of one beep in milliseconds (10-5000)
//! beep_gap_ms = 40      # Silent gap between beeps in milliseconds (0-5000)
//! sample_rate = 44100   # Sample rate for synthesized audio in Hz (8000-192000)
//!
//! #[Custom melodies]
//! start_tones_p1 = []   # Start melody for player 1 in Hz (empty = built-in)
//! timeout_tones = []    # Timeout melody in Hz (empty = built-in)
//! ```
//!
//! ## Validation and Error Handling
//!
//! The configuration system performs extensive validation:
//! - **Range validation**: turn length (1-3600s), players (2-8), volume (0-1)
//! - **Threshold ordering**: warn_red <= warn_yellow < turn_seconds
//! - **Audio validation**: beep timing, sample rate, tone frequencies
//!
//! Invalid configurations produce error messages naming the offending field
//! and the accepted range.

pub mod builder;
pub mod loading;
pub mod validation;

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

use crate::common::constants::*;

// Re-export public API
pub use builder::create_default_config;
pub use loading::{get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir};

/// Board selection for button and LED control.
///
/// Determines which physical frontend drives the button and indicator.
/// The board choice affects how turnr reads presses and renders LED
/// patterns.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Board {
    /// Automatic board detection based on environment.
    ///
    /// Selects the terminal board when stdin is an interactive terminal,
    /// the headless board otherwise. This is the recommended setting.
    Auto,
    /// Interactive terminal board.
    ///
    /// Reads key presses through the terminal in raw mode and renders the
    /// LED as colored glyphs in the log stream.
    Terminal,
    /// Headless board for unattended runs.
    ///
    /// Never reports presses and reduces the LED to log lines. Useful for
    /// services and tests where no terminal is attached.
    Headless,
}

impl Board {
    pub fn as_str(&self) -> &'static str {
        match self {
            Board::Auto => "auto",
            Board::Terminal => "terminal",
            Board::Headless => "headless",
        }
    }
}

/// Audio backend selection for cue playback.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AudioBackend {
    /// Try the system audio device, fall back to silent playback.
    Auto,
    /// System audio output through rodio. Fails startup when no device
    /// can be opened.
    Rodio,
    /// Silent playback that discards every cue.
    Null,
}

impl AudioBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioBackend::Auto => "auto",
            AudioBackend::Rodio => "rodio",
            AudioBackend::Null => "null",
        }
    }
}

/// Configuration structure for turnr application settings.
///
/// This structure represents all configurable options for turnr, loaded from
/// the `turnr.toml` configuration file. Every field is optional and falls
/// back to its default when not specified.
///
/// ## Configuration Categories
///
/// - **Board Control**: `board`, `audio`
/// - **Timer Behavior**: `turn_seconds`, `warn_yellow`, `warn_red`, `players`
/// - **Audio Synthesis**: `volume`, `beep_ms`, `beep_gap_ms`, `sample_rate`
/// - **Cue Assets**: `audio_dir` (directory searched for per-cue WAV files)
/// - **Custom Melodies**: `start_tones_p1` through `start_tones_p4`,
///   `timeout_tones` (frequency lists in Hz; an empty list keeps the
///   built-in melody)
///
/// ## Validation
///
/// All configuration values are validated during loading to ensure they fall
/// within acceptable ranges and don't create impossible configurations (e.g.,
/// warning thresholds longer than the turn itself).
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Board implementation to use for button and LED control.
    ///
    /// Defaults to `Auto` which detects the appropriate board automatically.
    pub board: Option<Board>,

    /// Audio backend used to play cues.
    ///
    /// Defaults to `Auto` which uses the system device when one is available
    /// and stays silent otherwise.
    pub audio: Option<AudioBackend>,

    pub turn_seconds: Option<u64>, // length of one turn in seconds
    pub warn_yellow: Option<u64>,  // remaining seconds where warning begins
    pub warn_red: Option<u64>,     // remaining seconds where critical begins
    pub players: Option<u8>,       // number of players in the rotation

    pub volume: Option<f32>,       // playback volume (0-1)
    pub beep_ms: Option<u64>,      // length of one beep in milliseconds
    pub beep_gap_ms: Option<u64>,  // silent gap between beeps in milliseconds
    pub sample_rate: Option<u32>,  // sample rate for synthesized audio in Hz

    /// Directory searched for per-cue WAV files.
    ///
    /// Defaults to an `audio` directory next to `turnr.toml`.
    pub audio_dir: Option<String>,

    pub start_tones_p1: Option<Vec<u32>>, // start melody override for player 1
    pub start_tones_p2: Option<Vec<u32>>, // start melody override for player 2
    pub start_tones_p3: Option<Vec<u32>>, // start melody override for player 3
    pub start_tones_p4: Option<Vec<u32>>, // start melody override for player 4
    pub timeout_tones: Option<Vec<u32>>,  // timeout melody override
}

impl Config {
    /// Load configuration using the module's load function
    pub fn load() -> Result<Self> {
        load()
    }

    /// Load from path using the module's load_from_path function
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        load_from_path(path)
    }

    /// Get configuration path using the module's get_config_path function
    pub fn get_config_path() -> Result<PathBuf> {
        get_config_path()
    }

    /// Create default config using the module's create_default_config function
    pub fn create_default_config(path: &PathBuf) -> Result<()> {
        create_default_config(path)
    }

    pub fn log_config(&self, resolved_board: Option<crate::board::BoardType>) {
        log_block_start!("Loaded configuration");

        let board = self.board.unwrap_or(DEFAULT_BOARD);
        let board_display = format!(
            "Board: {}",
            match board {
                Board::Auto => {
                    if let Some(resolved) = resolved_board {
                        match resolved {
                            crate::board::BoardType::Terminal => "Auto (Terminal)",
                            crate::board::BoardType::Headless => "Auto (Headless)",
                        }
                    } else {
                        "Auto"
                    }
                }
                Board::Terminal => "Terminal",
                Board::Headless => "Headless",
            }
        );
        log_indented!("{}", board_display);

        let audio = self.audio.unwrap_or(DEFAULT_AUDIO_BACKEND);
        log_indented!(
            "Audio: {}",
            match audio {
                AudioBackend::Auto => "Auto",
                AudioBackend::Rodio => "Rodio",
                AudioBackend::Null => "Null (silent)",
            }
        );

        log_indented!("Players: {}", self.players.unwrap_or(DEFAULT_PLAYERS));
        log_indented!(
            "Turn length: {} seconds",
            self.turn_seconds.unwrap_or(DEFAULT_TURN_SECONDS)
        );
        log_indented!(
            "Warnings: yellow at {}s, red at {}s remaining",
            self.warn_yellow.unwrap_or(DEFAULT_WARN_YELLOW),
            self.warn_red.unwrap_or(DEFAULT_WARN_RED)
        );

        let volume = self.volume.unwrap_or(DEFAULT_VOLUME);
        log_indented!(
            "Beeps: {} ms @ {:.0}% volume, {} ms gap",
            self.beep_ms.unwrap_or(DEFAULT_BEEP_MS),
            volume * 100.0,
            self.beep_gap_ms.unwrap_or(DEFAULT_BEEP_GAP_MS)
        );

        if let Some(ref dir) = self.audio_dir {
            log_indented!("Audio assets: {}", dir);
        }

        let custom_melodies = [
            self.start_tones_p1.as_ref(),
            self.start_tones_p2.as_ref(),
            self.start_tones_p3.as_ref(),
            self.start_tones_p4.as_ref(),
            self.timeout_tones.as_ref(),
        ]
        .into_iter()
        .flatten()
        .filter(|tones| !tones.is_empty())
        .count();

        if custom_melodies > 0 {
            log_indented!("Custom melodies: {custom_melodies} cue(s) overridden");
        }
    }
}
