//! Application-wide constants and default values.
//!
//! Defaults mirror the values written into a freshly generated config file,
//! and the minimum/maximum pairs bound what config validation will accept.

use crate::config::{AudioBackend, Board};

/// Default board selection when the config does not specify one.
pub const DEFAULT_BOARD: Board = Board::Auto;

/// Default audio backend selection when the config does not specify one.
pub const DEFAULT_AUDIO_BACKEND: AudioBackend = AudioBackend::Auto;

/// Default length of one turn in seconds.
pub const DEFAULT_TURN_SECONDS: u64 = 10;

/// Default remaining-seconds threshold where the warning tier begins.
pub const DEFAULT_WARN_YELLOW: u64 = 4;

/// Default remaining-seconds threshold where the critical tier begins.
pub const DEFAULT_WARN_RED: u64 = 2;

/// Default number of players in the rotation.
pub const DEFAULT_PLAYERS: u8 = 4;

/// Default playback volume as a fraction of full scale.
pub const DEFAULT_VOLUME: f32 = 0.7;

/// Default duration of a single synthesized beep in milliseconds.
pub const DEFAULT_BEEP_MS: u64 = 120;

/// Default silent gap between beeps of one cue in milliseconds.
pub const DEFAULT_BEEP_GAP_MS: u64 = 40;

/// Default sample rate for synthesized audio in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Synthesized audio is rendered as interleaved stereo.
pub const DEFAULT_CHANNELS: u16 = 2;

/// Minimum allowed turn length in seconds.
pub const MINIMUM_TURN_SECONDS: u64 = 1;

/// Maximum allowed turn length in seconds (one hour).
pub const MAXIMUM_TURN_SECONDS: u64 = 3600;

/// Minimum number of players in the rotation.
pub const MINIMUM_PLAYERS: u8 = 2;

/// Maximum number of players in the rotation.
pub const MAXIMUM_PLAYERS: u8 = 8;

/// Minimum playback volume.
pub const MINIMUM_VOLUME: f32 = 0.0;

/// Maximum playback volume.
pub const MAXIMUM_VOLUME: f32 = 1.0;

/// Minimum beep duration in milliseconds.
pub const MINIMUM_BEEP_MS: u64 = 10;

/// Maximum beep duration in milliseconds.
pub const MAXIMUM_BEEP_MS: u64 = 5000;

/// Maximum silent gap between beeps in milliseconds.
pub const MAXIMUM_BEEP_GAP_MS: u64 = 5000;

/// Minimum sample rate in Hz.
pub const MINIMUM_SAMPLE_RATE: u32 = 8000;

/// Maximum sample rate in Hz.
pub const MAXIMUM_SAMPLE_RATE: u32 = 192_000;

/// Minimum tone frequency in Hz accepted from config.
pub const MINIMUM_TONE_HZ: u32 = 20;

/// Maximum tone frequency in Hz accepted from config.
pub const MAXIMUM_TONE_HZ: u32 = 12_000;

/// How long each main loop iteration waits for a button press in milliseconds.
pub const BUTTON_POLL_MS: u64 = 50;

/// Additional sleep per iteration while no turn is running, in milliseconds.
pub const IDLE_SLEEP_MS: u64 = 20;

/// Standard exit code for fatal startup failures.
pub const EXIT_FAILURE: i32 = 1;

/// System sound tried for the welcome cue when no welcome asset is installed.
pub const ALSA_FALLBACK_WAV: &str = "/usr/share/sounds/alsa/Front_Center.wav";
