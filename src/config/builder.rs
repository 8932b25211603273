//! Configuration file building and default config creation.
//!
//! Handles creating the default configuration file and the config builder
//! pattern for properly formatted output.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::common::constants::*;
use crate::common::utils::private_path;

/// Create a default config file at the given path.
///
/// The generated file carries every tunable setting with its default value
/// so users can discover the knobs without consulting documentation. Melody
/// overrides are written as empty lists, which keep the built-in melodies
/// until frequencies are filled in.
pub fn create_default_config(path: &PathBuf) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let config_content = ConfigBuilder::new()
        .add_section("Board")
        .add_setting(
            "board",
            &format!("\"{}\"", DEFAULT_BOARD.as_str()),
            "Board to use: \"auto\", \"terminal\" or \"headless\"",
        )
        .add_setting(
            "audio",
            &format!("\"{}\"", DEFAULT_AUDIO_BACKEND.as_str()),
            "Audio backend: \"auto\", \"rodio\" or \"null\"",
        )
        .add_section("Timer")
        .add_setting(
            "turn_seconds",
            &DEFAULT_TURN_SECONDS.to_string(),
            &format!(
                "Length of one turn in seconds ({MINIMUM_TURN_SECONDS}-{MAXIMUM_TURN_SECONDS})"
            ),
        )
        .add_setting(
            "warn_yellow",
            &DEFAULT_WARN_YELLOW.to_string(),
            "Remaining seconds where the warning tier begins",
        )
        .add_setting(
            "warn_red",
            &DEFAULT_WARN_RED.to_string(),
            "Remaining seconds where the critical tier begins",
        )
        .add_setting(
            "players",
            &DEFAULT_PLAYERS.to_string(),
            &format!("Number of players in the rotation ({MINIMUM_PLAYERS}-{MAXIMUM_PLAYERS})"),
        )
        .add_section("Audio synthesis")
        .add_setting(
            "volume",
            &DEFAULT_VOLUME.to_string(),
            &format!("Playback volume ({MINIMUM_VOLUME}-{MAXIMUM_VOLUME})"),
        )
        .add_setting(
            "beep_ms",
            &DEFAULT_BEEP_MS.to_string(),
            &format!("Length of one beep in milliseconds ({MINIMUM_BEEP_MS}-{MAXIMUM_BEEP_MS})"),
        )
        .add_setting(
            "beep_gap_ms",
            &DEFAULT_BEEP_GAP_MS.to_string(),
            &format!("Silent gap between beeps in milliseconds (0-{MAXIMUM_BEEP_GAP_MS})"),
        )
        .add_setting(
            "sample_rate",
            &DEFAULT_SAMPLE_RATE.to_string(),
            &format!(
                "Sample rate for synthesized audio in Hz ({MINIMUM_SAMPLE_RATE}-{MAXIMUM_SAMPLE_RATE})"
            ),
        )
        .add_section("Custom melodies")
        .add_setting(
            "start_tones_p1",
            "[]",
            "Start melody for player 1 in Hz (empty = built-in)",
        )
        .add_setting(
            "start_tones_p2",
            "[]",
            "Start melody for player 2 in Hz (empty = built-in)",
        )
        .add_setting(
            "start_tones_p3",
            "[]",
            "Start melody for player 3 in Hz (empty = built-in)",
        )
        .add_setting(
            "start_tones_p4",
            "[]",
            "Start melody for player 4 in Hz (empty = built-in)",
        )
        .add_setting(
            "timeout_tones",
            "[]",
            "Timeout melody in Hz (empty = built-in)",
        )
        .build();

    fs::write(path, config_content).context("Failed to write default config file")?;

    log_block_start!("Created default configuration: {}", private_path(path));

    Ok(())
}

/// Builder for creating dynamically-aligned configuration files.
///
/// This builder maintains proper comment alignment by calculating the maximum
/// width of all setting lines and applying consistent padding. This ensures
/// that when defaults change in constants.rs, the config file formatting
/// remains correct.
struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

#[derive(Clone)]
struct ConfigEntry {
    content: String,
    entry_type: EntryType,
}

#[derive(Clone)]
enum EntryType {
    Section,
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry {
            content: format!("#[{title}]"),
            entry_type: EntryType::Section,
        });
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        let line = format!("{key} = {value}");
        self.entries.push(ConfigEntry {
            content: line.clone(),
            entry_type: EntryType::Setting {
                line,
                comment: format!("# {comment}"),
            },
        });
        self
    }

    fn build(self) -> String {
        // Calculate the maximum width of all setting lines for alignment
        let max_width = self
            .entries
            .iter()
            .filter_map(|entry| match &entry.entry_type {
                EntryType::Setting { line, .. } => Some(line.len()),
                EntryType::Section => None,
            })
            .max()
            .unwrap_or(0)
            + 1; // +1 for one space between setting and comment

        let mut result = Vec::new();
        let mut first_section = true;

        for entry in self.entries {
            match entry.entry_type {
                EntryType::Section => {
                    if !first_section {
                        result.push(String::new()); // Empty line before new section
                    }
                    result.push(entry.content);
                    first_section = false;
                }
                EntryType::Setting { line, comment } => {
                    let padding = " ".repeat(max_width - line.len());
                    result.push(format!("{line}{padding}{comment}"));
                }
            }
        }

        result.join("\n")
    }
}
