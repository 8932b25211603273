//! Configuration validation functionality.
//!
//! Provides comprehensive validation to prevent impossible or problematic
//! configurations such as inverted warning thresholds or out-of-range audio
//! parameters.

use anyhow::Result;

use super::Config;
use crate::common::constants::*;

/// Comprehensive configuration validation to prevent impossible or problematic setups
pub fn validate_config(config: &Config) -> Result<()> {
    // Turn length bounds (hard limits)
    let turn_seconds = config.turn_seconds.unwrap_or(DEFAULT_TURN_SECONDS);
    if !(MINIMUM_TURN_SECONDS..=MAXIMUM_TURN_SECONDS).contains(&turn_seconds) {
        anyhow::bail!(
            "turn_seconds ({} seconds) must be between {} and {} seconds",
            turn_seconds,
            MINIMUM_TURN_SECONDS,
            MAXIMUM_TURN_SECONDS
        );
    }

    // Player count bounds
    if let Some(players) = config.players
        && !(MINIMUM_PLAYERS..=MAXIMUM_PLAYERS).contains(&players)
    {
        anyhow::bail!(
            "players ({}) must be between {} and {}",
            players,
            MINIMUM_PLAYERS,
            MAXIMUM_PLAYERS
        );
    }

    // Warning thresholds must nest inside the turn: red <= yellow < turn
    let warn_yellow = config.warn_yellow.unwrap_or(DEFAULT_WARN_YELLOW);
    let warn_red = config.warn_red.unwrap_or(DEFAULT_WARN_RED);

    if warn_red > warn_yellow {
        anyhow::bail!(
            "warn_red ({} seconds) must not exceed warn_yellow ({} seconds)",
            warn_red,
            warn_yellow
        );
    }

    if warn_yellow >= turn_seconds {
        anyhow::bail!(
            "warn_yellow ({} seconds) must be shorter than turn_seconds ({} seconds). \
            The warning tier needs at least one second of safe time before it.",
            warn_yellow,
            turn_seconds
        );
    }

    // Volume range
    if let Some(volume) = config.volume
        && !(MINIMUM_VOLUME..=MAXIMUM_VOLUME).contains(&volume)
    {
        anyhow::bail!(
            "volume ({}) must be between {} and {}",
            volume,
            MINIMUM_VOLUME,
            MAXIMUM_VOLUME
        );
    }

    // Beep timing
    if let Some(beep_ms) = config.beep_ms
        && !(MINIMUM_BEEP_MS..=MAXIMUM_BEEP_MS).contains(&beep_ms)
    {
        anyhow::bail!(
            "beep_ms ({} ms) must be between {} and {} milliseconds",
            beep_ms,
            MINIMUM_BEEP_MS,
            MAXIMUM_BEEP_MS
        );
    }

    if let Some(gap_ms) = config.beep_gap_ms
        && gap_ms > MAXIMUM_BEEP_GAP_MS
    {
        anyhow::bail!(
            "beep_gap_ms ({} ms) must not exceed {} milliseconds",
            gap_ms,
            MAXIMUM_BEEP_GAP_MS
        );
    }

    // Sample rate bounds
    if let Some(rate) = config.sample_rate
        && !(MINIMUM_SAMPLE_RATE..=MAXIMUM_SAMPLE_RATE).contains(&rate)
    {
        anyhow::bail!(
            "sample_rate ({} Hz) must be between {} and {} Hz",
            rate,
            MINIMUM_SAMPLE_RATE,
            MAXIMUM_SAMPLE_RATE
        );
    }

    // Melody override frequencies
    validate_tone_list("start_tones_p1", config.start_tones_p1.as_deref())?;
    validate_tone_list("start_tones_p2", config.start_tones_p2.as_deref())?;
    validate_tone_list("start_tones_p3", config.start_tones_p3.as_deref())?;
    validate_tone_list("start_tones_p4", config.start_tones_p4.as_deref())?;
    validate_tone_list("timeout_tones", config.timeout_tones.as_deref())?;

    Ok(())
}

/// Validate one melody override list.
///
/// An empty list is allowed and means "keep the built-in melody for this cue".
pub(crate) fn validate_tone_list(field_name: &str, tones: Option<&[u32]>) -> Result<()> {
    let Some(tones) = tones else {
        return Ok(());
    };

    for &freq in tones {
        if !(MINIMUM_TONE_HZ..=MAXIMUM_TONE_HZ).contains(&freq) {
            anyhow::bail!(
                "{} contains {} Hz, which is outside the {}-{} Hz range",
                field_name,
                freq,
                MINIMUM_TONE_HZ,
                MAXIMUM_TONE_HZ
            );
        }
    }

    Ok(())
}
