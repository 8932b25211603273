//! Audio cue resolution and playback.
//!
//! Every cue resolves to either a recorded asset in the audio directory or
//! a deterministic sequence of synthesized tones. Assets always win when
//! they are present and readable; the tone sequences exist so a device
//! with no installed sounds still gives full feedback. Synthesized tones
//! are written to scoped temporary WAV files that are removed as soon as
//! playback finishes, whether or not it succeeded.

pub mod synth;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::board::AudioOutput;
use crate::common::constants::*;
use crate::config::Config;
use crate::core::machine::Cue;

/// One synthesized beep plus the pause that follows it.
#[derive(Debug, Clone, PartialEq)]
pub struct Tone {
    pub freq_hz: f32,
    pub duration: Duration,
    pub gap: Duration,
}

/// What a cue resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// A playable file on disk.
    Asset(PathBuf),
    /// Synthesized fallback tones, in playback order.
    Tones(Vec<Tone>),
}

/// Resolves cues against the audio directory and plays them.
pub struct CueProvider {
    audio_dir: PathBuf,
    alsa_fallback: PathBuf,
    players: u8,
    volume: f32,
    beep: Duration,
    gap: Duration,
    sample_rate: u32,
    start_overrides: [Option<Vec<u32>>; 4],
    timeout_override: Option<Vec<u32>>,
    debug_enabled: bool,
}

impl CueProvider {
    /// Build a provider from the loaded configuration.
    ///
    /// The audio directory defaults to `audio/` next to the config file
    /// when not set explicitly.
    pub fn from_config(config: &Config, debug_enabled: bool) -> Result<Self> {
        let audio_dir = match &config.audio_dir {
            Some(dir) => PathBuf::from(dir),
            None => {
                let config_path = crate::config::get_config_path()?;
                let base = config_path
                    .parent()
                    .context("Config path has no parent directory")?;
                base.join("audio")
            }
        };

        Ok(Self {
            audio_dir,
            alsa_fallback: PathBuf::from(ALSA_FALLBACK_WAV),
            players: config.players.unwrap_or(DEFAULT_PLAYERS),
            volume: config.volume.unwrap_or(DEFAULT_VOLUME),
            beep: Duration::from_millis(config.beep_ms.unwrap_or(DEFAULT_BEEP_MS)),
            gap: Duration::from_millis(config.beep_gap_ms.unwrap_or(DEFAULT_BEEP_GAP_MS)),
            sample_rate: config.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE),
            start_overrides: [
                config.start_tones_p1.clone(),
                config.start_tones_p2.clone(),
                config.start_tones_p3.clone(),
                config.start_tones_p4.clone(),
            ],
            timeout_override: config.timeout_tones.clone(),
            debug_enabled,
        })
    }

    /// Resolve a cue to a playable item.
    ///
    /// Start and timeout cues always resolve: to their asset when present,
    /// otherwise to their tone sequence. The welcome cue has no tone
    /// fallback; when neither the welcome asset nor the system clip
    /// exists, it resolves to `None` and startup continues silently.
    pub fn resolve(&self, cue: Cue) -> Option<Resolved> {
        match cue {
            Cue::Welcome => {
                if let Some(path) = self.existing_asset("welcome.wav") {
                    return Some(Resolved::Asset(path));
                }
                if asset_is_playable(&self.alsa_fallback) {
                    return Some(Resolved::Asset(self.alsa_fallback.clone()));
                }
                None
            }
            Cue::StartTurn(player) => {
                let name = format!("start_p{player}.wav");
                if let Some(path) = self.existing_asset(&name) {
                    return Some(Resolved::Asset(path));
                }
                Some(Resolved::Tones(self.tones_for(self.start_freqs(player))))
            }
            Cue::TimeoutAlarm => {
                if let Some(path) = self.existing_asset("timeout.wav") {
                    return Some(Resolved::Asset(path));
                }
                Some(Resolved::Tones(self.tones_for(self.timeout_freqs())))
            }
        }
    }

    /// Resolve and play a cue through the audio output.
    ///
    /// Playback failures are logged and the cue is treated as complete;
    /// only synthesis rejecting its parameters propagates an error.
    pub fn play(&self, cue: Cue, output: &mut dyn AudioOutput) -> Result<()> {
        match self.resolve(cue) {
            Some(Resolved::Asset(path)) => {
                if self.debug_enabled {
                    log_pipe!();
                    log_debug!("Playing {}", path.display());
                }
                if let Err(e) = output.play(&path) {
                    log_pipe!();
                    log_warning!("Playback failed for {}: {e}", path.display());
                }
            }
            Some(Resolved::Tones(tones)) => {
                if self.debug_enabled {
                    log_pipe!();
                    log_debug!("No asset for this cue, playing {} fallback tones", tones.len());
                }
                self.play_tones(&tones, output)?;
            }
            None => {
                if self.debug_enabled {
                    log_pipe!();
                    log_debug!("No welcome audio found, continuing without it");
                }
            }
        }
        Ok(())
    }

    /// Synthesize each tone to a scoped temporary WAV and play it.
    ///
    /// The temporary file is removed when it goes out of scope, including
    /// on the failure path. A failed tone ends the sequence; the cue is
    /// still treated as complete.
    fn play_tones(&self, tones: &[Tone], output: &mut dyn AudioOutput) -> Result<()> {
        for tone in tones {
            let samples = self.render_tone(tone)?;
            let tmp = tempfile::Builder::new()
                .prefix("turnr-tone-")
                .suffix(".wav")
                .tempfile()
                .context("Failed to create temporary tone file")?;
            synth::write_wav(tmp.path(), &samples, self.sample_rate, DEFAULT_CHANNELS)?;

            if let Err(e) = output.play(tmp.path()) {
                log_pipe!();
                log_warning!("Tone playback failed: {e}");
                return Ok(());
            }
        }
        Ok(())
    }

    fn render_tone(&self, tone: &Tone) -> Result<Vec<i16>> {
        let mut samples = synth::synthesize(
            tone.freq_hz,
            tone.duration,
            self.volume,
            self.sample_rate,
            DEFAULT_CHANNELS,
        )?;
        samples.extend(synth::silence(tone.gap, self.sample_rate, DEFAULT_CHANNELS));
        Ok(samples)
    }

    fn existing_asset(&self, name: &str) -> Option<PathBuf> {
        let path = self.audio_dir.join(name);
        asset_is_playable(&path).then_some(path)
    }

    /// Fallback frequencies for a player's start cue.
    ///
    /// The two-player and four-player rotations ship distinct preset
    /// tables; both were tuned on real hardware and are kept as-is.
    /// Players beyond the table get a neutral double beep.
    fn start_freqs(&self, player: u8) -> Vec<u32> {
        if let Some(config_freqs) = usize::from(player)
            .checked_sub(1)
            .and_then(|i| self.start_overrides.get(i))
            .and_then(|o| o.as_ref())
            && !config_freqs.is_empty()
        {
            return config_freqs.clone();
        }

        if self.players == 2 {
            match player {
                1 => vec![1200, 1200],
                2 => vec![900, 900, 900],
                _ => vec![1000, 1000],
            }
        } else {
            match player {
                1 => vec![1200, 1200],
                2 => vec![1000, 1000, 1000],
                3 => vec![900, 1100, 900],
                4 => vec![700, 700, 1000, 700],
                _ => vec![1000, 1000],
            }
        }
    }

    fn timeout_freqs(&self) -> Vec<u32> {
        match &self.timeout_override {
            Some(freqs) if !freqs.is_empty() => freqs.clone(),
            _ => vec![1200, 1000, 800, 600, 400],
        }
    }

    fn tones_for(&self, freqs: Vec<u32>) -> Vec<Tone> {
        freqs
            .into_iter()
            .map(|f| Tone {
                freq_hz: f as f32,
                duration: self.beep,
                gap: self.gap,
            })
            .collect()
    }
}

/// An asset counts only if it is a regular file that can actually be
/// opened; anything else falls through to the tone sequence.
fn asset_is_playable(path: &Path) -> bool {
    path.is_file() && std::fs::File::open(path).is_ok()
}
