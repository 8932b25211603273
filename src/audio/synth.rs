//! Sine tone synthesis and WAV encoding.
//!
//! Tones are rendered as interleaved 16-bit PCM with the same sample
//! duplicated across channels. Sample counts come from rounding the
//! duration against the sample rate, so cue lengths are deterministic
//! for a given configuration.

use anyhow::{Context, Result, bail};
use std::f32::consts::TAU;
use std::path::Path;
use std::time::Duration;

/// Render a sine tone as interleaved PCM samples.
///
/// `volume` is clamped to `0.0..=1.0` and scales against full i16 range.
/// Invalid parameters are rejected up front; playback layers never see a
/// half-built buffer.
pub fn synthesize(
    freq_hz: f32,
    duration: Duration,
    volume: f32,
    sample_rate: u32,
    channels: u16,
) -> Result<Vec<i16>> {
    if duration.is_zero() {
        bail!("Tone duration must be positive");
    }
    if sample_rate == 0 {
        bail!("Sample rate must be positive");
    }
    if channels == 0 {
        bail!("Channel count must be positive");
    }
    if !freq_hz.is_finite() || freq_hz <= 0.0 {
        bail!("Tone frequency must be a positive number, got {freq_hz}");
    }

    let amplitude = volume.clamp(0.0, 1.0) * i16::MAX as f32;
    let frames = (sample_rate as f64 * duration.as_secs_f64()).round() as usize;

    let mut samples = Vec::with_capacity(frames * channels as usize);
    for frame in 0..frames {
        let t = frame as f32 / sample_rate as f32;
        let value = (TAU * freq_hz * t).sin() * amplitude;
        let sample = value as i16;
        for _ in 0..channels {
            samples.push(sample);
        }
    }

    Ok(samples)
}

/// Render a silent span with the same frame math as [`synthesize`].
///
/// Used for the gaps between beeps of one cue. A zero duration yields an
/// empty buffer rather than an error.
pub fn silence(duration: Duration, sample_rate: u32, channels: u16) -> Vec<i16> {
    let frames = (sample_rate as f64 * duration.as_secs_f64()).round() as usize;
    vec![0; frames * channels as usize]
}

/// Write interleaved PCM samples to a 16-bit WAV file.
pub fn write_wav(path: &Path, samples: &[i16], sample_rate: u32, channels: u16) -> Result<()> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file at {}", path.display()))?;

    for &sample in samples {
        writer.write_sample(sample)?;
    }

    writer
        .finalize()
        .with_context(|| format!("Failed to finalize WAV file at {}", path.display()))?;

    Ok(())
}
