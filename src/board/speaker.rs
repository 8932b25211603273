//! Audio output implementations.
//!
//! `RodioSpeaker` plays WAV files through the system's default output
//! device and blocks until the sink drains, which is what keeps cue
//! playback synchronous with the main loop. `NullSpeaker` swallows
//! playback for machines without audio.

use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::AudioOutput;

pub struct RodioSpeaker {
    // The stream must stay alive as long as the handle is in use
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl RodioSpeaker {
    pub fn new() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()
            .context("Failed to open default audio output device")?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }
}

impl AudioOutput for RodioSpeaker {
    fn play(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open audio file {}", path.display()))?;
        let source = Decoder::new(BufReader::new(file))
            .with_context(|| format!("Failed to decode audio file {}", path.display()))?;

        let sink = Sink::try_new(&self.handle).context("Failed to create playback sink")?;
        sink.append(source);
        sink.sleep_until_end();

        Ok(())
    }
}

/// Silent output used when no audio device is available or wanted.
pub struct NullSpeaker {
    debug_enabled: bool,
}

impl NullSpeaker {
    pub fn new(debug_enabled: bool) -> Self {
        Self { debug_enabled }
    }
}

impl AudioOutput for NullSpeaker {
    fn play(&mut self, path: &Path) -> Result<()> {
        if self.debug_enabled {
            log_pipe!();
            log_debug!("Null audio: skipping {}", path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_speaker_accepts_any_path() {
        let mut speaker = NullSpeaker::new(false);
        assert!(speaker.play(Path::new("/does/not/exist.wav")).is_ok());
    }
}
