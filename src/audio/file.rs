use anyhow::{Context, Result};
use hound::WavReader;
use std::io::{Cursor, Read};
use std::path::Path;

/// Metrics read from a WAV file header.
///
/// Used to probe the transcoder's normalized output; decoding of arbitrary
/// input formats is the transcoder's job, not ours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioFile {
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = WavReader::open(path)
            .with_context(|| format!("failed to open WAV file {}", path.display()))?;

        Ok(Self::from_reader(reader))
    }

    /// Probe WAV bytes held in memory.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let reader = WavReader::new(Cursor::new(bytes)).context("failed to parse WAV data")?;

        Ok(Self::from_reader(reader))
    }

    fn from_reader<R: Read>(reader: WavReader<R>) -> Self {
        let spec = reader.spec();
        // duration() counts frames (samples per channel)
        let duration_seconds = reader.duration() as f64 / spec.sample_rate as f64;

        Self {
            duration_seconds,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
        }
    }
}
