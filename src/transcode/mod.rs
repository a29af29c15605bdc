//! Transcoder boundary
//!
//! Normalization (resample, channel mixdown) and metric extraction are
//! delegated to an external tool invoked as a subprocess. The trait takes
//! input bytes and returns normalized bytes plus metrics, so tests can
//! substitute a fake with canned metrics and never spawn a process.

mod ffmpeg;

pub use ffmpeg::FfmpegTranscoder;

use anyhow::Result;

/// Result of normalizing one clip.
#[derive(Debug, Clone)]
pub struct TranscodeOutput {
    /// Normalized WAV bytes
    pub audio: Vec<u8>,
    /// Duration of the normalized audio in seconds
    pub duration_seconds: f64,
    /// Sample rate of the normalized audio
    pub sample_rate: u32,
    /// Channel count of the normalized audio
    pub channels: u16,
}

/// External audio normalizer.
#[async_trait::async_trait]
pub trait Transcoder: Send + Sync {
    /// Normalize the input and report its metrics.
    async fn transcode(&self, input: &[u8]) -> Result<TranscodeOutput>;

    /// Get transcoder name for logging
    fn name(&self) -> &str;
}
