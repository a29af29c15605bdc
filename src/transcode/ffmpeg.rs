use super::{TranscodeOutput, Transcoder};
use crate::audio::AudioFile;
use crate::config::TranscoderConfig;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};
use uuid::Uuid;

/// Transcoder invoking ffmpeg (or a compatible binary) as a subprocess.
///
/// The contract with the binary is purely command-line based: input file
/// in, normalized WAV out. Metrics come from probing the output WAV, not
/// from parsing ffmpeg's own reporting.
pub struct FfmpegTranscoder {
    binary: String,
    timeout: Duration,
    sample_rate: u32,
    channels: u16,
    work_dir: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(config: TranscoderConfig) -> Self {
        Self {
            binary: config.binary,
            timeout: Duration::from_secs(config.timeout_secs),
            sample_rate: config.sample_rate,
            channels: config.channels,
            work_dir: std::env::temp_dir(),
        }
    }

    fn build_args(&self, input: &Path, output: &Path) -> Vec<String> {
        vec![
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-y".to_string(),
            "-i".to_string(),
            input.display().to_string(),
            "-ac".to_string(),
            self.channels.to_string(),
            "-ar".to_string(),
            self.sample_rate.to_string(),
            output.display().to_string(),
        ]
    }

    async fn run(&self, input: &[u8], in_path: &Path, out_path: &Path) -> Result<TranscodeOutput> {
        tokio::fs::write(in_path, input)
            .await
            .context("failed to stage transcoder input")?;

        let args = self.build_args(in_path, out_path);
        debug!("Invoking {} {}", self.binary, args.join(" "));

        let invocation = Command::new(&self.binary)
            .args(&args)
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, invocation).await {
            Ok(result) => result.with_context(|| format!("failed to spawn {}", self.binary))?,
            Err(_) => bail!(
                "{} timed out after {} seconds",
                self.binary,
                self.timeout.as_secs()
            ),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr_tail(&stderr)
            );
        }

        let audio = tokio::fs::read(out_path)
            .await
            .context("transcoder produced no output file")?;

        let probe = AudioFile::parse(&audio).context("transcoder output is not readable WAV")?;

        Ok(TranscodeOutput {
            audio,
            duration_seconds: probe.duration_seconds,
            sample_rate: probe.sample_rate,
            channels: probe.channels,
        })
    }
}

#[async_trait::async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(&self, input: &[u8]) -> Result<TranscodeOutput> {
        let token = Uuid::new_v4();
        let in_path = self.work_dir.join(format!("clip-ingest-{token}.in"));
        let out_path = self.work_dir.join(format!("clip-ingest-{token}.wav"));

        let result = self.run(input, &in_path, &out_path).await;

        remove_quietly(&in_path).await;
        remove_quietly(&out_path).await;

        result
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

/// Last chunk of stderr, enough to diagnose without flooding responses.
fn stderr_tail(stderr: &str) -> &str {
    const TAIL_BYTES: usize = 512;

    let trimmed = stderr.trim();
    match trimmed.char_indices().nth_back(TAIL_BYTES) {
        Some((idx, _)) => &trimmed[idx..],
        None => trimmed,
    }
}

async fn remove_quietly(path: &Path) {
    if let Err(err) = tokio::fs::remove_file(path).await {
        if err.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to remove temp file {}: {}", path.display(), err);
        }
    }
}
