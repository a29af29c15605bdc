use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle marker on a clip. Transitions are forward-only:
/// `Uploaded → Processed → Transcribed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipStatus {
    Uploaded,
    Processed,
    Transcribed,
}

impl ClipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClipStatus::Uploaded => "uploaded",
            ClipStatus::Processed => "processed",
            ClipStatus::Transcribed => "transcribed",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "uploaded" => Ok(ClipStatus::Uploaded),
            "processed" => Ok(ClipStatus::Processed),
            "transcribed" => Ok(ClipStatus::Transcribed),
            other => bail!("unknown clip status: {other}"),
        }
    }
}

impl std::fmt::Display for ClipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One uploaded audio sample and its metadata row.
#[derive(Debug, Clone, Serialize)]
pub struct Clip {
    pub id: Uuid,

    /// Client-supplied name, sanitized to a bare file name
    pub filename: String,

    /// Object store key holding the raw uploaded bytes
    pub storage_key: String,

    /// Duration of the normalized audio; None until processed
    pub duration_seconds: Option<f64>,

    /// Reserved for silence analysis
    pub silence_pct: Option<f64>,

    /// Reserved for signal-to-noise analysis
    pub snr_db: Option<f64>,

    /// Sample rate of the normalized audio; None until processed
    pub sample_rate: Option<u32>,

    /// Channel count of the normalized audio; None until processed
    pub channels: Option<u16>,

    /// Reserved for content-hash de-duplication
    pub hash: Option<String>,

    /// Reserved for the ASR integration
    pub transcript: Option<String>,

    pub status: ClipStatus,

    pub created_at: DateTime<Utc>,
}

/// Fields needed to create a clip row; everything else starts null.
#[derive(Debug, Clone)]
pub struct NewClip {
    pub id: Uuid,
    pub filename: String,
    pub storage_key: String,
    pub created_at: DateTime<Utc>,
}

impl NewClip {
    /// Create a clip record with a fresh id and a storage key derived
    /// from it. The id makes the key unique regardless of filename.
    pub fn new(filename: String) -> Self {
        let id = Uuid::new_v4();
        let storage_key = format!("clips/{id}/{filename}");

        Self {
            id,
            filename,
            storage_key,
            created_at: Utc::now(),
        }
    }
}

/// Metrics reported by the transcoder for one clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipMetrics {
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Listing projection for the dataset browser.
#[derive(Debug, Clone, Serialize)]
pub struct ClipSummary {
    pub id: Uuid,
    pub filename: String,
    pub duration_seconds: Option<f64>,
    pub sample_rate: Option<u32>,
    pub channels: Option<u16>,
    pub status: ClipStatus,
    pub created_at: DateTime<Utc>,
}
