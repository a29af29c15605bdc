use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub transcoder: TranscoderConfig,
    /// Reserved for the transcription microservice; read but not yet used.
    #[serde(default)]
    pub transcription: Option<TranscriptionConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file holding the clip metadata table
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Filesystem root for the object store
    pub root: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscoderConfig {
    /// Transcoder binary name or path (resolved via PATH if bare)
    pub binary: String,
    /// Wall-clock limit for one transcoder invocation
    pub timeout_secs: u64,
    /// Target sample rate for normalized output
    pub sample_rate: u32,
    /// Target channel count for normalized output (1 = mono)
    pub channels: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionConfig {
    pub base_url: String,
}

impl Config {
    /// Load configuration from a TOML file, with `CLIP_INGEST__*`
    /// environment variables layered on top (e.g.
    /// `CLIP_INGEST__SERVICE__HTTP__PORT=9000`).
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("CLIP_INGEST").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
