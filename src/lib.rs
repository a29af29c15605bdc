pub mod audio;
pub mod clip;
pub mod config;
pub mod error;
pub mod http;
pub mod storage;
pub mod transcode;

pub use audio::AudioFile;
pub use clip::{Clip, ClipMetrics, ClipStatus, ClipStore, ClipSummary, NewClip};
pub use config::Config;
pub use error::ApiError;
pub use http::{create_router, AppState};
pub use storage::{FsObjectStore, ObjectStore};
pub use transcode::{FfmpegTranscoder, TranscodeOutput, Transcoder};
