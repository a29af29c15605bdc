//! Clip metadata: the one entity this service manages
//!
//! A clip is one uploaded audio sample. Its row is created at upload
//! (status `uploaded`), filled with metrics when the transcoder runs
//! (status `processed`), and reserved columns exist for the future ASR
//! integration (status `transcribed`). Status only ever moves forward.

mod model;
mod store;

pub use model::{Clip, ClipMetrics, ClipStatus, ClipSummary, NewClip};
pub use store::ClipStore;
