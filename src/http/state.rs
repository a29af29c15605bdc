use crate::clip::ClipStore;
use crate::storage::ObjectStore;
use crate::transcode::Transcoder;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Clip metadata store
    pub clips: ClipStore,

    /// Raw clip bytes, addressed by storage key
    pub objects: Arc<dyn ObjectStore>,

    /// External audio normalizer
    pub transcoder: Arc<dyn Transcoder>,

    /// When the service started (for /health uptime)
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        clips: ClipStore,
        objects: Arc<dyn ObjectStore>,
        transcoder: Arc<dyn Transcoder>,
    ) -> Self {
        Self {
            clips,
            objects,
            transcoder,
            started_at: Utc::now(),
        }
    }
}
