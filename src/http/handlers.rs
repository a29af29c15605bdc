use super::state::AppState;
use crate::clip::{Clip, ClipMetrics, ClipStatus, ClipSummary, NewClip};
use crate::error::ApiError;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub id: Uuid,
    pub status: ClipStatus,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Maximum number of clips to return (default 50, capped at 500)
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub uptime_seconds: u64,
}

const DEFAULT_LIST_LIMIT: u32 = 50;
const MAX_LIST_LIMIT: u32 = 500;

// ============================================================================
// Handlers
// ============================================================================

/// POST /clips
/// Store the uploaded bytes and create the metadata row (status: uploaded)
pub async fn upload_clip(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let mut payload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        // Accept the field named "file", or the first field carrying a filename
        if field.name() != Some("file") && field.file_name().is_none() {
            continue;
        }

        let filename = sanitize_filename(field.file_name());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {e}")))?;

        payload = Some((filename, bytes.to_vec()));
        break;
    }

    let (filename, bytes) =
        payload.ok_or_else(|| ApiError::BadRequest("upload must contain a file field".into()))?;

    if bytes.is_empty() {
        return Err(ApiError::BadRequest("uploaded payload is empty".into()));
    }

    let clip = NewClip::new(filename);

    state
        .objects
        .put(&clip.storage_key, &bytes)
        .await
        .map_err(|e| ApiError::Storage(format!("{e:#}")))?;

    if let Err(e) = state.clips.create(&clip).await {
        error!("Failed to create clip row for {}: {:#}", clip.id, e);

        // The blob was already written; reclaim it so no orphan remains
        if let Err(del) = state.objects.delete(&clip.storage_key).await {
            warn!(
                "Orphaned object {} left behind after failed insert: {:#}",
                clip.storage_key, del
            );
        }

        return Err(e.into());
    }

    info!(
        "Uploaded clip {} ({} bytes) as {}",
        clip.id,
        bytes.len(),
        clip.storage_key
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            id: clip.id,
            status: ClipStatus::Uploaded,
        }),
    ))
}

/// POST /clips/:clip_id/process
/// Normalize the stored audio and fill the row's metrics (status: processed)
pub async fn process_clip(
    State(state): State<AppState>,
    Path(clip_id): Path<String>,
) -> Result<Json<Clip>, ApiError> {
    let id = parse_clip_id(&clip_id)?;

    let clip = state
        .clips
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("clip {id} not found")))?;

    if clip.status != ClipStatus::Uploaded {
        return Err(ApiError::Conflict(format!(
            "clip {id} is already {}",
            clip.status
        )));
    }

    let bytes = state
        .objects
        .get(&clip.storage_key)
        .await
        .map_err(|e| ApiError::Storage(format!("{e:#}")))?;

    // Row stays untouched in `uploaded` when this fails
    let output = state
        .transcoder
        .transcode(&bytes)
        .await
        .map_err(|e| ApiError::Transcode(format!("{e:#}")))?;

    let metrics = ClipMetrics {
        duration_seconds: output.duration_seconds,
        sample_rate: output.sample_rate,
        channels: output.channels,
    };

    let transitioned = state.clips.mark_processed(id, &metrics).await?;
    if !transitioned {
        // Another request won the status race between our read and update
        return Err(ApiError::Conflict(format!(
            "clip {id} was processed concurrently"
        )));
    }

    info!(
        "Processed clip {}: {:.2}s, {}Hz, {} channel(s)",
        id, metrics.duration_seconds, metrics.sample_rate, metrics.channels
    );

    let updated = state
        .clips
        .get(id)
        .await?
        .ok_or_else(|| ApiError::Other(anyhow::anyhow!("clip {id} row disappeared")))?;

    Ok(Json(updated))
}

/// GET /clips/:clip_id
/// Fetch one clip row
pub async fn get_clip(
    State(state): State<AppState>,
    Path(clip_id): Path<String>,
) -> Result<Json<Clip>, ApiError> {
    let id = parse_clip_id(&clip_id)?;

    let clip = state
        .clips
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("clip {id} not found")))?;

    Ok(Json(clip))
}

/// GET /clips
/// List recent clips, newest first
pub async fn list_clips(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ClipSummary>>, ApiError> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .min(MAX_LIST_LIMIT);

    let clips = state.clips.list_recent(limit).await?;

    Ok(Json(clips))
}

/// GET /health
/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.started_at);

    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime.num_seconds().max(0) as u64,
    })
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_clip_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("invalid clip id: {raw}")))
}

/// Reduce a client-supplied filename to a safe bare name.
///
/// Strips any path, replaces characters outside [A-Za-z0-9._-], and falls
/// back to "clip.bin" when nothing usable remains.
fn sanitize_filename(raw: Option<&str>) -> String {
    let base = raw
        .map(|name| name.replace('\\', "/"))
        .and_then(|name| {
            name.rsplit('/')
                .next()
                .map(|s| s.to_string())
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        "clip.bin".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::sanitize_filename;

    #[test]
    fn sanitize_keeps_plain_names() {
        assert_eq!(sanitize_filename(Some("a.wav")), "a.wav");
        assert_eq!(sanitize_filename(Some("take_02-final.webm")), "take_02-final.webm");
    }

    #[test]
    fn sanitize_strips_paths() {
        assert_eq!(sanitize_filename(Some("/etc/passwd")), "passwd");
        assert_eq!(sanitize_filename(Some("..\\..\\boot.ini")), "boot.ini");
        assert_eq!(sanitize_filename(Some("dir/../a.wav")), "a.wav");
    }

    #[test]
    fn sanitize_replaces_odd_characters() {
        assert_eq!(sanitize_filename(Some("my clip (1).wav")), "my_clip__1_.wav");
    }

    #[test]
    fn sanitize_falls_back_when_empty() {
        assert_eq!(sanitize_filename(None), "clip.bin");
        assert_eq!(sanitize_filename(Some("")), "clip.bin");
        assert_eq!(sanitize_filename(Some("...")), "clip.bin");
        assert_eq!(sanitize_filename(Some("dir/")), "clip.bin");
    }
}
