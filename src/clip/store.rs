use super::model::{Clip, ClipMetrics, ClipStatus, ClipSummary, NewClip};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;
use uuid::Uuid;

/// SQLite-backed clip metadata store.
///
/// Schema constraints carry the data-model invariants: unique id and
/// storage key, and a CHECK on the status column. Forward-only status
/// transitions are enforced by compare-and-swap updates, which also make
/// concurrent process calls on the same clip resolve to a single winner.
#[derive(Clone)]
pub struct ClipStore {
    pool: SqlitePool,
}

impl ClipStore {
    /// Open (creating if needed) the database file and ensure the schema.
    pub async fn connect(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        // mode=rwc: read, write, create
        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = SqlitePool::connect(&db_url)
            .await
            .with_context(|| format!("failed to open database {}", db_path.display()))?;

        sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;
        // WAL allows concurrent readers alongside the single writer
        sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
        sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

        create_schema(&pool).await?;

        Ok(Self { pool })
    }

    /// In-memory database for tests. Capped at one connection: each
    /// SQLite `:memory:` connection is its own database.
    pub async fn connect_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .context("failed to open in-memory database")?;

        create_schema(&pool).await?;

        Ok(Self { pool })
    }

    /// Direct pool access, for callers that need ad-hoc queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert a new row in status `uploaded` with all metrics null.
    pub async fn create(&self, clip: &NewClip) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO clips (id, filename, storage_key, status, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(clip.id.to_string())
        .bind(&clip.filename)
        .bind(&clip.storage_key)
        .bind(ClipStatus::Uploaded.as_str())
        .bind(clip.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to insert clip {}", clip.id))?;

        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Clip>> {
        let row = sqlx::query(
            r#"
            SELECT id, filename, storage_key, duration_seconds, silence_pct, snr_db,
                   sample_rate, channels, hash, transcript, status, created_at
            FROM clips
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_clip).transpose()
    }

    /// Most recent clips first; ties on created_at break toward the later
    /// insert so the listing order is deterministic.
    pub async fn list_recent(&self, limit: u32) -> Result<Vec<ClipSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT id, filename, duration_seconds, sample_rate, channels, status, created_at
            FROM clips
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_summary).collect()
    }

    /// Fill metrics and move `uploaded → processed` in one statement.
    ///
    /// Returns false when no row transitioned: the clip is missing or has
    /// already left `uploaded`. Losing a concurrent race lands here too.
    pub async fn mark_processed(&self, id: Uuid, metrics: &ClipMetrics) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE clips
            SET duration_seconds = ?, sample_rate = ?, channels = ?, status = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(metrics.duration_seconds)
        .bind(metrics.sample_rate as i64)
        .bind(metrics.channels as i64)
        .bind(ClipStatus::Processed.as_str())
        .bind(id.to_string())
        .bind(ClipStatus::Uploaded.as_str())
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to mark clip {id} processed"))?;

        Ok(result.rows_affected() == 1)
    }

    /// Attach a transcript and move `processed → transcribed`.
    ///
    /// No HTTP endpoint drives this yet; it exists so the lifecycle is
    /// complete for the transcription integration.
    pub async fn mark_transcribed(&self, id: Uuid, transcript: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE clips
            SET transcript = ?, status = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(transcript)
        .bind(ClipStatus::Transcribed.as_str())
        .bind(id.to_string())
        .bind(ClipStatus::Processed.as_str())
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to mark clip {id} transcribed"))?;

        Ok(result.rows_affected() == 1)
    }
}

async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS clips (
            id TEXT PRIMARY KEY,
            filename TEXT NOT NULL,
            storage_key TEXT NOT NULL UNIQUE,
            duration_seconds REAL,
            silence_pct REAL,
            snr_db REAL,
            sample_rate INTEGER,
            channels INTEGER,
            hash TEXT,
            transcript TEXT,
            status TEXT NOT NULL CHECK (status IN ('uploaded', 'processed', 'transcribed')),
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .context("failed to create clips table")?;

    Ok(())
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("invalid created_at timestamp: {raw}"))?
        .with_timezone(&Utc))
}

fn row_to_clip(row: SqliteRow) -> Result<Clip> {
    let id_str: String = row.get("id");
    let status_str: String = row.get("status");
    let created_at_str: String = row.get("created_at");

    Ok(Clip {
        id: Uuid::parse_str(&id_str)?,
        filename: row.get("filename"),
        storage_key: row.get("storage_key"),
        duration_seconds: row.get("duration_seconds"),
        silence_pct: row.get("silence_pct"),
        snr_db: row.get("snr_db"),
        sample_rate: row.get::<Option<i64>, _>("sample_rate").map(|v| v as u32),
        channels: row.get::<Option<i64>, _>("channels").map(|v| v as u16),
        hash: row.get("hash"),
        transcript: row.get("transcript"),
        status: ClipStatus::parse(&status_str)?,
        created_at: parse_timestamp(&created_at_str)?,
    })
}

fn row_to_summary(row: SqliteRow) -> Result<ClipSummary> {
    let id_str: String = row.get("id");
    let status_str: String = row.get("status");
    let created_at_str: String = row.get("created_at");

    Ok(ClipSummary {
        id: Uuid::parse_str(&id_str)?,
        filename: row.get("filename"),
        duration_seconds: row.get("duration_seconds"),
        sample_rate: row.get::<Option<i64>, _>("sample_rate").map(|v| v as u32),
        channels: row.get::<Option<i64>, _>("channels").map(|v| v as u16),
        status: ClipStatus::parse(&status_str)?,
        created_at: parse_timestamp(&created_at_str)?,
    })
}
