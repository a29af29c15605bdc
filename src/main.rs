use anyhow::{Context, Result};
use clap::Parser;
use clip_ingest::{
    create_router, AppState, ClipStore, Config, FfmpegTranscoder, FsObjectStore, ObjectStore,
};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(about = "Audio clip collection service")]
struct Cli {
    /// Configuration file (without extension, per the config crate)
    #[arg(long, default_value = "config/clip-ingest")]
    config: String,

    /// Override the configured HTTP port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut cfg = Config::load(&cli.config)?;
    if let Some(port) = cli.port {
        cfg.service.http.port = port;
    }

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));

    let clips = ClipStore::connect(Path::new(&cfg.database.path)).await?;
    info!("Clip metadata store ready: {}", cfg.database.path);

    let objects = Arc::new(FsObjectStore::new(&cfg.storage.root)?);
    info!("Object store ({}) rooted at {}", objects.name(), cfg.storage.root);

    let transcoder = Arc::new(FfmpegTranscoder::new(cfg.transcoder.clone()));

    if let Some(transcription) = &cfg.transcription {
        info!(
            "Transcription service configured at {} (integration pending)",
            transcription.base_url
        );
    }

    let state = AppState::new(clips, objects, transcoder);
    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("Listening on {addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
