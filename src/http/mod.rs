//! HTTP API server for the clip dataset
//!
//! This module provides the REST API for the upload → process → browse
//! pipeline:
//! - POST /clips - Upload a new audio clip
//! - POST /clips/:id/process - Normalize a clip and record its metrics
//! - GET /clips - List recent clips, newest first
//! - GET /clips/:id - Fetch one clip
//! - GET /health - Health check
//! - GET / - Static dataset browser page

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
