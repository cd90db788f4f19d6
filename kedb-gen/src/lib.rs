//! kedb-gen library - KEDB document generator service
//!
//! Serves the KEDB entry form, turns submissions into numbered Word
//! documents in the output directory and streams them back for download.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use kedb_common::DocumentStore;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod form;

pub use crate::error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Output directory holding generated documents
    pub store: DocumentStore,
    /// Serializes number allocation and saving within this process
    pub generate_lock: Arc<Mutex<()>>,
    /// Request body limit for form submissions
    pub max_upload_bytes: usize,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(store: DocumentStore, max_upload_bytes: usize) -> Self {
        Self {
            store,
            generate_lock: Arc::new(Mutex::new(())),
            max_upload_bytes,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .merge(api::ui_routes())
        .merge(api::kedb_routes())
        .merge(api::document_routes())
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
