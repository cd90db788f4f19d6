//! Generated document browsing
//!
//! - GET /api/next-number: identifier the next submission will most likely get
//! - GET /api/documents: everything in the output directory
//! - GET /api/documents/:id: download one document again

use axum::{
    extract::{Path, State},
    response::Response,
    routing::get,
    Json, Router,
};
use kedb_common::store::StoredDocument;
use kedb_common::KedbNumber;
use serde::Serialize;

use crate::api::generate::docx_response;
use crate::error::ApiResult;
use crate::AppState;

/// GET /api/next-number response
#[derive(Debug, Serialize)]
pub struct NextNumberResponse {
    pub kedb_number: KedbNumber,
}

/// GET /api/documents response
#[derive(Debug, Serialize)]
pub struct DocumentListResponse {
    pub total: usize,
    pub documents: Vec<StoredDocument>,
}

/// Build document routes
pub fn document_routes() -> Router<AppState> {
    Router::new()
        .route("/api/next-number", get(next_number))
        .route("/api/documents", get(list_documents))
        .route("/api/documents/:id", get(download_document))
}

/// GET /api/next-number
///
/// The number is only reserved when a document is actually generated, so a
/// concurrent submission may take it first.
pub async fn next_number(State(state): State<AppState>) -> ApiResult<Json<NextNumberResponse>> {
    Ok(Json(NextNumberResponse {
        kedb_number: state.store.next_number()?,
    }))
}

/// GET /api/documents
pub async fn list_documents(
    State(state): State<AppState>,
) -> ApiResult<Json<DocumentListResponse>> {
    let documents = state.store.list()?;
    Ok(Json(DocumentListResponse {
        total: documents.len(),
        documents,
    }))
}

/// GET /api/documents/:id
///
/// Accepts `KEDB0007` or `KEDB0007.docx`.
pub async fn download_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = id.strip_suffix(".docx").unwrap_or(&id);
    let number = KedbNumber::parse(id)?;
    let bytes = state.store.read(number)?;
    Ok(docx_response(number, bytes))
}
