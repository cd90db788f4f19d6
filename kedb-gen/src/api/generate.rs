//! KEDB document generation
//!
//! POST /api/kedb: allocate the next number, assemble the document, save it
//! to the output directory and return it as a download.

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use kedb_common::document::{self, DOCX_CONTENT_TYPE};
use kedb_common::{time, KedbNumber};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::form::KedbForm;
use crate::AppState;

/// Response header carrying the assigned identifier
pub const KEDB_NUMBER_HEADER: HeaderName = HeaderName::from_static("x-kedb-number");

/// Build generation routes
pub fn kedb_routes() -> Router<AppState> {
    Router::new().route("/api/kedb", post(generate_document))
}

/// POST /api/kedb
///
/// Accepts the form as `multipart/form-data` and responds with the `.docx`.
pub async fn generate_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Response> {
    let form = KedbForm::from_multipart(multipart).await?;

    // Allocation reads the directory, so hold the lock until the file exists
    let guard = state.generate_lock.lock().await;

    let number = state.store.next_number()?;
    let record = form.into_record(number, time::today())?;
    let image_count = record.root_cause_images.len() + record.fix_images.len();

    let bytes = tokio::task::spawn_blocking(move || document::render(&record))
        .await
        .map_err(|e| ApiError::Internal(format!("Document task failed: {}", e)))??;

    let path = state.store.save(number, &bytes)?;
    drop(guard);

    info!(
        "Generated {} ({} bytes, {} image(s)) at {}",
        number,
        bytes.len(),
        image_count,
        path.display()
    );

    Ok(docx_response(number, bytes))
}

/// Attachment response for a stored or freshly generated document
pub fn docx_response(number: KedbNumber, bytes: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, DOCX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", number.file_name()),
            ),
            (KEDB_NUMBER_HEADER, number.to_string()),
        ],
        bytes,
    )
        .into_response()
}
