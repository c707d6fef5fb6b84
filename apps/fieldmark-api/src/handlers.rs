//! HTTP handlers for the Fieldmark API

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::sync::Arc;
use tracing::info;

use fieldmark_core::model::{Document, DocumentMime, FieldPatch, TextField};
use fieldmark_export::{export_fillable, ExportSource};

use crate::error::ApiError;
use crate::models::{CreateFieldRequest, HealthResponse, UploadDocumentRequest};
use crate::preview;
use crate::state::AppState;

/// Handler: GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "fieldmark-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Handler: POST /api/documents
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UploadDocumentRequest>,
) -> Result<Json<Document>, ApiError> {
    let mime = DocumentMime::from_mime(&req.mime_type)?;
    let bytes = BASE64
        .decode(&req.data_base64)
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid base64 payload: {}", e)))?;
    if bytes.is_empty() {
        return Err(ApiError::InvalidRequest("Empty upload".to_string()));
    }

    let mut store = state.store.write().await;
    let meta = store.create_document(&req.original_name, mime, bytes)?;
    Ok(Json(meta))
}

/// Handler: GET /api/documents/:id
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.get_document(&id)?.meta.clone()))
}

/// Handler: DELETE /api/documents/:id
///
/// Cascades to every field placed on the document.
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.write().await;
    store.delete_document(&id)?;
    info!(%id, "deleted document");
    Ok(StatusCode::NO_CONTENT)
}

/// Handler: GET /api/documents/:id/file
///
/// Raw bytes for the preview background loader.
pub async fn get_document_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, [(String, String); 2], Vec<u8>), ApiError> {
    let store = state.store.read().await;
    let stored = store.get_document(&id)?;
    Ok((
        StatusCode::OK,
        [
            (
                "content-type".to_string(),
                stored.meta.mime.as_str().to_string(),
            ),
            (
                "content-disposition".to_string(),
                format!("inline; filename=\"{}\"", stored.meta.original_name),
            ),
        ],
        stored.bytes.clone(),
    ))
}

/// Handler: GET /api/documents/:id/preview
///
/// PNG rasterization of the first page. A rasterization failure is
/// reported, not fatal; the client keeps its placeholder.
pub async fn get_document_preview(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, [(String, String); 1], Vec<u8>), ApiError> {
    let (mime, bytes, width) = {
        let store = state.store.read().await;
        let stored = store.get_document(&id)?;
        (stored.meta.mime, stored.bytes.clone(), stored.meta.width)
    };

    let png = preview::render_preview(mime, &bytes, width * 2.0).map_err(ApiError::Render)?;
    Ok((
        StatusCode::OK,
        [("content-type".to_string(), "image/png".to_string())],
        png,
    ))
}

/// Handler: GET /api/documents/:id/fields
pub async fn list_fields(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<Vec<TextField>> {
    let store = state.store.read().await;
    Json(store.list_fields(&id))
}

/// Handler: POST /api/documents/:id/fields
pub async fn create_field(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CreateFieldRequest>,
) -> Result<(StatusCode, Json<TextField>), ApiError> {
    let mut store = state.store.write().await;
    let field = store.create_field(&id, req.into())?;
    Ok((StatusCode::CREATED, Json(field)))
}

/// Handler: PATCH /api/fields/:id
///
/// Rejected patches leave the committed values untouched.
pub async fn update_field(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<FieldPatch>,
) -> Result<Json<TextField>, ApiError> {
    let mut store = state.store.write().await;
    Ok(Json(store.update_field(&id, &patch)?))
}

/// Handler: DELETE /api/fields/:id
pub async fn delete_field(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.write().await;
    store.delete_field(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler: GET /api/documents/:id/export
///
/// Embeds the committed fields as fillable form fields and delivers the
/// result as an attachment named after the source document.
pub async fn export_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, [(String, String); 2], Vec<u8>), ApiError> {
    let store = state.store.read().await;
    let stored = store.get_document(&id)?;
    let fields = store.list_fields(&id);

    let output = match stored.meta.mime {
        DocumentMime::Pdf => {
            export_fillable(ExportSource::Pdf(&stored.bytes), &fields, &state.fonts)?
        }
        DocumentMime::Png | DocumentMime::Jpeg => export_fillable(
            ExportSource::Image {
                bytes: &stored.bytes,
                width: stored.meta.width,
                height: stored.meta.height,
            },
            &fields,
            &state.fonts,
        )?,
    };

    let filename = fillable_name(&stored.meta.original_name);
    info!(%id, fields = fields.len(), %filename, "exported fillable PDF");
    Ok((
        StatusCode::OK,
        [
            ("content-type".to_string(), "application/pdf".to_string()),
            (
                "content-disposition".to_string(),
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        output,
    ))
}

/// `lease.pdf` becomes `lease_fillable.pdf`; extensionless names get the
/// suffix appended.
fn fillable_name(original: &str) -> String {
    let stem = original
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(original);
    format!("{}_fillable.pdf", stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fillable_name_replaces_extension() {
        assert_eq!(fillable_name("lease.pdf"), "lease_fillable.pdf");
        assert_eq!(fillable_name("scan.final.png"), "scan.final_fillable.pdf");
        assert_eq!(fillable_name("contract"), "contract_fillable.pdf");
    }
}
