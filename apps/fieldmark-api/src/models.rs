//! Request and response bodies for the Fieldmark API
//!
//! Stored records ([`fieldmark_core::model::Document`] and
//! [`fieldmark_core::model::TextField`]) serialize directly as response
//! bodies; only the request shapes live here.

use fieldmark_core::model::{FieldPatch, FontFamily};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/documents`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadDocumentRequest {
    pub original_name: String,
    /// `application/pdf`, `image/png`, or `image/jpeg`.
    pub mime_type: String,
    pub data_base64: String,
}

/// Body of `POST /api/documents/:id/fields`. Everything is optional;
/// absent members fall back to the defaults (150x35 at (100,100),
/// not required, Arial).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFieldRequest {
    pub name: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub required: Option<bool>,
    pub font_family: Option<FontFamily>,
}

impl From<CreateFieldRequest> for FieldPatch {
    fn from(req: CreateFieldRequest) -> Self {
        FieldPatch {
            name: req.name,
            x: req.x,
            y: req.y,
            width: req.width,
            height: req.height,
            required: req.required,
            font_family: req.font_family,
        }
    }
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}
