//! Documents and text fields

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FieldError;
use crate::geometry::{Rect, MIN_FIELD_HEIGHT, MIN_FIELD_WIDTH};

/// Default rectangle for a freshly added field.
pub const DEFAULT_FIELD_RECT: Rect = Rect {
    x: 100.0,
    y: 100.0,
    width: 150.0,
    height: 35.0,
};

/// Mime types a document upload may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentMime {
    Pdf,
    Png,
    Jpeg,
}

impl DocumentMime {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentMime::Pdf => "application/pdf",
            DocumentMime::Png => "image/png",
            DocumentMime::Jpeg => "image/jpeg",
        }
    }

    pub fn from_mime(mime: &str) -> Result<Self, FieldError> {
        match mime {
            "application/pdf" => Ok(DocumentMime::Pdf),
            "image/png" => Ok(DocumentMime::Png),
            "image/jpeg" | "image/jpg" => Ok(DocumentMime::Jpeg),
            other => Err(FieldError::UnsupportedMime(other.to_string())),
        }
    }

    pub fn is_image(&self) -> bool {
        !matches!(self, DocumentMime::Pdf)
    }
}

/// An uploaded document. Immutable after creation except deletion.
///
/// `width`/`height` are the page dimensions at 1:1 zoom: pixel dimensions
/// for images, first-page point dimensions for PDFs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub original_name: String,
    pub mime: DocumentMime,
    pub size: usize,
    pub width: f64,
    pub height: f64,
    pub created_at: DateTime<Utc>,
}

impl Document {
    pub fn new(
        original_name: impl Into<String>,
        mime: DocumentMime,
        size: usize,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            original_name: original_name.into(),
            mime,
            size,
            width,
            height,
            created_at: Utc::now(),
        }
    }
}

/// Fonts a text field may be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    Arial,
    Allura,
    #[serde(rename = "Dancing Script")]
    DancingScript,
}

impl FontFamily {
    pub fn from_name(name: &str) -> Result<Self, FieldError> {
        match name {
            "Arial" => Ok(FontFamily::Arial),
            "Allura" => Ok(FontFamily::Allura),
            "Dancing Script" => Ok(FontFamily::DancingScript),
            other => Err(FieldError::Validation(format!("Unknown font: {}", other))),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FontFamily::Arial => "Arial",
            FontFamily::Allura => "Allura",
            FontFamily::DancingScript => "Dancing Script",
        }
    }
}

/// A single-line text form field placed on a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextField {
    pub id: String,
    pub document_id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub required: bool,
    pub font_family: FontFamily,
    pub created_at: DateTime<Utc>,
}

impl TextField {
    /// Create a field with the default rectangle and defaults
    /// (`required = false`, Arial).
    pub fn new(document_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            document_id: document_id.into(),
            name: name.into(),
            x: DEFAULT_FIELD_RECT.x,
            y: DEFAULT_FIELD_RECT.y,
            width: DEFAULT_FIELD_RECT.width,
            height: DEFAULT_FIELD_RECT.height,
            required: false,
            font_family: FontFamily::default(),
            created_at: Utc::now(),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Apply a validated patch. On validation failure nothing changes and
    /// the prior committed values are kept.
    pub fn apply_patch(&mut self, patch: &FieldPatch) -> Result<(), FieldError> {
        let candidate = Rect {
            x: patch.x.unwrap_or(self.x),
            y: patch.y.unwrap_or(self.y),
            width: patch.width.unwrap_or(self.width),
            height: patch.height.unwrap_or(self.height),
        };
        validate_geometry(&candidate)?;

        self.x = candidate.x;
        self.y = candidate.y;
        self.width = candidate.width;
        self.height = candidate.height;
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(required) = patch.required {
            self.required = required;
        }
        if let Some(font) = patch.font_family {
            self.font_family = font;
        }
        Ok(())
    }
}

/// Partial update for a field. Absent members leave the value unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPatch {
    pub name: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub required: Option<bool>,
    pub font_family: Option<FontFamily>,
}

/// Check the geometry invariants: non-negative placement and the minimum
/// interactive size.
pub fn validate_geometry(rect: &Rect) -> Result<(), FieldError> {
    if rect.x < 0.0 || rect.y < 0.0 {
        return Err(FieldError::Validation(format!(
            "Position must be non-negative, got ({}, {})",
            rect.x, rect.y
        )));
    }
    if rect.width < MIN_FIELD_WIDTH {
        return Err(FieldError::Validation(format!(
            "Width must be at least {}, got {}",
            MIN_FIELD_WIDTH, rect.width
        )));
    }
    if rect.height < MIN_FIELD_HEIGHT {
        return Err(FieldError::Validation(format!(
            "Height must be at least {}, got {}",
            MIN_FIELD_HEIGHT, rect.height
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_field_uses_defaults() {
        let field = TextField::new("doc-1", "Name");
        assert_eq!(field.x, 100.0);
        assert_eq!(field.y, 100.0);
        assert_eq!(field.width, 150.0);
        assert_eq!(field.height, 35.0);
        assert!(!field.required);
        assert_eq!(field.font_family, FontFamily::Arial);
    }

    #[test]
    fn test_field_ids_are_unique() {
        let a = TextField::new("doc-1", "A");
        let b = TextField::new("doc-1", "B");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_patch_applies_partial_update() {
        let mut field = TextField::new("doc-1", "Name");
        let patch = FieldPatch {
            x: Some(250.0),
            required: Some(true),
            ..Default::default()
        };
        field.apply_patch(&patch).unwrap();
        assert_eq!(field.x, 250.0);
        assert_eq!(field.y, 100.0);
        assert!(field.required);
    }

    #[test]
    fn test_patch_rejects_negative_position() {
        let mut field = TextField::new("doc-1", "Name");
        let patch = FieldPatch {
            x: Some(-1.0),
            ..Default::default()
        };
        assert!(field.apply_patch(&patch).is_err());
        // Prior committed value is kept
        assert_eq!(field.x, 100.0);
    }

    #[test]
    fn test_patch_rejects_undersized_rect() {
        let mut field = TextField::new("doc-1", "Name");
        let patch = FieldPatch {
            width: Some(49.9),
            ..Default::default()
        };
        assert!(field.apply_patch(&patch).is_err());
        assert_eq!(field.width, 150.0);

        let patch = FieldPatch {
            height: Some(19.0),
            ..Default::default()
        };
        assert!(field.apply_patch(&patch).is_err());
        assert_eq!(field.height, 35.0);
    }

    #[test]
    fn test_font_family_parsing() {
        assert_eq!(FontFamily::from_name("Arial").unwrap(), FontFamily::Arial);
        assert_eq!(
            FontFamily::from_name("Dancing Script").unwrap(),
            FontFamily::DancingScript
        );
        assert!(FontFamily::from_name("Comic Sans").is_err());
    }

    #[test]
    fn test_font_family_serializes_as_display_name() {
        let json = serde_json::to_string(&FontFamily::DancingScript).unwrap();
        assert_eq!(json, "\"Dancing Script\"");
        let back: FontFamily = serde_json::from_str(&json).unwrap();
        assert_eq!(back, FontFamily::DancingScript);
    }

    #[test]
    fn test_mime_parsing() {
        assert_eq!(
            DocumentMime::from_mime("application/pdf").unwrap(),
            DocumentMime::Pdf
        );
        assert_eq!(
            DocumentMime::from_mime("image/jpg").unwrap(),
            DocumentMime::Jpeg
        );
        assert!(DocumentMime::from_mime("image/gif").is_err());
    }
}
