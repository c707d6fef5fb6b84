//! Application state for the Fieldmark API
//!
//! All documents and fields live in one [`DocumentStore`] owned by the
//! process (or by a test). Nothing is global: the store is created
//! explicitly and reached only through [`AppState`].

use std::collections::HashMap;
use std::path::PathBuf;

use fieldmark_core::model::{Document, DocumentMime, FieldPatch, TextField};
use fieldmark_core::FieldError;
use fieldmark_export::FontResolver;
use image::GenericImageView;
use tokio::sync::RwLock;

pub struct AppState {
    pub store: RwLock<DocumentStore>,
    pub fonts: FontResolver,
}

impl AppState {
    pub fn new(fonts_dir: Option<PathBuf>) -> Self {
        Self {
            store: RwLock::new(DocumentStore::new()),
            fonts: FontResolver::new(fonts_dir),
        }
    }
}

/// A document's metadata plus its raw bytes.
pub struct StoredDocument {
    pub meta: Document,
    pub bytes: Vec<u8>,
}

/// Arena-style in-memory storage with process lifetime.
///
/// Fields are kept in one vector in creation order, which is also the
/// order `list_fields` returns and the order export places them in.
#[derive(Default)]
pub struct DocumentStore {
    documents: HashMap<String, StoredDocument>,
    fields: Vec<TextField>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store an upload. Page/image dimensions are derived
    /// from the bytes, not trusted from the client.
    pub fn create_document(
        &mut self,
        original_name: &str,
        mime: DocumentMime,
        bytes: Vec<u8>,
    ) -> Result<Document, FieldError> {
        let (width, height) = probe_dimensions(mime, &bytes)?;
        let meta = Document::new(original_name, mime, bytes.len(), width, height);
        self.documents
            .insert(meta.id.clone(), StoredDocument { meta: meta.clone(), bytes });
        tracing::info!(id = %meta.id, name = %meta.original_name, "stored document");
        Ok(meta)
    }

    pub fn get_document(&self, id: &str) -> Result<&StoredDocument, FieldError> {
        self.documents
            .get(id)
            .ok_or_else(|| FieldError::DocumentNotFound(id.to_string()))
    }

    /// Delete a document and cascade to every field placed on it.
    pub fn delete_document(&mut self, id: &str) -> Result<(), FieldError> {
        self.documents
            .remove(id)
            .ok_or_else(|| FieldError::DocumentNotFound(id.to_string()))?;
        self.fields.retain(|f| f.document_id != id);
        Ok(())
    }

    /// Fields for a document, in creation order. Empty for unknown ids,
    /// including just-deleted documents.
    pub fn list_fields(&self, document_id: &str) -> Vec<TextField> {
        self.fields
            .iter()
            .filter(|f| f.document_id == document_id)
            .cloned()
            .collect()
    }

    /// Create a field with the default rectangle, then apply any initial
    /// values from the request. The document must exist.
    pub fn create_field(
        &mut self,
        document_id: &str,
        patch: FieldPatch,
    ) -> Result<TextField, FieldError> {
        if !self.documents.contains_key(document_id) {
            return Err(FieldError::DocumentNotFound(document_id.to_string()));
        }
        let count = self
            .fields
            .iter()
            .filter(|f| f.document_id == document_id)
            .count();
        let mut field = TextField::new(document_id, format!("Field {}", count + 1));
        field.apply_patch(&patch)?;
        self.fields.push(field.clone());
        Ok(field)
    }

    pub fn update_field(&mut self, id: &str, patch: &FieldPatch) -> Result<TextField, FieldError> {
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| FieldError::FieldNotFound(id.to_string()))?;
        field.apply_patch(patch)?;
        Ok(field.clone())
    }

    pub fn delete_field(&mut self, id: &str) -> Result<(), FieldError> {
        let before = self.fields.len();
        self.fields.retain(|f| f.id != id);
        if self.fields.len() == before {
            return Err(FieldError::FieldNotFound(id.to_string()));
        }
        Ok(())
    }
}

fn probe_dimensions(mime: DocumentMime, bytes: &[u8]) -> Result<(f64, f64), FieldError> {
    match mime {
        DocumentMime::Pdf => fieldmark_export::pdf_page_size(bytes)
            .map_err(|e| FieldError::Validation(format!("Unreadable PDF upload: {}", e))),
        DocumentMime::Png | DocumentMime::Jpeg => {
            let decoded = image::load_from_memory(bytes)
                .map_err(|e| FieldError::Validation(format!("Unreadable image upload: {}", e)))?;
            let (w, h) = decoded.dimensions();
            Ok((w as f64, h as f64))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmark_core::model::FontFamily;

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(200, 300, image::Rgb([255, 255, 255]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut bytes, image::ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    fn store_with_doc() -> (DocumentStore, String) {
        let mut store = DocumentStore::new();
        let doc = store
            .create_document("scan.png", DocumentMime::Png, tiny_png())
            .unwrap();
        (store, doc.id)
    }

    #[test]
    fn test_upload_derives_dimensions_from_bytes() {
        let (store, id) = store_with_doc();
        let stored = store.get_document(&id).unwrap();
        assert_eq!(stored.meta.width, 200.0);
        assert_eq!(stored.meta.height, 300.0);
    }

    #[test]
    fn test_garbage_upload_is_rejected() {
        let mut store = DocumentStore::new();
        let result = store.create_document("bad.png", DocumentMime::Png, vec![1, 2, 3]);
        assert!(matches!(result, Err(FieldError::Validation(_))));
    }

    #[test]
    fn test_create_field_uses_defaults() {
        let (mut store, id) = store_with_doc();
        let field = store.create_field(&id, FieldPatch::default()).unwrap();
        assert_eq!(field.x, 100.0);
        assert_eq!(field.width, 150.0);
        assert!(!field.required);
        assert_eq!(field.font_family, FontFamily::Arial);
        assert_eq!(field.name, "Field 1");
    }

    #[test]
    fn test_create_field_requires_document() {
        let mut store = DocumentStore::new();
        let result = store.create_field("missing", FieldPatch::default());
        assert!(matches!(result, Err(FieldError::DocumentNotFound(_))));
    }

    #[test]
    fn test_list_fields_keeps_creation_order() {
        let (mut store, id) = store_with_doc();
        let a = store.create_field(&id, FieldPatch::default()).unwrap();
        let b = store.create_field(&id, FieldPatch::default()).unwrap();
        let c = store.create_field(&id, FieldPatch::default()).unwrap();

        let ids: Vec<String> = store.list_fields(&id).into_iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![a.id, b.id, c.id]);
    }

    #[test]
    fn test_invalid_patch_keeps_committed_value() {
        let (mut store, id) = store_with_doc();
        let field = store.create_field(&id, FieldPatch::default()).unwrap();

        let bad = FieldPatch {
            width: Some(10.0),
            ..Default::default()
        };
        assert!(store.update_field(&field.id, &bad).is_err());
        assert_eq!(store.list_fields(&id)[0].width, 150.0);
    }

    #[test]
    fn test_delete_document_cascades_to_fields() {
        let (mut store, id) = store_with_doc();
        store.create_field(&id, FieldPatch::default()).unwrap();
        store.create_field(&id, FieldPatch::default()).unwrap();

        store.delete_document(&id).unwrap();
        assert!(store.list_fields(&id).is_empty());
        assert!(matches!(
            store.get_document(&id),
            Err(FieldError::DocumentNotFound(_))
        ));
    }

    #[test]
    fn test_cascade_leaves_other_documents_alone() {
        let (mut store, first) = store_with_doc();
        let second = store
            .create_document("other.png", DocumentMime::Png, tiny_png())
            .unwrap();
        store.create_field(&first, FieldPatch::default()).unwrap();
        store.create_field(&second.id, FieldPatch::default()).unwrap();

        store.delete_document(&first).unwrap();
        assert_eq!(store.list_fields(&second.id).len(), 1);
    }

    #[test]
    fn test_delete_unknown_field_errors() {
        let (mut store, _) = store_with_doc();
        assert!(matches!(
            store.delete_field("missing"),
            Err(FieldError::FieldNotFound(_))
        ));
    }
}
