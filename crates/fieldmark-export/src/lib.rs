//! Fillable-PDF export for Fieldmark
//!
//! Turns a document plus its committed text fields into a new PDF with
//! the fields embedded as interactive AcroForm text fields:
//!
//! - [`coords`]: remapping from document space (top-left origin, y down)
//!   to PDF space (bottom-left origin, y up)
//! - [`fonts`]: font resolution and TrueType embedding with a built-in
//!   fallback
//! - [`acroform`]: form-field placement and serialization via `lopdf`

pub mod acroform;
pub mod coords;
pub mod error;
pub mod fonts;

pub use acroform::{export_fillable, ExportSource};
pub use coords::{page_to_pdf, pdf_to_page, PdfRect};
pub use error::ExportError;
pub use fonts::{FontResolver, ResolvedFont};

use lopdf::{Document, Object};

/// First-page dimensions of a PDF in points, read from the MediaBox.
pub fn pdf_page_size(bytes: &[u8]) -> Result<(f64, f64), ExportError> {
    let doc = Document::load_mem(bytes).map_err(|e| ExportError::Unreadable(e.to_string()))?;
    let page_id = doc
        .get_pages()
        .get(&1)
        .copied()
        .ok_or(ExportError::NoPages)?;
    let media_box = media_box_of(&doc, page_id)?;
    Ok((media_box[2] - media_box[0], media_box[3] - media_box[1]))
}

/// MediaBox of a page, following the Parent chain for inherited values.
pub(crate) fn media_box_of(doc: &Document, page_id: lopdf::ObjectId) -> Result<[f64; 4], ExportError> {
    let mut current = page_id;
    // Parent chains are shallow in practice; bound the walk anyway
    for _ in 0..32 {
        let dict = doc
            .get_object(current)
            .and_then(Object::as_dict)
            .map_err(|e| ExportError::Unreadable(e.to_string()))?;
        if let Ok(mb) = dict.get(b"MediaBox").and_then(Object::as_array) {
            if mb.len() == 4 {
                let mut out = [0.0; 4];
                for (i, value) in mb.iter().enumerate() {
                    out[i] = as_f64(value)?;
                }
                return Ok(out);
            }
        }
        match dict.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent) => current = parent,
            Err(_) => break,
        }
    }
    Err(ExportError::Unreadable("page has no MediaBox".to_string()))
}

pub(crate) fn as_f64(object: &Object) -> Result<f64, ExportError> {
    match object {
        Object::Integer(i) => Ok(*i as f64),
        Object::Real(r) => Ok(*r as f64),
        other => Err(ExportError::Unreadable(format!(
            "expected number, got {:?}",
            other
        ))),
    }
}
