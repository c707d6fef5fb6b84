//! First-page preview rasterization
//!
//! Image documents are decoded and re-encoded as PNG. PDF documents are
//! rasterized through the PDFium dynamic library when one can be found;
//! when it cannot, the preview degrades (the client keeps its
//! placeholder) and nothing else is affected.

use std::io::Cursor;
use std::path::PathBuf;

use fieldmark_core::model::DocumentMime;
use pdfium_render::prelude::*;
use tracing::debug;

/// Rasterize the first page to PNG bytes at roughly `target_width`
/// pixels. Image documents ignore `target_width` and keep their native
/// size.
pub fn render_preview(
    mime: DocumentMime,
    bytes: &[u8],
    target_width: f64,
) -> Result<Vec<u8>, String> {
    match mime {
        DocumentMime::Png | DocumentMime::Jpeg => {
            let decoded =
                image::load_from_memory(bytes).map_err(|e| format!("image decode: {}", e))?;
            encode_png(&decoded)
        }
        DocumentMime::Pdf => {
            let pdfium = load_pdfium()?;
            let document = pdfium
                .load_pdf_from_byte_slice(bytes, None)
                .map_err(|e| format!("pdf load: {:?}", e))?;
            let page = document
                .pages()
                .get(0)
                .map_err(|e| format!("pdf page: {:?}", e))?;
            let bitmap = page
                .render_with_config(
                    &PdfRenderConfig::new().set_target_width(target_width.max(1.0) as i32),
                )
                .map_err(|e| format!("pdf render: {:?}", e))?;
            encode_png(&bitmap.as_image())
        }
    }
}

fn encode_png(image: &image::DynamicImage) -> Result<Vec<u8>, String> {
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| format!("png encode: {}", e))?;
    Ok(out.into_inner())
}

/// Load the PDFium library from known search paths or the system.
fn load_pdfium() -> Result<Pdfium, String> {
    for path in search_paths() {
        if path.exists() {
            if let Ok(bindings) = Pdfium::bind_to_library(path.to_string_lossy().as_ref()) {
                debug!(path = %path.display(), "bound pdfium");
                return Ok(Pdfium::new(bindings));
            }
        }
    }
    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|e| format!("pdfium unavailable: {:?}", e))
}

fn search_paths() -> Vec<PathBuf> {
    let lib_name = format!(
        "{}pdfium{}",
        std::env::consts::DLL_PREFIX,
        std::env::consts::DLL_SUFFIX
    );
    let mut paths = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join("lib").join(&lib_name));
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            paths.push(parent.join("lib").join(&lib_name));
        }
    }
    paths
}
