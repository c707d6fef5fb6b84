//! AcroForm text-field embedding
//!
//! Builds the delivered PDF: a single-page document (the uploaded PDF,
//! or a page synthesized from an uploaded image with the bitmap drawn
//! full-page) with one interactive text field per committed record. The
//! widgets are visually invisible (transparent background, no border)
//! but remain fillable in any viewer.

use std::collections::HashMap;
use std::io::Write;

use fieldmark_core::model::{FontFamily, TextField};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::debug;

use crate::coords::page_to_pdf;
use crate::error::ExportError;
use crate::fonts::{FontResolver, ResolvedFont, FALLBACK_BASE_FONT};

/// AcroForm field flag: the field must be filled before submission.
const FF_REQUIRED: i64 = 1 << 1;

/// The document the form fields are placed onto.
#[derive(Debug, Clone, Copy)]
pub enum ExportSource<'a> {
    /// An uploaded PDF; fields go onto its first page.
    Pdf(&'a [u8]),
    /// An uploaded image; a single page sized to its pixel dimensions
    /// (used directly as point dimensions) is synthesized around it.
    Image {
        bytes: &'a [u8],
        width: f64,
        height: f64,
    },
}

/// Embed `fields` as fillable text fields and serialize the result.
///
/// Fields are placed in list order. A font that cannot be embedded falls
/// back to the built-in default for that field only; a failure to read
/// the source document fails the whole export with no partial output.
pub fn export_fillable(
    source: ExportSource,
    fields: &[TextField],
    fonts: &FontResolver,
) -> Result<Vec<u8>, ExportError> {
    let (mut doc, page_id, page_height) = match source {
        ExportSource::Pdf(bytes) => {
            let doc =
                Document::load_mem(bytes).map_err(|e| ExportError::Unreadable(e.to_string()))?;
            let page_id = doc
                .get_pages()
                .get(&1)
                .copied()
                .ok_or(ExportError::NoPages)?;
            let media_box = crate::media_box_of(&doc, page_id)?;
            (doc, page_id, media_box[3] - media_box[1])
        }
        ExportSource::Image {
            bytes,
            width,
            height,
        } => {
            let (doc, page_id) = synthesize_image_page(bytes, width, height)?;
            (doc, page_id, height)
        }
    };

    let registry = register_fonts(&mut doc, fields, fonts);

    let mut field_refs = Vec::with_capacity(fields.len());
    for field in fields {
        let rect = page_to_pdf(page_height, &field.rect());
        let resource = registry
            .get(&field.font_family)
            .map(|(name, _)| name.as_str())
            .unwrap_or("Helv");

        let mut annot = dictionary! {
            "Type" => "Annot",
            "Subtype" => "Widget",
            "FT" => "Tx",
            "T" => Object::String(field.name.as_bytes().to_vec(), StringFormat::Literal),
            "Rect" => vec![
                Object::Real(rect.x as f32),
                Object::Real(rect.y as f32),
                Object::Real((rect.x + rect.width) as f32),
                Object::Real((rect.y + rect.height) as f32),
            ],
            // Print flag; the widget itself paints nothing
            "F" => 4,
            "Border" => vec![0.into(), 0.into(), 0.into()],
            // No /BC or /BG: transparent border and background
            "MK" => Dictionary::new(),
            "DA" => Object::String(
                format!("/{} 0 Tf 0 g", resource).into_bytes(),
                StringFormat::Literal,
            ),
        };
        if field.required {
            annot.set("Ff", Object::Integer(FF_REQUIRED));
        }

        let annot_id = doc.add_object(Object::Dictionary(annot));
        add_annotation_to_page(&mut doc, page_id, annot_id)?;
        field_refs.push(Object::Reference(annot_id));
        debug!(field = %field.name, x = rect.x, y = rect.y, "placed form field");
    }

    attach_acroform(&mut doc, field_refs, &registry)?;

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| ExportError::Serialize(e.to_string()))?;
    Ok(output)
}

/// Resolve and register every font the field list uses. The fallback
/// font is always registered as /Helv so the form-level default
/// appearance can reference it.
fn register_fonts(
    doc: &mut Document,
    fields: &[TextField],
    fonts: &FontResolver,
) -> HashMap<FontFamily, (String, ObjectId)> {
    let helv_id = add_builtin_font(doc, FALLBACK_BASE_FONT);
    let mut registry = HashMap::new();
    registry.insert(FontFamily::Arial, ("Helv".to_string(), helv_id));

    let mut next_index = 1u32;
    for field in fields {
        if registry.contains_key(&field.font_family) {
            continue;
        }
        let entry = match fonts.resolve(field.font_family) {
            ResolvedFont::BuiltIn(FALLBACK_BASE_FONT) => ("Helv".to_string(), helv_id),
            ResolvedFont::BuiltIn(base) => {
                let id = add_builtin_font(doc, base);
                let name = format!("FM{}", next_index);
                next_index += 1;
                (name, id)
            }
            ResolvedFont::Embedded { ps_name, data } => {
                let id = embed_truetype(doc, ps_name, &data);
                let name = format!("FM{}", next_index);
                next_index += 1;
                (name, id)
            }
        };
        registry.insert(field.font_family, entry);
    }
    registry
}

fn add_builtin_font(doc: &mut Document, base_font: &str) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => Object::Name(base_font.as_bytes().to_vec()),
        "Encoding" => "WinAnsiEncoding",
    })
}

/// Embed a TrueType font as a FontFile2 program with an approximate
/// descriptor. Viewers regenerate field appearances from the program
/// itself, so approximate metrics are sufficient here.
fn embed_truetype(doc: &mut Document, ps_name: &str, data: &[u8]) -> ObjectId {
    let font_file_id = doc.add_object(Stream::new(
        dictionary! { "Length1" => data.len() as i64 },
        data.to_vec(),
    ));
    let descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => Object::Name(ps_name.as_bytes().to_vec()),
        "Flags" => 32,
        "FontBBox" => vec![(-200).into(), (-300).into(), 1200.into(), 1000.into()],
        "ItalicAngle" => 0,
        "Ascent" => 800,
        "Descent" => (-200),
        "CapHeight" => 700,
        "StemV" => 80,
        "FontFile2" => Object::Reference(font_file_id),
    });
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "TrueType",
        "BaseFont" => Object::Name(ps_name.as_bytes().to_vec()),
        "FirstChar" => 32,
        "LastChar" => 255,
        "Widths" => vec![Object::Integer(500); 224],
        "Encoding" => "WinAnsiEncoding",
        "FontDescriptor" => Object::Reference(descriptor_id),
    })
}

fn add_annotation_to_page(
    doc: &mut Document,
    page_id: ObjectId,
    annot_id: ObjectId,
) -> Result<(), ExportError> {
    let page = doc
        .get_object_mut(page_id)
        .map_err(|e| ExportError::Serialize(e.to_string()))?;

    if let Object::Dictionary(ref mut page_dict) = page {
        if let Ok(Object::Array(ref mut arr)) = page_dict.get_mut(b"Annots") {
            arr.push(Object::Reference(annot_id));
        } else {
            page_dict.set("Annots", Object::Array(vec![Object::Reference(annot_id)]));
        }
    }
    Ok(())
}

fn attach_acroform(
    doc: &mut Document,
    field_refs: Vec<Object>,
    registry: &HashMap<FontFamily, (String, ObjectId)>,
) -> Result<(), ExportError> {
    let mut dr_fonts = Dictionary::new();
    for (name, id) in registry.values() {
        dr_fonts.set(name.clone(), Object::Reference(*id));
    }
    let mut dr = Dictionary::new();
    dr.set("Font", Object::Dictionary(dr_fonts));

    let acroform = dictionary! {
        "Fields" => field_refs,
        "NeedAppearances" => true,
        "DA" => Object::String(b"/Helv 0 Tf 0 g".to_vec(), StringFormat::Literal),
        "DR" => Object::Dictionary(dr),
    };
    let acroform_id = doc.add_object(Object::Dictionary(acroform));

    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|e| ExportError::Unreadable(e.to_string()))?;
    let catalog = doc
        .get_object_mut(catalog_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| ExportError::Unreadable(e.to_string()))?;
    catalog.set("AcroForm", Object::Reference(acroform_id));
    Ok(())
}

/// Synthesize a one-page document with the image drawn across the full
/// page. The raw RGB samples are Flate-compressed into an image XObject.
fn synthesize_image_page(
    bytes: &[u8],
    width: f64,
    height: f64,
) -> Result<(Document, ObjectId), ExportError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| ExportError::Image(e.to_string()))?;
    let rgb = decoded.to_rgb8();
    let (px_width, px_height) = rgb.dimensions();

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(rgb.as_raw())
        .map_err(|e| ExportError::Image(e.to_string()))?;
    let compressed = encoder
        .finish()
        .map_err(|e| ExportError::Image(e.to_string()))?;

    let mut doc = Document::with_version("1.7");
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => px_width as i64,
            "Height" => px_height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        },
        compressed,
    ));

    let content = format!("q\n{} 0 0 {} 0 0 cm\n/Im0 Do\nQ", width, height);
    let contents_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let mut xobjects = Dictionary::new();
    xobjects.set("Im0", Object::Reference(image_id));
    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "MediaBox" => vec![
            0.into(),
            0.into(),
            Object::Real(width as f32),
            Object::Real(height as f32),
        ],
        "Contents" => Object::Reference(contents_id),
        "Resources" => Object::Dictionary(resources),
    });
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => 1,
    });
    if let Ok(page) = doc.get_object_mut(page_id) {
        if let Ok(dict) = page.as_dict_mut() {
            dict.set("Parent", Object::Reference(pages_id));
        }
    }
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    Ok((doc, page_id))
}
