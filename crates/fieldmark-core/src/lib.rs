//! Core logic for Fieldmark: interactive placement of text-field
//! annotations on a document preview.
//!
//! The crate is pure logic with no I/O:
//!
//! - [`geometry`]: pointer-delta to document-space transforms, clamping,
//!   minimum-size enforcement
//! - [`interaction`]: the per-gesture drag/resize state machine
//! - [`compositor`]: scene description for the zoomable preview surface
//! - [`model`]: documents, text fields, and validation
//!
//! Coordinates throughout are document space: origin top-left, y growing
//! downward, units matching the source document's native pixel/point
//! dimensions at 1:1.

pub mod compositor;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod model;

pub use error::FieldError;
pub use geometry::{Point, Rect, ResizeDirection, MIN_FIELD_HEIGHT, MIN_FIELD_WIDTH};
pub use model::{Document, DocumentMime, FieldPatch, FontFamily, TextField};
