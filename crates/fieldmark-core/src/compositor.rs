//! Scene composition for the zoomable preview surface
//!
//! The compositor turns the committed field list, the current selection,
//! the live gesture rectangle, and the background readiness state into a
//! deterministic [`Scene`] description. Re-building the scene is cheap
//! and is triggered by: zoom change, field list change, selection change,
//! or background readiness change.

use serde::Serialize;
use tracing::warn;

use crate::geometry::{Point, Rect, ResizeDirection};
use crate::interaction::PointerTarget;
use crate::model::TextField;

/// Side length of a resize handle hotspot, in screen pixels.
pub const HANDLE_SIZE: f64 = 10.0;

/// The viewed page: document dimensions at 1:1 plus the zoom scale.
#[derive(Debug, Clone)]
pub struct PageView {
    pub document_id: String,
    pub doc_width: f64,
    pub doc_height: f64,
    pub scale: f64,
}

impl PageView {
    pub fn new(document_id: impl Into<String>, doc_width: f64, doc_height: f64, scale: f64) -> Self {
        Self {
            document_id: document_id.into(),
            doc_width,
            doc_height,
            scale,
        }
    }

    /// Fixed-aspect surface size at the current zoom.
    pub fn surface_size(&self) -> (f64, f64) {
        (self.doc_width * self.scale, self.doc_height * self.scale)
    }

    /// Screen-space rectangle for a document-space rectangle. The same
    /// scale applies to the background, so an overlay stays visually
    /// anchored to its page location at every zoom level.
    pub fn overlay_rect(&self, rect: &Rect) -> Rect {
        rect.scaled(self.scale)
    }
}

/// A rasterized background ready for painting.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Readiness of the preview background.
#[derive(Debug, Clone)]
pub enum BackgroundState {
    /// Rasterization in flight; paint the loading placeholder.
    Pending,
    Ready(RasterImage),
    /// Rasterization failed; paint nothing. Non-fatal.
    Failed,
}

/// Identifies one rasterization request so a result that arrives after
/// the document changed (or after a newer request) can be discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterTicket {
    document_id: String,
    generation: u64,
}

/// Tracks the asynchronous background rasterization for one view.
#[derive(Debug)]
pub struct BackgroundLoader {
    document_id: String,
    generation: u64,
    state: BackgroundState,
}

impl BackgroundLoader {
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            generation: 0,
            state: BackgroundState::Pending,
        }
    }

    pub fn state(&self) -> &BackgroundState {
        &self.state
    }

    /// Start (or restart) loading the background for `document_id`. Any
    /// earlier in-flight request is superseded.
    pub fn begin(&mut self, document_id: &str) -> RasterTicket {
        if self.document_id != document_id {
            self.document_id = document_id.to_string();
        }
        self.generation += 1;
        self.state = BackgroundState::Pending;
        RasterTicket {
            document_id: self.document_id.clone(),
            generation: self.generation,
        }
    }

    /// Deliver a rasterization result. Returns false when the ticket is
    /// stale (document changed or a newer request was issued) and the
    /// result was discarded.
    pub fn complete(
        &mut self,
        ticket: RasterTicket,
        result: Result<RasterImage, String>,
    ) -> bool {
        if ticket.document_id != self.document_id || ticket.generation != self.generation {
            return false;
        }
        self.state = match result {
            Ok(image) => BackgroundState::Ready(image),
            Err(reason) => {
                warn!(document_id = %self.document_id, %reason, "preview rasterization failed");
                BackgroundState::Failed
            }
        };
        true
    }
}

/// What the background layer paints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundPaint {
    Bitmap,
    Placeholder,
    Empty,
}

/// One resize handle hotspot, in screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct Handle {
    pub direction: ResizeDirection,
    pub rect: Rect,
}

/// One positioned field overlay.
#[derive(Debug, Clone)]
pub struct FieldOverlay {
    pub field_id: String,
    /// Screen-space rectangle.
    pub rect: Rect,
    /// Document-space rectangle the overlay was painted from; used as
    /// the gesture-start snapshot on pointer-down.
    pub doc_rect: Rect,
    pub selected: bool,
    /// The three resize handles; empty unless selected.
    pub handles: Vec<Handle>,
}

/// A full description of the preview surface.
#[derive(Debug, Clone)]
pub struct Scene {
    pub surface_width: f64,
    pub surface_height: f64,
    pub background: BackgroundPaint,
    /// Paint order follows the committed field list (creation order).
    pub overlays: Vec<FieldOverlay>,
}

fn handles_for(rect: &Rect) -> Vec<Handle> {
    let half = HANDLE_SIZE / 2.0;
    let hotspot = |cx: f64, cy: f64| Rect::new(cx - half, cy - half, HANDLE_SIZE, HANDLE_SIZE);
    vec![
        Handle {
            direction: ResizeDirection::Se,
            rect: hotspot(rect.x + rect.width, rect.y + rect.height),
        },
        Handle {
            direction: ResizeDirection::E,
            rect: hotspot(rect.x + rect.width, rect.y + rect.height / 2.0),
        },
        Handle {
            direction: ResizeDirection::S,
            rect: hotspot(rect.x + rect.width / 2.0, rect.y + rect.height),
        },
    ]
}

/// Compose the scene. `live` is the active gesture's provisional
/// rectangle and takes precedence over the committed rect for that field
/// only.
pub fn build_scene(
    view: &PageView,
    fields: &[TextField],
    selection: Option<&str>,
    live: Option<(&str, Rect)>,
    background: &BackgroundState,
) -> Scene {
    let (surface_width, surface_height) = view.surface_size();
    let background = match background {
        BackgroundState::Ready(_) => BackgroundPaint::Bitmap,
        BackgroundState::Pending => BackgroundPaint::Placeholder,
        BackgroundState::Failed => BackgroundPaint::Empty,
    };

    let overlays = fields
        .iter()
        .map(|field| {
            let doc_rect = match live {
                Some((id, rect)) if id == field.id => rect,
                _ => field.rect(),
            };
            let rect = view.overlay_rect(&doc_rect);
            let selected = selection == Some(field.id.as_str());
            FieldOverlay {
                field_id: field.id.clone(),
                rect,
                doc_rect,
                selected,
                handles: if selected { handles_for(&rect) } else { Vec::new() },
            }
        })
        .collect();

    Scene {
        surface_width,
        surface_height,
        background,
        overlays,
    }
}

fn contains(rect: &Rect, point: Point) -> bool {
    point.x >= rect.x
        && point.x <= rect.x + rect.width
        && point.y >= rect.y
        && point.y <= rect.y + rect.height
}

/// Map a screen-space pointer position to the interaction target under
/// it. Handles win over the field body; among overlapping fields the
/// last-painted (topmost) wins.
pub fn hit_test(scene: &Scene, point: Point) -> PointerTarget {
    for overlay in scene.overlays.iter().rev() {
        for handle in &overlay.handles {
            if contains(&handle.rect, point) {
                return PointerTarget::Handle {
                    id: overlay.field_id.clone(),
                    rect: overlay.doc_rect,
                    direction: handle.direction,
                };
            }
        }
        if contains(&overlay.rect, point) {
            return PointerTarget::FieldBody {
                id: overlay.field_id.clone(),
                rect: overlay.doc_rect,
            };
        }
    }
    PointerTarget::Background
}
