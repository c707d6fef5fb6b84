//! Coordinate transforms between screen space and document space
//!
//! All functions are pure: they take a gesture snapshot and produce a
//! candidate rectangle. Committing the candidate is the caller's decision.

use serde::{Deserialize, Serialize};

/// Minimum interactive field width in document pixels.
pub const MIN_FIELD_WIDTH: f64 = 50.0;
/// Minimum interactive field height in document pixels.
pub const MIN_FIELD_HEIGHT: f64 = 20.0;

/// A point in either screen or document space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in document space (top-left origin, y down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Scale the rectangle into screen space for a given zoom scale.
    pub fn scaled(&self, scale: f64) -> Rect {
        Rect {
            x: self.x * scale,
            y: self.y * scale,
            width: self.width * scale,
            height: self.height * scale,
        }
    }
}

/// Which resize handle is driving a resize gesture.
///
/// Only three handles exist: the south-east corner and the east and south
/// edge midpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeDirection {
    /// Both axes.
    Se,
    /// Width only.
    E,
    /// Height only.
    S,
}

impl ResizeDirection {
    pub fn affects_width(self) -> bool {
        matches!(self, ResizeDirection::Se | ResizeDirection::E)
    }

    pub fn affects_height(self) -> bool {
        matches!(self, ResizeDirection::Se | ResizeDirection::S)
    }
}

/// Convert an on-screen pointer delta to a document-space delta.
///
/// Dividing by the zoom scale makes drag speed independent of zoom: a
/// 50px screen movement at 50% zoom moves the field 100 document pixels.
pub fn gesture_delta(p0: Point, p1: Point, scale: f64) -> Point {
    Point {
        x: (p1.x - p0.x) / scale,
        y: (p1.y - p0.y) / scale,
    }
}

/// Candidate position for a drag gesture.
///
/// Position is clamped at zero on both axes. There is deliberately no
/// upper clamp against the document bounds: a field may extend past the
/// document edge.
pub fn drag_rect(r0: &Rect, delta: Point) -> Rect {
    Rect {
        x: (r0.x + delta.x).max(0.0),
        y: (r0.y + delta.y).max(0.0),
        width: r0.width,
        height: r0.height,
    }
}

/// Candidate size for a resize gesture.
///
/// Only the axes covered by `direction` change; the minimums are hard
/// floors regardless of how large a shrink delta is applied.
pub fn resize_rect(r0: &Rect, delta: Point, direction: ResizeDirection) -> Rect {
    Rect {
        x: r0.x,
        y: r0.y,
        width: if direction.affects_width() {
            (r0.width + delta.x).max(MIN_FIELD_WIDTH)
        } else {
            r0.width
        },
        height: if direction.affects_height() {
            (r0.height + delta.y).max(MIN_FIELD_HEIGHT)
        } else {
            r0.height
        },
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn zoom_scale() -> impl Strategy<Value = f64> {
        // The zoom control exposes 25%..200% in 25% steps
        (1u32..=8).prop_map(|step| step as f64 * 0.25)
    }

    proptest! {
        /// Property: drag moves the field by exactly (dx/s, dy/s) while the
        /// result stays inside the positive quadrant
        #[test]
        fn drag_is_zoom_invariant(
            x in 0.0f64..2000.0,
            y in 0.0f64..2000.0,
            dx in -500.0f64..500.0,
            dy in -500.0f64..500.0,
            s in zoom_scale(),
        ) {
            let r0 = Rect::new(x, y, 150.0, 35.0);
            let delta = gesture_delta(Point::new(0.0, 0.0), Point::new(dx, dy), s);
            let moved = drag_rect(&r0, delta);

            let expected_x = (x + dx / s).max(0.0);
            let expected_y = (y + dy / s).max(0.0);
            prop_assert!((moved.x - expected_x).abs() < 1e-9);
            prop_assert!((moved.y - expected_y).abs() < 1e-9);
            prop_assert!(moved.x >= 0.0 && moved.y >= 0.0);
        }

        /// Property: resized dimensions never drop below the floors
        #[test]
        fn resize_respects_floors(
            w in MIN_FIELD_WIDTH..1000.0,
            h in MIN_FIELD_HEIGHT..1000.0,
            dx in -5000.0f64..5000.0,
            dy in -5000.0f64..5000.0,
        ) {
            let r0 = Rect::new(0.0, 0.0, w, h);
            for direction in [ResizeDirection::Se, ResizeDirection::E, ResizeDirection::S] {
                let resized = resize_rect(&r0, Point::new(dx, dy), direction);
                prop_assert!(resized.width >= MIN_FIELD_WIDTH);
                prop_assert!(resized.height >= MIN_FIELD_HEIGHT);
            }
        }

        /// Property: each direction only touches its own axes
        #[test]
        fn resize_axis_isolation(
            dx in -500.0f64..500.0,
            dy in -500.0f64..500.0,
        ) {
            let r0 = Rect::new(0.0, 0.0, 150.0, 35.0);

            let east = resize_rect(&r0, Point::new(dx, dy), ResizeDirection::E);
            prop_assert_eq!(east.height, r0.height);

            let south = resize_rect(&r0, Point::new(dx, dy), ResizeDirection::S);
            prop_assert_eq!(south.width, r0.width);
        }
    }
}
