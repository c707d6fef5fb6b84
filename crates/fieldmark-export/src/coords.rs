//! Coordinate transformation between document space and PDF space
//!
//! Document space has its origin at the top-left with y growing downward;
//! PDF space has its origin at the bottom-left with y growing upward and
//! units in points (1 point = 1/72 inch). Image-backed documents use
//! their pixel dimensions directly as point dimensions, so x and the
//! extents carry over unchanged and only y flips.

use fieldmark_core::geometry::Rect;

/// A rectangle in PDF space (bottom-left origin, y up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Convert a top-left/y-down rectangle to bottom-left/y-up placement:
/// `pdf_y = page_height - y - height`. No horizontal flip is needed.
pub fn page_to_pdf(page_height: f64, rect: &Rect) -> PdfRect {
    PdfRect {
        x: rect.x,
        y: page_height - rect.y - rect.height,
        width: rect.width,
        height: rect.height,
    }
}

/// Inverse of [`page_to_pdf`].
pub fn pdf_to_page(page_height: f64, rect: &PdfRect) -> Rect {
    Rect {
        x: rect.x,
        y: page_height - rect.y - rect.height,
        width: rect.width,
        height: rect.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_field_on_letter_page() {
        // Document 612x792, default field (100,100,150,35) lands at
        // PDF (100, 792-100-35=657, 150, 35)
        let rect = Rect::new(100.0, 100.0, 150.0, 35.0);
        let pdf = page_to_pdf(792.0, &rect);
        assert_eq!(pdf.x, 100.0);
        assert_eq!(pdf.y, 657.0);
        assert_eq!(pdf.width, 150.0);
        assert_eq!(pdf.height, 35.0);
    }

    #[test]
    fn test_round_trip_is_exact() {
        let rect = Rect::new(72.0, 144.0, 200.0, 40.0);
        let back = pdf_to_page(792.0, &page_to_pdf(792.0, &rect));
        assert_eq!(back, rect);
    }

    #[test]
    fn test_top_edge_maps_to_page_top() {
        // A field flush with the document top ends at the page height
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        let pdf = page_to_pdf(792.0, &rect);
        assert_eq!(pdf.y + pdf.height, 792.0);
    }

    #[test]
    fn test_x_axis_is_unchanged() {
        let rect = Rect::new(321.5, 10.0, 60.0, 20.0);
        let pdf = page_to_pdf(500.0, &rect);
        assert_eq!(pdf.x, rect.x);
        assert_eq!(pdf.width, rect.width);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn dimension() -> impl Strategy<Value = f64> {
        1.0f64..3000.0
    }

    proptest! {
        /// Property: page -> PDF -> page reproduces the rectangle
        #[test]
        fn roundtrip_page_pdf_page(
            page_height in dimension(),
            x in 0.0f64..2000.0,
            y in 0.0f64..2000.0,
            w in 50.0f64..500.0,
            h in 20.0f64..500.0,
        ) {
            let rect = Rect::new(x, y, w, h);
            let back = pdf_to_page(page_height, &page_to_pdf(page_height, &rect));
            prop_assert!((back.x - rect.x).abs() < 1e-9);
            prop_assert!((back.y - rect.y).abs() < 1e-9);
            prop_assert_eq!(back.width, rect.width);
            prop_assert_eq!(back.height, rect.height);
        }

        /// Property: the transform preserves extents and only flips y
        #[test]
        fn only_y_changes(
            page_height in dimension(),
            x in 0.0f64..2000.0,
            y in 0.0f64..2000.0,
        ) {
            let rect = Rect::new(x, y, 150.0, 35.0);
            let pdf = page_to_pdf(page_height, &rect);
            prop_assert_eq!(pdf.x, rect.x);
            prop_assert_eq!(pdf.width, rect.width);
            prop_assert_eq!(pdf.height, rect.height);
            prop_assert!((pdf.y - (page_height - y - 35.0)).abs() < 1e-9);
        }
    }
}
