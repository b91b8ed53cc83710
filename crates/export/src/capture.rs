//! Visual-capture export: rasterize the conversation panel and slice the
//! bitmap across A4 pages.
//!
//! This is the alternate strategy to [`crate::TextExporter`]. It keeps the
//! on-screen look but produces no selectable text.

use crate::document::{PdfDocument, PlacedImage};
use crate::geometry::PageGeometry;
use kitty_core::{Error, Result};

/// An RGB bitmap, 8 bits per channel, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
}

impl Bitmap {
    /// Wrap raw RGB pixels; the buffer must hold exactly `width * height * 3` bytes.
    pub fn new(width: u32, height: u32, rgb: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if width == 0 || height == 0 {
            return Err(Error::CaptureFailed(format!("empty {}x{} capture", width, height)));
        }
        if rgb.len() != expected {
            return Err(Error::CaptureFailed(format!(
                "bitmap is {} bytes, expected {} for {}x{}",
                rgb.len(),
                expected,
                width,
                height
            )));
        }
        Ok(Self { width, height, rgb })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgb(&self) -> &[u8] {
        &self.rgb
    }
}

/// Vertical overflow behaviour of a scrollable panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    Auto,
    Hidden,
    Scroll,
    Visible,
}

/// The inline layout of a panel that capture temporarily overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutState {
    /// Explicit height in pixels; `None` means automatic.
    pub height: Option<f64>,
    /// Maximum height in pixels; `None` means unconstrained.
    pub max_height: Option<f64>,
    pub overflow_y: Overflow,
    pub scroll_top: f64,
}

/// Something on screen that can be laid out and rasterized.
pub trait CaptureSurface {
    /// Current inline layout.
    fn layout(&self) -> LayoutState;

    /// Apply an inline layout.
    fn set_layout(&mut self, layout: &LayoutState);

    /// Full height of the content, including what is scrolled out of view.
    fn scroll_height(&self) -> f64;

    /// Rasterize the surface at `scale` device pixels per CSS pixel.
    fn capture(&mut self, scale: f64) -> Result<Bitmap>;
}

/// Restores a surface's original layout when dropped.
struct LayoutGuard<'a, S: CaptureSurface> {
    surface: &'a mut S,
    original: LayoutState,
}

impl<'a, S: CaptureSurface> LayoutGuard<'a, S> {
    fn new(surface: &'a mut S) -> Self {
        let original = surface.layout();
        Self { surface, original }
    }
}

impl<S: CaptureSurface> Drop for LayoutGuard<'_, S> {
    fn drop(&mut self) {
        self.surface.set_layout(&self.original);
        log::debug!("Restored capture surface layout");
    }
}

/// Expand the surface to its full content height, capture it, and restore it.
///
/// The original layout is restored on every path, including capture errors.
pub fn capture_full_height<S: CaptureSurface>(surface: &mut S, scale: f64) -> Result<Bitmap> {
    let mut guard = LayoutGuard::new(surface);

    let expanded = LayoutState {
        height: Some(guard.surface.scroll_height()),
        max_height: None,
        overflow_y: Overflow::Visible,
        scroll_top: 0.0,
    };
    guard.surface.set_layout(&expanded);

    let bitmap = guard.surface.capture(scale);
    drop(guard);
    bitmap
}

/// Exporter that rasterizes the conversation panel.
#[derive(Debug, Clone)]
pub struct VisualExporter {
    geometry: PageGeometry,
    scale: f64,
}

impl Default for VisualExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl VisualExporter {
    /// A4 pages with a 10 mm margin, captured at 2x.
    pub fn new() -> Self {
        Self {
            geometry: PageGeometry {
                margin_mm: 10.0,
                ..PageGeometry::a4()
            },
            scale: 2.0,
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Capture `surface` and lay the bitmap out over as many pages as needed.
    ///
    /// Fails with `ElementNotFound` when there is no surface to capture.
    pub fn export<S: CaptureSurface>(&self, surface: Option<&mut S>) -> Result<PdfDocument> {
        let surface =
            surface.ok_or_else(|| Error::ElementNotFound("conversation panel".to_string()))?;
        let bitmap = capture_full_height(surface, self.scale)?;
        Ok(self.paginate(bitmap))
    }

    /// Place one bitmap across pages, each page showing the next slice.
    pub fn paginate(&self, bitmap: Bitmap) -> PdfDocument {
        let g = &self.geometry;
        let width_mm = g.usable_width_mm();
        let height_mm = width_mm * bitmap.height() as f64 / bitmap.width() as f64;
        let page_span = g.usable_height_mm();

        let mut doc = PdfDocument::new(g.clone());
        let image = doc.add_image(bitmap);

        let mut offset = 0.0;
        let mut remaining = height_mm;
        loop {
            doc.place_image(PlacedImage {
                image,
                x_mm: g.margin_mm,
                y_mm: g.margin_mm - offset,
                width_mm,
                height_mm,
            });
            remaining -= page_span;
            if remaining <= 0.0 {
                break;
            }
            doc.add_page();
            offset += page_span;
        }

        log::debug!(
            "Sliced {:.1}mm capture across {} page(s)",
            height_mm,
            doc.page_count()
        );
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakePanel {
        layout: LayoutState,
        content_height: f64,
        fail: bool,
        captured_with: Option<LayoutState>,
    }

    impl FakePanel {
        fn new(fail: bool) -> Self {
            Self {
                layout: LayoutState {
                    height: Some(600.0),
                    max_height: Some(800.0),
                    overflow_y: Overflow::Auto,
                    scroll_top: 250.0,
                },
                content_height: 2400.0,
                fail,
                captured_with: None,
            }
        }
    }

    impl CaptureSurface for FakePanel {
        fn layout(&self) -> LayoutState {
            self.layout.clone()
        }

        fn set_layout(&mut self, layout: &LayoutState) {
            self.layout = layout.clone();
        }

        fn scroll_height(&self) -> f64 {
            self.content_height
        }

        fn capture(&mut self, scale: f64) -> Result<Bitmap> {
            self.captured_with = Some(self.layout.clone());
            if self.fail {
                return Err(Error::CaptureFailed("canvas tainted".to_string()));
            }
            let width = (40.0 * scale) as u32;
            let height = (self.content_height * scale) as u32;
            Bitmap::new(width, height, vec![255; width as usize * height as usize * 3])
        }
    }

    #[test]
    fn test_bitmap_size_checked() {
        assert!(Bitmap::new(2, 2, vec![0; 12]).is_ok());
        assert!(matches!(Bitmap::new(2, 2, vec![0; 11]), Err(Error::CaptureFailed(_))));
        assert!(matches!(Bitmap::new(0, 5, Vec::new()), Err(Error::CaptureFailed(_))));
    }

    #[test]
    fn test_layout_expanded_during_capture_and_restored() {
        let mut panel = FakePanel::new(false);
        let original = panel.layout();

        let doc = VisualExporter::new().export(Some(&mut panel)).unwrap();

        let during = panel.captured_with.clone().unwrap();
        assert_eq!(during.height, Some(2400.0));
        assert_eq!(during.max_height, None);
        assert_eq!(during.overflow_y, Overflow::Visible);
        assert_eq!(during.scroll_top, 0.0);
        assert_eq!(panel.layout(), original);
        assert!(doc.page_count() >= 1);
    }

    #[test]
    fn test_layout_restored_after_failed_capture() {
        let mut panel = FakePanel::new(true);
        let original = panel.layout();

        let err = VisualExporter::new().export(Some(&mut panel)).unwrap_err();

        assert!(matches!(err, Error::CaptureFailed(_)));
        assert!(panel.captured_with.is_some());
        assert_eq!(panel.layout(), original);
    }

    #[test]
    fn test_missing_surface() {
        let err = VisualExporter::new().export::<FakePanel>(None).unwrap_err();
        assert!(matches!(err, Error::ElementNotFound(_)));
    }

    #[test]
    fn test_short_capture_fits_one_page() {
        // 190mm wide, 95mm tall.
        let doc = VisualExporter::new().paginate(Bitmap::new(2, 1, vec![0; 6]).unwrap());
        assert_eq!(doc.page_count(), 1);
        let placed = doc.pages()[0].images().next().unwrap();
        assert_eq!(placed.y_mm, 10.0);
        assert_eq!(placed.width_mm, 190.0);
        assert_eq!(placed.height_mm, 95.0);
    }

    #[test]
    fn test_tall_capture_sliced_across_pages() {
        // 190mm wide, 570mm tall: slices of 277mm need three pages.
        let doc = VisualExporter::new().paginate(Bitmap::new(1, 3, vec![0; 9]).unwrap());
        assert_eq!(doc.page_count(), 3);

        let tops: Vec<f64> = doc
            .pages()
            .iter()
            .map(|p| p.images().next().unwrap().y_mm)
            .collect();
        assert_eq!(tops, vec![10.0, 10.0 - 277.0, 10.0 - 554.0]);
    }

    #[test]
    fn test_exact_page_multiple_adds_no_blank_page() {
        let exporter = VisualExporter::new();
        // Height exactly one usable page: 190 * h / w == 277.
        let doc = exporter.paginate(Bitmap::new(190, 277, vec![0; 190 * 277 * 3]).unwrap());
        assert_eq!(doc.page_count(), 1);
    }
}
