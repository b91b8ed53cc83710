//! Export of chat transcripts to printable PDF documents.
//!
//! [`TextExporter`] re-flows the conversation as selectable text and is the
//! default. [`VisualExporter`] rasterizes the on-screen conversation panel
//! instead.

pub mod capture;
pub mod document;
pub mod geometry;
pub mod text_export;
pub mod wrap;

pub use capture::{Bitmap, CaptureSurface, LayoutState, Overflow, VisualExporter};
pub use document::{Page, PageItem, PdfDocument, PlacedImage, PlacedLine};
pub use geometry::PageGeometry;
pub use text_export::{TextExporter, DEFAULT_TITLE, EXPORT_FILENAME};
pub use wrap::wrap_text;
