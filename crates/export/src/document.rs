//! In-memory page model and its serialization to PDF with lopdf.

use crate::capture::Bitmap;
use crate::geometry::{PageGeometry, PT_PER_MM};
use kitty_core::{Error, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::path::Path;

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

/// A line of text positioned on a page.
///
/// `y_mm` is the baseline, measured from the top edge of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub x_mm: f64,
    pub y_mm: f64,
    pub text: String,
    pub font_size_pt: f64,
    pub bold: bool,
}

/// A bitmap drawn on a page and clipped to the page's margin box.
///
/// `y_mm` is the top edge of the image, measured from the top of the page;
/// it may be negative when the image continues from a previous page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedImage {
    pub image: usize,
    pub x_mm: f64,
    pub y_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageItem {
    Text(PlacedLine),
    Image(PlacedImage),
}

/// One output page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<PageItem>,
}

impl Page {
    /// Text lines on this page, in placement order.
    pub fn lines(&self) -> impl Iterator<Item = &PlacedLine> {
        self.items.iter().filter_map(|item| match item {
            PageItem::Text(line) => Some(line),
            PageItem::Image(_) => None,
        })
    }

    /// Image placements on this page.
    pub fn images(&self) -> impl Iterator<Item = &PlacedImage> {
        self.items.iter().filter_map(|item| match item {
            PageItem::Image(image) => Some(image),
            PageItem::Text(_) => None,
        })
    }
}

/// A paginated document, built page by page and serialized on completion.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    geometry: PageGeometry,
    pages: Vec<Page>,
    images: Vec<Bitmap>,
}

impl PdfDocument {
    /// Start a document with one empty page.
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![Page::default()],
            images: Vec::new(),
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Append a new empty page; later placements land on it.
    pub fn add_page(&mut self) {
        self.pages.push(Page::default());
    }

    /// Place a text line on the current (last) page.
    pub fn place_line(&mut self, line: PlacedLine) {
        self.current_page().items.push(PageItem::Text(line));
    }

    /// Register a bitmap and return the handle used by [`PlacedImage::image`].
    pub fn add_image(&mut self, bitmap: Bitmap) -> usize {
        self.images.push(bitmap);
        self.images.len() - 1
    }

    /// Place a registered image on the current (last) page.
    pub fn place_image(&mut self, image: PlacedImage) {
        self.current_page().items.push(PageItem::Image(image));
    }

    /// All text on every page, one string per line, in reading order.
    pub fn text_lines(&self) -> Vec<&str> {
        self.pages
            .iter()
            .flat_map(|p| p.lines().map(|l| l.text.as_str()))
            .collect()
    }

    fn current_page(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.pages.push(Page::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Serialize the document as PDF bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(font("Courier"));
        let bold_id = doc.add_object(font("Courier-Bold"));

        let mut xobjects = Dictionary::new();
        for (index, bitmap) in self.images.iter().enumerate() {
            let image_id = doc.add_object(image_stream(bitmap));
            xobjects.set(image_name(index), image_id);
        }

        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                REGULAR_FONT => regular_id,
                BOLD_FONT => bold_id,
            },
            "XObject" => xobjects,
        });

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let content = Content {
                operations: self.page_operations(page),
            };
            let encoded = content
                .encode()
                .map_err(|e| Error::RenderError(format!("Failed to encode page content: {}", e)))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id: ObjectId = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    real(self.geometry.width_mm * PT_PER_MM),
                    real(self.geometry.height_mm * PT_PER_MM),
                ],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| Error::RenderError(format!("Failed to write PDF: {}", e)))?;

        log::debug!(
            "Rendered {} page(s), {} image(s), {} bytes",
            self.pages.len(),
            self.images.len(),
            bytes.len()
        );
        Ok(bytes)
    }

    /// Serialize and write the document to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn page_operations(&self, page: &Page) -> Vec<Operation> {
        let g = &self.geometry;
        let mut ops = Vec::new();

        for item in &page.items {
            match item {
                PageItem::Text(line) => {
                    let font = if line.bold { BOLD_FONT } else { REGULAR_FONT };
                    ops.push(Operation::new("BT", vec![]));
                    ops.push(Operation::new("Tf", vec![font.into(), real(line.font_size_pt)]));
                    ops.push(Operation::new(
                        "Td",
                        vec![
                            real(line.x_mm * PT_PER_MM),
                            real((g.height_mm - line.y_mm) * PT_PER_MM),
                        ],
                    ));
                    ops.push(Operation::new(
                        "Tj",
                        vec![Object::String(encode_win_ansi(&line.text), StringFormat::Literal)],
                    ));
                    ops.push(Operation::new("ET", vec![]));
                }
                PageItem::Image(image) => {
                    let bottom_mm = g.height_mm - image.y_mm - image.height_mm;
                    ops.push(Operation::new("q", vec![]));
                    // Clip to the margin box so each page shows only its slice.
                    ops.push(Operation::new(
                        "re",
                        vec![
                            real(g.margin_mm * PT_PER_MM),
                            real(g.margin_mm * PT_PER_MM),
                            real(g.usable_width_mm() * PT_PER_MM),
                            real(g.usable_height_mm() * PT_PER_MM),
                        ],
                    ));
                    ops.push(Operation::new("W", vec![]));
                    ops.push(Operation::new("n", vec![]));
                    ops.push(Operation::new(
                        "cm",
                        vec![
                            real(image.width_mm * PT_PER_MM),
                            0.into(),
                            0.into(),
                            real(image.height_mm * PT_PER_MM),
                            real(image.x_mm * PT_PER_MM),
                            real(bottom_mm * PT_PER_MM),
                        ],
                    ));
                    ops.push(Operation::new("Do", vec![image_name(image.image).into()]));
                    ops.push(Operation::new("Q", vec![]));
                }
            }
        }

        ops
    }
}

fn font(base_font: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn image_stream(bitmap: &Bitmap) -> Stream {
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => bitmap.width() as i64,
            "Height" => bitmap.height() as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        bitmap.rgb().to_vec(),
    )
}

fn image_name(index: usize) -> String {
    format!("Im{}", index)
}

fn real(value: f64) -> Object {
    Object::Real(value as _)
}

/// Encode text for a standard Type1 font with WinAnsiEncoding.
///
/// Typographic punctuation maps to its closest WinAnsi glyph; anything else
/// outside the encoding becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\t' => out.push(b' '),
            ' '..='~' => out.push(c as u8),
            '\u{a0}'..='\u{ff}' => out.push(c as u32 as u8),
            '\u{2018}' | '\u{2019}' | '\u{201a}' | '\u{2032}' => out.push(b'\''),
            '\u{201c}' | '\u{201d}' | '\u{201e}' | '\u{2033}' => out.push(b'"'),
            '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2212}' => out.push(b'-'),
            '\u{2014}' | '\u{2015}' => out.extend_from_slice(b"--"),
            '\u{2026}' => out.extend_from_slice(b"..."),
            '\u{2022}' => out.push(0x95),
            '\u{20ac}' => out.push(0x80),
            '\u{2122}' => out.push(0x99),
            c if c.is_control() => {}
            _ => out.push(b'?'),
        }
    }
    out
}
