//! PDF text extraction backed by lopdf.

use kitty_core::{DocumentFormat, Error, Result};
use lopdf::content::Content;
use lopdf::{Document, Encoding, Object, ObjectId};
use std::collections::BTreeMap;

const FORMAT: DocumentFormat = DocumentFormat::Pdf;

/// Extractor for PDF documents.
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract text page by page.
    ///
    /// Every text-showing operation on a page is one run; runs are joined
    /// with single spaces and pages are separated by a blank line. Pages
    /// without text (scans, images) are skipped, so an image-only PDF yields
    /// an empty string.
    pub fn extract(&self, bytes: &[u8]) -> Result<String> {
        let doc = Document::load_mem(bytes)
            .map_err(|e| Error::parse(FORMAT, format!("Failed to open PDF: {}", e)))?;

        let pages = doc.get_pages();
        log::debug!("PDF has {} page(s)", pages.len());

        let mut page_texts = Vec::with_capacity(pages.len());
        for (page_number, page_id) in &pages {
            let runs = page_runs(&doc, *page_id).map_err(|e| {
                Error::parse(FORMAT, format!("Failed to read page {}: {}", page_number, e))
            })?;

            let text = join_runs(&runs);
            if text.is_empty() {
                log::debug!("PDF page {} has no extractable text", page_number);
            } else {
                page_texts.push(text);
            }
        }

        Ok(page_texts.join("\n\n"))
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode the text runs of one page in content-stream order.
fn page_runs(doc: &Document, page_id: ObjectId) -> lopdf::Result<Vec<String>> {
    let encodings: BTreeMap<Vec<u8>, Encoding> = doc
        .get_page_fonts(page_id)?
        .into_iter()
        .map(|(name, font)| font.get_font_encoding(doc).map(|encoding| (name, encoding)))
        .collect::<lopdf::Result<_>>()?;
    let content = Content::decode(&doc.get_page_content(page_id)?)?;

    let mut runs = Vec::new();
    let mut encoding = None;
    for operation in &content.operations {
        let operands = match operation.operator.as_str() {
            "Tf" => {
                encoding = operation
                    .operands
                    .first()
                    .and_then(|name| name.as_name().ok())
                    .and_then(|name| encodings.get(name));
                continue;
            }
            "Tj" | "TJ" | "'" => &operation.operands[..],
            // aw ac string
            "\"" => operation.operands.get(2..).unwrap_or_default(),
            _ => continue,
        };

        let Some(encoding) = encoding else {
            log::debug!("Skipping text shown before a font was selected");
            continue;
        };

        let mut run = String::new();
        collect_run(&mut run, encoding, operands)?;
        if !run.trim().is_empty() {
            runs.push(run);
        }
    }

    Ok(runs)
}

/// Append the decoded strings of a text-showing operation to `run`.
///
/// Large negative kerning inside a `TJ` array is how generators encode a
/// word gap, so it becomes a space.
fn collect_run(run: &mut String, encoding: &Encoding, operands: &[Object]) -> lopdf::Result<()> {
    for operand in operands {
        match operand {
            Object::String(bytes, _) => run.push_str(&Document::decode_text(encoding, bytes)?),
            Object::Array(items) => collect_run(run, encoding, items)?,
            Object::Integer(offset) if *offset < -100 => run.push(' '),
            Object::Real(offset) if *offset < -100.0 => run.push(' '),
            _ => {}
        }
    }
    Ok(())
}

/// Join runs with single spaces, collapsing whitespace inside them.
fn join_runs(runs: &[String]) -> String {
    runs.iter()
        .flat_map(|run| run.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}
