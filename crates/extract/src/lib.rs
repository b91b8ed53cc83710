//! Plain-text extraction from uploaded study documents.
//!
//! Each supported format has its own backend; [`extract`] picks one from the
//! file extension and [`extract_all`] runs a whole submission concurrently.

pub mod batch;
pub mod docx;
mod ooxml;
pub mod pdf;
pub mod pptx;
pub mod text;

pub use batch::{extract_all, prepare_materials};
pub use docx::DocxExtractor;
pub use pdf::PdfExtractor;
pub use pptx::PptxExtractor;

use kitty_core::{DocumentFormat, Result, UploadedFile};

/// Extract the plain text of a single uploaded file.
///
/// Fails with `UnsupportedFormat` for unknown extensions and `ParseFailure`
/// for malformed content. An empty file yields an empty string for every
/// supported format.
pub fn extract(file: &UploadedFile) -> Result<String> {
    let format = DocumentFormat::for_file(file)?;
    log::debug!("Extracting '{}' as {}", file.name, format);

    if file.bytes.is_empty() {
        return Ok(String::new());
    }

    match format {
        DocumentFormat::PlainText => Ok(text::decode_text(&file.bytes)),
        DocumentFormat::Pdf => PdfExtractor::new().extract(&file.bytes),
        DocumentFormat::Docx => DocxExtractor::new().extract(&file.bytes),
        DocumentFormat::Pptx => PptxExtractor::new().extract(&file.bytes),
        DocumentFormat::LegacyDoc => Ok(text::decode_legacy_doc(&file.bytes)),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;
    use zip::ZipWriter;

    /// Build an in-memory ZIP archive from `(path, content)` pairs.
    pub fn zip_archive(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (path, content) in entries {
            writer.start_file(*path, FileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    /// Build a PDF with one page per entry, each line drawn as its own text object.
    pub fn pdf_with_pages(pages: &[&[&str]]) -> Vec<u8> {
        let pages = pages
            .iter()
            .map(|lines| {
                let mut operations = Vec::new();
                for (i, line) in lines.iter().enumerate() {
                    operations.push(Operation::new("BT", vec![]));
                    operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
                    operations.push(Operation::new("Td", vec![72.into(), (700 - 20 * i as i64).into()]));
                    operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
                    operations.push(Operation::new("ET", vec![]));
                }
                operations
            })
            .collect();
        pdf_from_pages(pages)
    }

    /// Build a one-page PDF from raw content operations, with Courier as `F1`.
    pub fn pdf_from_operations(operations: Vec<Operation>) -> Vec<u8> {
        pdf_from_pages(vec![operations])
    }

    fn pdf_from_pages(pages: Vec<Vec<Operation>>) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for operations in pages {
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
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
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }
}
