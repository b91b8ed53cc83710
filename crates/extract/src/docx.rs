//! DOCX (Office Open XML word-processing) text extraction.
//!
//! Only the main document body is read. Formatting, headers, footers and
//! comments are discarded.

use crate::ooxml::{local_name, open_archive, read_part};
use kitty_core::{DocumentFormat, Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

const FORMAT: DocumentFormat = DocumentFormat::Docx;
const DOCUMENT_PART: &str = "word/document.xml";

/// Extractor for DOCX documents.
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract the raw text of the document body, one blank line between paragraphs.
    pub fn extract(&self, bytes: &[u8]) -> Result<String> {
        let mut archive = open_archive(bytes, FORMAT)?;
        let body = read_part(&mut archive, DOCUMENT_PART, FORMAT)?;
        let paragraphs = extract_paragraphs(&body).map_err(|e| Error::parse(FORMAT, e))?;
        log::debug!("DOCX body has {} non-empty paragraph(s)", paragraphs.len());
        Ok(paragraphs.join("\n\n"))
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn extract_paragraphs(xml_content: &str) -> std::result::Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml_content);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => match local_name(e.name().as_ref()) {
                b"r" => in_run = true,
                b"t" if in_run => in_text = true,
                _ => {}
            },
            // `w:tab` also appears inside paragraph properties as a tab stop,
            // so only runs count.
            Event::Empty(ref e) if in_run => match local_name(e.name().as_ref()) {
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                _ => {}
            },
            Event::Text(ref e) if in_text => {
                current.push_str(&e.unescape()?);
            }
            Event::End(ref e) => match local_name(e.name().as_ref()) {
                b"t" => in_text = false,
                b"r" => in_run = false,
                b"p" => {
                    let text = current.trim_end();
                    if !text.trim().is_empty() {
                        paragraphs.push(text.to_string());
                    }
                    current.clear();
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::zip_archive;

    fn document(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        )
    }

    #[test]
    fn test_paragraphs_joined_with_blank_line() {
        let xml = document(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t>Chapter 1</w:t></w:r></w:p>
               <w:p><w:r><w:t xml:space="preserve">The cell is the </w:t></w:r><w:r><w:t>basic unit.</w:t></w:r></w:p>"#,
        );
        let bytes = zip_archive(&[(DOCUMENT_PART, xml.as_str())]);
        let text = DocxExtractor::new().extract(&bytes).unwrap();
        assert_eq!(text, "Chapter 1\n\nThe cell is the basic unit.");
    }

    #[test]
    fn test_tabs_and_breaks_inside_runs() {
        let xml = document(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr>
               <w:r><w:t>Term</w:t><w:tab/><w:t>Definition</w:t><w:br/><w:t>Next line</w:t></w:r></w:p>"#,
        );
        let paragraphs = extract_paragraphs(&xml).unwrap();
        assert_eq!(paragraphs, vec!["Term\tDefinition\nNext line"]);
    }

    #[test]
    fn test_empty_paragraphs_dropped() {
        let xml = document(r#"<w:p/><w:p><w:r><w:t>Only</w:t></w:r></w:p><w:p></w:p>"#);
        assert_eq!(extract_paragraphs(&xml).unwrap(), vec!["Only"]);
    }

    #[test]
    fn test_missing_body_part_is_parse_failure() {
        let bytes = zip_archive(&[("word/styles.xml", "<w:styles/>")]);
        let err = DocxExtractor::new().extract(&bytes).unwrap_err();
        assert!(matches!(err, Error::ParseFailure { format: DocumentFormat::Docx, .. }));
    }
}
