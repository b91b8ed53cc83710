//! PPTX (Office Open XML presentation) text extraction.

use crate::ooxml::{local_name, open_archive, read_part};
use kitty_core::{DocumentFormat, Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::io::{Read, Seek};
use std::sync::LazyLock;
use zip::ZipArchive;

/// Slide parts live at `ppt/slides/slideN.xml`.
static SLIDE_PART_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ppt/slides/slide(\d+)\.xml$").unwrap());

const FORMAT: DocumentFormat = DocumentFormat::Pptx;

/// Extractor for PPTX presentations.
pub struct PptxExtractor;

impl PptxExtractor {
    /// Create a new PPTX extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract the text of every slide, in slide-number order.
    ///
    /// Runs are joined with single spaces, paragraphs and soft breaks within a
    /// slide are separated by a newline and slides by a blank line. Slides
    /// without text are left out.
    pub fn extract(&self, bytes: &[u8]) -> Result<String> {
        let mut archive = open_archive(bytes, FORMAT)?;
        let slide_paths = self.slide_order(&archive);
        log::debug!("PPTX contains {} slide part(s)", slide_paths.len());

        let mut slides = Vec::with_capacity(slide_paths.len());
        for path in &slide_paths {
            let text = self.extract_slide(&mut archive, path)?;
            if !text.is_empty() {
                slides.push(text);
            }
        }

        Ok(slides.join("\n\n"))
    }

    /// Slide part names sorted by the number embedded in the name.
    fn slide_order<R: Read + Seek>(&self, archive: &ZipArchive<R>) -> Vec<String> {
        let mut slides: Vec<(usize, String)> = archive
            .file_names()
            .filter_map(|name| {
                let number = extract_slide_number(name)?;
                Some((number, name.to_string()))
            })
            .collect();

        slides.sort_by_key(|(number, _)| *number);
        slides.into_iter().map(|(_, path)| path).collect()
    }

    fn extract_slide<R: Read + Seek>(&self, archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
        let content = read_part(archive, path, FORMAT)?;
        let paragraphs = extract_paragraphs(&content)
            .map_err(|e| Error::parse(FORMAT, format!("Error parsing '{}': {}", path, e)))?;
        Ok(paragraphs.join("\n"))
    }
}

impl Default for PptxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect the non-empty lines of a slide.
///
/// The `a:t` runs of a paragraph are joined with single spaces. A paragraph
/// end or an `a:br` soft break closes the current line.
fn extract_paragraphs(xml_content: &str) -> std::result::Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml_content);

    let mut lines = Vec::new();
    let mut runs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => match local_name(e.name().as_ref()) {
                b"t" => {
                    in_text_run = true;
                    current.clear();
                }
                b"p" => runs.clear(),
                _ => {}
            },
            Event::Empty(ref e) if local_name(e.name().as_ref()) == b"br" => {
                flush_line(&mut runs, &mut lines);
            }
            Event::Text(ref e) if in_text_run => {
                current.push_str(&e.unescape()?);
            }
            Event::CData(ref e) if in_text_run => {
                current.push_str(&String::from_utf8_lossy(e));
            }
            Event::End(ref e) => match local_name(e.name().as_ref()) {
                b"t" => {
                    in_text_run = false;
                    let run = current.trim();
                    if !run.is_empty() {
                        runs.push(run.to_string());
                    }
                }
                b"p" => flush_line(&mut runs, &mut lines),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(lines)
}

fn flush_line(runs: &mut Vec<String>, lines: &mut Vec<String>) {
    if !runs.is_empty() {
        lines.push(runs.join(" "));
        runs.clear();
    }
}

/// Extract the slide number from a part name like `ppt/slides/slide12.xml`.
fn extract_slide_number(path: &str) -> Option<usize> {
    SLIDE_PART_REGEX
        .captures(path)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
