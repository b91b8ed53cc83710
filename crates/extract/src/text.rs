//! Plain-text and legacy `.doc` extraction.

/// Prepended to legacy `.doc` output, which is read as raw text.
pub const LEGACY_DOC_WARNING: &str = "(Note: Parsing for .doc files is limited and may produce \
     strange results. For best accuracy, please re-save the file as .docx.)";

/// Decode bytes as UTF-8, replacing invalid sequences and dropping a leading BOM.
pub fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text.into_owned(),
    }
}

/// Best-effort reading of a legacy binary Word document.
///
/// The binary format is not parsed; its bytes are decoded as text and
/// prefixed with [`LEGACY_DOC_WARNING`].
pub fn decode_legacy_doc(bytes: &[u8]) -> String {
    log::warn!("Reading legacy .doc as raw text; results may be unreliable");
    format!("{}\n\n{}", LEGACY_DOC_WARNING, decode_text(bytes))
}
