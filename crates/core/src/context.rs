//! Assembly of the study context handed to the assistant.
//!
//! Pasted notes come first, followed by each document's extracted text in
//! submission order, separated by a horizontal-rule marker.

use crate::error::{Error, Result};

/// Separator placed between the texts of consecutive documents.
pub const DOCUMENT_SEPARATOR: &str = "\n\n---\n\n";

/// Combine pasted text and per-file extracted texts into one study context.
///
/// Fails with [`Error::NoMaterials`] when there is neither text nor a file.
/// The result is trimmed of surrounding whitespace.
pub fn combine_materials(pasted: &str, documents: &[String]) -> Result<String> {
    if pasted.is_empty() && documents.is_empty() {
        return Err(Error::NoMaterials);
    }

    let mut combined = String::from(pasted);
    combined.push_str("\n\n");
    combined.push_str(&documents.join(DOCUMENT_SEPARATOR));

    let trimmed = combined.trim();
    log::debug!(
        "Combined {} document(s) with {} pasted chars into {} chars of context",
        documents.len(),
        pasted.len(),
        trimmed.len()
    );
    Ok(trimmed.to_string())
}
