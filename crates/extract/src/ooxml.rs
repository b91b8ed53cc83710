//! Helpers shared by the Office Open XML backends (DOCX and PPTX).

use kitty_core::{DocumentFormat, Error, Result};
use std::io::{Cursor, Read, Seek};
use zip::ZipArchive;

/// Open an in-memory OOXML package.
pub(crate) fn open_archive(bytes: &[u8], format: DocumentFormat) -> Result<ZipArchive<Cursor<&[u8]>>> {
    ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| Error::parse(format, format!("Failed to open ZIP: {}", e)))
}

/// Read a part from the package as UTF-8 text.
pub(crate) fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
    format: DocumentFormat,
) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::parse(format, format!("File not found in archive '{}': {}", path, e)))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::parse(format, format!("Failed to read '{}': {}", path, e)))?;

    Ok(content)
}

/// Extract the local name from a potentially namespaced XML element name.
pub(crate) fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"w:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }

    #[test]
    fn test_open_archive_rejects_garbage() {
        let err = open_archive(b"definitely not a zip", DocumentFormat::Docx).unwrap_err();
        assert!(matches!(
            err,
            Error::ParseFailure { format: DocumentFormat::Docx, .. }
        ));
    }
}
