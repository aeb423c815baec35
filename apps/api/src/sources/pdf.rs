use std::path::Path;

use tracing::debug;

use crate::sources::SourceError;

/// `ExtractText(documentPath)`: plain text out of a document on disk. Blocking.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, path: &Path) -> Result<String, SourceError>;
}

/// PDF extraction backed by `pdf-extract`.
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, SourceError> {
        let text = pdf_extract::extract_text(path)
            .map_err(|e| SourceError::Extraction(format!("{}: {e}", path.display())))?;
        debug!("Extracted {} chars from {}", text.len(), path.display());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_non_pdf_file_is_an_extraction_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a pdf").unwrap();
        let err = PdfTextExtractor.extract_text(file.path()).unwrap_err();
        assert!(matches!(err, SourceError::Extraction(_)));
    }
}
