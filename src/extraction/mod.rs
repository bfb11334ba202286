//! Document text extraction
//!
//! Produces the raw text handed to the transaction detector. Plain text is
//! read as-is; PDF text goes through `pdf-extract`. A PDF that cannot be
//! parsed yields empty text, which the detector turns into a single
//! placeholder candidate for the user to fill in.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{SpendError, SpendResult};

/// Supported input document kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
}

impl DocumentKind {
    /// Determine the kind from a file extension
    pub fn from_path(path: &Path) -> SpendResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "txt" | "text" | "md" | "csv" => Ok(Self::PlainText),
            "pdf" => Ok(Self::Pdf),
            "" => Err(SpendError::Extraction(format!(
                "Cannot determine document type of {} (no extension)",
                path.display()
            ))),
            other => Err(SpendError::Extraction(format!(
                "Unsupported document type '.{}'; expected .txt, .md, .csv or .pdf",
                other
            ))),
        }
    }
}

/// Extract the text content of a document
pub fn extract_text(path: &Path) -> SpendResult<String> {
    let kind = DocumentKind::from_path(path)?;

    if !path.exists() {
        return Err(SpendError::Io(format!("File not found: {}", path.display())));
    }

    let text = match kind {
        DocumentKind::PlainText => fs::read_to_string(path)
            .map_err(|e| SpendError::Io(format!("Failed to read {}: {}", path.display(), e)))?,
        DocumentKind::Pdf => match pdf_extract::extract_text(path) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "PDF text extraction failed");
                String::new()
            }
        },
    };

    debug!(path = %path.display(), ?kind, chars = text.chars().count(), "extracted text");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(
            DocumentKind::from_path(Path::new("receipt.TXT")).unwrap(),
            DocumentKind::PlainText
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("statement.pdf")).unwrap(),
            DocumentKind::Pdf
        );
        assert!(DocumentKind::from_path(Path::new("scan.png")).is_err());
        assert!(DocumentKind::from_path(Path::new("README")).is_err());
    }

    #[test]
    fn test_extract_plain_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("receipt.txt");
        fs::write(&path, "Paid RM 45.00 for lunch").unwrap();

        assert_eq!(extract_text(&path).unwrap(), "Paid RM 45.00 for lunch");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = extract_text(&temp_dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, SpendError::Io(_)));
    }

    #[test]
    fn test_unparseable_pdf_yields_empty_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.pdf");
        fs::write(&path, "this is not a pdf").unwrap();

        assert_eq!(extract_text(&path).unwrap(), "");
    }
}
