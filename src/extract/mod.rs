//! File input collaborator: decode PDF, plain-text, and markdown documents.
//!
//! PDF extraction is two-stage. The layout-aware `pdf-extract` pass runs first;
//! when it errors or yields no visible text (common with scanned or oddly
//! encoded files), a simpler per-page `lopdf` pass is attempted before giving
//! up. Plain-text and markdown files are read as UTF-8 directly.

use std::path::Path;
use thiserror::Error;

/// Input formats accepted by [`extract_file`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Portable Document Format.
    Pdf,
    /// Plain UTF-8 text.
    Txt,
    /// Markdown, treated as plain text.
    Md,
}

impl DocumentFormat {
    /// Determine the format from a file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::Txt),
            "md" | "markdown" => Some(Self::Md),
            _ => None,
        }
    }
}

/// Errors raised while decoding an input document.
///
/// These are terminal: the pipeline surfaces them to the caller instead of
/// substituting a fallback, since there is no text to summarize.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The file extension does not map to a supported format.
    #[error("Unsupported file format: {path}")]
    UnsupportedFormat {
        /// Path of the rejected file.
        path: String,
    },
    /// The file could not be read from disk.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path of the unreadable file.
        path: String,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
    /// Both PDF extraction stages failed to produce text.
    #[error("Failed to extract text from PDF {path}: {reason}")]
    PdfDecode {
        /// Path of the undecodable file.
        path: String,
        /// Description of the last failure observed.
        reason: String,
    },
}

/// Read a file and return its extracted plain text.
///
/// The format is inferred from the extension. PDF decode failures and
/// unreadable files are reported as [`ExtractError`]; an extractable but
/// empty document yields an empty string, which the pipeline treats as an
/// empty summary rather than an error.
pub fn extract_file(path: &Path) -> Result<String, ExtractError> {
    let format = DocumentFormat::from_path(path).ok_or_else(|| ExtractError::UnsupportedFormat {
        path: path.display().to_string(),
    })?;

    match format {
        DocumentFormat::Pdf => {
            let bytes = std::fs::read(path).map_err(|source| ExtractError::Io {
                path: path.display().to_string(),
                source,
            })?;
            extract_pdf(&bytes, path)
        }
        DocumentFormat::Txt | DocumentFormat::Md => {
            std::fs::read_to_string(path).map_err(|source| ExtractError::Io {
                path: path.display().to_string(),
                source,
            })
        }
    }
}

/// Extract text from in-memory PDF bytes, trying the layout-aware pass first.
fn extract_pdf(bytes: &[u8], path: &Path) -> Result<String, ExtractError> {
    match pdf_extract::extract_text_from_mem(bytes) {
        Ok(text) if !text.trim().is_empty() => return Ok(text),
        Ok(_) => {
            tracing::debug!(path = %path.display(), "Layout-aware PDF pass produced no text; trying page fallback");
        }
        Err(error) => {
            tracing::warn!(path = %path.display(), error = %error, "Layout-aware PDF pass failed; trying page fallback");
        }
    }

    extract_pdf_pages(bytes).map_err(|reason| ExtractError::PdfDecode {
        path: path.display().to_string(),
        reason,
    })
}

/// Secondary PDF pass: concatenate per-page text through `lopdf`.
fn extract_pdf_pages(bytes: &[u8]) -> Result<String, String> {
    let document = lopdf::Document::load_mem(bytes).map_err(|error| error.to_string())?;
    let pages: Vec<u32> = document.get_pages().keys().copied().collect();
    if pages.is_empty() {
        return Err("document has no pages".to_string());
    }
    let text = document
        .extract_text(&pages)
        .map_err(|error| error.to_string())?;
    if text.trim().is_empty() {
        return Err("no extractable text on any page".to_string());
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn format_is_inferred_from_extension() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("report.PDF")),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("notes.md")),
            Some(DocumentFormat::Md)
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("notes.markdown")),
            Some(DocumentFormat::Md)
        );
        assert_eq!(DocumentFormat::from_path(Path::new("data.csv")), None);
        assert_eq!(DocumentFormat::from_path(Path::new("no-extension")), None);
    }

    #[test]
    fn plain_text_files_round_trip() {
        let mut file = tempfile::Builder::new()
            .suffix(".txt")
            .tempfile()
            .expect("temp file");
        write!(file, "Plain text body.").expect("write");

        let text = extract_file(file.path()).expect("extract");
        assert_eq!(text, "Plain text body.");
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let error = extract_file(Path::new("spreadsheet.xlsx")).expect_err("unsupported");
        assert!(matches!(error, ExtractError::UnsupportedFormat { .. }));
    }

    #[test]
    fn missing_file_reports_io_error() {
        let error = extract_file(Path::new("/nonexistent/input.txt")).expect_err("missing");
        assert!(matches!(error, ExtractError::Io { .. }));
    }

    #[test]
    fn garbage_pdf_bytes_fail_both_stages() {
        let mut file = tempfile::Builder::new()
            .suffix(".pdf")
            .tempfile()
            .expect("temp file");
        file.write_all(b"not a pdf at all").expect("write");

        let error = extract_file(file.path()).expect_err("decode failure");
        assert!(matches!(error, ExtractError::PdfDecode { .. }));
    }
}
