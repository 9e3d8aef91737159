//! Text source: turn a file into line-ordered plain text.
//!
//! Plain-text files are decoded as UTF-8 (BOM stripped, CR/CRLF folded to
//! LF). Files starting with the `%PDF` magic go through pdfium's text layer
//! when the `pdf` feature is enabled; pdfium is not async-safe, so that work
//! runs in `spawn_blocking`.

use crate::error::ResumeError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

const PDF_MAGIC: &[u8; 4] = b"%PDF";
const UTF8_BOM: &str = "\u{feff}";

/// One line of input: 1-based line number and trimmed content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextLine {
    pub number: usize,
    pub content: String,
}

impl TextLine {
    pub fn new(number: usize, content: impl AsRef<str>) -> Self {
        Self {
            number,
            content: content.as_ref().trim().to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.content.is_empty()
    }
}

/// Split text into numbered lines. Every physical line is kept, blank ones
/// included, so the line sequence can be reconstructed from the output.
pub fn text_lines(text: &str) -> Vec<TextLine> {
    text.lines()
        .enumerate()
        .map(|(i, l)| TextLine::new(i + 1, l))
        .collect()
}

/// Join line contents back into a newline-separated document.
pub fn join_lines(lines: &[TextLine]) -> String {
    lines
        .iter()
        .map(|l| l.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fold `\r\n` and bare `\r` to `\n` and drop a leading BOM.
pub fn normalise_text(text: &str) -> String {
    text.strip_prefix(UTF8_BOM)
        .unwrap_or(text)
        .replace("\r\n", "\n")
        .replace('\r', "\n")
}

/// `true` when the buffer starts with the PDF magic bytes.
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Decode a non-PDF byte buffer as UTF-8 text.
pub fn decode_text(bytes: &[u8], path: &Path) -> Result<String, ResumeError> {
    let text = std::str::from_utf8(bytes).map_err(|e| ResumeError::NotUtf8 {
        path: path.to_path_buf(),
        offset: e.valid_up_to(),
    })?;
    Ok(normalise_text(text))
}

/// Read a résumé file and return its plain text.
pub async fn load_text(path: &Path, password: Option<&str>) -> Result<String, ResumeError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ResumeError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => ResumeError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => ResumeError::Internal(format!("Failed to read '{}': {}", path.display(), e)),
    })?;

    let text = if is_pdf(&bytes) {
        debug!("{}: PDF input, reading text layer", path.display());
        pdf_text(path, password).await?
    } else {
        decode_text(&bytes, path)?
    };

    if text.trim().is_empty() {
        return Err(ResumeError::EmptyDocument {
            path: path.to_path_buf(),
        });
    }
    debug!("{}: loaded {} chars", path.display(), text.chars().count());
    Ok(text)
}

#[cfg(feature = "pdf")]
async fn pdf_text(path: &Path, password: Option<&str>) -> Result<String, ResumeError> {
    let path = path.to_path_buf();
    let password = password.map(str::to_string);
    tokio::task::spawn_blocking(move || pdf::extract_text_blocking(&path, password.as_deref()))
        .await
        .map_err(|e| ResumeError::Internal(format!("PDF text task panicked: {}", e)))?
}

#[cfg(not(feature = "pdf"))]
async fn pdf_text(path: &Path, _password: Option<&str>) -> Result<String, ResumeError> {
    Err(ResumeError::UnsupportedFormat {
        path: path.to_path_buf(),
        detail: "PDF input requires the `pdf` feature; convert it to text first".into(),
    })
}

#[cfg(feature = "pdf")]
mod pdf {
    use super::normalise_text;
    use crate::error::ResumeError;
    use pdfium_render::prelude::*;
    use std::path::Path;
    use tracing::info;

    fn bind() -> Result<Pdfium, ResumeError> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| ResumeError::PdfiumBindingFailed(format!("{:?}", e)))?;
        Ok(Pdfium::new(bindings))
    }

    pub(super) fn extract_text_blocking(
        path: &Path,
        password: Option<&str>,
    ) -> Result<String, ResumeError> {
        let pdfium = bind()?;
        let document = pdfium.load_pdf_from_file(path, password).map_err(|e| {
            let detail = format!("{:?}", e);
            if detail.to_lowercase().contains("password") {
                ResumeError::PasswordRequired {
                    path: path.to_path_buf(),
                }
            } else {
                ResumeError::PdfTextFailed {
                    path: path.to_path_buf(),
                    detail,
                }
            }
        })?;

        let pages = document.pages();
        info!("PDF loaded: {} pages", pages.len());

        let mut out = String::new();
        for (idx, page) in pages.iter().enumerate() {
            let text = page.text().map_err(|e| ResumeError::PdfTextFailed {
                path: path.to_path_buf(),
                detail: format!("page {}: {:?}", idx + 1, e),
            })?;
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&text.all());
        }
        Ok(normalise_text(&out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_numbered_from_one_and_trimmed() {
        let lines = text_lines("  Jane Doe  \n\nSKILLS\n");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], TextLine::new(1, "Jane Doe"));
        assert!(lines[1].is_blank());
        assert_eq!(lines[2].number, 3);
    }

    #[test]
    fn normalises_bom_and_line_endings() {
        assert_eq!(normalise_text("\u{feff}a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn invalid_utf8_reports_offset() {
        let err = decode_text(b"abc\xff", Path::new("x.txt")).unwrap_err();
        match err {
            ResumeError::NotUtf8 { offset, .. } => assert_eq!(offset, 3),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn pdf_magic_detected() {
        assert!(is_pdf(b"%PDF-1.7\n"));
        assert!(!is_pdf(b"Jane Doe"));
    }

    #[tokio::test]
    async fn whitespace_file_is_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("blank.txt");
        std::fs::write(&p, "  \n\n ").unwrap();
        let err = load_text(&p, None).await.unwrap_err();
        assert!(matches!(err, ResumeError::EmptyDocument { .. }));
    }

    #[tokio::test]
    async fn text_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("cv.txt");
        std::fs::write(&p, "Jane Doe\r\nSKILLS\r\nRust").unwrap();
        let text = load_text(&p, None).await.unwrap();
        assert_eq!(text, "Jane Doe\nSKILLS\nRust");
    }
}
