//! Extraction entry points.
//!
//! The text-level functions ([`parse_text`], [`parse_lines`]) are the pure
//! core: synchronous, infallible, no I/O. The file-level functions wrap them
//! with input resolution and decoding and return `Err(ResumeError)` only when
//! no text could be obtained at all. [`parse_batch`] runs many documents
//! concurrently and waits for all of them; use [`crate::stream::parse_stream`]
//! to receive results as each document finishes.

use crate::config::ExtractionConfig;
use crate::error::{DocumentError, ResumeError};
use crate::output::{BatchItem, BatchOutput, BatchStats, ParsedDocument};
use crate::pipeline::assemble::assemble;
use crate::pipeline::text::{self, TextLine};
use crate::pipeline::input;
use futures::stream::{self, StreamExt};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Parse résumé text into a structured record.
///
/// Never fails: blank input or an internal fault yields the failure shape.
///
/// # Example
/// ```rust
/// use resume2json::{parse_text, ExtractionConfig};
///
/// let doc = parse_text("Jane Doe\njane@example.com", &ExtractionConfig::default());
/// let record = doc.record().unwrap();
/// assert_eq!(record.contact.name.as_deref(), Some("Jane Doe"));
/// assert_eq!(record.contact.email.as_deref(), Some("jane@example.com"));
/// ```
pub fn parse_text(raw: &str, config: &ExtractionConfig) -> ParsedDocument {
    let normalised = text::normalise_text(raw);
    let lines = text::text_lines(&normalised);
    assemble(&normalised, &lines, config)
}

/// Parse already-split lines. Line contents are joined with `\n` to form the
/// document text.
pub fn parse_lines(lines: &[TextLine], config: &ExtractionConfig) -> ParsedDocument {
    let joined = text::join_lines(lines);
    assemble(&joined, lines, config)
}

/// Parse a résumé file or URL.
///
/// # Errors
/// Returns `Err(ResumeError)` when the input cannot be resolved, read or
/// decoded. A document that decodes to text always yields `Ok`, possibly
/// with the failure shape inside.
pub async fn parse_file(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<ParsedDocument, ResumeError> {
    let input_str = input_str.as_ref();
    let start = Instant::now();
    info!("Parsing résumé: {}", input_str);

    let raw = load_document(input_str, config).await?;
    let doc = parse_blocking(raw, config.clone())
        .await
        .map_err(|e| ResumeError::Internal(format!("Extraction task panicked: {}", e)))?;

    log_outcome(input_str, &doc, start);
    Ok(doc)
}

/// Parse a résumé held in memory (UTF-8 text or PDF bytes).
///
/// PDF bytes are written to a managed temp file for pdfium, which is removed
/// on return.
pub async fn parse_bytes(
    bytes: &[u8],
    config: &ExtractionConfig,
) -> Result<ParsedDocument, ResumeError> {
    let raw = if text::is_pdf(bytes) {
        let mut tmp = tempfile::NamedTempFile::new()
            .map_err(|e| ResumeError::Internal(format!("tempfile: {e}")))?;
        tmp.write_all(bytes)
            .map_err(|e| ResumeError::Internal(format!("tempfile write: {e}")))?;
        text::load_text(tmp.path(), config.pdf_password.as_deref()).await?
    } else {
        text::decode_text(bytes, Path::new("<memory>"))?
    };
    if raw.trim().is_empty() {
        return Err(ResumeError::EmptyDocument {
            path: PathBuf::from("<memory>"),
        });
    }
    parse_blocking(raw, config.clone())
        .await
        .map_err(|e| ResumeError::Internal(format!("Extraction task panicked: {}", e)))
}

/// Synchronous wrapper around [`parse_file`].
///
/// Creates a temporary tokio runtime internally.
pub fn parse_sync(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<ParsedDocument, ResumeError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ResumeError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(parse_file(input_str, config))
}

/// Parse a résumé and write the record as pretty JSON.
///
/// Uses atomic write (temp file + rename) to prevent partial files. The
/// document is written even when it carries the failure shape, and is also
/// returned to the caller.
pub async fn parse_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ParsedDocument, ResumeError> {
    let doc = parse_file(input_str, config).await?;
    write_json_atomic(output_path.as_ref(), &doc).await?;
    Ok(doc)
}

/// Write a document as pretty JSON via temp file + rename.
pub async fn write_json_atomic(path: &Path, doc: &ParsedDocument) -> Result<(), ResumeError> {
    let json = doc
        .to_json_pretty()
        .map_err(|e| ResumeError::Internal(format!("JSON serialisation failed: {e}")))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ResumeError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, json.as_bytes())
        .await
        .map_err(|e| ResumeError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| ResumeError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    debug!("Wrote {}", path.display());
    Ok(())
}

/// Parse many résumés concurrently and return all results in input order.
///
/// One bad document never aborts the batch: its [`BatchItem`] carries a
/// [`DocumentError`] and the others proceed.
pub async fn parse_batch<S: AsRef<str>>(inputs: &[S], config: &ExtractionConfig) -> BatchOutput {
    let start = Instant::now();
    let total = inputs.len();
    info!("Starting batch of {} documents", total);

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let mut items: Vec<BatchItem> = stream::iter(inputs.iter().enumerate().map(|(index, input)| {
        process_document(index, total, input.as_ref().to_string(), config.clone())
    }))
    .buffer_unordered(config.concurrency)
    .collect()
    .await;

    items.sort_by_key(|i| i.index);

    let parsed = items.iter().filter(|i| i.error.is_none()).count();
    let stats = BatchStats {
        total_documents: total,
        parsed_documents: parsed,
        failed_documents: total - parsed,
        total_duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Batch complete: {}/{} parsed, {}ms total",
        parsed, total, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total, parsed);
    }

    BatchOutput { items, stats }
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Resolve and decode one input to text.
pub(crate) async fn load_document(
    input_str: &str,
    config: &ExtractionConfig,
) -> Result<String, ResumeError> {
    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    text::load_text(resolved.path(), config.pdf_password.as_deref()).await
}

/// Run the extraction core on the blocking pool.
async fn parse_blocking(
    raw: String,
    config: ExtractionConfig,
) -> Result<ParsedDocument, tokio::task::JoinError> {
    tokio::task::spawn_blocking(move || parse_text(&raw, &config)).await
}

fn log_outcome(input_str: &str, doc: &ParsedDocument, start: Instant) {
    match doc.record() {
        Some(r) => info!(
            "Parsed {} in {}ms: {} skills, {} jobs, {} degrees",
            input_str,
            start.elapsed().as_millis(),
            r.skills.len(),
            r.work_experience.len(),
            r.education.len()
        ),
        None => warn!(
            "Extraction failed for {}: {}",
            input_str,
            doc.error().unwrap_or("unknown error")
        ),
    }
}

/// Load and parse one batch document, firing progress callbacks.
pub(crate) async fn process_document(
    index: usize,
    total: usize,
    input_str: String,
    config: ExtractionConfig,
) -> BatchItem {
    let start = Instant::now();
    if let Some(ref cb) = config.progress_callback {
        cb.on_document_start(index, total, &input_str);
    }

    let (document, error) = match load_document(&input_str, &config).await {
        Err(e) => {
            warn!("Could not load {}: {}", input_str, e);
            (
                None,
                Some(DocumentError::LoadFailed {
                    input: input_str.clone(),
                    detail: e.to_string(),
                }),
            )
        }
        Ok(raw) => match parse_blocking(raw, config.clone()).await {
            Err(e) => (
                None,
                Some(DocumentError::WorkerAborted {
                    input: input_str.clone(),
                    detail: e.to_string(),
                }),
            ),
            Ok(doc) => {
                log_outcome(&input_str, &doc, start);
                let error = doc.error().map(|detail| DocumentError::ExtractionFailed {
                    input: input_str.clone(),
                    detail: detail.to_string(),
                });
                (Some(doc), error)
            }
        },
    };

    if let Some(ref cb) = config.progress_callback {
        match &error {
            None => cb.on_document_complete(index, total, &input_str),
            Some(e) => cb.on_document_error(index, total, &e.to_string()),
        }
    }

    BatchItem {
        index,
        input: input_str,
        document,
        error,
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_text_handles_crlf_and_bom() {
        let doc = parse_text("\u{feff}Jane Doe\r\nSKILLS\r\nRust", &ExtractionConfig::default());
        let r = doc.record().unwrap();
        assert_eq!(r.contact.name.as_deref(), Some("Jane Doe"));
        assert_eq!(r.skills, vec!["Rust"]);
    }

    #[test]
    fn parse_lines_matches_parse_text() {
        let text = "Jane Doe\nSKILLS\nPython";
        let config = ExtractionConfig::default();
        let a = parse_text(text, &config).into_result().unwrap();
        let b = parse_lines(&text::text_lines(text), &config)
            .into_result()
            .unwrap();
        assert_eq!(a.skills, b.skills);
        assert_eq!(a.contact, b.contact);
    }

    #[tokio::test]
    async fn parse_bytes_decodes_text() {
        let doc = parse_bytes(b"Jane Doe\njane@example.com", &ExtractionConfig::default())
            .await
            .unwrap();
        assert!(doc.is_success());
    }

    #[tokio::test]
    async fn parse_bytes_rejects_invalid_utf8() {
        let err = parse_bytes(b"Jane \xff Doe", &ExtractionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ResumeError::NotUtf8 { .. }));
    }

    #[tokio::test]
    async fn parse_bytes_rejects_blank() {
        let err = parse_bytes(b"  \n ", &ExtractionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ResumeError::EmptyDocument { .. }));
    }

    #[test]
    fn parse_sync_reports_missing_file() {
        let err = parse_sync("/no/such/cv.txt", &ExtractionConfig::default()).unwrap_err();
        assert!(matches!(err, ResumeError::FileNotFound { .. }));
    }
}
