//! Streaming batch API: emit documents as they complete.
//!
//! Unlike the eager [`crate::extract::parse_batch`], which returns only after
//! every document finishes, [`parse_stream`] yields [`BatchItem`]s as soon as
//! each document is done. Items arrive in completion order; sort by `index`
//! if order matters.
//!
//! Batch-level progress callbacks (`on_batch_start`, `on_batch_complete`)
//! are not fired here since the caller owns the stream's lifetime.
//! Per-document callbacks fire as usual.

use crate::config::ExtractionConfig;
use crate::extract::{load_document, process_document};
use crate::output::{BatchItem, ParsedDocument};
use crate::error::ResumeError;
use futures::stream::{self, StreamExt};
use std::pin::Pin;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of per-document results.
pub type DocumentStream = Pin<Box<dyn Stream<Item = BatchItem> + Send>>;

/// Parse many résumés concurrently, streaming each result as it finishes.
///
/// The stream is lazy: nothing is read until it is polled.
///
/// # Example
/// ```rust,no_run
/// use resume2json::{parse_stream, ExtractionConfig};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() {
/// let config = ExtractionConfig::default();
/// let mut results = parse_stream(["a.txt", "b.pdf"], &config);
/// while let Some(item) = results.next().await {
///     match item.error {
///         None => println!("{}: ok", item.input),
///         Some(e) => eprintln!("{e}"),
///     }
/// }
/// # }
/// ```
pub fn parse_stream<I, S>(inputs: I, config: &ExtractionConfig) -> DocumentStream
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let inputs: Vec<String> = inputs.into_iter().map(Into::into).collect();
    let total = inputs.len();
    info!("Starting streaming batch of {} documents", total);

    let config = config.clone();
    let concurrency = config.concurrency;
    let s = stream::iter(inputs.into_iter().enumerate().map(move |(index, input)| {
        process_document(index, total, input, config.clone())
    }))
    .buffer_unordered(concurrency);

    Box::pin(s)
}

/// Load a single input and return its text split into the section map,
/// without running the field extractors. Used to debug segmentation.
pub async fn inspect_sections(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<crate::pipeline::sections::SectionMap, ResumeError> {
    use crate::pipeline::{sections, text};
    let raw = load_document(input_str.as_ref(), config).await?;
    let normalised = text::normalise_text(&raw);
    Ok(sections::classify_sections(&text::text_lines(&normalised)))
}

/// Collect a stream back into input order, dropping load failures.
pub async fn collect_documents(stream: DocumentStream) -> Vec<(usize, ParsedDocument)> {
    let mut docs: Vec<(usize, ParsedDocument)> = stream
        .filter_map(|item| async move { item.document.map(|d| (item.index, d)) })
        .collect()
        .await;
    docs.sort_by_key(|(i, _)| *i);
    docs
}
