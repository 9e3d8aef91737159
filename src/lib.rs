//! # resume2json
//!
//! Turn résumé text into a structured JSON record: contact details, summary,
//! skills, work history, education, projects, certifications, achievements,
//! languages and total years of experience.
//!
//! ## How it works
//!
//! Extraction is rule-based and deterministic. Lines are partitioned into
//! sections by recognising header lines ("EXPERIENCE", "Technical Skills",
//! "Academic Background", ...), then each section is read by a dedicated
//! extractor and the raw output is repaired by a fixed sequence of
//! post-processing rules. An optional [`EntityTagger`] can be injected to
//! fill in a name or location the rules miss.
//!
//! ## Pipeline Overview
//!
//! ```text
//! résumé (.txt / .pdf / URL)
//!  │
//!  ├─ 1. Input     resolve local file or download from URL
//!  ├─ 2. Text      decode UTF-8 or the PDF text layer, number lines
//!  ├─ 3. Sections  classify header lines into labelled buckets
//!  ├─ 4. Extract   contact, skills, experience, education, projects
//!  ├─ 5. Repair    6-rule post-processing (titles, places, fragments)
//!  └─ 6. Assemble  record + years of experience + metadata
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use resume2json::{parse_text, ExtractionConfig};
//!
//! let text = "Jane Doe\njane@example.com\n\nSKILLS\nPython, Docker";
//! let doc = parse_text(text, &ExtractionConfig::default());
//! let record = doc.into_result().unwrap();
//! assert_eq!(record.skills, vec!["Docker", "Python"]);
//! ```
//!
//! Files, URLs and batches go through the async API:
//!
//! ```rust,no_run
//! use resume2json::{parse_batch, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::builder().concurrency(8).build()?;
//!     let output = parse_batch(&["alice.txt", "bob.pdf"], &config).await;
//!     eprintln!("{}/{} parsed", output.stats.parsed_documents, output.stats.total_documents);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `resume2json` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `pdf`   | on      | Reads PDF input through pdfium's text layer |
//!
//! Disable both when using only the text API:
//! ```toml
//! resume2json = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod stream;
pub mod tagger;
pub mod vocabulary;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use error::{DocumentError, ResumeError};
pub use extract::{
    parse_batch, parse_bytes, parse_file, parse_lines, parse_sync, parse_text, parse_to_file,
};
pub use output::{
    BatchItem, BatchOutput, BatchStats, ContactRecord, EducationEntry, ExperienceEntry,
    ExtractionMetadata, FailedDocument, ParsedDocument, ProjectEntry, ResumeData,
};
pub use pipeline::sections::{classify_sections, Section, SectionLabel, SectionMap};
pub use pipeline::text::{text_lines, TextLine};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use stream::{inspect_sections, parse_stream, DocumentStream};
pub use tagger::{EntityTagger, SharedTagger};
