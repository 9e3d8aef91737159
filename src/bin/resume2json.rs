//! CLI binary for resume2json.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractionConfig` and prints JSON records.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use resume2json::extract::write_json_atomic;
use resume2json::{
    inspect_sections, parse_batch, parse_file, BatchItem, ExtractionConfig,
    ExtractionProgressCallback, ParsedDocument, ProgressCallback,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback for batches. Documents finish out of order, so
/// start times are keyed by input index.
struct CliProgressCallback {
    bar: ProgressBar,
    start_times: Mutex<HashMap<usize, Instant>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} résumés  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Parsing");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
        })
    }

    fn elapsed_secs(&self, index: usize) -> f64 {
        self.start_times
            .lock()
            .ok()
            .and_then(|mut m| m.remove(&index))
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.reset_eta();
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Parsing {total} résumés…"))
        ));
    }

    fn on_document_start(&self, index: usize, _total: usize, input: &str) {
        if let Ok(mut m) = self.start_times.lock() {
            m.insert(index, Instant::now());
        }
        self.bar.set_message(input.to_string());
    }

    fn on_document_complete(&self, index: usize, total: usize, input: &str) {
        let secs = self.elapsed_secs(index);
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            green("✓"),
            index + 1,
            total,
            input,
            dim(&format!("{secs:.2}s")),
        ));
        self.bar.inc(1);
    }

    fn on_document_error(&self, index: usize, total: usize, error: &str) {
        let secs = self.elapsed_secs(index);

        let msg: String = if error.chars().count() > 80 {
            error.chars().take(79).chain(['\u{2026}']).collect()
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            red("✗"),
            index + 1,
            total,
            red(&msg),
            dim(&format!("{secs:.2}s")),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total: usize, success_count: usize) {
        let failed = total.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} résumés parsed successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} résumés parsed  ({} failed)",
                if failed == total { red("✘") } else { cyan("⚠") },
                bold(&success_count.to_string()),
                total,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Parse one résumé (JSON on stdout)
  resume2json cv.txt

  # Write to a file
  resume2json cv.pdf -o cv.json

  # Parse a folder of résumés, one JSON file each
  resume2json resumes/*.txt --output-dir parsed/

  # Parse from a URL
  resume2json https://example.org/jane-doe.pdf

  # Reproducible years-of-experience
  resume2json --reference-date 2024-01-01 cv.txt

  # Debug section detection
  resume2json --sections-only cv.txt

ENVIRONMENT VARIABLES:
  RESUME2JSON_CONCURRENCY      Documents parsed in parallel
  RESUME2JSON_REFERENCE_DATE   Date that "Present" resolves to (YYYY-MM-DD)
  RESUME2JSON_EXTRA_SKILLS     Comma-separated additional skill terms
  RUST_LOG                     Override the log filter (e.g. resume2json=debug)

PDF INPUT:
  PDF files are read through their text layer with libpdfium, which must be
  installed system-wide or placed next to the binary. Scanned PDFs without a
  text layer yield an empty document.
"#;

/// Extract structured JSON records from résumés.
#[derive(Parser, Debug)]
#[command(
    name = "resume2json",
    version,
    about = "Extract structured JSON records from résumé text and PDF files",
    long_about = "Parse résumés (plain text, PDF text layer, or HTTP/HTTPS URLs) into \
structured JSON: contact details, summary, skills, work experience, education, projects, \
certifications, achievements, languages and total years of experience.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local file paths or HTTP/HTTPS URLs.
    #[arg(required = true, num_args = 1..)]
    inputs: Vec<String>,

    /// Write JSON to this file instead of stdout.
    #[arg(short, long, env = "RESUME2JSON_OUTPUT", conflicts_with = "output_dir")]
    output: Option<PathBuf>,

    /// Write one `<stem>.json` per input into this directory.
    #[arg(long, env = "RESUME2JSON_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Number of résumés parsed in parallel.
    #[arg(short, long, env = "RESUME2JSON_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Date that ongoing roles ("Present") resolve to. Defaults to today.
    #[arg(long, env = "RESUME2JSON_REFERENCE_DATE", value_parser = parse_reference_date)]
    reference_date: Option<NaiveDate>,

    /// String used to join summary lines.
    #[arg(long, env = "RESUME2JSON_SUMMARY_SEPARATOR", default_value = " ")]
    summary_separator: String,

    /// Additional skill term to recognise (repeatable).
    #[arg(long = "extra-skill", env = "RESUME2JSON_EXTRA_SKILLS", value_delimiter = ',')]
    extra_skills: Vec<String>,

    /// Emit single-line JSON.
    #[arg(long, env = "RESUME2JSON_COMPACT")]
    compact: bool,

    /// Disable progress bar.
    #[arg(long, env = "RESUME2JSON_NO_PROGRESS")]
    no_progress: bool,

    /// Print the detected section map instead of the record.
    #[arg(long)]
    sections_only: bool,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "RESUME2JSON_PASSWORD")]
    password: Option<String>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "RESUME2JSON_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "RESUME2JSON_QUIET")]
    quiet: bool,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "RESUME2JSON_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,
}

fn parse_reference_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD ({e})"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs for batches.
    let is_batch = cli.inputs.len() > 1;
    let show_progress = is_batch && !cli.quiet && !cli.no_progress && !cli.sections_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ExtractionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Sections-only mode ───────────────────────────────────────────────
    if cli.sections_only {
        for input in &cli.inputs {
            let map = inspect_sections(input, &config)
                .await
                .with_context(|| format!("Failed to read {input}"))?;
            emit(&cli, &map)?;
        }
        return Ok(());
    }

    // ── Single input ─────────────────────────────────────────────────────
    if !is_batch {
        let input = &cli.inputs[0];
        let doc = parse_file(input, &config)
            .await
            .with_context(|| format!("Failed to parse {input}"))?;

        match (&cli.output, &cli.output_dir) {
            (Some(path), _) => write_document(path, &doc).await?,
            (None, Some(dir)) => {
                write_document(&dir.join(format!("{}.json", input_stem(input))), &doc).await?
            }
            (None, None) => emit(&cli, &doc)?,
        }

        if let Some(err) = doc.error() {
            anyhow::bail!("Extraction failed for {input}: {err}");
        }
        return Ok(());
    }

    // ── Batch ────────────────────────────────────────────────────────────
    let output = parse_batch(cli.inputs.as_slice(), &config).await;
    let failed = output.stats.failed_documents;

    if let Some(ref dir) = cli.output_dir {
        let mut seen = HashSet::new();
        for item in &output.items {
            let mut stem = input_stem(&item.input);
            if !seen.insert(stem.clone()) {
                stem = format!("{}-{}", stem, item.index + 1);
            }
            write_document(&dir.join(format!("{stem}.json")), &document_of(item)).await?;
        }
    } else {
        let docs: Vec<ParsedDocument> = output.items.iter().map(document_of).collect();
        match cli.output {
            Some(ref path) => {
                let json = serde_json::to_string_pretty(&docs)
                    .context("Failed to serialise output")?;
                tokio::fs::write(path, json)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            None => emit(&cli, &docs)?,
        }
    }

    if !cli.quiet && !show_progress {
        eprintln!(
            "Parsed {}/{} résumés in {}ms",
            output.stats.parsed_documents,
            output.stats.total_documents,
            output.stats.total_duration_ms
        );
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} résumés failed", output.stats.total_documents);
    }
    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .concurrency(cli.concurrency)
        .summary_separator(cli.summary_separator.clone())
        .extra_skills(cli.extra_skills.iter().cloned())
        .download_timeout_secs(cli.download_timeout);

    if let Some(date) = cli.reference_date {
        builder = builder.reference_date(date);
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.pdf_password(pwd.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// A load failure becomes the failure shape so batch output stays uniform.
fn document_of(item: &BatchItem) -> ParsedDocument {
    match (&item.document, &item.error) {
        (Some(doc), _) => doc.clone(),
        (None, Some(err)) => ParsedDocument::failure(err.to_string()),
        (None, None) => ParsedDocument::failure("no result"),
    }
}

async fn write_document(path: &Path, doc: &ParsedDocument) -> Result<()> {
    write_json_atomic(path, doc)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn emit<T: Serialize>(cli: &Cli, value: &T) -> Result<()> {
    let json = if cli.compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
    .context("Failed to serialise output")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{json}").context("Failed to write to stdout")?;
    Ok(())
}

/// File stem of a path or the last segment of a URL.
fn input_stem(input: &str) -> String {
    let last = input
        .trim_end_matches('/')
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(input);
    let last = last.split(['?', '#']).next().unwrap_or(last);
    Path::new(last)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "resume".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems_from_paths_and_urls() {
        assert_eq!(input_stem("cvs/jane.txt"), "jane");
        assert_eq!(input_stem("https://example.org/a/bob.pdf?x=1"), "bob");
        assert_eq!(input_stem("https://example.org/"), "example");
        assert_eq!(input_stem(""), "resume");
    }

    #[test]
    fn reference_date_arg() {
        assert!(parse_reference_date("2024-01-01").is_ok());
        assert!(parse_reference_date("01/01/2024").is_err());
    }

    #[test]
    fn cli_parses_repeatable_skills() {
        let cli = Cli::try_parse_from([
            "resume2json",
            "--extra-skill",
            "Haskell",
            "--extra-skill",
            "OCaml,Elm",
            "cv.txt",
        ])
        .unwrap();
        assert_eq!(cli.extra_skills, vec!["Haskell", "OCaml", "Elm"]);
        assert_eq!(cli.inputs, vec!["cv.txt"]);
    }

    #[test]
    fn zero_concurrency_is_a_config_error() {
        let cli = Cli::try_parse_from(["resume2json", "--concurrency", "0", "cv.txt"]).unwrap();
        assert!(build_config(&cli, None).is_err());

        let cli = Cli::try_parse_from(["resume2json", "--concurrency", "2", "cv.txt"]).unwrap();
        assert_eq!(build_config(&cli, None).unwrap().concurrency, 2);
    }
}
