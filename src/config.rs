//! Configuration types for résumé extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share a config across batch workers and to diff two runs.

use crate::error::ResumeError;
use crate::progress::ProgressCallback;
use crate::tagger::SharedTagger;
use chrono::{Local, NaiveDate};
use std::fmt;

/// Configuration for résumé extraction.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use resume2json::ExtractionConfig;
/// use chrono::NaiveDate;
///
/// let config = ExtractionConfig::builder()
///     .concurrency(8)
///     .reference_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
///     .extra_skill("Svelte")
///     .build()
///     .unwrap();
/// assert_eq!(config.concurrency, 8);
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Number of documents parsed at once by the batch and stream APIs. Default: 4.
    ///
    /// Parsing is CPU-bound and runs on tokio's blocking pool, so values much
    /// above the core count only add scheduling overhead.
    pub concurrency: usize,

    /// Separator used to join summary lines into one string. Default: `" "`.
    pub summary_separator: String,

    /// The date that "Present" / "Current" resolves to. Default: today (local).
    ///
    /// Pin it to make `years_of_experience` reproducible across runs.
    pub reference_date: Option<NaiveDate>,

    /// Additional skill terms appended to the built-in vocabulary.
    pub extra_skills: Vec<String>,

    /// Optional entity tagger used as a fallback for name and location.
    pub tagger: Option<SharedTagger>,

    /// Optional progress callback for batch runs.
    pub progress_callback: Option<ProgressCallback>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// User password for encrypted PDF input.
    pub pdf_password: Option<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            summary_separator: " ".to_string(),
            reference_date: None,
            extra_skills: Vec::new(),
            tagger: None,
            progress_callback: None,
            download_timeout_secs: 120,
            pdf_password: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("concurrency", &self.concurrency)
            .field("summary_separator", &self.summary_separator)
            .field("reference_date", &self.reference_date)
            .field("extra_skills", &self.extra_skills)
            .field("tagger", &self.tagger.as_ref().map(|_| "<dyn EntityTagger>"))
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("pdf_password", &self.pdf_password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }

    /// The date "present" resolves to for this run.
    pub fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n;
        self
    }

    pub fn summary_separator(mut self, sep: impl Into<String>) -> Self {
        self.config.summary_separator = sep.into();
        self
    }

    pub fn reference_date(mut self, date: NaiveDate) -> Self {
        self.config.reference_date = Some(date);
        self
    }

    pub fn extra_skill(mut self, skill: impl Into<String>) -> Self {
        self.config.extra_skills.push(skill.into());
        self
    }

    pub fn extra_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .extra_skills
            .extend(skills.into_iter().map(Into::into));
        self
    }

    pub fn tagger(mut self, tagger: SharedTagger) -> Self {
        self.config.tagger = Some(tagger);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn pdf_password(mut self, pwd: impl Into<String>) -> Self {
        self.config.pdf_password = Some(pwd.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(mut self) -> Result<ExtractionConfig, ResumeError> {
        let c = &mut self.config;
        if c.concurrency == 0 {
            return Err(ResumeError::InvalidConfig(
                "Concurrency must be ≥ 1".into(),
            ));
        }
        if c.download_timeout_secs == 0 {
            return Err(ResumeError::InvalidConfig(
                "Download timeout must be ≥ 1 second".into(),
            ));
        }
        c.extra_skills = c
            .extra_skills
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        if let Some(bad) = c.extra_skills.iter().find(|s| s.chars().count() > 64) {
            return Err(ResumeError::InvalidConfig(format!(
                "Skill terms must be at most 64 characters, got '{bad}'"
            )));
        }
        c.extra_skills.sort();
        c.extra_skills.dedup();
        Ok(self.config)
    }
}
