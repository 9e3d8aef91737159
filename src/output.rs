//! Output types: the structured résumé record and batch results.
//!
//! The JSON shape mirrors the record downstream consumers already expect:
//! contact fields at the top level, list sections as arrays, and an
//! `extraction_metadata` object. Optional entry fields are omitted rather
//! than serialised as `null` so a sparse job entry stays readable.

use crate::error::{DocumentError, ResumeError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity fields found anywhere in the text. Each is either validated or `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub location: Option<String>,
}

/// One employment record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Raw date range as written, e.g. `"01/2020 - Present"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<String>,
}

impl ExperienceEntry {
    /// An entry is worth keeping when it names a role or employer and carries
    /// at least one more piece of information.
    pub fn is_retainable(&self) -> bool {
        (self.title.is_some() || self.company.is_some())
            && (self.company.is_some() || self.duration.is_some() || !self.description.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Metadata attached to every document, successful or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    pub extracted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_sections_found: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_length: Option<usize>,
    pub success: bool,
}

/// The structured record produced for a successfully parsed résumé.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeData {
    #[serde(flatten)]
    pub contact: ContactRecord,
    pub summary: String,
    pub skills: Vec<String>,
    pub work_experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub projects: Vec<ProjectEntry>,
    pub certifications: Vec<String>,
    pub achievements: Vec<String>,
    pub languages: Vec<String>,
    pub years_of_experience: Option<f64>,
    pub extraction_metadata: ExtractionMetadata,
}

/// The failure shape: an error message and minimal metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedDocument {
    pub error: String,
    pub extraction_metadata: ExtractionMetadata,
}

/// Result of running the extraction core on one document.
///
/// Serialises untagged, so JSON consumers see either the full record or the
/// `{error, extraction_metadata}` failure shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParsedDocument {
    Failed(FailedDocument),
    Parsed(Box<ResumeData>),
}

impl ParsedDocument {
    /// Build the failure shape stamped with the current time.
    pub fn failure(error: impl Into<String>) -> Self {
        ParsedDocument::Failed(FailedDocument {
            error: error.into(),
            extraction_metadata: ExtractionMetadata {
                extracted_at: Utc::now(),
                total_sections_found: None,
                text_length: None,
                success: false,
            },
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ParsedDocument::Parsed(_))
    }

    /// The record, when extraction succeeded.
    pub fn record(&self) -> Option<&ResumeData> {
        match self {
            ParsedDocument::Parsed(data) => Some(data),
            ParsedDocument::Failed(_) => None,
        }
    }

    /// The error message, when extraction failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            ParsedDocument::Parsed(_) => None,
            ParsedDocument::Failed(f) => Some(&f.error),
        }
    }

    pub fn metadata(&self) -> &ExtractionMetadata {
        match self {
            ParsedDocument::Parsed(data) => &data.extraction_metadata,
            ParsedDocument::Failed(f) => &f.extraction_metadata,
        }
    }

    /// Convert into a `Result`, treating the failure shape as an error.
    pub fn into_result(self) -> Result<ResumeData, ResumeError> {
        match self {
            ParsedDocument::Parsed(data) => Ok(*data),
            ParsedDocument::Failed(f) => Err(ResumeError::ExtractionFailed(f.error)),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// One document of a batch, in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    /// 0-based position in the input list.
    pub index: usize,
    /// The path or URL as supplied by the caller.
    pub input: String,
    /// Present when the document was loaded and parsed successfully.
    pub document: Option<ParsedDocument>,
    /// Present when loading or extraction failed.
    pub error: Option<DocumentError>,
    pub duration_ms: u64,
}

/// Aggregate counters for a batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchStats {
    pub total_documents: usize,
    pub parsed_documents: usize,
    pub failed_documents: usize,
    pub total_duration_ms: u64,
}

/// The full result of [`crate::extract::parse_batch`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutput {
    pub items: Vec<BatchItem>,
    pub stats: BatchStats,
}

impl BatchOutput {
    /// Error out when any document failed, otherwise return the records in input order.
    pub fn into_result(self) -> Result<Vec<ResumeData>, ResumeError> {
        if self.stats.failed_documents > 0 {
            let first = self
                .items
                .iter()
                .find_map(|i| i.error.as_ref())
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(ResumeError::ExtractionFailed(format!(
                "{}/{} documents failed; first: {}",
                self.stats.failed_documents, self.stats.total_documents, first
            )));
        }
        self.items
            .into_iter()
            .filter_map(|i| i.document)
            .map(ParsedDocument::into_result)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_shape_serialises_minimal_metadata() {
        let doc = ParsedDocument::failure("No text could be extracted");
        let json: serde_json::Value = serde_json::to_value(&doc).expect("serialise");
        assert_eq!(json["error"], "No text could be extracted");
        assert_eq!(json["extraction_metadata"]["success"], false);
        assert!(json["extraction_metadata"].get("text_length").is_none());
        assert!(json.get("skills").is_none());
    }

    #[test]
    fn experience_entry_omits_missing_fields() {
        let entry = ExperienceEntry {
            title: Some("Engineer".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&entry).expect("serialise");
        assert_eq!(json, r#"{"title":"Engineer"}"#);
    }

    #[test]
    fn retention_rule() {
        let title_only = ExperienceEntry {
            title: Some("Engineer".into()),
            ..Default::default()
        };
        assert!(!title_only.is_retainable());

        let with_duration = ExperienceEntry {
            title: Some("Engineer".into()),
            duration: Some("2020 - 2021".into()),
            ..Default::default()
        };
        assert!(with_duration.is_retainable());

        let company_only = ExperienceEntry {
            company: Some("Acme".into()),
            ..Default::default()
        };
        assert!(company_only.is_retainable());

        let noise = ExperienceEntry {
            duration: Some("2020 - 2021".into()),
            description: vec!["x".into()],
            ..Default::default()
        };
        assert!(!noise.is_retainable());
    }

    #[test]
    fn failure_into_result_is_err() {
        let err = ParsedDocument::failure("boom").into_result().unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn failure_json_deserialises_back_to_failed() {
        let doc = ParsedDocument::failure("bad");
        let json = serde_json::to_string(&doc).expect("serialise");
        let back: ParsedDocument = serde_json::from_str(&json).expect("deserialise");
        assert!(!back.is_success());
        assert_eq!(back.error(), Some("bad"));
    }
}
