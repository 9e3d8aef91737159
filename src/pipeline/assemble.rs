//! Result assembly: run every extractor and repair rule over one document.
//!
//! This is the only stage that sees the whole record. It never returns an
//! error: blank input and internal faults (including a panic in any
//! extractor) become the failure shape of [`ParsedDocument`].

use crate::config::ExtractionConfig;
use crate::output::{ExtractionMetadata, ParsedDocument, ResumeData};
use crate::pipeline::contact::extract_contact;
use crate::pipeline::dates::years_of_experience;
use crate::pipeline::education::extract_education;
use crate::pipeline::experience::extract_experience;
use crate::pipeline::postprocess::{
    certifications_from_text, clean_languages, clean_projects, improve_location,
    merge_project_fragments, normalize_experiences,
};
use crate::pipeline::projects::extract_projects;
use crate::pipeline::sections::{classify_sections, SectionLabel};
use crate::pipeline::skills::extract_skills;
use crate::pipeline::text::TextLine;
use chrono::Utc;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, error, warn};

pub const EMPTY_INPUT_ERROR: &str = "No text could be extracted from the document";

/// Build the record for one document.
///
/// `text` is the document as a whole (used by the section-independent
/// extractors and for `text_length`); `lines` is the same text split into
/// numbered lines.
pub fn assemble(text: &str, lines: &[TextLine], config: &ExtractionConfig) -> ParsedDocument {
    if text.trim().is_empty() {
        warn!("{}", EMPTY_INPUT_ERROR);
        return ParsedDocument::failure(EMPTY_INPUT_ERROR);
    }

    match catch_unwind(AssertUnwindSafe(|| build_record(text, lines, config))) {
        Ok(record) => ParsedDocument::Parsed(Box::new(record)),
        Err(payload) => {
            let msg = panic_message(payload.as_ref());
            error!("Extraction aborted: {}", msg);
            ParsedDocument::failure(format!("Internal extraction error: {msg}"))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn build_record(text: &str, lines: &[TextLine], config: &ExtractionConfig) -> ResumeData {
    let sections = classify_sections(lines);
    debug!(
        buckets = sections.sections.len(),
        labels = sections.distinct_labels(),
        "sections classified"
    );

    let mut contact = extract_contact(text, config.tagger.as_deref());
    let skills = extract_skills(text, &sections, &config.extra_skills);
    let work_experience = normalize_experiences(extract_experience(&sections));
    let education = extract_education(&sections);
    let projects = merge_project_fragments(clean_projects(extract_projects(&sections)));

    let owned = |label| -> Vec<String> {
        sections
            .content(label)
            .into_iter()
            .map(str::to_string)
            .collect()
    };

    let mut certifications = owned(SectionLabel::Certifications);
    if certifications.is_empty() {
        certifications = certifications_from_text(text);
    }
    let achievements = owned(SectionLabel::Achievements);
    let languages = clean_languages(&sections.content(SectionLabel::Languages));

    let non_blank: Vec<&str> = lines
        .iter()
        .filter(|l| !l.is_blank())
        .map(|l| l.content.as_str())
        .collect();
    contact.location = improve_location(&non_blank, contact.location.take());

    let years_of_experience = years_of_experience(
        work_experience.iter().filter_map(|e| e.duration.as_deref()),
        config.today(),
    );

    debug!(
        skills = skills.len(),
        jobs = work_experience.len(),
        degrees = education.len(),
        projects = projects.len(),
        certifications = certifications.len(),
        languages = languages.len(),
        "record assembled"
    );

    ResumeData {
        contact,
        summary: sections
            .content(SectionLabel::Summary)
            .join(&config.summary_separator),
        skills,
        work_experience,
        education,
        projects,
        certifications,
        achievements,
        languages,
        years_of_experience,
        extraction_metadata: ExtractionMetadata {
            extracted_at: Utc::now(),
            total_sections_found: Some(sections.distinct_labels()),
            text_length: Some(text.chars().count()),
            success: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::text::text_lines;
    use chrono::NaiveDate;

    fn run(text: &str) -> ParsedDocument {
        let config = ExtractionConfig::builder()
            .reference_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .build()
            .unwrap();
        assemble(text, &text_lines(text), &config)
    }

    #[test]
    fn blank_input_is_failure_shape() {
        let doc = run(" \n\t\n");
        assert!(!doc.is_success());
        assert_eq!(doc.error(), Some(EMPTY_INPUT_ERROR));
        assert!(!doc.metadata().success);
    }

    #[test]
    fn metadata_counts_sections_and_chars() {
        let text = "Jane Doe\nSUMMARY\nBuilds compilers.\nSKILLS\nRust";
        let doc = run(text);
        let meta = doc.metadata();
        assert!(meta.success);
        assert_eq!(meta.total_sections_found, Some(3));
        assert_eq!(meta.text_length, Some(text.chars().count()));
    }

    #[test]
    fn summary_lines_joined_with_separator() {
        let config = ExtractionConfig::builder()
            .summary_separator("\n")
            .build()
            .unwrap();
        let text = "Summary\nFirst line\nSecond line";
        let doc = assemble(text, &text_lines(text), &config);
        assert_eq!(doc.record().unwrap().summary, "First line\nSecond line");
    }

    #[test]
    fn certifications_fall_back_to_text_scan() {
        let doc = run("Jane Doe\nCertified: AWS Certification - Associate");
        assert_eq!(
            doc.record().unwrap().certifications,
            vec!["Certified: AWS Certification - Associate"]
        );
    }

    #[test]
    fn certifications_section_passes_through() {
        let doc = run("Certifications\nCKA\nCKAD");
        assert_eq!(doc.record().unwrap().certifications, vec!["CKA", "CKAD"]);
    }

    #[test]
    fn panic_payloads_are_described() {
        let s: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(s.as_ref()), "boom");
        let s: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(s.as_ref()), "bang");
        let s: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(s.as_ref()), "unknown panic");
    }
}
