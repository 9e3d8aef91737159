//! Section classification: partition a résumé into labelled buckets.
//!
//! A cursor starts at [`SectionLabel::General`]. Every line is tested against
//! a fixed ordered table of whole-line header patterns; the first match
//! switches the cursor and opens a new bucket whose header is that line.
//! Everything else is appended to the current bucket.
//!
//! A label that recurs (two `Skills` headers) opens a second bucket rather
//! than overwriting the first. Lookups by label concatenate all buckets of
//! that label in document order.

use crate::pipeline::text::TextLine;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The section a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionLabel {
    General,
    Contact,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Achievements,
    Languages,
}

impl SectionLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            SectionLabel::General => "general",
            SectionLabel::Contact => "contact",
            SectionLabel::Summary => "summary",
            SectionLabel::Experience => "experience",
            SectionLabel::Education => "education",
            SectionLabel::Skills => "skills",
            SectionLabel::Projects => "projects",
            SectionLabel::Certifications => "certifications",
            SectionLabel::Achievements => "achievements",
            SectionLabel::Languages => "languages",
        }
    }
}

impl fmt::Display for SectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header patterns in priority order. Each regex is anchored and
/// case-insensitive, so only a whole line can match.
static HEADER_TABLE: Lazy<Vec<(SectionLabel, Regex)>> = Lazy::new(|| {
    let table: &[(SectionLabel, &[&str])] = &[
        (
            SectionLabel::Contact,
            &[
                r"contact\s*(information|details)?",
                r"personal\s*(details|information)?",
                r"details",
            ],
        ),
        (
            SectionLabel::Summary,
            &[
                r"(professional|career|executive)\s+summary",
                r"summary",
                r"profile",
                r"(career\s+)?objective",
                r"about\s+me",
            ],
        ),
        (
            SectionLabel::Experience,
            &[
                r"(work|professional|employment)\s+(experience|history)",
                r"experience",
                r"work\s+history",
                r"career\s+history",
                r"employment",
            ],
        ),
        (
            SectionLabel::Education,
            &[
                r"education",
                r"(educational|academic)\s+(background|qualifications)",
                r"qualifications",
                r"degrees",
            ],
        ),
        (
            SectionLabel::Skills,
            &[
                r"(technical\s+)?skills",
                r"core\s+competencies",
                r"competencies",
                r"technologies",
                r"expertise",
                r"technical\s+proficiency",
            ],
        ),
        (
            SectionLabel::Projects,
            &[
                r"(key|notable|personal)\s+projects",
                r"project\s+(experience|portfolio)",
                r"projects",
            ],
        ),
        (
            SectionLabel::Certifications,
            &[
                r"certifications",
                r"certificates",
                r"licenses",
                r"professional\s+certifications",
            ],
        ),
        (
            SectionLabel::Achievements,
            &[
                r"(key\s+)?achievements",
                r"accomplishments",
                r"awards",
                r"honors",
                r"recognition",
            ],
        ),
        (
            SectionLabel::Languages,
            &[r"languages", r"language\s+skills"],
        ),
    ];

    table
        .iter()
        .flat_map(|(label, patterns)| {
            patterns
                .iter()
                .map(move |p| (*label, Regex::new(&format!(r"(?i)^(?:{p})$")).unwrap()))
        })
        .collect()
});

/// Return the label a line announces, if it is a section header.
///
/// A single trailing colon is tolerated (`"Skills:"`).
pub fn header_label(line: &str) -> Option<SectionLabel> {
    let t = line.trim();
    let t = t.strip_suffix(':').unwrap_or(t).trim_end();
    if t.is_empty() {
        return None;
    }
    HEADER_TABLE
        .iter()
        .find(|(_, re)| re.is_match(t))
        .map(|(label, _)| *label)
}

/// One bucket: an optional header line and the lines that followed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub label: SectionLabel,
    /// `None` only for the leading `general` bucket.
    pub header: Option<TextLine>,
    pub lines: Vec<TextLine>,
}

impl Section {
    /// Non-blank content lines.
    pub fn content(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(|l| !l.is_blank())
            .map(|l| l.content.as_str())
    }
}

/// Ordered buckets in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMap {
    pub sections: Vec<Section>,
}

impl SectionMap {
    /// Non-blank content lines of every bucket with this label, in order.
    pub fn content(&self, label: SectionLabel) -> Vec<&str> {
        self.sections
            .iter()
            .filter(|s| s.label == label)
            .flat_map(Section::content)
            .collect()
    }

    /// Whether at least one bucket carries this label.
    pub fn has(&self, label: SectionLabel) -> bool {
        self.sections.iter().any(|s| s.label == label)
    }

    /// Number of distinct labels present. `general` always counts.
    pub fn distinct_labels(&self) -> usize {
        let mut labels: Vec<SectionLabel> = self.sections.iter().map(|s| s.label).collect();
        labels.push(SectionLabel::General);
        labels.sort();
        labels.dedup();
        labels.len()
    }

    /// Every line in the order it was classified: header first, then content.
    pub fn flatten(&self) -> Vec<&TextLine> {
        self.sections
            .iter()
            .flat_map(|s| s.header.iter().chain(s.lines.iter()))
            .collect()
    }
}

/// Partition lines into labelled buckets.
pub fn classify_sections(lines: &[TextLine]) -> SectionMap {
    let mut sections = vec![Section {
        label: SectionLabel::General,
        header: None,
        lines: Vec::new(),
    }];

    for line in lines {
        match header_label(&line.content) {
            Some(label) => sections.push(Section {
                label,
                header: Some(line.clone()),
                lines: Vec::new(),
            }),
            None => {
                if let Some(current) = sections.last_mut() {
                    current.lines.push(line.clone());
                }
            }
        }
    }

    SectionMap { sections }
}
