//! Experience parsing: fold the experience bucket into employment records.
//!
//! The fold carries finished entries, the entry in progress and its pending
//! bullet lines. A boundary line (dated role line, or a short line naming a
//! job title) closes the entry in progress and opens a new one.

use crate::output::ExperienceEntry;
use crate::pipeline::sections::{SectionLabel, SectionMap};
use crate::vocabulary::{
    is_lone_bullet, starts_with_bullet, strip_bullet, JOB_TITLE_KEYWORDS, LEAKED_SECTION_TOKENS,
};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Lines at least this long are never titles or company names.
const MAX_HEADING_CHARS: usize = 100;

/// How a boundary pattern's capture groups map to fields.
#[derive(Clone, Copy)]
enum Shape {
    /// (title, duration, trailing company)
    TitleDurationRest,
    /// (title, company, duration)
    TitleAtCompanyDuration,
}

static JOB_PATTERNS: Lazy<Vec<(Regex, Shape)>> = Lazy::new(|| {
    [
        (
            r"(?i)^(.+?)\s+(\d{1,2}/\d{4}\s*[-–—]\s*(?:present|\d{1,2}/\d{4}))\s*(.*)$",
            Shape::TitleDurationRest,
        ),
        (
            r"(?i)^(.+?)\s+(\d{4}\s*[-–—]\s*(?:present|\d{4}))\s*(.*)$",
            Shape::TitleDurationRest,
        ),
        (
            r"(?i)^(.+?)\s+at\s+(.+?)\s+(\d{1,2}/\d{4}\s*[-–—]\s*(?:present|\d{1,2}/\d{4}))$",
            Shape::TitleAtCompanyDuration,
        ),
        (
            r"(?i)^(.+?)\s+at\s+(.+?)\s+(\d{4}\s*[-–—]\s*(?:present|\d{4}))$",
            Shape::TitleAtCompanyDuration,
        ),
    ]
    .into_iter()
    .map(|(p, shape)| (Regex::new(p).unwrap(), shape))
    .collect()
});

static RE_FOUR_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").unwrap());
static RE_TITLE_AT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\S\s+at\s+\S").unwrap());

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    (!t.is_empty()).then(|| t.to_string())
}

/// Try to read the line as the start of a new job.
fn boundary(line: &str) -> Option<ExperienceEntry> {
    for (re, shape) in JOB_PATTERNS.iter() {
        if let Some(caps) = re.captures(line) {
            let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());
            let entry = match shape {
                Shape::TitleDurationRest => ExperienceEntry {
                    title: non_empty(strip_bullet(group(1))),
                    duration: non_empty(group(2)),
                    company: non_empty(group(3)).filter(|c| !RE_FOUR_DIGITS.is_match(c)),
                    description: Vec::new(),
                },
                Shape::TitleAtCompanyDuration => ExperienceEntry {
                    title: non_empty(strip_bullet(group(1))),
                    company: non_empty(group(2)),
                    duration: non_empty(group(3)),
                    description: Vec::new(),
                },
            };
            return Some(entry);
        }
    }

    if line.chars().count() < MAX_HEADING_CHARS && !starts_with_bullet(line) {
        let low = line.to_lowercase();
        if JOB_TITLE_KEYWORDS.iter().any(|k| low.contains(k)) {
            return Some(ExperienceEntry {
                title: Some(line.to_string()),
                ..Default::default()
            });
        }
    }
    None
}

fn is_leaked_header(line: &str) -> bool {
    let low = line.trim_end_matches(':').trim().to_lowercase();
    LEAKED_SECTION_TOKENS.contains(&low.as_str())
}

/// Fold state over the experience lines.
#[derive(Default)]
struct ExperienceFold {
    done: Vec<ExperienceEntry>,
    current: Option<ExperienceEntry>,
    bullets: Vec<String>,
}

impl ExperienceFold {
    fn flush(mut self) -> Self {
        if let Some(mut entry) = self.current.take() {
            entry.description.append(&mut self.bullets);
            self.done.push(entry);
        } else if !self.bullets.is_empty() {
            debug!("dropping {} description lines with no job", self.bullets.len());
            self.bullets.clear();
        }
        self
    }

    fn step(self, line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() || is_lone_bullet(line) || is_leaked_header(line) {
            return self;
        }

        if let Some(next) = boundary(line) {
            return self.open(next);
        }

        if starts_with_bullet(line) {
            let mut s = self;
            s.bullets.push(strip_bullet(line).to_string());
            return s;
        }

        let short_and_undated =
            line.chars().count() < MAX_HEADING_CHARS && !RE_FOUR_DIGITS.is_match(line);
        let mut s = self;
        match s.current.as_mut() {
            Some(entry) if short_and_undated && entry.company.is_none() => {
                entry.company = Some(line.to_string());
            }
            None if short_and_undated => {
                s.current = Some(ExperienceEntry {
                    company: Some(line.to_string()),
                    ..Default::default()
                });
            }
            _ => match s.bullets.last_mut() {
                Some(last) => {
                    last.push(' ');
                    last.push_str(line);
                }
                None => s.bullets.push(line.to_string()),
            },
        }
        s
    }

    /// Start a new entry, or complete a company-only entry in place when the
    /// boundary line names no employer of its own.
    fn open(mut self, next: ExperienceEntry) -> Self {
        let company_only = matches!(
            &self.current,
            Some(e) if e.title.is_none() && e.description.is_empty()
        ) && self.bullets.is_empty();
        let names_employer = next.company.is_some()
            || next.title.as_deref().is_some_and(|t| RE_TITLE_AT.is_match(t));

        if company_only && !names_employer {
            if let Some(entry) = self.current.as_mut() {
                entry.title = next.title;
                entry.duration = next.duration;
            }
            return self;
        }

        let mut s = self.flush();
        s.current = Some(next);
        s
    }

    fn finish(self) -> Vec<ExperienceEntry> {
        self.flush().done
    }
}

/// Parse every experience bucket into raw (un-normalised) entries.
pub fn extract_experience(sections: &SectionMap) -> Vec<ExperienceEntry> {
    let entries = parse_experience_lines(&sections.content(SectionLabel::Experience));
    debug!("experience: {} raw entries", entries.len());
    entries
}

/// Run the experience fold over bare lines.
pub fn parse_experience_lines(lines: &[&str]) -> Vec<ExperienceEntry> {
    lines
        .iter()
        .copied()
        .fold(ExperienceFold::default(), ExperienceFold::step)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::sections::classify_sections;
    use crate::pipeline::text::text_lines;

    fn parse(body: &str) -> Vec<ExperienceEntry> {
        let text = format!("EXPERIENCE\n{body}");
        extract_experience(&classify_sections(&text_lines(&text)))
    }

    #[test]
    fn dated_title_line_with_bullets() {
        let e = parse("Software Engineer 01/2020 - Present\n• Built APIs\n• Led migrations");
        assert_eq!(e.len(), 1);
        assert_eq!(e[0].title.as_deref(), Some("Software Engineer"));
        assert_eq!(e[0].duration.as_deref(), Some("01/2020 - Present"));
        assert_eq!(e[0].description, vec!["Built APIs", "Led migrations"]);
    }

    #[test]
    fn trailing_company_after_duration() {
        let e = parse("Backend Developer 2019 - 2021 Acme Corp");
        assert_eq!(e[0].company.as_deref(), Some("Acme Corp"));
        assert_eq!(e[0].duration.as_deref(), Some("2019 - 2021"));
    }

    #[test]
    fn dated_trailer_is_not_a_company() {
        let e = parse("Developer 2019 - 2021 (since 2018)");
        assert_eq!(e[0].company, None);
    }

    #[test]
    fn company_line_follows_title() {
        let e = parse("Data Analyst 2018 - 2019\nGlobex\n- Built dashboards\nthat executives used");
        assert_eq!(e[0].company.as_deref(), Some("Globex"));
        assert_eq!(e[0].description, vec!["Built dashboards that executives used"]);
    }

    #[test]
    fn company_first_then_title_folds_into_one_entry() {
        let e = parse("Initech\nSenior Engineer 2015 - 2018\n• Shipped TPS reports");
        assert_eq!(e.len(), 1);
        assert_eq!(e[0].company.as_deref(), Some("Initech"));
        assert_eq!(e[0].title.as_deref(), Some("Senior Engineer"));
        assert_eq!(e[0].duration.as_deref(), Some("2015 - 2018"));
    }

    #[test]
    fn company_line_does_not_absorb_a_role_with_its_own_employer() {
        let e = parse_experience_lines(&["Initech", "Engineer at Acme 2019 - 2020"]);
        assert_eq!(e.len(), 2);
        assert_eq!(e[0].company.as_deref(), Some("Initech"));
        assert!(e[0].title.is_none());
        assert_eq!(e[1].title.as_deref(), Some("Engineer at Acme"));
        assert_eq!(e[1].duration.as_deref(), Some("2019 - 2020"));

        let e = parse("Initech\nBackend Developer 2019 - 2021 Acme Corp");
        assert_eq!(e.len(), 2);
        assert_eq!(e[1].company.as_deref(), Some("Acme Corp"));

        let jobs = crate::pipeline::postprocess::normalize_experiences(
            parse_experience_lines(&["Initech", "Engineer at Acme 2019 - 2020"]),
        );
        let acme = jobs.iter().find(|j| j.duration.is_some()).unwrap();
        assert_eq!(acme.title.as_deref(), Some("Engineer"));
        assert_eq!(acme.company.as_deref(), Some("Acme"));
    }

    #[test]
    fn at_line_without_dash_date_keeps_whole_title() {
        // The undated "at" form is only a keyword boundary; splitting happens later.
        let e = parse("Engineer at Acme\n2010 - 2012 contract");
        assert_eq!(e[0].title.as_deref(), Some("Engineer at Acme"));
        assert!(e[0].company.is_none());
        assert_eq!(e[0].description, vec!["2010 - 2012 contract"]);
    }

    #[test]
    fn title_keyword_line_is_boundary() {
        let e = parse("Engineer 2010 - 2012\nHooli\nProduct Manager\nPied Piper");
        assert_eq!(e.len(), 2);
        assert_eq!(e[1].title.as_deref(), Some("Product Manager"));
        assert_eq!(e[1].company.as_deref(), Some("Pied Piper"));
    }

    #[test]
    fn skips_lone_bullets_and_leaked_headers() {
        let e = parse_experience_lines(&["Engineer 2010 - 2012", "•", "Skills", "- Wrote code"]);
        assert_eq!(e.len(), 1);
        assert_eq!(e[0].description, vec!["Wrote code"]);
    }

    #[test]
    fn plain_line_starts_description_when_company_known() {
        let e = parse("Engineer 2010 - 2012 Acme\nResponsible for the billing platform.");
        assert_eq!(e[0].title.as_deref(), Some("Engineer"));
        assert_eq!(e[0].company.as_deref(), Some("Acme"));
        assert_eq!(e[0].description, vec!["Responsible for the billing platform."]);
    }
}
