//! Education parsing keyed on degree keywords.

use crate::output::EducationEntry;
use crate::pipeline::sections::{SectionLabel, SectionMap};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static RE_DEGREE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(bachelor|master|ph\.?d|doctorate|m\.?sc|b\.?sc|m\.?tech|b\.?tech|diploma|certificate|associate)\b",
    )
    .unwrap()
});

static RE_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

#[derive(Default)]
struct EducationFold {
    done: Vec<EducationEntry>,
    current: Option<EducationEntry>,
}

impl EducationFold {
    fn step(mut self, line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return self;
        }

        if RE_DEGREE.is_match(line) {
            self.done.extend(self.current.take());
            self.current = Some(EducationEntry {
                degree: Some(line.to_string()),
                ..Default::default()
            });
            return self;
        }

        // Lines before the first degree carry no entry to attach to.
        let Some(entry) = self.current.as_mut() else {
            return self;
        };
        let year = RE_YEAR.find(line).map(|m| m.as_str().to_string());
        match year {
            None if entry.institution.is_none() => entry.institution = Some(line.to_string()),
            Some(y) => entry.year = Some(y),
            None => entry.description.push(line.to_string()),
        }
        self
    }

    fn finish(mut self) -> Vec<EducationEntry> {
        self.done.extend(self.current.take());
        self.done
    }
}

pub fn extract_education(sections: &SectionMap) -> Vec<EducationEntry> {
    let entries = sections
        .content(SectionLabel::Education)
        .into_iter()
        .fold(EducationFold::default(), EducationFold::step)
        .finish();
    debug!("education: {} entries", entries.len());
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::sections::classify_sections;
    use crate::pipeline::text::text_lines;

    fn parse(body: &str) -> Vec<EducationEntry> {
        extract_education(&classify_sections(&text_lines(&format!("EDUCATION\n{body}"))))
    }

    #[test]
    fn degree_institution_year() {
        let e = parse("Bachelor of Science\nMIT\n2019");
        assert_eq!(e.len(), 1);
        assert_eq!(e[0].degree.as_deref(), Some("Bachelor of Science"));
        assert_eq!(e[0].institution.as_deref(), Some("MIT"));
        assert_eq!(e[0].year.as_deref(), Some("2019"));
    }

    #[test]
    fn year_before_institution_is_still_recorded() {
        let e = parse("MSc Computer Science\n2016 - 2018\nETH Zurich\nThesis on compilers");
        assert_eq!(e[0].year.as_deref(), Some("2016"));
        assert_eq!(e[0].institution.as_deref(), Some("ETH Zurich"));
        assert_eq!(e[0].description, vec!["Thesis on compilers"]);
    }

    #[test]
    fn lines_before_first_degree_ignored() {
        let e = parse("Graduated with honours\n2010\nB.Tech Mechanical\nNUST");
        assert_eq!(e.len(), 1);
        assert_eq!(e[0].institution.as_deref(), Some("NUST"));
        assert!(e[0].year.is_none());
    }

    #[test]
    fn each_degree_opens_an_entry() {
        let e = parse("PhD Physics\nCaltech\nMaster of Arts\nYale\n1999");
        assert_eq!(e.len(), 2);
        assert!(e[0].year.is_none());
        assert_eq!(e[1].year.as_deref(), Some("1999"));
    }
}
