//! Project parsing: cluster lines into titles and descriptions.

use crate::output::ProjectEntry;
use crate::pipeline::sections::{SectionLabel, SectionMap};
use crate::vocabulary::{starts_with_bullet, strip_bullet, PROJECT_INDICATORS, TITLE_STOPWORDS};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// A lower-case letter, sentence punctuation, then a capital: two sentences
/// run together, so the line is prose rather than a title.
static RE_SENTENCE_JOIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z][.!?]\s*[A-Z]").unwrap());

/// Upper-case only at the start of a letter run, lower-case only inside one
/// (`"Skills:"`, `"E-Commerce"`).
fn is_title_word(word: &str) -> bool {
    let mut cased = false;
    let mut prev_cased = false;
    for c in word.chars() {
        if c.is_uppercase() {
            if prev_cased {
                return false;
            }
            prev_cased = true;
            cased = true;
        } else if c.is_lowercase() {
            if !prev_cased {
                return false;
            }
            prev_cased = true;
            cased = true;
        } else {
            prev_cased = false;
        }
    }
    cased
}

fn is_upper_word(word: &str) -> bool {
    word.chars().any(char::is_alphabetic) && !word.chars().any(char::is_lowercase)
}

pub fn is_project_title(line: &str) -> bool {
    if starts_with_bullet(line) {
        return false;
    }
    let len = line.chars().count();
    let low = line.to_lowercase();

    let indicated = len < 80
        && PROJECT_INDICATORS.iter().any(|i| low.contains(i))
        && !RE_SENTENCE_JOIN.is_match(line);
    if indicated {
        return true;
    }

    if len >= 60 {
        return false;
    }
    let words: Vec<&str> = line.split_whitespace().collect();
    words.len() <= 5
        && words.iter().any(|w| is_title_word(w) || is_upper_word(w))
        && !words
            .iter()
            .any(|w| TITLE_STOPWORDS.contains(&w.to_lowercase().as_str()))
}

#[derive(Default)]
struct ProjectFold {
    done: Vec<ProjectEntry>,
    current: Option<String>,
    description: Vec<String>,
}

impl ProjectFold {
    fn flush(&mut self) {
        if let Some(name) = self.current.take() {
            let description = (!self.description.is_empty()).then(|| self.description.join(" "));
            self.done.push(ProjectEntry { name, description });
        }
        self.description.clear();
    }

    fn step(mut self, line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return self;
        }
        if is_project_title(line) {
            self.flush();
            self.current = Some(line.to_string());
            return self;
        }
        if self.current.is_none() {
            return self;
        }
        if starts_with_bullet(line) {
            self.description.push(strip_bullet(line).to_string());
        } else if let Some(last) = self.description.last_mut() {
            last.push(' ');
            last.push_str(line);
        } else {
            self.description.push(line.to_string());
        }
        self
    }

    fn finish(mut self) -> Vec<ProjectEntry> {
        self.flush();
        self.done
    }
}

/// Raw project entries, before cleanup and fragment merging.
pub fn extract_projects(sections: &SectionMap) -> Vec<ProjectEntry> {
    let entries = sections
        .content(SectionLabel::Projects)
        .into_iter()
        .fold(ProjectFold::default(), ProjectFold::step)
        .finish();
    debug!("projects: {} raw entries", entries.len());
    entries
}
