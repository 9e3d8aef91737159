//! Skills extraction against a curated vocabulary.

use crate::pipeline::sections::{SectionLabel, SectionMap};
use crate::vocabulary::{title_case, TECHNICAL_SKILLS};
use std::collections::BTreeSet;
use tracing::debug;

/// Find vocabulary terms in the skills section, the full text and the
/// experience and projects sections. Output is title-cased, deduplicated and
/// sorted.
///
/// `extra` extends the built-in vocabulary; terms must already be lower-case.
pub fn extract_skills(text: &str, sections: &SectionMap, extra: &[String]) -> Vec<String> {
    let sources = [
        sections.content(SectionLabel::Skills).join(" "),
        text.to_string(),
        sections.content(SectionLabel::Experience).join(" "),
        sections.content(SectionLabel::Projects).join(" "),
    ];

    let vocabulary = TECHNICAL_SKILLS
        .iter()
        .copied()
        .chain(extra.iter().map(String::as_str));

    let mut found = BTreeSet::new();
    let lowered: Vec<String> = sources.iter().map(|s| s.to_lowercase()).collect();
    for term in vocabulary {
        if lowered.iter().any(|hay| contains_term(hay, term)) {
            found.insert(title_case(term));
        }
    }

    debug!("skills: {} matched", found.len());
    found.into_iter().collect()
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Whole-term search. A boundary is any char outside `[A-Za-z0-9_]` or the
/// string edge, which lets terms like `c++` and `node.js` match.
pub fn contains_term(haystack: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(term) {
        let start = from + pos;
        let end = start + term.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !is_word_char(c));
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !is_word_char(c));
        if before_ok && after_ok {
            return true;
        }
        // Advance by one char so overlapping occurrences are still tried.
        from = start
            + haystack[start..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
    }
    false
}
