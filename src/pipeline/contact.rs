//! Contact extraction: name, email, phone, LinkedIn and location.
//!
//! These fields are read from the raw text regardless of section boundaries,
//! since résumés put contact details in headers, footers and sidebars alike.
//! Every field is either a value that passed its shape test or `None`.

use crate::output::ContactRecord;
use crate::tagger::EntityTagger;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

/// Non-blank lines scanned for a name.
const NAME_SCAN_LINES: usize = 10;
/// Non-blank lines scanned for a location.
const LOCATION_SCAN_LINES: usize = 20;

static RE_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());

static RE_PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\+?[0-9]{1,3}[-.\s]?)?\(?[0-9]{1,4}\)?[-.\s]?[0-9]{1,4}[-.\s]?[0-9]{1,9}")
        .unwrap()
});

static RE_LINKEDIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(https?://)?(www\.)?linkedin\.com/(in|pub)/[\w\-/]+").unwrap()
});

static RE_NAME_REJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)resume|cv|curriculum|vitae|page|\d").unwrap());

static RE_DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{3,}").unwrap());

static RE_PLACE_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z .-]+$").unwrap());

/// Extract every contact field from the document text.
///
/// `tagger` is consulted only for a name or location the heuristics missed.
pub fn extract_contact(text: &str, tagger: Option<&dyn EntityTagger>) -> ContactRecord {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut contact = ContactRecord {
        name: find_name(&lines),
        email: find_email(text),
        phone: find_phone(text),
        linkedin: find_linkedin(text),
        location: find_location(&lines),
    };

    if let Some(tagger) = tagger {
        if contact.name.is_none() {
            let head = lines
                .iter()
                .take(NAME_SCAN_LINES)
                .copied()
                .collect::<Vec<_>>()
                .join("\n");
            contact.name = tagger
                .person_names(&head)
                .into_iter()
                .map(|n| n.trim().to_string())
                .find(|n| is_name_shaped(n));
            if contact.name.is_none() {
                warn!("Entity tagger returned no usable person name");
            }
        }
        if contact.location.is_none() {
            let head = lines
                .iter()
                .take(LOCATION_SCAN_LINES)
                .copied()
                .collect::<Vec<_>>()
                .join("\n");
            contact.location = tagger
                .places(&head)
                .into_iter()
                .map(|p| p.trim().to_string())
                .find(|p| is_place_shaped(p));
            if contact.location.is_none() {
                warn!("Entity tagger returned no usable place");
            }
        }
    }

    debug!(
        name = contact.name.is_some(),
        email = contact.email.is_some(),
        phone = contact.phone.is_some(),
        linkedin = contact.linkedin.is_some(),
        location = contact.location.is_some(),
        "contact fields"
    );
    contact
}

pub fn find_email(text: &str) -> Option<String> {
    RE_EMAIL.find(text).map(|m| m.as_str().to_string())
}

/// First phone-like run whose digit count is between 10 and 15.
pub fn find_phone(text: &str) -> Option<String> {
    RE_PHONE
        .find_iter(text)
        .find(|m| (10..=15).contains(&m.as_str().chars().filter(char::is_ascii_digit).count()))
        .map(|m| m.as_str().trim().to_string())
}

pub fn find_linkedin(text: &str) -> Option<String> {
    RE_LINKEDIN.find(text).map(|m| {
        let url = m.as_str();
        if url.to_lowercase().starts_with("http") {
            url.to_string()
        } else {
            format!("https://{url}")
        }
    })
}

fn find_name(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .take(NAME_SCAN_LINES)
        .find(|l| is_name_shaped(l))
        .map(|l| l.to_string())
}

/// 2–4 alphabetic words, 4–49 characters, no résumé boilerplate or digits.
pub fn is_name_shaped(line: &str) -> bool {
    if RE_NAME_REJECT.is_match(line) {
        return false;
    }
    let len = line.chars().count();
    if !(4..50).contains(&len) {
        return false;
    }
    let words: Vec<&str> = line.split_whitespace().collect();
    (2..=4).contains(&words.len())
        && words.iter().all(|w| {
            let stripped: String = w.chars().filter(|c| *c != '.' && *c != '-').collect();
            !stripped.is_empty() && stripped.chars().all(char::is_alphabetic)
        })
}

fn find_location(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .take(LOCATION_SCAN_LINES)
        .filter(|l| {
            let low = l.to_lowercase();
            !low.contains("http") && !low.contains('@')
        })
        .find(|l| l.contains(',') && is_place_shaped(l))
        .map(|l| l.to_string())
}

/// At most 60 chars, no 3+ digit run, 1–3 comma segments of letters,
/// spaces, dots or hyphens.
pub fn is_place_shaped(line: &str) -> bool {
    if line.chars().count() > 60 || RE_DIGIT_RUN.is_match(line) {
        return false;
    }
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    (1..=3).contains(&parts.len()) && parts.iter().all(|p| RE_PLACE_SEGMENT.is_match(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Jane Doe\njane.doe@example.com | +1 (555) 123-4567\nLahore, Pakistan\nlinkedin.com/in/janedoe";

    #[test]
    fn extracts_all_fields() {
        let c = extract_contact(HEADER, None);
        assert_eq!(c.name.as_deref(), Some("Jane Doe"));
        assert_eq!(c.email.as_deref(), Some("jane.doe@example.com"));
        assert_eq!(c.phone.as_deref(), Some("+1 (555) 123-4567"));
        assert_eq!(c.location.as_deref(), Some("Lahore, Pakistan"));
        assert_eq!(
            c.linkedin.as_deref(),
            Some("https://linkedin.com/in/janedoe")
        );
    }

    #[test]
    fn linkedin_keeps_existing_scheme() {
        assert_eq!(
            find_linkedin("see https://www.linkedin.com/in/jd-42/ now").as_deref(),
            Some("https://www.linkedin.com/in/jd-42/")
        );
    }

    #[test]
    fn short_digit_runs_are_not_phones() {
        assert_eq!(find_phone("Class of 2019, room 12"), None);
        assert_eq!(find_phone("call 0300-1234567"), Some("0300-1234567".into()));
    }

    #[test]
    fn name_rejects_boilerplate() {
        assert!(!is_name_shaped("Curriculum Vitae"));
        assert!(!is_name_shaped("Jane Doe 2"));
        assert!(!is_name_shaped("Jane"));
        assert!(!is_name_shaped("One Two Three Four Five"));
        assert!(is_name_shaped("Mary-Jane O. Watson"));
    }

    #[test]
    fn location_skips_urls_and_emails() {
        let text = "Jane Doe\nhttp://a.b, c\njane@x.io, Lahore\nAustin, Texas";
        assert_eq!(extract_contact(text, None).location.as_deref(), Some("Austin, Texas"));
    }

    struct Tagger;
    impl EntityTagger for Tagger {
        fn person_names(&self, _text: &str) -> Vec<String> {
            vec!["x1".into(), "Grace Hopper".into()]
        }
        fn places(&self, _text: &str) -> Vec<String> {
            vec!["Arlington".into()]
        }
    }

    #[test]
    fn tagger_fills_gaps_with_validated_candidates() {
        let c = extract_contact("grace@navy.mil\nEXPERIENCE", Some(&Tagger));
        assert_eq!(c.name.as_deref(), Some("Grace Hopper"));
        assert_eq!(c.location.as_deref(), Some("Arlington"));
    }

    #[test]
    fn tagger_not_consulted_when_heuristics_succeed() {
        let c = extract_contact(HEADER, Some(&Tagger));
        assert_eq!(c.name.as_deref(), Some("Jane Doe"));
        assert_eq!(c.location.as_deref(), Some("Lahore, Pakistan"));
    }
}
