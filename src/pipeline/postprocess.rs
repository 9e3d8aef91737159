//! Post-processing: deterministic repair of heuristic extraction output.
//!
//! The field extractors err on the side of capturing too much: a languages
//! line drags in URLs, a wrapped sentence becomes a "project", a job title
//! still carries its date range. Each rule below is a total function that
//! takes extracted values and returns cleaned ones without looking at any
//! other field, so rules can be tested and reordered independently.
//!
//! ## Rules
//!
//! 1. [`clean_languages`]: keep only human languages from the languages section
//! 2. [`clean_projects`]: drop pseudo-projects and tidy descriptions
//! 3. [`merge_project_fragments`]: fold wrapped title fragments into the
//!    previous project
//! 4. [`normalize_experiences`]: split/trim titles and companies, clean
//!    descriptions, drop entries without enough information
//! 5. [`improve_location`]: re-infer a location from the whole document
//! 6. [`certifications_from_text`]: fallback when no certifications section
//!    exists

use crate::output::{ExperienceEntry, ProjectEntry};
use crate::vocabulary::{
    is_known_city, is_known_place, is_language, title_case, ACTION_VERBS, PROJECT_SKILL_TOKENS,
};
use once_cell::sync::Lazy;
use regex::Regex;

// ── Rule 1: Language filter ──────────────────────────────────────────────────

static RE_LANGUAGE_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[|,/;:]+").unwrap());
static RE_PARENTHETICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]*\)?").unwrap());
static RE_PROFICIENCY_TAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+[-–—]\s+.*$").unwrap());

/// Keep tokens that name a human language, title-cased and deduplicated in
/// first-seen order. Applying it to its own output changes nothing.
pub fn clean_languages<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for line in raw {
        let low = line.as_ref().trim().to_lowercase();
        if low.contains("http") || low.contains("linkedin") || low.contains('@') {
            continue;
        }
        for token in RE_LANGUAGE_SPLIT.split(&low) {
            let token = RE_PARENTHETICAL.replace_all(token, "");
            let token = RE_PROFICIENCY_TAIL.replace(&token, "");
            let token = token.trim();
            if is_language(token) {
                let titled = title_case(token);
                if !cleaned.contains(&titled) {
                    cleaned.push(titled);
                }
            }
        }
    }
    cleaned
}

// ── Rule 2: Project cleanup ──────────────────────────────────────────────────

static RE_WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

fn is_skill_token(name_lower: &str) -> bool {
    PROJECT_SKILL_TOKENS.contains(&name_lower)
        || PROJECT_SKILL_TOKENS.contains(&name_lower.trim_end_matches('.'))
}

/// Drop pseudo-projects (skills lines, certification labels, bare technology
/// names, tiny fragments) and normalise description whitespace.
pub fn clean_projects(projects: Vec<ProjectEntry>) -> Vec<ProjectEntry> {
    projects
        .into_iter()
        .filter_map(|p| {
            let name = p.name.trim().to_string();
            if name.is_empty() {
                return None;
            }
            let name_lower = name.to_lowercase();
            if name_lower.starts_with("skills")
                || name_lower == "certification"
                || name_lower == "certifications"
            {
                return None;
            }
            let has_description = p.description.as_deref().is_some_and(|d| !d.trim().is_empty());
            if name.chars().count() <= 3 && !has_description {
                return None;
            }
            if is_skill_token(&name_lower) && !has_description {
                return None;
            }
            let description = p
                .description
                .map(|d| RE_WHITESPACE_RUN.replace_all(d.trim(), " ").into_owned())
                .filter(|d| !d.is_empty() && !d.to_lowercase().starts_with("skills:"));
            Some(ProjectEntry { name, description })
        })
        .collect()
}

// ── Rule 3: Fragment merge ───────────────────────────────────────────────────

fn is_fragment(p: &ProjectEntry) -> bool {
    let name = p.name.trim();
    let no_description = p.description.as_deref().map_or(true, |d| d.trim().is_empty());
    no_description
        && (name.to_lowercase().starts_with("the ")
            || name.chars().next().is_some_and(char::is_lowercase)
            || name.split_whitespace().count() <= 4)
}

/// Append description-less fragment entries to the previous entry's
/// description. The first entry is never merged away, and the rule is
/// idempotent.
pub fn merge_project_fragments(projects: Vec<ProjectEntry>) -> Vec<ProjectEntry> {
    let mut merged: Vec<ProjectEntry> = Vec::with_capacity(projects.len());
    for p in projects {
        match merged.last_mut() {
            Some(prev) if is_fragment(&p) => {
                let name = p.name.trim();
                prev.description = Some(match prev.description.take() {
                    Some(d) if !d.trim().is_empty() => format!("{} {}", d, name).trim().to_string(),
                    _ => name.to_string(),
                });
            }
            _ => merged.push(p),
        }
    }
    merged
}

// ── Rule 4: Experience normalisation ─────────────────────────────────────────

const MAX_FIELD_CHARS: usize = 120;
const MAX_COMPANY_WORDS: usize = 8;

static RE_SLASH_DATE_TAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{1,2}/\d{4}\b.*$").unwrap());
static RE_YEAR_RANGE_TAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d{4}\s*[-–—]\s*(?:\d{4}|present|current)\b.*$").unwrap()
});
static RE_AT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s+at\s+").unwrap());
static RE_PLACE_TAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r",\s*([A-Za-z .-]{2,}),\s*([A-Za-z .-]{2,})$").unwrap()
});

fn strip_date_remnants(s: &str) -> String {
    let s = RE_SLASH_DATE_TAIL.replace(s, "");
    let s = RE_YEAR_RANGE_TAIL.replace(&s, "");
    s.trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '–' | '—'))
        .to_string()
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    s.chars().take(max).collect::<String>().trim_end().to_string()
}

/// Remove a trailing `", <city>, <country>"` when either part is a known place.
fn strip_place_tail(line: &str) -> String {
    if let Some(caps) = RE_PLACE_TAIL.captures(line) {
        let known = [1, 2].iter().any(|&i| {
            caps.get(i)
                .is_some_and(|m| is_known_place(&m.as_str().trim().to_lowercase()))
        });
        if known {
            if let Some(m) = caps.get(0) {
                return line[..m.start()].trim().to_string();
            }
        }
    }
    line.to_string()
}

fn reads_like_sentence(company: &str) -> bool {
    let words: Vec<String> = company
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .collect();
    words.len() > MAX_COMPANY_WORDS || words.iter().any(|w| ACTION_VERBS.contains(&w.as_str()))
}

fn opt(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

/// Normalise one entry's fields. Retention is decided by the caller.
fn normalize_experience(entry: ExperienceEntry) -> ExperienceEntry {
    let mut title = strip_date_remnants(entry.title.as_deref().unwrap_or(""));
    let mut company = strip_date_remnants(entry.company.as_deref().unwrap_or(""));

    if company.is_empty() {
        let parts: Vec<String> = RE_AT
            .splitn(&title, 2)
            .map(|p| p.trim().to_string())
            .collect();
        if let [left, right] = parts.as_slice() {
            if !right.is_empty() {
                company = right.clone();
                title = left.clone();
            }
        }
    }

    if company.is_empty() {
        if let Some((left, right)) = title.split_once(',') {
            let right_len = right.trim().chars().count();
            if (2..=MAX_FIELD_CHARS).contains(&right_len) {
                let (l, r) = (left.trim().to_string(), right.trim().to_string());
                title = l;
                company = r;
            }
        }
    }

    if let Some((head, tail)) = title.split_once(',') {
        if head.split_whitespace().next().is_some() && tail.split_whitespace().next().is_some() {
            title = head.trim().to_string();
        }
    }

    // A demoted company goes through the same line cleaning as the description.
    let demoted = (!company.is_empty() && reads_like_sentence(&company))
        .then(|| std::mem::take(&mut company));

    let title = truncate_chars(&title, MAX_FIELD_CHARS);
    let company = truncate_chars(&company, MAX_FIELD_CHARS);

    let description: Vec<String> = entry
        .description
        .iter()
        .chain(demoted.iter())
        .map(|d| d.trim())
        .filter(|d| !d.is_empty() && !d.to_lowercase().starts_with("skills:"))
        .map(strip_place_tail)
        .filter(|d| !d.is_empty())
        .collect();

    ExperienceEntry {
        title: opt(title),
        company: opt(company),
        duration: entry.duration.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()),
        description,
    }
}

/// Normalise every entry and keep those that name a role or employer plus at
/// least one more field.
pub fn normalize_experiences(entries: Vec<ExperienceEntry>) -> Vec<ExperienceEntry> {
    entries
        .into_iter()
        .map(normalize_experience)
        .filter(ExperienceEntry::is_retainable)
        .collect()
}

// ── Rule 5: Location re-inference ────────────────────────────────────────────

const LOCATION_RESCAN_LINES: usize = 80;

static RE_LOCATION_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z .-]+(?:,\s*[A-Za-z .-]+){0,2}$").unwrap());
static RE_PLACE_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z .-]{2,}?,\s*[A-Za-z .-]{2,})").unwrap());
static RE_LEADING_CONNECTOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:and|in|at|from)\s+").unwrap());

/// Keep a well-formed location; otherwise look for `<place>, <place>` with a
/// known city or region, then a line that is just a known city.
pub fn improve_location(lines: &[&str], current: Option<String>) -> Option<String> {
    if let Some(loc) = current.as_deref() {
        if RE_LOCATION_SHAPE.is_match(loc) {
            return current;
        }
    }

    let head = || lines.iter().take(LOCATION_RESCAN_LINES).map(|l| l.trim());

    for line in head() {
        let low = line.to_lowercase();
        if low.contains("http") || low.contains('@') {
            continue;
        }
        for m in RE_PLACE_PAIR.find_iter(line) {
            let candidate = m.as_str().trim_matches(|c: char| matches!(c, ' ' | '.' | '-'));
            let candidate = RE_LEADING_CONNECTOR.replace(candidate, "");
            let tokens: Vec<&str> = candidate
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect();
            if tokens.iter().any(|t| is_known_place(&t.to_lowercase())) {
                return Some(tokens.join(", "));
            }
        }
    }

    head()
        .find(|l| is_known_city(&l.to_lowercase()))
        .map(str::to_string)
        .or(current)
}

// ── Rule 6: Certification fallback ───────────────────────────────────────────

static RE_CERT_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)certification|certificate").unwrap());
static RE_CERT_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:certifications|certification|certificates|certificate)[:\-\s]*").unwrap()
});

/// Unique lines mentioning a certification, with a leading label removed.
pub fn certifications_from_text(text: &str) -> Vec<String> {
    let mut certs: Vec<String> = Vec::new();
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if !RE_CERT_MENTION.is_match(line) {
            continue;
        }
        let clean = RE_CERT_LABEL.replace(line, "").trim().to_string();
        if !clean.is_empty() && !certs.contains(&clean) {
            certs.push(clean);
        }
    }
    certs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str, description: Option<&str>) -> ProjectEntry {
        ProjectEntry {
            name: name.into(),
            description: description.map(Into::into),
        }
    }

    #[test]
    fn test_clean_languages() {
        let raw = [
            "English (Native), Urdu - fluent",
            "https://linkedin.com/in/jane",
            "Skills: english | FRENCH / python",
        ];
        assert_eq!(clean_languages(&raw), vec!["English", "Urdu", "French"]);
    }

    #[test]
    fn test_clean_languages_idempotent() {
        let once = clean_languages(&["Arabic; German: spanish"]);
        assert_eq!(clean_languages(&once), once);
    }

    #[test]
    fn test_clean_projects_drops_noise() {
        let cleaned = clean_projects(vec![
            project("Skills: Python, Django", None),
            project("Certifications", Some("AWS")),
            project("ML", None),
            project("Django", None),
            project("Django", Some("  templates   and   views ")),
            project("Billing Platform", Some("Skills: Rust")),
        ]);
        assert_eq!(
            cleaned,
            vec![
                project("Django", Some("templates and views")),
                project("Billing Platform", None),
            ]
        );
    }

    #[test]
    fn test_merge_fragments() {
        let merged = merge_project_fragments(vec![
            project("Inventory Management System", Some("Tracks stock.")),
            project("and reorders automatically", None),
            project("Realtime Chat Application For Teams", Some("WebSockets")),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(
            merged[0].description.as_deref(),
            Some("Tracks stock. and reorders automatically")
        );
    }

    #[test]
    fn test_merge_never_drops_first() {
        let merged = merge_project_fragments(vec![project("the intro", None), project("tail", None)]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "the intro");
        assert_eq!(merged[0].description.as_deref(), Some("tail"));
    }

    #[test]
    fn test_merge_idempotent() {
        let input = vec![
            project("Payments Gateway", None),
            project("the retries", None),
            project("A Long Distributed Cache Project", None),
            project("with TTLs", None),
        ];
        let once = merge_project_fragments(input);
        assert_eq!(merge_project_fragments(once.clone()), once);
    }

    fn exp(title: Option<&str>, company: Option<&str>, duration: Option<&str>, desc: &[&str]) -> ExperienceEntry {
        ExperienceEntry {
            title: title.map(Into::into),
            company: company.map(Into::into),
            duration: duration.map(Into::into),
            description: desc.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_normalize_splits_at() {
        let out = normalize_experiences(vec![exp(Some("Engineer at Acme 2019 - 2021"), None, Some("2019 - 2021"), &[])]);
        assert_eq!(out[0].title.as_deref(), Some("Engineer"));
        assert_eq!(out[0].company.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_normalize_splits_role_comma_company() {
        let out = normalize_experiences(vec![exp(Some("Developer, Initech 01/2020"), None, None, &["x"])]);
        assert_eq!(out[0].title.as_deref(), Some("Developer"));
        assert_eq!(out[0].company.as_deref(), Some("Initech"));
    }

    #[test]
    fn test_normalize_demotes_sentence_company() {
        let out = normalize_experiences(vec![exp(
            Some("Engineer"),
            Some("Developed internal tools for finance"),
            Some("2020 - 2021"),
            &[],
        )]);
        assert!(out[0].company.is_none());
        assert_eq!(out[0].description, vec!["Developed internal tools for finance"]);
    }

    #[test]
    fn test_normalize_demoted_company_loses_place_tail() {
        let once = normalize_experiences(vec![exp(
            Some("Engineer"),
            Some("Developed billing tools, Lahore, Pakistan"),
            Some("2020 - 2021"),
            &["Ran payroll"],
        )]);
        assert!(once[0].company.is_none());
        assert_eq!(once[0].description, vec!["Ran payroll", "Developed billing tools"]);
        assert_eq!(normalize_experiences(once.clone()), once);
    }

    #[test]
    fn test_normalize_keeps_ledger_company() {
        let out = normalize_experiences(vec![exp(Some("Engineer"), Some("Ledger Labs"), None, &[])]);
        assert_eq!(out[0].company.as_deref(), Some("Ledger Labs"));
    }

    #[test]
    fn test_normalize_cleans_descriptions() {
        let out = normalize_experiences(vec![exp(
            Some("Engineer"),
            Some("Acme"),
            None,
            &["Skills: Rust", "Built APIs, Lahore, Pakistan", "Met users, halfway, there", "  "],
        )]);
        assert_eq!(out[0].description, vec!["Built APIs", "Met users, halfway, there"]);
    }

    #[test]
    fn test_normalize_drops_unretainable() {
        let out = normalize_experiences(vec![
            exp(Some("Engineer"), None, None, &[]),
            exp(None, None, Some("2020 - 2021"), &["stray"]),
        ]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_normalize_truncates() {
        let long = "Engineer ".repeat(30);
        let out = normalize_experiences(vec![exp(Some(&long), None, Some("2020"), &[])]);
        assert!(out[0].title.as_ref().unwrap().chars().count() <= MAX_FIELD_CHARS);
    }

    #[test]
    fn test_improve_location_keeps_good_value() {
        assert_eq!(
            improve_location(&["Berlin, Germany"], Some("Austin, Texas".into())).as_deref(),
            Some("Austin, Texas")
        );
    }

    #[test]
    fn test_improve_location_scans_for_known_place() {
        let lines = ["Jane Doe", "in Lahore, Pakistan | +92 300 1234567"];
        assert_eq!(
            improve_location(&lines, Some("123 Main St, #4".into())).as_deref(),
            Some("Lahore, Pakistan")
        );
    }

    #[test]
    fn test_improve_location_city_line_fallback() {
        assert_eq!(
            improve_location(&["Jane Doe", "Dubai"], None).as_deref(),
            Some("Dubai")
        );
        assert_eq!(improve_location(&["Jane Doe"], None), None);
    }

    #[test]
    fn test_certifications_fallback() {
        let text = "Certification: AWS Solutions Architect\nCertifications\nScrum certificate holder\nCertification: AWS Solutions Architect";
        assert_eq!(
            certifications_from_text(text),
            vec!["AWS Solutions Architect", "Scrum certificate holder"]
        );
    }
}
