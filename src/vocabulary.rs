//! Static vocabularies consulted by the extraction passes.
//!
//! Every table lives here so the heuristics in [`crate::pipeline`] stay
//! focused on *how* lines are classified, and a vocabulary change touches
//! exactly one file. All tables are plain `&'static` slices, lower-case,
//! read-only for the life of the process and safe to share between batch
//! workers.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Technical terms recognised by the skills extractor.
pub const TECHNICAL_SKILLS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "typescript",
    "c++",
    "c#",
    "rust",
    "html",
    "css",
    "sql",
    "react",
    "angular",
    "vue",
    "node.js",
    "django",
    "flask",
    "spring",
    "fastapi",
    "graphql",
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "terraform",
    "linux",
    "git",
    "github",
    "gitlab",
    "jenkins",
    "mysql",
    "postgresql",
    "mongodb",
    "redis",
    "elasticsearch",
    "kafka",
    "rabbitmq",
    "tensorflow",
    "pytorch",
    "pandas",
    "numpy",
    "scikit-learn",
    "machine learning",
    "data science",
    "artificial intelligence",
    "celery",
    "pytest",
    "rest api",
    "oauth",
    "api integration",
    "saas",
];

/// Bare technology names that show up as pseudo-project titles.
pub const PROJECT_SKILL_TOKENS: &[&str] = &[
    "python",
    "django",
    "fastapi",
    "flask",
    "ml",
    "machine learning",
    "html",
    "css",
    "javascript",
    "back-end web development",
    "backend",
    "database",
    "databases",
    "django templates",
    "pytest",
];

pub const KNOWN_CITIES: &[&str] = &[
    "karachi",
    "lahore",
    "islamabad",
    "bahawalpur",
    "rawalpindi",
    "multan",
    "peshawar",
    "dubai",
    "abu dhabi",
    "riyadh",
    "jeddah",
    "doha",
    "london",
    "manchester",
    "new york",
    "san francisco",
    "seattle",
    "boston",
    "chicago",
    "austin",
    "toronto",
    "berlin",
    "munich",
    "paris",
    "madrid",
    "rome",
    "amsterdam",
    "delhi",
    "mumbai",
    "bangalore",
    "chennai",
    "singapore",
    "sydney",
];

pub const KNOWN_REGIONS: &[&str] = &[
    "pakistan",
    "india",
    "uae",
    "saudi arabia",
    "qatar",
    "united states",
    "usa",
    "uk",
    "united kingdom",
    "canada",
    "germany",
    "france",
    "spain",
    "italy",
    "netherlands",
    "australia",
    "california",
    "texas",
    "washington",
];

/// Human languages accepted in the `languages` list.
pub const LANGUAGES: &[&str] = &[
    "english",
    "urdu",
    "hindi",
    "arabic",
    "french",
    "german",
    "spanish",
    "chinese",
    "mandarin",
    "cantonese",
    "punjabi",
    "sindhi",
    "pashto",
    "balochi",
    "bengali",
    "turkish",
    "russian",
    "italian",
    "japanese",
    "korean",
    "portuguese",
    "dutch",
    "persian",
    "farsi",
    "tamil",
    "telugu",
    "marathi",
    "gujarati",
    "malay",
    "indonesian",
    "vietnamese",
    "thai",
    "polish",
    "greek",
    "hebrew",
    "swedish",
    "norwegian",
    "danish",
    "finnish",
    "swahili",
];

/// Words that mark a line as a job title when no dated pattern matched.
pub const JOB_TITLE_KEYWORDS: &[&str] = &[
    "developer",
    "engineer",
    "manager",
    "analyst",
    "specialist",
    "consultant",
    "director",
    "lead",
    "architect",
    "designer",
    "administrator",
    "scientist",
];

/// Verbs that make a "company" value read like a sentence.
pub const ACTION_VERBS: &[&str] = &[
    "developed",
    "designed",
    "implemented",
    "maintained",
    "built",
    "worked",
    "led",
    "optimized",
    "created",
    "managed",
];

/// Substrings that make a line a likely project title.
pub const PROJECT_INDICATORS: &[&str] = &[
    "project",
    "ecommerce",
    "website",
    "application",
    "system",
    "platform",
    "dashboard",
    "api",
    "mobile",
    "web",
];

/// Words that disqualify a short capitalised line from being a project title.
pub const TITLE_STOPWORDS: &[&str] = &["the", "and", "with", "for", "using"];

/// Section names that occasionally leak into the experience bucket as bare lines.
pub const LEAKED_SECTION_TOKENS: &[&str] = &[
    "summary",
    "skills",
    "projects",
    "education",
    "certifications",
    "achievements",
    "languages",
];

/// Glyphs that open a bullet line.
pub const BULLET_GLYPHS: &[char] = &['•', '·', '-', '*', '▪', '◦', '●', '–'];

static PLACES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    KNOWN_CITIES
        .iter()
        .chain(KNOWN_REGIONS.iter())
        .copied()
        .collect()
});

static CITIES: Lazy<HashSet<&'static str>> = Lazy::new(|| KNOWN_CITIES.iter().copied().collect());

static LANGUAGE_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| LANGUAGES.iter().copied().collect());

/// `true` when the (already lower-cased, trimmed) token is a known city or region.
pub fn is_known_place(token: &str) -> bool {
    PLACES.contains(token)
}

pub fn is_known_city(token: &str) -> bool {
    CITIES.contains(token)
}

pub fn is_language(token: &str) -> bool {
    LANGUAGE_SET.contains(token)
}

/// `true` when the trimmed line starts with a bullet glyph.
pub fn starts_with_bullet(line: &str) -> bool {
    line.trim_start().starts_with(BULLET_GLYPHS)
}

/// `true` when the trimmed line is nothing but a bullet glyph.
pub fn is_lone_bullet(line: &str) -> bool {
    let t = line.trim();
    let mut chars = t.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if BULLET_GLYPHS.contains(&c))
}

/// Remove one leading bullet glyph and the whitespace after it.
pub fn strip_bullet(line: &str) -> &str {
    let t = line.trim_start();
    t.strip_prefix(BULLET_GLYPHS).unwrap_or(t).trim_start()
}

/// Title-case a phrase: upper-case every letter that follows a non-letter,
/// lower-case the rest (`"node.js"` → `"Node.Js"`, `"c++"` → `"C++"`).
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_matches_word_boundaries() {
        assert_eq!(title_case("machine learning"), "Machine Learning");
        assert_eq!(title_case("node.js"), "Node.Js");
        assert_eq!(title_case("c++"), "C++");
        assert_eq!(title_case("ENGLISH"), "English");
    }

    #[test]
    fn bullets() {
        assert!(starts_with_bullet("• Built APIs"));
        assert!(starts_with_bullet("  - Built APIs"));
        assert!(!starts_with_bullet("Built APIs"));
        assert!(is_lone_bullet(" • "));
        assert!(!is_lone_bullet("• x"));
        assert_eq!(strip_bullet("•   Built APIs"), "Built APIs");
        assert_eq!(strip_bullet("Built APIs"), "Built APIs");
    }

    #[test]
    fn vocabularies_are_lower_case() {
        for table in [
            TECHNICAL_SKILLS,
            KNOWN_CITIES,
            KNOWN_REGIONS,
            LANGUAGES,
            JOB_TITLE_KEYWORDS,
        ] {
            for term in table {
                assert_eq!(*term, term.to_lowercase(), "{term} must be lower-case");
            }
        }
    }

    #[test]
    fn place_lookup() {
        assert!(is_known_place("lahore"));
        assert!(is_known_place("pakistan"));
        assert!(is_known_city("london"));
        assert!(!is_known_city("pakistan"));
        assert!(is_language("french"));
        assert!(!is_language("python"));
    }
}
