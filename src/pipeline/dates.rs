//! Date parsing for experience durations and total years of experience.
//!
//! Durations are free text (`"01/2020 - Present"`, `"Mar 2018 to Jun 2019"`,
//! `"2019-2021"`). Month-only forms resolve to the first of the month and
//! year-only forms to January 1st. Words meaning "ongoing" resolve to the
//! reference date supplied by the caller.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// The whole side must be the ongoing word, or `"2019-Present"` would read as today.
static RE_ONGOING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:(?:till|to|up\s+to)\s+)?(?:present|current|now|date|ongoing)$").unwrap()
});

/// Range separators surrounded by whitespace: `" - "`, `" – "`, `" to "`.
static RE_SPACED_SEP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+(?:[-–—]+|to)\s+").unwrap());

/// Unspaced separators that can't occur inside a numeric date.
static RE_TIGHT_SEP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s*[–—]+\s*|\bto\b").unwrap());

static RE_MDY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").unwrap());
static RE_ISO: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").unwrap());
static RE_MONTH_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,2})[/.-](\d{4})$").unwrap());
static RE_YEAR_MONTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})[/-](\d{1,2})$").unwrap());
static RE_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})$").unwrap());
static RE_NAMED_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z]{3,9})\.?,?\s*(?:(\d{1,2}),?\s+)?(\d{4})$").unwrap()
});

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

fn month_number(name: &str) -> Option<u32> {
    let low = name.to_lowercase();
    let prefix = low.get(..3)?;
    MONTHS
        .iter()
        .position(|m| *m == prefix)
        .map(|i| i as u32 + 1)
}

fn num<T: std::str::FromStr>(caps: &regex::Captures<'_>, i: usize) -> Option<T> {
    caps.get(i)?.as_str().parse().ok()
}

/// Parse one side of a duration. Ongoing words resolve to `today`.
pub fn parse_date(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = raw.trim().trim_matches(|c: char| c == ',' || c == '.' || c == '(' || c == ')');
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if RE_ONGOING.is_match(s) {
        return Some(today);
    }
    if let Some(c) = RE_MDY.captures(s) {
        return NaiveDate::from_ymd_opt(num(&c, 3)?, num(&c, 1)?, num(&c, 2)?);
    }
    if let Some(c) = RE_ISO.captures(s) {
        return NaiveDate::from_ymd_opt(num(&c, 1)?, num(&c, 2)?, num(&c, 3)?);
    }
    if let Some(c) = RE_MONTH_YEAR.captures(s) {
        return NaiveDate::from_ymd_opt(num(&c, 2)?, num(&c, 1)?, 1);
    }
    if let Some(c) = RE_YEAR_MONTH.captures(s) {
        return NaiveDate::from_ymd_opt(num(&c, 1)?, num(&c, 2)?, 1);
    }
    if let Some(c) = RE_YEAR.captures(s) {
        return NaiveDate::from_ymd_opt(num(&c, 1)?, 1, 1);
    }
    if let Some(c) = RE_NAMED_MONTH.captures(s) {
        let month = month_number(c.get(1)?.as_str())?;
        let day = c.get(2).map_or(Some(1), |d| d.as_str().parse().ok())?;
        return NaiveDate::from_ymd_opt(num(&c, 3)?, month, day);
    }
    None
}

/// Split a duration into (start, end) text.
///
/// Spaced separators win. Without them, en/em dashes and "to" split.
/// A bare hyphen is ambiguous with `MM-YYYY`/`YYYY-MM`, so a hyphenated
/// string is first tried as a single date and otherwise split at the first
/// hyphen whose left side parses.
pub fn split_duration(duration: &str, today: NaiveDate) -> (String, Option<String>) {
    let d = duration.trim();
    for re in [&*RE_SPACED_SEP, &*RE_TIGHT_SEP] {
        let parts: Vec<&str> = re
            .split(d)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.len() >= 2 {
            return (parts[0].to_string(), Some(parts[1].to_string()));
        }
    }

    if parse_date(d, today).is_some() {
        return (d.to_string(), None);
    }

    let mut fallback = None;
    for (i, _) in d.match_indices('-') {
        let (left, right) = (d[..i].trim(), d[i + 1..].trim());
        if parse_date(left, today).is_none() {
            continue;
        }
        if parse_date(right, today).is_some() {
            return (left.to_string(), Some(right.to_string()));
        }
        fallback.get_or_insert((left.to_string(), Some(right.to_string())));
    }
    fallback.unwrap_or_else(|| (d.to_string(), None))
}

/// Start and end of one duration. A missing or unparseable end is `today`.
/// `None` when the start cannot be parsed.
pub fn duration_span(duration: &str, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let (start, end) = split_duration(duration, today);
    let start = parse_date(&start, today)?;
    let end = end
        .as_deref()
        .and_then(|e| parse_date(e, today))
        .unwrap_or(today);
    Some((start, end))
}

/// Union span in years from the earliest start to the latest end, rounded to
/// two decimals. `None` when nothing parses or the span is not positive.
pub fn years_of_experience<'a, I>(durations: I, today: NaiveDate) -> Option<f64>
where
    I: IntoIterator<Item = &'a str>,
{
    let (start, end) = durations
        .into_iter()
        .filter_map(|d| duration_span(d, today))
        .fold(None, |acc: Option<(NaiveDate, NaiveDate)>, (s, e)| {
            Some(match acc {
                None => (s, e),
                Some((s0, e0)) => (s0.min(s), e0.max(e)),
            })
        })?;
    if end <= start {
        return None;
    }
    let years = (end - start).num_days() as f64 / 365.25;
    Some((years * 100.0).round() / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn ref_day() -> NaiveDate {
        d(2024, 1, 1)
    }

    #[test]
    fn parses_supported_forms() {
        let t = ref_day();
        assert_eq!(parse_date("01/2020", t), Some(d(2020, 1, 1)));
        assert_eq!(parse_date("03-2021", t), Some(d(2021, 3, 1)));
        assert_eq!(parse_date("2021-03", t), Some(d(2021, 3, 1)));
        assert_eq!(parse_date("2019", t), Some(d(2019, 1, 1)));
        assert_eq!(parse_date("Mar 2018", t), Some(d(2018, 3, 1)));
        assert_eq!(parse_date("September 2017", t), Some(d(2017, 9, 1)));
        assert_eq!(parse_date("Sept. 2017", t), Some(d(2017, 9, 1)));
        assert_eq!(parse_date("12/25/2020", t), Some(d(2020, 12, 25)));
        assert_eq!(parse_date("2020-12-25", t), Some(d(2020, 12, 25)));
        assert_eq!(parse_date("Present", t), Some(t));
        assert_eq!(parse_date("Current", t), Some(t));
        assert_eq!(parse_date("someday", t), None);
        assert_eq!(parse_date("13/2020", t), None);
    }

    #[test]
    fn splits_on_dashes_and_to() {
        let t = ref_day();
        assert_eq!(
            split_duration("01/2020 - Present", t),
            ("01/2020".into(), Some("Present".into()))
        );
        assert_eq!(
            split_duration("Mar 2018 to Jun 2019", t),
            ("Mar 2018".into(), Some("Jun 2019".into()))
        );
        assert_eq!(
            split_duration("2019–2021", t),
            ("2019".into(), Some("2021".into()))
        );
        assert_eq!(
            split_duration("2019-2021", t),
            ("2019".into(), Some("2021".into()))
        );
        assert_eq!(split_duration("2021-03", t), ("2021-03".into(), None));
        assert_eq!(
            split_duration("01-2020-Present", t),
            ("01-2020".into(), Some("Present".into()))
        );
    }

    #[test]
    fn tight_hyphen_before_ongoing_word_keeps_start() {
        let t = ref_day();
        assert_eq!(parse_date("2019-Present", t), None);
        assert_eq!(parse_date("Till Date", t), Some(t));
        assert_eq!(
            split_duration("2019-Present", t),
            ("2019".into(), Some("Present".into()))
        );
        assert_eq!(
            duration_span("01/2020-Present", t),
            Some((d(2020, 1, 1), t))
        );

        let years = years_of_experience(["2019-Present"], t).unwrap();
        assert!((years - 5.0).abs() < 0.01, "got {years}");
        let years = years_of_experience(["01/2020-Present"], t).unwrap();
        assert!((years - 4.0).abs() < 0.01, "got {years}");
    }

    #[test]
    fn union_span_not_sum() {
        let years = years_of_experience(["2019 - 2020", "2021 - Present"], ref_day()).unwrap();
        assert!((years - 5.0).abs() < 0.01, "got {years}");
    }

    #[test]
    fn unparseable_end_means_today() {
        let years = years_of_experience(["2023 - ???"], ref_day()).unwrap();
        assert!((years - 1.0).abs() < 0.01, "got {years}");
    }

    #[test]
    fn nothing_parseable_is_none() {
        assert_eq!(years_of_experience(["soon"], ref_day()), None);
        assert_eq!(years_of_experience(std::iter::empty(), ref_day()), None);
    }

    #[test]
    fn start_after_today_is_none() {
        assert_eq!(years_of_experience(["2030 - 2031"], ref_day()).map(|y| y > 0.0), Some(true));
        assert_eq!(years_of_experience(["2030"], ref_day()), None);
    }
}
