//! Best-effort extraction of structured facts from loosely formatted entry text.
//!
//! An entry looks like:
//!
//! ```text
//! Directive 3000.09 on Autonomy in Weapon Systems (Jan 2023)
//! - Updates the 2012 directive https://www.esd.whs.mil/...
//! - Requires senior review before fielding
//! ```
//!
//! Every function here is total: malformed or missing patterns produce
//! `None` (or an empty list), never an error.

use chrono::Month;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use regex::Regex;

/// Trailing `(Month YYYY)` or `(YYYY)` on the title line.
static TRAILING_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([A-Z][a-z]+ [0-9]{4}|[0-9]{4})\)\s*$").unwrap());
static TRAILING_MONTH_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([A-Z][a-z]+ [0-9]{4}\)\s*$").unwrap());
static TRAILING_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([0-9]{4}\)\s*$").unwrap());

/// First date token anywhere in the text, used for bucketing.
static ANY_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([A-Z][a-z]+)?\s*([0-9]{4})\)").unwrap());
/// A bare date token as produced by [`extract_date`].
static DATE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:([A-Za-z]+)\s+)?([0-9]{4})\s*$").unwrap());

static URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://[^\s)]+").unwrap());
static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-\s*").unwrap());

/// Structured view of an entry's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedEntry {
    /// First line without its trailing date annotation.
    pub title: String,
    /// Content of the trailing date annotation, e.g. `"Jan 2023"` or `"2019"`.
    pub date: Option<String>,
    /// First URL found anywhere in the text.
    pub url: Option<String>,
    /// Remaining non-blank lines, bullets and URLs removed.
    pub details: Vec<String>,
}

/// Parse an entry into title, date, URL and detail paragraphs.
pub fn parse_entry(text: &str) -> ParsedEntry {
    ParsedEntry {
        title: title_without_date(text),
        date: extract_date(text),
        url: extract_url(text),
        details: parse_details(text),
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("").trim()
}

/// The first line, trimmed, date annotation included.
pub fn raw_title(text: &str) -> &str {
    first_line(text)
}

/// The first line with a trailing `(Month YYYY)` / `(YYYY)` removed.
pub fn title_without_date(text: &str) -> String {
    let title = first_line(text);
    let title = TRAILING_MONTH_YEAR.replace(title, "");
    let title = TRAILING_YEAR.replace(&title, "");
    title.trim().to_string()
}

/// Content of the date token closing the first line.
pub fn extract_date(text: &str) -> Option<String> {
    TRAILING_DATE
        .captures(first_line(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// First `http(s)://` token, with trailing `.,;:` trimmed.
pub fn extract_url(text: &str) -> Option<String> {
    URL.find(text)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':']).to_string())
        .filter(|url| !url.is_empty())
}

/// Every line after the title as a cleaned paragraph.
pub fn parse_details(text: &str) -> Vec<String> {
    text.lines()
        .skip(1)
        .filter_map(|line| {
            let line = line.trim();
            let line = BULLET.replace(line, "");
            let cleaned = URL.replace_all(line.trim(), "");
            let cleaned = cleaned.trim();
            (!cleaned.is_empty()).then(|| cleaned.to_string())
        })
        .collect()
}

/// Lines after the title joined with spaces (export description).
pub fn description(text: &str) -> String {
    text.lines()
        .skip(1)
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Year and (optionally) month of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryDate {
    pub year: i32,
    /// 1-12, `None` when the token has no (recognised) month.
    pub month: Option<u32>,
}

impl EntryDate {
    pub fn new(year: i32, month: Option<u32>) -> Self {
        Self {
            year,
            month: month.filter(|m| (1..=12).contains(m)),
        }
    }

    /// Calendar quarter 1-4. A date without a month falls in Q4.
    pub fn quarter(&self) -> u32 {
        self.month.map_or(4, |m| (m - 1) / 3 + 1)
    }

    /// Parse a date token such as `"Mar 2021"`, `"September 2019"` or `"2020"`.
    pub fn parse_token(token: &str) -> Option<EntryDate> {
        let caps = DATE_TOKEN.captures(token)?;
        let year: i32 = caps.get(2)?.as_str().parse().ok()?;
        let month = caps.get(1).and_then(|m| month_number(m.as_str()));
        Some(EntryDate::new(year, month))
    }

    /// First `(Month YYYY)` / `(YYYY)` token anywhere in an entry's text.
    pub fn from_entry_text(text: &str) -> Option<EntryDate> {
        let caps = ANY_DATE.captures(text)?;
        let year: i32 = caps.get(2)?.as_str().parse().ok()?;
        let month = caps.get(1).and_then(|m| month_number(m.as_str()));
        Some(EntryDate::new(year, month))
    }
}

/// Month number for a full or three-letter month name.
fn month_number(name: &str) -> Option<u32> {
    name.parse::<Month>().ok().map(|m| m.number_from_month())
}
