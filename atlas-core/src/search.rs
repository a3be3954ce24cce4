//! Keyword search over entry text and country lookup by name.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::{CountryProfile, PolicyArea};
use crate::names::NameRegistry;

/// Shortest keyword accepted, in characters after trimming.
pub const MIN_KEYWORD_CHARS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("keyword must be at least {min} characters, got {len}")]
    KeywordTooShort { len: usize, min: usize },
}

/// One entry matching a keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordHit {
    pub area: PolicyArea,
    /// `Legal`, `Policy` or `Statement`.
    pub source: &'static str,
    pub text: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordResults {
    /// The normalized (trimmed, lower-cased) keyword.
    pub keyword: String,
    pub total: usize,
    /// Countries with at least one hit, in key order.
    pub countries: BTreeMap<String, Vec<KeywordHit>>,
}

/// Case-insensitive substring search over the six fixed areas of every country.
pub fn keyword_search(
    countries: &BTreeMap<String, CountryProfile>,
    keyword: &str,
) -> Result<KeywordResults, SearchError> {
    let keyword = keyword.trim().to_lowercase();
    let len = keyword.chars().count();
    if len < MIN_KEYWORD_CHARS {
        return Err(SearchError::KeywordTooShort {
            len,
            min: MIN_KEYWORD_CHARS,
        });
    }

    let mut results = BTreeMap::new();
    let mut total = 0;
    for (country, profile) in countries {
        let hits: Vec<KeywordHit> = profile
            .tracked_entries()
            .filter(|(_, _, entry)| entry.text.to_lowercase().contains(&keyword))
            .map(|(area, source, entry)| KeywordHit {
                area,
                source: source.short_label(),
                text: entry.text.clone(),
                url: entry.resolved_url(),
            })
            .collect();
        if !hits.is_empty() {
            total += hits.len();
            results.insert(country.clone(), hits);
        }
    }

    Ok(KeywordResults {
        keyword,
        total,
        countries: results,
    })
}

/// Outcome of a country lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "countries", rename_all = "snake_case")]
pub enum CountryMatch {
    NoMatch,
    /// Exactly one country matched; callers select it directly.
    Single(String),
    Multiple(Vec<String>),
}

/// Case-insensitive substring match on display name or canonical key.
///
/// An empty query matches nothing.
pub fn country_search<'a>(
    keys: impl IntoIterator<Item = &'a str>,
    names: &NameRegistry,
    query: &str,
) -> CountryMatch {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return CountryMatch::NoMatch;
    }

    let mut matches: Vec<String> = keys
        .into_iter()
        .filter(|key| {
            names.display_name(key).to_lowercase().contains(&query)
                || key.to_lowercase().contains(&query)
        })
        .map(str::to_string)
        .collect();

    match matches.len() {
        0 => CountryMatch::NoMatch,
        1 => CountryMatch::Single(matches.remove(0)),
        _ => CountryMatch::Multiple(matches),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countries() -> BTreeMap<String, CountryProfile> {
        let json = r#"{
            "USA": {
                "LAWS Employment/Deployment": {
                    "legal_directives": [
                        { "text": "Autonomy in Weapon Systems (Jan 2023)", "url": "https://dod.example/3000" }
                    ],
                    "public_statements": ["Political Declaration on autonomy (2023)"]
                },
                "Notes": { "policy_documents": ["autonomy memo"] }
            },
            "Japan": {
                "Adoption & Intent of Use": {
                    "policy_documents": ["Basic Policy https://mod.example/ai (2024)"]
                }
            }
        }"#;
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_keyword_too_short() {
        let data = countries();
        for keyword in ["", " ", "a", "  b  "] {
            let err = keyword_search(&data, keyword).unwrap_err();
            assert!(matches!(err, SearchError::KeywordTooShort { min: 2, .. }), "{keyword:?}");
        }
    }

    #[test]
    fn test_keyword_hits() {
        let results = keyword_search(&countries(), "  AUTONOMY ").unwrap();
        assert_eq!(results.keyword, "autonomy");
        // The untracked "Notes" area is not searched.
        assert_eq!(results.total, 2);
        let usa = &results.countries["USA"];
        assert_eq!(usa[0].source, "Legal");
        assert_eq!(usa[0].url.as_deref(), Some("https://dod.example/3000"));
        assert_eq!(usa[1].source, "Statement");
        assert_eq!(usa[1].area, PolicyArea::LawsEmployment);
        assert!(!results.countries.contains_key("Japan"));
    }

    #[test]
    fn test_keyword_hit_url_from_text() {
        let results = keyword_search(&countries(), "basic").unwrap();
        assert_eq!(results.countries["Japan"][0].url.as_deref(), Some("https://mod.example/ai"));
    }

    #[test]
    fn test_country_search() {
        let names = NameRegistry::builtin();
        let keys = ["USA", "UK", "South Korea", "North Korea", "Japan"];
        let cases = vec![
            ("jap", CountryMatch::Single("Japan".to_string())),
            ("united", CountryMatch::Multiple(vec!["USA".to_string(), "UK".to_string()])),
            ("korea", CountryMatch::Multiple(vec!["South Korea".to_string(), "North Korea".to_string()])),
            ("usa", CountryMatch::Single("USA".to_string())),
            ("peru", CountryMatch::NoMatch),
            ("   ", CountryMatch::NoMatch),
        ];
        for (query, expected) in cases {
            assert_eq!(country_search(keys, &names, query), expected, "query {query:?}");
        }
    }
}
