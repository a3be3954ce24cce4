//! Recorded UN General Assembly stances on LAWS / military-AI resolutions.
//!
//! A stance only ever adjusts a similarity score; it is never reported on
//! its own.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::names::{NameDiagnostics, NameRegistry};

/// Countries that voted against a key resolution: `(name, from year, resolutions)`.
const VOTED_AGAINST: &[(&str, i32, &[&str])] = &[
    ("Russian Federation", 2023, &["A/RES/78/241", "A/RES/79/239"]),
    ("Russia", 2023, &["A/RES/78/241", "A/RES/79/239"]),
    ("North Korea", 2024, &["L.77"]),
    ("India", 2023, &["A/RES/78/241"]),
];

/// Countries that abstained on a key resolution.
const ABSTAINED: &[(&str, i32, &[&str])] = &[
    ("China", 2023, &["A/RES/78/241"]),
    ("Czech Republic", 2024, &["L.77"]),
    ("Czechia", 2024, &["L.77"]),
    ("Estonia", 2024, &["L.77"]),
    ("Iran", 2023, &["A/RES/78/241", "L.77"]),
    ("Israel", 2023, &["A/RES/78/241", "L.77"]),
    ("Latvia", 2024, &["L.77"]),
    ("Lithuania", 2024, &["L.77"]),
    ("Poland", 2024, &["L.77"]),
    ("Turkey", 2023, &["A/RES/78/241", "L.77"]),
    ("Türkiye", 2023, &["A/RES/78/241", "L.77"]),
    ("United Arab Emirates", 2023, &["A/RES/78/241"]),
    ("Ukraine", 2024, &["L.77"]),
];

/// A country's position on the resolutions in a given year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    Against,
    Abstain,
    For,
}

impl std::fmt::Display for Stance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stance::Against => "against",
            Stance::Abstain => "abstain",
            Stance::For => "for",
        };
        f.write_str(s)
    }
}

/// Penalty subtracted from a base similarity for a pair of stances.
///
/// Negative values are a bonus for sharing a dissenting stance.
pub fn stance_penalty(a: Stance, b: Stance) -> f64 {
    use Stance::*;
    match (a, b) {
        (Against, Against) => -0.05,
        (Abstain, Abstain) => -0.03,
        (For, For) => 0.0,
        (Against, For) | (For, Against) => 0.35,
        (Against, Abstain) | (Abstain, Against) => 0.20,
        (Abstain, For) | (For, Abstain) => 0.15,
    }
}

/// When a stance was first recorded and on which resolutions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StanceRecord {
    pub year: i32,
    pub resolutions: Vec<String>,
}

/// Stance lookup keyed by canonical country key.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VotingTable {
    against: BTreeMap<String, StanceRecord>,
    abstain: BTreeMap<String, StanceRecord>,
}

impl VotingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in voting records, with raw names resolved through `names`.
    pub fn builtin(names: &NameRegistry, diagnostics: &mut NameDiagnostics) -> Self {
        let mut table = Self::new();
        for &(raw, year, resolutions) in VOTED_AGAINST {
            let key = names.resolve_or_report(raw, diagnostics).unwrap_or(raw);
            table.record(key, Stance::Against, year, resolutions);
        }
        for &(raw, year, resolutions) in ABSTAINED {
            let key = names.resolve_or_report(raw, diagnostics).unwrap_or(raw);
            table.record(key, Stance::Abstain, year, resolutions);
        }
        table
    }

    /// Record a dissenting stance. Repeated records for the same country
    /// keep the earliest year and the union of resolutions.
    pub fn record(&mut self, country: &str, stance: Stance, year: i32, resolutions: &[&str]) {
        let map = match stance {
            Stance::Against => &mut self.against,
            Stance::Abstain => &mut self.abstain,
            Stance::For => return,
        };
        let record = map.entry(country.to_string()).or_insert_with(|| StanceRecord {
            year,
            resolutions: Vec::new(),
        });
        record.year = record.year.min(year);
        for resolution in resolutions {
            if !record.resolutions.iter().any(|r| r.as_str() == *resolution) {
                record.resolutions.push((*resolution).to_string());
            }
        }
    }

    /// Stance of `country` in `year`. A record applies from its year on;
    /// `against` takes precedence over `abstain`.
    pub fn stance(&self, country: &str, year: i32) -> Stance {
        let applies = |map: &BTreeMap<String, StanceRecord>| {
            map.get(country).is_some_and(|record| year >= record.year)
        };
        if applies(&self.against) {
            Stance::Against
        } else if applies(&self.abstain) {
            Stance::Abstain
        } else {
            Stance::For
        }
    }

    /// Similarity adjustment for a pair of countries in `year`.
    pub fn divergence_penalty(&self, a: &str, b: &str, year: i32) -> f64 {
        stance_penalty(self.stance(a, year), self.stance(b, year))
    }

    pub fn record_for(&self, country: &str, stance: Stance) -> Option<&StanceRecord> {
        match stance {
            Stance::Against => self.against.get(country),
            Stance::Abstain => self.abstain.get(country),
            Stance::For => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> VotingTable {
        let names = NameRegistry::builtin();
        let mut diagnostics = NameDiagnostics::default();
        let table = VotingTable::builtin(&names, &mut diagnostics);
        assert!(diagnostics.is_clean());
        table
    }

    #[test]
    fn test_stance_penalty_matrix() {
        let cases = vec![
            (Stance::Against, Stance::Against, -0.05),
            (Stance::Abstain, Stance::Abstain, -0.03),
            (Stance::For, Stance::For, 0.0),
            (Stance::Against, Stance::For, 0.35),
            (Stance::Against, Stance::Abstain, 0.20),
            (Stance::Abstain, Stance::For, 0.15),
        ];
        for (a, b, expected) in cases {
            assert!((stance_penalty(a, b) - expected).abs() < 1e-12, "{a} vs {b}");
            assert!((stance_penalty(b, a) - expected).abs() < 1e-12, "{b} vs {a}");
        }
    }

    #[test]
    fn test_stance_applies_from_recorded_year() {
        let table = builtin();
        assert_eq!(table.stance("Russia", 2022), Stance::For);
        assert_eq!(table.stance("Russia", 2023), Stance::Against);
        assert_eq!(table.stance("Russia", 2025), Stance::Against);
        assert_eq!(table.stance("Czechia", 2023), Stance::For);
        assert_eq!(table.stance("Czechia", 2024), Stance::Abstain);
        assert_eq!(table.stance("France", 2024), Stance::For);
    }

    #[test]
    fn test_raw_names_are_resolved() {
        let table = builtin();
        assert_eq!(table.stance("UAE", 2023), Stance::Abstain);
        assert_eq!(table.stance("Turkey", 2023), Stance::Abstain);
        let russia = table.record_for("Russia", Stance::Against).unwrap();
        assert_eq!(russia.year, 2023);
        assert_eq!(russia.resolutions, vec!["A/RES/78/241", "A/RES/79/239"]);
    }

    #[test]
    fn test_both_against_is_a_bonus() {
        let table = builtin();
        assert!((table.divergence_penalty("Russia", "North Korea", 2024) + 0.05).abs() < 1e-12);
        // North Korea's record only starts in 2024.
        assert!((table.divergence_penalty("Russia", "North Korea", 2023) - 0.35).abs() < 1e-12);
    }

    #[test]
    fn test_against_takes_precedence() {
        let mut table = VotingTable::new();
        table.record("Freedonia", Stance::Abstain, 2020, &["X"]);
        table.record("Freedonia", Stance::Against, 2022, &["Y"]);
        assert_eq!(table.stance("Freedonia", 2021), Stance::Abstain);
        assert_eq!(table.stance("Freedonia", 2022), Stance::Against);
    }
}
