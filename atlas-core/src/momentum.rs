//! Momentum classification: how much of a country's policy activity is recent.

use atlas_common::MomentumConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::annotation::EntryDate;
use crate::model::CountryProfile;
use crate::names::NameRegistry;

/// Momentum category of a country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MomentumCategory {
    Accelerating,
    Steady,
    Emerging,
    Dormant,
}

impl std::fmt::Display for MomentumCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MomentumCategory::Accelerating => "accelerating",
            MomentumCategory::Steady => "steady",
            MomentumCategory::Emerging => "emerging",
            MomentumCategory::Dormant => "dormant",
        };
        f.write_str(s)
    }
}

/// Classifier thresholds. See [`MomentumThresholds::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MomentumThresholds {
    pub recent_from_year: i32,
    pub accelerating_min_recent: usize,
    pub accelerating_min_rate: f64,
    pub steady_min_total: usize,
    pub steady_min_rate: f64,
    pub emerging_min_recent: usize,
    pub emerging_max_total: usize,
}

impl Default for MomentumThresholds {
    fn default() -> Self {
        Self::from(&MomentumConfig::default())
    }
}

impl From<&MomentumConfig> for MomentumThresholds {
    fn from(config: &MomentumConfig) -> Self {
        Self {
            recent_from_year: config.recent_from_year,
            accelerating_min_recent: config.accelerating_min_recent,
            accelerating_min_rate: config.accelerating_min_rate,
            steady_min_total: config.steady_min_total,
            steady_min_rate: config.steady_min_rate,
            emerging_min_recent: config.emerging_min_recent,
            emerging_max_total: config.emerging_max_total,
        }
    }
}

impl MomentumThresholds {
    /// Share of recent entries, guarded against an empty total.
    pub fn recent_rate(recent: usize, total: usize) -> f64 {
        recent as f64 / total.max(1) as f64
    }

    /// Classify from recent and total entry counts.
    ///
    /// - accelerating: `recent >= 5` and rate `> 0.5`
    /// - steady: `total >= 5` and rate `>= 0.3`
    /// - emerging: `recent >= 2` and `total < 8`
    /// - dormant otherwise
    pub fn classify(&self, recent: usize, total: usize) -> MomentumCategory {
        let rate = Self::recent_rate(recent, total);
        if recent >= self.accelerating_min_recent && rate > self.accelerating_min_rate {
            MomentumCategory::Accelerating
        } else if total >= self.steady_min_total && rate >= self.steady_min_rate {
            MomentumCategory::Steady
        } else if recent >= self.emerging_min_recent && total < self.emerging_max_total {
            MomentumCategory::Emerging
        } else {
            MomentumCategory::Dormant
        }
    }
}

/// World region used to colour the momentum chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Americas,
    Europe,
    #[serde(rename = "Asia-Pacific")]
    AsiaPacific,
    #[serde(rename = "Middle East")]
    MiddleEast,
    Africa,
    Other,
}

impl Region {
    pub fn label(&self) -> &'static str {
        match self {
            Region::Americas => "Americas",
            Region::Europe => "Europe",
            Region::AsiaPacific => "Asia-Pacific",
            Region::MiddleEast => "Middle East",
            Region::Africa => "Africa",
            Region::Other => "Other",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Region of a canonical country key; `Other` when not listed.
pub fn region_of(country: &str) -> Region {
    match country {
        "USA" | "Canada" | "Brazil" | "Colombia" => Region::Americas,
        "UK" | "France" | "Germany" | "Italy" | "Spain" | "Netherlands" | "Belgium" | "Poland"
        | "Norway" | "Sweden" | "Finland" | "Denmark" | "Estonia" | "Latvia" | "Lithuania"
        | "Greece" | "Hungary" | "Croatia" | "Bulgaria" | "Czechia" | "Russia" | "Ukraine"
        | "Turkey" | "Armenia" | "Azerbaijan" => Region::Europe,
        "China" | "Japan" | "South Korea" | "Singapore" | "India" | "Pakistan" | "Australia"
        | "North Korea" => Region::AsiaPacific,
        "Israel" | "UAE" | "Iran" | "Iraq" | "Egypt" | "Morocco" => Region::MiddleEast,
        "Algeria" | "South Africa" => Region::Africa,
        _ => Region::Other,
    }
}

/// Momentum of one country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MomentumStat {
    pub country: String,
    pub display_name: String,
    pub total: usize,
    pub recent: usize,
    /// Entries before the recent window, undated ones included.
    pub historical: usize,
    pub recent_rate: f64,
    pub category: MomentumCategory,
    pub region: Region,
}

/// Recent and total tracked entries of a profile.
pub fn recent_and_total(profile: &CountryProfile, recent_from_year: i32) -> (usize, usize) {
    profile
        .tracked_entries()
        .fold((0, 0), |(recent, total), (_, _, entry)| {
            let is_recent = EntryDate::from_entry_text(&entry.text)
                .is_some_and(|date| date.year >= recent_from_year);
            (recent + usize::from(is_recent), total + 1)
        })
}

/// Classify one country. `None` when it has no tracked entries.
pub fn classify_country(
    country: &str,
    profile: &CountryProfile,
    names: &NameRegistry,
    thresholds: &MomentumThresholds,
) -> Option<MomentumStat> {
    let (recent, total) = recent_and_total(profile, thresholds.recent_from_year);
    if total == 0 {
        return None;
    }
    Some(MomentumStat {
        country: country.to_string(),
        display_name: names.display_name(country).to_string(),
        total,
        recent,
        historical: total - recent,
        recent_rate: MomentumThresholds::recent_rate(recent, total),
        category: thresholds.classify(recent, total),
        region: region_of(country),
    })
}

/// Classify every country with at least one tracked entry, in key order.
pub fn classify_all(
    countries: &BTreeMap<String, CountryProfile>,
    names: &NameRegistry,
    thresholds: &MomentumThresholds,
) -> Vec<MomentumStat> {
    countries
        .iter()
        .filter_map(|(country, profile)| classify_country(country, profile, names, thresholds))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PolicyArea, PolicyEntry, SourceType};

    #[test]
    fn test_classify_boundaries() {
        let thresholds = MomentumThresholds::default();
        let cases = vec![
            (6, 10, MomentumCategory::Accelerating),
            (5, 9, MomentumCategory::Accelerating),
            // rate exactly 0.5 is not enough
            (5, 10, MomentumCategory::Steady),
            (3, 10, MomentumCategory::Steady),
            (2, 10, MomentumCategory::Dormant),
            (2, 7, MomentumCategory::Emerging),
            (4, 4, MomentumCategory::Emerging),
            (2, 8, MomentumCategory::Dormant),
            (1, 3, MomentumCategory::Dormant),
            (0, 1, MomentumCategory::Dormant),
        ];
        for (recent, total, expected) in cases {
            assert_eq!(
                thresholds.classify(recent, total),
                expected,
                "recent {recent}, total {total}"
            );
        }
    }

    #[test]
    fn test_custom_thresholds() {
        let config = MomentumConfig {
            accelerating_min_recent: 2,
            ..MomentumConfig::default()
        };
        let thresholds = MomentumThresholds::from(&config);
        assert_eq!(thresholds.classify(2, 3), MomentumCategory::Accelerating);
    }

    #[test]
    fn test_regions() {
        let cases = vec![
            ("USA", Region::Americas),
            ("Azerbaijan", Region::Europe),
            ("North Korea", Region::AsiaPacific),
            ("UAE", Region::MiddleEast),
            ("South Africa", Region::Africa),
            ("Peru", Region::Other),
        ];
        for (country, expected) in cases {
            assert_eq!(region_of(country), expected, "{country}");
        }
        assert_eq!(Region::AsiaPacific.to_string(), "Asia-Pacific");
    }

    #[test]
    fn test_classify_country_counts() {
        let mut profile = CountryProfile::new();
        for text in ["A (2023)", "B (Mar 2024)", "C (2019)", "Undated", "D (2025)"] {
            profile.push(
                PolicyArea::AdoptionIntent,
                SourceType::PublicStatements,
                PolicyEntry::new(text),
            );
        }
        let names = NameRegistry::builtin();
        let stat =
            classify_country("USA", &profile, &names, &MomentumThresholds::default()).unwrap();

        assert_eq!(stat.total, 5);
        assert_eq!(stat.recent, 3);
        assert_eq!(stat.historical, 2);
        assert!((stat.recent_rate - 0.6).abs() < 1e-12);
        assert_eq!(stat.category, MomentumCategory::Steady);
        assert_eq!(stat.region, Region::Americas);
        assert_eq!(stat.display_name, names.display_name("USA"));
    }

    #[test]
    fn test_zero_total_is_excluded() {
        let names = NameRegistry::builtin();
        let countries: BTreeMap<String, CountryProfile> =
            [("Empty".to_string(), CountryProfile::new())].into_iter().collect();
        assert!(classify_all(&countries, &names, &MomentumThresholds::default()).is_empty());
    }
}
