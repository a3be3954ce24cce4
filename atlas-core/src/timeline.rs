//! Quarterly bucketing of policy entries.
//!
//! Quarter 0 is Q1 2016 and quarter 39 is Q4 2025. Entries dated outside
//! that horizon (or not dated at all) never reach a bucket, but still
//! count towards year-agnostic totals elsewhere.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::annotation::EntryDate;
use crate::model::{CountryProfile, Dimension};

pub const HORIZON_START_YEAR: i32 = 2016;
pub const HORIZON_END_YEAR: i32 = 2025;
pub const HORIZON_YEARS: usize = (HORIZON_END_YEAR - HORIZON_START_YEAR + 1) as usize;
pub const QUARTER_COUNT: usize = HORIZON_YEARS * 4;

/// Year assumed for undated entries when filtering "up to a year".
pub const UNDATED_ASSUMED_YEAR: i32 = 2020;
/// Entries older than this are ignored when looking for an area's first year.
pub const EMERGENCE_MIN_YEAR: i32 = 2010;
const EMERGENCE_MAX_YEAR: i32 = 2030;

/// The horizon years, oldest first.
pub fn horizon_years() -> impl Iterator<Item = i32> {
    HORIZON_START_YEAR..=HORIZON_END_YEAR
}

fn in_horizon(year: i32) -> bool {
    (HORIZON_START_YEAR..=HORIZON_END_YEAR).contains(&year)
}

/// Index of the bucket a dated entry falls into.
pub fn bucket_of(date: EntryDate) -> Option<usize> {
    if !in_horizon(date.year) {
        return None;
    }
    let year_offset = (date.year - HORIZON_START_YEAR) as usize;
    Some(year_offset * 4 + (date.quarter() as usize - 1))
}

/// Quarter index for a date token such as `"Mar 2021"`, `"March 2021"` or
/// `"2021"`.
///
/// Returns `None` for anything else, including a leading word that is not
/// a month, and for years outside the horizon.
pub fn quarter_index(date: &str) -> Option<usize> {
    let parsed = EntryDate::parse_token(date)?;
    let has_word = date.split_whitespace().count() == 2;
    if has_word && parsed.month.is_none() {
        return None;
    }
    bucket_of(parsed)
}

/// Calendar year containing quarter `q`.
pub fn year_of_quarter(q: usize) -> i32 {
    HORIZON_START_YEAR + (q / 4) as i32
}

/// Label shown for a quarter on the map time slider.
pub fn quarter_label(q: usize) -> String {
    year_of_quarter(q).to_string()
}

/// Which count the map colours by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Everything dated up to and including the quarter.
    #[default]
    Cumulative,
    /// Everything dated in the calendar year of the quarter.
    Yearly,
}

impl std::str::FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cumulative" => Ok(ViewMode::Cumulative),
            "yearly" => Ok(ViewMode::Yearly),
            other => Err(format!("unknown view mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct QuarterCounts {
    cumulative: [usize; QUARTER_COUNT],
    yearly: [usize; QUARTER_COUNT],
}

impl QuarterCounts {
    fn zero() -> Self {
        Self {
            cumulative: [0; QUARTER_COUNT],
            yearly: [0; QUARTER_COUNT],
        }
    }

    fn add(&mut self, bucket: usize) {
        for count in &mut self.cumulative[bucket..] {
            *count += 1;
        }
        let year_start = bucket - bucket % 4;
        for count in &mut self.yearly[year_start..year_start + 4] {
            *count += 1;
        }
    }

    fn view(&self, mode: ViewMode) -> &[usize; QUARTER_COUNT] {
        match mode {
            ViewMode::Cumulative => &self.cumulative,
            ViewMode::Yearly => &self.yearly,
        }
    }
}

/// Map statistics for one position of the time slider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapSnapshot {
    pub quarter: usize,
    pub label: String,
    pub mode: ViewMode,
    pub countries_with_data: usize,
    pub total_entries: usize,
    /// Country with the highest count; the first in key order wins ties.
    pub top_country: Option<String>,
    pub top_count: usize,
}

/// Per-country cumulative and yearly counts for all 40 quarters.
#[derive(Debug, Clone, Default)]
pub struct QuarterTable {
    counts: BTreeMap<String, QuarterCounts>,
}

impl QuarterTable {
    /// Bucket every dated entry of the six tracked areas.
    pub fn build(countries: &BTreeMap<String, CountryProfile>) -> Self {
        let mut counts = BTreeMap::new();
        let mut bucketed = 0usize;
        for (country, profile) in countries {
            let mut row = QuarterCounts::zero();
            for (_, _, entry) in profile.tracked_entries() {
                if let Some(bucket) = EntryDate::from_entry_text(&entry.text).and_then(bucket_of) {
                    row.add(bucket);
                    bucketed += 1;
                }
            }
            counts.insert(country.clone(), row);
        }
        debug!(countries = counts.len(), entries = bucketed, "Built quarter table");
        Self { counts }
    }

    /// Entries of `country` dated up to and including quarter `q`.
    pub fn cumulative_count(&self, country: &str, q: usize) -> usize {
        self.count(country, q, ViewMode::Cumulative)
    }

    /// Entries of `country` dated in the year containing quarter `q`.
    pub fn yearly_count(&self, country: &str, q: usize) -> usize {
        self.count(country, q, ViewMode::Yearly)
    }

    pub fn count(&self, country: &str, q: usize, mode: ViewMode) -> usize {
        if q >= QUARTER_COUNT {
            return 0;
        }
        self.counts.get(country).map_or(0, |row| row.view(mode)[q])
    }

    /// All 40 counts of one country, zeros for an unknown country.
    pub fn series(&self, country: &str, mode: ViewMode) -> Vec<usize> {
        match self.counts.get(country) {
            Some(row) => row.view(mode).to_vec(),
            None => vec![0; QUARTER_COUNT],
        }
    }

    pub fn snapshot(&self, q: usize, mode: ViewMode) -> MapSnapshot {
        let mut snapshot = MapSnapshot {
            quarter: q,
            label: quarter_label(q),
            mode,
            countries_with_data: 0,
            total_entries: 0,
            top_country: None,
            top_count: 0,
        };
        for country in self.counts.keys() {
            let count = self.count(country, q, mode);
            if count == 0 {
                continue;
            }
            snapshot.countries_with_data += 1;
            snapshot.total_entries += count;
            if count > snapshot.top_count {
                snapshot.top_count = count;
                snapshot.top_country = Some(country.clone());
            }
        }
        snapshot
    }

    pub fn countries(&self) -> impl Iterator<Item = &str> + '_ {
        self.counts.keys().map(String::as_str)
    }
}

/// Entry counts per (year, quarter, dimension) over every country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrowthSeries {
    /// `counts[year - 2016][quarter - 1][dimension index]`
    counts: [[[usize; 6]; 4]; HORIZON_YEARS],
    /// Largest single-quarter total, used to scale the chart.
    pub max_quarter_total: usize,
}

impl GrowthSeries {
    pub fn build(countries: &BTreeMap<String, CountryProfile>) -> Self {
        let mut counts = [[[0usize; 6]; 4]; HORIZON_YEARS];
        for profile in countries.values() {
            for (area, _, entry) in profile.tracked_entries() {
                let Some(bucket) = EntryDate::from_entry_text(&entry.text).and_then(bucket_of)
                else {
                    continue;
                };
                counts[bucket / 4][bucket % 4][area.dimension().index()] += 1;
            }
        }

        let max_quarter_total = counts
            .iter()
            .flat_map(|year| year.iter())
            .map(|quarter| quarter.iter().sum::<usize>())
            .max()
            .unwrap_or(0);

        Self {
            counts,
            max_quarter_total,
        }
    }

    /// Count for a year, a quarter (1-4) and a dimension; 0 outside the horizon.
    pub fn count(&self, year: i32, quarter: u32, dimension: Dimension) -> usize {
        self.quarter_row(year, quarter)
            .map_or(0, |row| row[dimension.index()])
    }

    /// Sum over all dimensions for one quarter.
    pub fn quarter_total(&self, year: i32, quarter: u32) -> usize {
        self.quarter_row(year, quarter)
            .map_or(0, |row| row.iter().sum())
    }

    pub fn year_total(&self, year: i32) -> usize {
        (1..=4).map(|q| self.quarter_total(year, q)).sum()
    }

    fn quarter_row(&self, year: i32, quarter: u32) -> Option<&[usize; 6]> {
        if !in_horizon(year) || !(1..=4).contains(&quarter) {
            return None;
        }
        Some(&self.counts[(year - HORIZON_START_YEAR) as usize][quarter as usize - 1])
    }
}

/// Tracked entries dated in or before `year`. Undated entries count as 2020.
pub fn entries_up_to_year(profile: &CountryProfile, year: i32) -> usize {
    profile
        .tracked_entries()
        .filter(|(_, _, entry)| {
            let entry_year = EntryDate::from_entry_text(&entry.text)
                .map_or(UNDATED_ASSUMED_YEAR, |date| date.year);
            entry_year <= year
        })
        .count()
}

/// Earliest year (2010 or later) of any entry in the area feeding `dimension`.
pub fn area_emergence_year(profile: &CountryProfile, dimension: Dimension) -> Option<i32> {
    let area = profile.area(dimension.area())?;
    area.iter()
        .filter_map(|(_, entry)| EntryDate::from_entry_text(&entry.text))
        .map(|date| date.year)
        .filter(|year| (EMERGENCE_MIN_YEAR..EMERGENCE_MAX_YEAR).contains(year))
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PolicyArea, PolicyEntry, SourceType};
    use proptest::prelude::*;

    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    fn profile(texts: &[&str]) -> CountryProfile {
        let mut profile = CountryProfile::new();
        for text in texts {
            profile.push(
                PolicyArea::EthicalGuidelines,
                SourceType::PolicyDocuments,
                PolicyEntry::new(*text),
            );
        }
        profile
    }

    fn countries(rows: Vec<(&str, CountryProfile)>) -> BTreeMap<String, CountryProfile> {
        rows.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn test_quarter_index() {
        let cases = vec![
            ("Jan 2016", Some(0)),
            ("March 2016", Some(0)),
            ("Apr 2016", Some(1)),
            ("2016", Some(3)),
            ("Mar 2021", Some(20)),
            ("Dec 2025", Some(39)),
            ("2025", Some(39)),
            ("2015", None),
            ("Jan 2026", None),
            ("Spring 2020", None),
            ("soon", None),
            ("", None),
        ];
        for (token, expected) in cases {
            assert_eq!(quarter_index(token), expected, "token {token:?}");
        }
    }

    #[test]
    fn test_quarter_labels() {
        assert_eq!(quarter_label(0), "2016");
        assert_eq!(quarter_label(3), "2016");
        assert_eq!(quarter_label(4), "2017");
        assert_eq!(quarter_label(39), "2025");
        assert_eq!(year_of_quarter(20), 2021);
    }

    #[test]
    fn test_cumulative_and_yearly_counts() {
        let data = countries(vec![(
            "France",
            profile(&[
                "Charter (Mar 2019)",
                "Strategy (2019)",
                "Law (Jul 2021)",
                "Old (2014)",
                "Undated note",
            ]),
        )]);
        let table = QuarterTable::build(&data);

        // Q1 2019 = 12, Q4 2019 = 15, Q3 2021 = 22
        assert_eq!(table.cumulative_count("France", 11), 0);
        assert_eq!(table.cumulative_count("France", 12), 1);
        assert_eq!(table.cumulative_count("France", 15), 2);
        assert_eq!(table.cumulative_count("France", 22), 3);
        assert_eq!(table.cumulative_count("France", 39), 3);

        for q in 12..16 {
            assert_eq!(table.yearly_count("France", q), 2);
        }
        assert_eq!(table.yearly_count("France", 16), 0);
        assert_eq!(table.yearly_count("France", 20), 1);
    }

    #[test]
    fn test_unknown_country_and_quarter_are_zero() {
        let table = QuarterTable::build(&countries(vec![("Spain", profile(&["A (2020)"]))]));
        assert_eq!(table.cumulative_count("Peru", 30), 0);
        assert_eq!(table.yearly_count("Spain", 40), 0);
        assert_eq!(table.series("Peru", ViewMode::Yearly), vec![0; QUARTER_COUNT]);
    }

    #[test]
    fn test_untracked_areas_are_not_bucketed() {
        let json = r#"{ "Misc": { "legal_directives": ["Extra (2020)"] } }"#;
        let extra: CountryProfile = serde_json::from_str(json).unwrap();
        let table = QuarterTable::build(&countries(vec![("Chile", extra)]));
        assert_eq!(table.cumulative_count("Chile", 39), 0);
    }

    #[test]
    fn test_snapshot_ties_keep_first() {
        let data = countries(vec![
            ("Austria", profile(&["A (2020)", "B (2021)"])),
            ("Brazil", profile(&["C (2020)", "D (2021)"])),
            ("Chad", profile(&["E (2024)"])),
        ]);
        let table = QuarterTable::build(&data);

        let snap = table.snapshot(23, ViewMode::Cumulative);
        assert_eq!(snap.countries_with_data, 2);
        assert_eq!(snap.total_entries, 4);
        assert_eq!(snap.top_country.as_deref(), Some("Austria"));
        assert_eq!(snap.label, "2021");

        let snap = table.snapshot(32, ViewMode::Yearly);
        assert_eq!(snap.countries_with_data, 1);
        assert_eq!(snap.top_country.as_deref(), Some("Chad"));

        let snap = table.snapshot(0, ViewMode::Yearly);
        assert_eq!(snap.countries_with_data, 0);
        assert!(snap.top_country.is_none());
    }

    #[test]
    fn test_growth_series() {
        let mut usa = profile(&["Ethics A (Feb 2020)", "Ethics B (2020)"]);
        usa.push(
            PolicyArea::LawsEmployment,
            SourceType::LegalDirectives,
            PolicyEntry::new("Directive (Jan 2020)"),
        );
        let data = countries(vec![("USA", usa), ("UK", profile(&["Ethics C (Mar 2020)"]))]);
        let growth = GrowthSeries::build(&data);

        assert_eq!(growth.count(2020, 1, Dimension::Ethics), 2);
        assert_eq!(growth.count(2020, 1, Dimension::Laws), 1);
        assert_eq!(growth.count(2020, 4, Dimension::Ethics), 1);
        assert_eq!(growth.quarter_total(2020, 1), 3);
        assert_eq!(growth.year_total(2020), 4);
        assert_eq!(growth.max_quarter_total, 3);
        assert_eq!(growth.count(2030, 1, Dimension::Ethics), 0);
        assert_eq!(growth.quarter_total(2020, 5), 0);
    }

    #[test]
    fn test_entries_up_to_year() {
        let p = profile(&["A (2018)", "B (Jun 2021)", "Undated", "C (2023)"]);
        let cases = vec![(2017, 0), (2018, 1), (2020, 2), (2021, 3), (2025, 4)];
        for (year, expected) in cases {
            assert_eq!(entries_up_to_year(&p, year), expected, "year {year}");
        }
    }

    #[test]
    fn test_area_emergence_year() {
        let p = profile(&["A (2009)", "B (Jun 2017)", "C (2013)", "Undated"]);
        assert_eq!(area_emergence_year(&p, Dimension::Ethics), Some(2013));
        assert_eq!(area_emergence_year(&p, Dimension::Laws), None);
        assert_eq!(area_emergence_year(&profile(&["Old (2001)"]), Dimension::Ethics), None);
    }

    fn entry_text(year: i32, month: Option<usize>) -> String {
        match month {
            Some(m) => format!("Entry ({} {year})", MONTHS[m]),
            None => format!("Entry ({year})"),
        }
    }

    proptest! {
        #[test]
        fn prop_cumulative_is_monotone(
            dates in prop::collection::vec((2012i32..2029, prop::option::of(0usize..12)), 0..40)
        ) {
            let texts: Vec<String> = dates.iter().map(|(y, m)| entry_text(*y, *m)).collect();
            let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
            let table = QuarterTable::build(&countries(vec![("X", profile(&refs))]));

            for q in 1..QUARTER_COUNT {
                prop_assert!(table.cumulative_count("X", q) >= table.cumulative_count("X", q - 1));
            }
            let in_range = dates.iter().filter(|(y, _)| in_horizon(*y)).count();
            prop_assert_eq!(table.cumulative_count("X", QUARTER_COUNT - 1), in_range);
        }

        #[test]
        fn prop_yearly_is_constant_within_year(
            dates in prop::collection::vec((2012i32..2029, prop::option::of(0usize..12)), 0..40)
        ) {
            let texts: Vec<String> = dates.iter().map(|(y, m)| entry_text(*y, *m)).collect();
            let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
            let table = QuarterTable::build(&countries(vec![("X", profile(&refs))]));

            for year_start in (0..QUARTER_COUNT).step_by(4) {
                let first = table.yearly_count("X", year_start);
                for q in year_start..year_start + 4 {
                    prop_assert_eq!(table.yearly_count("X", q), first);
                }
            }
        }
    }
}
