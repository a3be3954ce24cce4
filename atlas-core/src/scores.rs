//! Externally supplied yearly dimension scores.
//!
//! `null` / absent means "no policy data", which is not the same as `0`
//! ("data exists, scored as zero intensity"). Scores are kept as
//! `Option<f64>` end to end.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::Dimension;

/// One country's six dimension scores for one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct DimensionScores {
    #[serde(rename = "LAWS", default)]
    pub laws: Option<f64>,
    #[serde(rename = "Adoption", default)]
    pub adoption: Option<f64>,
    #[serde(rename = "Procurement", default)]
    pub procurement: Option<f64>,
    #[serde(rename = "Safety", default)]
    pub safety: Option<f64>,
    #[serde(rename = "Ethics", default)]
    pub ethics: Option<f64>,
    #[serde(rename = "Interoperability", default)]
    pub interoperability: Option<f64>,
}

impl DimensionScores {
    pub fn get(&self, dim: Dimension) -> Option<f64> {
        match dim {
            Dimension::Laws => self.laws,
            Dimension::Adoption => self.adoption,
            Dimension::Procurement => self.procurement,
            Dimension::Safety => self.safety,
            Dimension::Ethics => self.ethics,
            Dimension::Interoperability => self.interoperability,
        }
        .filter(|v| v.is_finite())
    }

    pub fn set(&mut self, dim: Dimension, value: Option<f64>) {
        let slot = match dim {
            Dimension::Laws => &mut self.laws,
            Dimension::Adoption => &mut self.adoption,
            Dimension::Procurement => &mut self.procurement,
            Dimension::Safety => &mut self.safety,
            Dimension::Ethics => &mut self.ethics,
            Dimension::Interoperability => &mut self.interoperability,
        };
        *slot = value;
    }

    /// Builder-style [`DimensionScores::set`].
    pub fn with(mut self, dim: Dimension, value: f64) -> Self {
        self.set(dim, Some(value));
        self
    }

    /// Scores in [`Dimension::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, Option<f64>)> + '_ {
        Dimension::ALL.into_iter().map(move |dim| (dim, self.get(dim)))
    }

    /// Number of dimensions with a score.
    pub fn present_count(&self) -> usize {
        self.iter().filter(|(_, v)| v.is_some()).count()
    }
}

/// `country → year → scores`, as found under `yearlyScores`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct YearlyScoreTable {
    rows: BTreeMap<String, BTreeMap<String, DimensionScores>>,
}

impl YearlyScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, country: impl Into<String>, year: i32, scores: DimensionScores) {
        self.rows
            .entry(country.into())
            .or_default()
            .insert(year.to_string(), scores);
    }

    /// Scores of `country` for `year`, if the table has a row.
    pub fn scores(&self, country: &str, year: i32) -> Option<&DimensionScores> {
        self.rows.get(country)?.get(&year.to_string())
    }

    pub fn has_country(&self, country: &str) -> bool {
        self.rows.contains_key(country)
    }

    pub fn countries(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_and_zero_are_distinct() {
        let scores: DimensionScores =
            serde_json::from_str(r#"{ "LAWS": 0, "Adoption": null, "Ethics": 2.5 }"#).unwrap();

        assert_eq!(scores.get(Dimension::Laws), Some(0.0));
        assert_eq!(scores.get(Dimension::Adoption), None);
        assert_eq!(scores.get(Dimension::Procurement), None);
        assert_eq!(scores.get(Dimension::Ethics), Some(2.5));
        assert_eq!(scores.present_count(), 2);
    }

    #[test]
    fn test_table_lookup_by_year() {
        let table: YearlyScoreTable = serde_json::from_str(
            r#"{ "France": { "2020": { "Safety": 3 }, "2021": {} } }"#,
        )
        .unwrap();

        assert_eq!(table.scores("France", 2020).unwrap().get(Dimension::Safety), Some(3.0));
        assert_eq!(table.scores("France", 2021).unwrap().present_count(), 0);
        assert!(table.scores("France", 2019).is_none());
        assert!(table.scores("Spain", 2020).is_none());
        assert!(table.has_country("France"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_insert_and_builder() {
        let mut table = YearlyScoreTable::new();
        assert!(table.is_empty());
        table.insert(
            "Japan",
            2024,
            DimensionScores::default()
                .with(Dimension::Laws, 1.0)
                .with(Dimension::Interoperability, 4.0),
        );
        let row = table.scores("Japan", 2024).unwrap();
        let present: Vec<Dimension> = row
            .iter()
            .filter_map(|(dim, v)| v.map(|_| dim))
            .collect();
        assert_eq!(present, vec![Dimension::Laws, Dimension::Interoperability]);
        assert_eq!(table.countries().collect::<Vec<_>>(), vec!["Japan"]);
    }
}
