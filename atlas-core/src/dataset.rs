//! The immutable policy payload the engine is built from.

use atlas_common::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::model::CountryProfile;
use crate::scores::YearlyScoreTable;

fn empty_object() -> Value {
    Value::Object(Default::default())
}

/// Parsed form of the dashboard's JSON document.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Dataset {
    /// Canonical country key → profile.
    pub countries: BTreeMap<String, CountryProfile>,

    /// Alliance name → aggregate profile.
    #[serde(default)]
    pub alliances: BTreeMap<String, CountryProfile>,

    #[serde(default, rename = "countrySummaries")]
    pub country_summaries: BTreeMap<String, String>,

    #[serde(default)]
    pub summaries: BTreeMap<String, String>,

    #[serde(default, rename = "yearlyScores")]
    pub yearly_scores: YearlyScoreTable,

    /// Precomputed extras the engine does not depend on.
    #[serde(default = "empty_object", rename = "similarityMatrix")]
    pub similarity_matrix: Value,

    #[serde(default = "empty_object", rename = "directionalCoding")]
    pub directional_coding: Value,

    #[serde(default = "empty_object", rename = "allianceConvergence")]
    pub alliance_convergence: Value,

    #[serde(default = "empty_object", rename = "highPolicyConvergence")]
    pub high_policy_convergence: Value,
}

impl Dataset {
    /// Parse the JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).context("parsing dataset JSON")?;
        Self::from_value(value)
    }

    /// Build from an already parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        let Some(root) = value.as_object() else {
            return Err(Error::InvalidInput(
                "dataset must be a JSON object".to_string(),
            ));
        };
        if !root.contains_key("countries") {
            return Err(Error::InvalidInput(
                "dataset has no 'countries' field".to_string(),
            ));
        }

        let mut dataset: Dataset =
            serde_json::from_value(value).context("reading dataset fields")?;
        for extra in [
            &mut dataset.similarity_matrix,
            &mut dataset.directional_coding,
            &mut dataset.alliance_convergence,
            &mut dataset.high_policy_convergence,
        ] {
            if extra.is_null() {
                *extra = empty_object();
            }
        }
        Ok(dataset)
    }

    pub fn country(&self, key: &str) -> Option<&CountryProfile> {
        self.countries.get(key)
    }

    pub fn alliance(&self, name: &str) -> Option<&CountryProfile> {
        self.alliances.get(name)
    }

    pub fn has_country(&self, key: &str) -> bool {
        self.countries.contains_key(key)
    }

    pub fn country_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.countries.keys().map(String::as_str)
    }

    /// Prose summary for a country or alliance key.
    pub fn summary(&self, key: &str) -> Option<&str> {
        self.country_summaries
            .get(key)
            .or_else(|| self.summaries.get(key))
            .map(String::as_str)
    }
}
