//! Country name resolution.
//!
//! The dataset, the map provider and the static tables (voting records,
//! alliance rosters) spell countries differently: ISO names, historical
//! names, formal state names. [`NameRegistry`] folds all of them into one
//! alias → canonical key table built once at load time, and keeps the
//! canonical key → display label table next to it.
//!
//! Lookups that miss are not silent: [`NameRegistry::resolve_or_report`]
//! records them in a [`NameDiagnostics`] value and logs a warning.

use atlas_common::validation::{Validate, ValidationError, ValidationResult};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::warn;

/// Raw spellings and the canonical key they stand for.
const ALIASES: &[(&str, &str)] = &[
    ("United States of America", "USA"),
    ("United States", "USA"),
    ("U.S.", "USA"),
    ("US", "USA"),
    ("United Kingdom", "UK"),
    ("U.K.", "UK"),
    ("Britain", "UK"),
    ("Great Britain", "UK"),
    ("Korea, Republic of", "South Korea"),
    ("Republic of Korea", "South Korea"),
    ("Russian Federation", "Russia"),
    ("Türkiye", "Turkey"),
    ("Republic of Turkey", "Turkey"),
    ("Republic of Türkiye", "Turkey"),
    ("United Arab Emirates", "UAE"),
    ("Iran, Islamic Republic of", "Iran"),
    ("Korea, Democratic People's Republic of", "North Korea"),
    ("Dem. Rep. Korea", "North Korea"),
    ("Democratic People's Republic of Korea", "North Korea"),
    ("Czech Republic", "Czechia"),
    ("Czech Rep.", "Czechia"),
    ("S. Africa", "South Africa"),
    ("Macedonia", "North Macedonia"),
    ("Republic of Albania", "Albania"),
    ("Kingdom of Belgium", "Belgium"),
    ("Republic of Bulgaria", "Bulgaria"),
    ("Republic of Croatia", "Croatia"),
    ("Kingdom of Denmark", "Denmark"),
    ("Republic of Estonia", "Estonia"),
    ("Republic of Finland", "Finland"),
    ("French Republic", "France"),
    ("Federal Republic of Germany", "Germany"),
    ("Hellenic Republic", "Greece"),
    ("Republic of Hungary", "Hungary"),
    ("Republic of Iceland", "Iceland"),
    ("Italian Republic", "Italy"),
    ("Republic of Latvia", "Latvia"),
    ("Republic of Lithuania", "Lithuania"),
    ("Grand Duchy of Luxembourg", "Luxembourg"),
    ("Kingdom of the Netherlands", "Netherlands"),
    ("Kingdom of Norway", "Norway"),
    ("Republic of Poland", "Poland"),
    ("Portuguese Republic", "Portugal"),
    ("Slovak Republic", "Slovakia"),
    ("Republic of Slovenia", "Slovenia"),
    ("Kingdom of Spain", "Spain"),
    ("Kingdom of Sweden", "Sweden"),
    ("Commonwealth of Australia", "Australia"),
    ("Dominion of Canada", "Canada"),
];

/// Canonical keys known to the static tables, with their UI label.
const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("USA", "United States of America"),
    ("UK", "United Kingdom"),
    ("South Korea", "Republic of Korea"),
    ("Russia", "Russian Federation"),
    ("Turkey", "Türkiye"),
    ("UAE", "United Arab Emirates"),
    ("North Korea", "Democratic People's Republic of Korea"),
    ("China", "China"),
    ("France", "France"),
    ("Israel", "Israel"),
    ("Estonia", "Estonia"),
    ("Australia", "Australia"),
    ("Germany", "Germany"),
    ("India", "India"),
    ("Pakistan", "Pakistan"),
    ("Azerbaijan", "Azerbaijan"),
    ("Ukraine", "Ukraine"),
    ("Iran", "Iran"),
    ("Norway", "Norway"),
    ("Singapore", "Singapore"),
    ("Japan", "Japan"),
    ("Canada", "Canada"),
    ("Poland", "Poland"),
    ("Belgium", "Belgium"),
    ("Egypt", "Egypt"),
    ("Italy", "Italy"),
    ("Algeria", "Algeria"),
    ("Armenia", "Armenia"),
    ("Colombia", "Colombia"),
    ("Netherlands", "Netherlands"),
    ("Spain", "Spain"),
    ("Iraq", "Iraq"),
    ("Lithuania", "Lithuania"),
    ("Greece", "Greece"),
    ("Sweden", "Sweden"),
    ("Latvia", "Latvia"),
    ("Finland", "Finland"),
    ("Denmark", "Denmark"),
    ("Hungary", "Hungary"),
    ("Croatia", "Croatia"),
    ("Morocco", "Morocco"),
    ("Czechia", "Czechia"),
    ("Bulgaria", "Bulgaria"),
    ("Brazil", "Brazil"),
    ("South Africa", "South Africa"),
    ("Iceland", "Iceland"),
    ("Luxembourg", "Luxembourg"),
    ("Montenegro", "Montenegro"),
    ("North Macedonia", "North Macedonia"),
    ("Portugal", "Portugal"),
    ("Romania", "Romania"),
    ("Slovakia", "Slovakia"),
    ("Slovenia", "Slovenia"),
    ("Albania", "Albania"),
    ("New Zealand", "New Zealand"),
    ("Greenland", "Greenland"),
];

fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// An alias claimed by two different canonical keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasConflict {
    pub alias: String,
    pub existing: String,
    pub rejected: String,
}

/// Names that failed to resolve, collected while building derived tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NameDiagnostics {
    unresolved: BTreeSet<String>,
}

impl NameDiagnostics {
    pub fn record(&mut self, raw: &str) {
        self.unresolved.insert(raw.trim().to_string());
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &str> + '_ {
        self.unresolved.iter().map(String::as_str)
    }

    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty()
    }

    pub fn merge(&mut self, other: NameDiagnostics) {
        self.unresolved.extend(other.unresolved);
    }
}

/// Bidirectional country name table.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    /// normalized alias → canonical key
    aliases: HashMap<String, String>,
    /// canonical key → display label
    display: BTreeMap<String, String>,
    conflicts: Vec<AliasConflict>,
}

impl NameRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the built-in alias and display tables.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (key, label) in DISPLAY_NAMES {
            registry.add_canonical(key, Some(label));
        }
        for (alias, key) in ALIASES {
            registry.add_alias(alias, key);
        }
        registry
    }

    /// Built-in tables plus every key used by the dataset.
    ///
    /// Dataset keys always resolve to themselves. When a key is a built-in
    /// alias whose canonical key is absent from the dataset ("Czech Republic"
    /// for "Czechia"), the whole alias group moves onto the dataset key.
    pub fn for_dataset<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        let mut registry = Self::builtin();
        let keys: Vec<&str> = keys.into_iter().map(str::trim).collect();
        let in_dataset: BTreeSet<&str> = keys.iter().copied().collect();

        for key in keys {
            match registry.resolve(key).map(str::to_string) {
                None => registry.add_canonical(key, None),
                Some(target) if target == key => {}
                Some(target) if !in_dataset.contains(target.as_str()) => {
                    registry.rekey(&target, key);
                }
                Some(_) => {
                    registry.aliases.insert(normalize(key), key.to_string());
                    registry
                        .display
                        .entry(key.to_string())
                        .or_insert_with(|| key.to_string());
                }
            }
        }
        registry
    }

    /// Point every alias of `from` at `to`; `to` inherits the display label.
    fn rekey(&mut self, from: &str, to: &str) {
        for canonical in self.aliases.values_mut() {
            if canonical == from {
                *canonical = to.to_string();
            }
        }
        let label = self.display.remove(from).unwrap_or_else(|| to.to_string());
        self.display.insert(to.to_string(), label);
    }

    /// Register a canonical key (it always resolves to itself).
    pub fn add_canonical(&mut self, key: &str, display: Option<&str>) {
        let key = key.trim();
        self.add_alias(key, key);
        let label = display.unwrap_or(key).to_string();
        self.display.entry(key.to_string()).or_insert(label);
    }

    /// Map `alias` to `canonical`. A second mapping of the same alias to a
    /// different key is refused and kept as a conflict.
    pub fn add_alias(&mut self, alias: &str, canonical: &str) {
        let normalized = normalize(alias);
        if normalized.is_empty() {
            return;
        }
        match self.aliases.get(&normalized) {
            Some(existing) if existing != canonical => {
                self.conflicts.push(AliasConflict {
                    alias: alias.trim().to_string(),
                    existing: existing.clone(),
                    rejected: canonical.to_string(),
                });
            }
            Some(_) => {}
            None => {
                self.aliases.insert(normalized, canonical.to_string());
            }
        }
    }

    /// Canonical key for a raw name, if known.
    pub fn resolve(&self, raw: &str) -> Option<&str> {
        self.aliases.get(&normalize(raw)).map(String::as_str)
    }

    /// Like [`NameRegistry::resolve`], but a miss is recorded and logged.
    pub fn resolve_or_report(&self, raw: &str, diagnostics: &mut NameDiagnostics) -> Option<&str> {
        let resolved = self.resolve(raw);
        if resolved.is_none() {
            warn!(name = %atlas_common::util::sanitize_for_log(raw), "Unresolved country name");
            diagnostics.record(raw);
        }
        resolved
    }

    /// Canonical key, or the trimmed input when the name is unknown.
    pub fn canonical<'a>(&'a self, raw: &'a str) -> &'a str {
        self.resolve(raw).unwrap_or_else(|| raw.trim())
    }

    pub fn is_canonical(&self, key: &str) -> bool {
        self.display.contains_key(key.trim())
    }

    /// UI label for a canonical key, falling back to the key itself.
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.display.get(key).map_or(key, String::as_str)
    }

    /// Every raw spelling that resolves to `key`, normalized.
    pub fn aliases_of(&self, key: &str) -> Vec<&str> {
        let mut aliases: Vec<&str> = self
            .aliases
            .iter()
            .filter(|(_, canonical)| canonical.as_str() == key)
            .map(|(alias, _)| alias.as_str())
            .collect();
        aliases.sort_unstable();
        aliases
    }

    pub fn conflicts(&self) -> &[AliasConflict] {
        &self.conflicts
    }

    pub fn canonical_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.display.keys().map(String::as_str)
    }
}

impl Validate for NameRegistry {
    fn validate(&self) -> ValidationResult<()> {
        let errors = self
            .conflicts
            .iter()
            .map(|c| ValidationError::Conflict {
                reason: format!(
                    "alias '{}' maps to both '{}' and '{}'",
                    c.alias, c.existing, c.rejected
                ),
            })
            .collect();
        ValidationError::from_errors(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_resolution() {
        let names = NameRegistry::builtin();
        let cases = vec![
            ("United States of America", Some("USA")),
            ("united kingdom", Some("UK")),
            ("  Türkiye ", Some("Turkey")),
            ("Czech Rep.", Some("Czechia")),
            ("Korea, Democratic People's Republic of", Some("North Korea")),
            ("United Arab Emirates", Some("UAE")),
            ("France", Some("France")),
            ("Atlantis", None),
        ];
        for (raw, expected) in cases {
            assert_eq!(names.resolve(raw), expected, "resolving {raw:?}");
        }
    }

    #[test]
    fn test_builtin_has_no_conflicts() {
        let names = NameRegistry::builtin();
        assert!(names.conflicts().is_empty());
        assert!(names.validate().is_ok());
    }

    #[test]
    fn test_display_names() {
        let names = NameRegistry::for_dataset(["USA", "Kenya"]);
        assert_eq!(names.display_name("USA"), "United States of America");
        assert_eq!(names.display_name("Kenya"), "Kenya");
        assert_eq!(names.display_name("Unknown"), "Unknown");
        assert_eq!(names.resolve("kenya"), Some("Kenya"));
    }

    #[test]
    fn test_every_canonical_key_has_one_display_name() {
        let names = NameRegistry::for_dataset(["USA", "Kenya", "Czechia"]);
        for key in names.canonical_keys() {
            assert!(!names.display_name(key).is_empty());
            assert_eq!(names.resolve(key), Some(key));
        }
    }

    #[test]
    fn test_dataset_keys_resolve_to_themselves() {
        let names = NameRegistry::for_dataset(["Czech Republic", "France", "US", "USA"]);
        let cases = vec![
            ("Czech Republic", Some("Czech Republic")),
            ("Czechia", Some("Czech Republic")),
            ("czech rep.", Some("Czech Republic")),
            ("US", Some("US")),
            ("USA", Some("USA")),
            ("United States of America", Some("USA")),
            ("France", Some("France")),
        ];
        for (raw, expected) in cases {
            assert_eq!(names.resolve(raw), expected, "resolving {raw:?}");
        }
        assert!(names.conflicts().is_empty());
        assert!(names.is_canonical("Czech Republic"));
        assert!(!names.is_canonical("Czechia"));
        assert_eq!(names.display_name("Czech Republic"), "Czechia");
        for key in names.canonical_keys() {
            assert_eq!(names.resolve(key), Some(key));
        }
    }

    #[test]
    fn test_conflicting_alias_is_reported() {
        let mut names = NameRegistry::builtin();
        names.add_alias("Korea", "South Korea");
        names.add_alias("Korea", "North Korea");
        assert_eq!(names.resolve("Korea"), Some("South Korea"));
        assert_eq!(names.conflicts().len(), 1);
        assert!(matches!(
            names.validate(),
            Err(ValidationError::Conflict { .. })
        ));
    }

    #[test]
    fn test_resolve_or_report_collects_misses() {
        let names = NameRegistry::builtin();
        let mut diagnostics = NameDiagnostics::default();
        assert_eq!(names.resolve_or_report("Britain", &mut diagnostics), Some("UK"));
        assert!(diagnostics.is_clean());
        assert_eq!(names.resolve_or_report("Narnia", &mut diagnostics), None);
        assert_eq!(diagnostics.unresolved().collect::<Vec<_>>(), vec!["Narnia"]);
    }

    #[test]
    fn test_aliases_of() {
        let names = NameRegistry::builtin();
        let aliases = names.aliases_of("Russia");
        assert!(aliases.contains(&"russia"));
        assert!(aliases.contains(&"russian federation"));
    }

    #[test]
    fn test_canonical_falls_back_to_input() {
        let names = NameRegistry::builtin();
        assert_eq!(names.canonical("Russian Federation"), "Russia");
        assert_eq!(names.canonical(" Narnia "), "Narnia");
    }
}
