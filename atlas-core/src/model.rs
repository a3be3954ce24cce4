//! Core vocabulary of the policy dataset: policy areas, scoring dimensions,
//! source types and the entry/profile containers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One of the six fixed policy areas a country profile is organised by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PolicyArea {
    #[serde(rename = "LAWS Employment/Deployment")]
    LawsEmployment,
    #[serde(rename = "Adoption & Intent of Use")]
    AdoptionIntent,
    #[serde(rename = "Acquisition & Procurement")]
    Acquisition,
    #[serde(rename = "Ethical Guidelines & Restrictions")]
    EthicalGuidelines,
    #[serde(rename = "Technical Safety & Security Requirements")]
    TechnicalSafety,
    #[serde(rename = "Int'l Cooperation & Interoperability")]
    Cooperation,
}

impl PolicyArea {
    /// All areas, in dataset order.
    pub const ALL: [PolicyArea; 6] = [
        PolicyArea::LawsEmployment,
        PolicyArea::AdoptionIntent,
        PolicyArea::Acquisition,
        PolicyArea::EthicalGuidelines,
        PolicyArea::TechnicalSafety,
        PolicyArea::Cooperation,
    ];

    /// The key used for this area in the dataset.
    pub fn name(&self) -> &'static str {
        match self {
            PolicyArea::LawsEmployment => "LAWS Employment/Deployment",
            PolicyArea::AdoptionIntent => "Adoption & Intent of Use",
            PolicyArea::Acquisition => "Acquisition & Procurement",
            PolicyArea::EthicalGuidelines => "Ethical Guidelines & Restrictions",
            PolicyArea::TechnicalSafety => "Technical Safety & Security Requirements",
            PolicyArea::Cooperation => "Int'l Cooperation & Interoperability",
        }
    }

    /// Look up an area by its dataset key.
    pub fn from_name(name: &str) -> Option<PolicyArea> {
        Self::ALL.into_iter().find(|area| area.name() == name.trim())
    }

    /// Scoring dimension this area feeds.
    pub fn dimension(&self) -> Dimension {
        match self {
            PolicyArea::LawsEmployment => Dimension::Laws,
            PolicyArea::AdoptionIntent => Dimension::Adoption,
            PolicyArea::Acquisition => Dimension::Procurement,
            PolicyArea::EthicalGuidelines => Dimension::Ethics,
            PolicyArea::TechnicalSafety => Dimension::Safety,
            PolicyArea::Cooperation => Dimension::Interoperability,
        }
    }
}

impl std::fmt::Display for PolicyArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Short-coded scoring dimension used by the yearly score table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dimension {
    #[serde(rename = "LAWS")]
    Laws,
    Adoption,
    Procurement,
    Safety,
    Ethics,
    Interoperability,
}

impl Dimension {
    /// All dimensions, in score-table order.
    pub const ALL: [Dimension; 6] = [
        Dimension::Laws,
        Dimension::Adoption,
        Dimension::Procurement,
        Dimension::Safety,
        Dimension::Ethics,
        Dimension::Interoperability,
    ];

    /// Short code used as the key in `yearlyScores`.
    pub fn short_name(&self) -> &'static str {
        match self {
            Dimension::Laws => "LAWS",
            Dimension::Adoption => "Adoption",
            Dimension::Procurement => "Procurement",
            Dimension::Safety => "Safety",
            Dimension::Ethics => "Ethics",
            Dimension::Interoperability => "Interoperability",
        }
    }

    pub fn from_short_name(name: &str) -> Option<Dimension> {
        Self::ALL
            .into_iter()
            .find(|dim| dim.short_name().eq_ignore_ascii_case(name.trim()))
    }

    /// Policy area this dimension scores.
    pub fn area(&self) -> PolicyArea {
        match self {
            Dimension::Laws => PolicyArea::LawsEmployment,
            Dimension::Adoption => PolicyArea::AdoptionIntent,
            Dimension::Procurement => PolicyArea::Acquisition,
            Dimension::Safety => PolicyArea::TechnicalSafety,
            Dimension::Ethics => PolicyArea::EthicalGuidelines,
            Dimension::Interoperability => PolicyArea::Cooperation,
        }
    }

    /// Position in [`Dimension::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Dimension::Laws => 0,
            Dimension::Adoption => 1,
            Dimension::Procurement => 2,
            Dimension::Safety => 3,
            Dimension::Ethics => 4,
            Dimension::Interoperability => 5,
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}

/// The three kinds of source an entry can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    LegalDirectives,
    PolicyDocuments,
    PublicStatements,
}

impl SourceType {
    pub const ALL: [SourceType; 3] = [
        SourceType::LegalDirectives,
        SourceType::PolicyDocuments,
        SourceType::PublicStatements,
    ];

    /// Field name in the dataset.
    pub fn key(&self) -> &'static str {
        match self {
            SourceType::LegalDirectives => "legal_directives",
            SourceType::PolicyDocuments => "policy_documents",
            SourceType::PublicStatements => "public_statements",
        }
    }

    /// Compact label used in search results.
    pub fn short_label(&self) -> &'static str {
        match self {
            SourceType::LegalDirectives => "Legal",
            SourceType::PolicyDocuments => "Policy",
            SourceType::PublicStatements => "Statement",
        }
    }

    /// Full label used in exports.
    pub fn long_label(&self) -> &'static str {
        match self {
            SourceType::LegalDirectives => "Legal Directive",
            SourceType::PolicyDocuments => "Policy Document",
            SourceType::PublicStatements => "Public Statement",
        }
    }
}

/// Dataset form of an entry: either a bare string or `{ text, url? }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Text(String),
    Full {
        #[serde(default)]
        text: String,
        #[serde(default)]
        url: Option<String>,
    },
}

/// A single policy document, directive or statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "RawEntry")]
pub struct PolicyEntry {
    /// First line is the title (optionally ending in a date token),
    /// following lines are free-text details.
    pub text: String,
    /// Explicit link, when the dataset provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<RawEntry> for PolicyEntry {
    fn from(raw: RawEntry) -> Self {
        match raw {
            RawEntry::Text(text) => Self { text, url: None },
            RawEntry::Full { text, url } => Self {
                text,
                url: url.filter(|u| !u.trim().is_empty()),
            },
        }
    }
}

impl PolicyEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// The explicit URL if present, otherwise the first URL found in the text.
    pub fn resolved_url(&self) -> Option<String> {
        self.url
            .clone()
            .or_else(|| crate::annotation::extract_url(&self.text))
    }
}

/// Entries of one policy area, split by source type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AreaEntries {
    #[serde(default)]
    pub legal_directives: Vec<PolicyEntry>,
    #[serde(default)]
    pub policy_documents: Vec<PolicyEntry>,
    #[serde(default)]
    pub public_statements: Vec<PolicyEntry>,
}

impl AreaEntries {
    pub fn entries(&self, source: SourceType) -> &[PolicyEntry] {
        match source {
            SourceType::LegalDirectives => &self.legal_directives,
            SourceType::PolicyDocuments => &self.policy_documents,
            SourceType::PublicStatements => &self.public_statements,
        }
    }

    /// Mutable access to one source list.
    pub fn entries_mut(&mut self, source: SourceType) -> &mut Vec<PolicyEntry> {
        match source {
            SourceType::LegalDirectives => &mut self.legal_directives,
            SourceType::PolicyDocuments => &mut self.policy_documents,
            SourceType::PublicStatements => &mut self.public_statements,
        }
    }

    /// Every entry, tagged with its source type, in source order.
    pub fn iter(&self) -> impl Iterator<Item = (SourceType, &PolicyEntry)> + '_ {
        SourceType::ALL
            .into_iter()
            .flat_map(move |source| self.entries(source).iter().map(move |e| (source, e)))
    }

    pub fn len(&self) -> usize {
        self.legal_directives.len() + self.policy_documents.len() + self.public_statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A country's (or an alliance's) entries keyed by area name.
///
/// Area keys outside the six fixed areas are kept so that year-agnostic
/// totals and exports still see them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct CountryProfile {
    areas: BTreeMap<String, AreaEntries>,
}

impl CountryProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, creating the area on first use.
    pub fn push(&mut self, area: PolicyArea, source: SourceType, entry: PolicyEntry) {
        self.areas
            .entry(area.name().to_string())
            .or_default()
            .entries_mut(source)
            .push(entry);
    }

    pub fn area(&self, area: PolicyArea) -> Option<&AreaEntries> {
        self.areas.get(area.name())
    }

    /// Look up an area by its raw dataset key.
    pub fn area_by_name(&self, name: &str) -> Option<&AreaEntries> {
        self.areas.get(name)
    }

    /// Every area present in the profile, including unrecognised keys.
    pub fn all_areas(&self) -> impl Iterator<Item = (&str, &AreaEntries)> + '_ {
        self.areas.iter().map(|(name, entries)| (name.as_str(), entries))
    }

    /// Entries of the six fixed areas, in area order.
    pub fn tracked_entries(
        &self,
    ) -> impl Iterator<Item = (PolicyArea, SourceType, &PolicyEntry)> + '_ {
        PolicyArea::ALL.into_iter().flat_map(move |area| {
            self.area(area)
                .into_iter()
                .flat_map(move |entries| entries.iter().map(move |(source, e)| (area, source, e)))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.areas.values().all(AreaEntries::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_dimension_round_trip() {
        for area in PolicyArea::ALL {
            assert_eq!(area.dimension().area(), area);
            assert_eq!(PolicyArea::from_name(area.name()), Some(area));
        }
        for (idx, dim) in Dimension::ALL.iter().enumerate() {
            assert_eq!(dim.index(), idx);
            assert_eq!(Dimension::from_short_name(dim.short_name()), Some(*dim));
        }
        assert_eq!(PolicyArea::from_name("Training & Human-AI Interaction"), None);
    }

    #[test]
    fn test_entry_accepts_string_or_object() {
        let entries: Vec<PolicyEntry> = serde_json::from_str(
            r#"["Plain title (2020)", {"text": "Linked (Mar 2021)", "url": "https://a.example"}, {"url": ""}]"#,
        )
        .unwrap();

        assert_eq!(entries[0].text, "Plain title (2020)");
        assert!(entries[0].url.is_none());
        assert_eq!(entries[1].url.as_deref(), Some("https://a.example"));
        assert_eq!(entries[2].text, "");
        assert!(entries[2].url.is_none());
    }

    #[test]
    fn test_resolved_url_prefers_explicit() {
        let entry = PolicyEntry::new("Doc\nSee https://inline.example/x.")
            .with_url("https://explicit.example");
        assert_eq!(entry.resolved_url().as_deref(), Some("https://explicit.example"));

        let inline = PolicyEntry::new("Doc\nSee https://inline.example/x.");
        assert_eq!(inline.resolved_url().as_deref(), Some("https://inline.example/x"));
    }

    #[test]
    fn test_profile_deserializes_partial_areas() {
        let profile: CountryProfile = serde_json::from_str(
            r#"{
                "LAWS Employment/Deployment": { "policy_documents": ["A (2019)", "B (2020)"] },
                "Training & Human-AI Interaction": { "public_statements": ["C"] }
            }"#,
        )
        .unwrap();

        let laws = profile.area(PolicyArea::LawsEmployment).unwrap();
        assert_eq!(laws.len(), 2);
        assert!(laws.legal_directives.is_empty());
        assert!(profile.area(PolicyArea::Acquisition).is_none());
        assert_eq!(profile.all_areas().count(), 2);
        // Only the fixed areas are tracked.
        assert_eq!(profile.tracked_entries().count(), 2);
    }

    #[test]
    fn test_profile_push() {
        let mut profile = CountryProfile::new();
        assert!(profile.is_empty());
        profile.push(
            PolicyArea::Cooperation,
            SourceType::PublicStatements,
            PolicyEntry::new("Joint statement (2024)"),
        );
        let (area, source, entry) = profile.tracked_entries().next().unwrap();
        assert_eq!(area, PolicyArea::Cooperation);
        assert_eq!(source, SourceType::PublicStatements);
        assert_eq!(entry.text, "Joint statement (2024)");
        assert!(!profile.is_empty());
    }
}
