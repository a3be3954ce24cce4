//! Entry counts per area, country and alliance.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{AreaEntries, CountryProfile, PolicyArea, SourceType};
use crate::names::NameRegistry;

/// Which source lists a count includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFilter {
    #[serde(default = "enabled")]
    pub legal_directives: bool,
    #[serde(default = "enabled")]
    pub policy_documents: bool,
    #[serde(default = "enabled")]
    pub public_statements: bool,
}

fn enabled() -> bool {
    true
}

impl Default for SourceFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl SourceFilter {
    pub fn all() -> Self {
        Self {
            legal_directives: true,
            policy_documents: true,
            public_statements: true,
        }
    }

    pub fn none() -> Self {
        Self {
            legal_directives: false,
            policy_documents: false,
            public_statements: false,
        }
    }

    pub fn only(source: SourceType) -> Self {
        Self::none().with(source, true)
    }

    pub fn with(mut self, source: SourceType, included: bool) -> Self {
        match source {
            SourceType::LegalDirectives => self.legal_directives = included,
            SourceType::PolicyDocuments => self.policy_documents = included,
            SourceType::PublicStatements => self.public_statements = included,
        }
        self
    }

    pub fn includes(&self, source: SourceType) -> bool {
        match source {
            SourceType::LegalDirectives => self.legal_directives,
            SourceType::PolicyDocuments => self.policy_documents,
            SourceType::PublicStatements => self.public_statements,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.legal_directives || self.policy_documents || self.public_statements)
    }
}

/// Entries of the selected lists of one area.
pub fn count_area(area: &AreaEntries, filter: &SourceFilter) -> usize {
    SourceType::ALL
        .into_iter()
        .filter(|source| filter.includes(*source))
        .map(|source| area.entries(source).len())
        .sum()
}

/// Entries of the selected lists over every area of a profile, unrecognised
/// area keys included.
pub fn count_profile(profile: &CountryProfile, filter: &SourceFilter) -> usize {
    profile
        .all_areas()
        .map(|(_, area)| count_area(area, filter))
        .sum()
}

/// Like [`count_profile`] but only over the six fixed areas.
pub fn count_tracked(profile: &CountryProfile, filter: &SourceFilter) -> usize {
    PolicyArea::ALL
        .into_iter()
        .filter_map(|area| profile.area(area))
        .map(|area| count_area(area, filter))
        .sum()
}

/// What to count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CountTarget {
    /// Every area of one country.
    Country { country: String },
    /// One area of one country.
    CountryArea { country: String, area: PolicyArea },
    /// One area summed over every country.
    Area { area: PolicyArea },
    /// The alliance's own aggregate profile.
    Alliance { alliance: String },
}

/// A member's share of an alliance view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberContribution {
    pub country: String,
    pub display_name: String,
    pub total: usize,
    pub by_area: BTreeMap<PolicyArea, usize>,
}

/// Contributions of the members that have a profile and at least one
/// entry in the six fixed areas, largest first. Ties keep member order.
pub fn member_contributions<S: AsRef<str>>(
    members: &[S],
    countries: &BTreeMap<String, CountryProfile>,
    names: &NameRegistry,
    filter: &SourceFilter,
) -> Vec<MemberContribution> {
    let mut contributions: Vec<MemberContribution> = members
        .iter()
        .filter_map(|member| {
            let member = member.as_ref();
            let profile = countries.get(member)?;
            let by_area: BTreeMap<PolicyArea, usize> = PolicyArea::ALL
                .into_iter()
                .map(|area| (area, profile.area(area).map_or(0, |a| count_area(a, filter))))
                .collect();
            let total = by_area.values().sum();
            (total > 0).then(|| MemberContribution {
                country: member.to_string(),
                display_name: names.display_name(member).to_string(),
                total,
                by_area,
            })
        })
        .collect();
    contributions.sort_by(|a, b| b.total.cmp(&a.total));
    contributions
}
