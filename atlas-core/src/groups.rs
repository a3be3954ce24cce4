//! Fixed alliances and the country groupings tracked on the convergence chart.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::model::CountryProfile;
use crate::names::{NameDiagnostics, NameRegistry};

struct AllianceDef {
    name: &'static str,
    full_name: &'static str,
    members: &'static [&'static str],
    grouping: &'static str,
}

struct GroupingDef {
    name: &'static str,
    description: &'static str,
    members: &'static [&'static str],
}

const ALLIANCES: &[AllianceDef] = &[
    AllianceDef {
        name: "NATO",
        full_name: "North Atlantic Treaty Organization (NATO)",
        members: &[
            "USA", "UK", "France", "Germany", "Turkey", "Estonia", "Norway", "Canada", "Belgium",
            "Bulgaria", "Croatia", "Czechia", "Denmark", "Finland", "Greece", "Hungary",
            "Iceland", "Italy", "Latvia", "Lithuania", "Luxembourg", "Montenegro", "Netherlands",
            "North Macedonia", "Poland", "Portugal", "Romania", "Slovakia", "Slovenia", "Spain",
            "Sweden", "Albania",
        ],
        grouping: "NATO Members",
    },
    AllianceDef {
        name: "AUKUS",
        full_name: "AUKUS (Australia, UK, US)",
        members: &["USA", "UK", "Australia"],
        grouping: "AUKUS",
    },
    AllianceDef {
        name: "FVEY",
        full_name: "Five Eyes (FVEY)",
        members: &["USA", "UK", "Australia", "Canada", "New Zealand"],
        grouping: "Five Eyes",
    },
];

const GROUPINGS: &[GroupingDef] = &[
    GroupingDef {
        name: "NATO Members",
        description: "NATO alliance members",
        members: &[
            "USA", "UK", "France", "Germany", "Italy", "Canada", "Spain", "Netherlands",
            "Belgium", "Poland", "Norway", "Denmark", "Turkey", "Greece", "Hungary", "Czechia",
            "Estonia", "Latvia", "Lithuania", "Croatia", "Bulgaria",
        ],
    },
    GroupingDef {
        name: "AUKUS",
        description: "AUKUS security partnership",
        members: &["USA", "UK", "Australia"],
    },
    GroupingDef {
        name: "Five Eyes",
        description: "Five Eyes intelligence alliance",
        members: &["USA", "UK", "Canada", "Australia", "New Zealand"],
    },
];

/// A named alliance with its member roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alliance {
    pub name: String,
    pub full_name: String,
    /// Canonical keys.
    pub members: Vec<String>,
    /// Convergence grouping shown for this alliance.
    pub grouping: String,
}

/// A set of countries compared on the convergence chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grouping {
    pub name: String,
    pub description: String,
    /// Canonical keys.
    pub members: Vec<String>,
}

impl Grouping {
    pub fn member_refs(&self) -> Vec<&str> {
        self.members.iter().map(String::as_str).collect()
    }
}

/// Alliances and groupings with members resolved to canonical keys.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Groupings {
    alliances: Vec<Alliance>,
    groupings: Vec<Grouping>,
}

fn resolve_members(
    members: &[&str],
    names: &NameRegistry,
    diagnostics: &mut NameDiagnostics,
) -> Vec<String> {
    members
        .iter()
        .map(|&raw| {
            names
                .resolve_or_report(raw, diagnostics)
                .unwrap_or(raw)
                .to_string()
        })
        .collect()
}

impl Groupings {
    /// The built-in rosters, resolved through `names`.
    pub fn builtin(names: &NameRegistry, diagnostics: &mut NameDiagnostics) -> Self {
        let alliances = ALLIANCES
            .iter()
            .map(|def| Alliance {
                name: def.name.to_string(),
                full_name: def.full_name.to_string(),
                members: resolve_members(def.members, names, diagnostics),
                grouping: def.grouping.to_string(),
            })
            .collect();
        let groupings = GROUPINGS
            .iter()
            .map(|def| Grouping {
                name: def.name.to_string(),
                description: def.description.to_string(),
                members: resolve_members(def.members, names, diagnostics),
            })
            .collect();
        Self {
            alliances,
            groupings,
        }
    }

    pub fn alliances(&self) -> &[Alliance] {
        &self.alliances
    }

    pub fn groupings(&self) -> &[Grouping] {
        &self.groupings
    }

    /// Alliance by short name, case-insensitive.
    pub fn alliance(&self, name: &str) -> Option<&Alliance> {
        let name = name.trim();
        self.alliances
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Grouping by name, case-insensitive.
    pub fn grouping(&self, name: &str) -> Option<&Grouping> {
        let name = name.trim();
        self.groupings
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(name))
    }

    /// The convergence grouping shown for an alliance.
    pub fn grouping_for_alliance(&self, alliance: &str) -> Option<&Grouping> {
        self.alliance(alliance)
            .and_then(|a| self.grouping(&a.grouping))
    }

    /// Alliance names a country belongs to.
    pub fn memberships(&self, country: &str) -> Vec<&str> {
        self.alliances
            .iter()
            .filter(|a| a.members.iter().any(|m| m == country))
            .map(|a| a.name.as_str())
            .collect()
    }
}

/// Members that have no country profile in the dataset.
pub fn members_without_profile<'a>(
    members: &'a [String],
    countries: &BTreeMap<String, CountryProfile>,
) -> Vec<&'a str> {
    members
        .iter()
        .filter(|m| !countries.contains_key(m.as_str()))
        .map(String::as_str)
        .collect()
}

/// Members that do have a country profile, in roster order.
pub fn members_with_profile<'a>(
    members: &'a [String],
    countries: &BTreeMap<String, CountryProfile>,
) -> Vec<&'a str> {
    members
        .iter()
        .filter(|m| countries.contains_key(m.as_str()))
        .map(String::as_str)
        .collect()
}
