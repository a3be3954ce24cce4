//! The query facade used by front ends.
//!
//! [`PolicyAtlas`] owns the dataset together with everything derived from
//! it at load: the name registry, the voting table, the alliance rosters,
//! the quarter tables and the growth series. All queries take `&self`.
//!
//! Country arguments may use any known spelling; they are resolved to the
//! canonical key before lookup.

use atlas_common::{AtlasConfig, Result, Validate};
use serde::Serialize;
use std::io::Write;
use tracing::{debug, info, warn};

use crate::annotation::{parse_entry, ParsedEntry};
use crate::counters::{self, CountTarget, MemberContribution, SourceFilter};
use crate::dataset::Dataset;
use crate::export;
use crate::groups::{members_with_profile, members_without_profile, Groupings};
use crate::model::{CountryProfile, Dimension, PolicyArea, PolicyEntry, SourceType};
use crate::momentum::{self, MomentumStat, MomentumThresholds};
use crate::names::{NameDiagnostics, NameRegistry};
use crate::search::{self, CountryMatch, KeywordResults, SearchError};
use crate::similarity::{SimilarityBreakdown, SimilarityEngine, SimilarityWeights, YearPoint};
use crate::timeline::{self, GrowthSeries, MapSnapshot, QuarterTable, ViewMode};
use crate::voting::VotingTable;

/// Tunables taken from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EngineSettings {
    pub momentum: MomentumThresholds,
    pub similarity: SimilarityWeights,
}

impl From<&AtlasConfig> for EngineSettings {
    fn from(config: &AtlasConfig) -> Self {
        Self {
            momentum: MomentumThresholds::from(&config.momentum),
            similarity: SimilarityWeights::from(&config.similarity),
        }
    }
}

/// Dataset-wide totals for the landing view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AtlasSummary {
    pub countries: usize,
    pub alliances: usize,
    pub entries: usize,
    pub scored_countries: usize,
    pub unresolved_names: Vec<String>,
}

/// Alliance roster split by dataset coverage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllianceCoverage {
    pub name: String,
    pub full_name: String,
    pub with_profile: Vec<String>,
    pub without_profile: Vec<String>,
}

/// Immutable, fully precomputed policy engine.
#[derive(Debug, Clone)]
pub struct PolicyAtlas {
    dataset: Dataset,
    names: NameRegistry,
    voting: VotingTable,
    groupings: Groupings,
    quarters: QuarterTable,
    growth: GrowthSeries,
    diagnostics: NameDiagnostics,
    settings: EngineSettings,
}

impl PolicyAtlas {
    /// Build every derived table for `dataset`.
    pub fn new(dataset: Dataset, settings: EngineSettings) -> Self {
        let names = NameRegistry::for_dataset(dataset.country_keys());
        if let Err(e) = names.validate() {
            warn!(error = %e, "Country name registry has conflicting aliases");
        }

        let mut diagnostics = NameDiagnostics::default();
        let voting = VotingTable::builtin(&names, &mut diagnostics);
        let groupings = Groupings::builtin(&names, &mut diagnostics);
        let quarters = QuarterTable::build(&dataset.countries);
        let growth = GrowthSeries::build(&dataset.countries);

        info!(
            countries = dataset.countries.len(),
            alliances = dataset.alliances.len(),
            scored_countries = dataset.yearly_scores.len(),
            unresolved_names = diagnostics.unresolved().count(),
            "Loaded policy dataset"
        );

        Self {
            dataset,
            names,
            voting,
            groupings,
            quarters,
            growth,
            diagnostics,
            settings,
        }
    }

    /// Parse the JSON document and build the engine.
    pub fn from_json_str(json: &str, settings: EngineSettings) -> Result<Self> {
        Ok(Self::new(Dataset::from_json_str(json)?, settings))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn names(&self) -> &NameRegistry {
        &self.names
    }

    pub fn groupings(&self) -> &Groupings {
        &self.groupings
    }

    pub fn voting(&self) -> &VotingTable {
        &self.voting
    }

    /// Names in the static tables that did not resolve at load.
    pub fn diagnostics(&self) -> &NameDiagnostics {
        &self.diagnostics
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Canonical key for any known spelling; unknown names pass through trimmed.
    pub fn resolve<'a>(&'a self, raw: &'a str) -> &'a str {
        self.names.canonical(raw)
    }

    pub fn display_name<'a>(&'a self, country: &'a str) -> &'a str {
        self.names.display_name(self.resolve(country))
    }

    pub fn profile(&self, country: &str) -> Option<&CountryProfile> {
        self.dataset.country(self.resolve(country))
    }

    pub fn summary(&self, key: &str) -> Option<&str> {
        self.dataset
            .summary(self.resolve(key))
            .or_else(|| self.dataset.summary(key))
    }

    pub fn overview(&self) -> AtlasSummary {
        AtlasSummary {
            countries: self.dataset.countries.len(),
            alliances: self.dataset.alliances.len(),
            entries: self
                .dataset
                .countries
                .values()
                .map(|p| counters::count_profile(p, &SourceFilter::all()))
                .sum(),
            scored_countries: self.dataset.yearly_scores.len(),
            unresolved_names: self.diagnostics.unresolved().map(str::to_string).collect(),
        }
    }

    // ------------------------------------------------------------------
    // Entries
    // ------------------------------------------------------------------

    pub fn parse_entry(&self, text: &str) -> ParsedEntry {
        parse_entry(text)
    }

    /// The `index`-th entry of a country's area, counting across the source
    /// lists in order.
    pub fn entry(
        &self,
        country: &str,
        area: PolicyArea,
        index: usize,
    ) -> Option<(SourceType, &PolicyEntry)> {
        self.profile(country)?.area(area)?.iter().nth(index)
    }

    // ------------------------------------------------------------------
    // Timeline
    // ------------------------------------------------------------------

    pub fn quarter_index(&self, date: &str) -> Option<usize> {
        timeline::quarter_index(date)
    }

    pub fn cumulative_count(&self, country: &str, q: usize) -> usize {
        self.quarters.cumulative_count(self.resolve(country), q)
    }

    pub fn yearly_count(&self, country: &str, q: usize) -> usize {
        self.quarters.yearly_count(self.resolve(country), q)
    }

    pub fn quarter_series(&self, country: &str, mode: ViewMode) -> Vec<usize> {
        self.quarters.series(self.resolve(country), mode)
    }

    pub fn map_snapshot(&self, q: usize, mode: ViewMode) -> MapSnapshot {
        self.quarters.snapshot(q, mode)
    }

    pub fn growth(&self) -> &GrowthSeries {
        &self.growth
    }

    pub fn entries_up_to_year(&self, country: &str, year: i32) -> usize {
        self.profile(country)
            .map_or(0, |p| timeline::entries_up_to_year(p, year))
    }

    pub fn area_emergence_year(&self, country: &str, dimension: Dimension) -> Option<i32> {
        timeline::area_emergence_year(self.profile(country)?, dimension)
    }

    // ------------------------------------------------------------------
    // Momentum
    // ------------------------------------------------------------------

    pub fn classify_momentum(&self, country: &str) -> Option<MomentumStat> {
        let key = self.resolve(country);
        let profile = self.dataset.country(key)?;
        momentum::classify_country(key, profile, &self.names, &self.settings.momentum)
    }

    /// Every country with at least one tracked entry.
    pub fn momentum(&self) -> Vec<MomentumStat> {
        momentum::classify_all(&self.dataset.countries, &self.names, &self.settings.momentum)
    }

    // ------------------------------------------------------------------
    // Similarity
    // ------------------------------------------------------------------

    pub fn similarity(&self) -> SimilarityEngine<'_> {
        SimilarityEngine::new(
            &self.dataset.yearly_scores,
            &self.voting,
            self.settings.similarity,
        )
    }

    pub fn pairwise_similarity(&self, a: &str, b: &str, year: i32) -> Option<f64> {
        self.similarity()
            .pairwise(self.resolve(a), self.resolve(b), year)
    }

    pub fn similarity_breakdown(&self, a: &str, b: &str, year: i32) -> Option<SimilarityBreakdown> {
        self.similarity()
            .breakdown(self.resolve(a), self.resolve(b), year)
    }

    pub fn similarity_series(&self, a: &str, b: &str) -> Vec<YearPoint> {
        self.similarity().series(self.resolve(a), self.resolve(b))
    }

    /// Resolved, de-duplicated members that have a country profile.
    fn profiled_members<'a>(&'a self, members: &[&'a str]) -> Vec<&'a str> {
        let mut keys: Vec<&str> = Vec::with_capacity(members.len());
        for &member in members {
            let key = self.resolve(member);
            if self.dataset.has_country(key) && !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Mean pairwise similarity among the members that have a profile.
    pub fn group_similarity(&self, members: &[&str], year: i32) -> Option<f64> {
        let keys = self.profiled_members(members);
        debug!(requested = members.len(), profiled = keys.len(), year, "Group similarity");
        self.similarity().group_similarity(&keys, year)
    }

    pub fn group_similarity_series(&self, members: &[&str]) -> Vec<YearPoint> {
        let keys = self.profiled_members(members);
        self.similarity().group_series(&keys)
    }

    /// Similarity series of a named grouping ("NATO Members", "Five Eyes", ...)
    /// or of the grouping shown for an alliance ("FVEY").
    pub fn grouping_series(&self, name: &str) -> Option<Vec<YearPoint>> {
        let grouping = self
            .groupings
            .grouping(name)
            .or_else(|| self.groupings.grouping_for_alliance(name))?;
        Some(self.group_similarity_series(&grouping.member_refs()))
    }

    // ------------------------------------------------------------------
    // Counters
    // ------------------------------------------------------------------

    pub fn count_entries(&self, target: &CountTarget, filter: &SourceFilter) -> usize {
        match target {
            CountTarget::Country { country } => self
                .profile(country)
                .map_or(0, |p| counters::count_profile(p, filter)),
            CountTarget::CountryArea { country, area } => self
                .profile(country)
                .and_then(|p| p.area(*area))
                .map_or(0, |a| counters::count_area(a, filter)),
            CountTarget::Area { area } => self
                .dataset
                .countries
                .values()
                .filter_map(|p| p.area(*area))
                .map(|a| counters::count_area(a, filter))
                .sum(),
            CountTarget::Alliance { alliance } => self
                .alliance_profile(alliance)
                .map_or(0, |p| counters::count_profile(p, filter)),
        }
    }

    fn alliance_profile(&self, alliance: &str) -> Option<&CountryProfile> {
        self.dataset.alliance(alliance.trim()).or_else(|| {
            let known = self.groupings.alliance(alliance)?;
            self.dataset.alliance(&known.name)
        })
    }

    pub fn member_contributions(
        &self,
        alliance: &str,
        filter: &SourceFilter,
    ) -> Option<Vec<MemberContribution>> {
        let alliance = self.groupings.alliance(alliance)?;
        Some(counters::member_contributions(
            &alliance.members,
            &self.dataset.countries,
            &self.names,
            filter,
        ))
    }

    pub fn alliance_coverage(&self, alliance: &str) -> Option<AllianceCoverage> {
        let alliance = self.groupings.alliance(alliance)?;
        let owned = |keys: Vec<&str>| keys.into_iter().map(str::to_string).collect();
        Some(AllianceCoverage {
            name: alliance.name.clone(),
            full_name: alliance.full_name.clone(),
            with_profile: owned(members_with_profile(&alliance.members, &self.dataset.countries)),
            without_profile: owned(members_without_profile(
                &alliance.members,
                &self.dataset.countries,
            )),
        })
    }

    // ------------------------------------------------------------------
    // Search and export
    // ------------------------------------------------------------------

    pub fn keyword_search(&self, keyword: &str) -> std::result::Result<KeywordResults, SearchError> {
        search::keyword_search(&self.dataset.countries, keyword)
    }

    pub fn country_search(&self, query: &str) -> CountryMatch {
        search::country_search(self.dataset.country_keys(), &self.names, query)
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<usize> {
        export::write_csv(&self.dataset.countries, &self.names, writer)
    }
}
