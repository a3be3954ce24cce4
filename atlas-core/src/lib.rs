//! Atlas Core - Policy similarity and temporal aggregation engine.
//!
//! This crate turns a static dataset of national defense-AI policy entries
//! (legal directives, policy documents, public statements) into the numbers
//! behind the policy atlas dashboard:
//! - Quarterly and yearly entry counts for the world map and growth chart
//! - Pairwise and group policy similarity, adjusted by UN voting stances
//! - Momentum classification of recent versus historical activity
//! - Entry counts per country, area and alliance
//!
//! ## Architecture
//!
//! ```text
//! JSON ─→ Dataset ─→ PolicyAtlas::new ─┬─ NameRegistry (aliases, display names)
//!                                      ├─ VotingTable, Groupings (resolved rosters)
//!                                      ├─ QuarterTable, GrowthSeries (eager)
//!                                      └─ queries: similarity, momentum, counters,
//!                                                  search, export
//! ```
//!
//! Everything after construction is read-only. UI selection state lives in
//! a separate [`Session`] value owned by the caller.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod annotation;
pub mod counters;
pub mod dataset;
pub mod engine;
pub mod export;
pub mod groups;
pub mod model;
pub mod momentum;
pub mod names;
pub mod scores;
pub mod search;
pub mod session;
pub mod similarity;
pub mod timeline;
pub mod voting;

// Re-export commonly used types
pub use annotation::{parse_entry, EntryDate, ParsedEntry};
pub use counters::{CountTarget, MemberContribution, SourceFilter};
pub use dataset::Dataset;
pub use engine::{AllianceCoverage, AtlasSummary, EngineSettings, PolicyAtlas};
pub use groups::{Alliance, Grouping, Groupings};
pub use model::{AreaEntries, CountryProfile, Dimension, PolicyArea, PolicyEntry, SourceType};
pub use momentum::{MomentumCategory, MomentumStat, MomentumThresholds, Region};
pub use names::{NameDiagnostics, NameRegistry};
pub use scores::{DimensionScores, YearlyScoreTable};
pub use search::{CountryMatch, KeywordResults, SearchError};
pub use session::{CompareToggle, Session, View};
pub use similarity::{SimilarityBreakdown, SimilarityEngine, SimilarityWeights, YearPoint};
pub use timeline::{quarter_index, GrowthSeries, MapSnapshot, QuarterTable, ViewMode};
pub use voting::{Stance, VotingTable};
