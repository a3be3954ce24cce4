//! Pairwise and group policy similarity.
//!
//! Similarity of two countries in a year blends two agreements over the
//! six scoring dimensions:
//!
//! - **presence**: do both sides have (or both lack) data for a dimension,
//!   over the dimensions where at least one side has data;
//! - **substance**: `1 - |a - b| / scale`, averaged over the dimensions
//!   both sides scored.
//!
//! The blend is then adjusted by the pair's UN voting stances and clamped
//! to `[0, 1]`.

use atlas_common::SimilarityConfig;
use serde::Serialize;
use tracing::debug;

use crate::scores::{DimensionScores, YearlyScoreTable};
use crate::timeline::horizon_years;
use crate::voting::{Stance, VotingTable};

/// Blend weights and score scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarityWeights {
    pub presence: f64,
    pub substance: f64,
    /// Applied to presence alone when no dimension is scored on both sides.
    pub presence_only: f64,
    pub scale: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self::from(&SimilarityConfig::default())
    }
}

impl From<&SimilarityConfig> for SimilarityWeights {
    fn from(config: &SimilarityConfig) -> Self {
        Self {
            presence: config.presence_weight,
            substance: config.substance_weight,
            presence_only: config.presence_only_weight,
            scale: config.score_scale,
        }
    }
}

/// Dimension agreement of two score rows, before any voting adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreAgreement {
    pub presence: f64,
    /// `None` when no dimension is scored on both sides.
    pub substance: Option<f64>,
    /// Dimensions scored on both sides.
    pub shared_dimensions: usize,
    /// Dimensions scored on at least one side.
    pub relevant_dimensions: usize,
    pub base: f64,
}

/// Compare two score rows.
///
/// Returns `None` when either row has no scored dimension at all.
pub fn compare_scores(
    a: &DimensionScores,
    b: &DimensionScores,
    weights: &SimilarityWeights,
) -> Option<ScoreAgreement> {
    if a.present_count() == 0 || b.present_count() == 0 {
        return None;
    }

    let mut agreeing = 0usize;
    let mut relevant = 0usize;
    let mut shared = 0usize;
    let mut substance_sum = 0.0;

    for ((_, va), (_, vb)) in a.iter().zip(b.iter()) {
        if va.is_some() || vb.is_some() {
            relevant += 1;
            if va.is_some() == vb.is_some() {
                agreeing += 1;
            }
        }
        if let (Some(va), Some(vb)) = (va, vb) {
            substance_sum += 1.0 - (va - vb).abs() / weights.scale;
            shared += 1;
        }
    }

    // relevant > 0 because both rows have at least one score
    let presence = agreeing as f64 / relevant as f64;
    let substance = (shared > 0).then(|| substance_sum / shared as f64);
    let base = match substance {
        Some(substance) => weights.presence * presence + weights.substance * substance,
        None => weights.presence_only * presence,
    };

    Some(ScoreAgreement {
        presence,
        substance,
        shared_dimensions: shared,
        relevant_dimensions: relevant,
        base,
    })
}

/// Everything that went into one similarity value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityBreakdown {
    pub year: i32,
    #[serde(flatten)]
    pub agreement: ScoreAgreement,
    pub stance_a: Stance,
    pub stance_b: Stance,
    pub penalty: f64,
    pub similarity: f64,
}

/// One point of a similarity time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearPoint {
    pub year: i32,
    pub similarity: Option<f64>,
}

/// Similarity queries over the yearly score table and the voting records.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityEngine<'a> {
    scores: &'a YearlyScoreTable,
    voting: &'a VotingTable,
    weights: SimilarityWeights,
}

impl<'a> SimilarityEngine<'a> {
    pub fn new(
        scores: &'a YearlyScoreTable,
        voting: &'a VotingTable,
        weights: SimilarityWeights,
    ) -> Self {
        Self {
            scores,
            voting,
            weights,
        }
    }

    pub fn weights(&self) -> &SimilarityWeights {
        &self.weights
    }

    /// Full breakdown for a pair of canonical keys in `year`.
    pub fn breakdown(&self, a: &str, b: &str, year: i32) -> Option<SimilarityBreakdown> {
        let scores_a = self.scores.scores(a, year)?;
        let scores_b = self.scores.scores(b, year)?;
        let agreement = compare_scores(scores_a, scores_b, &self.weights)?;

        let stance_a = self.voting.stance(a, year);
        let stance_b = self.voting.stance(b, year);
        let penalty = crate::voting::stance_penalty(stance_a, stance_b);
        let similarity = (agreement.base - penalty).clamp(0.0, 1.0);

        Some(SimilarityBreakdown {
            year,
            agreement,
            stance_a,
            stance_b,
            penalty,
            similarity,
        })
    }

    /// Similarity in `[0, 1]`, or `None` when either side lacks data.
    pub fn pairwise(&self, a: &str, b: &str, year: i32) -> Option<f64> {
        self.breakdown(a, b, year).map(|b| b.similarity)
    }

    /// Pairwise similarity for every horizon year.
    pub fn series(&self, a: &str, b: &str) -> Vec<YearPoint> {
        horizon_years()
            .map(|year| YearPoint {
                year,
                similarity: self.pairwise(a, b, year),
            })
            .collect()
    }

    /// Mean of the defined pairwise similarities among `members`.
    ///
    /// Callers pass only members that have a country profile. `None` when
    /// fewer than two members are given or no pair is defined.
    pub fn group_similarity(&self, members: &[&str], year: i32) -> Option<f64> {
        if members.len() < 2 {
            return None;
        }

        let mut sum = 0.0;
        let mut defined = 0usize;
        for (i, a) in members.iter().enumerate() {
            for b in &members[i + 1..] {
                if let Some(similarity) = self.pairwise(a, b, year) {
                    sum += similarity;
                    defined += 1;
                }
            }
        }

        debug!(
            members = members.len(),
            defined_pairs = defined,
            year,
            "Computed group similarity"
        );
        (defined > 0).then(|| sum / defined as f64)
    }

    pub fn group_series(&self, members: &[&str]) -> Vec<YearPoint> {
        horizon_years()
            .map(|year| YearPoint {
                year,
                similarity: self.group_similarity(members, year),
            })
            .collect()
    }
}
