//! Novelty evaluation for a proposed fusion

use serde::Serialize;

use crate::corpus::{DocumentIndex, Domain, SearchQuery};
use crate::error::{FusionError, FusionResult, IndexCall};

/// Score assigned when nothing in the corpus resembles the proposal
pub const UNPRECEDENTED_SCORE: f32 = 0.95;

/// How many similar concepts are reported back
const REPORTED_SIMILAR: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoveltyTier {
    VeryHigh,
    High,
    Moderate,
    Low,
    VeryLow,
}

impl NoveltyTier {
    pub fn from_score(score: f32) -> Self {
        if score >= 0.8 {
            NoveltyTier::VeryHigh
        } else if score >= 0.6 {
            NoveltyTier::High
        } else if score >= 0.4 {
            NoveltyTier::Moderate
        } else if score >= 0.2 {
            NoveltyTier::Low
        } else {
            NoveltyTier::VeryLow
        }
    }

    pub fn assessment(&self) -> &'static str {
        match self {
            NoveltyTier::VeryHigh => {
                "Very high novelty: a connection the corpus has not explored. Strong potential for a theoretical contribution."
            }
            NoveltyTier::High => {
                "High novelty: rarely made before. Worth exploring in depth."
            }
            NoveltyTier::Moderate => {
                "Moderate novelty: some prior work exists, but a new angle is still possible."
            }
            NoveltyTier::Low => {
                "Low novelty: a well-studied connection. It needs a differentiation strategy."
            }
            NoveltyTier::VeryLow => {
                "Very low novelty: a well-known connection. Look for a different angle."
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SimilarConcept {
    pub id: String,
    pub title: String,
    pub domain: Domain,
    pub similarity: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoveltyEvaluation {
    pub proposal: String,
    pub score: f32,
    pub tier: NoveltyTier,
    pub similar_existing: Vec<SimilarConcept>,
    pub assessment: &'static str,
    pub improvement: &'static str,
}

/// Compare a proposal against its `k` nearest corpus neighbours
///
/// Score is `1 - max similarity`, or `UNPRECEDENTED_SCORE` when no
/// neighbour has positive similarity.
pub fn evaluate_novelty(
    index: &dyn DocumentIndex,
    proposal: &str,
    k: usize,
) -> FusionResult<NoveltyEvaluation> {
    let hits = index
        .search(&SearchQuery::text(proposal), None, k.max(1))
        .map_err(|e| FusionError::index(IndexCall::Search, e))?;

    let similar: Vec<SimilarConcept> = hits
        .into_iter()
        .filter(|h| h.similarity > 0.0)
        .map(|h| SimilarConcept {
            id: h.document.id,
            title: h.document.title,
            domain: h.document.domain,
            similarity: h.similarity,
        })
        .collect();

    let score = similar
        .iter()
        .map(|s| s.similarity)
        .reduce(f32::max)
        .map(|max| (1.0 - max).clamp(0.0, 1.0))
        .unwrap_or(UNPRECEDENTED_SCORE);

    let tier = NoveltyTier::from_score(score);
    Ok(NoveltyEvaluation {
        proposal: proposal.to_string(),
        score,
        tier,
        similar_existing: similar.into_iter().take(REPORTED_SIMILAR).collect(),
        assessment: tier.assessment(),
        improvement: improvement_for(score),
    })
}

fn improvement_for(score: f32) -> &'static str {
    if score < 0.4 {
        "Apply a different fusion pattern or bring in a third concept to set the idea apart."
    } else if score < 0.7 {
        "Focus on an aspect existing work leaves untouched, or approach it at another scale."
    } else {
        "Keep the novelty and make the theoretical contribution concrete."
    }
}
