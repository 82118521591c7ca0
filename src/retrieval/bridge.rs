//! BridgeFinder - cross-domain partner search with hybrid re-ranking

use std::sync::Arc;

use rayon::prelude::*;

use crate::corpus::similarity::jaccard;
use crate::corpus::{Document, DocumentIndex, Domain, DomainFilter, SearchQuery};
use crate::error::{FusionError, FusionResult, IndexCall};
use crate::signature::SignatureCache;

/// Retrieval configuration for BridgeFinder
///
/// See `RetrievalSection` in project config for persistence.
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Weight of the embedding cosine term (default: 1.0)
    pub embedding_weight: f32,
    /// Weight of the dynamics-tag Jaccard term (default: 1.0)
    pub structural_weight: f32,
    /// Over-fetch multiplier so the structural term can re-rank (default: 4)
    pub over_fetch_factor: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            embedding_weight: 1.0,
            structural_weight: 1.0,
            over_fetch_factor: 4,
        }
    }
}

impl RetrievalConfig {
    /// Weights scaled to sum to 1; equal split when both are unusable
    pub fn normalized_weights(&self) -> (f32, f32) {
        let e = self.embedding_weight.max(0.0);
        let s = self.structural_weight.max(0.0);
        let total = e + s;
        if total > 0.0 && total.is_finite() {
            (e / total, s / total)
        } else {
            (0.5, 0.5)
        }
    }
}

/// A candidate partner concept from another domain
#[derive(Debug, Clone)]
pub struct Bridge {
    pub document: Document,
    pub hybrid_score: f32,
    /// Cosine similarity reported by the index
    pub semantic: f32,
    /// Jaccard of dynamics tags
    pub structural: f32,
    pub shared_dynamics: Vec<String>,
}

/// Finds partner concepts across domain boundaries
#[derive(Clone)]
pub struct BridgeFinder {
    index: Arc<dyn DocumentIndex>,
    signatures: Arc<SignatureCache>,
    config: RetrievalConfig,
}

impl BridgeFinder {
    pub fn new(
        index: Arc<dyn DocumentIndex>,
        signatures: Arc<SignatureCache>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            index,
            signatures,
            config,
        }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Up to `k` documents outside `exclude_domain`, best hybrid score first
    ///
    /// Returns fewer than `k` when the index has fewer candidates. The source
    /// document itself is never returned.
    pub fn find_bridges(
        &self,
        source: &Document,
        exclude_domain: Domain,
        k: usize,
    ) -> FusionResult<Vec<Bridge>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let filter = DomainFilter::excluding(exclude_domain);
        let fetch_limit = k.saturating_mul(self.config.over_fetch_factor.max(1));
        let query = if source.embedding.is_empty() {
            SearchQuery::Text(source.full_text())
        } else {
            SearchQuery::Vector(source.embedding.clone())
        };

        let hits = self
            .index
            .search(&query, Some(&filter), fetch_limit)
            .map_err(|e| {
                tracing::warn!(index = self.index.name(), error = %e, "bridge search failed");
                FusionError::index(IndexCall::Search, e)
            })?;

        let candidates: Vec<_> = hits
            .into_iter()
            .filter(|h| h.document.id != source.id && h.document.domain != exclude_domain)
            .collect();

        let source_signature = self.signatures.get(source);
        let signatures: Vec<_> = candidates
            .par_iter()
            .map(|h| self.signatures.get(&h.document))
            .collect();

        let (w_embed, w_struct) = self.config.normalized_weights();
        let semantic_only = source_signature.is_uninformative();

        let mut bridges: Vec<Bridge> = candidates
            .into_iter()
            .zip(signatures)
            .map(|(hit, signature)| {
                let semantic = hit.similarity;
                let structural = jaccard(&source_signature.dynamics_tags, &signature.dynamics_tags);
                let hybrid_score = if semantic_only {
                    semantic.max(0.0)
                } else {
                    w_embed * semantic.max(0.0) + w_struct * structural
                };
                let shared_dynamics = source_signature
                    .dynamics_tags
                    .intersection(&signature.dynamics_tags)
                    .cloned()
                    .collect();
                Bridge {
                    document: hit.document,
                    hybrid_score,
                    semantic,
                    structural,
                    shared_dynamics,
                }
            })
            .collect();

        bridges.sort_by(|a, b| {
            b.hybrid_score
                .total_cmp(&a.hybrid_score)
                .then_with(|| a.document.id.cmp(&b.document.id))
        });
        bridges.truncate(k);

        tracing::debug!(
            source = %source.id,
            excluded = %exclude_domain,
            returned = bridges.len(),
            semantic_only,
            "bridges ranked"
        );
        Ok(bridges)
    }
}
