//! PatternMatcher - scores a concept pair against each fusion pattern

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::pattern::FusionPattern;
use crate::corpus::similarity::{cosine_similarity, jaccard};
use crate::corpus::{Document, DocumentIndex, Domain};
use crate::error::{FusionError, FusionResult, IndexCall};
use crate::retrieval::BridgeFinder;
use crate::signature::{
    DynamicsVerb, Lexicon, ScaleLevel, SignatureCache, StructuralSignature, Timescale,
};

/// Thresholds and bands for the pattern rules
///
/// See `FusionSection` in project config for persistence.
#[derive(Debug, Clone)]
pub struct FusionConfig {
    /// Cosine at which metaphorical transfer peaks (default: 0.5)
    pub band_center: f32,
    /// Distance from the centre at which the score reaches 0 (default: 0.5)
    pub band_half_width: f32,
    /// Minimum dynamics-tag Jaccard for structural isomorphism (default: 0.2)
    pub isomorphism_threshold: f32,
    /// Distinct domains a tag needs before it counts as a boundary concept (default: 3)
    pub boundary_min_domains: usize,
    /// Domain count at which the boundary score saturates at 1.0 (default: 6)
    pub boundary_saturation_domains: usize,
    /// Bridge list length used for the mutual reachability check (default: 10)
    pub reachability_limit: usize,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            band_center: 0.5,
            band_half_width: 0.5,
            isomorphism_threshold: 0.2,
            boundary_min_domains: 3,
            boundary_saturation_domains: 6,
            reachability_limit: 10,
        }
    }
}

/// Signature feature that drove a match
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Evidence {
    EmbeddingSimilarity { cosine: f32 },
    SharedDynamics { tags: Vec<String>, jaccard: f32 },
    OpposedTags { source_tag: String, target_tag: String },
    ScaleShift { source: ScaleLevel, target: ScaleLevel },
    TimescaleShift { source: Timescale, target: Timescale },
    SharedVerbs { verbs: Vec<DynamicsVerb> },
    BoundaryTag { tag: String, domains: Vec<Domain> },
    MutualReachability,
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evidence::EmbeddingSimilarity { cosine } => write!(f, "embedding cosine {:.2}", cosine),
            Evidence::SharedDynamics { tags, jaccard } => {
                write!(f, "shared dynamics [{}] (Jaccard {:.2})", tags.join(", "), jaccard)
            }
            Evidence::OpposedTags {
                source_tag,
                target_tag,
            } => write!(f, "'{}' opposes '{}'", source_tag, target_tag),
            Evidence::ScaleShift { source, target } => {
                write!(f, "scale {} -> {}", source.label(), target.label())
            }
            Evidence::TimescaleShift { source, target } => {
                write!(f, "timescale {:?} -> {:?}", source, target)
            }
            Evidence::SharedVerbs { verbs } => {
                let names: Vec<String> = verbs.iter().map(|v| format!("{:?}", v)).collect();
                write!(f, "shared relations [{}]", names.join(", "))
            }
            Evidence::BoundaryTag { tag, domains } => {
                let ids: Vec<&str> = domains.iter().map(|d| d.id()).collect();
                write!(f, "'{}' appears in {} domains ({})", tag, domains.len(), ids.join(", "))
            }
            Evidence::MutualReachability => f.write_str("each concept is a bridge of the other"),
        }
    }
}

/// A scored, explained candidate fusion
#[derive(Debug, Clone, Serialize)]
pub struct FusionSuggestion {
    pub pattern: FusionPattern,
    pub source_concept: String,
    pub target_concept: String,
    /// In (0, 1]
    pub score: f32,
    pub rationale: String,
    pub evidence: Vec<Evidence>,
}

struct Pair<'a> {
    source: &'a Document,
    target: &'a Document,
    source_sig: &'a StructuralSignature,
    target_sig: &'a StructuralSignature,
}

type Scored = Option<(f32, Vec<Evidence>)>;

/// Scores concept pairs against the seven fusion patterns
pub struct PatternMatcher {
    index: Arc<dyn DocumentIndex>,
    signatures: Arc<SignatureCache>,
    bridges: BridgeFinder,
    config: FusionConfig,
}

impl PatternMatcher {
    pub fn new(
        index: Arc<dyn DocumentIndex>,
        signatures: Arc<SignatureCache>,
        bridges: BridgeFinder,
        config: FusionConfig,
    ) -> Self {
        Self {
            index,
            signatures,
            bridges,
            config,
        }
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Applicable patterns for (source, target), best first
    ///
    /// Equal scores keep pattern enumeration order. An empty list means no
    /// pattern applies; index failures are errors, never empty lists.
    pub fn match_pair(
        &self,
        source: &Document,
        target: &Document,
    ) -> FusionResult<Vec<FusionSuggestion>> {
        let source_sig = self.signatures.get(source);
        let target_sig = self.signatures.get(target);
        let pair = Pair {
            source,
            target,
            source_sig: &source_sig,
            target_sig: &target_sig,
        };

        let mut suggestions = Vec::new();
        for pattern in FusionPattern::ALL {
            if pattern.requires_distinct_domains() && source.domain == target.domain {
                continue;
            }

            let scored = match pattern {
                FusionPattern::MetaphoricalTransfer => self.metaphorical_transfer(&pair),
                FusionPattern::StructuralIsomorphism => self.structural_isomorphism(&pair),
                FusionPattern::AssumptionSubversion => self.assumption_subversion(&pair),
                FusionPattern::ScaleJump => scale_jump(&pair),
                FusionPattern::TemporalTransformation => temporal_transformation(&pair),
                FusionPattern::BoundaryConcept => self.boundary_concept(&pair)?,
                FusionPattern::DialecticalSynthesis => self.dialectical_synthesis(&pair)?,
            };

            let Some((score, evidence)) = scored else {
                continue;
            };
            if score.is_nan() || score <= 0.0 {
                continue;
            }
            let score = score.min(1.0);
            tracing::debug!(pattern = pattern.key(), score, "pattern scored");

            suggestions.push(FusionSuggestion {
                pattern,
                source_concept: source.id.clone(),
                target_concept: target.id.clone(),
                score,
                rationale: rationale(pattern, source, target),
                evidence,
            });
        }

        // sort_by is stable: equal scores stay in enumeration order
        suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(suggestions)
    }

    fn lexicon(&self) -> &Lexicon {
        self.signatures.lexicon()
    }

    /// Triangular score of embedding cosine around `band_center`
    fn metaphorical_transfer(&self, pair: &Pair) -> Scored {
        let cosine = cosine_similarity(&pair.source.embedding, &pair.target.embedding)?;
        let half_width = self.config.band_half_width;
        if half_width.is_nan() || half_width <= 0.0 {
            return None;
        }
        let score = 1.0 - (cosine - self.config.band_center).abs() / half_width;
        Some((score.max(0.0), vec![Evidence::EmbeddingSimilarity { cosine }]))
    }

    fn structural_isomorphism(&self, pair: &Pair) -> Scored {
        let j = jaccard(&pair.source_sig.dynamics_tags, &pair.target_sig.dynamics_tags);
        if j <= 0.0 || j < self.config.isomorphism_threshold {
            return None;
        }
        Some((j, vec![shared_dynamics(pair)]))
    }

    /// Fraction of source tags whose recorded opposite shows up in the target
    fn assumption_subversion(&self, pair: &Pair) -> Scored {
        let source_tags = &pair.source_sig.dynamics_tags;
        if source_tags.is_empty() {
            return None;
        }

        let evidence = opposed_pairs(self.lexicon(), source_tags, &pair.target_sig.dynamics_tags);
        let subverted: BTreeSet<&str> = evidence
            .iter()
            .filter_map(|e| match e {
                Evidence::OpposedTags { source_tag, .. } => Some(source_tag.as_str()),
                _ => None,
            })
            .collect();
        if subverted.is_empty() {
            return None;
        }

        let score = subverted.len() as f32 / source_tags.len() as f32;
        Some((score, evidence))
    }

    /// Distinct domains sharing the pair's common tags, via `list_by_tag`
    fn boundary_concept(&self, pair: &Pair) -> FusionResult<Scored> {
        let mut candidates: BTreeSet<&str> = pair
            .source
            .tags
            .intersection(&pair.target.tags)
            .map(|t| t.as_str())
            .collect();
        candidates.extend(
            pair.source_sig
                .dynamics_tags
                .intersection(&pair.target_sig.dynamics_tags)
                .map(|t| t.as_str()),
        );

        let mut best: Option<(String, BTreeSet<Domain>)> = None;
        for tag in candidates {
            let documents = self.index.list_by_tag(tag).map_err(|e| {
                tracing::warn!(index = self.index.name(), tag, error = %e, "tag lookup failed");
                FusionError::index(IndexCall::ListByTag, e)
            })?;
            let domains: BTreeSet<Domain> = documents.iter().map(|d| d.domain).collect();
            if best.as_ref().map(|(_, b)| domains.len() > b.len()).unwrap_or(true) {
                best = Some((tag.to_string(), domains));
            }
        }

        let Some((tag, domains)) = best else {
            return Ok(None);
        };
        let min = self.config.boundary_min_domains.max(1);
        let n = domains.len();
        if n < min {
            return Ok(None);
        }

        let span = self.config.boundary_saturation_domains.saturating_sub(min) + 1;
        let score = ((n - min + 1) as f32 / span as f32).min(1.0);
        Ok(Some((
            score,
            vec![Evidence::BoundaryTag {
                tag,
                domains: domains.into_iter().collect(),
            }],
        )))
    }

    /// Opposed tags on both sides, confirmed by mutual reachability
    fn dialectical_synthesis(&self, pair: &Pair) -> FusionResult<Scored> {
        let source_tags = &pair.source_sig.dynamics_tags;
        let target_tags = &pair.target_sig.dynamics_tags;
        let total = source_tags.len() + target_tags.len();
        if total == 0 {
            return Ok(None);
        }

        let lexicon = self.lexicon();
        let opposed_in_source = source_tags
            .iter()
            .filter(|t| target_tags.iter().any(|o| lexicon.are_opposed(t, o)))
            .count();
        let opposed_in_target = target_tags
            .iter()
            .filter(|t| source_tags.iter().any(|o| lexicon.are_opposed(t, o)))
            .count();
        if opposed_in_source == 0 {
            return Ok(None);
        }

        if !self.mutually_reachable(pair.source, pair.target)? {
            return Ok(None);
        }

        let score = (opposed_in_source + opposed_in_target) as f32 / total as f32;
        let mut evidence = opposed_pairs(lexicon, source_tags, target_tags);
        evidence.push(Evidence::MutualReachability);
        Ok(Some((score, evidence)))
    }

    /// Each document appears in the other's cross-domain bridge list
    fn mutually_reachable(&self, a: &Document, b: &Document) -> FusionResult<bool> {
        let limit = self.config.reachability_limit;
        let forward = self.bridges.find_bridges(a, a.domain, limit)?;
        if !forward.iter().any(|bridge| bridge.document.id == b.id) {
            return Ok(false);
        }
        let backward = self.bridges.find_bridges(b, b.domain, limit)?;
        Ok(backward.iter().any(|bridge| bridge.document.id == a.id))
    }
}

/// Same dynamics, different scale
fn scale_jump(pair: &Pair) -> Scored {
    let (Some(a), Some(b)) = (pair.source_sig.scale.rank(), pair.target_sig.scale.rank()) else {
        return None;
    };
    if a == b {
        return None;
    }
    let j = jaccard(&pair.source_sig.dynamics_tags, &pair.target_sig.dynamics_tags);
    if j <= 0.0 {
        return None;
    }
    let distance = a.abs_diff(b) as f32;
    let score = (distance / 2.0) * (0.5 + 0.5 * j);
    Some((
        score,
        vec![
            Evidence::ScaleShift {
                source: pair.source_sig.scale,
                target: pair.target_sig.scale,
            },
            shared_dynamics(pair),
        ],
    ))
}

/// Short-term on one side, long-term on the other, with shared relations
fn temporal_transformation(pair: &Pair) -> Scored {
    let (source, target) = match (pair.source_sig, pair.target_sig) {
        (s, t) if s.is_short_term() && t.is_long_term() => (Timescale::Short, Timescale::Long),
        (s, t) if s.is_long_term() && t.is_short_term() => (Timescale::Long, Timescale::Short),
        _ => return None,
    };

    let source_verbs = pair.source_sig.verbs();
    let target_verbs = pair.target_sig.verbs();
    let j = jaccard(&source_verbs, &target_verbs);
    if j <= 0.0 {
        return None;
    }

    let shared: Vec<DynamicsVerb> = source_verbs.intersection(&target_verbs).copied().collect();
    Some((
        0.5 + 0.5 * j,
        vec![
            Evidence::TimescaleShift { source, target },
            Evidence::SharedVerbs { verbs: shared },
        ],
    ))
}

fn shared_dynamics(pair: &Pair) -> Evidence {
    let source = &pair.source_sig.dynamics_tags;
    let target = &pair.target_sig.dynamics_tags;
    Evidence::SharedDynamics {
        tags: source.intersection(target).cloned().collect(),
        jaccard: jaccard(source, target),
    }
}

fn opposed_pairs(
    lexicon: &Lexicon,
    source: &BTreeSet<String>,
    target: &BTreeSet<String>,
) -> Vec<Evidence> {
    let mut evidence = Vec::new();
    for s in source {
        for opposite in lexicon.opposites_of(s) {
            if target.contains(opposite) {
                evidence.push(Evidence::OpposedTags {
                    source_tag: s.clone(),
                    target_tag: opposite.to_string(),
                });
            }
        }
    }
    evidence
}

fn rationale(pattern: FusionPattern, source: &Document, target: &Document) -> String {
    let (a, b) = (&source.title, &target.title);
    match pattern {
        FusionPattern::MetaphoricalTransfer => format!(
            "'{}' and '{}' are related without being the same idea; one can stand as a metaphor for the other",
            a, b
        ),
        FusionPattern::StructuralIsomorphism => format!(
            "'{}' and '{}' share the same abstract dynamics despite different vocabularies",
            a, b
        ),
        FusionPattern::AssumptionSubversion => format!(
            "'{}' ({}) describes the opposite of what '{}' ({}) takes for granted",
            b,
            target.domain.name(),
            a,
            source.domain.name()
        ),
        FusionPattern::ScaleJump => format!(
            "the mechanism in '{}' reappears in '{}' at a different scale",
            a, b
        ),
        FusionPattern::TemporalTransformation => format!(
            "'{}' and '{}' run the same relations on different timescales",
            a, b
        ),
        FusionPattern::BoundaryConcept => format!(
            "'{}' and '{}' meet at a concept shared by several fields",
            a, b
        ),
        FusionPattern::DialecticalSynthesis => format!(
            "'{}' and '{}' reach each other across domains yet pull in opposite directions",
            a, b
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{HashingEmbedder, MemoryIndex};
    use crate::retrieval::RetrievalConfig;
    use approx::assert_relative_eq;

    fn matcher(index: Arc<MemoryIndex>) -> PatternMatcher {
        let signatures = Arc::new(SignatureCache::default());
        let bridges = BridgeFinder::new(index.clone(), signatures.clone(), RetrievalConfig::default());
        PatternMatcher::new(index, signatures, bridges, FusionConfig::default())
    }

    fn get(index: &MemoryIndex, id: &str) -> Document {
        index.get_by_id(id).unwrap().unwrap()
    }

    #[test]
    fn test_metaphorical_band_peaks_at_center() {
        let index = Arc::new(MemoryIndex::new(HashingEmbedder::new(2)));
        let m = matcher(index);
        let frac = 0.5f32.sqrt();
        let a = Document::new("a", Domain::Biology, "Alpha").with_embedding(vec![1.0, 0.0]);
        let peak = Document::new("b", Domain::Economics, "Beta")
            .with_embedding(vec![0.5, (0.75f32).sqrt()]);
        let near = Document::new("c", Domain::Economics, "Gamma").with_embedding(vec![frac, frac]);

        let pair = |t: &Document| {
            let ss = m.signatures.get(&a);
            let ts = m.signatures.get(t);
            m.metaphorical_transfer(&Pair {
                source: &a,
                target: t,
                source_sig: &ss,
                target_sig: &ts,
            })
            .map(|(s, _)| s)
        };

        assert_relative_eq!(pair(&peak).unwrap(), 1.0, epsilon = 1e-5);
        let off = pair(&near).unwrap();
        assert!(off > 0.0 && off < 1.0);
        assert_relative_eq!(pair(&a.clone()).unwrap(), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_same_domain_skips_cross_domain_patterns() {
        let index = Arc::new(MemoryIndex::from_documents([
            Document::new("a", Domain::Physics, "Heat bath")
                .with_body("Cells reach equilibrium within seconds.")
                .with_tags(["equilibrium"]),
            Document::new("b", Domain::Physics, "Cosmic expansion")
                .with_body("The universe drifts toward disruption over millennia.")
                .with_tags(["disruption", "equilibrium"]),
        ]));
        let m = matcher(index.clone());
        let suggestions = m.match_pair(&get(&index, "a"), &get(&index, "b")).unwrap();
        assert!(suggestions.iter().all(|s| !s.pattern.requires_distinct_domains()));
    }

    #[test]
    fn test_scale_jump_scores_distance() {
        let index = Arc::new(MemoryIndex::from_documents([
            Document::new("neuron", Domain::Neuroscience, "Neuron firing")
                .with_body("Each neuron integrates feedback.")
                .with_tags(["feedback"]),
            Document::new("climate", Domain::Ecology, "Climate")
                .with_body("Global climate runs on feedback.")
                .with_tags(["feedback"]),
        ]));
        let m = matcher(index.clone());
        let suggestions = m
            .match_pair(&get(&index, "neuron"), &get(&index, "climate"))
            .unwrap();
        let jump = suggestions
            .iter()
            .find(|s| s.pattern == FusionPattern::ScaleJump)
            .expect("scale jump");
        assert_relative_eq!(jump.score, 1.0);
    }

    #[test]
    fn test_temporal_transformation_needs_shared_verbs() {
        let index = Arc::new(MemoryIndex::from_documents([
            Document::new("reflex", Domain::Psychology, "Reflex arc")
                .with_body("A stimulus triggers movement within seconds."),
            Document::new("speciation", Domain::Biology, "Speciation")
                .with_body("Isolation triggers divergence over millennia."),
            Document::new("dynasty", Domain::History, "Dynastic cycle")
                .with_body("Corruption erodes legitimacy over centuries."),
        ]));
        let m = matcher(index.clone());
        let reflex = get(&index, "reflex");

        let with_verbs = m.match_pair(&reflex, &get(&index, "speciation")).unwrap();
        let temporal = with_verbs
            .iter()
            .find(|s| s.pattern == FusionPattern::TemporalTransformation)
            .expect("temporal transformation");
        assert_relative_eq!(temporal.score, 1.0);

        let without = m.match_pair(&reflex, &get(&index, "dynasty")).unwrap();
        assert!(without
            .iter()
            .all(|s| s.pattern != FusionPattern::TemporalTransformation));
    }

    #[test]
    fn test_evidence_display() {
        let e = Evidence::OpposedTags {
            source_tag: "equilibrium".into(),
            target_tag: "disruption".into(),
        };
        assert_eq!(e.to_string(), "'equilibrium' opposes 'disruption'");
    }
}
