//! PolymathEngine - the exposed operations over one Document Index
//!
//! Resolves concept names to documents and wires the signature cache, bridge
//! finder, pattern matcher and Socratic engine together. Holds no session
//! state: dialogue state is passed in and returned by value.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::PolymathConfig;
use crate::corpus::{
    Document, DocumentIndex, Domain, DomainFilter, HashingEmbedder, MemoryIndex, ScoredDocument,
    SearchQuery,
};
use crate::dialogue::{
    self, DialogueConfig, DialogueMode, DialogueState, DialogueSummary, PremiseChallenge,
    PremiseDetector, Question, QuestionTypeDescriptor, SocraticEngine,
};
use crate::error::{FusionError, FusionResult, IndexCall};
use crate::fusion::{
    self, FusionConfig, FusionSuggestion, NoveltyEvaluation, PatternDescriptor, PatternMatcher,
};
use crate::learning::{LearningPath, PathConfig, PathPlanner, PathType};
use crate::retrieval::{Bridge, BridgeFinder, RetrievalConfig};
use crate::signature::{Lexicon, SignatureCache};

/// Hits scanned for an exact title when a name is not an id
const RESOLVE_CANDIDATES: usize = 10;

pub struct PolymathEngine {
    index: Arc<dyn DocumentIndex>,
    signatures: Arc<SignatureCache>,
    bridges: BridgeFinder,
    matcher: PatternMatcher,
    socratic: SocraticEngine,
    paths: PathPlanner,
    default_limit: usize,
}

impl PolymathEngine {
    /// Engine over an existing index, tuned by `config`
    pub fn new(index: Arc<dyn DocumentIndex>, config: &PolymathConfig) -> Self {
        let lexicon = Lexicon::with_extra_antonyms(&config.lexicon.extra_antonyms);
        let signatures = Arc::new(SignatureCache::new(lexicon));
        let premises = PremiseDetector::with_extra_markers(&config.lexicon.extra_premise_markers);

        let bridges = BridgeFinder::new(
            index.clone(),
            signatures.clone(),
            RetrievalConfig::from(&config.retrieval),
        );
        let matcher = PatternMatcher::new(
            index.clone(),
            signatures.clone(),
            bridges.clone(),
            FusionConfig::from(&config.fusion),
        );
        let paths = PathPlanner::new(
            bridges.clone(),
            signatures.clone(),
            PathConfig::from(&config.learning),
        );
        let socratic = SocraticEngine::new(
            index.clone(),
            signatures.clone(),
            premises,
            DialogueConfig::from(&config.dialogue),
        );

        Self {
            index,
            signatures,
            bridges,
            matcher,
            socratic,
            paths,
            default_limit: config.retrieval.default_limit.max(1),
        }
    }

    /// Engine over the in-memory index loaded from the configured corpus
    ///
    /// A relative `corpus.path` is resolved against `project_root`. With no
    /// corpus configured the index starts empty.
    pub fn open(project_root: &Path, config: &PolymathConfig) -> Result<Self> {
        let embedder = HashingEmbedder::new(config.corpus.embedding_dim);
        let index = match &config.corpus.path {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.clone()
                } else {
                    project_root.join(path)
                };
                MemoryIndex::load(&path, embedder)
                    .with_context(|| format!("Failed to load corpus from {}", path.display()))?
            }
            None => {
                tracing::warn!("no corpus configured; starting with an empty index");
                MemoryIndex::new(embedder)
            }
        };
        Ok(Self::new(Arc::new(index), config))
    }

    pub fn index(&self) -> &dyn DocumentIndex {
        self.index.as_ref()
    }

    pub fn signatures(&self) -> &SignatureCache {
        &self.signatures
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    pub fn dialogue_config(&self) -> &DialogueConfig {
        self.socratic.config()
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Resolve a concept by id, then by exact title (case-insensitive)
    ///
    /// Nearest-neighbour hits are never accepted as a resolution: a name that
    /// matches no id or title is `NotFound`, not the closest unrelated document.
    pub fn resolve_concept(&self, concept: &str) -> FusionResult<Document> {
        let concept = concept.trim();
        if concept.is_empty() {
            return Err(FusionError::NotFound("empty concept name".to_string()));
        }

        self.ensure_available(IndexCall::GetById)?;
        if let Some(doc) = self
            .index
            .get_by_id(concept)
            .map_err(|e| FusionError::index(IndexCall::GetById, e))?
        {
            return Ok(doc);
        }

        let hits = self.search(&SearchQuery::text(concept), None, RESOLVE_CANDIDATES)?;
        hits.into_iter()
            .map(|h| h.document)
            .find(|doc| doc.title.trim().eq_ignore_ascii_case(concept))
            .ok_or_else(|| {
                tracing::debug!(concept, "no id or title match");
                FusionError::NotFound(concept.to_string())
            })
    }

    fn search(
        &self,
        query: &SearchQuery,
        filter: Option<&DomainFilter>,
        k: usize,
    ) -> FusionResult<Vec<ScoredDocument>> {
        self.ensure_available(IndexCall::Search)?;
        self.index.search(query, filter, k).map_err(|e| {
            tracing::warn!(index = self.index.name(), error = %e, "search failed");
            FusionError::index(IndexCall::Search, e)
        })
    }

    /// An index that reports itself unavailable fails fast, before any call
    fn ensure_available(&self, call: IndexCall) -> FusionResult<()> {
        if self.index.is_available() {
            return Ok(());
        }
        tracing::warn!(index = self.index.name(), %call, "index reports unavailable");
        Err(FusionError::IndexUnavailable {
            call,
            message: format!("index '{}' is not available", self.index.name()),
        })
    }

    // =========================================================================
    // Retrieval and fusion
    // =========================================================================

    /// Semantic search, optionally restricted to some domains
    pub fn search_concepts(
        &self,
        query: &str,
        domain_filter: Option<&DomainFilter>,
        k: usize,
    ) -> FusionResult<Vec<ScoredDocument>> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let hits = self.search(&SearchQuery::text(query), domain_filter, k)?;
        tracing::debug!(query, hits = hits.len(), "search_concepts");
        Ok(hits)
    }

    /// Partners for `concept` from every domain except its own
    pub fn find_bridges(&self, concept: &str, k: usize) -> FusionResult<(Document, Vec<Bridge>)> {
        let source = self.resolve_concept(concept)?;
        let bridges = self.bridges.find_bridges(&source, source.domain, k)?;
        Ok((source, bridges))
    }

    /// Applicable fusion patterns for two concepts, best first
    pub fn suggest_fusion(
        &self,
        concept_a: &str,
        concept_b: &str,
    ) -> FusionResult<Vec<FusionSuggestion>> {
        let source = self.resolve_concept(concept_a)?;
        let target = self.resolve_concept(concept_b)?;
        self.matcher.match_pair(&source, &target)
    }

    pub fn fusion_patterns(&self) -> &'static [PatternDescriptor] {
        fusion::fusion_patterns()
    }

    pub fn evaluate_novelty(&self, proposal: &str, k: usize) -> FusionResult<NoveltyEvaluation> {
        self.ensure_available(IndexCall::Search)?;
        fusion::evaluate_novelty(self.index.as_ref(), proposal, k)
    }

    pub fn domains(&self) -> &'static [Domain] {
        &Domain::ALL
    }

    /// Guided path from `start`; `goal` only matters for bridge paths
    pub fn learning_path(
        &self,
        start: &str,
        path_type: PathType,
        goal: Option<&str>,
        max_steps: Option<usize>,
    ) -> FusionResult<LearningPath> {
        let start = self.resolve_concept(start)?;
        let goal = match goal {
            Some(goal) if path_type == PathType::Bridge => Some(self.resolve_concept(goal)?),
            _ => None,
        };
        self.paths.plan(&start, goal.as_ref(), path_type, max_steps)
    }

    // =========================================================================
    // Dialogue
    // =========================================================================

    /// Detect premises in a statement and challenge each from another domain
    pub fn challenge_statement(
        &self,
        statement: &str,
        exclude_domain: Option<Domain>,
    ) -> FusionResult<PremiseChallenge> {
        self.ensure_available(IndexCall::Search)?;
        self.socratic.challenge_statement(statement, exclude_domain)
    }

    /// Begin a session on a corpus concept, or on free text when none matches
    pub fn start_dialogue(&self, focus: &str, mode: DialogueMode) -> FusionResult<DialogueState> {
        if focus.trim().is_empty() {
            return Err(FusionError::InvalidState(
                "dialogue focus must not be empty".to_string(),
            ));
        }
        let focus = match self.resolve_concept(focus) {
            Ok(doc) => self.socratic.focus_on_document(&doc),
            Err(FusionError::NotFound(_)) => self.socratic.focus_on_text(focus),
            Err(e) => return Err(e),
        };
        self.socratic.start(focus, mode)
    }

    pub fn advance_dialogue(
        &self,
        state: &DialogueState,
        answer: &str,
    ) -> FusionResult<(Option<Question>, DialogueState)> {
        self.advance_dialogue_with(state, answer, None)
    }

    /// Advance with an explicit mode switch
    pub fn advance_dialogue_with(
        &self,
        state: &DialogueState,
        answer: &str,
        requested_mode: Option<DialogueMode>,
    ) -> FusionResult<(Option<Question>, DialogueState)> {
        self.ensure_available(IndexCall::Search)?;
        self.socratic.advance(state, answer, requested_mode)
    }

    pub fn question_types(&self) -> &'static [QuestionTypeDescriptor] {
        dialogue::question_types()
    }

    pub fn end_dialogue(
        &self,
        state: &DialogueState,
    ) -> FusionResult<(DialogueSummary, DialogueState)> {
        self.socratic.end(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> PolymathEngine {
        let index = MemoryIndex::from_documents([
            Document::new("entropy", Domain::Physics, "Entropy")
                .with_tags(["disorder", "equilibrium"]),
            Document::new("natural-selection", Domain::Biology, "Natural selection")
                .with_tags(["selection", "adaptation"]),
        ]);
        PolymathEngine::new(Arc::new(index), &PolymathConfig::default())
    }

    #[test]
    fn test_resolve_by_id_and_title() {
        let engine = engine();
        assert_eq!(engine.resolve_concept("entropy").unwrap().id, "entropy");
        assert_eq!(
            engine.resolve_concept("NATURAL SELECTION").unwrap().id,
            "natural-selection"
        );
    }

    #[test]
    fn test_resolve_unrelated_name_is_not_found() {
        let engine = engine();
        for name in ["sonnet", "photosynthesis", "plate tectonics", "Entropy production"] {
            let err = engine.resolve_concept(name).unwrap_err();
            assert!(matches!(err, FusionError::NotFound(_)), "{name} resolved");
        }
    }

    #[test]
    fn test_resolve_empty_is_not_found() {
        let err = engine().resolve_concept("  ").unwrap_err();
        assert!(matches!(err, FusionError::NotFound(_)));
    }

    #[test]
    fn test_search_zero_k() {
        assert!(engine().search_concepts("entropy", None, 0).unwrap().is_empty());
    }

    #[test]
    fn test_free_text_dialogue_focus() {
        let engine = engine();
        let empty = PolymathEngine::new(
            Arc::new(MemoryIndex::new(HashingEmbedder::default())),
            &PolymathConfig::default(),
        );
        let state = empty
            .start_dialogue("Markets always reach equilibrium", DialogueMode::Explore)
            .unwrap();
        assert!(state.focus.id.is_none());
        assert_eq!(state.depth, 1);

        let state = engine.start_dialogue("entropy", DialogueMode::Explore).unwrap();
        assert_eq!(state.focus.id.as_deref(), Some("entropy"));
    }

    #[test]
    fn test_empty_focus_rejected() {
        let err = engine()
            .start_dialogue("", DialogueMode::Explore)
            .unwrap_err();
        assert!(matches!(err, FusionError::InvalidState(_)));
    }

    #[test]
    fn test_learning_path_goal_only_for_bridge() {
        let engine = engine();
        let path = engine
            .learning_path("entropy", PathType::Bridge, Some("natural selection"), Some(3))
            .unwrap();
        assert_eq!(path.goal.as_ref().unwrap().id, "natural-selection");
        assert_eq!(path.steps.last().unwrap().concept.id, "natural-selection");

        let path = engine
            .learning_path("entropy", PathType::DepthFirst, Some("missing"), Some(2))
            .unwrap();
        assert!(path.goal.is_none());
        assert_eq!(path.steps.len(), 2);
        assert_eq!(engine.question_types().len(), 7);
    }
}
