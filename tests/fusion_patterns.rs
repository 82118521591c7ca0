//! Fusion matcher and bridge finder behaviour through the public engine

mod common;

use std::sync::Arc;

use polymath::corpus::{HashingEmbedder, MemoryIndex};
use polymath::fusion::{fusion_patterns, FusionPattern};
use polymath::signature::{extract, Lexicon};
use polymath::{Document, DocumentIndex, Domain, PolymathConfig, PolymathEngine};

use common::{engine_with, entropy, evolution, sample_corpus_path};

#[test]
fn test_entropy_evolution_is_isomorphic_without_subversion() {
    let engine = engine_with(vec![entropy(), evolution()]);
    let suggestions = engine.suggest_fusion("entropy", "evolution").unwrap();

    let iso = suggestions
        .iter()
        .find(|s| s.pattern == FusionPattern::StructuralIsomorphism)
        .expect("structural isomorphism");
    assert!(iso.score > 0.0);
    assert!(suggestions
        .iter()
        .all(|s| s.pattern != FusionPattern::AssumptionSubversion));
}

#[test]
fn test_same_domain_pair_skips_cross_domain_patterns() {
    let engine = engine_with(vec![
        Document::new("cells", Domain::Biology, "Cell signalling")
            .with_body("A molecule triggers a response within seconds.")
            .with_tags(["equilibrium", "feedback"]),
        Document::new("species", Domain::Biology, "Species turnover")
            .with_body("The biosphere triggers extinction over millennia.")
            .with_tags(["disruption", "feedback"]),
    ]);
    let suggestions = engine.suggest_fusion("cells", "species").unwrap();

    for pattern in [
        FusionPattern::MetaphoricalTransfer,
        FusionPattern::AssumptionSubversion,
        FusionPattern::ScaleJump,
        FusionPattern::TemporalTransformation,
    ] {
        assert!(
            suggestions.iter().all(|s| s.pattern != pattern),
            "{} must not apply within one domain",
            pattern
        );
    }
    assert!(suggestions
        .iter()
        .any(|s| s.pattern == FusionPattern::StructuralIsomorphism));
}

#[test]
fn test_equal_scores_keep_enumeration_order() {
    let index = MemoryIndex::new(HashingEmbedder::new(2));
    index.upsert(
        Document::new("alpha", Domain::Physics, "Alpha")
            .with_tags(["equilibrium", "disruption"])
            .with_embedding(vec![1.0, 0.0]),
    );
    index.upsert(
        Document::new("beta", Domain::Economics, "Beta")
            .with_tags(["equilibrium", "disruption"])
            .with_embedding(vec![0.0, 1.0]),
    );
    let engine = PolymathEngine::new(Arc::new(index), &PolymathConfig::default());

    let suggestions = engine.suggest_fusion("alpha", "beta").unwrap();
    let patterns: Vec<FusionPattern> = suggestions.iter().map(|s| s.pattern).collect();
    assert_eq!(
        patterns,
        vec![
            FusionPattern::StructuralIsomorphism,
            FusionPattern::AssumptionSubversion,
            FusionPattern::DialecticalSynthesis,
        ]
    );
    assert!(suggestions.iter().all(|s| s.score == 1.0));
}

#[test]
fn test_scores_sorted_descending() {
    let engine = engine_with(vec![
        Document::new("neuron", Domain::Neuroscience, "Neuron")
            .with_body("Each neuron amplifies feedback within seconds.")
            .with_tags(["feedback", "stability"]),
        Document::new("climate", Domain::Ecology, "Climate")
            .with_body("The global ecosystem amplifies feedback over centuries.")
            .with_tags(["feedback", "change"]),
    ]);
    let suggestions = engine.suggest_fusion("neuron", "climate").unwrap();
    assert!(!suggestions.is_empty());
    for pair in suggestions.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    for s in &suggestions {
        assert!(s.score > 0.0 && s.score <= 1.0);
        assert!(!s.evidence.is_empty());
    }
}

#[test]
fn test_boundary_concept_needs_three_domains() {
    let a = Document::new("thermostat", Domain::Engineering, "Thermostat").with_tags(["feedback"]);
    let b = Document::new("insulin", Domain::Medicine, "Insulin").with_tags(["feedback"]);
    let c = Document::new("boom-bust", Domain::Economics, "Boom and bust").with_tags(["feedback"]);

    let two = engine_with(vec![a.clone(), b.clone()]);
    let suggestions = two.suggest_fusion("thermostat", "insulin").unwrap();
    assert!(suggestions
        .iter()
        .all(|s| s.pattern != FusionPattern::BoundaryConcept));

    let three = engine_with(vec![a, b, c]);
    let suggestions = three.suggest_fusion("thermostat", "insulin").unwrap();
    let boundary = suggestions
        .iter()
        .find(|s| s.pattern == FusionPattern::BoundaryConcept)
        .expect("boundary concept");
    assert!(boundary.score > 0.0);
}

#[test]
fn test_no_applicable_pattern_is_empty_list() {
    let index = MemoryIndex::new(HashingEmbedder::new(2));
    index.upsert(Document::new("x", Domain::Law, "Statute").with_embedding(vec![1.0, 0.0]));
    index.upsert(Document::new("y", Domain::Literature, "Sonnet").with_embedding(vec![0.0, 1.0]));
    let engine = PolymathEngine::new(Arc::new(index), &PolymathConfig::default());
    assert!(engine.suggest_fusion("x", "y").unwrap().is_empty());
}

#[test]
fn test_fusion_patterns_always_seven() {
    assert_eq!(fusion_patterns().len(), 7);
    let engine = engine_with(vec![]);
    assert_eq!(engine.fusion_patterns().len(), 7);
    for (descriptor, pattern) in engine.fusion_patterns().iter().zip(FusionPattern::ALL) {
        assert_eq!(descriptor.pattern, pattern);
        assert!(!descriptor.key_question.is_empty());
    }
}

#[test]
fn test_bridges_never_return_source_domain() {
    let index = MemoryIndex::load(&sample_corpus_path(), HashingEmbedder::default()).unwrap();
    let documents: Vec<Document> = index
        .search(&polymath::corpus::SearchQuery::text("system"), None, 100)
        .unwrap()
        .into_iter()
        .map(|h| h.document)
        .collect();
    assert!(documents.len() >= 10);

    let engine = PolymathEngine::new(Arc::new(index), &PolymathConfig::default());
    for doc in &documents {
        let (source, bridges) = engine.find_bridges(&doc.id, 5).unwrap();
        assert_eq!(source.id, doc.id);
        assert!(bridges.len() <= 5);
        for bridge in &bridges {
            assert_ne!(bridge.document.domain, doc.domain);
            assert_ne!(bridge.document.id, doc.id);
        }
        for pair in bridges.windows(2) {
            assert!(pair[0].hybrid_score >= pair[1].hybrid_score);
        }
    }
}

#[test]
fn test_find_bridges_unknown_concept_is_not_found() {
    let engine = engine_with(vec![]);
    let err = engine.find_bridges("phlogiston", 5).unwrap_err();
    assert!(matches!(err, polymath::FusionError::NotFound(_)));
}

#[test]
fn test_names_outside_sample_corpus_are_not_found() {
    let index = MemoryIndex::load(&sample_corpus_path(), HashingEmbedder::default()).unwrap();
    let engine = PolymathEngine::new(Arc::new(index), &PolymathConfig::default());

    let err = engine.suggest_fusion("sonnet", "entropy").unwrap_err();
    assert!(matches!(err, polymath::FusionError::NotFound(_)));

    for name in ["photosynthesis", "plate tectonics", "blockchain", "tax law"] {
        let err = engine.find_bridges(name, 3).unwrap_err();
        assert!(matches!(err, polymath::FusionError::NotFound(_)), "{name} resolved");
    }

    let state = engine
        .start_dialogue("sonnet", polymath::DialogueMode::Explore)
        .unwrap();
    assert!(state.focus.id.is_none());
}

#[test]
fn test_sample_corpus_resolves_titles() {
    let index = MemoryIndex::load(&sample_corpus_path(), HashingEmbedder::default()).unwrap();
    let engine = PolymathEngine::new(Arc::new(index), &PolymathConfig::default());

    let (source, _) = engine.find_bridges("natural selection", 3).unwrap();
    assert_eq!(source.id, "natural-selection");
    let (source, _) = engine.find_bridges("Charles Darwin", 3).unwrap();
    assert_eq!(source.id, "darwin");
}

#[test]
fn test_signature_extraction_is_deterministic() {
    let doc = Document::new("x", Domain::Economics, "Bank runs")
        .with_body("Fear amplifies withdrawals. Deposit insurance constrains panic over decades.")
        .with_tags(["feedback", "stability"]);
    let lexicon = Lexicon::default();
    let first = extract(&doc, &lexicon);
    for _ in 0..5 {
        assert_eq!(extract(&doc, &lexicon), first);
    }
}

#[test]
fn test_novelty_against_sample_corpus() {
    let index = MemoryIndex::load(&sample_corpus_path(), HashingEmbedder::default()).unwrap();
    let engine = PolymathEngine::new(Arc::new(index), &PolymathConfig::default());

    let evaluation = engine.evaluate_novelty("Entropy", 5).unwrap();
    assert!(evaluation.similar_existing.len() <= 5);
    assert!((0.0..=1.0).contains(&evaluation.score));
    if let Some(first) = evaluation.similar_existing.first() {
        assert!(first.similarity > 0.0);
    }
}
