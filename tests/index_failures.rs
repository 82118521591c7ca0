//! Index failures surface as IndexUnavailable, never as empty results

mod common;

use std::sync::Arc;

use polymath::error::IndexCall;
use polymath::{DialogueMode, Document, Domain, FusionError, PolymathConfig, PolymathEngine};

use common::FlakyIndex;

fn documents() -> Vec<Document> {
    vec![
        Document::new("thermostat", Domain::Engineering, "Thermostat").with_tags(["feedback"]),
        Document::new("insulin", Domain::Medicine, "Insulin").with_tags(["feedback"]),
    ]
}

fn engine(index: FlakyIndex) -> PolymathEngine {
    PolymathEngine::new(Arc::new(index), &PolymathConfig::default())
}

fn failed_call(err: FusionError) -> IndexCall {
    match err {
        FusionError::IndexUnavailable { call, .. } => call,
        other => panic!("expected IndexUnavailable, got {:?}", other),
    }
}

#[test]
fn test_search_failure_in_bridges() {
    let mut index = FlakyIndex::new(documents());
    index.fail_search = true;
    let err = engine(index).find_bridges("thermostat", 5).unwrap_err();
    assert_eq!(failed_call(err), IndexCall::Search);
}

#[test]
fn test_get_by_id_failure_is_not_not_found() {
    let mut index = FlakyIndex::new(documents());
    index.fail_get = true;
    let err = engine(index).suggest_fusion("thermostat", "insulin").unwrap_err();
    assert_eq!(failed_call(err), IndexCall::GetById);
}

#[test]
fn test_list_by_tag_failure_in_boundary_rule() {
    let mut index = FlakyIndex::new(documents());
    index.fail_tags = true;
    let err = engine(index).suggest_fusion("thermostat", "insulin").unwrap_err();
    assert_eq!(failed_call(err), IndexCall::ListByTag);
}

#[test]
fn test_search_failure_in_search_concepts() {
    let mut index = FlakyIndex::new(documents());
    index.fail_search = true;
    let err = engine(index).search_concepts("feedback", None, 5).unwrap_err();
    assert_eq!(failed_call(err), IndexCall::Search);
}

#[test]
fn test_dialogue_start_does_not_mask_index_failure() {
    let mut index = FlakyIndex::new(documents());
    index.fail_get = true;
    let err = engine(index)
        .start_dialogue("thermostat", DialogueMode::Explore)
        .unwrap_err();
    assert_eq!(failed_call(err), IndexCall::GetById);
}

#[test]
fn test_dialogue_turn_failure_keeps_state_usable() {
    let healthy = engine(FlakyIndex::new(documents()));
    let state = healthy
        .start_dialogue("thermostat", DialogueMode::ExploreViewpoints)
        .unwrap();

    let mut broken = FlakyIndex::new(documents());
    broken.fail_search = true;
    let err = engine(broken)
        .advance_dialogue(&state, "It depends on the setpoint.")
        .unwrap_err();
    assert_eq!(failed_call(err), IndexCall::Search);

    let (question, next) = healthy
        .advance_dialogue(&state, "It depends on the setpoint.")
        .unwrap();
    assert!(question.is_some());
    assert_eq!(next.depth, 2);
}

#[test]
fn test_healthy_empty_results_are_ok() {
    let engine = engine(FlakyIndex::new(vec![Document::new(
        "solo",
        Domain::Law,
        "Precedent",
    )]));
    let (_, bridges) = engine.find_bridges("solo", 5).unwrap();
    assert!(bridges.is_empty());
    assert!(engine.suggest_fusion("solo", "solo").unwrap().is_empty());
}

#[test]
fn test_offline_index_fails_fast() {
    let mut index = FlakyIndex::new(documents());
    index.offline = true;
    let engine = engine(index);

    let err = engine.find_bridges("thermostat", 5).unwrap_err();
    assert_eq!(failed_call(err), IndexCall::GetById);
    let err = engine.search_concepts("feedback", None, 5).unwrap_err();
    assert_eq!(failed_call(err), IndexCall::Search);
    let err = engine.evaluate_novelty("feedback everywhere", 5).unwrap_err();
    assert_eq!(failed_call(err), IndexCall::Search);

    let err = engine
        .start_dialogue("thermostat", DialogueMode::Explore)
        .unwrap_err();
    assert!(err.to_string().contains("flaky"));
}
