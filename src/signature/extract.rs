use std::collections::BTreeSet;

use super::lexicon::{DynamicsVerb, Lexicon, ScaleLevel};
use super::{Relation, StructuralSignature};
use crate::corpus::text::{is_stopword, sentences, words};
use crate::corpus::Document;

/// Extract the structural signature of a document
///
/// Deterministic: the same title, body, tags and lexicon always give the
/// same signature.
pub fn extract(document: &Document, lexicon: &Lexicon) -> StructuralSignature {
    extract_parts(&document.full_text(), &document.tags, lexicon)
}

/// Signature of free text with no tags, e.g. a user's premise
pub fn extract_text(text: &str, lexicon: &Lexicon) -> StructuralSignature {
    extract_parts(text, &BTreeSet::new(), lexicon)
}

fn extract_parts(text: &str, tags: &BTreeSet<String>, lexicon: &Lexicon) -> StructuralSignature {
    let relations: Vec<Relation> = sentences(text)
        .into_iter()
        .filter_map(|sentence| relation_in(&words(sentence)))
        .collect();

    let mut dynamics_tags = BTreeSet::new();
    let all_words = words(text);
    for word in all_words.iter().chain(tags.iter()) {
        if let Some(tag) = lexicon.dynamics_tag(word) {
            dynamics_tags.insert(tag.to_string());
        }
    }
    for relation in &relations {
        dynamics_tags.insert(relation.verb.tag().to_string());
    }

    let mut scales = BTreeSet::new();
    let mut timescales = BTreeSet::new();
    for word in &all_words {
        if let Some(rank) = lexicon.scale_of_word(word).rank() {
            scales.insert(rank);
        }
        if let Some(ts) = lexicon.timescale_of_word(word) {
            timescales.insert(ts);
        }
    }

    StructuralSignature {
        relations,
        dynamics_tags,
        scale: pick_scale(&scales),
        timescales,
    }
}

/// Macro wins over micro, micro over meso
fn pick_scale(ranks: &BTreeSet<u8>) -> ScaleLevel {
    if ranks.contains(&2) {
        ScaleLevel::Macro
    } else if ranks.contains(&0) {
        ScaleLevel::Micro
    } else if ranks.contains(&1) {
        ScaleLevel::Meso
    } else {
        ScaleLevel::Unspecified
    }
}

/// First pivot verb in the sentence with a content word on each side
fn relation_in(tokens: &[String]) -> Option<Relation> {
    let (pivot, verb) = tokens
        .iter()
        .enumerate()
        .find_map(|(i, t)| DynamicsVerb::from_word(t).map(|v| (i, v)))?;

    let is_neighbour = |t: &&String| !is_stopword(t) && DynamicsVerb::from_word(t).is_none();

    let subject = tokens[..pivot].iter().rev().find(is_neighbour)?;
    let object = tokens[pivot + 1..].iter().find(is_neighbour)?;

    Some(Relation {
        subject: subject.clone(),
        verb,
        object: object.clone(),
    })
}
