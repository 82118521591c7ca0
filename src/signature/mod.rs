//! Structural signatures - the abstract dynamics a document describes
//!
//! A signature is a pure function of a document's title, body and tags plus
//! the lexicon. It is what lets "entropy" (physics) and "natural selection"
//! (biology) be compared at all: both talk about disorder, equilibrium and
//! selection even though they share few words.

mod cache;
mod extract;
mod lexicon;

pub use cache::SignatureCache;
pub use extract::{extract, extract_text};
pub use lexicon::{DynamicsVerb, Lexicon, ScaleLevel, Timescale};

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A shallow subject-verb-object triple found in one sentence
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    pub subject: String,
    pub verb: DynamicsVerb,
    pub object: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralSignature {
    /// Ordered by appearance in the text
    pub relations: Vec<Relation>,
    pub dynamics_tags: BTreeSet<String>,
    pub scale: ScaleLevel,
    pub timescales: BTreeSet<Timescale>,
}

impl StructuralSignature {
    /// No relations; consumers fall back to embedding similarity alone
    pub fn is_uninformative(&self) -> bool {
        self.relations.is_empty()
    }

    pub fn verbs(&self) -> BTreeSet<DynamicsVerb> {
        self.relations.iter().map(|r| r.verb).collect()
    }

    pub fn is_short_term(&self) -> bool {
        self.timescales.contains(&Timescale::Short) && !self.timescales.contains(&Timescale::Long)
    }

    pub fn is_long_term(&self) -> bool {
        self.timescales.contains(&Timescale::Long) && !self.timescales.contains(&Timescale::Short)
    }
}
