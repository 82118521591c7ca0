//! Corpus module - documents, domains and the Document Index boundary
//!
//! Public interface:
//! - `Document`, `DocumentKind`, `Domain` for corpus content
//! - `DocumentIndex` trait consumed by the core (search / get_by_id / list_by_tag)
//! - `MemoryIndex` in-memory reference index with a hashing embedder
//! - similarity helpers (cosine, Jaccard)

mod domain;
mod embedder;
mod index;
mod memory;
pub mod similarity;
pub(crate) mod text;

pub use domain::{Domain, DomainCategory};
pub use embedder::HashingEmbedder;
pub use index::{DocumentIndex, DomainFilter, ScoredDocument, SearchQuery};
pub use memory::MemoryIndex;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Kind of corpus entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    #[default]
    Concept,
    Polymath,
    FusionCase,
    FusionPattern,
    BigQuestion,
}

/// Immutable content unit supplied by ingestion
///
/// Re-indexing replaces the whole document; the core never mutates one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub domain: Domain,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub kind: DocumentKind,
    /// Owned by the index, cached here by value
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedding: Vec<f32>,
}

impl Document {
    pub fn new(id: impl Into<String>, domain: Domain, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            domain,
            title: title.into(),
            body: String::new(),
            tags: BTreeSet::new(),
            kind: DocumentKind::default(),
            embedding: Vec::new(),
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(|t| t.into().to_lowercase()).collect();
        self
    }

    pub fn with_kind(mut self, kind: DocumentKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }

    /// Title and body joined, the text that embeddings and signatures read
    pub fn full_text(&self) -> String {
        if self.body.is_empty() {
            self.title.clone()
        } else {
            format!("{}. {}", self.title, self.body)
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}
