//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{anyhow, Result};
use polymath::corpus::{DocumentIndex, DomainFilter, MemoryIndex, ScoredDocument, SearchQuery};
use polymath::{Document, Domain, PolymathConfig, PolymathEngine};

pub fn engine_with(documents: Vec<Document>) -> PolymathEngine {
    PolymathEngine::new(
        Arc::new(MemoryIndex::from_documents(documents)),
        &PolymathConfig::default(),
    )
}

pub fn entropy() -> Document {
    Document::new("entropy", Domain::Physics, "Entropy").with_tags(["equilibrium", "disorder"])
}

pub fn evolution() -> Document {
    Document::new("evolution", Domain::Biology, "Evolution").with_tags(["selection", "disorder"])
}

pub fn sample_corpus_path() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("corpus")
        .join("sample.json")
}

/// Index double whose calls can be made to fail one by one
pub struct FlakyIndex {
    inner: MemoryIndex,
    pub fail_search: bool,
    pub fail_get: bool,
    pub fail_tags: bool,
    pub offline: bool,
}

impl FlakyIndex {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            inner: MemoryIndex::from_documents(documents),
            fail_search: false,
            fail_get: false,
            fail_tags: false,
            offline: false,
        }
    }
}

impl DocumentIndex for FlakyIndex {
    fn name(&self) -> &'static str {
        "flaky"
    }

    fn search(
        &self,
        query: &SearchQuery,
        domain_filter: Option<&DomainFilter>,
        k: usize,
    ) -> Result<Vec<ScoredDocument>> {
        if self.fail_search {
            return Err(anyhow!("vector store timed out"));
        }
        self.inner.search(query, domain_filter, k)
    }

    fn get_by_id(&self, id: &str) -> Result<Option<Document>> {
        if self.fail_get {
            return Err(anyhow!("metadata store unreachable"));
        }
        self.inner.get_by_id(id)
    }

    fn list_by_tag(&self, tag: &str) -> Result<Vec<Document>> {
        if self.fail_tags {
            return Err(anyhow!("tag listing refused"));
        }
        self.inner.list_by_tag(tag)
    }

    fn is_available(&self) -> bool {
        !self.offline
    }
}
