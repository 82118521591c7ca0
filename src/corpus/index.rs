//! Document Index interface consumed by the core
//!
//! The index (vector + metadata store) lives outside the core. The core only
//! issues the three calls below and never creates or deletes documents.

use std::collections::BTreeSet;

use anyhow::Result;

use super::{Document, Domain};

/// Query for `DocumentIndex::search`
#[derive(Debug, Clone)]
pub enum SearchQuery {
    /// Free text, embedded by the index
    Text(String),
    /// Precomputed embedding (same dimension as the index)
    Vector(Vec<f32>),
}

impl SearchQuery {
    pub fn text(query: impl Into<String>) -> Self {
        SearchQuery::Text(query.into())
    }
}

/// Restrict a search to a set of domains
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainFilter {
    domains: BTreeSet<Domain>,
}

impl DomainFilter {
    pub fn only(domains: impl IntoIterator<Item = Domain>) -> Self {
        Self {
            domains: domains.into_iter().collect(),
        }
    }

    /// Every catalogued domain except `excluded`
    pub fn excluding(excluded: Domain) -> Self {
        Self::only(Domain::ALL.into_iter().filter(|d| *d != excluded))
    }

    pub fn allows(&self, domain: Domain) -> bool {
        self.domains.contains(&domain)
    }

    pub fn domains(&self) -> impl Iterator<Item = &Domain> {
        self.domains.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

/// A search hit with the index's similarity (cosine, higher is closer)
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub document: Document,
    pub similarity: f32,
}

/// Document Index interface - implemented by the surrounding system
///
/// Errors are client failures (timeouts, unreachable store). A legitimate
/// zero-result query returns `Ok(vec![])`, and an unknown id returns
/// `Ok(None)`; the core relies on that distinction.
pub trait DocumentIndex: Send + Sync {
    /// Index name for diagnostics
    fn name(&self) -> &'static str;

    /// Nearest documents to the query, best first, at most `k`
    fn search(
        &self,
        query: &SearchQuery,
        domain_filter: Option<&DomainFilter>,
        k: usize,
    ) -> Result<Vec<ScoredDocument>>;

    /// Fetch one document by id
    fn get_by_id(&self, id: &str) -> Result<Option<Document>>;

    /// All documents carrying `tag` (case-insensitive)
    fn list_by_tag(&self, tag: &str) -> Result<Vec<Document>>;

    /// Whether this index is ready to serve queries
    fn is_available(&self) -> bool {
        true
    }
}
