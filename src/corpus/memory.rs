//! In-memory Document Index
//!
//! Reference implementation of `DocumentIndex` for the CLI, the MCP server
//! and tests. Brute-force cosine search over hashing-embedder vectors;
//! adequate for curated corpora of a few thousand entries.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use parking_lot::RwLock;
use serde::Deserialize;
use walkdir::WalkDir;

use super::embedder::HashingEmbedder;
use super::index::{DocumentIndex, DomainFilter, ScoredDocument, SearchQuery};
use super::similarity::cosine_similarity;
use super::Document;

/// Corpus file layout: a bare list or `{ documents: [...] }`
#[derive(Deserialize)]
#[serde(untagged)]
enum CorpusFile {
    List(Vec<Document>),
    Wrapped { documents: Vec<Document> },
}

impl CorpusFile {
    fn into_documents(self) -> Vec<Document> {
        match self {
            CorpusFile::List(docs) => docs,
            CorpusFile::Wrapped { documents } => documents,
        }
    }
}

#[derive(Default)]
struct Entries {
    documents: Vec<Document>,
    by_id: HashMap<String, usize>,
}

pub struct MemoryIndex {
    entries: RwLock<Entries>,
    embedder: HashingEmbedder,
}

impl MemoryIndex {
    pub fn new(embedder: HashingEmbedder) -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            embedder,
        }
    }

    /// Build an index from documents, embedding any that lack a vector
    pub fn from_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        let index = Self::new(HashingEmbedder::default());
        for doc in documents {
            index.upsert(doc);
        }
        index
    }

    /// Load a corpus file (`.json`, `.yaml`, `.yml`) or a directory of them
    pub fn load(path: &Path, embedder: HashingEmbedder) -> Result<Self> {
        let index = Self::new(embedder);

        if path.is_dir() {
            let mut files: Vec<_> = WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file() && is_corpus_file(e.path()))
                .map(|e| e.into_path())
                .collect();
            files.sort();
            for file in files {
                for doc in read_corpus_file(&file)? {
                    index.upsert(doc);
                }
            }
        } else if path.is_file() {
            for doc in read_corpus_file(path)? {
                index.upsert(doc);
            }
        } else {
            bail!("Corpus not found: {}", path.display());
        }

        tracing::info!(documents = index.len(), path = %path.display(), "corpus loaded");
        Ok(index)
    }

    /// Insert or replace a whole document (re-indexing never edits in place)
    pub fn upsert(&self, mut doc: Document) {
        if doc.embedding.len() != self.embedder.dimension() {
            doc.embedding = self.embedder.embed(&doc.full_text());
        }
        doc.tags = doc.tags.iter().map(|t| t.to_lowercase()).collect();

        let mut entries = self.entries.write();
        match entries.by_id.get(&doc.id).copied() {
            Some(slot) => entries.documents[slot] = doc,
            None => {
                let slot = entries.documents.len();
                entries.by_id.insert(doc.id.clone(), slot);
                entries.documents.push(doc);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn query_vector(&self, query: &SearchQuery) -> Result<Vec<f32>> {
        match query {
            SearchQuery::Text(text) => Ok(self.embedder.embed(text)),
            SearchQuery::Vector(v) if v.len() == self.embedder.dimension() => Ok(v.clone()),
            SearchQuery::Vector(v) => bail!(
                "Query vector has dimension {}, index expects {}",
                v.len(),
                self.embedder.dimension()
            ),
        }
    }
}

impl DocumentIndex for MemoryIndex {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn search(
        &self,
        query: &SearchQuery,
        domain_filter: Option<&DomainFilter>,
        k: usize,
    ) -> Result<Vec<ScoredDocument>> {
        let vector = self.query_vector(query)?;
        let entries = self.entries.read();

        let mut hits: Vec<ScoredDocument> = entries
            .documents
            .iter()
            .filter(|doc| domain_filter.map(|f| f.allows(doc.domain)).unwrap_or(true))
            .filter_map(|doc| {
                cosine_similarity(&vector, &doc.embedding).map(|similarity| ScoredDocument {
                    document: doc.clone(),
                    similarity,
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            b.similarity
                .total_cmp(&a.similarity)
                .then_with(|| a.document.id.cmp(&b.document.id))
        });
        hits.truncate(k);
        Ok(hits)
    }

    fn get_by_id(&self, id: &str) -> Result<Option<Document>> {
        let entries = self.entries.read();
        Ok(entries
            .by_id
            .get(id)
            .map(|slot| entries.documents[*slot].clone()))
    }

    fn list_by_tag(&self, tag: &str) -> Result<Vec<Document>> {
        let entries = self.entries.read();
        Ok(entries
            .documents
            .iter()
            .filter(|doc| doc.has_tag(tag))
            .cloned()
            .collect())
    }
}

fn is_corpus_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("json") | Some("yaml") | Some("yml")
    )
}

fn read_corpus_file(path: &Path) -> Result<Vec<Document>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus file: {}", path.display()))?;

    let parsed: CorpusFile = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse corpus file: {}", path.display()))?,
        _ => serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse corpus file: {}", path.display()))?,
    };
    Ok(parsed.into_documents())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Domain;
    use tempfile::TempDir;

    fn sample() -> MemoryIndex {
        MemoryIndex::from_documents([
            Document::new("entropy", Domain::Physics, "Entropy")
                .with_body("Entropy measures disorder in a closed system.")
                .with_tags(["disorder", "equilibrium"]),
            Document::new("evolution", Domain::Biology, "Evolution")
                .with_body("Natural selection shapes populations over generations.")
                .with_tags(["selection", "disorder"]),
            Document::new("markets", Domain::Economics, "Market equilibrium")
                .with_body("Prices balance supply and demand.")
                .with_tags(["equilibrium"]),
        ])
    }

    #[test]
    fn test_search_respects_domain_filter() {
        let index = sample();
        let filter = DomainFilter::excluding(Domain::Physics);
        let hits = index
            .search(&SearchQuery::text("entropy disorder"), Some(&filter), 10)
            .unwrap();
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|h| h.document.domain != Domain::Physics));
    }

    #[test]
    fn test_search_truncates_to_k() {
        let index = sample();
        let hits = index.search(&SearchQuery::text("equilibrium"), None, 2).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_vector_dimension_mismatch_is_error() {
        let index = sample();
        assert!(index
            .search(&SearchQuery::Vector(vec![1.0, 0.0]), None, 5)
            .is_err());
    }

    #[test]
    fn test_get_by_id_missing_is_none() {
        let index = sample();
        assert!(index.get_by_id("entropy").unwrap().is_some());
        assert!(index.get_by_id("phlogiston").unwrap().is_none());
    }

    #[test]
    fn test_list_by_tag_case_insensitive() {
        let index = sample();
        let docs = index.list_by_tag("Equilibrium").unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn test_upsert_replaces_document() {
        let index = sample();
        index.upsert(Document::new("entropy", Domain::Physics, "Entropy (revised)"));
        assert_eq!(index.len(), 3);
        assert_eq!(index.get_by_id("entropy").unwrap().unwrap().title, "Entropy (revised)");
    }

    #[test]
    fn test_load_directory_json_and_yaml() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("a.json"),
            r#"[{"id": "gaia", "domain": "ecology", "title": "Gaia", "tags": ["feedback"]}]"#,
        )
        .unwrap();
        fs::write(
            tmp.path().join("b.yaml"),
            "documents:\n  - id: cybernetics\n    domain: engineering\n    title: Cybernetics\n    tags: [feedback]\n",
        )
        .unwrap();
        fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();

        let index = MemoryIndex::load(tmp.path(), HashingEmbedder::new(64)).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.list_by_tag("feedback").unwrap().len(), 2);
    }

    #[test]
    fn test_load_missing_path_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(MemoryIndex::load(&tmp.path().join("nope.json"), HashingEmbedder::default()).is_err());
    }
}
