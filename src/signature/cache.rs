//! Per-engine signature cache
//!
//! Keyed by document id and guarded by a SHA-256 fingerprint of the content
//! the signature depends on. A changed document gets a fresh signature; an
//! entry is replaced whole, never patched.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use sha2::{Digest, Sha256};

use super::extract::extract;
use super::lexicon::Lexicon;
use super::StructuralSignature;
use crate::corpus::Document;

type Fingerprint = [u8; 32];

pub struct SignatureCache {
    lexicon: Lexicon,
    entries: RwLock<HashMap<String, (Fingerprint, Arc<StructuralSignature>)>>,
}

impl SignatureCache {
    pub fn new(lexicon: Lexicon) -> Self {
        Self {
            lexicon,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Cached signature for `document`, extracting it on miss or change
    pub fn get(&self, document: &Document) -> Arc<StructuralSignature> {
        let fingerprint = fingerprint(document);

        if let Some((cached, signature)) = self.entries.read().get(&document.id) {
            if *cached == fingerprint {
                return Arc::clone(signature);
            }
        }

        let signature = Arc::new(extract(document, &self.lexicon));
        self.entries
            .write()
            .insert(document.id.clone(), (fingerprint, Arc::clone(&signature)));
        signature
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SignatureCache {
    fn default() -> Self {
        Self::new(Lexicon::default())
    }
}

fn fingerprint(document: &Document) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(document.title.as_bytes());
    hasher.update([0u8]);
    hasher.update(document.body.as_bytes());
    for tag in &document.tags {
        hasher.update([0u8]);
        hasher.update(tag.as_bytes());
    }
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Domain;

    #[test]
    fn test_cache_hit_returns_same_arc() {
        let cache = SignatureCache::default();
        let doc = Document::new("m", Domain::Economics, "Markets").with_tags(["equilibrium"]);
        let first = cache.get(&doc);
        let second = cache.get(&doc);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_changed_content_recomputes() {
        let cache = SignatureCache::default();
        let doc = Document::new("m", Domain::Economics, "Markets").with_tags(["equilibrium"]);
        let before = cache.get(&doc);
        assert!(before.dynamics_tags.contains("equilibrium"));

        let revised = doc.with_tags(["disruption"]);
        let after = cache.get(&revised);
        assert!(after.dynamics_tags.contains("disruption"));
        assert!(!after.dynamics_tags.contains("equilibrium"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_embedding_change_does_not_invalidate() {
        let cache = SignatureCache::default();
        let doc = Document::new("m", Domain::Economics, "Markets");
        let first = cache.get(&doc);
        let second = cache.get(&doc.clone().with_embedding(vec![1.0, 0.0]));
        assert!(Arc::ptr_eq(&first, &second));
    }
}
