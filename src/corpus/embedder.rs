//! Hashing embedder - deterministic bag-of-words vectors
//!
//! Used by the in-memory reference index for free-text queries and for
//! corpus records that arrive without an embedding. Each content word is
//! hashed (SHA-256) into a signed bucket; the result is L2-normalized.

use sha2::{Digest, Sha256};

use super::similarity::normalize;
use super::text::content_words;

pub const DEFAULT_DIMENSION: usize = 256;

#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for word in content_words(text) {
            let digest = Sha256::digest(word.as_bytes());
            let mut bucket_bytes = [0u8; 8];
            bucket_bytes.copy_from_slice(&digest[..8]);
            let bucket = (u64::from_le_bytes(bucket_bytes) % self.dimension as u64) as usize;
            let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }
        normalize(&mut vector);
        vector
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::similarity::cosine_similarity;

    #[test]
    fn test_embed_is_deterministic() {
        let embedder = HashingEmbedder::default();
        let a = embedder.embed("Entropy measures disorder in a closed system");
        let b = embedder.embed("Entropy measures disorder in a closed system");
        assert_eq!(a, b);
        assert_eq!(a.len(), DEFAULT_DIMENSION);
    }

    #[test]
    fn test_shared_words_increase_similarity() {
        let embedder = HashingEmbedder::default();
        let base = embedder.embed("natural selection drives adaptation");
        let close = embedder.embed("selection pressure drives adaptation in populations");
        let far = embedder.embed("sonata form in classical music");
        let sim_close = cosine_similarity(&base, &close).unwrap();
        let sim_far = cosine_similarity(&base, &far).unwrap();
        assert!(sim_close > sim_far);
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = HashingEmbedder::new(8);
        assert!(embedder.embed("the of and").iter().all(|x| *x == 0.0));
    }
}
