//! Deterministic hashing embedder — the always-available default C1
//! implementation.
//!
//! Hashes character trigrams into a fixed-length vector (a variant of
//! feature hashing / the "hashing trick") and L2-normalizes it, so cosine
//! similarity behaves sensibly without any model weights. Grounded in the
//! teacher's `embeddings::local::Embedding::normalize` math, generalized
//! off fastembed so the capability is always satisfiable.

use async_trait::async_trait;

use crate::capability::EmbeddingProvider;

/// Embeds text by hashing character trigrams into buckets and L2-normalizing.
pub struct DeterministicEmbedder {
    dimension: usize,
}

impl DeterministicEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension: dimension.max(1) }
    }
}

impl Default for DeterministicEmbedder {
    /// Small default dimension; production deployments should construct
    /// with `EngineConfig::embedding_dimension` (typically 1536).
    fn default() -> Self {
        Self::new(256)
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

fn hash_embed(text: &str, dimension: usize) -> Vec<f32> {
    let mut vector = vec![0.0_f32; dimension];
    let normalized = text.to_lowercase();
    let chars: Vec<char> = normalized.chars().collect();

    if chars.is_empty() {
        return vector;
    }

    let window = 3.min(chars.len());
    for i in 0..=chars.len() - window {
        let gram: String = chars[i..i + window].iter().collect();
        let hash = fnv1a(gram.as_bytes());
        let bucket = (hash as usize) % dimension;
        // sign bit from a second hash decorrelates magnitude from bucket index
        let sign = if (hash >> 63) & 1 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign;
    }

    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut vector {
            *x /= norm;
        }
    }
    vector
}

#[async_trait]
impl EmbeddingProvider for DeterministicEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, String> {
        if text.is_empty() {
            return Err("cannot embed empty text".to_string());
        }
        Ok(hash_embed(text, self.dimension))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
