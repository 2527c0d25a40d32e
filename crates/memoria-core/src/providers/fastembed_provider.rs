//! Local ONNX embedding provider via `fastembed` — gated behind the
//! `fastembed-embeddings` feature.
//!
//! Wraps `nomic-embed-text-v1.5` behind a globally cached model and a
//! `Mutex` around the synchronous `fastembed` API, exposed through the
//! `EmbeddingProvider` capability trait.

use std::sync::Mutex;

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::capability::EmbeddingProvider;

/// Dimensionality of `nomic-embed-text-v1.5`.
pub const NOMIC_V1_5_DIMENSIONS: usize = 768;

/// Wraps a local fastembed model behind the `EmbeddingProvider` capability.
pub struct FastEmbedProvider {
    model: Mutex<TextEmbedding>,
}

impl FastEmbedProvider {
    /// Initialize the nomic-embed-text-v1.5 model, downloading/caching it
    /// under the platform cache directory on first use.
    pub fn new() -> Result<Self, String> {
        let options = InitOptions::new(EmbeddingModel::NomicEmbedTextV15).with_show_download_progress(true);
        let model = TextEmbedding::try_new(options).map_err(|e| format!("failed to initialize nomic-embed-text-v1.5: {e}"))?;
        Ok(Self { model: Mutex::new(model) })
    }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, String> {
        if text.is_empty() {
            return Err("cannot embed empty text".to_string());
        }
        let mut model = self.model.lock().map_err(|e| format!("embedding model lock poisoned: {e}"))?;
        let embeddings = model.embed(vec![text], None).map_err(|e| format!("embedding generation failed: {e}"))?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| "embedding model returned no vectors".to_string())
    }

    fn dimension(&self) -> usize {
        NOMIC_V1_5_DIMENSIONS
    }

    async fn is_healthy(&self) -> bool {
        self.model.lock().is_ok()
    }
}
