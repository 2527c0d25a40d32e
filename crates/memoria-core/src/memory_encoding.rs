//! C7 — Memory Encoding Engine
//!
//! Wraps C1 (embedding) + C3 (storage). Validates, assigns an id, embeds
//! best-effort, persists, and exposes the similarity search surface.

use std::collections::HashMap;
use std::sync::Arc;

use crate::capability::{EmbeddingProvider, MemoryStore};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::ids;
use crate::model::{CategoryLabel, MemoryMetadata, MemoryRecord};
use crate::stats::EngineStats;

/// Encodes and persists memories, optionally embedding them with a
/// configured `EmbeddingProvider`. The embedder is optional — its absence
/// or failure degrades similarity search to text matching, never aborts
/// the write.
pub struct MemoryEncodingEngine {
    store: Arc<dyn MemoryStore>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    config: EngineConfig,
    stats: Arc<EngineStats>,
}

impl MemoryEncodingEngine {
    pub fn new(store: Arc<dyn MemoryStore>, embedder: Option<Arc<dyn EmbeddingProvider>>, config: EngineConfig, stats: Arc<EngineStats>) -> Self {
        Self { store, embedder, config, stats }
    }

    fn validate_content(&self, content: &str) -> Result<()> {
        if content.is_empty() {
            return Err(Error::invalid_input("content", content, "content must not be empty"));
        }
        let content_len = content.chars().count();
        if content_len > self.config.max_content_length {
            return Err(Error::invalid_input(
                "content",
                format!("<{content_len} chars>"),
                format!("content exceeds maxContentLength of {}", self.config.max_content_length),
            ));
        }
        Ok(())
    }

    async fn try_embed(&self, content: &str) -> Option<Vec<f32>> {
        let embedder = self.embedder.as_ref()?;
        if !embedder.is_healthy().await {
            tracing::warn!("embedding provider unhealthy, storing memory without an embedding");
            return None;
        }
        match embedder.embed(content).await {
            Ok(vector) => Some(vector),
            Err(reason) => {
                tracing::warn!(reason = %reason, "embedding failed, storing memory without an embedding");
                None
            }
        }
    }

    /// `encodeAndStore(content, category, metadata, agentId) -> MemoryRecord`.
    pub async fn encode_and_store(&self, agent_id: &str, content: &str, category: CategoryLabel, metadata: MemoryMetadata) -> Result<MemoryRecord> {
        self.validate_content(content)?;

        let id = ids::new_memory_id();
        let mut record = MemoryRecord::new(id, agent_id, content, category, metadata);
        record.embedding = self.try_embed(content).await;

        self.store.put(record.clone()).await?;
        self.stats.record_memory_encoded(&record.category.primary);
        Ok(record)
    }

    /// `updateMemory(record)`: re-embeds if content changed, bumps version.
    pub async fn update_memory(&self, id: &str, new_content: Option<String>, new_category: Option<CategoryLabel>) -> Result<MemoryRecord> {
        let mut record = self.store.get(id).await?.ok_or_else(|| Error::not_found("memory", id))?;

        let content_changed = match &new_content {
            Some(content) => {
                self.validate_content(content)?;
                *content != record.content
            }
            None => false,
        };

        if let Some(content) = new_content {
            record.content = content;
        }
        if let Some(category) = new_category {
            record.category = category;
        }
        if content_changed {
            record.embedding = self.try_embed(&record.content).await;
        }
        record.version += 1;

        self.store.put(record.clone()).await?;
        Ok(record)
    }

    /// `searchSimilar(query, limit, agentId?) -> [MemoryRecord]`.
    pub async fn search_similar(&self, query: &str, limit: usize, agent_id: Option<&str>) -> Result<Vec<MemoryRecord>> {
        let query_vector = match self.try_embed(query).await {
            Some(vector) => Some(vector),
            None => None,
        };
        self.store.search_similar(query, query_vector.as_deref(), limit, agent_id).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<MemoryRecord>> {
        self.store.get(id).await
    }

    pub async fn get_many(&self, ids: &[String]) -> Result<HashMap<String, MemoryRecord>> {
        self.store.get_many(ids).await
    }

    pub async fn remove(&self, id: &str) -> Result<bool> {
        self.store.remove(id).await
    }

    pub async fn remove_many(&self, ids: &[String]) -> Result<Vec<String>> {
        self.store.remove_many(ids).await
    }

    pub async fn list_for_agent(&self, agent_id: &str, limit: usize) -> Result<Vec<MemoryRecord>> {
        self.store.list_for_agent(agent_id, limit).await
    }

    pub async fn list_in_category(&self, category: &str, agent_id: Option<&str>, limit: usize) -> Result<Vec<MemoryRecord>> {
        self.store.list_in_category(category, agent_id, limit).await
    }

    pub async fn list_older_than(&self, age_seconds: i64, agent_id: Option<&str>, limit: usize) -> Result<Vec<MemoryRecord>> {
        self.store.list_older_than(age_seconds, agent_id, limit).await
    }
}
