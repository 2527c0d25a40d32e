//! C3 — Memory Store capability.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::MemoryRecord;

/// Persists `MemoryRecord`s keyed by id, partitioned per agent.
///
/// `get` updates `last_accessed`/`access_count` atomically with the read.
/// `put` fails if `id` is empty; on replace, the new record's `version`
/// must strictly exceed the stored one.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    async fn put(&self, record: MemoryRecord) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Option<MemoryRecord>>;

    async fn get_many(&self, ids: &[String]) -> Result<HashMap<String, MemoryRecord>>;

    async fn remove(&self, id: &str) -> Result<bool>;

    async fn remove_many(&self, ids: &[String]) -> Result<Vec<String>>;

    /// Similarity search. `query_vector`, when present, drives cosine
    /// comparison against stored embeddings; otherwise the store falls
    /// back to text similarity. Ordered by decreasing similarity, ties
    /// broken by `last_accessed` descending; results below the store's
    /// configured threshold are dropped.
    async fn search_similar(&self, query_text: &str, query_vector: Option<&[f32]>, limit: usize, agent_id: Option<&str>) -> Result<Vec<MemoryRecord>>;

    async fn list_for_agent(&self, agent_id: &str, limit: usize) -> Result<Vec<MemoryRecord>>;

    async fn list_in_category(&self, category: &str, agent_id: Option<&str>, limit: usize) -> Result<Vec<MemoryRecord>>;

    async fn list_older_than(&self, age_seconds: i64, agent_id: Option<&str>, limit: usize) -> Result<Vec<MemoryRecord>>;
}
