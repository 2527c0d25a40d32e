//! In-memory reference implementation of `MemoryStore` (C3).

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use crate::capability::{text_jaccard_similarity, cosine_similarity, MemoryStore};
use crate::error::{Error, Result};
use crate::model::MemoryRecord;

/// A per-agent arena of memory records behind a concurrent map.
pub struct InMemoryMemoryStore {
    records: DashMap<String, MemoryRecord>,
    similarity_drop_threshold: f64,
}

impl Default for InMemoryMemoryStore {
    fn default() -> Self {
        Self::new(0.15)
    }
}

impl InMemoryMemoryStore {
    pub fn new(similarity_drop_threshold: f64) -> Self {
        Self { records: DashMap::new(), similarity_drop_threshold }
    }

    fn score(&self, record: &MemoryRecord, query_text: &str, query_vector: Option<&[f32]>) -> f64 {
        match (query_vector, record.embedding.as_deref()) {
            (Some(q), Some(e)) => cosine_similarity(q, e) as f64,
            _ => text_jaccard_similarity(query_text, &record.content),
        }
    }
}

#[async_trait]
impl MemoryStore for InMemoryMemoryStore {
    async fn put(&self, record: MemoryRecord) -> Result<()> {
        if record.id.is_empty() {
            return Err(Error::invalid_input("id", "", "memory record must have an assigned id"));
        }
        if let Some(existing) = self.records.get(&record.id) {
            if record.version <= existing.version {
                return Err(Error::storage(
                    "put",
                    format!("version must strictly increase (existing {}, got {})", existing.version, record.version),
                ));
            }
        }
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<MemoryRecord>> {
        match self.records.get_mut(id) {
            Some(mut entry) => {
                entry.touch();
                Ok(Some(entry.clone()))
            }
            None => Ok(None),
        }
    }

    async fn get_many(&self, ids: &[String]) -> Result<HashMap<String, MemoryRecord>> {
        let mut out = HashMap::new();
        for id in ids {
            if let Some(record) = self.get(id).await? {
                out.insert(id.clone(), record);
            }
        }
        Ok(out)
    }

    async fn remove(&self, id: &str) -> Result<bool> {
        Ok(self.records.remove(id).is_some())
    }

    async fn remove_many(&self, ids: &[String]) -> Result<Vec<String>> {
        let mut removed = Vec::new();
        for id in ids {
            if self.records.remove(id).is_some() {
                removed.push(id.clone());
            }
        }
        Ok(removed)
    }

    async fn search_similar(&self, query_text: &str, query_vector: Option<&[f32]>, limit: usize, agent_id: Option<&str>) -> Result<Vec<MemoryRecord>> {
        let mut scored: Vec<(f64, MemoryRecord)> = self
            .records
            .iter()
            .filter(|entry| agent_id.map(|a| a == entry.agent_id).unwrap_or(true))
            .map(|entry| (self.score(&entry, query_text, query_vector), entry.clone()))
            .filter(|(score, _)| *score >= self.similarity_drop_threshold)
            .collect();

        scored.sort_by(|(score_a, rec_a), (score_b, rec_b)| {
            score_b
                .partial_cmp(score_a)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| rec_b.last_accessed.cmp(&rec_a.last_accessed))
        });

        Ok(scored.into_iter().take(limit).map(|(_, rec)| rec).collect())
    }

    async fn list_for_agent(&self, agent_id: &str, limit: usize) -> Result<Vec<MemoryRecord>> {
        let mut records: Vec<MemoryRecord> = self
            .records
            .iter()
            .filter(|entry| entry.agent_id == agent_id)
            .map(|entry| entry.clone())
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        Ok(records)
    }

    async fn list_in_category(&self, category: &str, agent_id: Option<&str>, limit: usize) -> Result<Vec<MemoryRecord>> {
        let mut records: Vec<MemoryRecord> = self
            .records
            .iter()
            .filter(|entry| entry.category.primary == category)
            .filter(|entry| agent_id.map(|a| a == entry.agent_id).unwrap_or(true))
            .map(|entry| entry.clone())
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        Ok(records)
    }

    async fn list_older_than(&self, age_seconds: i64, agent_id: Option<&str>, limit: usize) -> Result<Vec<MemoryRecord>> {
        let cutoff = Utc::now() - chrono::Duration::seconds(age_seconds);
        let mut records: Vec<MemoryRecord> = self
            .records
            .iter()
            .filter(|entry| entry.created_at <= cutoff)
            .filter(|entry| agent_id.map(|a| a == entry.agent_id).unwrap_or(true))
            .map(|entry| entry.clone())
            .collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        records.truncate(limit);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CategoryLabel, MemoryMetadata};

    fn sample(id: &str, agent: &str, content: &str, version: u64) -> MemoryRecord {
        let mut record = MemoryRecord::new(id.to_string(), agent, content, CategoryLabel::new("fact", 0.8), MemoryMetadata::new());
        record.version = version;
        record
    }

    #[tokio::test]
    async fn put_get_roundtrip_bumps_access_count() {
        let store = InMemoryMemoryStore::new(0.15);
        store.put(sample("mem_1", "agent-a", "hello world", 1)).await.unwrap();
        let fetched = store.get("mem_1").await.unwrap().unwrap();
        assert_eq!(fetched.metadata.access_count, 1);
        let fetched_again = store.get("mem_1").await.unwrap().unwrap();
        assert_eq!(fetched_again.metadata.access_count, 2);
    }

    #[tokio::test]
    async fn put_rejects_empty_id() {
        let store = InMemoryMemoryStore::new(0.15);
        let err = store.put(sample("", "agent-a", "hi", 1)).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn put_requires_strictly_increasing_version_on_replace() {
        let store = InMemoryMemoryStore::new(0.15);
        store.put(sample("mem_1", "agent-a", "hello", 1)).await.unwrap();
        let err = store.put(sample("mem_1", "agent-a", "hello v2", 1)).await.unwrap_err();
        assert!(matches!(err, Error::Storage { .. }));
        store.put(sample("mem_1", "agent-a", "hello v2", 2)).await.unwrap();
    }

    #[tokio::test]
    async fn search_similar_orders_by_score_then_recency() {
        let store = InMemoryMemoryStore::new(0.15);
        store.put(sample("mem_1", "agent-a", "user likes pizza", 1)).await.unwrap();
        store.put(sample("mem_2", "agent-a", "user likes pizza and pasta", 1)).await.unwrap();
        let results = store.search_similar("user likes pizza", None, 10, Some("agent-a")).await.unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0].id, "mem_1");
    }

    #[tokio::test]
    async fn list_for_agent_is_scoped() {
        let store = InMemoryMemoryStore::new(0.15);
        store.put(sample("mem_1", "agent-a", "x", 1)).await.unwrap();
        store.put(sample("mem_2", "agent-b", "y", 1)).await.unwrap();
        let results = store.list_for_agent("agent-a", 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "mem_1");
    }

    #[tokio::test]
    async fn search_similar_honors_configured_drop_threshold() {
        let store = InMemoryMemoryStore::new(0.9);
        store.put(sample("mem_1", "agent-a", "user likes pizza", 1)).await.unwrap();
        store.put(sample("mem_2", "agent-a", "user likes pizza and pasta and breadsticks", 1)).await.unwrap();
        let results = store.search_similar("user likes pizza", None, 10, Some("agent-a")).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "mem_1");
    }

    #[tokio::test]
    async fn remove_many_reports_what_was_actually_removed() {
        let store = InMemoryMemoryStore::new(0.15);
        store.put(sample("mem_1", "agent-a", "x", 1)).await.unwrap();
        let removed = store.remove_many(&["mem_1".to_string(), "mem_missing".to_string()]).await.unwrap();
        assert_eq!(removed, vec!["mem_1".to_string()]);
    }
}
