//! Black-box coverage of the six end-to-end ingestion scenarios: new
//! belief, reinforcement, conflict resolution, deprecation chain, dry
//! run, and extraction-provider fallback.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use memoria_e2e_tests::fixtures::{candidate, engine_with_extractor, ingest_input, ScriptedExtractionProvider};
use memoria_core::model::{Belief, BeliefConflict, CategoryLabel};
use memoria_core::{BeliefAnalysisStatus, ConflictKind, ResolutionStrategy};

#[tokio::test]
async fn new_belief_created_when_no_similar_belief_exists() {
    let extractor = Arc::new(ScriptedExtractionProvider::new().push(vec![candidate("User likes pizza", 0.8, true)], 0.0));
    let engine = engine_with_extractor(extractor);

    let result = engine.ingest(ingest_input("agent-a", "I love pizza")).await.unwrap();

    assert!(result.encoded);
    assert_eq!(result.belief_analysis, BeliefAnalysisStatus::Completed);
    assert_eq!(result.new_belief_ids.len(), 1);
    assert!(result.reinforced_belief_ids.is_empty());
}

#[tokio::test]
async fn second_similar_ingest_reinforces_instead_of_duplicating() {
    let extractor = Arc::new(
        ScriptedExtractionProvider::new()
            .push(vec![candidate("User likes pizza", 0.8, true)], 0.0)
            .push(vec![candidate("User likes pizza", 0.8, true)], 0.95),
    );
    let engine = engine_with_extractor(extractor);

    let first = engine.ingest(ingest_input("agent-a", "I love pizza")).await.unwrap();
    assert_eq!(first.new_belief_ids.len(), 1);

    let second = engine.ingest(ingest_input("agent-a", "Pizza is still my favorite")).await.unwrap();
    assert!(second.new_belief_ids.is_empty());
    assert_eq!(second.reinforced_belief_ids.len(), 1);
    assert_eq!(second.reinforced_belief_ids[0], first.new_belief_ids[0]);

    let belief = engine.beliefs().get_belief(&first.new_belief_ids[0]).await.unwrap().unwrap();
    assert_eq!(belief.reinforcement_count, 1);
    assert!((belief.confidence - (0.8 + engine.config().reinforcement_increment)).abs() < 1e-9);
}

#[tokio::test]
async fn conflicting_beliefs_resolve_with_newer_wins() {
    let extractor = Arc::new(ScriptedExtractionProvider::new());
    let engine = engine_with_extractor(extractor);

    let mut older = Belief::new("belief_old".to_string(), "agent-a", "User lives in Austin", 0.6, CategoryLabel::new("fact", 0.8), "mem_seed_1");
    older.created_at = Utc::now() - Duration::days(2);
    let mut newer = Belief::new("belief_new".to_string(), "agent-a", "User lives in Denver", 0.6, CategoryLabel::new("fact", 0.8), "mem_seed_2");
    newer.created_at = Utc::now();

    engine.beliefs().put_belief(older.clone()).await.unwrap();
    engine.beliefs().put_belief(newer.clone()).await.unwrap();

    let conflict = BeliefConflict::belief_vs_belief("conflict_1".to_string(), "agent-a", older.id.clone(), newer.id.clone());
    engine.beliefs().put_conflict(conflict.clone()).await.unwrap();

    let mut overrides = HashMap::new();
    overrides.insert(ConflictKind::BeliefBelief, ResolutionStrategy::NewerWins);
    engine.brca().configure_resolution_strategies(overrides).await;

    let resolved = engine.brca().resolve_conflict(conflict).await.unwrap();
    assert!(resolved.resolved);

    let older_after = engine.beliefs().get_belief(&older.id).await.unwrap().unwrap();
    let newer_after = engine.beliefs().get_belief(&newer.id).await.unwrap().unwrap();
    assert!(!older_after.active);
    assert!(newer_after.active);
}

#[tokio::test]
async fn deprecate_belief_with_creates_chain_and_deactivates_old() {
    let extractor = Arc::new(ScriptedExtractionProvider::new());
    let engine = engine_with_extractor(extractor);

    let v1 = Belief::new("belief_v1".to_string(), "agent-a", "The API uses REST", 0.7, CategoryLabel::new("fact", 0.8), "mem_1");
    let v2 = Belief::new("belief_v2".to_string(), "agent-a", "The API uses GraphQL", 0.7, CategoryLabel::new("fact", 0.8), "mem_2");
    engine.beliefs().put_belief(v1.clone()).await.unwrap();
    engine.beliefs().put_belief(v2.clone()).await.unwrap();

    let edge = engine.graph().deprecate_belief_with("agent-a", &v1.id, &v2.id, "migrated to GraphQL").await.unwrap();
    assert_eq!(edge.source_belief_id, v2.id);
    assert_eq!(edge.target_belief_id, v1.id);

    let v1_after = engine.beliefs().get_belief(&v1.id).await.unwrap().unwrap();
    assert!(!v1_after.active);

    let deprecated = engine.graph().find_deprecated("agent-a").await.unwrap();
    assert!(deprecated.contains(&v1.id));
}

#[tokio::test]
async fn dry_run_produces_preview_without_persisting_anything() {
    let extractor = Arc::new(ScriptedExtractionProvider::new().push(vec![candidate("User likes tea", 0.8, true)], 0.0));
    let engine = engine_with_extractor(extractor);

    let mut input = ingest_input("agent-a", "I love tea");
    input.dry_run = true;

    let result = engine.ingest(input).await.unwrap();
    assert!(result.dry_run);
    assert!(!result.encoded);
    assert_eq!(result.belief_analysis, BeliefAnalysisStatus::SkippedDryRun);
    assert!(result.memory_id.unwrap().starts_with("dry-run-"));

    let beliefs = engine.beliefs().beliefs_for_agent("agent-a", true).await.unwrap();
    assert!(beliefs.is_empty());
}

#[tokio::test]
async fn unhealthy_extraction_provider_falls_back_to_pattern_extraction() {
    let extractor = Arc::new(ScriptedExtractionProvider::new().with_healthy(false));
    let engine = engine_with_extractor(extractor);

    let result = engine.ingest(ingest_input("agent-a", "I love coffee")).await.unwrap();

    assert!(result.encoded);
    assert_eq!(result.belief_analysis, BeliefAnalysisStatus::Completed);
    assert_eq!(result.new_belief_ids.len(), 1);

    let belief = engine.beliefs().get_belief(&result.new_belief_ids[0]).await.unwrap().unwrap();
    assert_eq!(belief.statement, "User love coffee");
}
