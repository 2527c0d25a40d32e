//! Black-box coverage of the ingestion entrypoint's validation boundaries
//! and stats accounting, driven entirely through `Engine`.

use std::sync::Arc;

use chrono::{Duration, Utc};
use memoria_core::Error;
use memoria_e2e_tests::fixtures::{candidate, engine_with_extractor, ingest_input, ScriptedExtractionProvider};

#[tokio::test]
async fn empty_agent_id_is_rejected_before_any_store_write() {
    let engine = engine_with_extractor(Arc::new(ScriptedExtractionProvider::new()));
    let mut input = ingest_input("", "hello there");
    input.agent_id = String::new();

    let errors = engine.validate(&input);
    assert_eq!(errors.len(), 1);

    let err = engine.ingest(input).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput { .. }));

    let stats = engine.stats();
    assert_eq!(stats.memories_encoded, 0);
}

#[tokio::test]
async fn content_over_max_length_is_rejected() {
    let engine = engine_with_extractor(Arc::new(ScriptedExtractionProvider::new()));
    let oversized = "a".repeat(engine.config().max_content_length + 1);
    let input = ingest_input("agent-a", &oversized);

    assert_eq!(engine.validate(&input).len(), 1);
    let err = engine.ingest(input).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput { .. }));
}

#[tokio::test]
async fn empty_content_is_rejected() {
    let engine = engine_with_extractor(Arc::new(ScriptedExtractionProvider::new()));
    let input = ingest_input("agent-a", "");
    assert_eq!(engine.validate(&input).len(), 1);
}

#[tokio::test]
async fn timestamp_far_in_the_future_is_rejected() {
    let engine = engine_with_extractor(Arc::new(ScriptedExtractionProvider::new()));
    let mut input = ingest_input("agent-a", "hello there");
    input.timestamp = Some(Utc::now() + Duration::seconds(engine.config().max_clock_skew_seconds + 3600));

    assert_eq!(engine.validate(&input).len(), 1);
    let err = engine.ingest(input).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput { .. }));
}

#[tokio::test]
async fn timestamp_within_skew_is_accepted() {
    let extractor = Arc::new(ScriptedExtractionProvider::new().push(vec![candidate("User likes tea", 0.8, true)], 0.0));
    let engine = engine_with_extractor(extractor);
    let mut input = ingest_input("agent-a", "I love tea");
    input.timestamp = Some(Utc::now() + Duration::seconds(engine.config().max_clock_skew_seconds - 1));

    assert!(engine.validate(&input).is_empty());
    let result = engine.ingest(input).await.unwrap();
    assert!(result.encoded);
}

#[tokio::test]
async fn successful_ingest_increments_engine_stats() {
    let extractor = Arc::new(ScriptedExtractionProvider::new().push(vec![candidate("User likes tea", 0.8, true)], 0.0));
    let engine = engine_with_extractor(extractor);

    engine.ingest(ingest_input("agent-a", "I love tea")).await.unwrap();

    let stats = engine.stats();
    assert_eq!(stats.memories_encoded, 1);
    assert_eq!(stats.beliefs_created, 1);
}
