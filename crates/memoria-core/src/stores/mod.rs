//! In-memory reference implementations of the C3/C4/C5 store capabilities.
//!
//! Each store partitions its arena per agent (a map keyed by id) via
//! `dashmap::DashMap`. These are the default backends bound into the
//! engine; a relational or Elasticsearch-backed implementation of the
//! same traits is a drop-in replacement.

mod belief_store;
mod graph_store;
mod memory_store;

pub use belief_store::InMemoryBeliefStore;
pub use graph_store::InMemoryGraphStore;
pub use memory_store::InMemoryMemoryStore;
