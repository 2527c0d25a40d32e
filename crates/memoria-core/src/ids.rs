//! Identifier Generation
//!
//! All identifiers are opaque, globally unique strings assigned by the
//! core — never by callers. Each entity kind gets a fixed prefix so ids
//! are self-describing in logs: `{prefix}_{uuid-v4}`.

use uuid::Uuid;

fn new_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4())
}

pub fn new_memory_id() -> String {
    new_id("mem")
}

pub fn new_belief_id() -> String {
    new_id("belief")
}

pub fn new_conflict_id() -> String {
    new_id("conflict")
}

pub fn new_relationship_id() -> String {
    new_id("rel")
}

pub fn new_dry_run_id() -> String {
    format!("dry-run-{}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_carry_expected_prefix_and_are_unique() {
        let a = new_memory_id();
        let b = new_memory_id();
        assert!(a.starts_with("mem_"));
        assert_ne!(a, b);

        assert!(new_belief_id().starts_with("belief_"));
        assert!(new_conflict_id().starts_with("conflict_"));
        assert!(new_relationship_id().starts_with("rel_"));
        assert!(new_dry_run_id().starts_with("dry-run-"));
    }
}
