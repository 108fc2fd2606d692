//! rusty-tracker/crates/rt-core/src/lib.rs
//!
//! The central domain logic and interface definitions for Rusty-Tracker.

pub mod error;
pub mod models;
pub mod query;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use query::*;
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::models::*;
    use chrono::Utc;

    #[test]
    fn test_draft_materialization() {
        let now = Utc::now();
        let draft = ItemDraft {
            name: "Write adapters".to_string(),
            description: "SQLite first".to_string(),
            category: "Backend".to_string(),
            priority: 3,
            tags: vec!["work".to_string()],
            due_date: None,
        };
        let item = draft.into_item(1_700_000_000_000, now);
        assert_eq!(item.id, 1_700_000_000_000);
        assert_eq!(item.created_at, now);
        assert_eq!(item.priority, 3);
    }
}
