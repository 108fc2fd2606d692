//! # Core Traits (Ports)
//!
//! Any store plugin must implement these traits to be used by the binary.

use async_trait::async_trait;
use crate::models::{Item, ItemPatch, Settings};
use crate::query::ItemQuery;

/// Data persistence contract for the items collection.
#[async_trait]
pub trait ItemRepo: Send + Sync {
    /// Executes a resolved query, returning the requested page and the
    /// total count of the filtered set before pagination.
    async fn list(&self, query: &ItemQuery) -> anyhow::Result<(Vec<Item>, u64)>;

    async fn insert(&self, item: &Item) -> anyhow::Result<()>;

    /// Shallow-merges the patch over the record matching `id`.
    /// Returns `None` when no record matches.
    async fn update(&self, id: i64, patch: &ItemPatch) -> anyhow::Result<Option<Item>>;

    /// Returns `false` when no record matched.
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
}

/// Persistence contract for the settings singleton.
#[async_trait]
pub trait SettingsRepo: Send + Sync {
    /// Reads the singleton. `None` means nothing has been persisted yet;
    /// readers fall back to [`Settings::default`] without persisting it.
    async fn load(&self) -> anyhow::Result<Option<Settings>>;

    /// Create-or-replace keyed by the fixed sentinel identity.
    async fn store(&self, settings: &Settings) -> anyhow::Result<()>;
}
