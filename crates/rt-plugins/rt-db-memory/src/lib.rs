//! # rt-db-memory
//!
//! In-memory implementation of the store contracts, used for local
//! development and handler tests. Filtering and ordering delegate to
//! `rt-core::query` so this plugin and the SQLite one agree on semantics.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use rt_core::models::{Item, ItemPatch, Settings};
use rt_core::query::{sort_items, ItemQuery};
use rt_core::traits::{ItemRepo, SettingsRepo};

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    items: RwLock<Vec<Item>>,
    settings: RwLock<Option<Settings>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store for tests and local development.
    pub fn with_items(items: Vec<Item>) -> Self {
        let store = Self::new();
        *store.inner.items.write().unwrap() = items;
        store
    }
}

#[async_trait]
impl ItemRepo for MemoryStore {
    async fn list(&self, query: &ItemQuery) -> anyhow::Result<(Vec<Item>, u64)> {
        let items = self.inner.items.read().unwrap();
        let mut matched: Vec<Item> = items
            .iter()
            .filter(|item| query.filter.matches(item))
            .cloned()
            .collect();
        drop(items);

        let total = matched.len() as u64;
        sort_items(&mut matched, &query.sort);

        let skip = query.skip.max(0) as usize;
        let take = query.take.max(0) as usize;
        let page = matched.into_iter().skip(skip).take(take).collect();
        Ok((page, total))
    }

    async fn insert(&self, item: &Item) -> anyhow::Result<()> {
        self.inner.items.write().unwrap().push(item.clone());
        Ok(())
    }

    async fn update(&self, id: i64, patch: &ItemPatch) -> anyhow::Result<Option<Item>> {
        let mut items = self.inner.items.write().unwrap();
        Ok(items.iter_mut().find(|item| item.id == id).map(|item| {
            patch.apply(item);
            item.clone()
        }))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let mut items = self.inner.items.write().unwrap();
        let before = items.len();
        items.retain(|item| item.id != id);
        Ok(items.len() < before)
    }
}

#[async_trait]
impl SettingsRepo for MemoryStore {
    async fn load(&self) -> anyhow::Result<Option<Settings>> {
        Ok(self.inner.settings.read().unwrap().clone())
    }

    async fn store(&self, settings: &Settings) -> anyhow::Result<()> {
        *self.inner.settings.write().unwrap() = Some(settings.clone());
        Ok(())
    }
}
