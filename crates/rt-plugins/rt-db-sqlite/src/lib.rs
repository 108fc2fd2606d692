//! # rt-db-sqlite Implementation
//!
//! This module implements the data mapping between the SQLite relational
//! model and the `rt-core` domain models. Items live in one table with a
//! JSON text column for the tag array; the settings singleton is a JSON
//! document keyed by a fixed sentinel row.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rt_core::models::{Item, ItemPatch, Settings};
use rt_core::query::{ItemQuery, SortDirection, SortField};
use rt_core::traits::{ItemRepo, SettingsRepo};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

/// Row key of the settings singleton.
const SETTINGS_KEY: &str = "user";

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if missing) the database and ensures the schema.
    ///
    /// The pool is capped at a single connection: the process holds one
    /// store connection for its lifetime, and `sqlite::memory:` databases
    /// are per-connection.
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS items (
                id          INTEGER PRIMARY KEY,
                name        TEXT NOT NULL,
                description TEXT NOT NULL,
                category    TEXT NOT NULL,
                priority    INTEGER NOT NULL,
                tags        TEXT NOT NULL,
                due_date    TEXT,
                created_at  TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                doc TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await?;

        log::info!("sqlite store ready at {url}");
        Ok(Self { pool })
    }
}

fn row_to_item(row: &SqliteRow) -> Item {
    Item {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        category: row.get("category"),
        priority: row.get("priority"),
        tags: serde_json::from_str(&row.get::<String, _>("tags")).unwrap_or_default(),
        due_date: row.get::<Option<NaiveDate>, _>("due_date"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
    }
}

fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::Id => "id",
        SortField::Name => "name",
        SortField::Description => "description",
        SortField::Category => "category",
        SortField::Priority => "priority",
        SortField::DueDate => "due_date",
        SortField::CreatedAt => "created_at",
    }
}

/// Escapes LIKE wildcards so the search term matches as a literal substring.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Renders the filter conjunction to a WHERE clause plus its text binds.
/// SQLite's LIKE is case-insensitive, matching the query contract.
fn where_clause(query: &ItemQuery) -> (String, Vec<String>) {
    let mut conditions = Vec::new();
    let mut binds = Vec::new();

    if let Some(search) = &query.filter.search {
        conditions.push(
            "(name LIKE '%' || ? || '%' ESCAPE '\\' \
             OR description LIKE '%' || ? || '%' ESCAPE '\\')"
                .to_string(),
        );
        let escaped = escape_like(search);
        binds.push(escaped.clone());
        binds.push(escaped);
    }

    if !query.filter.any_tags.is_empty() {
        let placeholders = vec!["?"; query.filter.any_tags.len()].join(", ");
        conditions.push(format!(
            "EXISTS (SELECT 1 FROM json_each(items.tags) \
             WHERE json_each.value IN ({placeholders}))"
        ));
        binds.extend(query.filter.any_tags.iter().cloned());
    }

    if conditions.is_empty() {
        (String::new(), binds)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), binds)
    }
}

#[async_trait]
impl ItemRepo for SqliteStore {
    async fn list(&self, query: &ItemQuery) -> anyhow::Result<(Vec<Item>, u64)> {
        let (clause, binds) = where_clause(query);

        let count_sql = format!("SELECT COUNT(*) FROM items{clause}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for value in &binds {
            count_query = count_query.bind(value.as_str());
        }
        let total = count_query.fetch_one(&self.pool).await?;

        let direction = match query.sort.direction {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        };
        let page_sql = format!(
            "SELECT id, name, description, category, priority, tags, due_date, created_at \
             FROM items{clause} ORDER BY {} {direction} LIMIT ? OFFSET ?",
            sort_column(query.sort.field),
        );
        let mut page_query = sqlx::query(&page_sql);
        for value in &binds {
            page_query = page_query.bind(value.as_str());
        }
        let rows = page_query
            .bind(query.take)
            .bind(query.skip.max(0))
            .fetch_all(&self.pool)
            .await?;

        Ok((rows.iter().map(row_to_item).collect(), total as u64))
    }

    async fn insert(&self, item: &Item) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO items (id, name, description, category, priority, tags, due_date, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.category)
        .bind(item.priority)
        .bind(serde_json::to_string(&item.tags)?)
        .bind(item.due_date)
        .bind(item.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Read-merge-write inside a transaction so the shallow merge applies
    /// against a consistent snapshot of the record.
    async fn update(&self, id: i64, patch: &ItemPatch) -> anyhow::Result<Option<Item>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT * FROM items WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let mut item = match row {
            Some(row) => row_to_item(&row),
            None => return Ok(None),
        };

        patch.apply(&mut item);

        sqlx::query(
            "UPDATE items SET name = ?, description = ?, category = ?, \
             priority = ?, tags = ?, due_date = ? WHERE id = ?",
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.category)
        .bind(item.priority)
        .bind(serde_json::to_string(&item.tags)?)
        .bind(item.due_date)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(item))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl SettingsRepo for SqliteStore {
    async fn load(&self) -> anyhow::Result<Option<Settings>> {
        let row = sqlx::query("SELECT doc FROM settings WHERE key = ?")
            .bind(SETTINGS_KEY)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(Some(serde_json::from_str(&row.get::<String, _>("doc"))?)),
            None => Ok(None),
        }
    }

    async fn store(&self, settings: &Settings) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO settings (key, doc) VALUES (?, ?) \
             ON CONFLICT(key) DO UPDATE SET doc = excluded.doc",
        )
        .bind(SETTINGS_KEY)
        .bind(serde_json::to_string(settings)?)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
