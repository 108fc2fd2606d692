//! # Domain Models
//!
//! These structs represent the core entities of Rusty-Tracker and double as
//! the wire format: field names are camelCase on the wire to match the
//! public API contract.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single tracked item (a task-like record).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Application-assigned integer id (epoch milliseconds at creation).
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Advisory enumeration — stored as an open string, not validated.
    pub category: String,
    /// Advisory enumeration: 1 = Low, 2 = Medium, 3 = High.
    pub priority: i32,
    /// Order-preserving tag list; order carries no meaning.
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Set once at creation, never altered by updates.
    pub created_at: DateTime<Utc>,
}

/// Creation payload: everything but the server-assigned `id`/`createdAt`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(default = "default_priority")]
    pub priority: i32,
    pub tags: Vec<String>,
    pub due_date: Option<NaiveDate>,
}

fn default_priority() -> i32 {
    1
}

impl ItemDraft {
    /// Materializes the draft into a full record with server-assigned identity.
    pub fn into_item(self, id: i64, created_at: DateTime<Utc>) -> Item {
        Item {
            id,
            name: self.name,
            description: self.description,
            category: self.category,
            priority: self.priority,
            tags: self.tags,
            due_date: self.due_date,
            created_at,
        }
    }
}

/// Partial update: supplied fields overwrite, absent fields are retained.
/// Identity fields (`id`, `createdAt`) are deliberately not patchable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<i32>,
    pub tags: Option<Vec<String>>,
    pub due_date: Option<NaiveDate>,
}

impl ItemPatch {
    /// Shallow merge over an existing record.
    pub fn apply(&self, item: &mut Item) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
        if let Some(category) = &self.category {
            item.category = category.clone();
        }
        if let Some(priority) = self.priority {
            item.priority = priority;
        }
        if let Some(tags) = &self.tags {
            item.tags = tags.clone();
        }
        if let Some(due_date) = self.due_date {
            item.due_date = Some(due_date);
        }
    }
}

/// The response envelope for the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub data: Vec<Item>,
    pub total: u64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: u64,
}

/// Visual theme for the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

/// Per-user display preferences — a singleton record keyed by a fixed
/// sentinel identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub user_name: String,
    pub theme: Theme,
    pub items_per_page: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user_name: "Guest".to_string(),
            theme: Theme::Dark,
            items_per_page: 5,
        }
    }
}

/// Partial settings update for the upsert endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub user_name: Option<String>,
    pub theme: Option<Theme>,
    pub items_per_page: Option<u32>,
}

impl Settings {
    /// Merges a partial update over this record, yielding the upsert result.
    pub fn merged(&self, patch: &SettingsPatch) -> Settings {
        Settings {
            user_name: patch.user_name.clone().unwrap_or_else(|| self.user_name.clone()),
            theme: patch.theme.unwrap_or(self.theme),
            items_per_page: patch.items_per_page.unwrap_or(self.items_per_page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_item() -> Item {
        Item {
            id: 7,
            name: "Learn sqlx".into(),
            description: "Runtime queries".into(),
            category: "Backend".into(),
            priority: 2,
            tags: vec!["study".into()],
            due_date: None,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn patch_overwrites_supplied_and_retains_rest() {
        let mut item = sample_item();
        let created = item.created_at;
        let patch = ItemPatch {
            name: Some("New".into()),
            priority: Some(3),
            ..Default::default()
        };
        patch.apply(&mut item);
        assert_eq!(item.name, "New");
        assert_eq!(item.priority, 3);
        assert_eq!(item.description, "Runtime queries");
        assert_eq!(item.id, 7);
        assert_eq!(item.created_at, created);
    }

    #[test]
    fn patch_ignores_identity_fields_in_body() {
        // Extra keys like "id"/"createdAt" in the JSON body simply have no
        // landing spot in the patch struct.
        let patch: ItemPatch =
            serde_json::from_str(r#"{"id": 999, "createdAt": "2020-01-01T00:00:00Z", "name": "N"}"#)
                .unwrap();
        assert_eq!(patch.name.as_deref(), Some("N"));
    }

    #[test]
    fn draft_defaults_fill_missing_fields() {
        let draft: ItemDraft = serde_json::from_str(r#"{"name": "T"}"#).unwrap();
        assert_eq!(draft.name, "T");
        assert_eq!(draft.priority, 1);
        assert!(draft.tags.is_empty());
        assert!(draft.due_date.is_none());
    }

    #[test]
    fn item_serializes_camel_case_and_omits_absent_due_date() {
        let json = serde_json::to_value(sample_item()).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("dueDate").is_none());
    }

    #[test]
    fn settings_defaults_and_merge() {
        let defaults = Settings::default();
        assert_eq!(defaults.user_name, "Guest");
        assert_eq!(defaults.theme, Theme::Dark);
        assert_eq!(defaults.items_per_page, 5);

        let patch = SettingsPatch {
            theme: Some(Theme::Light),
            ..Default::default()
        };
        let merged = defaults.merged(&patch);
        assert_eq!(merged.theme, Theme::Light);
        assert_eq!(merged.user_name, "Guest");
        assert_eq!(merged.items_per_page, 5);
        // Re-applying the same patch is a no-op.
        assert_eq!(merged.merged(&patch), merged);
    }
}
