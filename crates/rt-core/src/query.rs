//! # Query Builder
//!
//! Pure mapping from the list endpoint's query-string parameters to an
//! [`ItemQuery`]: a filter, a sort, and a skip/take page window. Store
//! adapters interpret the query — the SQLite plugin renders it to SQL,
//! the in-memory plugin evaluates [`ItemFilter::matches`] and
//! [`sort_items`] directly, so both agree on semantics by construction.

use crate::models::Item;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Raw parameters as they arrive on the query string. `tags` may be given
/// several times; everything else is last-one-wins.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub tags: Vec<String>,
}

impl ListParams {
    /// Collects decoded query-string pairs, preserving repeated `tags` keys.
    /// Empty values are treated as absent.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = ListParams::default();
        for (key, value) in pairs {
            if value.is_empty() {
                continue;
            }
            match key.as_str() {
                "search" => params.search = Some(value),
                "sortBy" => params.sort_by = Some(value),
                "order" => params.order = Some(value),
                "page" => params.page = Some(value),
                "limit" => params.limit = Some(value),
                "tags" => params.tags.push(value),
                _ => {}
            }
        }
        params
    }
}

/// Sortable fields — a typed allow-list so adapters never interpolate
/// caller-supplied strings into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Description,
    Category,
    Priority,
    DueDate,
    CreatedAt,
}

impl SortField {
    /// Parses the wire name of a field. Unknown names yield `None` and the
    /// caller falls back to the default ordering.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "description" => Some(Self::Description),
            "category" => Some(Self::Category),
            "priority" => Some(Self::Priority),
            "dueDate" => Some(Self::DueDate),
            "createdAt" => Some(Self::CreatedAt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Conjunction of filter conditions; an empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    /// Case-insensitive substring over `name` OR `description`.
    pub search: Option<String>,
    /// Match records carrying at least one of these tags (inclusive OR).
    pub any_tags: Vec<String>,
}

impl ItemFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.any_tags.is_empty()
    }

    pub fn matches(&self, item: &Item) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !item.name.to_lowercase().contains(&needle)
                && !item.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if !self.any_tags.is_empty()
            && !item.tags.iter().any(|tag| self.any_tags.contains(tag))
        {
            return false;
        }
        true
    }
}

/// The resolved query a store adapter executes.
#[derive(Debug, Clone)]
pub struct ItemQuery {
    pub filter: ItemFilter,
    pub sort: SortSpec,
    /// May be negative when the caller passed `page <= 0`; stores clamp to
    /// the start of the result set.
    pub skip: i64,
    /// Clamped to zero — a negative LIMIT means "unbounded" to SQLite.
    pub take: i64,
    /// Echoed back in the response envelope.
    pub page: i64,
    pub limit: i64,
}

/// Builds the store query from raw parameters, applying the documented
/// defaults: page 1, limit 10, and `createdAt` descending when no explicit
/// sort field is given. An explicit `sortBy` defaults to ascending unless
/// `order` is exactly `"desc"`.
pub fn build_query(params: &ListParams) -> ItemQuery {
    let search = params
        .search
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let filter = ItemFilter {
        search,
        any_tags: params.tags.clone(),
    };

    let sort = match params.sort_by.as_deref().and_then(SortField::parse) {
        Some(field) => SortSpec {
            field,
            direction: if params.order.as_deref() == Some("desc") {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            },
        },
        // `order` is not consulted on this branch.
        None => SortSpec {
            field: SortField::CreatedAt,
            direction: SortDirection::Desc,
        },
    };

    let page = parse_or(params.page.as_deref(), DEFAULT_PAGE);
    let limit = parse_or(params.limit.as_deref(), DEFAULT_LIMIT);

    ItemQuery {
        filter,
        sort,
        skip: (page - 1) * limit,
        take: limit.max(0),
        page,
        limit,
    }
}

fn parse_or(value: Option<&str>, default: i64) -> i64 {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(default)
}

/// Stable in-place sort matching the SQL adapter's ORDER BY semantics.
pub fn sort_items(items: &mut [Item], sort: &SortSpec) {
    items.sort_by(|a, b| {
        let ordering = match sort.field {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Name => a.name.cmp(&b.name),
            SortField::Description => a.description.cmp(&b.description),
            SortField::Category => a.category.cmp(&b.category),
            SortField::Priority => a.priority.cmp(&b.priority),
            // `None` sorts first ascending, like a missing document field.
            SortField::DueDate => a.due_date.cmp(&b.due_date),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        ListParams::from_pairs(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    fn item(id: i64, name: &str, description: &str, tags: &[&str]) -> Item {
        Item {
            id,
            name: name.into(),
            description: description.into(),
            category: "Misc".into(),
            priority: 1,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            due_date: None,
            created_at: Utc.timestamp_opt(1_700_000_000 + id, 0).unwrap(),
        }
    }

    #[test]
    fn defaults_when_no_parameters() {
        let query = build_query(&params(&[]));
        assert!(query.filter.is_empty());
        assert_eq!(query.sort.field, SortField::CreatedAt);
        assert_eq!(query.sort.direction, SortDirection::Desc);
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
        assert_eq!(query.skip, 0);
        assert_eq!(query.take, 10);
    }

    #[test]
    fn explicit_sort_defaults_to_ascending() {
        let query = build_query(&params(&[("sortBy", "name")]));
        assert_eq!(query.sort.field, SortField::Name);
        assert_eq!(query.sort.direction, SortDirection::Asc);
    }

    #[test]
    fn explicit_sort_descending_requires_exact_desc() {
        let query = build_query(&params(&[("sortBy", "priority"), ("order", "desc")]));
        assert_eq!(query.sort.direction, SortDirection::Desc);

        let query = build_query(&params(&[("sortBy", "priority"), ("order", "DESC")]));
        assert_eq!(query.sort.direction, SortDirection::Asc);
    }

    #[test]
    fn order_is_ignored_without_sort_by() {
        let query = build_query(&params(&[("order", "asc")]));
        assert_eq!(query.sort.field, SortField::CreatedAt);
        assert_eq!(query.sort.direction, SortDirection::Desc);
    }

    #[test]
    fn unknown_sort_field_falls_back_to_default() {
        let query = build_query(&params(&[("sortBy", "nope"), ("order", "desc")]));
        assert_eq!(query.sort.field, SortField::CreatedAt);
        assert_eq!(query.sort.direction, SortDirection::Desc);
    }

    #[test]
    fn pagination_arithmetic() {
        let query = build_query(&params(&[("page", "3"), ("limit", "20")]));
        assert_eq!(query.skip, 40);
        assert_eq!(query.take, 20);
        assert_eq!(query.page, 3);
        assert_eq!(query.limit, 20);
    }

    #[test]
    fn non_numeric_page_and_limit_use_defaults() {
        let query = build_query(&params(&[("page", "abc"), ("limit", "1.5")]));
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
    }

    #[test]
    fn zero_page_yields_negative_skip() {
        let query = build_query(&params(&[("page", "0"), ("limit", "10")]));
        assert_eq!(query.skip, -10);
    }

    #[test]
    fn negative_limit_clamps_take() {
        let query = build_query(&params(&[("limit", "-5")]));
        assert_eq!(query.take, 0);
        assert_eq!(query.limit, -5);
    }

    #[test]
    fn repeated_tags_collect_and_single_tag_normalizes() {
        let many = params(&[("tags", "a"), ("tags", "b")]);
        assert_eq!(many.tags, vec!["a", "b"]);

        let one = params(&[("tags", "a")]);
        assert_eq!(one.tags, vec!["a"]);

        let empty = params(&[("tags", "")]);
        assert!(empty.tags.is_empty());
    }

    #[test]
    fn search_filter_is_case_insensitive_over_name_and_description() {
        let filter = build_query(&params(&[("search", "RUST")])).filter;
        assert!(filter.matches(&item(1, "Learn rust", "", &[])));
        assert!(filter.matches(&item(2, "x", "a Rust book", &[])));
        assert!(!filter.matches(&item(3, "Go", "gopher", &[])));
    }

    #[test]
    fn empty_search_is_a_no_op_filter() {
        let filter = build_query(&params(&[("search", "")])).filter;
        assert!(filter.is_empty());
        assert!(filter.matches(&item(1, "anything", "", &[])));
    }

    #[test]
    fn tag_filter_is_inclusive_or() {
        let filter = build_query(&params(&[("tags", "a"), ("tags", "b")])).filter;
        assert!(filter.matches(&item(1, "x", "", &["a"])));
        assert!(filter.matches(&item(2, "x", "", &["b", "c"])));
        assert!(!filter.matches(&item(3, "x", "", &["c"])));
        assert!(!filter.matches(&item(4, "x", "", &[])));
    }

    #[test]
    fn sort_items_orders_by_field_and_direction() {
        let mut items = vec![
            item(2, "b", "", &[]),
            item(1, "c", "", &[]),
            item(3, "a", "", &[]),
        ];
        sort_items(
            &mut items,
            &SortSpec { field: SortField::Name, direction: SortDirection::Asc },
        );
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);

        sort_items(
            &mut items,
            &SortSpec { field: SortField::CreatedAt, direction: SortDirection::Desc },
        );
        let ids: Vec<_> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, [3, 2, 1]);
    }
}
