//! Typed note queries: filter, ordering, and pagination.
//!
//! [`ListParams`] carries the raw query-string values of the listing endpoint.
//! [`ListParams::into_query`] turns them into a [`NoteQuery`] and a
//! [`Pagination`] exactly once, at the HTTP boundary. Repositories only ever see
//! the typed form.
//!
//! Two retrieval modes exist:
//!
//! | Mode    | Trigger                 | Predicate                                         |
//! |---------|-------------------------|---------------------------------------------------|
//! | search  | non-empty `search`/`q`  | title or content contains text, not archived      |
//! | listing | otherwise               | category, archived (default false), pinned, priority |
//!
//! Whatever the sort field, pinned notes always come first.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::defaults;
use crate::models::{Note, Priority};
use crate::validation::{invalid_priority, ValidationError, ValidationErrorKind};

// =============================================================================
// ORDERING
// =============================================================================

/// Fields a listing may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Title,
    CreatedAt,
    #[default]
    UpdatedAt,
    Category,
    Priority,
}

impl SortField {
    /// Resolve a client-supplied sort field, falling back to `updatedAt` for
    /// anything outside the allow-list.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw {
            Some("title") => SortField::Title,
            Some("createdAt") => SortField::CreatedAt,
            Some("updatedAt") => SortField::UpdatedAt,
            Some("category") => SortField::Category,
            Some("priority") => SortField::Priority,
            _ => SortField::default(),
        }
    }

    /// Name as exposed in the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
            SortField::Category => "category",
            SortField::Priority => "priority",
        }
    }

    fn compare(&self, a: &Note, b: &Note) -> Ordering {
        match self {
            SortField::Title => a.title.cmp(&b.title),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::Category => a.category.cmp(&b.category),
            SortField::Priority => a.priority.rank().cmp(&b.priority.rank()),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Only `ASC` (in any case) sorts ascending; everything else is `DESC`.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw.map(str::to_uppercase).as_deref() {
            Some("ASC") => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Secondary ordering of a query. Pinned-first is always the primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoteOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl NoteOrder {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Compare two notes: pinned first, then the sort field, then id.
    pub fn compare(&self, a: &Note, b: &Note) -> Ordering {
        b.is_pinned
            .cmp(&a.is_pinned)
            .then_with(|| {
                let ord = self.field.compare(a, b);
                match self.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            })
            .then_with(|| a.id.cmp(&b.id))
    }

    /// Sort notes in place according to this order.
    pub fn sort(&self, notes: &mut [Note]) {
        notes.sort_by(|a, b| self.compare(a, b));
    }
}

// =============================================================================
// FILTER
// =============================================================================

/// Conjunction of optional note predicates. `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    /// Case-sensitive substring of title or content.
    pub text: Option<String>,
    pub category: Option<String>,
    pub archived: Option<bool>,
    pub pinned: Option<bool>,
    pub priority: Option<Priority>,
}

impl NoteFilter {
    /// Evaluate the filter against a note.
    pub fn matches(&self, note: &Note) -> bool {
        if let Some(text) = &self.text {
            if !note.title.contains(text.as_str()) && !note.content.contains(text.as_str()) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &note.category != category {
                return false;
            }
        }
        if let Some(archived) = self.archived {
            if note.is_archived != archived {
                return false;
            }
        }
        if let Some(pinned) = self.pinned {
            if note.is_pinned != pinned {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if note.priority != priority {
                return false;
            }
        }
        true
    }
}

/// A filter plus its ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteQuery {
    pub filter: NoteFilter,
    pub order: NoteOrder,
}

impl NoteQuery {
    /// Free-text search over non-archived notes, most recently updated first.
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            filter: NoteFilter {
                text: Some(text.into()),
                archived: Some(false),
                ..Default::default()
            },
            order: NoteOrder::default(),
        }
    }

    /// Non-archived notes of one category, most recently updated first.
    pub fn by_category(category: impl Into<String>) -> Self {
        Self {
            filter: NoteFilter {
                category: Some(category.into()),
                archived: Some(false),
                ..Default::default()
            },
            order: NoteOrder::default(),
        }
    }

    pub fn with_order(mut self, order: NoteOrder) -> Self {
        self.order = order;
        self
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// 1-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: defaults::PAGE,
            limit: defaults::PAGE_LIMIT,
        }
    }
}

impl Pagination {
    /// Both values are clamped to at least 1.
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// `ceil(total / limit)`; zero when there are no matches.
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            0
        } else {
            let limit = self.limit.max(1);
            total / limit + i64::from(total % limit != 0)
        }
    }

    /// Select this page out of an already sorted, complete result.
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .iter()
            .skip(self.offset() as usize)
            .take(self.limit as usize)
            .cloned()
            .collect()
    }
}

// =============================================================================
// REQUEST PARAMETERS
// =============================================================================

/// Raw query-string parameters of the note listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Page number (default 1)
    pub page: Option<String>,
    /// Items per page (default 10)
    pub limit: Option<String>,
    /// Free-text search in title and content; ignores the other filters
    pub search: Option<String>,
    /// Exact category match
    pub category: Option<String>,
    /// "true" for archived notes; anything else (or absent) for active ones
    pub archived: Option<String>,
    /// "true"/"false"; absent means no pin filter
    pub pinned: Option<String>,
    /// low, medium or high
    pub priority: Option<String>,
    /// title, createdAt, updatedAt, category or priority (default updatedAt)
    pub sort_by: Option<String>,
    /// ASC or DESC (default DESC)
    pub sort_order: Option<String>,
}

impl ListParams {
    /// Validate and convert into a typed query plus pagination.
    pub fn into_query(self) -> Result<(NoteQuery, Pagination), ValidationError> {
        let pagination = Pagination::new(
            parse_positive("page", self.page.as_deref(), defaults::PAGE)?,
            parse_positive("limit", self.limit.as_deref(), defaults::PAGE_LIMIT)?,
        );
        let order = NoteOrder::new(
            SortField::parse_or_default(self.sort_by.as_deref()),
            SortDirection::parse_or_default(self.sort_order.as_deref()),
        );

        if let Some(text) = self.search.filter(|s| !s.is_empty()) {
            return Ok((NoteQuery::search(text).with_order(order), pagination));
        }

        let priority = match self.priority.filter(|s| !s.is_empty()) {
            None => None,
            Some(raw) => Some(raw.parse::<Priority>().map_err(|_| invalid_priority(json!(raw)))?),
        };

        let filter = NoteFilter {
            text: None,
            category: self.category.filter(|s| !s.is_empty()),
            archived: Some(self.archived.as_deref() == Some("true")),
            pinned: self.pinned.map(|p| p == "true"),
            priority,
        };

        Ok((NoteQuery { filter, order }, pagination))
    }
}

fn parse_positive(name: &str, raw: Option<&str>, default: i64) -> Result<i64, ValidationError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(ValidationError::new(
            ValidationErrorKind::InvalidParameter,
            format!("{} must be a positive integer", name),
        )
        .with_context("received", json!(raw))),
    }
}
