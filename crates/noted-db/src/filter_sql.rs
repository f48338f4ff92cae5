//! SQL rendering of typed note queries.
//!
//! [`NoteSqlBuilder`] turns a [`NoteQuery`] into a parameterized `WHERE`
//! fragment and an `ORDER BY` clause. Only allow-listed column names are ever
//! interpolated; every client-supplied value travels as a bind parameter.

use noted_core::{NoteFilter, NoteOrder, NoteQuery, SortField};

/// Type-safe parameter binding for SQL queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParam {
    /// Boolean parameter.
    Bool(bool),
    /// String parameter.
    String(String),
}

/// Escape LIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Column expression used for a sort field.
fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::Title => "title",
        SortField::CreatedAt => "created_at",
        SortField::UpdatedAt => "updated_at",
        SortField::Category => "category",
        SortField::Priority => {
            "CASE priority WHEN 'low' THEN 0 WHEN 'medium' THEN 1 WHEN 'high' THEN 2 END"
        }
    }
}

/// Generates SQL for a [`NoteQuery`].
///
/// # Example
///
/// ```rust
/// use noted_core::NoteQuery;
/// use noted_db::filter_sql::{NoteSqlBuilder, QueryParam};
///
/// let query = NoteQuery::by_category("work");
/// let builder = NoteSqlBuilder::new(&query);
/// let (sql, params) = builder.where_clause(0);
/// assert_eq!(sql, "category = $1 AND is_archived = $2");
/// assert_eq!(params, vec![QueryParam::String("work".into()), QueryParam::Bool(false)]);
/// ```
pub struct NoteSqlBuilder<'a> {
    filter: &'a NoteFilter,
    order: NoteOrder,
}

impl<'a> NoteSqlBuilder<'a> {
    pub fn new(query: &'a NoteQuery) -> Self {
        Self {
            filter: &query.filter,
            order: query.order,
        }
    }

    /// Build the `WHERE` fragment (without the keyword).
    ///
    /// `param_offset` is the number of parameters already in the statement.
    /// Returns `("TRUE", [])` for an empty filter.
    pub fn where_clause(&self, param_offset: usize) -> (String, Vec<QueryParam>) {
        let mut clauses = Vec::new();
        let mut params = Vec::new();
        let mut param_idx = param_offset;

        if let Some(text) = &self.filter.text {
            param_idx += 1;
            clauses.push(format!(
                "(title LIKE ${idx} ESCAPE '\\' OR content LIKE ${idx} ESCAPE '\\')",
                idx = param_idx
            ));
            params.push(QueryParam::String(format!("%{}%", escape_like(text))));
        }

        if let Some(category) = &self.filter.category {
            param_idx += 1;
            clauses.push(format!("category = ${}", param_idx));
            params.push(QueryParam::String(category.clone()));
        }

        if let Some(archived) = self.filter.archived {
            param_idx += 1;
            clauses.push(format!("is_archived = ${}", param_idx));
            params.push(QueryParam::Bool(archived));
        }

        if let Some(pinned) = self.filter.pinned {
            param_idx += 1;
            clauses.push(format!("is_pinned = ${}", param_idx));
            params.push(QueryParam::Bool(pinned));
        }

        if let Some(priority) = self.filter.priority {
            param_idx += 1;
            clauses.push(format!("priority = ${}", param_idx));
            params.push(QueryParam::String(priority.as_str().to_string()));
        }

        if clauses.is_empty() {
            ("TRUE".to_string(), params)
        } else {
            (clauses.join(" AND "), params)
        }
    }

    /// Build the `ORDER BY` list (without the keyword): pinned first, then
    /// the requested field, then id for a stable page boundary.
    pub fn order_clause(&self) -> String {
        format!(
            "is_pinned DESC, {} {}, id ASC",
            sort_column(self.order.field),
            self.order.direction.as_sql()
        )
    }
}
