//! Note repository implementation.

use std::time::Instant;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, info};
use uuid::Uuid;

use noted_core::{
    Error, NewNote, Note, NoteChanges, NotePage, NoteQuery, NoteRepository, Pagination, Priority,
    Result,
};

use crate::filter_sql::{NoteSqlBuilder, QueryParam};
use crate::pool::log_pool_metrics;

/// Columns selected for every note read, in [`map_row_to_note`] order.
const NOTE_COLUMNS: &str =
    "id, title, content, category, tags, is_pinned, is_archived, priority, created_at, updated_at";

/// Bind a slice of [`QueryParam`]s to a query, in order.
macro_rules! bind_query_params {
    ($query:expr, $params:expr) => {{
        let mut q = $query;
        for param in $params {
            q = match param {
                QueryParam::Bool(b) => q.bind(*b),
                QueryParam::String(s) => q.bind(s.as_str()),
            };
        }
        q
    }};
}

/// Map a database row to a [`Note`].
fn map_row_to_note(row: PgRow) -> Result<Note> {
    let priority: String = row.try_get("priority")?;
    let priority = priority
        .parse::<Priority>()
        .map_err(|e| Error::Internal(format!("corrupt note row: {}", e)))?;
    let Json(tags): Json<Vec<String>> = row.try_get("tags")?;

    Ok(Note {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        category: row.try_get("category")?,
        tags,
        is_pinned: row.try_get("is_pinned")?,
        is_archived: row.try_get("is_archived")?,
        priority,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// PostgreSQL implementation of NoteRepository.
#[derive(Clone)]
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Build the `SET` list of an update. `$1` is the note id, so supplied
    /// fields start at `$2`.
    fn build_set_clause(changes: &NoteChanges) -> String {
        let mut updates: Vec<String> = vec!["updated_at = now()".to_string()];
        let mut param_idx = 2;
        let mut push = |column: &str, present: bool| {
            if present {
                updates.push(format!("{} = ${}", column, param_idx));
                param_idx += 1;
            }
        };

        push("title", changes.title.is_some());
        push("content", changes.content.is_some());
        push("category", changes.category.is_some());
        push("tags", changes.tags.is_some());
        push("is_pinned", changes.is_pinned.is_some());
        push("is_archived", changes.is_archived.is_some());
        push("priority", changes.priority.is_some());

        updates.join(", ")
    }

    /// Flip a boolean column in a single statement so concurrent toggles
    /// serialize on the row lock.
    async fn toggle_column(&self, id: Uuid, column: &'static str, op: &str) -> Result<Note> {
        let sql = format!(
            "UPDATE notes SET {col} = NOT {col}, updated_at = now() WHERE id = $1 RETURNING {cols}",
            col = column,
            cols = NOTE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::NoteNotFound(id))?;
        let note = map_row_to_note(row)?;

        info!(
            subsystem = "db",
            component = "notes",
            op = op,
            note_id = %id,
            is_pinned = note.is_pinned,
            is_archived = note.is_archived,
            "Note toggled"
        );
        Ok(note)
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn list(&self, query: &NoteQuery, pagination: Pagination) -> Result<NotePage> {
        let start = Instant::now();
        let builder = NoteSqlBuilder::new(query);
        let (where_sql, params) = builder.where_clause(0);

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let count_sql = format!("SELECT COUNT(*) FROM notes WHERE {}", where_sql);
        let total: i64 = {
            let q = bind_query_params!(sqlx::query_scalar::<_, i64>(&count_sql), &params);
            q.fetch_one(&mut *tx).await.map_err(Error::Database)?
        };

        let limit_idx = params.len() + 1;
        let notes_sql = format!(
            "SELECT {} FROM notes WHERE {} ORDER BY {} LIMIT ${} OFFSET ${}",
            NOTE_COLUMNS,
            where_sql,
            builder.order_clause(),
            limit_idx,
            limit_idx + 1
        );
        let rows = {
            let q = bind_query_params!(sqlx::query(&notes_sql), &params);
            q.bind(pagination.limit)
                .bind(pagination.offset())
                .fetch_all(&mut *tx)
                .await
                .map_err(Error::Database)?
        };

        tx.commit().await.map_err(Error::Database)?;

        let notes = rows
            .into_iter()
            .map(map_row_to_note)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            subsystem = "db",
            component = "notes",
            op = "list",
            result_count = notes.len(),
            total_count = total,
            duration_ms = start.elapsed().as_millis() as u64,
            "Listed notes"
        );
        Ok(NotePage { notes, total })
    }

    async fn find(&self, query: &NoteQuery) -> Result<Vec<Note>> {
        let start = Instant::now();
        let builder = NoteSqlBuilder::new(query);
        let (where_sql, params) = builder.where_clause(0);
        let sql = format!(
            "SELECT {} FROM notes WHERE {} ORDER BY {}",
            NOTE_COLUMNS,
            where_sql,
            builder.order_clause()
        );

        let rows = bind_query_params!(sqlx::query(&sql), &params)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;
        let notes = rows
            .into_iter()
            .map(map_row_to_note)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            subsystem = "db",
            component = "notes",
            op = "find",
            result_count = notes.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Found notes"
        );
        Ok(notes)
    }

    async fn fetch(&self, id: Uuid) -> Result<Note> {
        let sql = format!("SELECT {} FROM notes WHERE id = $1", NOTE_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::NoteNotFound(id))?;
        map_row_to_note(row)
    }

    async fn insert(&self, note: NewNote) -> Result<Note> {
        let id = Uuid::new_v4();
        let sql = format!(
            "INSERT INTO notes (id, title, content, category, tags, is_pinned, is_archived, priority)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {}",
            NOTE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(&note.title)
            .bind(&note.content)
            .bind(&note.category)
            .bind(Json(&note.tags))
            .bind(note.is_pinned)
            .bind(note.is_archived)
            .bind(note.priority.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        info!(
            subsystem = "db",
            component = "notes",
            op = "insert",
            note_id = %id,
            category = %note.category,
            "Note created"
        );
        map_row_to_note(row)
    }

    async fn update(&self, id: Uuid, changes: NoteChanges) -> Result<Note> {
        let sql = format!(
            "UPDATE notes SET {} WHERE id = $1 RETURNING {}",
            Self::build_set_clause(&changes),
            NOTE_COLUMNS
        );

        let mut q = sqlx::query(&sql).bind(id);
        if let Some(title) = &changes.title {
            q = q.bind(title);
        }
        if let Some(content) = &changes.content {
            q = q.bind(content);
        }
        if let Some(category) = &changes.category {
            q = q.bind(category);
        }
        if let Some(tags) = &changes.tags {
            q = q.bind(Json(tags));
        }
        if let Some(pinned) = changes.is_pinned {
            q = q.bind(pinned);
        }
        if let Some(archived) = changes.is_archived {
            q = q.bind(archived);
        }
        if let Some(priority) = changes.priority {
            q = q.bind(priority.as_str());
        }

        let row = q
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::NoteNotFound(id))?;

        info!(
            subsystem = "db",
            component = "notes",
            op = "update",
            note_id = %id,
            "Note updated"
        );
        map_row_to_note(row)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(id));
        }

        info!(
            subsystem = "db",
            component = "notes",
            op = "delete",
            note_id = %id,
            "Note deleted"
        );
        Ok(())
    }

    async fn toggle_pin(&self, id: Uuid) -> Result<Note> {
        self.toggle_column(id, "is_pinned", "toggle_pin").await
    }

    async fn toggle_archive(&self, id: Uuid) -> Result<Note> {
        self.toggle_column(id, "is_archived", "toggle_archive").await
    }

    async fn list_categories(&self) -> Result<Vec<String>> {
        let categories: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT category FROM notes ORDER BY category")
                .fetch_all(&self.pool)
                .await
                .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "notes",
            op = "list_categories",
            result_count = categories.len(),
            "Listed categories"
        );
        Ok(categories)
    }

    async fn health(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        log_pool_metrics(&self.pool);
        Ok(())
    }

    async fn close(&self) {
        info!(
            subsystem = "db",
            component = "pool",
            op = "close",
            "Closing database connection pool"
        );
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_clause_only_refreshes_timestamp_when_empty() {
        let sql = PgNoteRepository::build_set_clause(&NoteChanges::default());
        assert_eq!(sql, "updated_at = now()");
    }

    #[test]
    fn test_set_clause_numbers_supplied_fields() {
        let changes = NoteChanges {
            title: Some("t".into()),
            content: Some("c".into()),
            is_archived: Some(true),
            priority: Some(Priority::Low),
            ..Default::default()
        };
        let sql = PgNoteRepository::build_set_clause(&changes);
        assert_eq!(
            sql,
            "updated_at = now(), title = $2, content = $3, is_archived = $4, priority = $5"
        );
    }

    #[test]
    fn test_note_columns_cover_model() {
        for column in [
            "id",
            "title",
            "content",
            "category",
            "tags",
            "is_pinned",
            "is_archived",
            "priority",
            "created_at",
            "updated_at",
        ] {
            assert!(NOTE_COLUMNS.contains(column));
        }
    }
}
