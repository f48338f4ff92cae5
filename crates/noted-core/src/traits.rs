//! Core traits for noted abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{NewNote, Note, NoteChanges, NotePage};
use crate::query::{NoteQuery, Pagination};

// =============================================================================
// NOTE REPOSITORY
// =============================================================================

/// Repository for note CRUD, filtering and toggles.
///
/// Every operation is atomic with respect to a single note row. Operations on
/// an id that does not exist fail with [`crate::Error::NoteNotFound`].
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// One page of notes matching `query`, plus the total match count.
    async fn list(&self, query: &NoteQuery, pagination: Pagination) -> Result<NotePage>;

    /// Every note matching `query`, unpaginated.
    async fn find(&self, query: &NoteQuery) -> Result<Vec<Note>>;

    /// Non-archived notes whose title or content contains `text`.
    async fn search(&self, text: &str) -> Result<Vec<Note>> {
        self.find(&NoteQuery::search(text)).await
    }

    /// Non-archived notes in `category`, pinned first, newest update first.
    async fn list_by_category(&self, category: &str) -> Result<Vec<Note>> {
        self.find(&NoteQuery::by_category(category)).await
    }

    /// Fetch a note by id.
    async fn fetch(&self, id: Uuid) -> Result<Note>;

    /// Persist a new note with a generated id and timestamps.
    async fn insert(&self, note: NewNote) -> Result<Note>;

    /// Apply the supplied fields and refresh `updated_at`.
    async fn update(&self, id: Uuid, changes: NoteChanges) -> Result<Note>;

    /// Permanently delete a note.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Flip `is_pinned` and return the updated note.
    async fn toggle_pin(&self, id: Uuid) -> Result<Note>;

    /// Flip `is_archived` and return the updated note.
    async fn toggle_archive(&self, id: Uuid) -> Result<Note>;

    /// Distinct categories across all notes, archived included, sorted.
    async fn list_categories(&self) -> Result<Vec<String>>;

    /// Check that the backing store is reachable.
    async fn health(&self) -> Result<()>;

    /// Release store resources. Further calls fail.
    async fn close(&self);
}
