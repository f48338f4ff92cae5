//! In-memory note repository.
//!
//! Keeps notes in a `HashMap` behind a tokio `RwLock` and evaluates queries
//! with the same [`NoteFilter`](noted_core::NoteFilter) and
//! [`NoteOrder`](noted_core::NoteOrder) semantics the SQL builder renders.
//! Used by the HTTP test suites and for running the API without PostgreSQL.
//!
//! ```rust
//! use noted_core::{NewNote, NoteRepository};
//! use noted_db::MemoryNoteRepository;
//!
//! # tokio_test_block(async {
//! let repo = MemoryNoteRepository::new();
//! let note = repo.insert(NewNote::new("Title", "Body")).await.unwrap();
//! assert_eq!(repo.fetch(note.id).await.unwrap().title, "Title");
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use noted_core::{
    Error, NewNote, Note, NoteChanges, NotePage, NoteQuery, NoteRepository, Pagination, Result,
};

/// Note repository held entirely in process memory.
#[derive(Clone, Default)]
pub struct MemoryNoteRepository {
    notes: Arc<RwLock<HashMap<Uuid, Note>>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a lost database: every operation fails with a pool timeout
    /// until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored notes.
    pub async fn len(&self) -> usize {
        self.notes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.notes.read().await.is_empty()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    async fn matching(&self, query: &NoteQuery) -> Vec<Note> {
        let notes = self.notes.read().await;
        let mut matched: Vec<Note> = notes
            .values()
            .filter(|note| query.filter.matches(note))
            .cloned()
            .collect();
        query.order.sort(&mut matched);
        matched
    }

    async fn toggle(&self, id: Uuid, flip: impl FnOnce(&mut Note)) -> Result<Note> {
        self.check_available()?;
        let mut notes = self.notes.write().await;
        let note = notes.get_mut(&id).ok_or(Error::NoteNotFound(id))?;
        flip(note);
        note.updated_at = Utc::now();
        Ok(note.clone())
    }
}

#[async_trait]
impl NoteRepository for MemoryNoteRepository {
    async fn list(&self, query: &NoteQuery, pagination: Pagination) -> Result<NotePage> {
        self.check_available()?;
        let matched = self.matching(query).await;
        let total = matched.len() as i64;
        let notes = pagination.slice(&matched);

        debug!(
            subsystem = "db",
            component = "memory",
            op = "list",
            result_count = notes.len(),
            total_count = total,
            "Listed notes"
        );
        Ok(NotePage { notes, total })
    }

    async fn find(&self, query: &NoteQuery) -> Result<Vec<Note>> {
        self.check_available()?;
        Ok(self.matching(query).await)
    }

    async fn fetch(&self, id: Uuid) -> Result<Note> {
        self.check_available()?;
        self.notes
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(Error::NoteNotFound(id))
    }

    async fn insert(&self, note: NewNote) -> Result<Note> {
        self.check_available()?;
        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            title: note.title,
            content: note.content,
            category: note.category,
            tags: note.tags,
            is_pinned: note.is_pinned,
            is_archived: note.is_archived,
            priority: note.priority,
            created_at: now,
            updated_at: now,
        };
        self.notes.write().await.insert(note.id, note.clone());
        Ok(note)
    }

    async fn update(&self, id: Uuid, changes: NoteChanges) -> Result<Note> {
        self.check_available()?;
        let mut notes = self.notes.write().await;
        let note = notes.get_mut(&id).ok_or(Error::NoteNotFound(id))?;
        changes.apply_to(note);
        note.updated_at = Utc::now();
        Ok(note.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.check_available()?;
        self.notes
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::NoteNotFound(id))
    }

    async fn toggle_pin(&self, id: Uuid) -> Result<Note> {
        self.toggle(id, |note| note.is_pinned = !note.is_pinned)
            .await
    }

    async fn toggle_archive(&self, id: Uuid) -> Result<Note> {
        self.toggle(id, |note| note.is_archived = !note.is_archived)
            .await
    }

    async fn list_categories(&self) -> Result<Vec<String>> {
        self.check_available()?;
        let notes = self.notes.read().await;
        let categories: BTreeSet<String> = notes.values().map(|n| n.category.clone()).collect();
        Ok(categories.into_iter().collect())
    }

    async fn health(&self) -> Result<()> {
        self.check_available()
    }

    async fn close(&self) {}
}
