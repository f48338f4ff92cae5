//! # noted-db
//!
//! Storage layer for noted.
//!
//! This crate provides:
//! - PostgreSQL connection pool management
//! - [`PgNoteRepository`], the sqlx-backed [`NoteRepository`]
//! - [`MemoryNoteRepository`], an in-process store with identical query semantics
//! - Sample data for local development
//!
//! ## Example
//!
//! ```rust,ignore
//! use noted_db::{Database, NewNote, NoteRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/noted").await?;
//!     db.migrate().await?;
//!
//!     let note = db.notes.insert(NewNote::new("Hello", "world")).await?;
//!     println!("Created note: {}", note.id);
//!     Ok(())
//! }
//! ```
pub mod filter_sql;
pub mod memory;
pub mod notes;
pub mod pool;
pub mod seed;
#[cfg(feature = "migrations")]
pub mod test_fixtures;

pub use memory::MemoryNoteRepository;
pub use notes::PgNoteRepository;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};

// Re-export core types for convenience
pub use noted_core::{
    Error, NewNote, Note, NoteChanges, NotePage, NoteQuery, NoteRepository, Pagination, Result,
};

use tracing::info;

/// Database handle holding the pool and its repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Note repository.
    pub notes: PgNoteRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            notes: PgNoteRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect with the default pool configuration.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        info!(
            subsystem = "db",
            component = "migrations",
            op = "migrate",
            "Migrations applied"
        );
        Ok(())
    }

    /// Delete every note. Returns the number of rows removed.
    pub async fn clear_notes(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM notes")
            .execute(&self.pool)
            .await?;
        info!(
            subsystem = "db",
            component = "notes",
            op = "clear",
            result_count = result.rows_affected(),
            "Cleared notes"
        );
        Ok(result.rows_affected())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }

    /// Close the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        self.notes.close().await;
    }
}
