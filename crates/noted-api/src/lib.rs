//! # noted-api
//!
//! HTTP surface of noted: an axum router over any
//! [`NoteRepository`](noted_core::NoteRepository).
//!
//! The `noted-api` binary wires it to PostgreSQL; tests wire it to
//! [`MemoryNoteRepository`](noted_db::MemoryNoteRepository).

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod logging;
pub mod router;
pub mod state;

pub use config::{Environment, ServerConfig};
pub use error::ApiError;
pub use logging::{init_tracing, LogSettings};
pub use router::{build_router, ApiDoc};
pub use state::AppState;
