//! Shared application state.

use std::sync::Arc;
use std::time::Instant;

use noted_core::NoteRepository;

use crate::config::ServerConfig;

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub notes: Arc<dyn NoteRepository>,
    pub config: Arc<ServerConfig>,
    /// Process start, for the health endpoint's uptime.
    pub started_at: Instant,
}

impl AppState {
    pub fn new(notes: Arc<dyn NoteRepository>, config: ServerConfig) -> Self {
        Self {
            notes,
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }
}
