//! # noted-core
//!
//! Core types, validation rules, query building and repository traits for
//! the noted personal notes service.
//!
//! This crate has no I/O of its own; storage backends live in `noted-db` and
//! the HTTP surface in `noted-api`.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod query;
pub mod traits;
pub mod validation;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::{NewNote, Note, NoteChanges, NotePage, ParsePriorityError, Priority};
pub use query::{
    ListParams, NoteFilter, NoteOrder, NoteQuery, Pagination, SortDirection, SortField,
};
pub use traits::NoteRepository;
pub use validation::{
    validate_new_note, validate_note_changes, validate_note_id, ValidationError,
    ValidationErrorKind,
};
