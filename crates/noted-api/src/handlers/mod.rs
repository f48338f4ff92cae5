//! HTTP handlers for noted-api.

pub mod notes;
pub mod system;
