//! Centralized default constants for noted.
//!
//! Every crate references these instead of defining its own magic numbers.

// =============================================================================
// NOTE FIELDS
// =============================================================================

/// Category assigned when a note is created without one.
pub const CATEGORY: &str = "general";

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 200;

/// Maximum category length in characters.
pub const CATEGORY_MAX_CHARS: usize = 50;

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page number (1-based).
pub const PAGE: i64 = 1;

/// Default page size for the note listing.
pub const PAGE_LIMIT: i64 = 10;

// =============================================================================
// SERVER
// =============================================================================

/// Default listen port.
pub const PORT: u16 = 3000;

/// Default listen host.
pub const HOST: &str = "0.0.0.0";

/// Default database URL when `DATABASE_URL` is unset.
pub const DATABASE_URL: &str = "postgres://localhost/noted";

/// Default maximum JSON request body size (100 KiB).
pub const BODY_LIMIT_BYTES: usize = 100 * 1024;

/// Default origin allowed by CORS.
pub const ALLOWED_ORIGINS: &str = "http://localhost:3000";
