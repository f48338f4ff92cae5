//! Structured logging conventions for noted.
//!
//! Call sites write field names as literals in `tracing` macros; the table
//! below lists the names every crate shares so log aggregation can query
//! by them across subsystems.
//!
//! ## Fields
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `subsystem` | Originating subsystem: `api`, `db`, `client` |
//! | `component` | Component within it: `notes`, `pool`, `memory`, `migrations`, `seed`, `health`, `config`, `error` |
//! | `op` | Logical operation: `list`, `insert`, `toggle_pin`, ... |
//! | `note_id` | Note UUID being operated on |
//! | `query` | Search text |
//! | `category` | Category name |
//! | `duration_ms` | Wall-clock duration in milliseconds |
//! | `result_count` | Rows returned |
//! | `total_count` | Rows matching a paginated query |
//! | `pool_size` / `pool_idle` | Active and idle pool connections |
//! | `error` | Error message when an operation fails |
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), writes |
//! | DEBUG | Query decisions, result counts |
//! | TRACE | Per-row detail |
