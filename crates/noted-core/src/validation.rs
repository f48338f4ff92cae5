//! Payload and identifier validation.
//!
//! Request bodies are validated as raw JSON so that a missing field, a field of
//! the wrong type, and an empty field can be told apart and reported with the
//! appropriate message. Validation is synchronous and side-effect free; it runs
//! before any repository call.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::defaults::{CATEGORY, CATEGORY_MAX_CHARS, TITLE_MAX_CHARS};
use crate::error::Error;
use crate::models::{NewNote, NoteChanges, Priority};

/// Example shown to clients that send a malformed identifier.
pub const EXAMPLE_NOTE_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

static NOTE_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .expect("note id pattern is a valid regex")
});

/// Category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A required field is absent or null.
    MissingField,
    /// A required field has the wrong JSON type.
    TypeError,
    /// A required field is empty after trimming.
    EmptyField,
    /// A field is too long (or, for category, not a string).
    LengthExceeded,
    /// A field is not one of its allowed values.
    InvalidEnum,
    /// An optional field has the wrong shape.
    InvalidType,
    /// A pagination parameter is not a positive integer.
    InvalidParameter,
}

/// A rejected payload or query parameter, with optional client-facing context.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub message: String,
    /// Extra fields merged into the error response body.
    pub context: Map<String, Value>,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: Map::new(),
        }
    }

    pub fn with_context(mut self, key: &str, value: Value) -> Self {
        self.context.insert(key.to_string(), value);
        self
    }
}

/// Fields of a note payload that passed validation.
#[derive(Debug, Clone, PartialEq)]
struct CheckedPayload {
    title: String,
    content: String,
    category: Option<String>,
    tags: Option<Vec<String>>,
    is_pinned: Option<bool>,
    is_archived: Option<bool>,
    priority: Option<Priority>,
}

/// Look up a field, treating JSON null as absent.
fn present<'a>(body: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    body.get(key).filter(|v| !v.is_null())
}

/// Like [`present`], but an empty string also counts as absent.
fn present_non_empty<'a>(body: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    present(body, key).filter(|v| v.as_str() != Some(""))
}

fn check_payload(body: &Value) -> Result<CheckedPayload, ValidationError> {
    let empty = Map::new();
    let fields = body.as_object().unwrap_or(&empty);

    let (title, content) = match (present(fields, "title"), present(fields, "content")) {
        (Some(title), Some(content)) => (title, content),
        _ => {
            return Err(ValidationError::new(
                ValidationErrorKind::MissingField,
                "Title and content are required",
            )
            .with_context("received", body.clone())
            .with_context(
                "hint",
                json!("Make sure both title and content are provided"),
            ))
        }
    };

    let (title, content) = match (title.as_str(), content.as_str()) {
        (Some(title), Some(content)) => (title, content),
        _ => {
            return Err(ValidationError::new(
                ValidationErrorKind::TypeError,
                "Title and content must be strings",
            ))
        }
    };

    if title.trim().is_empty() || content.trim().is_empty() {
        return Err(ValidationError::new(
            ValidationErrorKind::EmptyField,
            "Title and content cannot be empty or only whitespace",
        ));
    }

    let title_len = title.chars().count();
    if title_len > TITLE_MAX_CHARS {
        return Err(ValidationError::new(
            ValidationErrorKind::LengthExceeded,
            format!("Title must be less than {} characters", TITLE_MAX_CHARS),
        )
        .with_context("currentLength", json!(title_len)));
    }

    let priority = match present_non_empty(fields, "priority") {
        None => None,
        Some(value) => match value.as_str().and_then(|s| s.parse::<Priority>().ok()) {
            Some(priority) => Some(priority),
            None => return Err(invalid_priority(value.clone())),
        },
    };

    let tags = match present(fields, "tags") {
        None => None,
        Some(value) => Some(parse_tags(value).ok_or_else(|| {
            ValidationError::new(
                ValidationErrorKind::InvalidType,
                "Tags must be an array of strings",
            )
            .with_context("example", json!(["tag1", "tag2", "tag3"]))
        })?),
    };

    let category = match present_non_empty(fields, "category") {
        None => None,
        Some(value) => match value.as_str() {
            Some(category) if category.chars().count() <= CATEGORY_MAX_CHARS => {
                Some(category.to_string())
            }
            _ => {
                return Err(ValidationError::new(
                    ValidationErrorKind::LengthExceeded,
                    format!(
                        "Category must be a string with less than {} characters",
                        CATEGORY_MAX_CHARS
                    ),
                ))
            }
        },
    };

    let is_pinned = optional_bool(fields, "isPinned")?;
    let is_archived = optional_bool(fields, "isArchived")?;

    Ok(CheckedPayload {
        title: title.to_string(),
        content: content.to_string(),
        category,
        tags,
        is_pinned,
        is_archived,
        priority,
    })
}

fn parse_tags(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|tag| tag.as_str().map(str::to_string))
        .collect()
}

fn optional_bool(fields: &Map<String, Value>, key: &str) -> Result<Option<bool>, ValidationError> {
    match present(fields, key) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(ValidationError::new(
            ValidationErrorKind::InvalidType,
            format!("{} must be a boolean", key),
        )),
    }
}

/// Error for a priority outside `low | medium | high`.
pub fn invalid_priority(received: Value) -> ValidationError {
    ValidationError::new(
        ValidationErrorKind::InvalidEnum,
        "Priority must be one of: low, medium, high",
    )
    .with_context("received", received)
}

/// Validate a create payload and apply field defaults.
pub fn validate_new_note(body: &Value) -> Result<NewNote, ValidationError> {
    let checked = check_payload(body)?;
    Ok(NewNote {
        title: checked.title,
        content: checked.content,
        category: checked.category.unwrap_or_else(|| CATEGORY.to_string()),
        tags: checked.tags.unwrap_or_default(),
        is_pinned: checked.is_pinned.unwrap_or(false),
        is_archived: checked.is_archived.unwrap_or(false),
        priority: checked.priority.unwrap_or_default(),
    })
}

/// Validate an update payload.
///
/// Title and content are required on update as well; every other field is
/// applied only when supplied.
pub fn validate_note_changes(body: &Value) -> Result<NoteChanges, ValidationError> {
    let checked = check_payload(body)?;
    Ok(NoteChanges {
        title: Some(checked.title),
        content: Some(checked.content),
        category: checked.category,
        tags: checked.tags,
        is_pinned: checked.is_pinned,
        is_archived: checked.is_archived,
        priority: checked.priority,
    })
}

/// Check a path identifier against the UUID shape (versions 1-5, RFC variant).
pub fn validate_note_id(raw: &str) -> Result<Uuid, Error> {
    if !NOTE_ID_PATTERN.is_match(raw) {
        return Err(Error::InvalidIdentifier(raw.to_string()));
    }
    Uuid::parse_str(raw).map_err(|_| Error::InvalidIdentifier(raw.to_string()))
}
