//! Note HTTP handlers, mounted under `/api/notes`.

use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use noted_core::{
    validate_new_note, validate_note_changes, validate_note_id, ListParams, NewNote, Note,
    NoteChanges, Pagination,
};

use crate::error::ApiError;
use crate::extract::{JsonBody, QueryParams};
use crate::state::AppState;

/// Pagination block of the listing response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: i64,
    pub total_pages: i64,
    /// Notes matching the filter across all pages
    pub total_items: i64,
    pub items_per_page: i64,
}

impl PaginationMeta {
    pub fn new(pagination: Pagination, total: i64) -> Self {
        Self {
            current_page: pagination.page,
            total_pages: pagination.total_pages(total),
            total_items: total,
            items_per_page: pagination.limit,
        }
    }
}

/// Query string of `GET /api/notes/search`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Text to look for in titles and content
    pub q: Option<String>,
}

/// List notes with filtering, sorting and pagination.
///
/// GET /api/notes
#[utoipa::path(get, path = "/api/notes", tag = "Notes",
    params(ListParams),
    responses(
        (status = 200, description = "A page of notes with pagination metadata"),
        (status = 400, description = "Invalid page, limit or priority"),
    ))]
pub async fn list_notes(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Value>, ApiError> {
    let start = Instant::now();
    let (query, pagination) = params.into_query()?;
    let page = state.notes.list(&query, pagination).await?;

    debug!(
        subsystem = "api",
        component = "notes",
        op = "list",
        result_count = page.notes.len(),
        total_count = page.total,
        duration_ms = start.elapsed().as_millis() as u64,
        "Listed notes"
    );

    Ok(Json(json!({
        "success": true,
        "data": page.notes,
        "pagination": PaginationMeta::new(pagination, page.total),
    })))
}

/// Search non-archived notes by title or content.
///
/// GET /api/notes/search?q=
#[utoipa::path(get, path = "/api/notes/search", tag = "Notes",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching notes, pinned first", body = [Note]),
        (status = 400, description = "Search query is required"),
    ))]
pub async fn search_notes(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<SearchParams>,
) -> Result<Json<Value>, ApiError> {
    let query = params
        .q
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Search query is required".to_string()))?;

    let notes = state.notes.search(&query).await?;
    Ok(Json(json!({
        "success": true,
        "count": notes.len(),
        "data": notes,
        "query": query,
    })))
}

/// List every category in use, archived notes included.
///
/// GET /api/notes/categories
#[utoipa::path(get, path = "/api/notes/categories", tag = "Notes",
    responses((status = 200, description = "Distinct categories, sorted", body = [String])))]
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let categories = state.notes.list_categories().await?;
    Ok(Json(json!({
        "success": true,
        "data": categories,
    })))
}

/// List non-archived notes of one category.
///
/// GET /api/notes/category/:category
#[utoipa::path(get, path = "/api/notes/category/{category}", tag = "Notes",
    params(("category" = String, Path, description = "Exact category name")),
    responses((status = 200, description = "Notes in the category, pinned first", body = [Note])))]
pub async fn notes_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let notes = state.notes.list_by_category(&category).await?;
    Ok(Json(json!({
        "success": true,
        "count": notes.len(),
        "data": notes,
        "category": category,
    })))
}

/// Fetch a single note.
///
/// GET /api/notes/:id
#[utoipa::path(get, path = "/api/notes/{id}", tag = "Notes",
    params(("id" = String, Path, description = "Note UUID")),
    responses(
        (status = 200, description = "The note", body = Note),
        (status = 400, description = "Invalid note ID format"),
        (status = 404, description = "Note not found"),
    ))]
pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = validate_note_id(&id)?;
    let note = state.notes.fetch(id).await?;
    Ok(Json(json!({
        "success": true,
        "data": note,
    })))
}

/// Create a note.
///
/// POST /api/notes
#[utoipa::path(post, path = "/api/notes", tag = "Notes",
    request_body = NewNote,
    responses(
        (status = 201, description = "Note created successfully", body = Note),
        (status = 400, description = "Validation or parse error"),
        (status = 413, description = "Request entity too large"),
    ))]
pub async fn create_note(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let new_note = validate_new_note(&body)?;
    let note = state.notes.insert(new_note).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": note,
            "message": "Note created successfully",
        })),
    ))
}

/// Update a note. Title and content are required; other fields are applied
/// only when supplied.
///
/// PUT /api/notes/:id
#[utoipa::path(put, path = "/api/notes/{id}", tag = "Notes",
    params(("id" = String, Path, description = "Note UUID")),
    request_body = NoteChanges,
    responses(
        (status = 200, description = "Note updated successfully", body = Note),
        (status = 400, description = "Validation error or invalid note ID format"),
        (status = 404, description = "Note not found"),
    ))]
pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<Json<Value>, ApiError> {
    let id = validate_note_id(&id)?;
    let changes = validate_note_changes(&body)?;
    let note = state.notes.update(id, changes).await?;
    Ok(Json(json!({
        "success": true,
        "data": note,
        "message": "Note updated successfully",
    })))
}

/// Delete a note permanently.
///
/// DELETE /api/notes/:id
#[utoipa::path(delete, path = "/api/notes/{id}", tag = "Notes",
    params(("id" = String, Path, description = "Note UUID")),
    responses(
        (status = 200, description = "Note deleted successfully"),
        (status = 404, description = "Note not found"),
    ))]
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = validate_note_id(&id)?;
    state.notes.delete(id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Note deleted successfully",
    })))
}

/// Flip the pinned flag.
///
/// PATCH /api/notes/:id/pin
#[utoipa::path(patch, path = "/api/notes/{id}/pin", tag = "Notes",
    params(("id" = String, Path, description = "Note UUID")),
    responses(
        (status = 200, description = "Note pinned or unpinned", body = Note),
        (status = 404, description = "Note not found"),
    ))]
pub async fn toggle_pin(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = validate_note_id(&id)?;
    let note = state.notes.toggle_pin(id).await?;
    let message = format!("Note {} successfully", note.pin_status());
    Ok(Json(json!({
        "success": true,
        "data": note,
        "message": message,
    })))
}

/// Flip the archived flag.
///
/// PATCH /api/notes/:id/archive
#[utoipa::path(patch, path = "/api/notes/{id}/archive", tag = "Notes",
    params(("id" = String, Path, description = "Note UUID")),
    responses(
        (status = 200, description = "Note archived or unarchived", body = Note),
        (status = 404, description = "Note not found"),
    ))]
pub async fn toggle_archive(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = validate_note_id(&id)?;
    let note = state.notes.toggle_archive(id).await?;
    let message = format!("Note {} successfully", note.archive_status());
    Ok(Json(json!({
        "success": true,
        "data": note,
        "message": message,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(Pagination::new(2, 10), 25);
        assert_eq!(meta.current_page, 2);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.total_items, 25);
        assert_eq!(meta.items_per_page, 10);

        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["itemsPerPage"], 10);
    }

    #[test]
    fn test_pagination_meta_empty() {
        let meta = PaginationMeta::new(Pagination::default(), 0);
        assert_eq!(meta.total_pages, 0);
    }
}
