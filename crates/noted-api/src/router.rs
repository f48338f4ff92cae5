//! Route table and middleware stack.

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, patch},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use crate::error::attach_error_detail;
use crate::handlers::{notes, system};
use crate::state::AppState;

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// OPENAPI
// =============================================================================

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Noted API",
        description = "Personal notes with filtering, search, pinning, archiving and categories"
    ),
    paths(
        system::welcome,
        system::health,
        notes::list_notes,
        notes::search_notes,
        notes::list_categories,
        notes::notes_by_category,
        notes::get_note,
        notes::create_note,
        notes::update_note,
        notes::delete_note,
        notes::toggle_pin,
        notes::toggle_archive
    ),
    components(schemas(
        noted_core::Note,
        noted_core::NewNote,
        noted_core::NoteChanges,
        noted_core::Priority,
        notes::PaginationMeta
    )),
    tags(
        (name = "Notes", description = "Note CRUD, search, pinning and archiving"),
        (name = "System", description = "Health checks and service info")
    )
)]
pub struct ApiDoc;

// =============================================================================
// CORS
// =============================================================================

/// Build the CORS layer from the configured origin list. `*` allows any
/// origin (without credentials); unparseable entries are skipped.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    if origins.iter().any(|o| o == "*") {
        return base.allow_origin(AllowOrigin::any());
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
}

// =============================================================================
// ROUTER
// =============================================================================

fn notes_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(notes::list_notes).post(notes::create_note))
        .route("/search", get(notes::search_notes))
        .route("/categories", get(notes::list_categories))
        .route("/category/:category", get(notes::notes_by_category))
        .route(
            "/:id",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note),
        )
        .route("/:id/pin", patch(notes::toggle_pin))
        .route("/:id/archive", patch(notes::toggle_archive))
}

/// Assemble the full application: routes, docs, and middleware.
pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    let mut app = Router::new()
        .route("/", get(system::welcome))
        .route("/health", get(system::health))
        .merge(SwaggerUi::new("/api-docs").url("/openapi.json", ApiDoc::openapi()))
        .nest("/api/notes", notes_routes())
        .fallback(system::route_not_found)
        .layer(DefaultBodyLimit::max(config.body_limit_bytes));

    if config.is_development() {
        app = app.layer(middleware::from_fn(attach_error_detail));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors_layer(&config.allowed_origins))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_note_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        for path in [
            "/api/notes",
            "/api/notes/search",
            "/api/notes/categories",
            "/api/notes/category/{category}",
            "/api/notes/{id}",
            "/api/notes/{id}/pin",
            "/api/notes/{id}/archive",
            "/health",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_request_ids_are_uuid_v7() {
        let request = axum::http::Request::new(());
        let id = MakeRequestUuidV7
            .make_request_id(&request)
            .expect("request id");
        let parsed = Uuid::parse_str(id.header_value().to_str().unwrap()).unwrap();
        assert_eq!(parsed.get_version_num(), 7);
    }

    async fn cors_headers(origins: &[&str], origin: &str) -> axum::http::HeaderMap {
        use tower::ServiceExt;

        let origins: Vec<String> = origins.iter().map(|o| o.to_string()).collect();
        let app: Router = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(cors_layer(&origins));
        let request = axum::http::Request::get("/")
            .header(header::ORIGIN, origin)
            .body(axum::body::Body::empty())
            .unwrap();
        app.oneshot(request).await.unwrap().headers().clone()
    }

    #[tokio::test]
    async fn test_cors_wildcard_allows_any_origin_without_credentials() {
        let headers = cors_headers(&["*"], "http://elsewhere.test").await;
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(headers
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .is_none());
    }

    #[tokio::test]
    async fn test_cors_origin_list_skips_invalid_entries() {
        let origins = ["http://localhost:3000", "bad\norigin"];

        let headers = cors_headers(&origins, "http://localhost:3000").await;
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");

        let headers = cors_headers(&origins, "http://elsewhere.test").await;
        assert!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
