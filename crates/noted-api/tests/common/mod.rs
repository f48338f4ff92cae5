//! Shared helpers for router tests over the in-memory repository.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use noted_api::{build_router, AppState, Environment, ServerConfig};
use noted_db::MemoryNoteRepository;

pub struct TestApp {
    pub router: Router,
    pub repo: MemoryNoteRepository,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(ServerConfig {
            environment: Environment::Test,
            ..Default::default()
        })
    }

    pub fn with_config(config: ServerConfig) -> Self {
        let repo = MemoryNoteRepository::new();
        let router = build_router(AppState::new(Arc::new(repo.clone()), config));
        Self { router, repo }
    }

    /// Send a request and decode the JSON body (`Value::Null` when empty).
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::delete(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn patch(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::patch(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.send_json(Method::POST, uri, body.to_string()).await
    }

    pub async fn put_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.send_json(Method::PUT, uri, body.to_string()).await
    }

    pub async fn send_json(&self, method: Method, uri: &str, raw: String) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(raw))
                .unwrap(),
        )
        .await
    }

    /// Create a note through the API and return its JSON representation.
    pub async fn create(&self, body: Value) -> Value {
        let (status, json) = self.post_json("/api/notes", &body).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", json);
        json["data"].clone()
    }
}

/// Titles of the notes in a `data` array, in order.
pub fn titles(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|n| n["title"].as_str().unwrap_or_default().to_string())
        .collect()
}
