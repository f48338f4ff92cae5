//! # noted-client
//!
//! Typed async client for the noted HTTP API.
//!
//! ```rust,ignore
//! use noted_client::NotesClient;
//! use noted_core::{ListParams, NewNote};
//!
//! let client = NotesClient::new("http://localhost:3000")?;
//! let note = client.create(&NewNote::new("Groceries", "milk, eggs")).await?;
//! let page = client.list(&ListParams::default()).await?;
//! assert_eq!(page.pagination.total_items, 1);
//! ```

use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use noted_core::{ListParams, NewNote, Note, NoteChanges};

/// Errors returned by [`NotesClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure or undecodable response.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The base URL cannot carry a path.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            ClientError::InvalidUrl(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Pagination block of a listing response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub items_per_page: i64,
}

/// One page of notes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NoteList {
    #[serde(rename = "data")]
    pub notes: Vec<Note>,
    pub pagination: PageInfo,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Client for the `/api/notes` endpoints.
#[derive(Debug, Clone)]
pub struct NotesClient {
    http: reqwest::Client,
    base_url: Url,
}

impl NotesClient {
    /// Create a client for the server at `base_url` (e.g. `http://localhost:3000`).
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client that reuses an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    /// `GET /api/notes` with filters, sorting and pagination.
    pub async fn list(&self, params: &ListParams) -> Result<NoteList> {
        let request = self.request(Method::GET, &[])?.query(params);
        self.send(request).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Note> {
        self.data(self.request(Method::GET, &[&id.to_string()])?)
            .await
    }

    pub async fn create(&self, note: &NewNote) -> Result<Note> {
        self.data(self.request(Method::POST, &[])?.json(note))
            .await
    }

    /// `PUT /api/notes/:id`. The server requires title and content.
    pub async fn update(&self, id: Uuid, changes: &NoteChanges) -> Result<Note> {
        self.data(self.request(Method::PUT, &[&id.to_string()])?.json(changes))
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let _: serde_json::Value = self
            .send(self.request(Method::DELETE, &[&id.to_string()])?)
            .await?;
        Ok(())
    }

    /// Non-archived notes whose title or content contains `query`.
    pub async fn search(&self, query: &str) -> Result<Vec<Note>> {
        self.data(self.request(Method::GET, &["search"])?.query(&[("q", query)]))
            .await
    }

    /// Non-archived notes in `category`.
    pub async fn by_category(&self, category: &str) -> Result<Vec<Note>> {
        self.data(self.request(Method::GET, &["category", category])?)
            .await
    }

    pub async fn toggle_pin(&self, id: Uuid) -> Result<Note> {
        self.data(self.request(Method::PATCH, &[&id.to_string(), "pin"])?)
            .await
    }

    pub async fn toggle_archive(&self, id: Uuid) -> Result<Note> {
        self.data(self.request(Method::PATCH, &[&id.to_string(), "archive"])?)
            .await
    }

    /// Every category in use, sorted.
    pub async fn categories(&self) -> Result<Vec<String>> {
        self.data(self.request(Method::GET, &["categories"])?)
            .await
    }

    /// Build a request to `/api/notes/<segments...>`; segments are percent-encoded.
    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["api", "notes"])
            .extend(segments);
        debug!(
            subsystem = "client",
            component = "notes",
            method = %method,
            url = %url,
            "Sending request"
        );
        Ok(self.http.request(method, url))
    }

    async fn data<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let envelope: Envelope<T> = self.send(request).await?;
        Ok(envelope.data)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
