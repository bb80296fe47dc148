//! Network boundary for the campus feed API.
//!
//! Thin reqwest wrapper over the REST endpoints. Requests carry a
//! bearer token when the credential store holds one; responses are
//! normalized into canonical records before they leave this module.

pub mod error;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use quad_types::wire::{CommentWire, PostWire, ReactResponseWire};
use quad_types::{
    AuthUser, Comment, LoginRequest, LoginResponse, Post, PostKey, ProfileUpdate,
};
use reqwest::multipart;
use serde_json::json;
use tracing::warn;

pub use error::{ApiError, ApiErrorKind, NETWORK_UNREACHABLE_MESSAGE};

use crate::config::Config;
use crate::session::store::CredentialStore;

/// Draft post payload for the multipart create-post request.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub content: String,
    pub author_id: i64,
    pub campus_id: i64,
    pub title: Option<String>,
    /// Image attachment to upload as a binary part.
    pub image: Option<PathBuf>,
}

/// Client for the feed API boundary.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<CredentialStore>,
}

impl ApiClient {
    /// Builds a client from configuration.
    ///
    /// # Errors
    /// Returns an error if the base URL is malformed or the HTTP client
    /// cannot be constructed.
    pub fn new(config: &Config, store: Arc<CredentialStore>) -> Result<Self> {
        let base_url = config.api_base_url.trim().trim_end_matches('/').to_string();
        url::Url::parse(&base_url)
            .with_context(|| format!("Invalid API base URL: {base_url}"))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            store,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Attaches the stored bearer token, when one exists.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.store.read_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Turns a non-success status into an [`ApiError`], keeping the body.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::http_status(status.as_u16(), &body))
    }

    /// `POST /auth/login`
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let response = self
            .http
            .post(self.endpoint("/auth/login"))
            .json(credentials)
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::from_transport(&e))
    }

    /// `GET /auth/profile`
    pub async fn fetch_profile(&self) -> Result<AuthUser, ApiError> {
        let response = self
            .authorize(self.http.get(self.endpoint("/auth/profile")))
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::from_transport(&e))
    }

    /// `PUT /auth/profile`
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<AuthUser, ApiError> {
        let response = self
            .authorize(self.http.put(self.endpoint("/auth/profile")))
            .json(update)
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::from_transport(&e))
    }

    /// `GET /post` — the full collection, normalized.
    pub async fn fetch_posts(&self) -> Result<Vec<Post>, ApiError> {
        let response = self
            .authorize(self.http.get(self.endpoint("/post")))
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        let wires: Vec<PostWire> = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        let posts: Vec<Post> = wires.into_iter().map(PostWire::normalize).collect();
        for post in &posts {
            if post.key.is_synthetic() {
                warn!(
                    "Post arrived without a stable identifier; using synthetic key {}",
                    post.key
                );
            }
        }
        Ok(posts)
    }

    /// `POST /post` — multipart create.
    pub async fn create_post(&self, new_post: &NewPost) -> Result<(), ApiError> {
        let mut form = multipart::Form::new()
            .text("content", new_post.content.clone())
            .text("author_id", new_post.author_id.to_string())
            .text("campus_id", new_post.campus_id.to_string());

        if let Some(title) = &new_post.title {
            form = form.text("title", title.clone());
        }
        if let Some(path) = &new_post.image {
            form = form.part("image", image_part(path)?);
        }

        let response = self
            .authorize(self.http.post(self.endpoint("/post")))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        Self::check_status(response).await?;
        Ok(())
    }

    /// `POST /post/{id}/react` — toggles the heart reaction.
    ///
    /// The response shape is not fully specified; a success with an
    /// empty body is treated as carrying no authoritative count.
    pub async fn toggle_reaction(&self, post: &PostKey) -> Result<ReactResponseWire, ApiError> {
        let response = self
            .authorize(self.http.post(self.endpoint(&format!("/post/{post}/react"))))
            .json(&json!({ "reaction_type": "heart" }))
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        let body = Self::check_status(response)
            .await?
            .text()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        if body.trim().is_empty() {
            return Ok(ReactResponseWire::default());
        }
        serde_json::from_str(&body)
            .map_err(|e| ApiError::parse(format!("Failed to parse reaction response: {e}")))
    }

    /// `GET /post/{id}/comments` — normalized.
    pub async fn fetch_comments(&self, post: &PostKey) -> Result<Vec<Comment>, ApiError> {
        let response = self
            .authorize(
                self.http
                    .get(self.endpoint(&format!("/post/{post}/comments"))),
            )
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        let wires: Vec<CommentWire> = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        Ok(wires.into_iter().map(CommentWire::normalize).collect())
    }

    /// `POST /post/{id}/comments` — only success/failure is consumed.
    pub async fn create_comment(&self, post: &PostKey, content: &str) -> Result<(), ApiError> {
        let response = self
            .authorize(
                self.http
                    .post(self.endpoint(&format!("/post/{post}/comments"))),
            )
            .json(&json!({ "content": content }))
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        Self::check_status(response).await?;
        Ok(())
    }
}

/// Builds the binary multipart part for an image attachment.
fn image_part(path: &Path) -> Result<multipart::Part, ApiError> {
    let bytes = std::fs::read(path).map_err(|e| {
        ApiError::validation(format!("Cannot read image attachment {}: {e}", path.display()))
    })?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string();

    let part = multipart::Part::bytes(bytes).file_name(file_name);
    match mime_type_for_extension(path) {
        Some(mime) => part
            .mime_str(mime)
            .map_err(|e| ApiError::validation(format!("Invalid attachment MIME type: {e}"))),
        None => Ok(part),
    }
}

/// Returns MIME type inferred from file extension for supported image formats.
fn mime_type_for_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension().and_then(|e| e.to_str())?;

    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}
