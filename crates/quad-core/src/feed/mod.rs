//! Feed controller: post collection, composer, per-post operations.
//!
//! Owns the in-memory post collection (server order, replaced wholesale
//! on every reload), the composer draft with its transient image
//! attachment, and a per-post operation map so one post's in-flight
//! request never disables another post's controls.
//!
//! Every async operation catches its failure at the boundary and folds
//! it into `error_message`; nothing escapes as an unhandled error, and
//! per-post flags are cleared exactly once per request on success and
//! failure alike.

pub mod attachment;
pub mod pending;

use std::path::PathBuf;
use std::sync::Arc;

use quad_types::{Post, PostKey};
use tracing::error;

use crate::api::{ApiClient, NewPost};
use crate::session::SessionStore;
use attachment::{ImageAttachment, PreviewRegistry};
use pending::PendingOps;

const LOAD_POSTS_FALLBACK: &str = "Failed to load posts.";
const CREATE_POST_FALLBACK: &str = "Failed to create post.";
const REACT_FALLBACK: &str = "Failed to react to post.";
const COMMENT_FALLBACK: &str = "Failed to post comment.";
const LOAD_COMMENTS_FALLBACK: &str = "Failed to load comments.";

const EMPTY_POST_MESSAGE: &str = "Post content cannot be empty.";
const EMPTY_COMMENT_MESSAGE: &str = "Comment cannot be empty.";
const UNRESOLVED_USER_MESSAGE: &str = "Could not determine the current user. Please log in again.";
const UNKNOWN_POST_MESSAGE: &str = "This post can no longer be found.";

/// Controller for the feed surface.
pub struct FeedController {
    api: ApiClient,
    session: Arc<SessionStore>,
    previews: Arc<PreviewRegistry>,

    /// Posts in server order; replaced wholesale by every reload.
    pub posts: Vec<Post>,
    /// A collection fetch is in flight.
    pub is_loading: bool,
    /// User-facing message for the last failed operation.
    pub error_message: Option<String>,

    /// Composer draft content.
    pub draft_content: String,
    /// Composer draft title.
    pub draft_title: String,
    attachment: Option<ImageAttachment>,

    pending: PendingOps,
}

impl FeedController {
    pub fn new(
        api: ApiClient,
        session: Arc<SessionStore>,
        previews: Arc<PreviewRegistry>,
    ) -> Self {
        Self {
            api,
            session,
            previews,
            posts: Vec::new(),
            is_loading: false,
            error_message: None,
            draft_content: String::new(),
            draft_title: String::new(),
            attachment: None,
            pending: PendingOps::default(),
        }
    }

    // ========================================================================
    // Collection
    // ========================================================================

    /// Fetches the full post collection and replaces the in-memory one.
    ///
    /// A full reload always wins; on failure the previous collection is
    /// left untouched and only the error message changes.
    pub async fn load_posts(&mut self) {
        self.is_loading = true;
        let result = self.api.fetch_posts().await;
        self.is_loading = false;

        match result {
            Ok(posts) => {
                self.posts = posts;
                self.error_message = None;
            }
            Err(err) => {
                error!("Failed to load posts: {err}");
                self.error_message = Some(err.user_message(LOAD_POSTS_FALLBACK));
            }
        }
    }

    /// Validates the composer draft and submits it as a new post.
    ///
    /// Fails fast, without a network call, on empty content or an
    /// unresolvable acting user. On success the draft (content, title,
    /// attachment) is cleared and the feed reloaded to reconcile with
    /// server state.
    pub async fn submit_post(&mut self) {
        let content = self.draft_content.trim().to_string();
        if content.is_empty() {
            self.error_message = Some(EMPTY_POST_MESSAGE.to_string());
            return;
        }

        let Some((author_id, campus_id)) = self.resolve_author_and_campus() else {
            self.error_message = Some(UNRESOLVED_USER_MESSAGE.to_string());
            return;
        };

        let title = {
            let trimmed = self.draft_title.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };
        let image: Option<PathBuf> = self.attachment.as_ref().map(|a| a.file().to_path_buf());

        let new_post = NewPost {
            content,
            author_id,
            campus_id,
            title,
            image,
        };

        match self.api.create_post(&new_post).await {
            Ok(()) => {
                self.draft_content.clear();
                self.draft_title.clear();
                self.clear_image_attachment();
                self.error_message = None;
                self.load_posts().await;
            }
            Err(err) => {
                error!("Failed to create post: {err}");
                self.error_message = Some(err.user_message(CREATE_POST_FALLBACK));
            }
        }
    }

    // ========================================================================
    // Image attachment
    // ========================================================================

    /// Holds a new image attachment for the composer.
    ///
    /// The previous preview handle, when one is held, is released
    /// before the new one is created.
    pub fn set_image_attachment(&mut self, file: impl Into<PathBuf>) {
        self.attachment.take();
        self.attachment = Some(ImageAttachment::new(file, &self.previews));
    }

    /// Releases the held attachment. Idempotent: clearing twice is a
    /// no-op the second time.
    pub fn clear_image_attachment(&mut self) {
        self.attachment.take();
    }

    pub fn attachment(&self) -> Option<&ImageAttachment> {
        self.attachment.as_ref()
    }

    // ========================================================================
    // Per-post operations
    // ========================================================================

    /// Toggles the heart reaction on one post.
    ///
    /// The per-post reacting flag is cleared exactly once per request,
    /// on success and failure alike. The locally-held count is updated
    /// from the response when it carries one, else incremented by one
    /// as a best-effort fallback.
    pub async fn react_to_post(&mut self, key: &PostKey) {
        if !self.posts.iter().any(|p| &p.key == key) {
            self.error_message = Some(UNKNOWN_POST_MESSAGE.to_string());
            return;
        }
        if self.resolve_actor_id().is_none() {
            self.error_message = Some(UNRESOLVED_USER_MESSAGE.to_string());
            return;
        }

        self.pending.set_reacting(key, true);
        let result = self.api.toggle_reaction(key).await;
        self.pending.set_reacting(key, false);

        match result {
            Ok(response) => {
                if let Some(post) = self.posts.iter_mut().find(|p| &p.key == key) {
                    match response.heart_count() {
                        Some(count) => post.heart_count = count,
                        None => post.heart_count += 1,
                    }
                }
                self.error_message = None;
            }
            Err(err) => {
                error!("Failed to toggle reaction on post {key}: {err}");
                self.error_message = Some(err.user_message(REACT_FALLBACK));
            }
        }
    }

    /// Submits the per-post comment draft.
    ///
    /// Fails locally on an empty (trimmed) draft or an unresolvable
    /// acting user. On success the draft is cleared and the feed
    /// reloaded; the submitting flag is cleared exactly once either way.
    pub async fn submit_comment(&mut self, key: &PostKey) {
        if !self.posts.iter().any(|p| &p.key == key) {
            self.error_message = Some(UNKNOWN_POST_MESSAGE.to_string());
            return;
        }
        let content = self.pending.comment_draft(key).trim().to_string();
        if content.is_empty() {
            self.error_message = Some(EMPTY_COMMENT_MESSAGE.to_string());
            return;
        }
        if self.resolve_actor_id().is_none() {
            self.error_message = Some(UNRESOLVED_USER_MESSAGE.to_string());
            return;
        }

        self.pending.set_submitting_comment(key, true);
        let result = self.api.create_comment(key, &content).await;
        self.pending.set_submitting_comment(key, false);

        match result {
            Ok(()) => {
                self.pending.clear_comment_draft(key);
                self.error_message = None;
                self.load_posts().await;
            }
            Err(err) => {
                error!("Failed to comment on post {key}: {err}");
                self.error_message = Some(err.user_message(COMMENT_FALLBACK));
            }
        }
    }

    /// Shows, hides, or lazily loads one post's comments.
    ///
    /// Tri-state toggle: shown comments are hidden without a fetch;
    /// fetched-but-hidden comments are shown without a fetch; comments
    /// never fetched are loaded once, cached on the post, and shown.
    pub async fn toggle_comments(&mut self, key: &PostKey) {
        let Some(index) = self.posts.iter().position(|p| &p.key == key) else {
            self.error_message = Some(UNKNOWN_POST_MESSAGE.to_string());
            return;
        };

        if self.pending.comments_visible(key) {
            self.pending.set_comments_visible(key, false);
            return;
        }
        if self.posts[index].comments.is_some() {
            self.pending.set_comments_visible(key, true);
            return;
        }

        self.pending.set_loading_comments(key, true);
        let result = self.api.fetch_comments(key).await;
        self.pending.set_loading_comments(key, false);

        match result {
            Ok(comments) => {
                self.posts[index].comments = Some(comments);
                self.pending.set_comments_visible(key, true);
                self.error_message = None;
            }
            Err(err) => {
                error!("Failed to load comments for post {key}: {err}");
                self.error_message = Some(err.user_message(LOAD_COMMENTS_FALLBACK));
            }
        }
    }

    // ========================================================================
    // Per-post state reads and draft edits
    // ========================================================================

    pub fn is_reacting(&self, key: &PostKey) -> bool {
        self.pending.is_reacting(key)
    }

    pub fn is_submitting_comment(&self, key: &PostKey) -> bool {
        self.pending.is_submitting_comment(key)
    }

    pub fn is_loading_comments(&self, key: &PostKey) -> bool {
        self.pending.is_loading_comments(key)
    }

    pub fn comments_visible(&self, key: &PostKey) -> bool {
        self.pending.comments_visible(key)
    }

    pub fn comment_draft(&self, key: &PostKey) -> &str {
        self.pending.comment_draft(key)
    }

    pub fn set_comment_draft(&mut self, key: &PostKey, draft: impl Into<String>) {
        self.pending.set_comment_draft(key, draft);
    }

    // ========================================================================
    // Actor resolution
    // ========================================================================

    /// The acting user's id, from the reactive snapshot with a direct
    /// durable-storage fallback for a stale snapshot.
    fn resolve_actor_id(&self) -> Option<i64> {
        self.resolve_user()?.user_id
    }

    /// The acting user's id and campus id; both must be valid numbers.
    fn resolve_author_and_campus(&self) -> Option<(i64, i64)> {
        let user = self.resolve_user()?;
        Some((user.user_id?, user.campus_id()?))
    }

    fn resolve_user(&self) -> Option<quad_types::AuthUser> {
        self.session
            .current_user()
            .or_else(|| self.session.credential_store().read_user())
    }
}

impl std::fmt::Debug for FeedController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedController")
            .field("posts", &self.posts.len())
            .field("is_loading", &self.is_loading)
            .field("error_message", &self.error_message)
            .finish_non_exhaustive()
    }
}
