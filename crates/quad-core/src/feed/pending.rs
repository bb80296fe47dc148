//! Per-post operation state.
//!
//! One entry per post key, so the UI can disable or indicate state for
//! one post's in-flight operation without touching any other post. A
//! missing entry means no operation in flight, comments hidden, and an
//! empty draft.

use std::collections::HashMap;

use quad_types::PostKey;

/// Per-post flags and draft text.
#[derive(Debug, Clone, Default)]
pub struct PostOpState {
    /// Toggle-reaction request in flight.
    pub reacting: bool,
    /// Comment submission in flight.
    pub submitting_comment: bool,
    /// Comment list fetch in flight.
    pub loading_comments: bool,
    /// Cached comments currently shown.
    pub comments_visible: bool,
    /// Draft comment text for this post.
    pub comment_draft: String,
}

/// Operation state for every post, keyed by stable post identity.
#[derive(Debug, Default)]
pub struct PendingOps {
    by_post: HashMap<PostKey, PostOpState>,
}

impl PendingOps {
    fn entry(&mut self, key: &PostKey) -> &mut PostOpState {
        self.by_post.entry(key.clone()).or_default()
    }

    pub fn is_reacting(&self, key: &PostKey) -> bool {
        self.by_post.get(key).is_some_and(|s| s.reacting)
    }

    pub fn set_reacting(&mut self, key: &PostKey, value: bool) {
        self.entry(key).reacting = value;
    }

    pub fn is_submitting_comment(&self, key: &PostKey) -> bool {
        self.by_post.get(key).is_some_and(|s| s.submitting_comment)
    }

    pub fn set_submitting_comment(&mut self, key: &PostKey, value: bool) {
        self.entry(key).submitting_comment = value;
    }

    pub fn is_loading_comments(&self, key: &PostKey) -> bool {
        self.by_post.get(key).is_some_and(|s| s.loading_comments)
    }

    pub fn set_loading_comments(&mut self, key: &PostKey, value: bool) {
        self.entry(key).loading_comments = value;
    }

    pub fn comments_visible(&self, key: &PostKey) -> bool {
        self.by_post.get(key).is_some_and(|s| s.comments_visible)
    }

    pub fn set_comments_visible(&mut self, key: &PostKey, value: bool) {
        self.entry(key).comments_visible = value;
    }

    pub fn comment_draft(&self, key: &PostKey) -> &str {
        self.by_post
            .get(key)
            .map_or("", |s| s.comment_draft.as_str())
    }

    pub fn set_comment_draft(&mut self, key: &PostKey, draft: impl Into<String>) {
        self.entry(key).comment_draft = draft.into();
    }

    pub fn clear_comment_draft(&mut self, key: &PostKey) {
        if let Some(state) = self.by_post.get_mut(key) {
            state.comment_draft.clear();
        }
    }
}
