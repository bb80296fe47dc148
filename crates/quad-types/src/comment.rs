//! Canonical comment records.

/// Sentinel author name for comments with no resolvable author parts.
pub const UNKNOWN_COMMENT_AUTHOR: &str = "Unknown";

/// A comment belonging to exactly one post.
///
/// Comments are fetched per-post on demand and cached on the post; the
/// canonical record keeps the resolved author name and the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub author_name: String,
    pub content: String,
}
