//! Canonical post records.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::comment::Comment;

/// Sentinel author name for posts with no resolvable author parts.
pub const UNKNOWN_AUTHOR: &str = "Unknown author";

/// Stable per-post identity, derived once at wire normalization.
///
/// Keys taken from a server identifier are the identifier verbatim.
/// Keys synthesized from a timestamp or record fingerprint carry a `~`
/// prefix so the boundary can flag them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostKey(String);

impl PostKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the key was synthesized client-side because the server
    /// supplied no identifier.
    pub fn is_synthetic(&self) -> bool {
        self.0.starts_with('~')
    }
}

impl fmt::Display for PostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single reaction belonging to one post and one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub user_id: Option<i64>,
    /// Reaction type tag; only `"heart"` is in use.
    pub reaction_type: String,
    /// Distinguishes a toggled-off reaction from a toggled-on one.
    pub is_active: bool,
}

/// A post mirrored from the server, normalized to one canonical shape.
///
/// `comments` is client-only: absent until the first on-demand load,
/// then cached for the rest of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub key: PostKey,
    pub author_name: String,
    pub content: String,
    pub title: Option<String>,
    pub image_url: Option<String>,
    /// Creation timestamp as the server sent it.
    pub created_at: Option<String>,
    pub heart_count: u64,
    pub reactions: Vec<Reaction>,
    pub comments: Option<Vec<Comment>>,
}

impl Post {
    /// First letter of the author display name, uppercased (`'A'` when
    /// the name is empty).
    pub fn author_initial(&self) -> char {
        self.author_name
            .trim()
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('A')
    }

    /// Parses the creation timestamp as RFC 3339, when it is one.
    pub fn created_time(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(self.created_at.as_deref()?.trim()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> Post {
        Post {
            key: PostKey::new("1"),
            author_name: "ada lovelace".to_string(),
            content: "hello".to_string(),
            title: None,
            image_url: None,
            created_at: Some("2025-03-01T10:00:00+00:00".to_string()),
            heart_count: 0,
            reactions: Vec::new(),
            comments: None,
        }
    }

    #[test]
    fn test_author_initial_uppercased() {
        assert_eq!(post().author_initial(), 'A');

        let mut anonymous = post();
        anonymous.author_name = String::new();
        assert_eq!(anonymous.author_initial(), 'A');

        let mut named = post();
        named.author_name = "grace".to_string();
        assert_eq!(named.author_initial(), 'G');
    }

    #[test]
    fn test_created_time_parses_rfc3339() {
        let time = post().created_time().unwrap();
        assert_eq!(time.timestamp(), 1_740_823_200);
    }

    #[test]
    fn test_created_time_rejects_garbage() {
        let mut bad = post();
        bad.created_at = Some("yesterday".to_string());
        assert!(bad.created_time().is_none());
    }

    #[test]
    fn test_post_key_synthetic_flag() {
        assert!(!PostKey::new("42").is_synthetic());
        assert!(PostKey::new("~ts:2025").is_synthetic());
        assert!(PostKey::new("~fp:abcd").is_synthetic());
    }
}
