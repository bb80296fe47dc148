//! Wire-format records and their normalization into canonical records.
//!
//! The feed boundary is duck-typed: ids arrive under several spellings
//! and as either numbers or strings, authors arrive flattened or nested,
//! and reaction summaries arrive as a scalar count, a per-type count
//! map, or a list of individual reactions. Every accepted shape is
//! mapped here, once, into the canonical `Post`/`Comment` records —
//! nothing downstream re-derives field presence.

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};

use serde::{Deserialize, Deserializer};

use crate::comment::{Comment, UNKNOWN_COMMENT_AUTHOR};
use crate::names::assemble_name;
use crate::post::{Post, PostKey, Reaction, UNKNOWN_AUTHOR};

/// A server-side identifier: number or string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Int(i64),
    Str(String),
}

impl WireId {
    /// Renders the id as a non-empty key string, if it has one.
    fn as_key_string(&self) -> Option<String> {
        match self {
            WireId::Int(n) => Some(n.to_string()),
            WireId::Str(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
        }
    }
}

/// Scalar that may arrive as a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Int(i64),
    Float(f64),
    Str(String),
}

/// Deserializes an optional integer, accepting numeric strings.
pub(crate) fn lenient_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LenientNumber>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        LenientNumber::Int(n) => Some(n),
        LenientNumber::Float(f) => Some(f as i64),
        LenientNumber::Str(s) => s.trim().parse().ok(),
    }))
}

/// Scalar that may arrive as a JSON string or a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum LenientString {
    Str(String),
    Int(i64),
    Float(f64),
}

/// Deserializes an optional string, accepting bare numbers.
pub(crate) fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LenientString>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        LenientString::Str(s) => s,
        LenientString::Int(n) => n.to_string(),
        LenientString::Float(f) => f.to_string(),
    }))
}

/// Nested author/user sub-record on a post or comment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthorWire {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
}

/// Reaction summary: per-type counts or a list of individual reactions.
///
/// The trailing variant swallows shapes this client does not understand
/// so one odd summary cannot fail a whole feed fetch.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ReactionsWire {
    Counts(HashMap<String, u64>),
    List(Vec<ReactionWire>),
    Other(serde_json::Value),
}

/// A single reaction on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReactionWire {
    #[serde(deserialize_with = "lenient_opt_i64")]
    pub user_id: Option<i64>,
    pub reaction_type: Option<String>,
    pub is_active: Option<bool>,
}

/// A post as the boundary sends it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostWire {
    pub id: Option<WireId>,
    #[serde(alias = "postId")]
    pub post_id: Option<WireId>,
    pub content: Option<String>,
    pub title: Option<String>,
    #[serde(alias = "image", alias = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(alias = "createdAt", deserialize_with = "lenient_opt_string")]
    pub created_at: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub author: Option<AuthorWire>,
    pub user: Option<AuthorWire>,
    pub heart_count: Option<u64>,
    pub reactions: Option<ReactionsWire>,
}

impl PostWire {
    /// Maps the wire record into the canonical [`Post`].
    ///
    /// The per-post key is derived here, exactly once, and never
    /// re-derived at a use site.
    pub fn normalize(self) -> Post {
        let key = self.derive_key();
        let author_name = self.resolve_author_name();
        let reactions = self.reaction_list();
        let heart_count = self.resolve_heart_count(&reactions);

        Post {
            key,
            author_name,
            content: self.content.unwrap_or_default(),
            title: self.title.filter(|t| !t.trim().is_empty()),
            image_url: self.image_url,
            created_at: self.created_at,
            heart_count,
            reactions,
            comments: None,
        }
    }

    /// Derives the stable per-post key: `id`, then `post_id`/`postId`,
    /// then a synthetic key from the creation timestamp, then a
    /// synthetic fingerprint of the record.
    fn derive_key(&self) -> PostKey {
        if let Some(key) = self.id.as_ref().and_then(WireId::as_key_string) {
            return PostKey::new(key);
        }
        if let Some(key) = self.post_id.as_ref().and_then(WireId::as_key_string) {
            return PostKey::new(key);
        }
        if let Some(ts) = self.created_at.as_deref().map(str::trim)
            && !ts.is_empty()
        {
            return PostKey::new(format!("~ts:{ts}"));
        }

        let mut hasher = DefaultHasher::new();
        self.content.hash(&mut hasher);
        self.title.hash(&mut hasher);
        self.first_name.hash(&mut hasher);
        self.last_name.hash(&mut hasher);
        PostKey::new(format!("~fp:{:016x}", hasher.finish()))
    }

    /// Assembles the author display name from the flattened fields and
    /// the nested author/user sub-record (author preferred), with the
    /// `"Unknown author"` sentinel.
    fn resolve_author_name(&self) -> String {
        let nested = self.author.as_ref().or(self.user.as_ref());
        let mut parts = vec![
            self.first_name.as_deref(),
            self.middle_name.as_deref(),
            self.last_name.as_deref(),
        ];
        if let Some(author) = nested {
            parts.push(author.first_name.as_deref());
            parts.push(author.middle_name.as_deref());
            parts.push(author.last_name.as_deref());
        }
        assemble_name(parts).unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
    }

    fn reaction_list(&self) -> Vec<Reaction> {
        match &self.reactions {
            Some(ReactionsWire::List(list)) => list
                .iter()
                .map(|r| Reaction {
                    user_id: r.user_id,
                    reaction_type: r.reaction_type.clone().unwrap_or_default(),
                    is_active: r.is_active.unwrap_or(true),
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Heart count: scalar field, then the `heart` entry of a count map,
    /// then the number of active heart reactions in a list, else zero.
    fn resolve_heart_count(&self, reactions: &[Reaction]) -> u64 {
        if let Some(count) = self.heart_count {
            return count;
        }
        if let Some(ReactionsWire::Counts(counts)) = &self.reactions {
            return counts.get("heart").copied().unwrap_or(0);
        }
        reactions
            .iter()
            .filter(|r| r.is_active && r.reaction_type == "heart")
            .count() as u64
    }
}

/// A comment as the boundary sends it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommentWire {
    pub content: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub author: Option<AuthorWire>,
    pub user: Option<AuthorWire>,
}

impl CommentWire {
    /// Maps the wire record into the canonical [`Comment`].
    pub fn normalize(self) -> Comment {
        let nested = self.author.as_ref().or(self.user.as_ref());
        let mut parts = vec![
            self.first_name.as_deref(),
            self.middle_name.as_deref(),
            self.last_name.as_deref(),
        ];
        if let Some(author) = nested {
            parts.push(author.first_name.as_deref());
            parts.push(author.middle_name.as_deref());
            parts.push(author.last_name.as_deref());
        }
        let author_name =
            assemble_name(parts).unwrap_or_else(|| UNKNOWN_COMMENT_AUTHOR.to_string());

        Comment {
            author_name,
            content: self.content.unwrap_or_default(),
        }
    }
}

/// Response of the toggle-reaction endpoint.
///
/// The boundary's shape is not fully specified: the authoritative count
/// may arrive as `heart_count`, as `reactions.heart`, or as a reaction
/// list — or not at all.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReactResponseWire {
    pub heart_count: Option<u64>,
    pub reactions: Option<ReactionsWire>,
}

impl ReactResponseWire {
    /// The authoritative heart count carried by the response, if any.
    pub fn heart_count(&self) -> Option<u64> {
        if let Some(count) = self.heart_count {
            return Some(count);
        }
        match &self.reactions {
            Some(ReactionsWire::Counts(counts)) => counts.get("heart").copied(),
            Some(ReactionsWire::List(list)) => Some(
                list.iter()
                    .filter(|r| {
                        r.is_active.unwrap_or(true)
                            && r.reaction_type.as_deref().unwrap_or("heart") == "heart"
                    })
                    .count() as u64,
            ),
            Some(ReactionsWire::Other(_)) | None => None,
        }
    }
}
