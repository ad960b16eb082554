use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::concept_key::ConceptKey;

/// An atomic knowledge item. Facts are never hard-deleted: an update
/// supersedes the old version with a new row carrying `version + 1`.
///
/// Invariant: at most one *active* (non-superseded) fact exists per
/// concept key at any time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fact {
    /// UUID v4 identifier.
    pub id: String,
    /// Normalized topic this fact belongs to.
    pub concept_key: ConceptKey,
    /// The knowledge content itself.
    pub content: String,
    /// Monotonic version counter, starts at 1.
    pub version: u32,
    /// When the first version of this chain was created.
    pub created_at: DateTime<Utc>,
    /// When this version was written.
    pub updated_at: DateTime<Utc>,
    /// ID of the fact that supersedes this one, if any.
    pub superseded_by: Option<String>,
    /// blake3 hash of content, for dedup short-circuit and audit.
    pub content_hash: String,
}

impl Fact {
    /// Create the first version of a fact chain.
    pub fn new(concept_key: ConceptKey, content: impl Into<String>, now: DateTime<Utc>) -> Self {
        let content = content.into();
        let content_hash = Self::compute_content_hash(&content);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            concept_key,
            content,
            version: 1,
            created_at: now,
            updated_at: now,
            superseded_by: None,
            content_hash,
        }
    }

    /// Build the successor version of this fact with new content.
    /// Keeps the concept key and `created_at`, bumps the version.
    pub fn successor(&self, content: impl Into<String>, now: DateTime<Utc>) -> Self {
        let content = content.into();
        let content_hash = Self::compute_content_hash(&content);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            concept_key: self.concept_key.clone(),
            content,
            version: self.version + 1,
            created_at: self.created_at,
            updated_at: now,
            superseded_by: None,
            content_hash,
        }
    }

    /// Compute the blake3 content hash.
    pub fn compute_content_hash(content: &str) -> String {
        blake3::hash(content.as_bytes()).to_hex().to_string()
    }

    /// Whether this fact is the active version of its chain.
    pub fn is_active(&self) -> bool {
        self.superseded_by.is_none()
    }

    /// Structural comparison: same concept key and content hash.
    ///
    /// Distinct from `PartialEq`, which only compares IDs.
    pub fn content_eq(&self, other: &Self) -> bool {
        self.concept_key == other.concept_key && self.content_hash == other.content_hash
    }
}

/// Identity equality: two facts are equal if they have the same ID.
/// For structural comparison, use [`Fact::content_eq`].
impl PartialEq for Fact {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Fact {}
