//! Post entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::PostValidationError;
use crate::domain::user::{User, UserId, UserInput};

/// Post identifier - positive integer assigned by storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct PostId(u64);

impl PostId {
    /// Create a new PostId, rejecting the unassigned value 0
    pub fn new(id: u64) -> Result<Self, PostValidationError> {
        if id == 0 {
            return Err(PostValidationError::InvalidId);
        }
        Ok(Self(id))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for PostId {
    type Error = PostValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PostId> for u64 {
    fn from(id: PostId) -> Self {
        id.0
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted post row; the author is referenced by ID only
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    id: PostId,
    title: String,
    content: String,
    author_id: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Post {
    /// Rebuild a post from stored columns
    pub fn restore(
        id: PostId,
        title: impl Into<String>,
        content: impl Into<String>,
        author_id: UserId,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            author_id,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> PostId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Apply title/content changes; author and creation time never change
    pub fn apply(&mut self, changes: &PostChanges, updated_at: DateTime<Utc>) {
        self.title = changes.title.clone();
        self.content = changes.content.clone();
        self.updated_at = updated_at;
    }

    /// Attach the resolved author for a response
    pub fn with_author(self, author: User) -> PostWithAuthor {
        PostWithAuthor { post: self, author }
    }
}

/// A post together with its author, looked up at read time
#[derive(Debug, Clone, Serialize)]
pub struct PostWithAuthor {
    #[serde(flatten)]
    post: Post,
    author: User,
}

impl PostWithAuthor {
    pub fn post(&self) -> &Post {
        &self.post
    }

    pub fn author(&self) -> &User {
        &self.author
    }
}

/// A post ready to be inserted; storage assigns the ID
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The mutable fields of a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostChanges {
    pub title: String,
    pub content: String,
}

/// Untrusted post payload as received from a client
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostInput {
    /// Ignored on write; storage assigns identities
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author_id: u32,
    /// Never trusted; the author is always re-resolved from storage
    #[serde(default)]
    pub author: Option<UserInput>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl PostInput {
    pub fn new(title: impl Into<String>, content: impl Into<String>, author_id: u32) -> Self {
        let now = Utc::now();

        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            author_id,
            author: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The title/content pair this payload carries
    pub fn changes(&self) -> PostChanges {
        PostChanges {
            title: self.title.clone(),
            content: self.content.clone(),
        }
    }
}
