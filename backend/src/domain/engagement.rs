//! Social interactions that notify other users: likes, item comments,
//! follows, and community posts.

use chrono::{DateTime, Utc};

use super::{CommunityId, CommunityPostId, UserId};

/// Maximum length, in characters, of an item comment.
pub const ITEM_COMMENT_MAX: usize = 500;

/// Maximum length, in characters, of a community post.
pub const COMMUNITY_POST_MAX: usize = 2000;

/// How many distinct recent posters hear about a new community post.
pub const COMMUNITY_FANOUT: usize = 5;

/// Longest comment excerpt quoted in a notification.
const EXCERPT_CHARS: usize = 80;

/// Validation failures for engagement content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngagementValidationError {
    /// Text is empty after trimming.
    #[error("content must not be empty")]
    EmptyContent,
    /// Text exceeds its limit.
    #[error("content must be at most {max} characters")]
    ContentTooLong {
        /// The limit that was exceeded.
        max: usize,
    },
    /// A user tried to follow themselves.
    #[error("you cannot follow yourself")]
    SelfFollow,
}

/// Trim `raw` and check it against `max` characters.
pub fn validate_text(raw: &str, max: usize) -> Result<String, EngagementValidationError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(EngagementValidationError::EmptyContent);
    }
    if text.chars().count() > max {
        return Err(EngagementValidationError::ContentTooLong { max });
    }
    Ok(text.to_owned())
}

/// Shorten `text` for quoting, marking the cut with an ellipsis.
#[must_use]
pub fn excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_CHARS {
        return text.to_owned();
    }
    let mut cut: String = text.chars().take(EXCERPT_CHARS - 1).collect();
    cut.push('…');
    cut
}

/// Input used to construct a [`CommunityPost`].
#[derive(Debug, Clone)]
pub struct CommunityPostDraft {
    /// Post identifier.
    pub id: CommunityPostId,
    /// Community posted in.
    pub community_id: CommunityId,
    /// Posting user.
    pub author_id: UserId,
    /// Post text.
    pub content: String,
    /// Post time.
    pub created_at: DateTime<Utc>,
}

/// A message posted to a community board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityPost {
    id: CommunityPostId,
    community_id: CommunityId,
    author_id: UserId,
    content: String,
    created_at: DateTime<Utc>,
}

impl CommunityPost {
    /// Validate and construct a post.
    pub fn new(draft: CommunityPostDraft) -> Result<Self, EngagementValidationError> {
        let content = validate_text(&draft.content, COMMUNITY_POST_MAX)?;
        Ok(Self {
            id: draft.id,
            community_id: draft.community_id,
            author_id: draft.author_id,
            content,
            created_at: draft.created_at,
        })
    }

    /// Post identifier.
    #[must_use]
    pub const fn id(&self) -> CommunityPostId {
        self.id
    }

    /// Community posted in.
    #[must_use]
    pub const fn community_id(&self) -> CommunityId {
        self.community_id
    }

    /// Posting user.
    #[must_use]
    pub const fn author_id(&self) -> UserId {
        self.author_id
    }

    /// Post text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Post time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
