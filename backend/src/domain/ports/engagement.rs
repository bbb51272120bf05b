//! Driving port for likes, item comments, follows, and community posts.
//!
//! None of these interactions is part of the purchase lifecycle; they exist
//! here because each one notifies another user.

use async_trait::async_trait;

use crate::domain::{CommunityId, CommunityPost, Error, ItemId, UserId};

/// A user reacting to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemReactionRequest {
    /// Authenticated caller.
    pub actor_id: UserId,
    /// Item reacted to.
    pub item_id: ItemId,
}

/// A user commenting on an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemCommentRequest {
    /// Authenticated caller.
    pub actor_id: UserId,
    /// Item commented on.
    pub item_id: ItemId,
    /// Comment text; validated by the service.
    pub content: String,
}

/// One user following another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowRequest {
    /// Authenticated caller.
    pub follower_id: UserId,
    /// User being followed.
    pub followed_id: UserId,
}

/// A user posting to a community board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityPostRequest {
    /// Authenticated caller.
    pub author_id: UserId,
    /// Community to post in.
    pub community_id: CommunityId,
    /// Post text; validated by the service.
    pub content: String,
}

/// Social interactions that raise notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Engagement: Send + Sync {
    /// Like an item; its seller is notified unless they liked it themselves.
    async fn like_item(&self, request: ItemReactionRequest) -> Result<(), Error>;

    /// Comment on an item; its seller is notified unless they wrote it.
    async fn comment_on_item(&self, request: ItemCommentRequest) -> Result<(), Error>;

    /// Follow a user, who is notified.
    async fn follow_user(&self, request: FollowRequest) -> Result<(), Error>;

    /// Post to a community; recent posters other than the author are
    /// notified.
    async fn post_to_community(&self, request: CommunityPostRequest) -> Result<CommunityPost, Error>;
}
