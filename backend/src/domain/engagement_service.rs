//! Likes, item comments, follows, and community posts.
//!
//! Each operation validates its input, then raises the matching
//! [`DomainEvent`] through the dispatcher. A failed dispatch is logged and
//! does not fail the interaction. Items are read through the transaction
//! store, which owns them.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};

use super::engagement::{EngagementValidationError, excerpt, validate_text};
use super::ports::{
    CommunityPostRepository, CommunityPostRepositoryError, CommunityPostRequest, Engagement,
    EventDispatch, FollowRequest, ItemCommentRequest, ItemReactionRequest, TransactionRepository,
};
use super::transaction_service::map_repository_error;
use super::{
    COMMUNITY_FANOUT, CommunityPost, CommunityPostDraft, CommunityPostId, DomainEvent, Error,
    ITEM_COMMENT_MAX, Item, ItemId,
};

/// Raises engagement notifications.
#[derive(Clone)]
pub struct EngagementService<R, P> {
    items: Arc<R>,
    posts: Arc<P>,
    events: Arc<dyn EventDispatch>,
    clock: Arc<dyn Clock>,
}

impl<R, P> EngagementService<R, P>
where
    R: TransactionRepository,
    P: CommunityPostRepository,
{
    /// Create a service over the item and community stores.
    pub fn new(
        items: Arc<R>,
        posts: Arc<P>,
        events: Arc<dyn EventDispatch>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            items,
            posts,
            events,
            clock,
        }
    }

    async fn load_item(&self, item_id: &ItemId) -> Result<Item, Error> {
        self.items
            .find_item(item_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("item {item_id} not found")))
    }

    async fn notify(&self, event: DomainEvent) {
        let kind = event.kind();
        let recipient = event.recipient();
        if let Err(error) = self.events.dispatch(event).await {
            warn!(
                %recipient,
                %kind,
                code = ?error.code(),
                %error,
                "failed to dispatch engagement event"
            );
        }
    }
}

#[async_trait]
impl<R, P> Engagement for EngagementService<R, P>
where
    R: TransactionRepository,
    P: CommunityPostRepository,
{
    async fn like_item(&self, request: ItemReactionRequest) -> Result<(), Error> {
        let item = self.load_item(&request.item_id).await?;
        if item.seller_id() == request.actor_id {
            debug!(item_id = %item.id(), "seller liked own item; no notification");
            return Ok(());
        }
        self.notify(DomainEvent::ItemLiked {
            seller_id: item.seller_id(),
            item_id: item.id(),
            item_title: item.title().to_owned(),
        })
        .await;
        Ok(())
    }

    async fn comment_on_item(&self, request: ItemCommentRequest) -> Result<(), Error> {
        let content = validate_text(&request.content, ITEM_COMMENT_MAX)
            .map_err(|err| invalid_content(&err))?;
        let item = self.load_item(&request.item_id).await?;
        if item.seller_id() == request.actor_id {
            debug!(item_id = %item.id(), "seller commented on own item; no notification");
            return Ok(());
        }
        self.notify(DomainEvent::ItemCommented {
            seller_id: item.seller_id(),
            item_id: item.id(),
            item_title: item.title().to_owned(),
            excerpt: excerpt(&content),
        })
        .await;
        Ok(())
    }

    async fn follow_user(&self, request: FollowRequest) -> Result<(), Error> {
        if request.follower_id == request.followed_id {
            return Err(Error::invalid_request(
                EngagementValidationError::SelfFollow.to_string(),
            ));
        }
        info!(
            follower_id = %request.follower_id,
            followed_id = %request.followed_id,
            "user followed"
        );
        self.notify(DomainEvent::UserFollowed {
            followed_id: request.followed_id,
            follower_id: request.follower_id,
        })
        .await;
        Ok(())
    }

    async fn post_to_community(&self, request: CommunityPostRequest) -> Result<CommunityPost, Error> {
        let post = CommunityPost::new(CommunityPostDraft {
            id: CommunityPostId::random(),
            community_id: request.community_id,
            author_id: request.author_id,
            content: request.content,
            created_at: self.clock.utc(),
        })
        .map_err(|err| invalid_content(&err))?;
        self.posts.append(&post).await.map_err(map_community_error)?;

        let recipients = self
            .posts
            .recent_authors(&post.community_id(), &post.author_id(), COMMUNITY_FANOUT)
            .await
            .map_err(map_community_error)?;
        info!(
            post_id = %post.id(),
            community_id = %post.community_id(),
            notified = recipients.len(),
            "community post stored"
        );
        for recipient in recipients {
            self.notify(DomainEvent::CommunityPost {
                recipient,
                community_id: post.community_id(),
            })
            .await;
        }
        Ok(post)
    }
}

fn invalid_content(error: &EngagementValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({ "field": "content" }))
}

fn map_community_error(error: CommunityPostRepositoryError) -> Error {
    match error {
        CommunityPostRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("community store unavailable: {message}"))
        }
        CommunityPostRepositoryError::Query { message } => {
            Error::internal(format!("community store error: {message}"))
        }
    }
}

#[cfg(test)]
#[path = "engagement_service_tests.rs"]
mod tests;
