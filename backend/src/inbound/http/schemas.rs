//! Response bodies shared by the HTTP and WebSocket adapters.
//!
//! Domain entities carry no serde or OpenAPI derives; these DTOs fix the
//! camelCase wire shape and register it with utoipa.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    ChatMessage, ChatThread, CommunityPost, Item, Notification, TransactionDetail,
};

/// Item as seen from a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    /// Item identifier.
    pub id: Uuid,
    /// Owning seller.
    pub seller_id: Uuid,
    /// Listing title.
    #[schema(example = "Vintage film camera")]
    pub title: String,
    /// Current asking price in minor currency units.
    #[schema(example = 12500)]
    pub price_minor: i64,
    /// Availability flag.
    #[schema(example = "SOLD_OR_IN_PROGRESS")]
    pub status: &'static str,
}

impl From<&Item> for ItemSummary {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id().into(),
            seller_id: item.seller_id().into(),
            title: item.title().to_owned(),
            price_minor: item.price().minor_units(),
            status: item.status().as_str(),
        }
    }
}

/// A transaction together with its item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    /// Transaction identifier.
    pub transaction_id: Uuid,
    /// Purchasing user.
    pub buyer_id: Uuid,
    /// Selling user.
    pub seller_id: Uuid,
    /// Price captured at purchase.
    #[schema(example = 12500)]
    pub price_snapshot_minor: i64,
    /// Lifecycle status.
    #[schema(example = "PURCHASED")]
    pub status: &'static str,
    /// Opaque reference from the payment collaborator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,
    /// Purchase time.
    pub created_at: DateTime<Utc>,
    /// Purchased item.
    pub item: ItemSummary,
}

impl From<&TransactionDetail> for TransactionResponse {
    fn from(detail: &TransactionDetail) -> Self {
        let tx = &detail.transaction;
        Self {
            transaction_id: tx.id().into(),
            buyer_id: tx.buyer_id().into(),
            seller_id: tx.seller_id().into(),
            price_snapshot_minor: tx.price_snapshot().minor_units(),
            status: tx.status().as_str(),
            payment_reference: tx.payment_reference().map(str::to_owned),
            created_at: tx.created_at(),
            item: ItemSummary::from(&detail.item),
        }
    }
}

/// Stored notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    /// Notification identifier.
    pub id: Uuid,
    /// Kind tag.
    #[schema(example = "SHIPPED")]
    pub kind: &'static str,
    /// Human-readable content.
    pub content: String,
    /// Entity the notification refers to.
    pub related_id: Uuid,
    /// Whether the recipient has read it.
    pub is_read: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<&Notification> for NotificationResponse {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id().into(),
            kind: notification.kind().as_str(),
            content: notification.content().to_owned(),
            related_id: notification.related_id(),
            is_read: notification.is_read(),
            created_at: notification.created_at(),
        }
    }
}

/// Stored chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageResponse {
    /// Message identifier.
    pub id: Uuid,
    /// Author.
    pub sender_id: Uuid,
    /// Addressee.
    pub receiver_id: Uuid,
    /// Message text.
    pub content: String,
    /// Send time.
    pub created_at: DateTime<Utc>,
}

impl From<&ChatMessage> for ChatMessageResponse {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id().into(),
            sender_id: message.sender_id().into(),
            receiver_id: message.receiver_id().into(),
            content: message.content().to_owned(),
            created_at: message.created_at(),
        }
    }
}

/// A conversation summarised by its latest message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatThreadResponse {
    /// The other participant.
    pub peer_id: Uuid,
    /// Most recent message in either direction.
    pub last_message: ChatMessageResponse,
}

impl From<&ChatThread> for ChatThreadResponse {
    fn from(thread: &ChatThread) -> Self {
        Self {
            peer_id: thread.peer_id.into(),
            last_message: ChatMessageResponse::from(&thread.last_message),
        }
    }
}

/// Stored community post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommunityPostResponse {
    /// Post identifier.
    pub id: Uuid,
    /// Community posted in.
    pub community_id: Uuid,
    /// Posting user.
    pub author_id: Uuid,
    /// Post text.
    pub content: String,
    /// Post time.
    pub created_at: DateTime<Utc>,
}

impl From<&CommunityPost> for CommunityPostResponse {
    fn from(post: &CommunityPost) -> Self {
        Self {
            id: post.id().into(),
            community_id: post.community_id().into(),
            author_id: post.author_id().into(),
            content: post.content().to_owned(),
            created_at: post.created_at(),
        }
    }
}
