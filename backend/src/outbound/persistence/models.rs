//! Row types mapping between Diesel tables and domain entities.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    ChatMessage, CommunityPost, Item, ItemDraft, Notification, Price, Review,
    Transaction, TransactionDraft,
};

use super::schema::{chat_messages, community_posts, items, notifications, reviews, transactions};

/// Conversion failure for a stored row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stored {table} row {id}: {message}")]
pub(crate) struct RowConversionError {
    table: &'static str,
    id: Uuid,
    message: String,
}

impl RowConversionError {
    fn new(table: &'static str, id: Uuid, message: impl ToString) -> Self {
        Self {
            table,
            id,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ItemRow {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub title: String,
    pub price_minor: i64,
    pub status: String,
}

impl TryFrom<ItemRow> for Item {
    type Error = RowConversionError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let price =
            Price::new(row.price_minor).map_err(|err| RowConversionError::new("items", id, err))?;
        let status = row
            .status
            .parse()
            .map_err(|err| RowConversionError::new("items", id, err))?;
        Self::new(ItemDraft {
            id: id.into(),
            seller_id: row.seller_id.into(),
            title: row.title,
            price,
            status,
        })
        .map_err(|err| RowConversionError::new("items", id, err))
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = transactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TransactionRow {
    pub id: Uuid,
    pub item_id: Uuid,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    pub price_snapshot_minor: i64,
    pub status: String,
    pub payment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = RowConversionError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let price_snapshot = Price::new(row.price_snapshot_minor)
            .map_err(|err| RowConversionError::new("transactions", row.id, err))?;
        let status = row
            .status
            .parse()
            .map_err(|err| RowConversionError::new("transactions", row.id, err))?;
        Ok(Self::new(TransactionDraft {
            id: row.id.into(),
            item_id: row.item_id.into(),
            buyer_id: row.buyer_id.into(),
            seller_id: row.seller_id.into(),
            price_snapshot,
            status,
            payment_reference: row.payment_reference,
            created_at: row.created_at,
        }))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = transactions)]
pub(crate) struct NewTransactionRow<'a> {
    pub id: Uuid,
    pub item_id: Uuid,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    pub price_snapshot_minor: i64,
    pub status: &'a str,
    pub payment_reference: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow<'a> {
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub rater_id: Uuid,
    pub rating: i16,
    pub comment: &'a str,
    pub role: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a Review> for NewReviewRow<'a> {
    fn from(review: &'a Review) -> Self {
        Self {
            id: review.id().into(),
            transaction_id: review.transaction_id().into(),
            rater_id: review.rater_id().into(),
            rating: i16::from(review.rating().value()),
            comment: review.comment(),
            role: review.role().as_str(),
            created_at: review.created_at(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub content: String,
    pub related_id: Uuid,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Notification> for NotificationRow {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id().into(),
            user_id: notification.recipient().into(),
            kind: notification.kind().as_str().to_owned(),
            content: notification.content().to_owned(),
            related_id: notification.related_id(),
            is_read: notification.is_read(),
            created_at: notification.created_at(),
        }
    }
}

impl TryFrom<NotificationRow> for Notification {
    type Error = RowConversionError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        let kind = row
            .kind
            .parse()
            .map_err(|err| RowConversionError::new("notifications", row.id, err))?;
        let notification = Self::record(
            row.id.into(),
            crate::domain::NotificationDraft {
                recipient: row.user_id.into(),
                kind,
                content: row.content,
                related_id: row.related_id,
            },
            row.created_at,
        );
        Ok(if row.is_read {
            notification.marked_read()
        } else {
            notification
        })
    }
}

#[derive(Debug, Clone, Queryable, QueryableByName, Selectable, Insertable)]
#[diesel(table_name = chat_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ChatMessageRow {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<&ChatMessage> for ChatMessageRow {
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

impl TryFrom<ChatMessageRow> for ChatMessage {
    type Error = RowConversionError;

    fn try_from(row: ChatMessageRow) -> Result<Self, Self::Error> {
        Self::new(
            row.id.into(),
            crate::domain::ChatMessageDraft {
                sender_id: row.sender_id.into(),
                receiver_id: row.receiver_id.into(),
                content: row.content,
            },
            row.created_at,
        )
        .map_err(|err| RowConversionError::new("chat_messages", row.id, err))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = community_posts)]
pub(crate) struct CommunityPostRow {
    pub id: Uuid,
    pub community_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<&CommunityPost> for CommunityPostRow {
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
