//! Closed set of domain events that produce notifications.
//!
//! Each variant carries exactly the fields its notification needs, so a
//! malformed event cannot be built. [`DomainEvent::into_draft`] renders the
//! event into the stored form.

use super::{CommunityId, ItemId, NotificationDraft, NotificationKind, UserId};

/// Something a user should hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    /// A buyer purchased the seller's item.
    ItemSold {
        /// Seller to notify.
        seller_id: UserId,
        /// Purchased item.
        item_id: ItemId,
        /// Item title at the time of the event.
        item_title: String,
    },
    /// The seller shipped the buyer's item.
    ItemShipped {
        /// Buyer to notify.
        buyer_id: UserId,
        /// Shipped item.
        item_id: ItemId,
        /// Item title at the time of the event.
        item_title: String,
    },
    /// The counterparty reviewed and closed the transaction.
    TransactionCompleted {
        /// Counterparty of the reviewer.
        recipient: UserId,
        /// Item the transaction concerned.
        item_id: ItemId,
        /// Item title at the time of the event.
        item_title: String,
    },
    /// The counterparty acknowledged receipt.
    TransactionReceived {
        /// Counterparty of the reviewer.
        recipient: UserId,
        /// Item the transaction concerned.
        item_id: ItemId,
        /// Item title at the time of the event.
        item_title: String,
    },
    /// A purchase was canceled and the item relisted.
    TransactionCanceled {
        /// Seller to notify.
        seller_id: UserId,
        /// Relisted item.
        item_id: ItemId,
        /// Item title at the time of the event.
        item_title: String,
    },
    /// Someone liked an item.
    ItemLiked {
        /// Seller to notify.
        seller_id: UserId,
        /// Liked item.
        item_id: ItemId,
        /// Item title at the time of the event.
        item_title: String,
    },
    /// Someone commented on an item.
    ItemCommented {
        /// Seller to notify.
        seller_id: UserId,
        /// Commented item.
        item_id: ItemId,
        /// Item title at the time of the event.
        item_title: String,
        /// Shortened comment text.
        excerpt: String,
    },
    /// Someone followed a user.
    UserFollowed {
        /// User being followed.
        followed_id: UserId,
        /// New follower.
        follower_id: UserId,
    },
    /// Activity in a community the recipient belongs to.
    CommunityPost {
        /// Member to notify.
        recipient: UserId,
        /// Community the post was made in.
        community_id: CommunityId,
    },
}

impl DomainEvent {
    /// User the event is addressed to.
    #[must_use]
    pub const fn recipient(&self) -> UserId {
        match self {
            Self::ItemSold { seller_id, .. }
            | Self::TransactionCanceled { seller_id, .. }
            | Self::ItemLiked { seller_id, .. }
            | Self::ItemCommented { seller_id, .. } => *seller_id,
            Self::ItemShipped { buyer_id, .. } => *buyer_id,
            Self::TransactionCompleted { recipient, .. }
            | Self::TransactionReceived { recipient, .. }
            | Self::CommunityPost { recipient, .. } => *recipient,
            Self::UserFollowed { followed_id, .. } => *followed_id,
        }
    }

    /// Notification tag for the event.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        match self {
            Self::ItemSold { .. } => NotificationKind::Sold,
            Self::ItemShipped { .. } => NotificationKind::Shipped,
            Self::TransactionCompleted { .. } => NotificationKind::Completed,
            Self::TransactionReceived { .. } => NotificationKind::Received,
            Self::TransactionCanceled { .. } => NotificationKind::Canceled,
            Self::ItemLiked { .. } => NotificationKind::Like,
            Self::ItemCommented { .. } => NotificationKind::Comment,
            Self::UserFollowed { .. } => NotificationKind::Follow,
            Self::CommunityPost { .. } => NotificationKind::Community,
        }
    }

    /// Render the event into a storable notification.
    #[must_use]
    pub fn into_draft(self) -> NotificationDraft {
        let recipient = self.recipient();
        let kind = self.kind();
        let (content, related_id) = match self {
            Self::ItemSold {
                item_id, item_title, ..
            } => (
                format!("Your item \"{item_title}\" was purchased. Please prepare it for shipping."),
                item_id.into(),
            ),
            Self::ItemShipped {
                item_id, item_title, ..
            } => (
                format!("\"{item_title}\" has been shipped."),
                item_id.into(),
            ),
            Self::TransactionCompleted {
                item_id, item_title, ..
            } => (
                format!("The transaction for \"{item_title}\" is complete."),
                item_id.into(),
            ),
            Self::TransactionReceived {
                item_id, item_title, ..
            } => (
                format!("Receipt of \"{item_title}\" was confirmed."),
                item_id.into(),
            ),
            Self::TransactionCanceled {
                item_id, item_title, ..
            } => (
                format!("The purchase of \"{item_title}\" was canceled and the item is on sale again."),
                item_id.into(),
            ),
            Self::ItemLiked {
                item_id, item_title, ..
            } => (
                format!("Someone liked your item \"{item_title}\"."),
                item_id.into(),
            ),
            Self::ItemCommented {
                item_id,
                item_title,
                excerpt,
                ..
            } => (
                format!("Someone commented on your item \"{item_title}\": {excerpt}"),
                item_id.into(),
            ),
            Self::UserFollowed { follower_id, .. } => (
                "You have a new follower.".to_owned(),
                follower_id.into(),
            ),
            Self::CommunityPost { community_id, .. } => (
                "There is a new post in a community you take part in.".to_owned(),
                community_id.into(),
            ),
        };
        NotificationDraft {
            recipient,
            kind,
            content,
            related_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn sold_events_address_the_seller_and_link_the_item() {
        let seller_id = UserId::random();
        let item_id = ItemId::random();
        let draft = DomainEvent::ItemSold {
            seller_id,
            item_id,
            item_title: "Desk lamp".to_owned(),
        }
        .into_draft();

        assert_eq!(draft.recipient, seller_id);
        assert_eq!(draft.kind, NotificationKind::Sold);
        assert_eq!(draft.related_id, *item_id.as_uuid());
        assert!(draft.content.contains("Desk lamp"));
    }

    #[test]
    fn follow_events_link_the_follower() {
        let followed_id = UserId::random();
        let follower_id = UserId::random();
        let draft = DomainEvent::UserFollowed {
            followed_id,
            follower_id,
        }
        .into_draft();

        assert_eq!(draft.recipient, followed_id);
        assert_eq!(draft.related_id, *follower_id.as_uuid());
    }

    #[test]
    fn comment_events_quote_the_excerpt() {
        let draft = DomainEvent::ItemCommented {
            seller_id: UserId::random(),
            item_id: ItemId::random(),
            item_title: "Desk lamp".to_owned(),
            excerpt: "Does it take LED bulbs?".to_owned(),
        }
        .into_draft();

        assert_eq!(draft.kind, NotificationKind::Comment);
        assert!(draft.content.ends_with("Does it take LED bulbs?"));
    }

    #[rstest]
    #[case::shipped(
        DomainEvent::ItemShipped { buyer_id: UserId::random(), item_id: ItemId::random(), item_title: "t".to_owned() },
        NotificationKind::Shipped
    )]
    #[case::completed(
        DomainEvent::TransactionCompleted { recipient: UserId::random(), item_id: ItemId::random(), item_title: "t".to_owned() },
        NotificationKind::Completed
    )]
    #[case::received(
        DomainEvent::TransactionReceived { recipient: UserId::random(), item_id: ItemId::random(), item_title: "t".to_owned() },
        NotificationKind::Received
    )]
    #[case::canceled(
        DomainEvent::TransactionCanceled { seller_id: UserId::random(), item_id: ItemId::random(), item_title: "t".to_owned() },
        NotificationKind::Canceled
    )]
    #[case::community(
        DomainEvent::CommunityPost { recipient: UserId::random(), community_id: CommunityId::random() },
        NotificationKind::Community
    )]
    fn drafts_carry_the_event_kind(#[case] event: DomainEvent, #[case] expected: NotificationKind) {
        let recipient = event.recipient();
        let draft = event.into_draft();
        assert_eq!(draft.kind, expected);
        assert_eq!(draft.recipient, recipient);
    }
}
