//! Tests for persist-then-push dispatch.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockChatMessageRepository, MockNotificationRepository};
use crate::domain::test_doubles::{RecordingChannel, SteppingClock};
use crate::domain::{ErrorCode, ItemId, NotificationKind};

type Dispatcher = NotificationDispatcher<MockNotificationRepository, MockChatMessageRepository>;

struct Harness {
    registry: Arc<ConnectionRegistry>,
    seller: UserId,
}

#[fixture]
fn harness() -> Harness {
    Harness {
        registry: Arc::new(ConnectionRegistry::new()),
        seller: UserId::random(),
    }
}

fn dispatcher(
    harness: &Harness,
    notifications: MockNotificationRepository,
    chat: MockChatMessageRepository,
) -> Dispatcher {
    NotificationDispatcher::new(
        Arc::new(notifications),
        Arc::new(chat),
        Arc::clone(&harness.registry),
        SteppingClock::shared(),
    )
}

fn storing_notifications(expected_recipient: UserId) -> MockNotificationRepository {
    let mut repo = MockNotificationRepository::new();
    repo.expect_append()
        .withf(move |notification| notification.recipient() == expected_recipient)
        .times(1)
        .returning(|_| Ok(()));
    repo
}

fn sold_event(seller_id: UserId) -> DomainEvent {
    DomainEvent::ItemSold {
        seller_id,
        item_id: ItemId::random(),
        item_title: "Road bike".to_owned(),
    }
}

#[rstest]
#[tokio::test]
async fn stores_the_notification_when_the_recipient_is_offline(harness: Harness) {
    let dispatcher = dispatcher(
        &harness,
        storing_notifications(harness.seller),
        MockChatMessageRepository::new(),
    );

    let receipt = dispatcher
        .dispatch(sold_event(harness.seller))
        .await
        .expect("dispatch succeeds");

    assert_eq!(receipt.delivery, Delivery::Offline);
    assert_eq!(receipt.record.kind(), NotificationKind::Sold);
    assert!(!receipt.record.is_read());
}

#[rstest]
#[tokio::test]
async fn pushes_to_a_connected_recipient(harness: Harness) {
    let channel = RecordingChannel::new();
    harness.registry.register(harness.seller, channel.clone());
    let dispatcher = dispatcher(
        &harness,
        storing_notifications(harness.seller),
        MockChatMessageRepository::new(),
    );

    let receipt = dispatcher
        .dispatch(sold_event(harness.seller))
        .await
        .expect("dispatch succeeds");

    assert_eq!(receipt.delivery, Delivery::Pushed);
    assert_eq!(
        channel.pushed(),
        vec![PushPayload::Notification(receipt.record)]
    );
}

#[rstest]
#[tokio::test]
async fn failed_push_closes_and_unregisters_the_connection(harness: Harness) {
    let channel = RecordingChannel::failing();
    harness.registry.register(harness.seller, channel.clone());
    let dispatcher = dispatcher(
        &harness,
        storing_notifications(harness.seller),
        MockChatMessageRepository::new(),
    );

    let receipt = dispatcher
        .dispatch(sold_event(harness.seller))
        .await
        .expect("stored notification survives a failed push");

    assert_eq!(receipt.delivery, Delivery::Dropped);
    assert_eq!(channel.close_reason(), Some(DisconnectReason::PushFailed));
    assert!(harness.registry.lookup(&harness.seller).is_none());
}

#[rstest]
#[tokio::test]
async fn store_failure_fails_the_dispatch_without_pushing(harness: Harness) {
    let channel = RecordingChannel::new();
    harness.registry.register(harness.seller, channel.clone());
    let mut notifications = MockNotificationRepository::new();
    notifications
        .expect_append()
        .times(1)
        .returning(|_| Err(NotificationRepositoryError::connection("refused")));
    let dispatcher = dispatcher(&harness, notifications, MockChatMessageRepository::new());

    let err = dispatcher
        .dispatch(sold_event(harness.seller))
        .await
        .expect_err("store failure surfaces");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    assert!(channel.pushed().is_empty());
}

#[rstest]
#[tokio::test]
async fn chat_messages_are_stored_then_pushed_to_the_receiver(harness: Harness) {
    let buyer = UserId::random();
    let channel = RecordingChannel::new();
    harness.registry.register(harness.seller, channel.clone());
    let mut chat = MockChatMessageRepository::new();
    chat.expect_append()
        .withf(|message| message.content() == "Is it still available?")
        .times(1)
        .returning(|_| Ok(()));
    let dispatcher = dispatcher(&harness, MockNotificationRepository::new(), chat);

    let receipt = dispatcher
        .dispatch_chat(ChatMessageDraft {
            sender_id: buyer,
            receiver_id: harness.seller,
            content: " Is it still available? ".to_owned(),
        })
        .await
        .expect("chat dispatch succeeds");

    assert_eq!(receipt.delivery, Delivery::Pushed);
    assert_eq!(channel.pushed(), vec![PushPayload::ChatMessage(receipt.record)]);
}

#[rstest]
#[tokio::test]
async fn invalid_chat_messages_are_rejected_before_storing(harness: Harness) {
    let mut chat = MockChatMessageRepository::new();
    chat.expect_append().times(0);
    let dispatcher = dispatcher(&harness, MockNotificationRepository::new(), chat);

    let err = dispatcher
        .dispatch_chat(ChatMessageDraft {
            sender_id: harness.seller,
            receiver_id: harness.seller,
            content: "note to self".to_owned(),
        })
        .await
        .expect_err("self-addressed message rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}
