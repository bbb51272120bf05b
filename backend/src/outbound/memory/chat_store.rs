//! In-process chat history.

use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::{ChatMessageRepository, ChatMessageRepositoryError};
use crate::domain::{ChatMessage, PageLimit, UserId};

/// Chat message repository backed by process memory.
#[derive(Default)]
pub struct InMemoryChatStore {
    rows: Mutex<Vec<ChatMessage>>,
}

impl InMemoryChatStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatMessageRepository for InMemoryChatStore {
    async fn append(&self, message: &ChatMessage) -> Result<(), ChatMessageRepositoryError> {
        self.rows.lock().await.push(message.clone());
        Ok(())
    }

    async fn conversation(
        &self,
        user_a: &UserId,
        user_b: &UserId,
        limit: PageLimit,
    ) -> Result<Vec<ChatMessage>, ChatMessageRepositoryError> {
        let rows = self.rows.lock().await;
        let mut thread: Vec<ChatMessage> = rows
            .iter()
            .filter(|message| message.is_between(user_a, user_b))
            .cloned()
            .collect();
        thread.sort_by_key(|message| (message.created_at(), message.id()));
        let skip = thread.len().saturating_sub(limit.get());
        Ok(thread.split_off(skip))
    }

    async fn latest_per_peer(
        &self,
        user_id: &UserId,
        limit: PageLimit,
    ) -> Result<Vec<ChatMessage>, ChatMessageRepositoryError> {
        let rows = self.rows.lock().await;
        let mut latest: HashMap<UserId, &ChatMessage> = HashMap::new();
        for message in rows.iter() {
            let Some(peer) = message.peer_of(user_id) else {
                continue;
            };
            latest
                .entry(peer)
                .and_modify(|current| {
                    if (message.created_at(), message.id()) > (current.created_at(), current.id()) {
                        *current = message;
                    }
                })
                .or_insert(message);
        }
        let mut threads: Vec<ChatMessage> = latest.into_values().cloned().collect();
        threads.sort_by_key(|message| Reverse((message.created_at(), message.id())));
        threads.truncate(limit.get());
        Ok(threads)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, Utc};

    use super::*;
    use crate::domain::{ChatMessageDraft, ChatMessageId};

    #[tokio::test]
    async fn latest_per_peer_keeps_one_message_per_conversation() {
        let store = InMemoryChatStore::new();
        let me = UserId::random();
        let seller = UserId::random();
        let buyer = UserId::random();
        let start = Utc::now();
        let exchanges = [
            (me, seller, "Is it still available?"),
            (buyer, me, "Would you take 40?"),
            (seller, me, "Yes, it is."),
            (buyer, seller, "Not my conversation"),
        ];
        for (offset, (sender, receiver, content)) in exchanges.into_iter().enumerate() {
            let message = ChatMessage::new(
                ChatMessageId::random(),
                ChatMessageDraft {
                    sender_id: sender,
                    receiver_id: receiver,
                    content: content.to_owned(),
                },
                start + TimeDelta::seconds(i64::try_from(offset).expect("small offset")),
            )
            .expect("valid message");
            store.append(&message).await.expect("append");
        }

        let latest = store
            .latest_per_peer(&me, PageLimit::default())
            .await
            .expect("threads");
        let newest_only = store
            .latest_per_peer(&me, PageLimit::clamped(Some(1)))
            .await
            .expect("threads");

        let contents: Vec<&str> = latest.iter().map(ChatMessage::content).collect();
        assert_eq!(contents, vec!["Yes, it is.", "Would you take 40?"]);
        assert_eq!(newest_only.len(), 1);
        assert_eq!(newest_only[0].content(), "Yes, it is.");
    }

    #[tokio::test]
    async fn conversation_keeps_the_latest_messages_oldest_first() {
        let store = InMemoryChatStore::new();
        let a = UserId::random();
        let b = UserId::random();
        let start = Utc::now();
        for (offset, (sender, receiver)) in [(a, b), (b, a), (a, b)].into_iter().enumerate() {
            let message = ChatMessage::new(
                ChatMessageId::random(),
                ChatMessageDraft {
                    sender_id: sender,
                    receiver_id: receiver,
                    content: format!("message {offset}"),
                },
                start + TimeDelta::seconds(i64::try_from(offset).expect("small offset")),
            )
            .expect("valid message");
            store.append(&message).await.expect("append");
        }

        let thread = store
            .conversation(&b, &a, PageLimit::clamped(Some(2)))
            .await
            .expect("conversation");

        let contents: Vec<&str> = thread.iter().map(ChatMessage::content).collect();
        assert_eq!(contents, vec!["message 1", "message 2"]);
    }
}
