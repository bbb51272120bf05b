//! PostgreSQL-backed `ChatMessageRepository` using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Uuid as SqlUuid};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ChatMessageRepository, ChatMessageRepositoryError};
use crate::domain::{ChatMessage, PageLimit, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::ChatMessageRow;
use super::pool::{DbPool, PoolError};
use super::schema::chat_messages;

/// Diesel-backed implementation of the chat message store.
#[derive(Clone)]
pub struct DieselChatMessageRepository {
    pool: DbPool,
}

impl DieselChatMessageRepository {
    /// Create a new repository with the given connection pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Newest message per peer, then the threads themselves newest first.
///
/// `$1` is the user, `$2` the thread limit. The inner scan is served by the
/// sender and receiver indexes.
const LATEST_PER_PEER_SQL: &str = r#"
SELECT id, sender_id, receiver_id, content, created_at
FROM (
    SELECT DISTINCT ON (peer_id) id, sender_id, receiver_id, content, created_at
    FROM (
        SELECT *,
               CASE WHEN sender_id = $1 THEN receiver_id ELSE sender_id END AS peer_id
        FROM chat_messages
        WHERE sender_id = $1 OR receiver_id = $1
    ) AS mine
    ORDER BY peer_id, created_at DESC, id DESC
) AS latest
ORDER BY created_at DESC, id DESC
LIMIT $2
"#;

fn map_row(row: ChatMessageRow) -> Result<ChatMessage, ChatMessageRepositoryError> {
    ChatMessage::try_from(row).map_err(|err| ChatMessageRepositoryError::query(err.to_string()))
}

fn map_pool_error(error: PoolError) -> ChatMessageRepositoryError {
    map_basic_pool_error(error, |message| {
        ChatMessageRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: diesel::result::Error) -> ChatMessageRepositoryError {
    map_basic_diesel_error(
        error,
        ChatMessageRepositoryError::query,
        ChatMessageRepositoryError::connection,
    )
}

#[async_trait]
impl ChatMessageRepository for DieselChatMessageRepository {
    async fn append(&self, message: &ChatMessage) -> Result<(), ChatMessageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(chat_messages::table)
            .values(ChatMessageRow::from(message))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn conversation(
        &self,
        user_a: &UserId,
        user_b: &UserId,
        limit: PageLimit,
    ) -> Result<Vec<ChatMessage>, ChatMessageRepositoryError> {
        let a = *user_a.as_uuid();
        let b = *user_b.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Newest rows first so the limit keeps the tail of the conversation.
        let mut rows: Vec<ChatMessageRow> = chat_messages::table
            .filter(
                chat_messages::sender_id
                    .eq(a)
                    .and(chat_messages::receiver_id.eq(b))
                    .or(chat_messages::sender_id.eq(b).and(chat_messages::receiver_id.eq(a))),
            )
            .order((chat_messages::created_at.desc(), chat_messages::id.desc()))
            .limit(i64::try_from(limit.get()).unwrap_or(i64::MAX))
            .select(ChatMessageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.reverse();

        rows.into_iter().map(map_row).collect()
    }

    async fn latest_per_peer(
        &self,
        user_id: &UserId,
        limit: PageLimit,
    ) -> Result<Vec<ChatMessage>, ChatMessageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ChatMessageRow> = sql_query(LATEST_PER_PEER_SQL)
            .bind::<SqlUuid, _>(*user_id.as_uuid())
            .bind::<BigInt, _>(i64::try_from(limit.get()).unwrap_or(i64::MAX))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(map_row).collect()
    }
}
