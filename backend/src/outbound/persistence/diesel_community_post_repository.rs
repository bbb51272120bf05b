//! PostgreSQL-backed `CommunityPostRepository` using Diesel.

use async_trait::async_trait;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Uuid as SqlUuid};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{CommunityPostRepository, CommunityPostRepositoryError};
use crate::domain::{CommunityId, CommunityPost, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::CommunityPostRow;
use super::pool::{DbPool, PoolError};
use super::schema::community_posts;

/// Diesel-backed implementation of the community post store.
#[derive(Clone)]
pub struct DieselCommunityPostRepository {
    pool: DbPool,
}

impl DieselCommunityPostRepository {
    /// Create a new repository with the given connection pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Distinct authors ordered by their latest post.
///
/// `$1` is the community, `$2` the excluded author, `$3` the author limit.
const RECENT_AUTHORS_SQL: &str = r#"
SELECT author_id
FROM community_posts
WHERE community_id = $1 AND author_id <> $2
GROUP BY author_id
ORDER BY MAX(created_at) DESC
LIMIT $3
"#;

#[derive(diesel::QueryableByName)]
struct AuthorRow {
    #[diesel(sql_type = SqlUuid)]
    author_id: Uuid,
}

fn map_pool_error(error: PoolError) -> CommunityPostRepositoryError {
    map_basic_pool_error(error, |message| {
        CommunityPostRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: diesel::result::Error) -> CommunityPostRepositoryError {
    map_basic_diesel_error(
        error,
        CommunityPostRepositoryError::query,
        CommunityPostRepositoryError::connection,
    )
}

#[async_trait]
impl CommunityPostRepository for DieselCommunityPostRepository {
    async fn append(&self, post: &CommunityPost) -> Result<(), CommunityPostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(community_posts::table)
            .values(CommunityPostRow::from(post))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn recent_authors(
        &self,
        community_id: &CommunityId,
        exclude: &UserId,
        limit: usize,
    ) -> Result<Vec<UserId>, CommunityPostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AuthorRow> = sql_query(RECENT_AUTHORS_SQL)
            .bind::<SqlUuid, _>(*community_id.as_uuid())
            .bind::<SqlUuid, _>(*exclude.as_uuid())
            .bind::<BigInt, _>(i64::try_from(limit).unwrap_or(i64::MAX))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(|row| UserId::from(row.author_id)).collect())
    }
}
