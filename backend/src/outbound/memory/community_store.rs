//! In-process community posts.

use std::cmp::Reverse;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::{CommunityPostRepository, CommunityPostRepositoryError};
use crate::domain::{CommunityId, CommunityPost, UserId};

/// Community post repository backed by process memory.
#[derive(Default)]
pub struct InMemoryCommunityStore {
    rows: Mutex<Vec<CommunityPost>>,
}

impl InMemoryCommunityStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommunityPostRepository for InMemoryCommunityStore {
    async fn append(&self, post: &CommunityPost) -> Result<(), CommunityPostRepositoryError> {
        self.rows.lock().await.push(post.clone());
        Ok(())
    }

    async fn recent_authors(
        &self,
        community_id: &CommunityId,
        exclude: &UserId,
        limit: usize,
    ) -> Result<Vec<UserId>, CommunityPostRepositoryError> {
        let rows = self.rows.lock().await;
        let mut posts: Vec<&CommunityPost> = rows
            .iter()
            .filter(|post| post.community_id() == *community_id && post.author_id() != *exclude)
            .collect();
        posts.sort_by_key(|post| Reverse((post.created_at(), post.id())));

        let mut authors: Vec<UserId> = Vec::new();
        for post in posts {
            if authors.len() == limit {
                break;
            }
            if !authors.contains(&post.author_id()) {
                authors.push(post.author_id());
            }
        }
        Ok(authors)
    }
}
