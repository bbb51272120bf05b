//! Driven port for community board posts.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{CommunityId, CommunityPost, UserId};

define_port_error! {
    /// Errors raised when persisting community posts.
    pub enum CommunityPostRepositoryError {
        Connection { message: String } => "community store connection failed: {message}",
        Query { message: String } => "community store query failed: {message}",
    }
}

/// Community post persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommunityPostRepository: Send + Sync {
    /// Store a post.
    async fn append(&self, post: &CommunityPost) -> Result<(), CommunityPostRepositoryError>;

    /// Distinct authors of the most recent posts in `community_id`, most
    /// recent first, leaving out `exclude` and stopping at `limit` authors.
    async fn recent_authors(
        &self,
        community_id: &CommunityId,
        exclude: &UserId,
        limit: usize,
    ) -> Result<Vec<UserId>, CommunityPostRepositoryError>;
}
