//! Repository traits describing the post source the blog reads from.

use async_trait::async_trait;
use thiserror::Error;

use crate::application::pagination::{BlogPostsPageRequest, ResultList};
use crate::domain::entities::PostRecord;
use crate::domain::types::PostCategory;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("timed out waiting for the post source")]
    Timeout,
}

/// Read access to published posts.
///
/// Every method only ever yields posts that are published at call time;
/// drafts and scheduled posts stay invisible.
#[async_trait]
pub trait PostsRepo: Send + Sync {
    async fn published_posts(
        &self,
        page: BlogPostsPageRequest,
    ) -> Result<ResultList<PostRecord>, RepoError>;

    async fn published_posts_in_category(
        &self,
        category: PostCategory,
        page: BlogPostsPageRequest,
    ) -> Result<ResultList<PostRecord>, RepoError>;

    async fn published_broadcast_posts(
        &self,
        page: BlogPostsPageRequest,
    ) -> Result<ResultList<PostRecord>, RepoError>;

    async fn published_post(&self, id: i64) -> Result<Option<PostRecord>, RepoError>;
}
