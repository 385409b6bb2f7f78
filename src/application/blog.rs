//! Blog listing controller.
//!
//! Each operation fills a [`BlogModel`] from the posts repository and names the
//! [`BlogView`] that should render it. View resolution happens in the
//! presentation layer.

use std::{fmt, sync::Arc};

use thiserror::Error;
use tracing::debug;

use crate::application::pagination::{BlogPostsPageRequest, PaginationError, PaginationInfo};
use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::entities::PostRecord;
use crate::domain::types::PostCategory;

/// Counter bumped whenever the all-posts listing comes back empty.
pub const POSTS_NOT_FOUND_TOTAL: &str = "blogsite_posts_not_found_total";

/// Symbolic view names resolved by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlogView {
    Index,
    Show,
    Atom,
}

impl BlogView {
    pub fn as_str(self) -> &'static str {
        match self {
            BlogView::Index => "blog/index",
            BlogView::Show => "blog/show",
            BlogView::Atom => "blog/atom",
        }
    }
}

impl fmt::Display for BlogView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values handed to the view. Populated per request; absent keys stay `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogModel {
    pub posts: Option<Vec<PostRecord>>,
    pub categories: Option<Vec<PostCategory>>,
    pub pagination_info: Option<PaginationInfo>,
    pub post: Option<PostRecord>,
    pub category: Option<PostCategory>,
}

#[derive(Debug, Error)]
pub enum BlogError {
    #[error("no blog posts found")]
    PostsNotFound,
    #[error("blog post {id} not found")]
    PostNotFound { id: i64 },
    #[error("invalid page number {page}")]
    InvalidPage { page: u32 },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<PaginationError> for BlogError {
    fn from(error: PaginationError) -> Self {
        match error {
            PaginationError::PageOutOfRange { page } => BlogError::InvalidPage { page },
        }
    }
}

#[derive(Clone)]
pub struct BlogController {
    posts: Arc<dyn PostsRepo>,
}

impl BlogController {
    pub fn new(posts: Arc<dyn PostsRepo>) -> Self {
        Self { posts }
    }

    /// All published posts, newest first. An empty listing is an error.
    pub async fn list_posts(
        &self,
        model: &mut BlogModel,
        page: u32,
    ) -> Result<BlogView, BlogError> {
        let request = BlogPostsPageRequest::for_page(page)?;
        let results = self.posts.published_posts(request).await?;

        if results.is_empty() {
            metrics::counter!(POSTS_NOT_FOUND_TOTAL).increment(1);
            debug!(target = "blogsite::blog", page, "published post listing is empty");
            return Err(BlogError::PostsNotFound);
        }

        let (posts, pagination) = results.into_parts();
        model.posts = Some(posts);
        model.categories = Some(PostCategory::ALL.to_vec());
        model.pagination_info = Some(pagination);
        Ok(BlogView::Index)
    }

    pub async fn list_broadcasts(
        &self,
        model: &mut BlogModel,
        page: u32,
    ) -> Result<BlogView, BlogError> {
        let request = BlogPostsPageRequest::for_page(page)?;
        let (posts, pagination) = self
            .posts
            .published_broadcast_posts(request)
            .await?
            .into_parts();

        model.posts = Some(posts);
        model.pagination_info = Some(pagination);
        Ok(BlogView::Index)
    }

    pub async fn list_posts_for_category(
        &self,
        category: PostCategory,
        model: &mut BlogModel,
        page: u32,
    ) -> Result<BlogView, BlogError> {
        let request = BlogPostsPageRequest::for_page(page)?;
        let (posts, pagination) = self
            .posts
            .published_posts_in_category(category, request)
            .await?
            .into_parts();

        model.posts = Some(posts);
        model.pagination_info = Some(pagination);
        model.category = Some(category);
        Ok(BlogView::Index)
    }

    /// Single post by id. `slug_or_title` plays no part in the lookup; the
    /// HTTP layer uses it to canonicalise URLs.
    pub async fn show_post(
        &self,
        id: i64,
        slug_or_title: &str,
        model: &mut BlogModel,
    ) -> Result<BlogView, BlogError> {
        let post = self
            .posts
            .published_post(id)
            .await?
            .ok_or(BlogError::PostNotFound { id })?;

        debug!(
            target = "blogsite::blog",
            id,
            requested_slug = slug_or_title,
            "resolved blog post"
        );
        model.post = Some(post);
        Ok(BlogView::Show)
    }

    pub async fn atom_feed(&self, model: &mut BlogModel) -> Result<BlogView, BlogError> {
        let (posts, _) = self
            .posts
            .published_posts(BlogPostsPageRequest::first())
            .await?
            .into_parts();

        model.posts = Some(posts);
        Ok(BlogView::Atom)
    }
}
