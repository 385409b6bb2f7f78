//! In-memory [`PostsRepo`] over a fixed set of posts.

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::application::pagination::{BlogPostsPageRequest, PaginationInfo, ResultList};
use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::{entities::PostRecord, types::PostCategory};

pub type Clock = fn() -> OffsetDateTime;

pub struct InMemoryPostsRepo {
    /// Newest first.
    posts: Vec<PostRecord>,
    clock: Clock,
}

impl InMemoryPostsRepo {
    pub fn new(posts: Vec<PostRecord>) -> Self {
        Self::with_clock(posts, OffsetDateTime::now_utc)
    }

    pub fn with_clock(mut posts: Vec<PostRecord>, clock: Clock) -> Self {
        posts.sort_by(|a, b| {
            b.sort_key()
                .cmp(&a.sort_key())
                .then_with(|| b.id.cmp(&a.id))
        });
        Self { posts, clock }
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    fn page_where<F>(&self, page: BlogPostsPageRequest, filter: F) -> ResultList<PostRecord>
    where
        F: Fn(&PostRecord) -> bool,
    {
        let now = (self.clock)();
        let matching = self
            .posts
            .iter()
            .filter(|post| post.is_published_at(now) && filter(post))
            .collect::<Vec<_>>();

        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(page.size()).unwrap_or(usize::MAX);

        let items = matching
            .into_iter()
            .skip(offset)
            .take(size)
            .cloned()
            .collect();

        ResultList::new(items, PaginationInfo::new(&page, total))
    }
}

#[async_trait]
impl PostsRepo for InMemoryPostsRepo {
    async fn published_posts(
        &self,
        page: BlogPostsPageRequest,
    ) -> Result<ResultList<PostRecord>, RepoError> {
        Ok(self.page_where(page, |_| true))
    }

    async fn published_posts_in_category(
        &self,
        category: PostCategory,
        page: BlogPostsPageRequest,
    ) -> Result<ResultList<PostRecord>, RepoError> {
        Ok(self.page_where(page, |post| post.category == category))
    }

    async fn published_broadcast_posts(
        &self,
        page: BlogPostsPageRequest,
    ) -> Result<ResultList<PostRecord>, RepoError> {
        Ok(self.page_where(page, |post| post.broadcast))
    }

    async fn published_post(&self, id: i64) -> Result<Option<PostRecord>, RepoError> {
        let now = (self.clock)();
        Ok(self
            .posts
            .iter()
            .find(|post| post.id == id && post.is_published_at(now))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::pagination::PAGE_SIZE;
    use time::{Duration, macros::datetime};

    fn fixed_now() -> OffsetDateTime {
        datetime!(2013-06-01 12:00 UTC)
    }

    fn post(id: i64, category: PostCategory, publish_at: Option<OffsetDateTime>) -> PostRecord {
        PostRecord {
            id,
            title: format!("Post {id}"),
            category,
            author: "author".to_string(),
            rendered_content: String::new(),
            rendered_summary: String::new(),
            broadcast: false,
            draft: false,
            created_at: datetime!(2013-01-01 00:00 UTC),
            publish_at,
        }
    }

    fn dated(id: i64, days: i64) -> PostRecord {
        post(
            id,
            PostCategory::Engineering,
            Some(datetime!(2013-01-01 00:00 UTC) + Duration::days(days)),
        )
    }

    #[tokio::test]
    async fn lists_published_posts_newest_first() {
        let repo =
            InMemoryPostsRepo::with_clock(vec![dated(1, 1), dated(2, 3), dated(3, 2)], fixed_now);

        let result = repo
            .published_posts(BlogPostsPageRequest::first())
            .await
            .expect("listing");
        let ids = result.items().iter().map(|post| post.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(result.pagination().total_items(), 3);
    }

    #[tokio::test]
    async fn hides_drafts_unscheduled_and_future_posts() {
        let mut draft = dated(1, 1);
        draft.draft = true;
        let unscheduled = post(2, PostCategory::Engineering, None);
        let future = post(
            3,
            PostCategory::Engineering,
            Some(datetime!(2014-01-01 00:00 UTC)),
        );
        let visible = dated(4, 1);

        let repo =
            InMemoryPostsRepo::with_clock(vec![draft, unscheduled, future, visible], fixed_now);

        let result = repo
            .published_posts(BlogPostsPageRequest::first())
            .await
            .expect("listing");
        assert_eq!(result.items().len(), 1);
        assert_eq!(result.items()[0].id, 4);
        assert_eq!(repo.published_post(3).await.expect("lookup"), None);
        assert_eq!(repo.published_post(1).await.expect("lookup"), None);
    }

    #[tokio::test]
    async fn second_page_starts_after_page_size() {
        let posts = (1..=25).map(|id| dated(id, id)).collect::<Vec<_>>();
        let repo = InMemoryPostsRepo::with_clock(posts, fixed_now);

        let result = repo
            .published_posts(BlogPostsPageRequest::new(1))
            .await
            .expect("listing");
        assert_eq!(result.items().len(), PAGE_SIZE as usize);
        assert_eq!(result.items()[0].id, 15);
        assert_eq!(result.pagination().current_page(), 2);
        assert_eq!(result.pagination().total_pages(), 3);

        let beyond = repo
            .published_posts(BlogPostsPageRequest::new(5))
            .await
            .expect("listing");
        assert!(beyond.is_empty());
        assert_eq!(beyond.pagination().total_items(), 25);
    }

    #[tokio::test]
    async fn filters_by_category_and_broadcast() {
        let mut broadcast = dated(1, 1);
        broadcast.broadcast = true;
        let release = post(
            2,
            PostCategory::Releases,
            Some(datetime!(2013-02-01 00:00 UTC)),
        );

        let repo = InMemoryPostsRepo::with_clock(vec![broadcast, release], fixed_now);

        let releases = repo
            .published_posts_in_category(PostCategory::Releases, BlogPostsPageRequest::first())
            .await
            .expect("category listing");
        assert_eq!(releases.items().len(), 1);
        assert_eq!(releases.items()[0].id, 2);

        let broadcasts = repo
            .published_broadcast_posts(BlogPostsPageRequest::first())
            .await
            .expect("broadcast listing");
        assert_eq!(broadcasts.items().len(), 1);
        assert_eq!(broadcasts.items()[0].id, 1);

        let events = repo
            .published_posts_in_category(
                PostCategory::NewsAndEvents,
                BlogPostsPageRequest::first(),
            )
            .await
            .expect("empty listing");
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn finds_single_published_post() {
        let repo = InMemoryPostsRepo::with_clock(vec![dated(9, 1)], fixed_now);
        let found = repo.published_post(9).await.expect("lookup");
        assert_eq!(found.map(|post| post.id), Some(9));
        assert_eq!(repo.published_post(10).await.expect("lookup"), None);
    }
}
