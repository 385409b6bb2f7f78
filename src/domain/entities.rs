//! Domain entities handed out by the posts repository.

use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::{slug::public_slug, types::PostCategory};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub id: i64,
    pub title: String,
    pub category: PostCategory,
    pub author: String,
    pub rendered_content: String,
    pub rendered_summary: String,
    pub broadcast: bool,
    pub draft: bool,
    pub created_at: OffsetDateTime,
    pub publish_at: Option<OffsetDateTime>,
}

impl PostRecord {
    pub fn public_slug(&self) -> String {
        public_slug(self.id, &self.title)
    }

    /// Published posts are non-draft and have a publication instant at or before `now`.
    pub fn is_published_at(&self, now: OffsetDateTime) -> bool {
        !self.draft && self.publish_at.is_some_and(|publish_at| publish_at <= now)
    }

    pub fn is_scheduled_at(&self, now: OffsetDateTime) -> bool {
        !self.draft && self.publish_at.is_some_and(|publish_at| publish_at > now)
    }

    /// Instant used for ordering and display.
    pub fn sort_key(&self) -> OffsetDateTime {
        self.publish_at.unwrap_or(self.created_at)
    }
}
