//! Shared domain enumerations.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Fixed set of blog categories, ordered by declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostCategory {
    Engineering,
    Releases,
    NewsAndEvents,
}

impl PostCategory {
    /// Every category in declaration order.
    pub const ALL: [PostCategory; 3] = [
        PostCategory::Engineering,
        PostCategory::Releases,
        PostCategory::NewsAndEvents,
    ];

    pub fn values() -> &'static [PostCategory] {
        &Self::ALL
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PostCategory::Engineering => "Engineering",
            PostCategory::Releases => "Releases",
            PostCategory::NewsAndEvents => "News and Events",
        }
    }

    /// Path segment used by `/blog/category/{key}`.
    pub fn url_key(self) -> &'static str {
        match self {
            PostCategory::Engineering => "engineering",
            PostCategory::Releases => "releases",
            PostCategory::NewsAndEvents => "news-and-events",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PostCategory::Engineering => "ENGINEERING",
            PostCategory::Releases => "RELEASES",
            PostCategory::NewsAndEvents => "NEWS_AND_EVENTS",
        }
    }
}

impl fmt::Display for PostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for PostCategory {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        PostCategory::ALL
            .into_iter()
            .find(|category| {
                category.url_key().eq_ignore_ascii_case(trimmed)
                    || category.as_str().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| DomainError::unknown_category(trimmed))
    }
}
