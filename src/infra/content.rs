//! Loads blog posts from a TOML content file.
//!
//! ```toml
//! [[posts]]
//! id = 1
//! title = "Hello"
//! category = "engineering"
//! author = "jdoe"
//! publish_at = "2013-01-01T10:00:00Z"
//! content = """
//! Intro paragraph.
//!
//! <!--more-->
//!
//! The rest.
//! """
//! ```

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::info;

use crate::application::render::MarkdownRenderer;
use crate::domain::{entities::PostRecord, types::PostCategory};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read `{path}`")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse `{path}`")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("post {id} is invalid: {reason}")]
    InvalidPost { id: i64, reason: String },
    #[error("post id {id} appears more than once")]
    DuplicateId { id: i64 },
}

impl ContentError {
    fn invalid(id: i64, reason: impl Into<String>) -> Self {
        Self::InvalidPost {
            id,
            reason: reason.into(),
        }
    }
}


#[derive(Debug, Deserialize)]
struct ContentFile {
    #[serde(default)]
    posts: Vec<RawPost>,
}

#[derive(Debug, Deserialize)]
struct RawPost {
    id: i64,
    title: String,
    category: String,
    author: String,
    #[serde(default)]
    broadcast: bool,
    #[serde(default)]
    draft: bool,
    created_at: Option<String>,
    publish_at: Option<String>,
    content: String,
}

/// Read and render every post in `path`.
pub async fn load_posts(path: &Path) -> Result<Vec<PostRecord>, ContentError> {
    let source = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let posts = parse_posts(&source, path)?;
    info!(
        target = "blogsite::content",
        path = %path.display(),
        count = posts.len(),
        "loaded blog content"
    );
    Ok(posts)
}

/// Parse posts from TOML text. `origin` is only used in error messages.
pub fn parse_posts(source: &str, origin: &Path) -> Result<Vec<PostRecord>, ContentError> {
    let file: ContentFile = toml::from_str(source).map_err(|source| ContentError::Parse {
        path: origin.to_path_buf(),
        source,
    })?;

    let renderer = MarkdownRenderer::new();
    let mut seen = HashSet::with_capacity(file.posts.len());
    let mut posts = Vec::with_capacity(file.posts.len());

    for raw in file.posts {
        if !seen.insert(raw.id) {
            return Err(ContentError::DuplicateId { id: raw.id });
        }
        posts.push(build_post(raw, &renderer)?);
    }

    Ok(posts)
}

fn build_post(raw: RawPost, renderer: &MarkdownRenderer) -> Result<PostRecord, ContentError> {
    let id = raw.id;
    if id <= 0 {
        return Err(ContentError::invalid(id, "id must be positive"));
    }

    let title = raw.title.trim();
    if title.is_empty() {
        return Err(ContentError::invalid(id, "title must not be empty"));
    }

    let author = raw.author.trim();
    if author.is_empty() {
        return Err(ContentError::invalid(id, "author must not be empty"));
    }

    let category: PostCategory = raw
        .category
        .parse()
        .map_err(|err| ContentError::invalid(id, format!("{err}")))?;

    let publish_at = raw
        .publish_at
        .as_deref()
        .map(|value| parse_instant(id, "publish_at", value))
        .transpose()?;
    let created_at = match raw.created_at.as_deref() {
        Some(value) => parse_instant(id, "created_at", value)?,
        None => publish_at.ok_or_else(|| {
            ContentError::invalid(id, "either created_at or publish_at is required")
        })?,
    };

    let rendered = renderer.render_post(&raw.content);

    Ok(PostRecord {
        id,
        title: title.to_string(),
        category,
        author: author.to_string(),
        rendered_content: rendered.content_html,
        rendered_summary: rendered.summary_html,
        broadcast: raw.broadcast,
        draft: raw.draft,
        created_at,
        publish_at,
    })
}

fn parse_instant(id: i64, field: &str, value: &str) -> Result<OffsetDateTime, ContentError> {
    OffsetDateTime::parse(value.trim(), &Rfc3339)
        .map_err(|err| ContentError::invalid(id, format!("{field} `{value}`: {err}")))
}

/// Publication state of a loaded content file at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentSummary {
    pub published: usize,
    pub scheduled: usize,
    pub drafts: usize,
    pub broadcasts: usize,
}

impl ContentSummary {
    pub fn at(posts: &[PostRecord], now: OffsetDateTime) -> Self {
        posts.iter().fold(Self::default(), |mut summary, post| {
            if post.draft {
                summary.drafts += 1;
            } else if post.is_published_at(now) {
                summary.published += 1;
                if post.broadcast {
                    summary.broadcasts += 1;
                }
            } else if post.is_scheduled_at(now) {
                summary.scheduled += 1;
            }
            summary
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::error::InfraError;
    use std::{error::Error as StdError, io::Write};
    use time::macros::datetime;

    const SAMPLE: &str = r#"
[[posts]]
id = 1
title = "Reactor 1.0 GA"
category = "RELEASES"
author = "smaldini"
broadcast = true
publish_at = "2013-05-01T09:00:00Z"
content = """
Reactor is **generally available**.

<!--more-->

Details follow.
"""

[[posts]]
id = 2
title = "Draft notes"
category = "engineering"
author = "jdoe"
draft = true
created_at = "2013-06-01T09:00:00Z"
content = "Work in progress"

[[posts]]
id = 3
title = "Upcoming meetup"
category = "news-and-events"
author = "events"
publish_at = "2099-01-01T00:00:00Z"
content = "See you there"
"#;

    #[test]
    fn parses_and_renders_posts() {
        let posts = parse_posts(SAMPLE, Path::new("inline.toml")).expect("valid content");
        assert_eq!(posts.len(), 3);

        let release = &posts[0];
        assert_eq!(release.category, PostCategory::Releases);
        assert!(release.broadcast);
        assert_eq!(release.created_at, datetime!(2013-05-01 09:00 UTC));
        assert_eq!(
            release.rendered_summary.trim(),
            "<p>Reactor is <strong>generally available</strong>.</p>"
        );
        assert!(release.rendered_content.contains("Details follow."));

        assert_eq!(posts[2].category, PostCategory::NewsAndEvents);
        assert_eq!(posts[1].publish_at, None);
    }

    #[test]
    fn summary_counts_publication_states() {
        let posts = parse_posts(SAMPLE, Path::new("inline.toml")).expect("valid content");
        let summary = ContentSummary::at(&posts, datetime!(2014-01-01 00:00 UTC));
        assert_eq!(
            summary,
            ContentSummary {
                published: 1,
                scheduled: 1,
                drafts: 1,
                broadcasts: 1,
            }
        );
    }

    #[test]
    fn rejects_duplicate_ids() {
        let source = r#"
[[posts]]
id = 7
title = "One"
category = "engineering"
author = "a"
publish_at = "2013-01-01T00:00:00Z"
content = "x"

[[posts]]
id = 7
title = "Two"
category = "engineering"
author = "a"
publish_at = "2013-01-01T00:00:00Z"
content = "y"
"#;
        let err = parse_posts(source, Path::new("dup.toml")).expect_err("duplicate id");
        assert!(matches!(err, ContentError::DuplicateId { id: 7 }));
    }

    #[test]
    fn rejects_unknown_category() {
        let source = r#"
[[posts]]
id = 4
title = "Gardening"
category = "gardening"
author = "a"
publish_at = "2013-01-01T00:00:00Z"
content = "x"
"#;
        let err = parse_posts(source, Path::new("bad.toml")).expect_err("unknown category");
        assert!(matches!(err, ContentError::InvalidPost { id: 4, .. }));
    }

    #[test]
    fn requires_some_timestamp() {
        let source = r#"
[[posts]]
id = 5
title = "Undated"
category = "engineering"
author = "a"
content = "x"
"#;
        let err = parse_posts(source, Path::new("undated.toml")).expect_err("no timestamp");
        assert!(matches!(err, ContentError::InvalidPost { id: 5, .. }));
    }

    #[test]
    fn malformed_toml_reports_origin() {
        let err = parse_posts("[[posts]\nid =", Path::new("broken.toml")).expect_err("bad toml");
        assert_eq!(err.to_string(), "failed to parse `broken.toml`");
    }

    #[tokio::test]
    async fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(SAMPLE.as_bytes()).expect("write sample");

        let posts = load_posts(file.path()).await.expect("load posts");
        assert_eq!(posts.len(), 3);
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = load_posts(&dir.path().join("absent.toml"))
            .await
            .expect_err("missing file");
        assert!(matches!(err, ContentError::Read { .. }));

        let infra = InfraError::from(err);
        let read = StdError::source(&infra).expect("content error as source");
        assert!(read.to_string().starts_with("failed to read"));
        let io = read.source().expect("io error as source");
        assert!(io.downcast_ref::<std::io::Error>().is_some());
    }
}
