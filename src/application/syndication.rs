//! Atom 1.0 rendering for the `blog/atom` view.

use std::sync::Arc;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::application::chrome::SiteProfile;
use crate::domain::entities::PostRecord;

#[derive(Debug, Error)]
pub enum SyndicationError {
    #[error("feed model is missing `posts`")]
    MissingPosts,
}

/// Renders a list of posts as an Atom document.
#[derive(Clone)]
pub struct AtomFeedView {
    profile: Arc<SiteProfile>,
}

impl AtomFeedView {
    pub fn new(profile: Arc<SiteProfile>) -> Self {
        Self { profile }
    }

    /// `generated_at` is only used as `<updated>` when there are no posts.
    pub fn render(
        &self,
        posts: Option<&[PostRecord]>,
        generated_at: OffsetDateTime,
    ) -> Result<String, SyndicationError> {
        let posts = posts.ok_or(SyndicationError::MissingPosts)?;
        let base = self.profile.base_url();

        let updated = posts
            .iter()
            .map(PostRecord::sort_key)
            .max()
            .unwrap_or(generated_at);

        let mut entries = String::new();
        for post in posts {
            let link = format!("{base}blog/{}", post.public_slug());
            let published = format_instant(post.sort_key());
            entries.push_str(&format!(
                concat!(
                    "  <entry>\n",
                    "    <title>{}</title>\n",
                    "    <link href=\"{}\"/>\n",
                    "    <id>{}</id>\n",
                    "    <published>{}</published>\n",
                    "    <updated>{}</updated>\n",
                    "    <author><name>{}</name></author>\n",
                    "    <category term=\"{}\" label=\"{}\"/>\n",
                    "    <summary type=\"html\">{}</summary>\n",
                    "  </entry>\n",
                ),
                xml_escape(&post.title),
                xml_escape(&link),
                xml_escape(&link),
                published,
                published,
                xml_escape(&post.author),
                post.category.url_key(),
                xml_escape(post.category.display_name()),
                xml_escape(&post.rendered_summary),
            ));
        }

        Ok(format!(
            concat!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
                "<feed xmlns=\"http://www.w3.org/2005/Atom\">\n",
                "  <title>{}</title>\n",
                "  <subtitle>{}</subtitle>\n",
                "  <id>{}</id>\n",
                "  <updated>{}</updated>\n",
                "  <link href=\"{}blog/atom.xml\" rel=\"self\"/>\n",
                "  <link href=\"{}blog\"/>\n",
                "{}",
                "</feed>\n",
            ),
            xml_escape(&self.profile.title),
            xml_escape(&self.profile.description),
            xml_escape(&base),
            format_instant(updated),
            xml_escape(&base),
            xml_escape(&base),
            entries
        ))
    }
}

fn format_instant(instant: OffsetDateTime) -> String {
    instant
        .format(&Rfc3339)
        .unwrap_or_else(|_| instant.to_string())
}

fn xml_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
