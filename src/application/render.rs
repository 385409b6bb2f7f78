//! Markdown to sanitized HTML for post bodies and summaries.

use ammonia::Builder as AmmoniaBuilder;
use comrak::{markdown_to_html, options::Options};

use crate::domain::posts::summary_source;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPost {
    pub content_html: String,
    pub summary_html: String,
}

pub struct MarkdownRenderer {
    options: Options<'static>,
    sanitizer: AmmoniaBuilder<'static>,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self {
            options: default_options(),
            sanitizer: AmmoniaBuilder::default(),
        }
    }

    pub fn render(&self, markdown: &str) -> String {
        let html = markdown_to_html(markdown, &self.options);
        self.sanitizer.clean(&html).to_string()
    }

    pub fn render_post(&self, raw: &str) -> RenderedPost {
        RenderedPost {
            content_html: self.render(raw),
            summary_html: self.render(summary_source(raw)),
        }
    }
}

fn default_options() -> Options<'static> {
    let mut options = Options::default();

    let ext = &mut options.extension;
    ext.strikethrough = true;
    ext.table = true;
    ext.autolink = true;
    ext.tasklist = true;
    ext.footnotes = true;

    let render = &mut options.render;
    render.github_pre_lang = true;
    // Raw HTML passes through comrak; ammonia decides what survives.
    render.r#unsafe = true;

    options
}
