use std::sync::Arc;

use askama::{Error as AskamaError, Template};
use axum::{
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::application::blog::{BlogModel, BlogView};
use crate::application::chrome::SiteProfile;
use crate::application::error::{ErrorReport, HttpError};
use crate::application::pagination::PaginationInfo;
use crate::application::syndication::AtomFeedView;
use crate::domain::{entities::PostRecord, posts::format_human_date, types::PostCategory};

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(chrome: LayoutChrome) -> Response {
    let content = ErrorPageView::not_found();
    let view = LayoutContext::new(chrome, content);
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

pub fn xml_response(body: String) -> Response {
    (
        [(header::CONTENT_TYPE, "application/atom+xml; charset=utf-8")],
        body,
    )
        .into_response()
}

#[derive(Clone)]
pub struct NavigationView {
    pub entries: Vec<NavigationLinkView>,
}

#[derive(Clone)]
pub struct FooterView {
    pub copy: String,
}

#[derive(Clone)]
pub struct BrandView {
    pub title: String,
    pub href: String,
}

#[derive(Clone)]
pub struct NavigationLinkView {
    pub label: String,
    pub href: String,
}

#[derive(Clone)]
pub struct LayoutChrome {
    pub brand: BrandView,
    pub navigation: NavigationView,
    pub footer: FooterView,
    pub meta: PageMetaView,
}

impl LayoutChrome {
    pub fn with_canonical(self, canonical: String) -> Self {
        Self {
            meta: self.meta.with_canonical(canonical),
            ..self
        }
    }

    pub fn with_title(self, page_title: &str) -> Self {
        let title = format!("{page_title} | {}", self.brand.title);
        Self {
            meta: PageMetaView { title, ..self.meta },
            ..self
        }
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub brand: BrandView,
    pub navigation: NavigationView,
    pub footer: FooterView,
    pub meta: PageMetaView,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self {
            brand: chrome.brand,
            navigation: chrome.navigation,
            footer: chrome.footer,
            meta: chrome.meta,
            content,
        }
    }
}

#[derive(Clone)]
pub struct PageMetaView {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub feed_href: String,
}

impl PageMetaView {
    pub fn with_canonical(self, canonical: String) -> Self {
        Self { canonical, ..self }
    }
}

#[derive(Clone)]
pub struct CategoryBadge {
    pub label: String,
    pub href: String,
}

impl From<PostCategory> for CategoryBadge {
    fn from(category: PostCategory) -> Self {
        Self {
            label: category.display_name().to_string(),
            href: format!("/blog/category/{}", category.url_key()),
        }
    }
}

#[derive(Clone)]
pub struct PostCard {
    pub href: String,
    pub title: String,
    pub author: String,
    pub summary_html: String,
    pub iso_date: String,
    pub published: String,
    pub category: CategoryBadge,
    pub is_broadcast: bool,
}

impl From<&PostRecord> for PostCard {
    fn from(post: &PostRecord) -> Self {
        let instant = post.sort_key();
        Self {
            href: format!("/blog/{}", post.public_slug()),
            title: post.title.clone(),
            author: post.author.clone(),
            summary_html: post.rendered_summary.clone(),
            iso_date: iso_date(instant),
            published: format_human_date(instant),
            category: post.category.into(),
            is_broadcast: post.broadcast,
        }
    }
}

#[derive(Clone)]
pub struct CategoryFilterView {
    pub label: String,
    pub href: String,
    pub is_active: bool,
}

#[derive(Clone)]
pub struct PageLinkView {
    pub label: String,
    pub href: String,
    pub is_current: bool,
    pub is_gap: bool,
}

#[derive(Clone)]
pub struct PaginationView {
    pub previous_href: Option<String>,
    pub next_href: Option<String>,
    pub pages: Vec<PageLinkView>,
}

impl PaginationView {
    /// `None` when everything fits on one page.
    pub fn build(info: &PaginationInfo, base_path: &str) -> Option<Self> {
        if !info.is_visible() {
            return None;
        }

        let pages = info
            .page_elements()
            .into_iter()
            .map(|element| PageLinkView {
                label: if element.is_gap {
                    "…".to_string()
                } else {
                    element.number.to_string()
                },
                href: page_href(base_path, element.number),
                is_current: element.is_current,
                is_gap: element.is_gap,
            })
            .collect();

        Some(Self {
            previous_href: info
                .is_previous_visible()
                .then(|| page_href(base_path, info.previous_page_number())),
            next_href: info
                .is_next_visible()
                .then(|| page_href(base_path, info.next_page_number())),
            pages,
        })
    }
}

fn page_href(base_path: &str, page: u64) -> String {
    if page <= 1 {
        base_path.to_string()
    } else {
        format!("{base_path}?page={page}")
    }
}

pub struct ListingContext {
    pub heading: String,
    pub posts: Vec<PostCard>,
    pub has_results: bool,
    pub categories: Vec<CategoryFilterView>,
    pub show_category_filters: bool,
    pub pagination: Option<PaginationView>,
    pub posts_ld_json: Option<String>,
}

#[derive(Template)]
#[template(path = "blog/index.html")]
pub struct IndexTemplate {
    pub view: LayoutContext<ListingContext>,
}

pub struct PostDetailContext {
    pub title: String,
    pub author: String,
    pub published: String,
    pub iso_date: String,
    pub category: CategoryBadge,
    pub content_html: String,
    pub is_broadcast: bool,
}

impl From<&PostRecord> for PostDetailContext {
    fn from(post: &PostRecord) -> Self {
        let instant = post.sort_key();
        Self {
            title: post.title.clone(),
            author: post.author.clone(),
            published: format_human_date(instant),
            iso_date: iso_date(instant),
            category: post.category.into(),
            content_html: post.rendered_content.clone(),
            is_broadcast: post.broadcast,
        }
    }
}

#[derive(Template)]
#[template(path = "blog/show.html")]
pub struct ShowTemplate {
    pub view: LayoutContext<PostDetailContext>,
}

pub struct ErrorPageView {
    pub title: String,
    pub message: String,
    pub primary_action: Option<ErrorAction>,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            title: "Page Not Found".to_string(),
            message: "The page you requested does not exist.".to_string(),
            primary_action: Some(ErrorAction::blog_home()),
        }
    }
}

pub struct ErrorAction {
    pub href: String,
    pub label: String,
}

impl ErrorAction {
    pub fn blog_home() -> Self {
        Self {
            href: "/blog".to_string(),
            label: "Back to the blog".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}

/// Where a listing lives and how it is titled.
#[derive(Debug, Clone)]
pub struct ListingScope {
    pub heading: String,
    pub path: String,
}

impl ListingScope {
    pub fn new(heading: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            path: path.into(),
        }
    }
}

/// Turns a controller's view name and model into an HTTP response.
#[derive(Clone)]
pub struct ViewResolver {
    profile: Arc<SiteProfile>,
    atom: AtomFeedView,
}

impl ViewResolver {
    pub fn new(profile: Arc<SiteProfile>) -> Self {
        Self {
            atom: AtomFeedView::new(Arc::clone(&profile)),
            profile,
        }
    }

    pub fn resolve(
        &self,
        view: BlogView,
        model: BlogModel,
        chrome: LayoutChrome,
        scope: &ListingScope,
    ) -> Response {
        match view {
            BlogView::Index => self.render_index(model, chrome, scope),
            BlogView::Show => match model.post {
                Some(post) => {
                    let chrome = chrome.with_title(&post.title);
                    let content = PostDetailContext::from(&post);
                    render_template_response(
                        ShowTemplate {
                            view: LayoutContext::new(chrome, content),
                        },
                        StatusCode::OK,
                    )
                }
                None => missing_model_value(view, "post"),
            },
            BlogView::Atom => {
                match self
                    .atom
                    .render(model.posts.as_deref(), OffsetDateTime::now_utc())
                {
                    Ok(body) => xml_response(body),
                    Err(err) => HttpError::from_error(
                        "presentation::views::ViewResolver::resolve",
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Feed rendering failed",
                        &err,
                    )
                    .into_response(),
                }
            }
        }
    }

    fn render_index(
        &self,
        model: BlogModel,
        chrome: LayoutChrome,
        scope: &ListingScope,
    ) -> Response {
        let BlogModel {
            posts,
            categories,
            pagination_info,
            category: active_category,
            ..
        } = model;

        let Some(posts) = posts else {
            return missing_model_value(BlogView::Index, "posts");
        };

        let cards = posts.iter().map(PostCard::from).collect::<Vec<_>>();
        let show_category_filters = categories.is_some();
        let categories = categories
            .unwrap_or_default()
            .into_iter()
            .map(|category| CategoryFilterView {
                label: category.display_name().to_string(),
                href: format!("/blog/category/{}", category.url_key()),
                is_active: active_category == Some(category),
            })
            .collect();

        let posts_ld_json = build_posts_ld_json(
            &cards,
            &self.profile.base_url(),
            &chrome.meta.canonical,
            &chrome.brand.title,
        );
        let chrome = chrome.with_title(&scope.heading);

        let content = ListingContext {
            heading: scope.heading.clone(),
            has_results: !cards.is_empty(),
            posts: cards,
            categories,
            show_category_filters,
            pagination: pagination_info
                .as_ref()
                .and_then(|info| PaginationView::build(info, &scope.path)),
            posts_ld_json,
        };

        render_template_response(
            IndexTemplate {
                view: LayoutContext::new(chrome, content),
            },
            StatusCode::OK,
        )
    }
}

fn missing_model_value(view: BlogView, key: &str) -> Response {
    HttpError::new(
        "presentation::views::ViewResolver::resolve",
        StatusCode::INTERNAL_SERVER_ERROR,
        "Template rendering failed",
        format!("view `{view}` rendered without `{key}`"),
    )
    .into_response()
}

fn iso_date(instant: OffsetDateTime) -> String {
    instant
        .format(&Rfc3339)
        .unwrap_or_else(|_| instant.to_string())
}

fn build_posts_ld_json(
    cards: &[PostCard],
    site_url: &str,
    listing_url: &str,
    blog_name: &str,
) -> Option<String> {
    if cards.is_empty() {
        return None;
    }

    let site_url = site_url.trim_end_matches('/');
    let blog_posts = cards
        .iter()
        .map(|card| {
            json!({
                "@type": "BlogPosting",
                "headline": card.title,
                "author": { "@type": "Person", "name": card.author },
                "datePublished": card.iso_date,
                "url": format!("{site_url}{}", card.href),
            })
        })
        .collect::<Vec<_>>();

    serde_json::to_string(&json!({
        "@context": "https://schema.org",
        "@type": "Blog",
        "name": blog_name,
        "url": listing_url,
        "blogPost": blog_posts,
    }))
    .ok()
    .map(|json| escape_script_json(&json))
}

/// JSON emitted inside `<script>` must not contain markup delimiters.
fn escape_script_json(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    for ch in json.chars() {
        match ch {
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '&' => escaped.push_str("\\u0026"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
