use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;

use crate::{
    application::{
        blog::{BlogController, BlogError, BlogModel},
        chrome::ChromeService,
        error::{ErrorReport, HttpError},
    },
    domain::{error::DomainError, slug::parse_public_slug, types::PostCategory},
    presentation::views::{LayoutChrome, ListingScope, ViewResolver, render_not_found_response},
};

use super::middleware::{log_responses, set_request_context};

#[derive(Clone)]
pub struct HttpState {
    pub blog: Arc<BlogController>,
    pub chrome: Arc<ChromeService>,
    pub views: Arc<ViewResolver>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/blog", get(list_posts))
        .route("/blog/broadcasts", get(list_broadcasts))
        .route("/blog/atom.xml", get(atom_feed))
        .route("/blog/category/{category}", get(list_category))
        .route("/blog/{public_slug}", get(show_post))
        .route("/_health", get(health))
        .fallback(fallback)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PageQuery {
    page: Option<u32>,
}

/// One-indexed page from the query string; absent means the first page.
fn requested_page(query: Result<Query<PageQuery>, QueryRejection>) -> Result<u32, Response> {
    match query {
        Ok(Query(query)) => Ok(query.page.unwrap_or(1)),
        Err(rejection) => Err(HttpError::from_error(
            "infra::http::public::requested_page",
            StatusCode::BAD_REQUEST,
            "Invalid page",
            &rejection,
        )
        .into_response()),
    }
}

async fn root() -> Redirect {
    Redirect::permanent("/blog")
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn list_posts(
    State(state): State<HttpState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Response {
    let page = match requested_page(query) {
        Ok(page) => page,
        Err(response) => return response,
    };
    let chrome = state.chrome.load();
    let scope = ListingScope::new("All Posts", "/blog");

    let mut model = BlogModel::default();
    match state.blog.list_posts(&mut model, page).await {
        Ok(view) => {
            let chrome = with_listing_canonical(chrome, &scope.path, page);
            state.views.resolve(view, model, chrome, &scope)
        }
        Err(err) => blog_error_to_response(err, chrome),
    }
}

async fn list_broadcasts(
    State(state): State<HttpState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Response {
    let page = match requested_page(query) {
        Ok(page) => page,
        Err(response) => return response,
    };
    let chrome = state.chrome.load();
    let scope = ListingScope::new("Broadcasts", "/blog/broadcasts");

    let mut model = BlogModel::default();
    match state.blog.list_broadcasts(&mut model, page).await {
        Ok(view) => {
            let chrome = with_listing_canonical(chrome, &scope.path, page);
            state.views.resolve(view, model, chrome, &scope)
        }
        Err(err) => blog_error_to_response(err, chrome),
    }
}

async fn list_category(
    State(state): State<HttpState>,
    Path(category): Path<String>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Response {
    let chrome = state.chrome.load();
    let requested = category;
    let category = match requested.parse::<PostCategory>() {
        Ok(category) => category,
        Err(err) => return domain_not_found(err, chrome),
    };
    let page = match requested_page(query) {
        Ok(page) => page,
        Err(response) => return response,
    };
    let scope = ListingScope::new(
        category.display_name(),
        format!("/blog/category/{}", category.url_key()),
    );
    if requested != category.url_key() {
        return Redirect::permanent(&listing_path(&scope.path, page)).into_response();
    }

    let mut model = BlogModel::default();
    match state
        .blog
        .list_posts_for_category(category, &mut model, page)
        .await
    {
        Ok(view) => {
            let chrome = with_listing_canonical(chrome, &scope.path, page);
            state.views.resolve(view, model, chrome, &scope)
        }
        Err(err) => blog_error_to_response(err, chrome),
    }
}

async fn show_post(State(state): State<HttpState>, Path(public_slug): Path<String>) -> Response {
    let chrome = state.chrome.load();
    let (id, slug) = match parse_public_slug(&public_slug) {
        Ok(parsed) => parsed,
        Err(err) => return domain_not_found(err, chrome),
    };

    let mut model = BlogModel::default();
    match state.blog.show_post(id, slug, &mut model).await {
        Ok(view) => {
            let canonical_slug = model
                .post
                .as_ref()
                .map(|post| post.public_slug())
                .unwrap_or_else(|| public_slug.clone());
            let path = format!("/blog/{canonical_slug}");
            if canonical_slug != public_slug {
                return Redirect::permanent(&path).into_response();
            }

            let canonical = canonical_url(&chrome.meta.canonical, &path);
            let title = model
                .post
                .as_ref()
                .map(|post| post.title.clone())
                .unwrap_or_default();
            let scope = ListingScope::new(title, path);
            state
                .views
                .resolve(view, model, chrome.with_canonical(canonical), &scope)
        }
        Err(err) => blog_error_to_response(err, chrome),
    }
}

async fn atom_feed(State(state): State<HttpState>) -> Response {
    let chrome = state.chrome.load();
    let scope = ListingScope::new("Atom", "/blog/atom.xml");

    let mut model = BlogModel::default();
    match state.blog.atom_feed(&mut model).await {
        Ok(view) => state.views.resolve(view, model, chrome, &scope),
        Err(err) => blog_error_to_response(err, chrome),
    }
}

async fn fallback(State(state): State<HttpState>) -> Response {
    render_not_found_response(state.chrome.load())
}

fn blog_error_to_response(err: BlogError, chrome: LayoutChrome) -> Response {
    match err {
        BlogError::PostsNotFound | BlogError::PostNotFound { .. } => {
            let mut response = render_not_found_response(chrome);
            ErrorReport::from_error(
                "infra::http::public::blog_error_to_response",
                StatusCode::NOT_FOUND,
                &err,
            )
            .attach(&mut response);
            response
        }
        err => HttpError::from(err).into_response(),
    }
}

fn domain_not_found(err: DomainError, chrome: LayoutChrome) -> Response {
    let mut response = render_not_found_response(chrome);
    ErrorReport::from_error(
        "infra::http::public::domain_not_found",
        StatusCode::NOT_FOUND,
        &err,
    )
    .attach(&mut response);
    response
}

fn listing_path(path: &str, page: u32) -> String {
    if page > 1 {
        format!("{path}?page={page}")
    } else {
        path.to_string()
    }
}

fn with_listing_canonical(chrome: LayoutChrome, path: &str, page: u32) -> LayoutChrome {
    let canonical = canonical_url(&chrome.meta.canonical, &listing_path(path, page));
    chrome.with_canonical(canonical)
}

pub(crate) fn canonical_url(base: &str, path: &str) -> String {
    let root = normalize_public_site_url(base);
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        root
    } else {
        format!("{root}{trimmed}")
    }
}

fn normalize_public_site_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    format!("{trimmed}/")
}
