use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use blogsite::{
    application::{
        blog::BlogController,
        chrome::{ChromeService, SiteProfile},
    },
    domain::{entities::PostRecord, types::PostCategory},
    infra::{
        http::{HttpState, REQUEST_ID_HEADER, build_router},
        memory::InMemoryPostsRepo,
    },
    presentation::views::ViewResolver,
};
use http_body_util::BodyExt;
use time::{Duration, OffsetDateTime, macros::datetime};
use tower::ServiceExt;

fn fixed_now() -> OffsetDateTime {
    datetime!(2013-06-01 12:00 UTC)
}

fn post(id: i64, title: &str, category: PostCategory, days: i64) -> PostRecord {
    let publish_at = datetime!(2013-01-01 09:00 UTC) + Duration::days(days);
    PostRecord {
        id,
        title: title.to_string(),
        category,
        author: "Jane Doe".to_string(),
        rendered_content: format!("<p>Body of {title}</p>"),
        rendered_summary: format!("<p>Summary of {title}</p>"),
        broadcast: false,
        draft: false,
        created_at: publish_at,
        publish_at: Some(publish_at),
    }
}

fn router_with(posts: Vec<PostRecord>) -> Router {
    let profile = Arc::new(SiteProfile {
        title: "Team Blog".to_string(),
        description: "Notes from the team".to_string(),
        public_url: "https://blog.example.com/".to_string(),
        footer_copy: "Example Corp".to_string(),
    });
    let repo = InMemoryPostsRepo::with_clock(posts, fixed_now);

    build_router(HttpState {
        blog: Arc::new(BlogController::new(Arc::new(repo))),
        chrome: Arc::new(ChromeService::new(Arc::clone(&profile))),
        views: Arc::new(ViewResolver::new(profile)),
    })
}

fn sample_router() -> Router {
    let mut broadcast = post(3, "Service Window", PostCategory::NewsAndEvents, 3);
    broadcast.broadcast = true;
    let mut draft = post(4, "Unfinished", PostCategory::Engineering, 4);
    draft.draft = true;

    router_with(vec![
        post(1, "Hello Reactor", PostCategory::Engineering, 1),
        post(2, "Reactor 1.0 GA", PostCategory::Releases, 2),
        broadcast,
        draft,
    ])
}

async fn get(router: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn index_lists_published_posts_newest_first() {
    let (status, headers, body) = get(sample_router(), "/blog").await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers.contains_key(REQUEST_ID_HEADER));

    let service = body.find("Service Window").expect("broadcast listed");
    let release = body.find("Reactor 1.0 GA").expect("release listed");
    let hello = body.find("Hello Reactor").expect("engineering listed");
    assert!(service < release && release < hello);
    assert!(!body.contains("Unfinished"));
    assert!(body.contains("href=\"/blog/2-reactor-1-0-ga\""));
    assert!(body.contains("<link rel=\"canonical\" href=\"https://blog.example.com/blog\">"));
    assert!(body.contains("application/ld+json"));
}

#[tokio::test]
async fn index_without_posts_is_not_found() {
    let (status, _, body) = get(router_with(Vec::new()), "/blog").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Page Not Found"));
}

#[tokio::test]
async fn page_zero_is_rejected() {
    let (status, _, _) = get(sample_router(), "/blog?page=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_numeric_page_is_rejected() {
    let (status, _, _) = get(sample_router(), "/blog?page=two").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn second_page_renders_pagination_links() {
    let posts = (1..=12)
        .map(|id| post(id, &format!("Post number {id}"), PostCategory::Engineering, id))
        .collect();
    let (status, _, body) = get(router_with(posts), "/blog?page=2").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Post number 2"));
    assert!(!body.contains("Post number 12<"));
    assert!(body.contains("href=\"/blog\" rel=\"prev\""));
    assert!(body.contains("aria-current=\"page\">2<"));
}

#[tokio::test]
async fn broadcasts_only_lists_broadcast_posts() {
    let (status, _, body) = get(sample_router(), "/blog/broadcasts").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Service Window"));
    assert!(!body.contains("Hello Reactor"));
}

#[tokio::test]
async fn category_listing_filters_posts() {
    let (status, _, body) = get(sample_router(), "/blog/category/releases").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Reactor 1.0 GA"));
    assert!(!body.contains("Hello Reactor"));
}

#[tokio::test]
async fn empty_category_renders_empty_listing() {
    let router = router_with(vec![post(1, "Hello Reactor", PostCategory::Engineering, 1)]);
    let (status, _, body) = get(router, "/blog/category/news-and-events").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No posts yet."));
}

#[tokio::test]
async fn category_aliases_redirect_to_url_key() {
    for (uri, target) in [
        ("/blog/category/ENGINEERING", "/blog/category/engineering"),
        ("/blog/category/Releases", "/blog/category/releases"),
        ("/blog/category/NEWS_AND_EVENTS?page=3", "/blog/category/news-and-events?page=3"),
    ] {
        let (status, headers, _) = get(sample_router(), uri).await;
        assert_eq!(status, StatusCode::PERMANENT_REDIRECT, "{uri}");
        assert_eq!(
            headers.get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some(target)
        );
    }
}

#[tokio::test]
async fn post_titles_cannot_inject_markup() {
    let mut hostile = post(
        1,
        "Hi </script><script>alert(1)</script>",
        PostCategory::Engineering,
        1,
    );
    hostile.rendered_summary = "<p>Summary</p>".to_string();
    let router = router_with(vec![hostile]);
    let (status, _, body) = get(router, "/blog").await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("<script>alert(1)"));
    assert!(body.contains("\\u003c/script\\u003e"));
}

#[tokio::test]
async fn unknown_category_is_not_found() {
    let (status, _, _) = get(sample_router(), "/blog/category/gardening").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn show_post_renders_full_content() {
    let (status, _, body) = get(sample_router(), "/blog/1-hello-reactor").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<p>Body of Hello Reactor</p>"));
    assert!(body.contains("<title>Hello Reactor | Team Blog</title>"));
}

#[tokio::test]
async fn stale_slug_redirects_to_canonical_url() {
    let (status, headers, _) = get(sample_router(), "/blog/1-old-title").await;

    assert_eq!(status, StatusCode::PERMANENT_REDIRECT);
    assert_eq!(
        headers.get(header::LOCATION).and_then(|v| v.to_str().ok()),
        Some("/blog/1-hello-reactor")
    );
}

#[tokio::test]
async fn draft_and_missing_posts_are_not_found() {
    let (draft_status, _, _) = get(sample_router(), "/blog/4-unfinished").await;
    assert_eq!(draft_status, StatusCode::NOT_FOUND);

    let (missing_status, _, _) = get(sample_router(), "/blog/99-nothing").await;
    assert_eq!(missing_status, StatusCode::NOT_FOUND);

    let (malformed_status, _, _) = get(sample_router(), "/blog/not-a-post").await;
    assert_eq!(malformed_status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn atom_feed_lists_published_posts() {
    let (status, headers, body) = get(sample_router(), "/blog/atom.xml").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
        Some("application/atom+xml; charset=utf-8")
    );
    assert!(body.starts_with("<?xml"));
    assert_eq!(body.matches("<entry>").count(), 3);
    assert!(body.contains("https://blog.example.com/blog/3-service-window"));
}

#[tokio::test]
async fn health_and_root() {
    let (health, _, _) = get(sample_router(), "/_health").await;
    assert_eq!(health, StatusCode::NO_CONTENT);

    let (root, headers, _) = get(sample_router(), "/").await;
    assert_eq!(root, StatusCode::PERMANENT_REDIRECT);
    assert_eq!(
        headers.get(header::LOCATION).and_then(|v| v.to_str().ok()),
        Some("/blog")
    );
}

#[tokio::test]
async fn unknown_paths_render_not_found_page() {
    let (status, _, body) = get(sample_router(), "/nowhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Back to the blog"));
}
