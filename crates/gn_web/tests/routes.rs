use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use gn_core::error::NETWORK_FAILURE_MESSAGE;
use gn_core::{Article, Config, FetchError, PublishedAt, RawArticle};
use gn_fetch::MemorySource;
use gn_web::{create_app_with_state, AppState};
use serde_json::Value;
use tower::ServiceExt;

fn article(title: &str, section: &str, day: u32) -> Article {
    Article {
        title: title.to_string(),
        section: section.to_string(),
        url: format!("https://example.com/{}", day),
        published_at: PublishedAt::parse(&format!("2024-04-{:02} 08:00:00", day)),
        ..Article::from(RawArticle::default())
    }
}

fn sample() -> Vec<Article> {
    let mut articles = vec![
        article("Eagles qualify", "sports", 1),
        article("Markets rally", "business", 2),
        article("World leaders meet", "world", 3),
        article("Budget hearing", "top", 4),
    ];
    for day in 5..=24 {
        articles.push(article(&format!("Headline {}", day), "top", day));
    }
    articles
}

async fn app_with(source: MemorySource) -> (Arc<AppState>, Router) {
    let state = Arc::new(AppState::new(Arc::new(source), &Config::default()));
    state.refresh().await;
    (state.clone(), create_app_with_state(state))
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_json(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_home_paginates_newest_first() {
    let (_, app) = app_with(MemorySource::new(sample())).await;

    let (status, page) = get_json(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total_pages"], 2);
    assert_eq!(page["articles"].as_array().unwrap().len(), 16);
    assert_eq!(page["articles"][0]["title"], "Headline 24");
    assert_eq!(page["navigation"].as_array().unwrap().len(), 5);
    assert!(page["error"].is_null());

    let (_, page) = get_json(&app, "/?page=2").await;
    assert_eq!(page["articles"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn test_named_routes_filter_by_section() {
    let (_, app) = app_with(MemorySource::new(sample())).await;

    let (_, page) = get_json(&app, "/sports").await;
    assert_eq!(page["matched"], 1);
    assert_eq!(page["articles"][0]["title"], "Eagles qualify");
    assert_eq!(page["route"]["route"], "sports");

    let (_, page) = get_json(&app, "/worldNews").await;
    assert_eq!(page["articles"][0]["title"], "World leaders meet");

    let (_, page) = get_json(&app, "/articles/BUSINESS").await;
    assert_eq!(page["articles"][0]["title"], "Markets rally");
    assert_eq!(page["route"]["category"], "BUSINESS");
}

#[tokio::test]
async fn test_search_sort_and_section_params() {
    let (_, app) = app_with(MemorySource::new(sample())).await;

    let (_, page) = get_json(&app, "/?search=budget").await;
    assert_eq!(page["matched"], 1);

    let (_, page) = get_json(&app, "/?sort=oldest").await;
    assert_eq!(page["articles"][0]["title"], "Eagles qualify");

    let (_, page) = get_json(&app, "/?section=all").await;
    assert_eq!(page["matched"], 24);
    assert!(page["section"].is_null());
}

#[tokio::test]
async fn test_article_view_has_share_links_and_placeholder() {
    let (_, app) = app_with(MemorySource::new(sample())).await;
    let (_, page) = get_json(&app, "/sports").await;
    let item = &page["articles"][0];
    assert_eq!(item["image_placeholder"], "Image Not Available");
    let share = item["share"].as_array().unwrap();
    assert_eq!(share.len(), 3);
    assert_eq!(share[0]["platform"], "twitter");
    assert!(share[1]["url"]
        .as_str()
        .unwrap()
        .starts_with("https://www.facebook.com/sharer/sharer.php?u="));
}

#[tokio::test]
async fn test_network_failure_is_shown_with_retry() {
    let (_, app) = app_with(MemorySource::failing(FetchError::NetworkFailure(
        "connection refused".into(),
    )))
    .await;
    let (status, page) = get_json(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["error"]["message"], NETWORK_FAILURE_MESSAGE);
    assert_eq!(page["error"]["retry"], "/api/refresh");
    assert_eq!(page["total_pages"], 0);
}

#[tokio::test]
async fn test_empty_results_show_no_error() {
    let (_, app) = app_with(MemorySource::new(vec![])).await;
    let (_, page) = get_json(&app, "/").await;
    assert!(page["error"].is_null());
    assert_eq!(page["total_pages"], 0);
    assert!(page["articles"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_comments() {
    let (_, app) = app_with(MemorySource::new(sample())).await;

    let (status, _) = post_json(&app, "/api/comments", r#"{"text": "   "}"#).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = post_json(&app, "/api/comments", r#"{"text": "Great coverage"}"#).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["comments"][0], "Great coverage");

    let (_, comments) = get_json(&app, "/api/comments").await;
    assert_eq!(comments, serde_json::json!(["Great coverage"]));
}

#[tokio::test]
async fn test_refresh_is_a_full_reload() {
    let (state, app) = app_with(MemorySource::new(sample())).await;
    post_json(&app, "/api/comments", r#"{"text": "gone after reload"}"#).await;

    let (status, summary) = post_json(&app, "/api/refresh", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["applied"], true);
    assert_eq!(summary["articles"], 24);
    assert!(summary["error"].is_null());
    assert!(state.session.read().await.comments().is_empty());
}
