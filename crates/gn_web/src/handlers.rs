use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Local;
use gn_core::clock::{copyright_line, format_date};
use gn_core::comments::Comment;
use gn_core::pipeline::{self, Query as ArticleQuery};
use gn_core::share::{share_links, ShareLink};
use gn_core::types::NO_IMAGE;
use gn_core::{Article, Route, SortKey};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub sort: Option<SortKey>,
    pub section: Option<String>,
    pub page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct NavLink {
    pub label: String,
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct ArticleView {
    pub id: Option<String>,
    pub title: String,
    pub url: String,
    pub description: String,
    pub published_at: String,
    pub section: String,
    pub image_url: Option<String>,
    pub image_placeholder: Option<&'static str>,
    pub share: Vec<ShareLink>,
}

impl ArticleView {
    fn from_article(article: &Article) -> Self {
        let share = share_links(&article.url).unwrap_or_else(|e| {
            warn!("No share links for {}: {}", article.url, e);
            Vec::new()
        });
        Self {
            id: article.id.clone(),
            title: article.title.clone(),
            url: article.url.clone(),
            description: article.description.clone(),
            published_at: article.published_at.raw.clone(),
            section: article.section.clone(),
            image_url: article.image_url.clone(),
            image_placeholder: article.image_url.is_none().then_some(NO_IMAGE),
            share,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorView {
    pub message: &'static str,
    pub retry: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PageView {
    pub route: Route,
    pub date: String,
    pub navigation: Vec<NavLink>,
    pub sections: Vec<String>,
    pub search: String,
    pub sort: SortKey,
    pub section: Option<String>,
    pub page: usize,
    pub total_pages: usize,
    pub matched: usize,
    pub articles: Vec<ArticleView>,
    pub error: Option<ErrorView>,
    pub footer: String,
}

async fn render(state: &AppState, route: Route, params: ListParams) -> PageView {
    let session = state.session.read().await;

    let section = route
        .section()
        .map(str::to_string)
        .or(params.section);
    let query = ArticleQuery::new(
        params.search.unwrap_or_default(),
        params.sort.unwrap_or_default(),
        section.as_deref(),
    );
    let page_size = session.view().page_size();
    let projection = pipeline::project(
        session.articles(),
        &query,
        params.page.unwrap_or(1),
        page_size,
    );

    PageView {
        navigation: Route::NAVIGATION
            .iter()
            .map(|r| NavLink {
                label: r.label().to_string(),
                path: r.path(),
            })
            .collect(),
        route,
        date: format_date(&Local::now()),
        sections: session.sections().to_vec(),
        search: query.search.clone(),
        sort: query.sort,
        section: query.section().map(str::to_string),
        page: projection.page,
        total_pages: projection.total_pages,
        matched: projection.matched,
        articles: projection
            .items
            .iter()
            .map(|a| ArticleView::from_article(a))
            .collect(),
        error: session.error_message().map(|message| ErrorView {
            message,
            retry: "/api/refresh",
        }),
        footer: copyright_line(&Local::now()),
    }
}

pub async fn home(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    Json(render(&state, Route::Home, params).await)
}

pub async fn news(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    Json(render(&state, Route::News, params).await)
}

pub async fn business(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    Json(render(&state, Route::Business, params).await)
}

pub async fn sports(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    Json(render(&state, Route::Sports, params).await)
}

pub async fn world_news(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    Json(render(&state, Route::WorldNews, params).await)
}

pub async fn articles_by_category(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    Json(render(&state, Route::Articles(category), params).await)
}

pub async fn refresh(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.refresh().await)
}

pub async fn list_comments(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.session.read().await;
    Json::<Vec<Comment>>(session.comments().to_vec())
}

#[derive(Debug, Deserialize)]
pub struct NewComment {
    pub text: String,
}

pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    Json(comment): Json<NewComment>,
) -> impl IntoResponse {
    let mut session = state.session.write().await;
    if !session.submit_comment(&comment.text) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({ "error": "comment is empty" })),
        );
    }
    (
        StatusCode::CREATED,
        Json(serde_json::json!({ "comments": session.comments() })),
    )
}
