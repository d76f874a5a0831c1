use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod state;

pub use state::{AppState, RefreshSummary};

pub fn create_app(state: AppState) -> Router {
    create_app_with_state(Arc::new(state))
}

pub fn create_app_with_state(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::home))
        .route("/news", get(handlers::news))
        .route("/business", get(handlers::business))
        .route("/sports", get(handlers::sports))
        .route("/worldNews", get(handlers::world_news))
        .route("/articles/:category", get(handlers::articles_by_category))
        .route("/api/refresh", post(handlers::refresh))
        .route(
            "/api/comments",
            get(handlers::list_comments).post(handlers::create_comment),
        )
        .layer(cors)
        .with_state(state)
}

pub mod prelude {
    pub use crate::{create_app, AppState};
    pub use gn_core::{Article, Error, Result};
}
