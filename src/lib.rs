pub mod config;
pub mod db;
pub mod duplicate;
pub mod error;
pub mod models;
pub mod public_url;
pub mod request;
pub mod routes;
pub mod state;
pub mod storage;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::{Json, Router};
use serde_json::{Value, json};
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::AppError;
use crate::public_url::IMAGES_PATH;
use crate::state::{AppState, SharedState};
use crate::storage::ImageStore;

pub fn build_app(pool: SqlitePool, config: Config) -> Router {
    let images = ImageStore::new(config.upload_dir.clone());
    let serve_images = ServeDir::new(images.dir());
    let body_limit = config.max_upload_size;

    let state: SharedState = Arc::new(AppState {
        pool,
        config,
        images,
    });

    Router::new()
        .merge(routes::api_routes())
        .nest_service(IMAGES_PATH, serve_images)
        .route("/", axum::routing::get(root))
        .route("/health", axum::routing::get(health))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "WithCare server is running" }))
}

async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
