// routes.rs
use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        jobs::jobs_handler,
        providers::providers_handler,
        reviews::{public_reviews_handler, reviews_handler},
        users::users_handler,
    },
    middleware::auth,
    AppState,
};

// Health check handler
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let review_routes = Router::new()
        .merge(reviews_handler().layer(middleware::from_fn(auth)))
        .merge(public_reviews_handler());

    let api_route = Router::new()
        .nest("/jobs", jobs_handler().layer(middleware::from_fn(auth)))
        .nest("/providers", providers_handler().layer(middleware::from_fn(auth)))
        .nest("/reviews", review_routes)
        .nest("/users", users_handler().layer(middleware::from_fn(auth)))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}
