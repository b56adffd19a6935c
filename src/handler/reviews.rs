// handler/reviews.rs
use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use crate::{
    dtos::{
        jobdtos::ApiResponse,
        reviewdtos::{CreateReviewDto, ProviderReviewsDto},
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

pub fn reviews_handler() -> Router {
    Router::new().route("/", post(submit_review))
}

/// Routes readable without a token.
pub fn public_reviews_handler() -> Router {
    Router::new().route("/:provider_id", get(get_provider_reviews))
}

pub async fn submit_review(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    WithRejection(Json(body), _): WithRejection<Json<CreateReviewDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    let review = app_state
        .review_service
        .submit_review(body.job_id, &auth.actor(), body.rating, body.comment)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Review submitted successfully", review)),
    ))
}

pub async fn get_provider_reviews(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(provider_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let (rating, reviews) = app_state
        .review_service
        .list_reviews_for_provider(provider_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Reviews retrieved successfully",
        ProviderReviewsDto {
            provider_id,
            rating,
            reviews,
        },
    )))
}
