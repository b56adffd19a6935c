// handler/providers.rs
use std::sync::Arc;

use axum::{
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};

use axum_extra::extract::WithRejection;
use crate::{
    dtos::{
        jobdtos::ApiResponse,
        userdtos::{FilterUserDto, MeDto, UpdateProviderProfileDto},
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

pub fn providers_handler() -> Router {
    Router::new()
        .route("/jobs", get(get_job_feed))
        .route("/available", get(get_available_providers))
        .route("/profile", put(update_profile))
        .route("/analytics/me", get(get_my_analytics))
}

pub async fn get_job_feed(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let jobs = app_state
        .provider_service
        .list_jobs_for_provider(&auth.actor())
        .await?;

    Ok(Json(ApiResponse::success("Available jobs retrieved successfully", jobs)))
}

pub async fn get_available_providers(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let providers = app_state.provider_service.list_available_providers().await?;

    Ok(Json(ApiResponse::success(
        "Providers retrieved successfully",
        FilterUserDto::filter_users(&providers),
    )))
}

pub async fn update_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    WithRejection(Json(body), _): WithRejection<Json<UpdateProviderProfileDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    let user = app_state
        .provider_service
        .update_provider_profile(&auth.actor(), body)
        .await?;

    Ok(Json(ApiResponse::success(
        "Profile updated successfully",
        MeDto::from_user(&user),
    )))
}

pub async fn get_my_analytics(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let analytics = app_state
        .provider_service
        .get_provider_analytics(&auth.actor())
        .await?;

    Ok(Json(ApiResponse::success("Analytics retrieved successfully", analytics)))
}
