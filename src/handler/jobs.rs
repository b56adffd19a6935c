// handler/jobs.rs
use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use crate::{
    dtos::jobdtos::*, error::HttpError, middleware::JWTAuthMiddeware, AppState,
};

pub fn jobs_handler() -> Router {
    Router::new()
        // Creation
        .route("/post", post(post_job))
        .route("/book", post(book_provider))
        // Dashboards
        .route("/needy", get(get_needy_jobs))
        .route("/provider", get(get_provider_jobs))
        // Lifecycle
        .route("/:job_id", get(get_job))
        .route("/:job_id/respond", put(respond_to_job))
        .route("/:job_id/status", put(update_job_status))
        .route("/:job_id/complete", put(complete_job))
}

pub async fn post_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    WithRejection(Json(body), _): WithRejection<Json<CreateJobDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state.job_service.post_job(&auth.actor(), body).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Job posted successfully", job)),
    ))
}

pub async fn book_provider(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    WithRejection(Json(body), _): WithRejection<Json<BookProviderDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .job_service
        .book_provider(&auth.actor(), body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Provider booked successfully", job)),
    ))
}

pub async fn get_needy_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let jobs = app_state
        .job_service
        .list_jobs_for_needy(&auth.actor())
        .await?;

    Ok(Json(ApiResponse::success("Jobs retrieved successfully", jobs)))
}

pub async fn get_provider_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let jobs = app_state
        .job_service
        .list_assigned_jobs(&auth.actor())
        .await?;

    Ok(Json(ApiResponse::success("Assigned jobs retrieved successfully", jobs)))
}

pub async fn get_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state.job_service.get_job(job_id, &auth.actor()).await?;

    Ok(Json(ApiResponse::success("Job retrieved successfully", job)))
}

pub async fn respond_to_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
    WithRejection(Json(body), _): WithRejection<Json<RespondToJobDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .job_service
        .respond_to_job(job_id, &auth.actor(), body.action)
        .await?;

    Ok(Json(ApiResponse::success("Job updated successfully", job)))
}

pub async fn update_job_status(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
    WithRejection(Json(body), _): WithRejection<Json<UpdateJobStatusDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .job_service
        .update_job_status(job_id, &auth.actor(), body.new_status)
        .await?;

    Ok(Json(ApiResponse::success("Job status updated successfully", job)))
}

pub async fn complete_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .job_service
        .complete_job(job_id, &auth.actor())
        .await?;

    Ok(Json(ApiResponse::success("Job marked as completed", job)))
}
