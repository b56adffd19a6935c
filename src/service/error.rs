use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::{db::StoreError, error::HttpError, models::jobmodel::JobStatus};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authorization denied: {0}")]
    Unauthorized(String),

    #[error("Job {0} not found")]
    JobNotFound(Uuid),

    #[error("Provider {0} not found")]
    ProviderNotFound(Uuid),

    #[error("User {0} not found")]
    UserNotFound(Uuid),

    #[error("Job {job_id} is {actual}, expected {}", join_statuses(.expected))]
    InvalidJobStatus {
        job_id: Uuid,
        expected: Vec<JobStatus>,
        actual: JobStatus,
    },

    #[error("Job {0} has no assigned provider")]
    NoAssignedProvider(Uuid),

    #[error("Job {0} has already been reviewed")]
    ReviewAlreadyExists(Uuid),

    #[error("Provider {0} is not accepting jobs")]
    ProviderUnavailable(Uuid),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

fn join_statuses(statuses: &[JobStatus]) -> String {
    statuses
        .iter()
        .map(|s| s.label())
        .collect::<Vec<_>>()
        .join(" or ")
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ServiceError::Validation(errors.to_string())
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_)
            | ServiceError::InvalidJobStatus { .. }
            | ServiceError::NoAssignedProvider(_) => StatusCode::BAD_REQUEST,

            ServiceError::Unauthorized(_) => StatusCode::FORBIDDEN,

            ServiceError::JobNotFound(_)
            | ServiceError::ProviderNotFound(_)
            | ServiceError::UserNotFound(_) => StatusCode::NOT_FOUND,

            ServiceError::ReviewAlreadyExists(_) => StatusCode::CONFLICT,

            ServiceError::ProviderUnavailable(_) => StatusCode::UNPROCESSABLE_ENTITY,

            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::Storage(ref err) => {
                tracing::error!("Storage failure: {}", err);
                HttpError::server_error(crate::error::ErrorMessage::ServerError.to_string())
            }
            _ => HttpError::new(error.to_string(), error.status_code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_status_names_expected_and_actual() {
        let job_id = Uuid::nil();
        let err = ServiceError::InvalidJobStatus {
            job_id,
            expected: vec![JobStatus::ProviderAccepted, JobStatus::NeedyAccepted],
            actual: JobStatus::Cancelled,
        };

        assert_eq!(
            err.to_string(),
            format!(
                "Job {} is Cancelled, expected Provider Accepted or Needy Accepted",
                job_id
            )
        );
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn storage_errors_are_opaque_over_http() {
        let err = ServiceError::Storage(StoreError::Backend("disk on fire".to_string()));
        let http: HttpError = err.into();

        assert_eq!(http.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!http.message.contains("disk"));
    }

    #[test]
    fn business_errors_map_to_distinct_statuses() {
        let id = Uuid::new_v4();
        assert_eq!(ServiceError::Unauthorized("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ServiceError::JobNotFound(id).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ServiceError::ReviewAlreadyExists(id).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ServiceError::ProviderUnavailable(id).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
