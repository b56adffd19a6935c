// service/review_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{jobdb::JobExt, reviewdb::ReviewExt, userdb::UserExt, Repository, StoreError},
    models::{
        jobmodel::JobStatus,
        reviewmodel::{NewReview, Review, MAX_COMMENT_LENGTH},
        usermodel::{Actor, RatingSummary, UserRole},
    },
    service::error::ServiceError,
};

#[derive(Debug, Clone)]
pub struct ReviewService {
    db_client: Arc<dyn Repository>,
}

fn validate_review(rating: i32, comment: &str) -> Result<(), ServiceError> {
    if !(1..=5).contains(&rating) {
        return Err(ServiceError::Validation(
            "Rating must be between 1 and 5".to_string(),
        ));
    }
    if comment.chars().count() > MAX_COMMENT_LENGTH {
        return Err(ServiceError::Validation(format!(
            "Comment cannot be longer than {} characters",
            MAX_COMMENT_LENGTH
        )));
    }
    Ok(())
}

impl ReviewService {
    pub fn new(db_client: Arc<dyn Repository>) -> Self {
        Self { db_client }
    }

    /// Records the single review a job owner may leave once the job is completed,
    /// then folds the rating into the provider's summary.
    ///
    /// A failed summary update does not undo the review; the summary is left stale
    /// and the failure is logged.
    pub async fn submit_review(
        &self,
        job_id: Uuid,
        actor: &Actor,
        rating: i32,
        comment: Option<String>,
    ) -> Result<Review, ServiceError> {
        if actor.role != UserRole::Needy {
            return Err(ServiceError::Unauthorized(
                "only needy users can submit reviews".to_string(),
            ));
        }

        let job = self
            .db_client
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        if job.needy_id != actor.id {
            return Err(ServiceError::Unauthorized(
                "only the job owner can review this job".to_string(),
            ));
        }

        if job.status != JobStatus::Completed {
            return Err(ServiceError::InvalidJobStatus {
                job_id,
                expected: vec![JobStatus::Completed],
                actual: job.status,
            });
        }

        let provider_id = job
            .provider_id
            .ok_or(ServiceError::NoAssignedProvider(job_id))?;

        // Fast path only; the store's uniqueness on job_id is what actually holds the line.
        if self.db_client.get_review_by_job(job_id).await?.is_some() {
            return Err(ServiceError::ReviewAlreadyExists(job_id));
        }

        let comment = comment.map(|c| c.trim().to_string()).unwrap_or_default();
        validate_review(rating, &comment)?;

        let review = self
            .db_client
            .create_review(NewReview {
                job_id,
                needy_id: job.needy_id,
                provider_id,
                rating,
                comment,
            })
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => ServiceError::ReviewAlreadyExists(job_id),
                other => ServiceError::Storage(other),
            })?;

        match self.db_client.apply_provider_rating(provider_id, rating).await {
            Ok(Some(summary)) => tracing::info!(
                "Provider {} rating now {:.1} over {} reviews",
                provider_id,
                summary.average_rating,
                summary.total_reviews
            ),
            Ok(None) => tracing::error!(
                "Review {} saved but provider {} has no profile to update",
                review.id,
                provider_id
            ),
            Err(e) => tracing::error!(
                "Review {} saved but rating update for provider {} failed: {}",
                review.id,
                provider_id,
                e
            ),
        }

        Ok(review)
    }

    /// Public: reviews a provider has received, newest first, with their current summary.
    pub async fn list_reviews_for_provider(
        &self,
        provider_id: Uuid,
    ) -> Result<(RatingSummary, Vec<Review>), ServiceError> {
        let provider = self
            .db_client
            .get_user(provider_id)
            .await?
            .filter(|u| u.role == UserRole::Provider)
            .ok_or(ServiceError::ProviderNotFound(provider_id))?;

        let reviews = self.db_client.get_provider_reviews(provider_id).await?;
        Ok((provider.rating_summary(), reviews))
    }
}
