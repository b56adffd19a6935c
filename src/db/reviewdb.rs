// db/reviewdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::{db::DBClient, StoreError};
use crate::models::reviewmodel::*;

#[async_trait]
pub trait ReviewExt {
    /// Inserts a review. A second review for the same job fails with
    /// `StoreError::UniqueViolation`.
    async fn create_review(&self, review: NewReview) -> Result<Review, StoreError>;

    async fn get_review_by_job(&self, job_id: Uuid) -> Result<Option<Review>, StoreError>;

    async fn get_provider_reviews(&self, provider_id: Uuid) -> Result<Vec<Review>, StoreError>;
}

#[async_trait]
impl ReviewExt for DBClient {
    async fn create_review(&self, review: NewReview) -> Result<Review, StoreError> {
        let review = review.into_review();

        sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews
            (id, job_id, needy_id, provider_id, rating, comment, date_posted)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, job_id, needy_id, provider_id, rating, comment, date_posted
            "#,
        )
        .bind(review.id)
        .bind(review.job_id)
        .bind(review.needy_id)
        .bind(review.provider_id)
        .bind(review.rating)
        .bind(&review.comment)
        .bind(review.date_posted)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)
    }

    async fn get_review_by_job(&self, job_id: Uuid) -> Result<Option<Review>, StoreError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, job_id, needy_id, provider_id, rating, comment, date_posted
            FROM reviews
            WHERE job_id = $1
            "#,
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    async fn get_provider_reviews(&self, provider_id: Uuid) -> Result<Vec<Review>, StoreError> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, job_id, needy_id, provider_id, rating, comment, date_posted
            FROM reviews
            WHERE provider_id = $1
            ORDER BY date_posted DESC
            "#,
        )
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }
}
