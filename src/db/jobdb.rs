// db/jobdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::{db::DBClient, StoreError};
use crate::models::jobmodel::*;

#[async_trait]
pub trait JobExt {
    async fn create_job(&self, job: NewJob) -> Result<Job, StoreError>;

    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<Job>, StoreError>;

    /// Conditional update: applies only while the stored status still equals `expected`.
    /// Returns `None` when the job is missing or its status moved on.
    async fn transition_job(
        &self,
        job_id: Uuid,
        expected: JobStatus,
        next: JobStatus,
        provider_id: Option<Uuid>,
    ) -> Result<Option<Job>, StoreError>;

    /// Posted jobs for a service type, newest first, skipping jobs owned by `exclude_needy_id`.
    async fn get_posted_jobs_by_service_type(
        &self,
        service_type: ServiceType,
        exclude_needy_id: Uuid,
    ) -> Result<Vec<Job>, StoreError>;

    async fn get_needy_jobs(&self, needy_id: Uuid) -> Result<Vec<Job>, StoreError>;

    /// Jobs still open for the provider (neither completed nor cancelled), oldest first.
    async fn get_provider_active_jobs(&self, provider_id: Uuid) -> Result<Vec<Job>, StoreError>;

    async fn get_provider_completed_jobs(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<Job>, StoreError>;

    async fn get_provider_earnings(
        &self,
        provider_id: Uuid,
    ) -> Result<ProviderEarnings, StoreError>;
}

#[async_trait]
impl JobExt for DBClient {
    async fn create_job(&self, job: NewJob) -> Result<Job, StoreError> {
        let job = job.into_job();

        sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs
            (id, needy_id, provider_id, title, description, location, budget,
                required_service_type, status, date_posted)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, needy_id, provider_id, title, description, location, budget,
                required_service_type, status, date_posted
            "#,
        )
        .bind(job.id)
        .bind(job.needy_id)
        .bind(job.provider_id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.location)
        .bind(job.budget)
        .bind(job.required_service_type)
        .bind(job.status)
        .bind(job.date_posted)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)
    }

    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<Job>, StoreError> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, needy_id, provider_id, title, description, location, budget,
                required_service_type, status, date_posted
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(job)
    }

    async fn transition_job(
        &self,
        job_id: Uuid,
        expected: JobStatus,
        next: JobStatus,
        provider_id: Option<Uuid>,
    ) -> Result<Option<Job>, StoreError> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET status = $3, provider_id = $4
            WHERE id = $1 AND status = $2
            RETURNING id, needy_id, provider_id, title, description, location, budget,
                required_service_type, status, date_posted
            "#,
        )
        .bind(job_id)
        .bind(expected)
        .bind(next)
        .bind(provider_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(job)
    }

    async fn get_posted_jobs_by_service_type(
        &self,
        service_type: ServiceType,
        exclude_needy_id: Uuid,
    ) -> Result<Vec<Job>, StoreError> {
        let jobs = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, needy_id, provider_id, title, description, location, budget,
                required_service_type, status, date_posted
            FROM jobs
            WHERE status = 'posted' AND required_service_type = $1 AND needy_id <> $2
            ORDER BY date_posted DESC
            "#,
        )
        .bind(service_type)
        .bind(exclude_needy_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(jobs)
    }

    async fn get_needy_jobs(&self, needy_id: Uuid) -> Result<Vec<Job>, StoreError> {
        let jobs = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, needy_id, provider_id, title, description, location, budget,
                required_service_type, status, date_posted
            FROM jobs
            WHERE needy_id = $1
            ORDER BY date_posted DESC
            "#,
        )
        .bind(needy_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(jobs)
    }

    async fn get_provider_active_jobs(&self, provider_id: Uuid) -> Result<Vec<Job>, StoreError> {
        let jobs = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, needy_id, provider_id, title, description, location, budget,
                required_service_type, status, date_posted
            FROM jobs
            WHERE provider_id = $1 AND status NOT IN ('completed', 'cancelled')
            ORDER BY date_posted ASC
            "#,
        )
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(jobs)
    }

    async fn get_provider_completed_jobs(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<Job>, StoreError> {
        let jobs = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, needy_id, provider_id, title, description, location, budget,
                required_service_type, status, date_posted
            FROM jobs
            WHERE provider_id = $1 AND status = 'completed'
            ORDER BY date_posted DESC
            "#,
        )
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(jobs)
    }

    async fn get_provider_earnings(
        &self,
        provider_id: Uuid,
    ) -> Result<ProviderEarnings, StoreError> {
        let (total_earning, completed_jobs_count): (f64, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(budget), 0)::DOUBLE PRECISION, COUNT(*)
            FROM jobs
            WHERE provider_id = $1 AND status = 'completed'
            "#,
        )
        .bind(provider_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(ProviderEarnings {
            total_earning,
            completed_jobs_count,
        })
    }
}
