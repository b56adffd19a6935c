// db/memory.rs
//! Process-local store used when no database is configured and by the test suites.
//! Each collection sits behind its own lock so every write is a single atomic step.
use std::{collections::HashMap, path::Path};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{jobdb::JobExt, reviewdb::ReviewExt, userdb::UserExt, StoreError};
use crate::models::{jobmodel::*, reviewmodel::*, usermodel::*};

#[derive(Debug, Default)]
pub struct MemoryStore {
    // Insertion order doubles as the tie breaker for equal timestamps.
    jobs: RwLock<Vec<Job>>,
    reviews: RwLock<Vec<Review>>,
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users.into_iter().map(|u| (u.id, u)).collect()),
            ..Self::default()
        }
    }

    /// Loads a JSON array of identity records.
    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| StoreError::Backend(format!("failed to read seed file: {}", e)))?;
        let users: Vec<User> = serde_json::from_str(&raw)
            .map_err(|e| StoreError::Backend(format!("invalid seed file: {}", e)))?;

        Ok(Self::with_users(users))
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn user_ids(&self) -> Vec<(String, Uuid)> {
        let users = self.users.read().await;
        let mut ids: Vec<(String, Uuid)> = users.values().map(|u| (u.name.clone(), u.id)).collect();
        ids.sort();
        ids
    }
}

fn newest_first<'a>(items: impl DoubleEndedIterator<Item = &'a Job>) -> Vec<Job> {
    let mut jobs: Vec<Job> = items.rev().cloned().collect();
    jobs.sort_by(|a, b| b.date_posted.cmp(&a.date_posted));
    jobs
}

#[async_trait]
impl JobExt for MemoryStore {
    async fn create_job(&self, job: NewJob) -> Result<Job, StoreError> {
        let job = job.into_job();
        self.jobs.write().await.push(job.clone());
        Ok(job)
    }

    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<Job>, StoreError> {
        let jobs = self.jobs.read().await;
        Ok(jobs.iter().find(|j| j.id == job_id).cloned())
    }

    async fn transition_job(
        &self,
        job_id: Uuid,
        expected: JobStatus,
        next: JobStatus,
        provider_id: Option<Uuid>,
    ) -> Result<Option<Job>, StoreError> {
        let mut jobs = self.jobs.write().await;

        match jobs.iter_mut().find(|j| j.id == job_id) {
            Some(job) if job.status == expected => {
                job.status = next;
                job.provider_id = provider_id;
                Ok(Some(job.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn get_posted_jobs_by_service_type(
        &self,
        service_type: ServiceType,
        exclude_needy_id: Uuid,
    ) -> Result<Vec<Job>, StoreError> {
        let jobs = self.jobs.read().await;
        Ok(newest_first(jobs.iter().filter(|j| {
            j.status == JobStatus::Posted
                && j.required_service_type == service_type
                && j.needy_id != exclude_needy_id
        })))
    }

    async fn get_needy_jobs(&self, needy_id: Uuid) -> Result<Vec<Job>, StoreError> {
        let jobs = self.jobs.read().await;
        Ok(newest_first(jobs.iter().filter(|j| j.needy_id == needy_id)))
    }

    async fn get_provider_active_jobs(&self, provider_id: Uuid) -> Result<Vec<Job>, StoreError> {
        let jobs = self.jobs.read().await;
        let mut active: Vec<Job> = jobs
            .iter()
            .filter(|j| {
                j.provider_id == Some(provider_id) && !j.status.is_terminal()
            })
            .cloned()
            .collect();
        active.sort_by(|a, b| a.date_posted.cmp(&b.date_posted));
        Ok(active)
    }

    async fn get_provider_completed_jobs(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<Job>, StoreError> {
        let jobs = self.jobs.read().await;
        Ok(newest_first(jobs.iter().filter(|j| {
            j.provider_id == Some(provider_id) && j.status == JobStatus::Completed
        })))
    }

    async fn get_provider_earnings(
        &self,
        provider_id: Uuid,
    ) -> Result<ProviderEarnings, StoreError> {
        let jobs = self.jobs.read().await;
        Ok(jobs
            .iter()
            .filter(|j| j.provider_id == Some(provider_id) && j.status == JobStatus::Completed)
            .fold(ProviderEarnings::default(), |acc, j| ProviderEarnings {
                total_earning: acc.total_earning + j.budget,
                completed_jobs_count: acc.completed_jobs_count + 1,
            }))
    }
}

#[async_trait]
impl ReviewExt for MemoryStore {
    async fn create_review(&self, review: NewReview) -> Result<Review, StoreError> {
        let mut reviews = self.reviews.write().await;

        if reviews.iter().any(|r| r.job_id == review.job_id) {
            return Err(StoreError::UniqueViolation(format!(
                "review for job {} already exists",
                review.job_id
            )));
        }

        let review = review.into_review();
        reviews.push(review.clone());
        Ok(review)
    }

    async fn get_review_by_job(&self, job_id: Uuid) -> Result<Option<Review>, StoreError> {
        let reviews = self.reviews.read().await;
        Ok(reviews.iter().find(|r| r.job_id == job_id).cloned())
    }

    async fn get_provider_reviews(&self, provider_id: Uuid) -> Result<Vec<Review>, StoreError> {
        let reviews = self.reviews.read().await;
        let mut found: Vec<Review> = reviews
            .iter()
            .rev()
            .filter(|r| r.provider_id == provider_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.date_posted.cmp(&a.date_posted));
        Ok(found)
    }
}

#[async_trait]
impl UserExt for MemoryStore {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn get_open_providers(&self) -> Result<Vec<User>, StoreError> {
        let users = self.users.read().await;
        let mut providers: Vec<User> = users
            .values()
            .filter(|u| u.role == UserRole::Provider && u.is_open_for_jobs)
            .cloned()
            .collect();
        providers.sort_by(|a, b| {
            b.average_rating
                .total_cmp(&a.average_rating)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(providers)
    }

    async fn update_provider_profile(
        &self,
        provider_id: Uuid,
        update: &ProviderProfileUpdate,
    ) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;

        match users.get_mut(&provider_id) {
            Some(user) if user.role == UserRole::Provider => {
                update.apply_to(user);
                Ok(Some(user.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn apply_provider_rating(
        &self,
        provider_id: Uuid,
        rating: i32,
    ) -> Result<Option<RatingSummary>, StoreError> {
        let mut users = self.users.write().await;

        match users.get_mut(&provider_id) {
            Some(user) if user.role == UserRole::Provider => {
                let summary = user.rating_summary().record(rating);
                user.average_rating = summary.average_rating;
                user.total_reviews = summary.total_reviews;
                user.rating_sum = summary.rating_sum;
                Ok(Some(summary))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_job(needy_id: Uuid, status: JobStatus, provider_id: Option<Uuid>) -> NewJob {
        NewJob {
            needy_id,
            provider_id,
            title: "Fix sink".to_string(),
            description: "Kitchen sink is leaking".to_string(),
            location: "Pune".to_string(),
            budget: 500.0,
            required_service_type: ServiceType::Plumber,
            status,
        }
    }

    #[tokio::test]
    async fn transition_only_applies_to_expected_status() {
        let store = MemoryStore::new();
        let needy = Uuid::new_v4();
        let provider = Uuid::new_v4();
        let job = store
            .create_job(new_job(needy, JobStatus::Posted, None))
            .await
            .unwrap();

        let moved = store
            .transition_job(job.id, JobStatus::Posted, JobStatus::ProviderProposal, Some(provider))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(moved.status, JobStatus::ProviderProposal);
        assert_eq!(moved.provider_id, Some(provider));

        let stale = store
            .transition_job(
                job.id,
                JobStatus::Posted,
                JobStatus::ProviderProposal,
                Some(Uuid::new_v4()),
            )
            .await
            .unwrap();
        assert!(stale.is_none());

        let stored = store.get_job_by_id(job.id).await.unwrap().unwrap();
        assert_eq!(stored.provider_id, Some(provider));
    }

    #[tokio::test]
    async fn second_review_for_job_is_a_unique_violation() {
        let store = MemoryStore::new();
        let job_id = Uuid::new_v4();
        let review = NewReview {
            job_id,
            needy_id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            rating: 4,
            comment: String::new(),
        };

        store.create_review(review.clone()).await.unwrap();
        let err = store.create_review(review).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn earnings_default_to_zero() {
        let store = MemoryStore::new();
        let earnings = store.get_provider_earnings(Uuid::new_v4()).await.unwrap();
        assert_eq!(earnings, ProviderEarnings::default());
    }

    #[tokio::test]
    async fn seed_file_errors_are_reported() {
        let err = MemoryStore::from_seed_file("/nonexistent/seed.json").unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }
}
