// service/provider_service.rs
use std::sync::Arc;

use validator::Validate;

use crate::{
    db::{jobdb::JobExt, reviewdb::ReviewExt, userdb::UserExt, Repository},
    dtos::userdtos::{ProviderAnalyticsDto, UpdateProviderProfileDto},
    models::{
        jobmodel::Job,
        usermodel::{Actor, ProviderProfileUpdate, User, UserRole},
    },
    service::error::ServiceError,
};

#[derive(Debug, Clone)]
pub struct ProviderService {
    db_client: Arc<dyn Repository>,
}

impl ProviderService {
    pub fn new(db_client: Arc<dyn Repository>) -> Self {
        Self { db_client }
    }

    async fn load_provider(&self, actor: &Actor) -> Result<User, ServiceError> {
        if actor.role != UserRole::Provider {
            return Err(ServiceError::Unauthorized(
                "only providers can access this resource".to_string(),
            ));
        }

        self.db_client
            .get_user(actor.id)
            .await?
            .ok_or(ServiceError::UserNotFound(actor.id))
    }

    /// Posted jobs matching the provider's trade. A provider who is closed for
    /// work, or has no trade on file, gets an empty feed.
    pub async fn list_jobs_for_provider(&self, actor: &Actor) -> Result<Vec<Job>, ServiceError> {
        let provider = self.load_provider(actor).await?;

        let service_type = match provider.service_type {
            Some(service_type) if provider.is_open_for_jobs => service_type,
            _ => {
                tracing::debug!("Provider {} is not taking jobs, empty feed", provider.id);
                return Ok(Vec::new());
            }
        };

        Ok(self
            .db_client
            .get_posted_jobs_by_service_type(service_type, provider.id)
            .await?)
    }

    pub async fn get_provider_analytics(
        &self,
        actor: &Actor,
    ) -> Result<ProviderAnalyticsDto, ServiceError> {
        let provider = self.load_provider(actor).await?;

        let earnings = self.db_client.get_provider_earnings(provider.id).await?;
        let reviews = self.db_client.get_provider_reviews(provider.id).await?;
        let job_history = self
            .db_client
            .get_provider_completed_jobs(provider.id)
            .await?;

        Ok(ProviderAnalyticsDto {
            total_earning: earnings.total_earning,
            completed_jobs_count: earnings.completed_jobs_count,
            average_rating: provider.average_rating,
            total_reviews: provider.total_reviews,
            reviews,
            job_history,
        })
    }

    /// Providers currently open for work, best rated first.
    pub async fn list_available_providers(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.db_client.get_open_providers().await?)
    }

    pub async fn update_provider_profile(
        &self,
        actor: &Actor,
        profile: UpdateProviderProfileDto,
    ) -> Result<User, ServiceError> {
        profile.validate()?;

        if actor.role != UserRole::Provider {
            return Err(ServiceError::Unauthorized(
                "only providers can update a provider profile".to_string(),
            ));
        }

        let update = ProviderProfileUpdate::from(profile);
        if update.is_empty() {
            return Err(ServiceError::Validation(
                "No profile fields to update".to_string(),
            ));
        }

        let user = self
            .db_client
            .update_provider_profile(actor.id, &update)
            .await?
            .ok_or(ServiceError::UserNotFound(actor.id))?;

        tracing::info!("Provider {} updated their profile", actor.id);
        Ok(user)
    }
}
