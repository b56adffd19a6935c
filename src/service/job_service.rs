// service/job_service.rs
use std::{collections::HashMap, sync::Arc};

use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{jobdb::JobExt, userdb::UserExt, Repository},
    dtos::jobdtos::{
        AssignedJobDto, BookProviderDto, CreateJobDto, JobNeedyDto, JobProviderDto,
        NeedyDecision, NeedyJobDto, ProviderAction,
    },
    models::{
        jobmodel::{Job, JobStatus, NewJob, ServiceType},
        usermodel::{Actor, User, UserRole},
    },
    service::{
        error::ServiceError,
        job_lifecycle::{self, JobAction, Trigger},
        notification_service::NotificationService,
    },
};

#[derive(Debug, Clone)]
pub struct JobService {
    db_client: Arc<dyn Repository>,
    notification_service: Arc<NotificationService>,
}

fn require_role(actor: &Actor, role: UserRole, what: &str) -> Result<(), ServiceError> {
    if actor.role != role {
        return Err(ServiceError::Unauthorized(format!(
            "only {} users can {}",
            role.to_str(),
            what
        )));
    }
    Ok(())
}

impl JobService {
    pub fn new(
        db_client: Arc<dyn Repository>,
        notification_service: Arc<NotificationService>,
    ) -> Self {
        Self {
            db_client,
            notification_service,
        }
    }

    /// Open posting: the job starts unassigned and visible in provider feeds.
    pub async fn post_job(
        &self,
        actor: &Actor,
        job_data: CreateJobDto,
    ) -> Result<Job, ServiceError> {
        job_data.validate()?;
        require_role(actor, UserRole::Needy, "post jobs")?;

        let job = self
            .db_client
            .create_job(NewJob {
                needy_id: actor.id,
                provider_id: None,
                title: job_data.title.trim().to_string(),
                description: job_data.description.trim().to_string(),
                location: job_data.location.trim().to_string(),
                budget: job_data.budget,
                required_service_type: job_data.required_service_type,
                status: JobStatus::Posted,
            })
            .await?;

        tracing::info!(
            "Job {} posted by {} for {}",
            job.id,
            actor.id,
            job.required_service_type.to_str()
        );
        Ok(job)
    }

    /// Direct booking of a specific provider who is open for work.
    pub async fn book_provider(
        &self,
        actor: &Actor,
        booking: BookProviderDto,
    ) -> Result<Job, ServiceError> {
        booking.validate()?;
        require_role(actor, UserRole::Needy, "book providers")?;

        let provider = self
            .db_client
            .get_user(booking.provider_id)
            .await?
            .filter(|user| user.role == UserRole::Provider)
            .ok_or(ServiceError::ProviderNotFound(booking.provider_id))?;

        if !provider.is_open_for_jobs {
            return Err(ServiceError::ProviderUnavailable(provider.id));
        }

        let job = self
            .db_client
            .create_job(NewJob {
                needy_id: actor.id,
                provider_id: Some(provider.id),
                title: booking.title.trim().to_string(),
                description: booking.description.trim().to_string(),
                location: booking.location.trim().to_string(),
                budget: booking.budget,
                required_service_type: provider.service_type.unwrap_or(ServiceType::Other),
                status: JobStatus::Booked,
            })
            .await?;

        tracing::info!("Job {} booked directly with provider {}", job.id, provider.id);

        match self.db_client.get_user(actor.id).await {
            Ok(Some(needy)) => self
                .notification_service
                .notify_direct_booking(&job, &needy, &provider),
            Ok(None) => tracing::warn!("Booking notice skipped: needy {} not found", actor.id),
            Err(e) => tracing::warn!("Booking notice skipped for job {}: {}", job.id, e),
        }

        Ok(job)
    }

    /// Provider side: propose on a posted job, or accept/cancel a direct booking.
    pub async fn respond_to_job(
        &self,
        job_id: Uuid,
        actor: &Actor,
        action: ProviderAction,
    ) -> Result<Job, ServiceError> {
        self.apply_action(job_id, actor, action.into()).await
    }

    /// Needy side: accept or decline a proposal, or cancel an accepted job.
    pub async fn update_job_status(
        &self,
        job_id: Uuid,
        actor: &Actor,
        decision: NeedyDecision,
    ) -> Result<Job, ServiceError> {
        self.apply_action(job_id, actor, decision.into()).await
    }

    pub async fn complete_job(&self, job_id: Uuid, actor: &Actor) -> Result<Job, ServiceError> {
        self.apply_action(job_id, actor, JobAction::provider(Trigger::Complete))
            .await
    }

    async fn apply_action(
        &self,
        job_id: Uuid,
        actor: &Actor,
        action: JobAction,
    ) -> Result<Job, ServiceError> {
        // Role first, so a caller with the wrong role learns nothing about the job.
        if actor.role != action.role {
            return Err(ServiceError::Unauthorized(format!(
                "only {} users can {:?} a job",
                action.role.to_str(),
                action.trigger
            )));
        }

        let job = self
            .db_client
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        let transition = job_lifecycle::decide(&job, actor, action)?;

        let updated = match self
            .db_client
            .transition_job(job.id, transition.from, transition.to, transition.provider_id)
            .await?
        {
            Some(updated) => updated,
            None => {
                // Someone else moved the job between our read and the write.
                let current = self
                    .db_client
                    .get_job_by_id(job_id)
                    .await?
                    .ok_or(ServiceError::JobNotFound(job_id))?;

                tracing::warn!(
                    "Stale transition on job {}: expected {}, found {}",
                    job_id,
                    transition.from,
                    current.status
                );
                return Err(ServiceError::InvalidJobStatus {
                    job_id,
                    expected: transition.allowed_from.to_vec(),
                    actual: current.status,
                });
            }
        };

        tracing::info!(
            "Job {} moved {} -> {} by {} {}",
            job_id,
            transition.from,
            transition.to,
            actor.role.to_str(),
            actor.id
        );

        self.notification_service
            .notify_transition(&updated, &transition);

        Ok(updated)
    }

    /// The owner's jobs, newest first, each with the attached provider's details.
    pub async fn list_jobs_for_needy(
        &self,
        actor: &Actor,
    ) -> Result<Vec<NeedyJobDto>, ServiceError> {
        require_role(actor, UserRole::Needy, "view the needy dashboard")?;
        let jobs = self.db_client.get_needy_jobs(actor.id).await?;
        let providers = self.users_by_id(jobs.iter().filter_map(|j| j.provider_id)).await?;

        Ok(jobs
            .into_iter()
            .map(|job| NeedyJobDto {
                provider: job
                    .provider_id
                    .and_then(|id| providers.get(&id))
                    .map(JobProviderDto::from_user),
                job,
            })
            .collect())
    }

    /// Jobs the provider is currently attached to, oldest first, with the owner's contact details.
    pub async fn list_assigned_jobs(
        &self,
        actor: &Actor,
    ) -> Result<Vec<AssignedJobDto>, ServiceError> {
        require_role(actor, UserRole::Provider, "view the provider dashboard")?;
        let jobs = self.db_client.get_provider_active_jobs(actor.id).await?;
        let owners = self.users_by_id(jobs.iter().map(|j| j.needy_id)).await?;

        Ok(jobs
            .into_iter()
            .map(|job| AssignedJobDto {
                needy: owners.get(&job.needy_id).map(JobNeedyDto::from_user),
                job,
            })
            .collect())
    }

    /// Loads each distinct user once. Ids with no record are left out.
    async fn users_by_id(
        &self,
        ids: impl Iterator<Item = Uuid>,
    ) -> Result<HashMap<Uuid, User>, ServiceError> {
        let mut users = HashMap::new();
        for id in ids {
            if users.contains_key(&id) {
                continue;
            }
            if let Some(user) = self.db_client.get_user(id).await? {
                users.insert(id, user);
            }
        }
        Ok(users)
    }

    pub async fn get_job(&self, job_id: Uuid, actor: &Actor) -> Result<Job, ServiceError> {
        let job = self
            .db_client
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        let visible = job.needy_id == actor.id || job.provider_id == Some(actor.id);
        if !visible {
            return Err(ServiceError::Unauthorized(
                "not a party to this job".to_string(),
            ));
        }

        Ok(job)
    }
}
