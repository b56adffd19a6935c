use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "service_type", rename_all = "snake_case")]
pub enum ServiceType {
    Plumber,
    Electrician,
    Carpenter,
    Painter,
    Other,
}

impl ServiceType {
    pub fn to_str(&self) -> &str {
        match self {
            ServiceType::Plumber => "plumber",
            ServiceType::Electrician => "electrician",
            ServiceType::Carpenter => "carpenter",
            ServiceType::Painter => "painter",
            ServiceType::Other => "other",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "job_status", rename_all = "snake_case")]
pub enum JobStatus {
    Posted,
    Booked,
    ProviderProposal,
    ProviderAccepted,
    NeedyAccepted,
    Declined,
    Cancelled,
    Completed,
}

impl JobStatus {
    /// Human readable label used in notifications.
    pub fn label(&self) -> &str {
        match self {
            JobStatus::Posted => "Posted",
            JobStatus::Booked => "Booked",
            JobStatus::ProviderProposal => "Provider Proposal",
            JobStatus::ProviderAccepted => "Provider Accepted",
            JobStatus::NeedyAccepted => "Needy Accepted",
            JobStatus::Declined => "Declined",
            JobStatus::Cancelled => "Cancelled",
            JobStatus::Completed => "Completed",
        }
    }

    /// Statuses in which a job must carry an assigned provider.
    pub fn requires_provider(&self) -> bool {
        matches!(
            self,
            JobStatus::Booked
                | JobStatus::ProviderProposal
                | JobStatus::ProviderAccepted
                | JobStatus::NeedyAccepted
                | JobStatus::Completed
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Declined | JobStatus::Cancelled
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, PartialEq)]
pub struct Job {
    pub id: Uuid,
    pub needy_id: Uuid,
    pub provider_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub location: String,
    pub budget: f64,
    pub required_service_type: ServiceType,
    pub status: JobStatus,
    pub date_posted: DateTime<Utc>,
}

/// A job ready to be inserted. Only the two creation paths build one.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub needy_id: Uuid,
    pub provider_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub location: String,
    pub budget: f64,
    pub required_service_type: ServiceType,
    pub status: JobStatus,
}

impl NewJob {
    pub fn into_job(self) -> Job {
        Job {
            id: Uuid::new_v4(),
            needy_id: self.needy_id,
            provider_id: self.provider_id,
            title: self.title,
            description: self.description,
            location: self.location,
            budget: self.budget,
            required_service_type: self.required_service_type,
            status: self.status,
            date_posted: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ProviderEarnings {
    pub total_earning: f64,
    pub completed_jobs_count: i64,
}
