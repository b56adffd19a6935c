use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::validate_not_blank;
use crate::{
    models::{
        jobmodel::{Job, ServiceType},
        usermodel::User,
    },
    service::job_lifecycle::{JobAction, Trigger},
};

//Job Dto
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateJobDto {
    #[validate(
        length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"),
        custom = "validate_not_blank"
    )]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"), custom = "validate_not_blank")]
    pub description: String,

    #[validate(range(min = 0.0, message = "Budget must not be negative"))]
    pub budget: f64,

    #[validate(length(min = 1, message = "Location is required"), custom = "validate_not_blank")]
    pub location: String,

    pub required_service_type: ServiceType,
}

/// Direct booking. The service type comes from the provider's profile.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookProviderDto {
    #[validate(
        length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"),
        custom = "validate_not_blank"
    )]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"), custom = "validate_not_blank")]
    pub description: String,

    #[validate(range(min = 0.0, message = "Budget must not be negative"))]
    pub budget: f64,

    #[validate(length(min = 1, message = "Location is required"), custom = "validate_not_blank")]
    pub location: String,

    pub provider_id: Uuid,
}

/// What a provider can do to a job from their side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderAction {
    Proposal,
    Accept,
    Cancel,
}

impl From<ProviderAction> for JobAction {
    fn from(action: ProviderAction) -> Self {
        JobAction::provider(match action {
            ProviderAction::Proposal => Trigger::Propose,
            ProviderAction::Accept => Trigger::Accept,
            ProviderAction::Cancel => Trigger::Cancel,
        })
    }
}

/// Statuses a job owner may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeedyDecision {
    #[serde(alias = "Needy Accepted")]
    NeedyAccepted,
    Declined,
    Cancelled,
}

impl From<NeedyDecision> for JobAction {
    fn from(decision: NeedyDecision) -> Self {
        JobAction::needy(match decision {
            NeedyDecision::NeedyAccepted => Trigger::Accept,
            NeedyDecision::Declined => Trigger::Decline,
            NeedyDecision::Cancelled => Trigger::Cancel,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondToJobDto {
    pub action: ProviderAction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateJobStatusDto {
    #[serde(alias = "newStatus")]
    pub new_status: NeedyDecision,
}

/// The provider attached to a job, as its owner sees them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobProviderDto {
    pub id: Uuid,
    pub name: String,
    pub service_type: Option<ServiceType>,
    pub hourly_rate: f64,
}

impl JobProviderDto {
    pub fn from_user(user: &User) -> Self {
        JobProviderDto {
            id: user.id,
            name: user.name.clone(),
            service_type: user.service_type,
            hourly_rate: user.hourly_rate,
        }
    }
}

/// Who the provider is working for and how to reach them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobNeedyDto {
    pub id: Uuid,
    pub name: String,
    pub location: Option<String>,
    pub mobile_number: Option<String>,
}

impl JobNeedyDto {
    pub fn from_user(user: &User) -> Self {
        JobNeedyDto {
            id: user.id,
            name: user.name.clone(),
            location: user.location.clone(),
            mobile_number: user.mobile_number.clone(),
        }
    }
}

/// Row of the needy dashboard. `provider` is absent while nobody is attached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NeedyJobDto {
    #[serde(flatten)]
    pub job: Job,
    pub provider: Option<JobProviderDto>,
}

/// Row of the provider dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssignedJobDto {
    #[serde(flatten)]
    pub job: Job,
    pub needy: Option<JobNeedyDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: &str, data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
            data: Some(data),
        }
    }
}
