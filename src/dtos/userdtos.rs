use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validate_not_blank;
use crate::models::{
    jobmodel::{Job, ServiceType},
    reviewmodel::Review,
    usermodel::{ProviderProfileUpdate, User},
};

/// Public view of a user. Email and rating internals stay server side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterUserDto {
    pub id: String,
    pub name: String,
    pub role: String,
    pub service_type: Option<ServiceType>,
    pub location: Option<String>,
    pub hourly_rate: f64,
    pub available_days: Vec<String>,
    pub is_open_for_jobs: bool,
    pub average_rating: f64,
    pub total_reviews: i32,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl FilterUserDto {
    pub fn filter_user(user: &User) -> Self {
        FilterUserDto {
            id: user.id.to_string(),
            name: user.name.to_owned(),
            role: user.role.to_str().to_string(),
            service_type: user.service_type,
            location: user.location.clone(),
            hourly_rate: user.hourly_rate,
            available_days: user.available_days.clone(),
            is_open_for_jobs: user.is_open_for_jobs,
            average_rating: user.average_rating,
            total_reviews: user.total_reviews,
            created_at: user.created_at,
        }
    }

    pub fn filter_users(users: &[User]) -> Vec<FilterUserDto> {
        users.iter().map(FilterUserDto::filter_user).collect()
    }
}

/// The caller's own record, including contact details.
#[derive(Debug, Serialize, Deserialize)]
pub struct MeDto {
    pub email: String,
    pub mobile_number: Option<String>,
    #[serde(flatten)]
    pub profile: FilterUserDto,
}

impl MeDto {
    pub fn from_user(user: &User) -> Self {
        MeDto {
            email: user.email.clone(),
            mobile_number: user.mobile_number.clone(),
            profile: FilterUserDto::filter_user(user),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProviderProfileDto {
    #[validate(range(min = 0.0, message = "Hourly rate must not be negative"))]
    pub hourly_rate: Option<f64>,

    pub available_days: Option<Vec<String>>,

    pub is_open_for_jobs: Option<bool>,

    #[validate(
        length(min = 1, message = "Location cannot be empty"),
        custom = "validate_not_blank"
    )]
    pub location: Option<String>,
}

impl From<UpdateProviderProfileDto> for ProviderProfileUpdate {
    fn from(dto: UpdateProviderProfileDto) -> Self {
        ProviderProfileUpdate {
            hourly_rate: dto.hourly_rate,
            available_days: dto.available_days.map(|days| {
                days.into_iter()
                    .map(|d| d.trim().to_string())
                    .filter(|d| !d.is_empty())
                    .collect()
            }),
            is_open_for_jobs: dto.is_open_for_jobs,
            location: dto.location.map(|l| l.trim().to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderAnalyticsDto {
    pub total_earning: f64,
    pub completed_jobs_count: i64,
    pub average_rating: f64,
    pub total_reviews: i32,
    pub reviews: Vec<Review>,
    pub job_history: Vec<Job>,
}
