use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jobmodel::ServiceType;
use crate::utils::rating::rounded_mean;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum UserRole {
    Needy,
    Provider,
}

impl UserRole {
    pub fn to_str(&self) -> &str {
        match self {
            UserRole::Needy => "needy",
            UserRole::Provider => "provider",
        }
    }
}

/// Identity directory record. Credentials live with the auth service and never reach this crate.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,

    // Provider specific fields
    #[serde(default)]
    pub service_type: Option<ServiceType>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub hourly_rate: f64,
    #[serde(default)]
    pub available_days: Vec<String>,
    #[serde(default = "default_open_for_jobs")]
    pub is_open_for_jobs: bool,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub total_reviews: i32,
    #[serde(default, skip_serializing)]
    pub rating_sum: i64,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn default_open_for_jobs() -> bool {
    true
}

impl User {
    pub fn rating_summary(&self) -> RatingSummary {
        RatingSummary {
            average_rating: self.average_rating,
            total_reviews: self.total_reviews,
            rating_sum: self.rating_sum,
        }
    }
}

/// The authenticated caller, passed explicitly into every service operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: UserRole,
}

impl Actor {
    pub fn new(id: Uuid, role: UserRole) -> Self {
        Self { id, role }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Actor::new(user.id, user.role)
    }
}

/// Running rating aggregate stored on a provider's record.
///
/// `rating_sum` is kept next to the count so the rounded mean stays exact no
/// matter in which order reviews arrive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RatingSummary {
    pub average_rating: f64,
    pub total_reviews: i32,
    #[serde(skip_serializing)]
    pub rating_sum: i64,
}

impl RatingSummary {
    pub fn record(self, rating: i32) -> RatingSummary {
        let total_reviews = self.total_reviews + 1;
        let rating_sum = self.rating_sum + i64::from(rating);

        RatingSummary {
            average_rating: rounded_mean(rating_sum, i64::from(total_reviews)),
            total_reviews,
            rating_sum,
        }
    }
}

/// Enumerated partial update of a provider's profile. `None` leaves the stored value as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderProfileUpdate {
    pub hourly_rate: Option<f64>,
    pub available_days: Option<Vec<String>>,
    pub is_open_for_jobs: Option<bool>,
    pub location: Option<String>,
}

impl ProviderProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.hourly_rate.is_none()
            && self.available_days.is_none()
            && self.is_open_for_jobs.is_none()
            && self.location.is_none()
    }

    pub fn apply_to(&self, user: &mut User) {
        if let Some(rate) = self.hourly_rate {
            user.hourly_rate = rate;
        }
        if let Some(days) = &self.available_days {
            user.available_days = days.clone();
        }
        if let Some(open) = self.is_open_for_jobs {
            user.is_open_for_jobs = open;
        }
        if let Some(location) = &self.location {
            user.location = Some(location.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_summary_tracks_exact_mean() {
        let summary = [1, 1, 2, 1]
            .into_iter()
            .fold(RatingSummary::default(), RatingSummary::record);

        assert_eq!(summary.total_reviews, 4);
        assert_eq!(summary.rating_sum, 5);
        // 5 / 4 = 1.25 rounds half up
        assert_eq!(summary.average_rating, 1.3);
    }

    #[test]
    fn profile_update_only_touches_present_fields() {
        let mut user: User = serde_json::from_value(serde_json::json!({
            "id": Uuid::new_v4(),
            "name": "Ravi",
            "email": "ravi@example.com",
            "role": "Provider",
            "service_type": "Plumber",
            "hourly_rate": 300.0,
            "location": "Pune"
        }))
        .unwrap();

        let update = ProviderProfileUpdate {
            is_open_for_jobs: Some(false),
            ..Default::default()
        };
        update.apply_to(&mut user);

        assert!(!user.is_open_for_jobs);
        assert_eq!(user.hourly_rate, 300.0);
        assert_eq!(user.location.as_deref(), Some("Pune"));
        assert!(!update.is_empty());
        assert!(ProviderProfileUpdate::default().is_empty());
    }
}
