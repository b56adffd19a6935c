use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_COMMENT_LENGTH: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, PartialEq)]
pub struct Review {
    pub id: Uuid,
    pub job_id: Uuid,
    pub needy_id: Uuid,
    pub provider_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub date_posted: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub job_id: Uuid,
    pub needy_id: Uuid,
    pub provider_id: Uuid,
    pub rating: i32,
    pub comment: String,
}

impl NewReview {
    pub fn into_review(self) -> Review {
        Review {
            id: Uuid::new_v4(),
            job_id: self.job_id,
            needy_id: self.needy_id,
            provider_id: self.provider_id,
            rating: self.rating,
            comment: self.comment,
            date_posted: Utc::now(),
        }
    }
}
