use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{reviewmodel::Review, usermodel::RatingSummary};

/// Rating and comment bounds are enforced by the review service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReviewDto {
    pub job_id: Uuid,
    pub rating: i32,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProviderReviewsDto {
    pub provider_id: Uuid,
    pub rating: RatingSummary,
    pub reviews: Vec<Review>,
}
