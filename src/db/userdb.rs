// db/userdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::{db::DBClient, StoreError};
use crate::models::usermodel::*;

#[async_trait]
pub trait UserExt {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, StoreError>;

    async fn get_open_providers(&self) -> Result<Vec<User>, StoreError>;

    /// Applies the present fields of `update` to a provider record.
    /// Returns `None` when no provider with that id exists.
    async fn update_provider_profile(
        &self,
        provider_id: Uuid,
        update: &ProviderProfileUpdate,
    ) -> Result<Option<User>, StoreError>;

    /// Folds one rating into the provider's summary as a single atomic step.
    async fn apply_provider_rating(
        &self,
        provider_id: Uuid,
        rating: i32,
    ) -> Result<Option<RatingSummary>, StoreError>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, role, service_type, location, mobile_number, hourly_rate,
                available_days, is_open_for_jobs, average_rating, total_reviews, rating_sum,
                created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_open_providers(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, role, service_type, location, mobile_number, hourly_rate,
                available_days, is_open_for_jobs, average_rating, total_reviews, rating_sum,
                created_at
            FROM users
            WHERE role = 'provider' AND is_open_for_jobs = true
            ORDER BY average_rating DESC, name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn update_provider_profile(
        &self,
        provider_id: Uuid,
        update: &ProviderProfileUpdate,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET hourly_rate = COALESCE($2, hourly_rate),
                available_days = COALESCE($3, available_days),
                is_open_for_jobs = COALESCE($4, is_open_for_jobs),
                location = COALESCE($5, location)
            WHERE id = $1 AND role = 'provider'
            RETURNING id, name, email, role, service_type, location, mobile_number, hourly_rate,
                available_days, is_open_for_jobs, average_rating, total_reviews, rating_sum,
                created_at
            "#,
        )
        .bind(provider_id)
        .bind(update.hourly_rate)
        .bind(update.available_days.as_deref())
        .bind(update.is_open_for_jobs)
        .bind(update.location.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn apply_provider_rating(
        &self,
        provider_id: Uuid,
        rating: i32,
    ) -> Result<Option<RatingSummary>, StoreError> {
        // SET expressions read the pre-update row, so this is one read-modify-write.
        let row: Option<(f64, i32, i64)> = sqlx::query_as(
            r#"
            UPDATE users
            SET total_reviews = total_reviews + 1,
                rating_sum = rating_sum + $2,
                average_rating = (((rating_sum + $2) * 20 + (total_reviews + 1))
                    / (2 * (total_reviews + 1)))::DOUBLE PRECISION / 10
            WHERE id = $1 AND role = 'provider'
            RETURNING average_rating, total_reviews, rating_sum
            "#,
        )
        .bind(provider_id)
        .bind(i64::from(rating))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(average_rating, total_reviews, rating_sum)| RatingSummary {
            average_rating,
            total_reviews,
            rating_sum,
        }))
    }
}
