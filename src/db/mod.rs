pub mod db;
pub mod jobdb;
pub mod memory;
pub mod reviewdb;
pub mod userdb;

use thiserror::Error;

use self::{jobdb::JobExt, reviewdb::ReviewExt, userdb::UserExt};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Lifts a sqlx error, keeping unique violations distinguishable from other failures.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::UniqueViolation(db_err.message().to_string())
            }
            _ => StoreError::Database(err),
        }
    }
}

/// Everything the services need from persistence, in one object-safe bundle.
pub trait Repository: JobExt + ReviewExt + UserExt + std::fmt::Debug + Send + Sync {}

impl<T> Repository for T where T: JobExt + ReviewExt + UserExt + std::fmt::Debug + Send + Sync {}
