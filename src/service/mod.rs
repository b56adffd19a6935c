pub mod error;
pub mod job_lifecycle;
pub mod job_service;
pub mod notification_service;
pub mod provider_service;
pub mod review_service;

#[cfg(test)]
pub mod test_support;
