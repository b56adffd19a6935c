// Shared fixtures for service and handler tests.
use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    db::{memory::MemoryStore, Repository},
    dtos::jobdtos::{CreateJobDto, NeedyDecision, ProviderAction},
    mail::sendmail::{MailError, Notifier},
    models::{
        jobmodel::{Job, ServiceType},
        usermodel::{Actor, User, UserRole},
    },
    service::{
        job_service::JobService, notification_service::NotificationService,
        provider_service::ProviderService, review_service::ReviewService,
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Captures every message instead of delivering it.
#[derive(Debug, Clone)]
pub struct RecordingNotifier {
    tx: mpsc::UnboundedSender<SentMail>,
}

impl RecordingNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SentMail>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(
        &self,
        to_email: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), MailError> {
        let _ = self.tx.send(SentMail {
            to: to_email.to_string(),
            subject: subject.to_string(),
            html: html_body.to_string(),
        });
        Ok(())
    }
}

/// Always fails, like a mail provider that is down.
#[derive(Debug, Clone, Default)]
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&self, _to: &str, _subject: &str, _html: &str) -> Result<(), MailError> {
        Err(MailError::Smtp("connection refused".to_string()))
    }
}

fn user(name: &str, role: UserRole, service_type: Option<ServiceType>) -> User {
    User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        role,
        service_type,
        location: Some("Pune".to_string()),
        mobile_number: None,
        hourly_rate: 0.0,
        available_days: Vec::new(),
        is_open_for_jobs: true,
        average_rating: 0.0,
        total_reviews: 0,
        rating_sum: 0,
        created_at: Utc::now(),
    }
}

pub fn needy(name: &str) -> User {
    user(name, UserRole::Needy, None)
}

pub fn provider(name: &str, service_type: ServiceType) -> User {
    User {
        hourly_rate: 250.0,
        ..user(name, UserRole::Provider, Some(service_type))
    }
}

pub fn actor(user: &User) -> Actor {
    Actor::from(user)
}

pub fn sink_job() -> CreateJobDto {
    CreateJobDto {
        title: "Fix sink".to_string(),
        description: "Kitchen sink is leaking".to_string(),
        budget: 500.0,
        location: "Pune".to_string(),
        required_service_type: ServiceType::Plumber,
    }
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub jobs: JobService,
    pub reviews: ReviewService,
    pub providers: ProviderService,
}

pub fn harness_with(users: Vec<User>, notifier: Arc<dyn Notifier>) -> Harness {
    let store = Arc::new(MemoryStore::with_users(users));
    let db_client: Arc<dyn Repository> = store.clone();
    let notification_service = Arc::new(NotificationService::new(db_client.clone(), notifier));

    Harness {
        store,
        jobs: JobService::new(db_client.clone(), notification_service),
        reviews: ReviewService::new(db_client.clone()),
        providers: ProviderService::new(db_client),
    }
}

pub fn harness(users: Vec<User>) -> (Harness, mpsc::UnboundedReceiver<SentMail>) {
    let (notifier, rx) = RecordingNotifier::new();
    (harness_with(users, Arc::new(notifier)), rx)
}

pub async fn next_mail(rx: &mut mpsc::UnboundedReceiver<SentMail>) -> SentMail {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for a notification")
        .expect("notifier channel closed")
}

impl Harness {
    /// Drives a posted job through propose, accept and complete.
    pub async fn completed_job(&self, owner: &User, worker: &User) -> Job {
        let job = self.jobs.post_job(&actor(owner), sink_job()).await.unwrap();
        self.jobs
            .respond_to_job(job.id, &actor(worker), ProviderAction::Proposal)
            .await
            .unwrap();
        self.jobs
            .update_job_status(job.id, &actor(owner), NeedyDecision::NeedyAccepted)
            .await
            .unwrap();
        self.jobs.complete_job(job.id, &actor(worker)).await.unwrap()
    }
}
