// service/notification_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{userdb::UserExt, Repository},
    mail::{
        mails::{self, EmailContent},
        sendmail::Notifier,
    },
    models::{
        jobmodel::{Job, JobStatus},
        usermodel::User,
    },
    service::job_lifecycle::{Transition, Trigger},
};

/// Turns committed job changes into emails. Delivery runs on a detached task, so
/// neither lookup nor send failures can reach the caller.
#[derive(Debug, Clone)]
pub struct NotificationService {
    db_client: Arc<dyn Repository>,
    notifier: Arc<dyn Notifier>,
}

impl NotificationService {
    pub fn new(db_client: Arc<dyn Repository>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            db_client,
            notifier,
        }
    }

    /// Emits the single notification owed for a committed transition.
    pub fn notify_transition(&self, job: &Job, transition: &Transition) {
        let Some(recipient_id) = transition.recipient else {
            tracing::debug!("Job {} moved to {} with nobody to notify", job.id, transition.to);
            return;
        };

        let service = self.clone();
        let job = job.clone();
        let transition = transition.clone();

        tokio::spawn(async move {
            service.deliver_transition(job, transition, recipient_id).await;
        });
    }

    /// Tells a provider they were booked directly.
    pub fn notify_direct_booking(&self, job: &Job, needy: &User, provider: &User) {
        let email = mails::direct_booking_received(
            &provider.name,
            &needy.name,
            &needy.email,
            &job.title,
        );
        self.dispatch(job.id, provider.email.clone(), email);
    }

    async fn deliver_transition(&self, job: Job, transition: Transition, recipient_id: Uuid) {
        let Some(recipient) = self.lookup(recipient_id).await else {
            return;
        };
        let actor_name = self
            .lookup(transition.actor_id)
            .await
            .map(|u| u.name)
            .unwrap_or_else(|| "A Servease user".to_string());

        let email = compose(&transition, &job.title, &recipient, &actor_name);
        self.send(job.id, &recipient.email, email).await;
    }

    async fn lookup(&self, user_id: Uuid) -> Option<User> {
        match self.db_client.get_user(user_id).await {
            Ok(Some(user)) => Some(user),
            Ok(None) => {
                tracing::warn!("Notification skipped: user {} not found", user_id);
                None
            }
            Err(e) => {
                tracing::warn!("Notification skipped: failed to load user {}: {}", user_id, e);
                None
            }
        }
    }

    fn dispatch(&self, job_id: Uuid, to_email: String, email: EmailContent) {
        let service = self.clone();
        tokio::spawn(async move {
            service.send(job_id, &to_email, email).await;
        });
    }

    async fn send(&self, job_id: Uuid, to_email: &str, email: EmailContent) {
        match self.notifier.notify(to_email, &email.subject, &email.html).await {
            Ok(()) => tracing::info!("Notification '{}' sent for job {}", email.subject, job_id),
            Err(e) => tracing::warn!(
                "Email failed after successful update for job {}: {}",
                job_id,
                e
            ),
        }
    }
}

fn compose(
    transition: &Transition,
    job_title: &str,
    recipient: &User,
    actor_name: &str,
) -> EmailContent {
    match (transition.action.trigger, transition.to) {
        (Trigger::Propose, _) => mails::proposal_sent(&recipient.name, actor_name, job_title),
        (Trigger::Accept, JobStatus::ProviderAccepted) => {
            mails::booking_confirmed(&recipient.name, actor_name, job_title)
        }
        (Trigger::Cancel, _) if transition.from == JobStatus::Booked => {
            mails::booking_cancelled_by_provider(&recipient.name, actor_name, job_title)
        }
        (Trigger::Complete, _) => mails::job_completed(&recipient.name, actor_name, job_title),
        (Trigger::Accept | Trigger::Decline | Trigger::Cancel, to) => {
            mails::needy_status_update(&recipient.name, actor_name, job_title, to)
        }
    }
}
