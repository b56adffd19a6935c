// service/job_lifecycle.rs
//! Transition rules for a job. Nothing in here touches storage or notifications,
//! `decide` maps (job, actor, action) to the next state or a typed error.
use uuid::Uuid;

use crate::{
    models::{
        jobmodel::{Job, JobStatus},
        usermodel::{Actor, UserRole},
    },
    service::error::ServiceError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Propose,
    Accept,
    Decline,
    Cancel,
    Complete,
}

/// A trigger together with the role it is issued as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobAction {
    pub role: UserRole,
    pub trigger: Trigger,
}

impl JobAction {
    pub const fn provider(trigger: Trigger) -> Self {
        Self {
            role: UserRole::Provider,
            trigger,
        }
    }

    pub const fn needy(trigger: Trigger) -> Self {
        Self {
            role: UserRole::Needy,
            trigger,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProviderEffect {
    Keep,
    AssignActor,
    Clear,
}

struct Rule {
    action: JobAction,
    from: &'static [JobStatus],
    to: JobStatus,
    provider: ProviderEffect,
}

const RULES: &[Rule] = &[
    Rule {
        action: JobAction::provider(Trigger::Propose),
        from: &[JobStatus::Posted],
        to: JobStatus::ProviderProposal,
        provider: ProviderEffect::AssignActor,
    },
    Rule {
        action: JobAction::needy(Trigger::Accept),
        from: &[JobStatus::ProviderProposal],
        to: JobStatus::NeedyAccepted,
        provider: ProviderEffect::Keep,
    },
    Rule {
        action: JobAction::needy(Trigger::Decline),
        from: &[JobStatus::ProviderProposal],
        to: JobStatus::Declined,
        provider: ProviderEffect::Clear,
    },
    Rule {
        action: JobAction::provider(Trigger::Accept),
        from: &[JobStatus::Booked],
        to: JobStatus::ProviderAccepted,
        provider: ProviderEffect::Keep,
    },
    Rule {
        action: JobAction::provider(Trigger::Cancel),
        from: &[JobStatus::Booked],
        to: JobStatus::Cancelled,
        provider: ProviderEffect::Clear,
    },
    Rule {
        action: JobAction::needy(Trigger::Cancel),
        from: &[JobStatus::ProviderAccepted, JobStatus::NeedyAccepted],
        to: JobStatus::Cancelled,
        provider: ProviderEffect::Clear,
    },
    Rule {
        action: JobAction::provider(Trigger::Complete),
        from: &[JobStatus::ProviderAccepted, JobStatus::NeedyAccepted],
        to: JobStatus::Completed,
        provider: ProviderEffect::Keep,
    },
];

/// The outcome of a legal transition, ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub job_id: Uuid,
    pub actor_id: Uuid,
    pub action: JobAction,
    pub from: JobStatus,
    pub to: JobStatus,
    /// Statuses the trigger is defined for, kept for stale-write reporting.
    pub allowed_from: &'static [JobStatus],
    /// `provider_id` as it must be stored after the transition.
    pub provider_id: Option<Uuid>,
    /// Counterparty to notify: the owner when a provider acted, the provider
    /// assigned before the transition when the owner acted.
    pub recipient: Option<Uuid>,
}

/// Checks, in order: role, ownership, current status.
pub fn decide(job: &Job, actor: &Actor, action: JobAction) -> Result<Transition, ServiceError> {
    if actor.role != action.role {
        return Err(ServiceError::Unauthorized(format!(
            "only {} users can {:?} a job",
            action.role.to_str(),
            action.trigger
        )));
    }

    let rule = RULES
        .iter()
        .find(|r| r.action == action)
        .ok_or_else(|| {
            ServiceError::Unauthorized(format!(
                "{} users cannot {:?} a job",
                action.role.to_str(),
                action.trigger
            ))
        })?;

    check_ownership(job, actor, rule)?;

    if !rule.from.contains(&job.status) {
        return Err(ServiceError::InvalidJobStatus {
            job_id: job.id,
            expected: rule.from.to_vec(),
            actual: job.status,
        });
    }

    let provider_id = match rule.provider {
        ProviderEffect::Keep => job.provider_id,
        ProviderEffect::AssignActor => Some(actor.id),
        ProviderEffect::Clear => None,
    };

    let recipient = match actor.role {
        UserRole::Provider => Some(job.needy_id),
        UserRole::Needy => job.provider_id,
    };

    Ok(Transition {
        job_id: job.id,
        actor_id: actor.id,
        action,
        from: job.status,
        to: rule.to,
        allowed_from: rule.from,
        provider_id,
        recipient,
    })
}

fn check_ownership(job: &Job, actor: &Actor, rule: &Rule) -> Result<(), ServiceError> {
    match actor.role {
        UserRole::Needy if job.needy_id != actor.id => Err(ServiceError::Unauthorized(
            "not the job owner".to_string(),
        )),
        // Proposing is open to any provider; the status check decides.
        UserRole::Provider if rule.provider == ProviderEffect::AssignActor => Ok(()),
        // An unassigned job cannot belong to anyone, so the status check reports it.
        UserRole::Provider => match job.provider_id {
            Some(assigned) if assigned != actor.id => Err(ServiceError::Unauthorized(
                "not the assigned provider for this job".to_string(),
            )),
            _ => Ok(()),
        },
        _ => Ok(()),
    }
}
