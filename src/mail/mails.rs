// mail/mails.rs
//! Notification bodies for job lifecycle events.
use crate::models::jobmodel::JobStatus;

const LAYOUT: &str = include_str!("templates/layout.html");
const PROPOSAL_SENT: &str = include_str!("templates/proposal-sent.html");
const BOOKING_CONFIRMED: &str = include_str!("templates/booking-confirmed.html");
const BOOKING_CANCELLED: &str = include_str!("templates/booking-cancelled.html");
const STATUS_UPDATE: &str = include_str!("templates/status-update.html");
const JOB_COMPLETED: &str = include_str!("templates/job-completed.html");
const DIRECT_BOOKING: &str = include_str!("templates/direct-booking.html");

#[derive(Debug, Clone, PartialEq)]
pub struct EmailContent {
    pub subject: String,
    pub html: String,
}

/// Replaces `{{key}}` markers. Values go through ammonia so user supplied text
/// cannot inject markup.
fn fill(template: &str, placeholders: &[(&str, &str)]) -> String {
    placeholders
        .iter()
        .fold(template.to_string(), |html, (key, value)| {
            html.replace(&format!("{{{{{}}}}}", key), &ammonia::clean(value))
        })
}

fn render(
    subject: String,
    heading: &str,
    body_template: &str,
    placeholders: &[(&str, &str)],
) -> EmailContent {
    let content = fill(body_template, placeholders);
    let html = fill(LAYOUT, &[("heading", heading)]).replace("{{content}}", &content);

    EmailContent { subject, html }
}

pub fn proposal_sent(needy_name: &str, provider_name: &str, job_title: &str) -> EmailContent {
    render(
        format!("Job Proposal Sent: {}", job_title),
        "Proposal Sent!",
        PROPOSAL_SENT,
        &[
            ("needy_name", needy_name),
            ("provider_name", provider_name),
            ("job_title", job_title),
        ],
    )
}

pub fn booking_confirmed(needy_name: &str, provider_name: &str, job_title: &str) -> EmailContent {
    render(
        format!("Booking CONFIRMED: {}", job_title),
        "Booking Confirmed!",
        BOOKING_CONFIRMED,
        &[
            ("needy_name", needy_name),
            ("provider_name", provider_name),
            ("job_title", job_title),
        ],
    )
}

pub fn booking_cancelled_by_provider(
    needy_name: &str,
    provider_name: &str,
    job_title: &str,
) -> EmailContent {
    render(
        format!("Booking CANCELLED by Provider: {}", job_title),
        "Booking Cancelled",
        BOOKING_CANCELLED,
        &[
            ("needy_name", needy_name),
            ("provider_name", provider_name),
            ("job_title", job_title),
        ],
    )
}

pub fn needy_status_update(
    provider_name: &str,
    needy_name: &str,
    job_title: &str,
    new_status: JobStatus,
) -> EmailContent {
    let (color, message) = match new_status {
        JobStatus::NeedyAccepted => ("green", "The job has been accepted and is ready to begin!"),
        JobStatus::Cancelled => ("red", "The job has been CANCELLED by the Needy user."),
        JobStatus::Declined => ("orange", "Your proposal was DECLINED by the Needy user."),
        _ => ("black", ""),
    };

    render(
        format!("Job Finalized: {}", job_title),
        "Job Status Update",
        STATUS_UPDATE,
        &[
            ("provider_name", provider_name),
            ("needy_name", needy_name),
            ("job_title", job_title),
            ("new_status", new_status.label()),
            ("status_color", color),
            ("status_message", message),
        ],
    )
}

pub fn job_completed(needy_name: &str, provider_name: &str, job_title: &str) -> EmailContent {
    render(
        format!("Job Completed: {} - Submit Review!", job_title),
        "Job Completed!",
        JOB_COMPLETED,
        &[
            ("needy_name", needy_name),
            ("provider_name", provider_name),
            ("job_title", job_title),
        ],
    )
}

pub fn direct_booking_received(
    provider_name: &str,
    needy_name: &str,
    needy_email: &str,
    job_title: &str,
) -> EmailContent {
    render(
        format!("NEW Direct Booking Request: {}", job_title),
        "Direct Booking Received!",
        DIRECT_BOOKING,
        &[
            ("provider_name", provider_name),
            ("needy_name", needy_name),
            ("needy_email", needy_email),
            ("job_title", job_title),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_filled_and_escaped() {
        let email = proposal_sent("Ada", "<script>alert(1)</script>", "Fix sink");

        assert_eq!(email.subject, "Job Proposal Sent: Fix sink");
        assert!(email.html.contains("Hi Ada,"));
        assert!(email.html.contains("Proposal Sent!"));
        assert!(!email.html.contains("<script>"));
        assert!(!email.html.contains("{{"));
    }

    #[test]
    fn status_update_describes_the_new_status() {
        let email = needy_status_update("Bob", "Ada", "Fix sink", JobStatus::Declined);

        assert_eq!(email.subject, "Job Finalized: Fix sink");
        assert!(email.html.contains("Declined"));
        assert!(email.html.contains("DECLINED by the Needy user"));
    }

    #[test]
    fn completion_prompts_for_review() {
        let email = job_completed("Ada", "Bob", "Paint fence");
        assert_eq!(email.subject, "Job Completed: Paint fence - Submit Review!");
        assert!(email.html.contains("leave a rating and review"));
    }
}
