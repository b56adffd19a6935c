// mail/sendmail.rs
use std::{fmt, sync::LazyLock};

use async_trait::async_trait;
use regex::Regex;
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{Config, SmtpConfig};

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

static EMAIL_REGEX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok());

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid email address: {0}")]
    InvalidRecipient(String),

    #[error("Resend delivery failed: {0}")]
    Resend(String),

    #[error("SMTP delivery failed: {0}")]
    Smtp(String),

    #[error("No mail transport configured")]
    NotConfigured,
}

/// Outbound delivery of a rendered message. Callers treat failures as best effort.
#[async_trait]
pub trait Notifier: fmt::Debug + Send + Sync {
    async fn notify(&self, to_email: &str, subject: &str, html_body: &str) -> Result<(), MailError>;
}

pub fn validate_email(email: &str) -> Result<(), MailError> {
    match EMAIL_REGEX.as_ref() {
        Some(regex) if regex.is_match(email) => Ok(()),
        _ => Err(MailError::InvalidRecipient(email.to_string())),
    }
}

/// Sends through Resend first and falls back to SMTP when that fails or is not configured.
#[derive(Clone)]
pub struct MailNotifier {
    client: reqwest::Client,
    from_email: String,
    resend_api_key: Option<String>,
    smtp: Option<SmtpConfig>,
}

impl fmt::Debug for MailNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailNotifier")
            .field("from_email", &self.from_email)
            .field("resend", &self.resend_api_key.is_some())
            .field("smtp_host", &self.smtp.as_ref().map(|s| s.host.as_str()))
            .finish()
    }
}

impl MailNotifier {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            from_email: config.from_email.clone(),
            resend_api_key: config.resend_api_key.clone(),
            smtp: config.smtp.clone(),
        }
    }

    async fn send_via_resend(
        &self,
        api_key: &str,
        to_email: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<String, MailError> {
        let request_body = json!({
            "from": self.from_email,
            "to": to_email,
            "subject": subject,
            "html": html_body,
        });

        let response = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| MailError::Resend(format!("network error: {}", e)))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .unwrap_or_else(|_| "No response body".to_string());

        if !status.is_success() {
            return Err(MailError::Resend(format!(
                "HTTP {}: {}",
                status.as_u16(),
                response_text
            )));
        }

        let email_id = serde_json::from_str::<serde_json::Value>(&response_text)
            .ok()
            .and_then(|body| body.get("id").and_then(|v| v.as_str()).map(str::to_string))
            .unwrap_or_else(|| "unknown".to_string());

        Ok(email_id)
    }

    async fn send_via_smtp(
        &self,
        smtp: &SmtpConfig,
        to_email: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), MailError> {
        use lettre::{
            message::{header::ContentType, Mailbox},
            transport::smtp::authentication::Credentials,
            Message, SmtpTransport, Transport,
        };

        let email = Message::builder()
            .from(self.from_email.parse::<Mailbox>().map_err(smtp_err)?)
            .to(to_email.parse::<Mailbox>().map_err(smtp_err)?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(smtp_err)?;

        let builder = if smtp.port == 465 {
            SmtpTransport::relay(&smtp.host)
        } else {
            SmtpTransport::starttls_relay(&smtp.host)
        }
        .map_err(smtp_err)?;

        let mailer = builder
            .port(smtp.port)
            .credentials(Credentials::new(
                smtp.username.clone(),
                smtp.password.clone(),
            ))
            .build();

        // lettre's SmtpTransport is blocking
        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(smtp_err)?
            .map_err(smtp_err)?;

        Ok(())
    }
}

fn smtp_err(e: impl fmt::Display) -> MailError {
    MailError::Smtp(e.to_string())
}

#[async_trait]
impl Notifier for MailNotifier {
    async fn notify(
        &self,
        to_email: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), MailError> {
        validate_email(to_email)?;

        let mut last_error = None;

        if let Some(api_key) = &self.resend_api_key {
            match self.send_via_resend(api_key, to_email, subject, html_body).await {
                Ok(email_id) => {
                    info!("Email sent via Resend to {} (id: {})", to_email, email_id);
                    return Ok(());
                }
                Err(e) => {
                    warn!("Resend failed, trying SMTP fallback: {}", e);
                    last_error = Some(e);
                }
            }
        }

        if let Some(smtp) = &self.smtp {
            return match self.send_via_smtp(smtp, to_email, subject, html_body).await {
                Ok(()) => {
                    info!("Email sent via SMTP to {}", to_email);
                    Ok(())
                }
                Err(e) => Err(last_error.unwrap_or(e)),
            };
        }

        Err(last_error.unwrap_or(MailError::NotConfigured))
    }
}

/// Writes messages to the log instead of delivering them.
/// Used when no mail transport is configured.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(
        &self,
        to_email: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), MailError> {
        info!(
            to = to_email,
            subject = subject,
            bytes = html_body.len(),
            "Notification (mail delivery disabled)"
        );
        Ok(())
    }
}
