// config.rs
use anyhow::{anyhow, Context, Result};

const DEFAULT_FROM_EMAIL: &str = "Servease <noreply@servease.app>";

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres is optional; without it the server runs on the in-memory store.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_maxage: i64,
    pub port: u16,
    // Email service configurations
    pub from_email: String,
    pub resend_api_key: Option<String>,
    pub smtp: Option<SmtpConfig>,
    pub seed_users_file: Option<String>,
    /// Print a bearer token per seeded user at startup. Only honoured on the in-memory store.
    pub issue_dev_tokens: bool,
    pub cors_origins: Vec<String>,
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{} has an invalid value: {}", key, raw)),
        None => Ok(default),
    }
}

impl Config {
    pub fn init() -> Result<Config> {
        let jwt_secret =
            optional("JWT_SECRET_KEY").ok_or_else(|| anyhow!("JWT_SECRET_KEY must be set"))?;
        let jwt_maxage = parsed("JWT_MAXAGE", 60i64)?;
        let port = parsed("PORT", 8000u16)?;

        let smtp = match optional("SMTP_HOST") {
            Some(host) => Some(SmtpConfig {
                host,
                port: parsed("SMTP_PORT", 587u16)?,
                username: optional("SMTP_USERNAME").unwrap_or_default(),
                password: optional("SMTP_PASSWORD").unwrap_or_default(),
            }),
            None => None,
        };

        let cors_origins = optional("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| vec!["http://localhost:5173".to_string()]);

        Ok(Config {
            database_url: optional("DATABASE_URL"),
            jwt_secret,
            jwt_maxage,
            port,
            from_email: optional("FROM_EMAIL").unwrap_or_else(|| DEFAULT_FROM_EMAIL.to_string()),
            resend_api_key: optional("RESEND_API_KEY"),
            smtp,
            seed_users_file: optional("SEED_USERS_FILE"),
            issue_dev_tokens: parsed("ISSUE_DEV_TOKENS", false)?,
            cors_origins,
        })
    }

    pub fn mail_configured(&self) -> bool {
        self.resend_api_key.is_some() || self.smtp.is_some()
    }
}
