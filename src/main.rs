mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod mail;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;

use std::sync::Arc;

use anyhow::Context;
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use config::Config;
use dotenv::dotenv;
use routes::create_router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, memory::MemoryStore, Repository},
    mail::sendmail::{LogNotifier, MailNotifier, Notifier},
};

// Import the services
use service::{
    job_service::JobService, notification_service::NotificationService,
    provider_service::ProviderService, review_service::ReviewService,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<dyn Repository>,
    // Services
    pub job_service: Arc<JobService>,
    pub review_service: Arc<ReviewService>,
    pub provider_service: Arc<ProviderService>,
}

impl AppState {
    pub fn new(
        config: Config,
        db_client: Arc<dyn Repository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let notification_service = Arc::new(NotificationService::new(db_client.clone(), notifier));

        let job_service = Arc::new(JobService::new(
            db_client.clone(),
            notification_service.clone(),
        ));
        let review_service = Arc::new(ReviewService::new(db_client.clone()));
        let provider_service = Arc::new(ProviderService::new(db_client.clone()));

        Self {
            env: config,
            db_client,
            job_service,
            review_service,
            provider_service,
        }
    }
}

async fn connect_store(config: &Config) -> anyhow::Result<Arc<dyn Repository>> {
    if let Some(database_url) = &config.database_url {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(5)
            .connect(database_url)
            .await
            .context("failed to connect to the database")?;
        tracing::info!("✅ Connection to the database is successful!");

        let client = DBClient::new(pool);
        client.migrate().await.context("failed to run migrations")?;

        return Ok(Arc::new(client));
    }

    let store = match &config.seed_users_file {
        Some(path) => MemoryStore::from_seed_file(path)
            .with_context(|| format!("failed to load users from {}", path))?,
        None => MemoryStore::new(),
    };

    tracing::warn!(
        "DATABASE_URL not set, running on the in-memory store with {} users",
        store.user_count().await
    );
    for (name, id, token) in dev_tokens(config, store.user_ids().await) {
        tracing::info!("Dev token for {} ({}): {}", name, id, token);
    }

    Ok(Arc::new(store))
}

/// Tokens for seeded users, only when `ISSUE_DEV_TOKENS` asks for them.
fn dev_tokens(config: &Config, users: Vec<(String, Uuid)>) -> Vec<(String, Uuid, String)> {
    if !config.issue_dev_tokens {
        return Vec::new();
    }

    tracing::warn!("ISSUE_DEV_TOKENS is set, printing bearer tokens for seeded users");
    users
        .into_iter()
        .filter_map(|(name, id)| {
            let secret = config.jwt_secret.as_bytes();
            match utils::token::create_token(&id.to_string(), secret, config.jwt_maxage) {
                Ok(token) => Some((name, id, token)),
                Err(e) => {
                    tracing::warn!("Could not issue dev token for {}: {}", id, e);
                    None
                }
            }
        })
        .collect()
}

fn select_notifier(config: &Config) -> Arc<dyn Notifier> {
    if config.mail_configured() {
        tracing::info!("Email notifications enabled");
        Arc::new(MailNotifier::new(config))
    } else {
        tracing::info!("No mail transport configured, notifications go to the log");
        Arc::new(LogNotifier)
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let config = Config::init()?;

    let db_client = connect_store(&config).await?;
    let notifier = select_notifier(&config);

    let app_state = Arc::new(AppState::new(config.clone(), db_client, notifier));

    let app = create_router(app_state).layer(cors_layer(&config));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .with_context(|| format!("failed to bind port {}", config.port))?;

    tracing::info!("🚀 Server is running on http://localhost:{}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(issue_dev_tokens: bool) -> Config {
        Config {
            database_url: None,
            jwt_secret: "dev-secret".to_string(),
            jwt_maxage: 60,
            port: 8000,
            from_email: "Servease <noreply@servease.app>".to_string(),
            resend_api_key: None,
            smtp: None,
            seed_users_file: None,
            issue_dev_tokens,
            cors_origins: Vec::new(),
        }
    }

    #[test]
    fn dev_tokens_are_opt_in() {
        let id = Uuid::new_v4();
        let users = vec![("Ada".to_string(), id)];

        assert!(dev_tokens(&config(false), users.clone()).is_empty());

        let issued = dev_tokens(&config(true), users);
        assert_eq!(issued.len(), 1);
        let (_, issued_id, token) = &issued[0];
        assert_eq!(*issued_id, id);
        let subject = utils::token::decode_token(token.clone(), b"dev-secret").unwrap();
        assert_eq!(subject, id.to_string());
    }
}
