use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use thiserror::Error;
use tracing::info;

use affirmbot_core::config::{AppConfig, ConfigError};
use affirmbot_core::CommandProfile;
use affirmbot_db::repositories::{SqlAffirmationRepository, SqlShareLogRepository};
use affirmbot_db::{connect_with_settings, migrations, DbPool};

use crate::health::{self, HealthState};
use crate::notifier::{HttpResponseNotifier, NotifyError};
use crate::service::AffirmationService;
use crate::webhook::{self, WebhookState};

pub struct Application {
    pub config: AppConfig,
    pub profile: CommandProfile,
    pub db_pool: DbPool,
    pub router: Router,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("response notifier could not be built: {0}")]
    Notifier(#[from] NotifyError),
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );
    let profile = config.profile()?;

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let service = AffirmationService::new(
        profile.clone(),
        Arc::new(SqlAffirmationRepository::new(db_pool.clone())),
        Arc::new(SqlShareLogRepository::new(db_pool.clone())),
    );
    let notifier =
        HttpResponseNotifier::new(Duration::from_secs(config.server.response_timeout_secs))?;
    let router = build_router(
        WebhookState::new(service, Arc::new(notifier)),
        HealthState::new(db_pool.clone(), profile.clone()),
    );
    info!(
        event_name = "system.bootstrap.ready",
        correlation_id = "bootstrap",
        collection = profile.key,
        command = profile.command,
        "routes assembled"
    );

    Ok(Application { config, profile, db_pool, router })
}

pub fn build_router(webhook_state: WebhookState, health_state: HealthState) -> Router {
    webhook::router(webhook_state).merge(health::router(health_state))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use affirmbot_core::config::{AppConfig, ConfigOverrides, LoadOptions};

    use crate::bootstrap::{bootstrap_with_config, Application, BootstrapError};

    async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
        let config = AppConfig::load(options)?;
        bootstrap_with_config(config).await
    }

    fn in_memory(profile: Option<&str>) -> LoadOptions {
        LoadOptions {
            config_path: Some("does-not-exist.toml".into()),
            overrides: ConfigOverrides {
                database_url: Some("sqlite::memory:".to_owned()),
                profile: profile.map(str::to_owned),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }

    #[tokio::test]
    async fn bootstrap_rejects_unknown_profile() {
        let result = bootstrap(in_memory(Some("quote"))).await;

        assert!(matches!(result, Err(BootstrapError::Config(_))));
        let message = result.err().expect("error").to_string();
        assert!(message.contains("command.profile"));
    }

    #[tokio::test]
    async fn bootstrap_migrates_and_serves_health() {
        let app = bootstrap(in_memory(Some("affirm"))).await.expect("bootstrap should succeed");

        assert_eq!(app.profile.command, "/affirm");

        let (table_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master \
             WHERE type = 'table' AND name IN ('affirmation', 'share_log')",
        )
        .fetch_one(&app.db_pool)
        .await
        .expect("schema query");
        assert_eq!(table_count, 2);

        let response = app
            .router
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        app.db_pool.close().await;
    }
}
