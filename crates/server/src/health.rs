use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use affirmbot_core::CommandProfile;
use affirmbot_db::DbPool;

pub const HEALTH_PATH: &str = "/health";

#[derive(Clone)]
pub struct HealthState {
    db_pool: DbPool,
    profile: CommandProfile,
}

impl HealthState {
    pub fn new(db_pool: DbPool, profile: CommandProfile) -> Self {
        Self { db_pool, profile }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub command: &'static str,
    pub service: HealthCheck,
    pub database: HealthCheck,
    pub checked_at: String,
}

pub fn router(state: HealthState) -> Router {
    Router::new().route(HEALTH_PATH, get(health)).with_state(state)
}

/// `ready` only when the affirmation table answers; the webhook keeps
/// serving fallback text while this reports `degraded`.
pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let database = collection_check(&state.db_pool, state.profile.key).await;
    let ready = database.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        command: state.profile.command,
        service: HealthCheck {
            status: "ready",
            detail: format!("serving {} collection", state.profile.key),
        },
        database,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn collection_check(pool: &DbPool, collection: &str) -> HealthCheck {
    let counted =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM affirmation WHERE collection = ?")
            .bind(collection)
            .fetch_one(pool)
            .await;

    match counted {
        Ok(available) => {
            HealthCheck { status: "ready", detail: format!("{available} affirmations available") }
        }
        Err(error) => HealthCheck {
            status: "degraded",
            detail: format!("affirmation table unavailable: {error}"),
        },
    }
}
