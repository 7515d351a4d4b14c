use std::sync::{Arc, OnceLock};
use std::time::Instant;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use chrono::Utc;
use serde_json::json;
use tracing::error;

use crate::infrastructure::postgres::postgres_connection::{self, PgPoolSquad};

const SERVICE_NAME: &str = "plan-directory";

static STARTED_AT: OnceLock<Instant> = OnceLock::new();

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    STARTED_AT.get_or_init(Instant::now);

    Router::new()
        .route("/health", get(liveness))
        .route("/ready", get(readiness))
        .with_state(db_pool)
}

/// Liveness probe. Never touches the database.
pub async fn liveness() -> impl IntoResponse {
    let uptime_seconds = STARTED_AT
        .get()
        .map(|started_at| started_at.elapsed().as_secs())
        .unwrap_or_default();

    (
        StatusCode::OK,
        Json(json!({
            "service": SERVICE_NAME,
            "timestamp": Utc::now(),
            "uptimeSeconds": uptime_seconds,
        })),
    )
        .into_response()
}

/// Readiness probe: checks out a pooled connection and pings the database.
pub async fn readiness(State(db_pool): State<Arc<PgPoolSquad>>) -> impl IntoResponse {
    match postgres_connection::ping(&db_pool) {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ready" }))).into_response(),
        Err(err) => {
            error!(db_error = ?err, "readiness: database ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "error": err.to_string() })),
            )
                .into_response()
        }
    }
}
