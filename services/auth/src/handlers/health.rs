use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use labdesk_core::health::{ProbeStatus, readiness};

use crate::state::AppState;

/// `GET /readyz`: ready once the database answers a ping.
pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<ProbeStatus>) {
    match state.db.ping().await {
        Ok(()) => readiness(true),
        Err(e) => {
            tracing::warn!(error = %e, "database ping failed");
            readiness(false)
        }
    }
}
