use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;

/// Body returned by the probe handlers.
#[derive(Debug, Serialize)]
pub struct ProbeStatus {
    pub status: &'static str,
}

impl ProbeStatus {
    pub const UP: Self = Self { status: "up" };
    pub const DOWN: Self = Self { status: "down" };
}

/// Handler for `GET /healthz`: liveness check.
///
/// Never touches dependencies; readiness is the service's own `/readyz`.
pub async fn healthz() -> (StatusCode, Json<ProbeStatus>) {
    (StatusCode::OK, Json(ProbeStatus::UP))
}

/// Map a dependency check result to a readiness response.
pub fn readiness(ready: bool) -> (StatusCode, Json<ProbeStatus>) {
    if ready {
        (StatusCode::OK, Json(ProbeStatus::UP))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(ProbeStatus::DOWN))
    }
}
