use axum::{
    Router,
    routing::{get, post},
};

use labdesk_core::health::healthz;
use labdesk_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    account::register,
    health::readyz,
    recovery::{request_recovery, reset_password, verify_code},
    session::{login, me},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Session
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        // Registration
        .route("/auth/cadastro", post(register))
        // Password recovery
        .route("/auth/recuperar-senha", post(request_recovery))
        .route("/auth/verificar-codigo", post(verify_code))
        .route("/auth/redefinir-senha", post(reset_password))
        // Innermost first: the id is set before tracing and copied to the response last.
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
        .with_state(state)
}
