use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use labdesk_auth_types::identity::BearerIdentity;

use crate::error::AuthServiceError;
use crate::handlers::JsonBody;
use crate::handlers::validate::required;
use crate::state::AppState;
use crate::usecase::login::{LoginInput, LoginUseCase};

// ── POST /auth/login ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub senha: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    pub nome: String,
    pub nome_usuario: String,
    pub is_admin: bool,
    #[serde(serialize_with = "labdesk_core::serde::to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthServiceError> {
    required("email", &body.email, 100)?;
    required("senha", &body.senha, 100)?;

    let usecase = LoginUseCase {
        users: state.user_repo(),
        hasher: state.hasher.clone(),
        tokens: state.token_issuer.clone(),
    };
    let out = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.senha,
        })
        .await?;

    Ok(Json(LoginResponse {
        token: out.token,
        email: out.account.email,
        nome: out.account.name,
        nome_usuario: out.account.username,
        is_admin: out.account.is_admin,
        expires_at: out.expires_at,
    }))
}

// ── GET /auth/me ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: Uuid,
    pub email: String,
    pub nome: String,
    pub nome_usuario: String,
    pub is_admin: bool,
    #[serde(serialize_with = "labdesk_core::serde::unix_secs_to_rfc3339_ms")]
    pub expires_at: u64,
}

/// Echoes the identity carried by the bearer token; no database access.
pub async fn me(
    identity: Result<BearerIdentity, StatusCode>,
) -> Result<Json<MeResponse>, AuthServiceError> {
    let identity = identity.map_err(|_| AuthServiceError::InvalidToken)?;
    Ok(Json(MeResponse {
        id: identity.user_id,
        email: identity.email,
        nome: identity.name,
        nome_usuario: identity.username,
        is_admin: identity.is_admin,
        expires_at: identity.expires_at,
    }))
}
