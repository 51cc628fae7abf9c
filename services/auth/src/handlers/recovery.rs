use axum::{Json, extract::State};
use serde::Deserialize;

use crate::error::AuthServiceError;
use crate::handlers::{JsonBody, MessageResponse};
use crate::handlers::validate::required;
use crate::state::AppState;
use crate::usecase::recovery::{
    RequestRecoveryInput, RequestRecoveryUseCase, ResetPasswordInput, ResetPasswordUseCase,
    VerifyCodeInput, VerifyCodeUseCase,
};

// ── POST /auth/recuperar-senha ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RequestRecoveryRequest {
    #[serde(default)]
    pub email: String,
}

pub async fn request_recovery(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RequestRecoveryRequest>,
) -> Result<Json<MessageResponse>, AuthServiceError> {
    required("email", &body.email, 100)?;

    let usecase = RequestRecoveryUseCase {
        users: state.user_repo(),
        codes: state.recovery_codes.clone(),
        notifier: state.mailer.clone(),
    };
    usecase
        .execute(RequestRecoveryInput { email: body.email })
        .await?;
    Ok(Json(MessageResponse {
        message: "Código de recuperação enviado para o e-mail informado.",
    }))
}

// ── POST /auth/verificar-codigo ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyCodeRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub codigo: String,
}

pub async fn verify_code(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<VerifyCodeRequest>,
) -> Result<Json<MessageResponse>, AuthServiceError> {
    required("email", &body.email, 100)?;
    required("codigo", &body.codigo, 10)?;

    let usecase = VerifyCodeUseCase {
        users: state.user_repo(),
        codes: state.recovery_codes.clone(),
    };
    usecase
        .execute(VerifyCodeInput {
            email: body.email,
            code: body.codigo,
        })
        .await?;
    Ok(Json(MessageResponse {
        message: "Código válido.",
    }))
}

// ── POST /auth/redefinir-senha ───────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub codigo: String,
    #[serde(default)]
    pub nova_senha: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AuthServiceError> {
    required("email", &body.email, 100)?;
    required("codigo", &body.codigo, 10)?;
    required("novaSenha", &body.nova_senha, 100)?;

    let usecase = ResetPasswordUseCase {
        users: state.user_repo(),
        codes: state.recovery_codes.clone(),
        hasher: state.hasher.clone(),
    };
    usecase
        .execute(ResetPasswordInput {
            email: body.email,
            code: body.codigo,
            new_password: body.nova_senha,
        })
        .await?;
    Ok(Json(MessageResponse {
        message: "Senha redefinida com sucesso.",
    }))
}
