use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Auth service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Unknown e-mail, inactive account and wrong password all collapse here.
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("email or username already registered")]
    DuplicateIdentity,
    #[error("user not found")]
    UserNotFound,
    #[error("invalid or expired recovery code")]
    InvalidRecoveryCode,
    #[error("invalid token")]
    InvalidToken,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::DuplicateIdentity => "DUPLICATE_IDENTITY",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::InvalidRecoveryCode => "INVALID_RECOVERY_CODE",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

/// Unparseable bodies, wrong field types and a missing JSON content type.
impl From<JsonRejection> for AuthServiceError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidRequest(_) | Self::DuplicateIdentity | Self::InvalidRecoveryCode => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidCredentials | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Only 500s are logged here; the trace layer records every status.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
