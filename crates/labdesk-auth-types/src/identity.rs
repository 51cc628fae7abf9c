//! `Authorization: Bearer` identity extractor.

use axum::extract::{FromRef, FromRequestParts};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use crate::token::{AuthError, TokenValidator};

/// Caller identity proven by a valid bearer token.
///
/// Returns 401 if the header is absent or the token fails validation.
/// Admin enforcement (403) is done by handlers after extraction.
#[derive(Debug, Clone)]
pub struct BearerIdentity {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub username: String,
    pub is_admin: bool,
    pub expires_at: u64,
}

impl<S> FromRequestParts<S> for BearerIdentity
where
    S: Send + Sync,
    TokenValidator: FromRef<S>,
{
    type Rejection = StatusCode;

    // Validation is synchronous; the returned future owns its result so it is `'static`.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let validator = TokenValidator::from_ref(state);
        let result = parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .ok_or(AuthError::Missing)
            .and_then(|Authorization(bearer)| validator.validate(bearer.token()));

        async move {
            let info = result.map_err(|e| {
                tracing::debug!(reason = %e, "bearer token rejected");
                StatusCode::UNAUTHORIZED
            })?;
            Ok(Self {
                user_id: info.user_id,
                email: info.email,
                name: info.name,
                username: info.username,
                is_admin: info.is_admin,
                expires_at: info.expires_at,
            })
        }
    }
}
