use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use labdesk_auth_types::token::TokenValidator;

use crate::infra::cache::RecoveryCodeCache;
use crate::infra::db::DbUserRepository;
use crate::infra::mailer::Mailer;
use crate::infra::password::Argon2PasswordHasher;
use crate::usecase::token::TokenIssuer;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub recovery_codes: RecoveryCodeCache,
    pub mailer: Mailer,
    pub hasher: Argon2PasswordHasher,
    pub token_issuer: TokenIssuer,
    pub token_validator: TokenValidator,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }
}

impl FromRef<AppState> for TokenValidator {
    fn from_ref(state: &AppState) -> Self {
        state.token_validator.clone()
    }
}
