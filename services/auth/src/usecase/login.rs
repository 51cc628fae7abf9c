use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::domain::repository::{PasswordHasher, UserRepository};
use crate::domain::types::UserAccount;
use crate::error::AuthServiceError;
use crate::usecase::token::TokenIssuer;

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub account: UserAccount,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct LoginUseCase<U: UserRepository, H: PasswordHasher> {
    pub users: U,
    pub hasher: H,
    pub tokens: TokenIssuer,
}

impl<U: UserRepository, H: PasswordHasher> LoginUseCase<U, H> {
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, AuthServiceError> {
        // Unknown, inactive and wrong-password all end in the same error.
        let Some(account) = self.users.find_active_by_email(&input.email).await? else {
            debug!("login rejected");
            return Err(AuthServiceError::InvalidCredentials);
        };

        if !self
            .hasher
            .verify(&input.password, &account.password_hash)
            .await?
        {
            debug!("login rejected");
            return Err(AuthServiceError::InvalidCredentials);
        }

        let now = Utc::now();
        self.users.touch_last_login(account.id, now).await?;

        let issued = self.tokens.issue(&account)?;
        info!(user_id = %account.id, "login succeeded");

        Ok(LoginOutput {
            account: UserAccount {
                last_login_at: Some(now),
                ..account
            },
            token: issued.token,
            expires_at: issued.expires_at,
        })
    }
}
