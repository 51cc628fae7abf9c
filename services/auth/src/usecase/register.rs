use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::domain::repository::{PasswordHasher, UserRepository};
use crate::domain::types::{Address, UserAccount};
use crate::error::AuthServiceError;

pub struct RegisterInput {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub address: Address,
}

pub struct RegisterUseCase<U: UserRepository, H: PasswordHasher> {
    pub users: U,
    pub hasher: H,
}

impl<U: UserRepository, H: PasswordHasher> RegisterUseCase<U, H> {
    /// Uniqueness of e-mail and username is the only rule enforced here.
    pub async fn execute(&self, input: RegisterInput) -> Result<UserAccount, AuthServiceError> {
        if self
            .users
            .identity_taken(&input.email, &input.username)
            .await?
        {
            return Err(AuthServiceError::DuplicateIdentity);
        }

        let password_hash = self.hasher.hash(&input.password).await?;
        let now = Utc::now();
        let account = UserAccount {
            id: Uuid::now_v7(),
            email: input.email,
            username: input.username,
            name: input.name,
            password_hash,
            phone: input.phone,
            is_active: true,
            is_admin: false,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };

        self.users
            .create_with_address(&account, &input.address)
            .await?;
        info!(user_id = %account.id, "account registered");
        Ok(account)
    }
}
