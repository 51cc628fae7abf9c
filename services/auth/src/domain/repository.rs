#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::types::{Address, RecoveryCode, UserAccount};
use crate::error::AuthServiceError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    /// Exact e-mail match restricted to active accounts.
    async fn find_active_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAccount>, AuthServiceError>;

    /// `true` if any account, active or not, already uses this e-mail or username.
    async fn identity_taken(&self, email: &str, username: &str) -> Result<bool, AuthServiceError>;

    /// Insert the account and its address in one transaction.
    /// A unique-index violation surfaces as `DuplicateIdentity`.
    async fn create_with_address(
        &self,
        account: &UserAccount,
        address: &Address,
    ) -> Result<(), AuthServiceError>;

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AuthServiceError>;

    async fn update_password(&self, id: Uuid, password_hash: &str)
    -> Result<(), AuthServiceError>;
}

/// Short-lived store of password-recovery codes, one entry per e-mail.
pub trait RecoveryCodeStore: Send + Sync {
    /// Store the code, replacing any previous entry for the e-mail.
    async fn put(&self, email: &str, code: &RecoveryCode) -> Result<(), AuthServiceError>;

    /// Current entry for the e-mail. Backends may drop expired entries before answering.
    async fn get(&self, email: &str) -> Result<Option<RecoveryCode>, AuthServiceError>;

    async fn remove(&self, email: &str) -> Result<(), AuthServiceError>;
}

/// Salted adaptive password hashing.
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String, AuthServiceError>;

    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unusable.
    async fn verify(&self, password: &str, password_hash: &str) -> Result<bool, AuthServiceError>;
}

/// Outbound e-mail channel.
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str)
    -> Result<(), AuthServiceError>;
}
