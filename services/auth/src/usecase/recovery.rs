use chrono::Utc;
use rand::RngExt;
use tracing::{info, warn};

use crate::domain::repository::{Notifier, PasswordHasher, RecoveryCodeStore, UserRepository};
use crate::domain::types::{RECOVERY_CODE_LEN, RECOVERY_CODE_TTL_SECS, RecoveryCode, UserAccount};
use crate::error::AuthServiceError;

pub const RECOVERY_EMAIL_SUBJECT: &str = "Recuperação de senha";

/// Zero-padded numeric code, `RECOVERY_CODE_LEN` digits.
fn generate_code() -> String {
    let upper = 10u32.pow(RECOVERY_CODE_LEN as u32);
    let mut rng = rand::rng();
    format!(
        "{:0width$}",
        rng.random_range(0..upper),
        width = RECOVERY_CODE_LEN
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn recovery_email_body(name: &str, code: &str) -> String {
    let minutes = RECOVERY_CODE_TTL_SECS / 60;
    let name = escape_html(name);
    format!(
        "<p>Olá, {name}.</p>\
         <p>Seu código de recuperação de senha é:</p>\
         <h2 style=\"letter-spacing:4px\">{code}</h2>\
         <p>O código é válido por {minutes} minutos. \
         Se você não solicitou a recuperação, ignore este e-mail.</p>"
    )
}

/// Shared by verify and reset: active account, live entry, matching code.
async fn check_code<U, S>(
    users: &U,
    codes: &S,
    email: &str,
    submitted: &str,
) -> Result<UserAccount, AuthServiceError>
where
    U: UserRepository,
    S: RecoveryCodeStore,
{
    let account = users
        .find_active_by_email(email)
        .await?
        .ok_or(AuthServiceError::InvalidRecoveryCode)?;
    let entry = codes
        .get(&account.email)
        .await?
        .ok_or(AuthServiceError::InvalidRecoveryCode)?;
    if entry.is_expired(Utc::now()) || !entry.matches(submitted) {
        return Err(AuthServiceError::InvalidRecoveryCode);
    }
    Ok(account)
}

// ── RequestRecovery ──────────────────────────────────────────────────────────

pub struct RequestRecoveryInput {
    pub email: String,
}

pub struct RequestRecoveryUseCase<U, S, N>
where
    U: UserRepository,
    S: RecoveryCodeStore,
    N: Notifier,
{
    pub users: U,
    pub codes: S,
    pub notifier: N,
}

impl<U, S, N> RequestRecoveryUseCase<U, S, N>
where
    U: UserRepository,
    S: RecoveryCodeStore,
    N: Notifier,
{
    pub async fn execute(&self, input: RequestRecoveryInput) -> Result<(), AuthServiceError> {
        // 1. Active account or 404, nothing sent
        let account = self
            .users
            .find_active_by_email(&input.email)
            .await?
            .ok_or(AuthServiceError::UserNotFound)?;

        // 2. New code replaces any pending one for this e-mail
        let code = RecoveryCode::new(generate_code(), Utc::now());
        self.codes.put(&account.email, &code).await?;

        // 3. Deliver; a failed send fails the request
        let body = recovery_email_body(&account.name, &code.code);
        if let Err(e) = self
            .notifier
            .send(&account.email, RECOVERY_EMAIL_SUBJECT, &body)
            .await
        {
            warn!(user_id = %account.id, "recovery email not delivered");
            return Err(e);
        }

        info!(user_id = %account.id, "password recovery requested");
        Ok(())
    }
}

// ── VerifyCode ───────────────────────────────────────────────────────────────

pub struct VerifyCodeInput {
    pub email: String,
    pub code: String,
}

pub struct VerifyCodeUseCase<U: UserRepository, S: RecoveryCodeStore> {
    pub users: U,
    pub codes: S,
}

impl<U: UserRepository, S: RecoveryCodeStore> VerifyCodeUseCase<U, S> {
    /// Leaves the code in place; only a successful reset consumes it.
    pub async fn execute(&self, input: VerifyCodeInput) -> Result<(), AuthServiceError> {
        check_code(&self.users, &self.codes, &input.email, &input.code).await?;
        Ok(())
    }
}

// ── ResetPassword ────────────────────────────────────────────────────────────

pub struct ResetPasswordInput {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

pub struct ResetPasswordUseCase<U, S, H>
where
    U: UserRepository,
    S: RecoveryCodeStore,
    H: PasswordHasher,
{
    pub users: U,
    pub codes: S,
    pub hasher: H,
}

impl<U, S, H> ResetPasswordUseCase<U, S, H>
where
    U: UserRepository,
    S: RecoveryCodeStore,
    H: PasswordHasher,
{
    pub async fn execute(&self, input: ResetPasswordInput) -> Result<(), AuthServiceError> {
        let account = check_code(&self.users, &self.codes, &input.email, &input.code).await?;

        let password_hash = self.hasher.hash(&input.new_password).await?;
        self.users
            .update_password(account.id, &password_hash)
            .await?;
        self.codes.remove(&account.email).await?;

        info!(user_id = %account.id, "password reset");
        Ok(())
    }
}
