use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registered account: identity, credential and auth flags.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub name: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Postal address stored alongside the account at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub district: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

/// Pending password-recovery code for one e-mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryCode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl RecoveryCode {
    pub fn new(code: String, now: DateTime<Utc>) -> Self {
        Self {
            code,
            expires_at: now + Duration::seconds(RECOVERY_CODE_TTL_SECS),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// The submitted code is trimmed; the stored one is compared as-is.
    pub fn matches(&self, submitted: &str) -> bool {
        self.code == submitted.trim()
    }
}

/// Recovery code length in digits.
pub const RECOVERY_CODE_LEN: usize = 5;

/// Recovery code time-to-live in seconds (15 minutes).
pub const RECOVERY_CODE_TTL_SECS: i64 = 15 * 60;
