use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use labdesk_auth::domain::repository::{Notifier, PasswordHasher, UserRepository};
use labdesk_auth::domain::types::{Address, UserAccount};
use labdesk_auth::error::AuthServiceError;
use labdesk_auth::infra::password::Argon2PasswordHasher;
use labdesk_auth::usecase::token::TokenIssuer;
use labdesk_auth_types::token::TokenValidator;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";
pub const TEST_ISSUER: &str = "labdesk";
pub const TEST_AUDIENCE: &str = "labdesk-web";

// ── MockUserRepo ─────────────────────────────────────────────────────────────

/// In-memory account table. Clones share the same rows.
#[derive(Clone, Default)]
pub struct MockUserRepo {
    pub rows: Arc<Mutex<Vec<(UserAccount, Address)>>>,
}

impl MockUserRepo {
    pub fn new(rows: Vec<(UserAccount, Address)>) -> Self {
        Self {
            rows: Arc::new(Mutex::new(rows)),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn find(&self, email: &str) -> Option<(UserAccount, Address)> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|(a, _)| a.email == email)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

impl UserRepository for MockUserRepo {
    async fn find_active_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAccount>, AuthServiceError> {
        Ok(self.find(email).map(|(a, _)| a).filter(|a| a.is_active))
    }

    async fn identity_taken(&self, email: &str, username: &str) -> Result<bool, AuthServiceError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|(a, _)| a.email == email || a.username == username))
    }

    async fn create_with_address(
        &self,
        account: &UserAccount,
        address: &Address,
    ) -> Result<(), AuthServiceError> {
        self.rows
            .lock()
            .unwrap()
            .push((account.clone(), address.clone()));
        Ok(())
    }

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AuthServiceError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some((a, _)) = rows.iter_mut().find(|(a, _)| a.id == id) {
            a.last_login_at = Some(at);
        }
        Ok(())
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), AuthServiceError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some((a, _)) = rows.iter_mut().find(|(a, _)| a.id == id) {
            a.password_hash = password_hash.to_owned();
            a.updated_at = Utc::now();
        }
        Ok(())
    }
}

// ── MockNotifier ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Records outgoing mail; `failing()` rejects every send.
#[derive(Clone, Default)]
pub struct MockNotifier {
    pub sent: Arc<Mutex<Vec<SentMail>>>,
    pub fail: bool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    /// Digits of the most recent code sent to `email`.
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        let sent = self.sent.lock().unwrap();
        let mail = sent.iter().rev().find(|m| m.to == email)?;
        let start = mail.body.find("<h2")?;
        let open = start + mail.body[start..].find('>')? + 1;
        let close = open + mail.body[open..].find('<')?;
        Some(mail.body[open..close].to_owned())
    }
}

impl Notifier for MockNotifier {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), AuthServiceError> {
        if self.fail {
            return Err(anyhow::anyhow!("mail API unavailable").into());
        }
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_owned(),
            subject: subject.to_owned(),
            body: html_body.to_owned(),
        });
        Ok(())
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

/// Cheap Argon2id parameters so tests stay fast.
pub fn fast_hasher() -> Argon2PasswordHasher {
    Argon2PasswordHasher::with_params(8, 1, 1).unwrap()
}

pub fn token_issuer() -> TokenIssuer {
    TokenIssuer::new(
        TEST_SECRET,
        TEST_ISSUER.to_owned(),
        TEST_AUDIENCE.to_owned(),
        Duration::hours(24),
    )
}

pub fn token_validator() -> TokenValidator {
    TokenValidator::new(TEST_SECRET, TEST_ISSUER, TEST_AUDIENCE)
}

pub fn test_address() -> Address {
    Address {
        street: "Rua das Flores".to_owned(),
        number: "100".to_owned(),
        complement: None,
        district: "Centro".to_owned(),
        city: "Campinas".to_owned(),
        state: "SP".to_owned(),
        postal_code: "13010-000".to_owned(),
    }
}

/// Active, non-admin account whose password hash matches `password`.
pub async fn test_account(email: &str, username: &str, password: &str) -> UserAccount {
    let now = Utc::now();
    UserAccount {
        id: Uuid::now_v7(),
        email: email.to_owned(),
        username: username.to_owned(),
        name: "Ana Souza".to_owned(),
        password_hash: fast_hasher().hash(password).await.unwrap(),
        phone: None,
        is_active: true,
        is_admin: false,
        last_login_at: None,
        created_at: now,
        updated_at: now,
    }
}

/// Repository seeded with one active account `a@x.com` / `abc123`.
pub async fn seeded_repo() -> (MockUserRepo, UserAccount) {
    let account = test_account("a@x.com", "ana", "abc123").await;
    let repo = MockUserRepo::new(vec![(account.clone(), test_address())]);
    (repo, account)
}
