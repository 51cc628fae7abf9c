use chrono::{Duration, Utc};

use labdesk_auth::domain::repository::{PasswordHasher, RecoveryCodeStore};
use labdesk_auth::domain::types::RecoveryCode;
use labdesk_auth::error::AuthServiceError;
use labdesk_auth::infra::cache::InMemoryRecoveryCodeStore;
use labdesk_auth::usecase::login::{LoginInput, LoginUseCase};
use labdesk_auth::usecase::recovery::{
    RECOVERY_EMAIL_SUBJECT, RequestRecoveryInput, RequestRecoveryUseCase, ResetPasswordInput,
    ResetPasswordUseCase, VerifyCodeInput, VerifyCodeUseCase,
};

use crate::helpers::{
    MockNotifier, MockUserRepo, fast_hasher, seeded_repo, token_issuer, token_validator,
};

struct Harness {
    users: MockUserRepo,
    codes: InMemoryRecoveryCodeStore,
    mail: MockNotifier,
}

impl Harness {
    async fn new() -> Self {
        let (users, _) = seeded_repo().await;
        Self {
            users,
            codes: InMemoryRecoveryCodeStore::new(),
            mail: MockNotifier::new(),
        }
    }

    async fn request(&self, email: &str) -> Result<(), AuthServiceError> {
        RequestRecoveryUseCase {
            users: self.users.clone(),
            codes: self.codes.clone(),
            notifier: self.mail.clone(),
        }
        .execute(RequestRecoveryInput {
            email: email.to_owned(),
        })
        .await
    }

    async fn verify(&self, email: &str, code: &str) -> Result<(), AuthServiceError> {
        VerifyCodeUseCase {
            users: self.users.clone(),
            codes: self.codes.clone(),
        }
        .execute(VerifyCodeInput {
            email: email.to_owned(),
            code: code.to_owned(),
        })
        .await
    }

    async fn reset(&self, email: &str, code: &str, new_password: &str) -> Result<(), AuthServiceError> {
        ResetPasswordUseCase {
            users: self.users.clone(),
            codes: self.codes.clone(),
            hasher: fast_hasher(),
        }
        .execute(ResetPasswordInput {
            email: email.to_owned(),
            code: code.to_owned(),
            new_password: new_password.to_owned(),
        })
        .await
    }

    async fn login(&self, email: &str, password: &str) -> Result<String, AuthServiceError> {
        let out = LoginUseCase {
            users: self.users.clone(),
            hasher: fast_hasher(),
            tokens: token_issuer(),
        }
        .execute(LoginInput {
            email: email.to_owned(),
            password: password.to_owned(),
        })
        .await?;
        Ok(out.token)
    }
}

/// A code guaranteed to differ from `code`.
fn other_code(code: &str) -> String {
    if code == "00000" { "00001".to_owned() } else { "00000".to_owned() }
}

#[tokio::test]
async fn should_send_code_and_reset_password_end_to_end() {
    let h = Harness::new().await;

    h.request("a@x.com").await.unwrap();

    let sent = h.mail.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "a@x.com");
    assert_eq!(sent[0].subject, RECOVERY_EMAIL_SUBJECT);
    let code = h.mail.last_code_for("a@x.com").unwrap();
    assert_eq!(code.len(), 5);
    assert!(code.bytes().all(|b| b.is_ascii_digit()));

    h.verify("a@x.com", &code).await.unwrap();
    h.reset("a@x.com", &code, "nova123").await.unwrap();

    let (stored, _) = h.users.find("a@x.com").unwrap();
    let hasher = fast_hasher();
    assert!(hasher.verify("nova123", &stored.password_hash).await.unwrap());
    assert!(!hasher.verify("abc123", &stored.password_hash).await.unwrap());
}

#[tokio::test]
async fn should_return_not_found_for_unknown_email_and_send_nothing() {
    let h = Harness::new().await;

    let result = h.request("nobody@x.com").await;

    assert!(
        matches!(result, Err(AuthServiceError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
    assert!(h.mail.sent().is_empty());
    assert!(h.codes.is_empty().unwrap());
}

#[tokio::test]
async fn should_return_not_found_for_inactive_account() {
    let h = Harness::new().await;
    h.users.rows.lock().unwrap()[0].0.is_active = false;

    let result = h.request("a@x.com").await;

    assert!(matches!(result, Err(AuthServiceError::UserNotFound)));
    assert!(h.mail.sent().is_empty());
}

#[tokio::test]
async fn should_keep_code_reusable_after_verify() {
    let h = Harness::new().await;
    h.request("a@x.com").await.unwrap();
    let code = h.mail.last_code_for("a@x.com").unwrap();

    h.verify("a@x.com", &code).await.unwrap();
    h.verify("a@x.com", &code).await.unwrap();

    assert!(h.codes.get("a@x.com").await.unwrap().is_some());
}

#[tokio::test]
async fn should_accept_code_with_surrounding_whitespace() {
    let h = Harness::new().await;
    h.request("a@x.com").await.unwrap();
    let code = h.mail.last_code_for("a@x.com").unwrap();

    h.verify("a@x.com", &format!("  {code} ")).await.unwrap();
}

#[tokio::test]
async fn should_consume_code_on_reset() {
    let h = Harness::new().await;
    h.request("a@x.com").await.unwrap();
    let code = h.mail.last_code_for("a@x.com").unwrap();

    h.reset("a@x.com", &code, "nova123").await.unwrap();

    assert!(h.codes.get("a@x.com").await.unwrap().is_none());
    let again = h.reset("a@x.com", &code, "outra456").await;
    assert!(
        matches!(again, Err(AuthServiceError::InvalidRecoveryCode)),
        "expected InvalidRecoveryCode, got {again:?}"
    );
    let verify = h.verify("a@x.com", &code).await;
    assert!(matches!(verify, Err(AuthServiceError::InvalidRecoveryCode)));
}

#[tokio::test]
async fn should_reject_wrong_code_and_keep_password() {
    let h = Harness::new().await;
    h.request("a@x.com").await.unwrap();
    let code = h.mail.last_code_for("a@x.com").unwrap();
    let wrong = other_code(&code);

    let verify = h.verify("a@x.com", &wrong).await;
    assert!(matches!(verify, Err(AuthServiceError::InvalidRecoveryCode)));

    let reset = h.reset("a@x.com", &wrong, "nova123").await;
    assert!(matches!(reset, Err(AuthServiceError::InvalidRecoveryCode)));

    let (stored, _) = h.users.find("a@x.com").unwrap();
    assert!(fast_hasher().verify("abc123", &stored.password_hash).await.unwrap());
    assert!(h.codes.get("a@x.com").await.unwrap().is_some(), "wrong code must not consume the entry");
}

#[tokio::test]
async fn should_reject_expired_code() {
    let h = Harness::new().await;
    let issued = Utc::now() - Duration::minutes(16);
    h.codes
        .put("a@x.com", &RecoveryCode::new("12345".to_owned(), issued))
        .await
        .unwrap();

    let verify = h.verify("a@x.com", "12345").await;
    assert!(matches!(verify, Err(AuthServiceError::InvalidRecoveryCode)));

    let reset = h.reset("a@x.com", "12345", "nova123").await;
    assert!(matches!(reset, Err(AuthServiceError::InvalidRecoveryCode)));
}

#[tokio::test]
async fn should_accept_code_just_inside_validity_window() {
    let h = Harness::new().await;
    let issued = Utc::now() - Duration::minutes(14);
    h.codes
        .put("a@x.com", &RecoveryCode::new("12345".to_owned(), issued))
        .await
        .unwrap();

    h.verify("a@x.com", "12345").await.unwrap();
}

#[tokio::test]
async fn should_invalidate_previous_code_on_new_request() {
    let h = Harness::new().await;

    h.request("a@x.com").await.unwrap();
    let first = h.mail.last_code_for("a@x.com").unwrap();

    // Two draws can collide; retry until the second code differs.
    let mut second = first.clone();
    for _ in 0..10 {
        h.request("a@x.com").await.unwrap();
        second = h.mail.last_code_for("a@x.com").unwrap();
        if second != first {
            break;
        }
    }
    assert_ne!(first, second);

    let stale = h.verify("a@x.com", &first).await;
    assert!(
        matches!(stale, Err(AuthServiceError::InvalidRecoveryCode)),
        "first code must stop working, got {stale:?}"
    );
    h.verify("a@x.com", &second).await.unwrap();
    assert_eq!(h.codes.len().unwrap(), 1);
}

#[tokio::test]
async fn should_reject_code_for_unknown_email() {
    let h = Harness::new().await;
    h.codes
        .put("ghost@x.com", &RecoveryCode::new("12345".to_owned(), Utc::now()))
        .await
        .unwrap();

    let verify = h.verify("ghost@x.com", "12345").await;
    assert!(
        matches!(verify, Err(AuthServiceError::InvalidRecoveryCode)),
        "expected InvalidRecoveryCode, got {verify:?}"
    );
}

#[tokio::test]
async fn should_reject_when_no_code_was_requested() {
    let h = Harness::new().await;

    let verify = h.verify("a@x.com", "12345").await;

    assert!(matches!(verify, Err(AuthServiceError::InvalidRecoveryCode)));
}

#[tokio::test]
async fn should_fail_request_when_mail_delivery_fails() {
    let (users, _) = seeded_repo().await;
    let uc = RequestRecoveryUseCase {
        users,
        codes: InMemoryRecoveryCodeStore::new(),
        notifier: MockNotifier::failing(),
    };

    let result = uc
        .execute(RequestRecoveryInput {
            email: "a@x.com".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::Internal(_))),
        "expected Internal, got {result:?}"
    );
}

#[tokio::test]
async fn should_run_login_and_recovery_scenario_for_a_at_x() {
    let h = Harness::new().await;

    let token = h.login("a@x.com", "abc123").await.unwrap();
    assert_eq!(token_validator().validate(&token).unwrap().email, "a@x.com");

    let padded = h.login("a@x.com", " abc123 ").await;
    assert!(matches!(padded, Err(AuthServiceError::InvalidCredentials)));

    h.request("a@x.com").await.unwrap();
    let c1 = h.mail.last_code_for("a@x.com").unwrap();
    h.verify("a@x.com", &c1).await.unwrap();
    h.reset("a@x.com", &c1, "newpass1").await.unwrap();

    h.login("a@x.com", "newpass1").await.unwrap();
    let old = h.login("a@x.com", "abc123").await;
    assert!(
        matches!(old, Err(AuthServiceError::InvalidCredentials)),
        "old password must stop working, got {old:?}"
    );
}
