use labdesk_auth::error::AuthServiceError;
use labdesk_auth::infra::password::Argon2PasswordHasher;
use labdesk_auth::usecase::login::{LoginInput, LoginUseCase};

use crate::helpers::{
    MockUserRepo, fast_hasher, seeded_repo, test_account, test_address, token_issuer,
    token_validator,
};

fn login(users: MockUserRepo) -> LoginUseCase<MockUserRepo, Argon2PasswordHasher> {
    LoginUseCase {
        users,
        hasher: fast_hasher(),
        tokens: token_issuer(),
    }
}

#[tokio::test]
async fn should_issue_token_for_valid_credentials() {
    let (repo, account) = seeded_repo().await;
    let uc = login(repo.clone());

    let out = uc
        .execute(LoginInput {
            email: "a@x.com".to_owned(),
            password: "abc123".to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(out.account.id, account.id);
    assert_eq!(out.account.email, "a@x.com");
    assert!(!out.account.is_admin);
    assert!(out.expires_at > chrono::Utc::now() + chrono::Duration::hours(23));

    let info = token_validator().validate(&out.token).unwrap();
    assert_eq!(info.user_id, account.id);
    assert_eq!(info.email, "a@x.com");
    assert_eq!(info.username, "ana");
    assert!(!info.is_admin);
    assert_eq!(info.expires_at as i64, out.expires_at.timestamp());
}

#[tokio::test]
async fn should_record_last_login() {
    let (repo, _) = seeded_repo().await;
    let uc = login(repo.clone());

    let out = uc
        .execute(LoginInput {
            email: "a@x.com".to_owned(),
            password: "abc123".to_owned(),
        })
        .await
        .unwrap();

    let (stored, _) = repo.find("a@x.com").unwrap();
    assert!(stored.last_login_at.is_some());
    assert_eq!(stored.last_login_at, out.account.last_login_at);
}

#[tokio::test]
async fn should_reject_wrong_password() {
    let (repo, _) = seeded_repo().await;
    let uc = login(repo.clone());

    let result = uc
        .execute(LoginInput {
            email: "a@x.com".to_owned(),
            password: "wrong".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
    let (stored, _) = repo.find("a@x.com").unwrap();
    assert!(stored.last_login_at.is_none(), "failed login must not touch last_login_at");
}

#[tokio::test]
async fn should_reject_unknown_email_like_wrong_password() {
    let uc = login(MockUserRepo::empty());

    let result = uc
        .execute(LoginInput {
            email: "nobody@x.com".to_owned(),
            password: "abc123".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_inactive_account_with_correct_password() {
    let mut account = test_account("b@x.com", "bia", "abc123").await;
    account.is_active = false;
    let uc = login(MockUserRepo::new(vec![(account, test_address())]));

    let result = uc
        .execute(LoginInput {
            email: "b@x.com".to_owned(),
            password: "abc123".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
}

#[tokio::test]
async fn should_match_email_exactly() {
    let (repo, _) = seeded_repo().await;
    let uc = login(repo);

    let result = uc
        .execute(LoginInput {
            email: "A@X.com".to_owned(),
            password: "abc123".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(AuthServiceError::InvalidCredentials)));
}

#[tokio::test]
async fn should_carry_admin_flag_into_token() {
    let mut account = test_account("root@x.com", "root", "s3cret").await;
    account.is_admin = true;
    let uc = login(MockUserRepo::new(vec![(account, test_address())]));

    let out = uc
        .execute(LoginInput {
            email: "root@x.com".to_owned(),
            password: "s3cret".to_owned(),
        })
        .await
        .unwrap();

    assert!(out.account.is_admin);
    assert!(token_validator().validate(&out.token).unwrap().is_admin);
}
