use anyhow::Context as _;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use labdesk_auth_types::token::AccessClaims;

use crate::domain::types::UserAccount;
use crate::error::AuthServiceError;

/// Signed access token and the instant its `exp` claim points at.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs HS256 access tokens. Tokens are never recorded server side.
#[derive(Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, issuer: String, audience: String, ttl: Duration) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            ttl,
        }
    }

    pub fn issue(&self, account: &UserAccount) -> Result<IssuedToken, AuthServiceError> {
        // Whole seconds so `expires_at` equals the `exp` claim exactly.
        let issued_at = Utc::now().trunc_subsecs(0);
        let expires_at = issued_at + self.ttl;
        let claims = AccessClaims {
            sub: account.email.clone(),
            uid: account.id,
            email: account.email.clone(),
            name: account.name.clone(),
            username: account.username.clone(),
            is_admin: account.is_admin,
            jti: Uuid::new_v4(),
            iat: unix_secs(issued_at),
            exp: unix_secs(expires_at),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.key).context("sign access token")?;
        Ok(IssuedToken { token, expires_at })
    }
}

fn unix_secs(at: DateTime<Utc>) -> u64 {
    at.timestamp().max(0) as u64
}
