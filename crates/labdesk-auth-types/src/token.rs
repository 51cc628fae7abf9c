//! JWT access-token claims and validation.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
use serde::Serialize;
use uuid::Uuid;

/// User identity extracted from a validated access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub username: String,
    pub is_admin: bool,
    pub token_id: Uuid,
    pub expires_at: u64,
}

/// Errors returned by [`TokenValidator`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    Missing,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("unexpected issuer or audience")]
    ForeignToken,
    #[error("malformed token")]
    Malformed,
}

/// JWT claims payload shared by token creation (auth service) and validation (all services).
///
/// # Fields
///
/// | Field | JWT claim | Rust type | Meaning |
/// |-------|-----------|-----------|---------|
/// | `sub` | `sub` | string | account e-mail |
/// | `uid` | custom | UUID | account id |
/// | `email` | custom | string | account e-mail (same as `sub`) |
/// | `name` | custom | string | display name |
/// | `username` | custom | string | unique username |
/// | `is_admin` | custom | bool | admin flag |
/// | `jti` | `jti` | UUID | fresh per token, never tracked server side |
/// | `iat` / `exp` | `iat` / `exp` | seconds since epoch | issue / expiry instants |
/// | `iss` / `aud` | `iss` / `aud` | string | issuer / audience from config |
///
/// `email` duplicates `sub` because consumers look the address up under either name.
///
/// # Feature gate
///
/// [`Deserialize`] is always available; all consumers validate tokens.
/// [`Serialize`] requires the **`USE_ONLY_IN_AUTH_SERVICE`** cargo feature. Only the auth
/// service enables it because it is the sole token issuer.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test), derive(Serialize))]
pub struct AccessClaims {
    pub sub: String,
    pub uid: Uuid,
    pub email: String,
    pub name: String,
    pub username: String,
    pub is_admin: bool,
    pub jti: Uuid,
    pub iat: u64,
    pub exp: u64,
    pub iss: String,
    pub aud: String,
}

impl From<AccessClaims> for TokenInfo {
    fn from(claims: AccessClaims) -> Self {
        Self {
            user_id: claims.uid,
            email: claims.email,
            name: claims.name,
            username: claims.username,
            is_admin: claims.is_admin,
            token_id: claims.jti,
            expires_at: claims.exp,
        }
    }
}

struct ValidatorInner {
    key: DecodingKey,
    validation: Validation,
}

/// Verifies HS256 access tokens against a shared secret, issuer and audience.
///
/// Cheap to clone; the decoding key is shared.
#[derive(Clone)]
pub struct TokenValidator {
    inner: Arc<ValidatorInner>,
}

impl TokenValidator {
    /// Validation: HS256, `exp` checked with the default 60s leeway,
    /// `iss` and `aud` must match, required claims `sub`, `exp`, `iss`, `aud`.
    pub fn new(secret: &str, issuer: &str, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["sub", "exp", "iss", "aud"]);

        Self {
            inner: Arc::new(ValidatorInner {
                key: DecodingKey::from_secret(secret.as_bytes()),
                validation,
            }),
        }
    }

    /// Decode and validate a token, returning its raw claims.
    pub fn decode(&self, token: &str) -> Result<AccessClaims, AuthError> {
        use jsonwebtoken::errors::ErrorKind;

        let data = decode::<AccessClaims>(token, &self.inner.key, &self.inner.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => AuthError::ForeignToken,
                _ => AuthError::Malformed,
            })?;
        Ok(data.claims)
    }

    /// Validate a bearer token value, returning the identity it carries.
    pub fn validate(&self, token: &str) -> Result<TokenInfo, AuthError> {
        self.decode(token).map(TokenInfo::from)
    }
}

impl std::fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenValidator")
            .field("validation", &self.inner.validation)
            .finish_non_exhaustive()
    }
}
