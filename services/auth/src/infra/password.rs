use anyhow::{Context as _, anyhow};
use argon2::password_hash::{PasswordHash, SaltString, rand_core::OsRng};
use argon2::{
    Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier as _, Version,
};

use crate::domain::repository::PasswordHasher;
use crate::error::AuthServiceError;

/// Argon2id hasher producing PHC strings. Work runs on the blocking pool.
#[derive(Clone, Default)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// OWASP-recommended Argon2id defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Custom cost parameters (memory in KiB, iterations, lanes).
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, AuthServiceError> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| anyhow!("invalid argon2 params: {e}"))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, AuthServiceError> {
        let argon2 = self.argon2.clone();
        let password = password.to_owned();
        let hash = tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| anyhow!("hash password: {e}"))
        })
        .await
        .context("password hashing task")??;
        Ok(hash)
    }

    async fn verify(&self, password: &str, password_hash: &str) -> Result<bool, AuthServiceError> {
        let argon2 = self.argon2.clone();
        let password = password.to_owned();
        let password_hash = password_hash.to_owned();
        let matched = tokio::task::spawn_blocking(move || {
            // Cost parameters come from the stored PHC string, not from `argon2`.
            let parsed = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow!("stored password hash is unreadable: {e}"))?;
            match argon2.verify_password(password.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(argon2::password_hash::Error::Password) => Ok(false),
                Err(e) => Err(anyhow!("verify password: {e}")),
            }
        })
        .await
        .context("password verification task")??;
        Ok(matched)
    }
}
