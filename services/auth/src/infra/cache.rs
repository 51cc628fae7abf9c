use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Context as _;
use chrono::Utc;
use deadpool_redis::Pool;
use deadpool_redis::redis::AsyncCommands;

use crate::domain::repository::RecoveryCodeStore;
use crate::domain::types::RecoveryCode;
use crate::error::AuthServiceError;

// ── In-process store ──────────────────────────────────────────────────────────

/// Mutex-guarded map. Only correct for a single service replica.
#[derive(Clone, Default)]
pub struct InMemoryRecoveryCodeStore {
    entries: Arc<Mutex<HashMap<String, RecoveryCode>>>,
}

impl InMemoryRecoveryCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, RecoveryCode>>, AuthServiceError> {
        self.entries
            .lock()
            .map_err(|_| AuthServiceError::Internal(anyhow::anyhow!("recovery code store poisoned")))
    }

    /// Number of entries currently held, expired ones included.
    pub fn len(&self) -> Result<usize, AuthServiceError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, AuthServiceError> {
        Ok(self.lock()?.is_empty())
    }
}

impl RecoveryCodeStore for InMemoryRecoveryCodeStore {
    async fn put(&self, email: &str, code: &RecoveryCode) -> Result<(), AuthServiceError> {
        self.lock()?.insert(email.to_owned(), code.clone());
        Ok(())
    }

    async fn get(&self, email: &str) -> Result<Option<RecoveryCode>, AuthServiceError> {
        let now = Utc::now();
        let mut entries = self.lock()?;
        // Sweep every key, not just this one.
        entries.retain(|_, code| !code.is_expired(now));
        Ok(entries.get(email).cloned())
    }

    async fn remove(&self, email: &str) -> Result<(), AuthServiceError> {
        self.lock()?.remove(email);
        Ok(())
    }
}

// ── Redis store ───────────────────────────────────────────────────────────────

/// Redis-backed store; entries expire through the key TTL.
#[derive(Clone)]
pub struct RedisRecoveryCodeStore {
    pub pool: Pool,
}

fn recovery_key(email: &str) -> String {
    format!("recovery_code:{}", email)
}

impl RecoveryCodeStore for RedisRecoveryCodeStore {
    async fn put(&self, email: &str, code: &RecoveryCode) -> Result<(), AuthServiceError> {
        let ttl = (code.expires_at - Utc::now()).num_seconds().max(1) as u64;
        let value = serde_json::to_string(code).context("serialize recovery code")?;
        let mut conn = self.pool.get().await.context("redis connection")?;
        let (): () = conn
            .set_ex(recovery_key(email), value, ttl)
            .await
            .context("store recovery code")?;
        Ok(())
    }

    async fn get(&self, email: &str) -> Result<Option<RecoveryCode>, AuthServiceError> {
        let mut conn = self.pool.get().await.context("redis connection")?;
        let value: Option<String> = conn
            .get(recovery_key(email))
            .await
            .context("load recovery code")?;
        let Some(value) = value else {
            return Ok(None);
        };
        let code: RecoveryCode =
            serde_json::from_str(&value).context("deserialize recovery code")?;
        Ok((!code.is_expired(Utc::now())).then_some(code))
    }

    async fn remove(&self, email: &str) -> Result<(), AuthServiceError> {
        let mut conn = self.pool.get().await.context("redis connection")?;
        let _: i64 = conn
            .del(recovery_key(email))
            .await
            .context("delete recovery code")?;
        Ok(())
    }
}

// ── Configured backend ────────────────────────────────────────────────────────

/// The backend selected at startup.
#[derive(Clone)]
pub enum RecoveryCodeCache {
    Memory(InMemoryRecoveryCodeStore),
    Redis(RedisRecoveryCodeStore),
}

impl RecoveryCodeCache {
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Redis(_) => "redis",
        }
    }
}

impl RecoveryCodeStore for RecoveryCodeCache {
    async fn put(&self, email: &str, code: &RecoveryCode) -> Result<(), AuthServiceError> {
        match self {
            Self::Memory(store) => store.put(email, code).await,
            Self::Redis(store) => store.put(email, code).await,
        }
    }

    async fn get(&self, email: &str) -> Result<Option<RecoveryCode>, AuthServiceError> {
        match self {
            Self::Memory(store) => store.get(email).await,
            Self::Redis(store) => store.get(email).await,
        }
    }

    async fn remove(&self, email: &str) -> Result<(), AuthServiceError> {
        match self {
            Self::Memory(store) => store.remove(email).await,
            Self::Redis(store) => store.remove(email).await,
        }
    }
}
