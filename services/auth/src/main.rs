use anyhow::Context as _;
use sea_orm::Database;
use tracing::{info, warn};

use labdesk_auth::config::AuthConfig;
use labdesk_auth::infra::cache::{
    InMemoryRecoveryCodeStore, RecoveryCodeCache, RedisRecoveryCodeStore,
};
use labdesk_auth::infra::mailer::Mailer;
use labdesk_auth::infra::password::Argon2PasswordHasher;
use labdesk_auth::router::build_router;
use labdesk_auth::state::AppState;
use labdesk_auth::usecase::token::TokenIssuer;
use labdesk_auth_types::token::TokenValidator;
use labdesk_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AuthConfig::from_env()?;
    init_tracing(config.log_format);

    if config.jwt_secret.len() < 32 {
        warn!("JWT_SECRET is shorter than 32 bytes");
    }

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let recovery_codes = match &config.redis_url {
        Some(url) => {
            let pool = deadpool_redis::Config::from_url(url)
                .create_pool(Some(deadpool_redis::Runtime::Tokio1))
                .context("failed to create Redis pool")?;
            RecoveryCodeCache::Redis(RedisRecoveryCodeStore { pool })
        }
        None => {
            warn!("REDIS_URL not set, recovery codes are kept in process memory");
            RecoveryCodeCache::Memory(InMemoryRecoveryCodeStore::new())
        }
    };

    let mailer = Mailer::select(
        config.mail_api_url.clone(),
        config.mail_api_key.clone(),
        config.mail_from.clone(),
        config.mail_log_only,
    )?;
    if let Mailer::Log(_) = mailer {
        warn!("MAIL_LOG_ONLY set: recovery requests report success but no mail is delivered");
    }

    let token_issuer = TokenIssuer::new(
        &config.jwt_secret,
        config.jwt_issuer.clone(),
        config.jwt_audience.clone(),
        config.jwt_ttl,
    );
    let token_validator =
        TokenValidator::new(&config.jwt_secret, &config.jwt_issuer, &config.jwt_audience);

    info!(
        codes = recovery_codes.backend(),
        mail = mailer.backend(),
        "backends selected"
    );

    let state = AppState {
        db,
        recovery_codes,
        mailer,
        hasher: Argon2PasswordHasher::new(),
        token_issuer,
        token_validator,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("auth service listening on {addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
