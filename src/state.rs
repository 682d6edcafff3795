use redis::aio::ConnectionManager;
use sha2::{Digest, Sha512};
use std::sync::Arc;
use tower_cookies::Key;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::session::SessionLifetime;
use crate::repositories::{
    admin::{AdminStore, PgAdminStore},
    session::{RedisSessionStore, SessionStore},
    user::{PgUserStore, UserStore},
};
use crate::services::{
    api_client::ApiClient,
    auth::TokenBridge,
    oauth::{IdentityProvider, OAuthProvider},
    token::TokenSigner,
};

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Arc<Config>,
    /// Sign-in, sessions and bearer tokens.
    pub bridge: TokenBridge,
    pub admins: Arc<dyn AdminStore>,
    pub users: Arc<dyn UserStore>,
    /// The authenticated client for the upstream backend.
    pub api: ApiClient,
    pub provider: Arc<dyn IdentityProvider>,
    /// Signs the session cookie.
    pub cookie_key: Key,
}

/// Derives the 64-byte cookie signing key from the session secret.
fn cookie_key(session_secret: &[u8]) -> Result<Key> {
    let digest = Sha512::digest(session_secret);
    Key::try_from(digest.as_slice())
        .map_err(|e| AppError::Configuration(format!("Invalid cookie key: {}", e)))
}

impl AppState {
    /// Creates a new `AppState` backed by PostgreSQL and Redis.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = crate::db::create_pool(&config.database_url)?;
        crate::db::ensure_schema(&db).await?;
        tracing::info!("✅ PostgreSQL Pool initialized with deadpool-postgres");

        let redis_client = redis::Client::open(config.redis_url.as_str())?;
        let redis = ConnectionManager::new(redis_client).await?;
        tracing::info!("✅ Redis Connection Manager initialized");

        let api = ApiClient::new(config.backend_url.clone())?;
        let provider = OAuthProvider::new(api.http().clone(), config.oauth.clone());

        Self::from_parts(
            config.clone(),
            Arc::new(PgAdminStore::new(db.clone())),
            Arc::new(PgUserStore::new(db)),
            Arc::new(RedisSessionStore::new(redis)),
            Arc::new(provider),
            api,
        )
    }

    /// Assembles the state from already-built stores and clients.
    pub fn from_parts(
        config: Config,
        admins: Arc<dyn AdminStore>,
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        provider: Arc<dyn IdentityProvider>,
        api: ApiClient,
    ) -> Result<Self> {
        let signer = TokenSigner::new(&config.auth_secret, config.token_ttl_hours)?;
        let lifetime =
            SessionLifetime::from_hours(config.session_idle_hours, config.session_max_age_hours);
        let bridge = TokenBridge::new(admins.clone(), sessions, signer, lifetime);
        let cookie_key = cookie_key(&config.session_secret)?;

        tracing::info!("✅ Token bridge initialized (token TTL {}h)", config.token_ttl_hours);

        Ok(AppState {
            config: Arc::new(config),
            bridge,
            admins,
            users,
            api,
            provider,
            cookie_key,
        })
    }
}
