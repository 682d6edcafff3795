use std::env;
use std::net::SocketAddr;
use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// The minimum length, in bytes, accepted for either secret.
pub const MIN_SECRET_LEN: usize = 32;

/// Endpoints and credentials of the OAuth identity provider.
#[derive(Clone, Debug)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: Zeroizing<String>,
    pub redirect_url: String,
    pub authorize_url: String,
    pub token_url: String,
    pub userinfo_url: String,
}

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The URL of the PostgreSQL database.
    pub database_url: String,
    /// The URL of the Redis server.
    pub redis_url: String,
    /// The base URL of the upstream REST backend.
    pub backend_url: String,
    /// The secret used to sign bearer tokens.
    pub auth_secret: Zeroizing<Vec<u8>>,
    /// The secret used to sign the session cookie.
    pub session_secret: Zeroizing<Vec<u8>>,
    /// Lifetime of a minted bearer token in hours.
    pub token_ttl_hours: i64,
    /// A session expires after this many hours without a request.
    pub session_idle_hours: i64,
    /// Absolute session lifetime in hours, regardless of activity.
    pub session_max_age_hours: i64,
    /// The identity provider settings.
    pub oauth: OAuthConfig,
    /// The address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// The dashboard origin allowed by CORS.
    pub allowed_origin: String,
    /// Set when `APP_ENV=production`; cookies are then marked `Secure`.
    pub production: bool,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn hours_var(name: &str, default: i64) -> Result<i64> {
    let hours: i64 = var_or(name, &default.to_string())
        .parse()
        .with_context(|| format!("Invalid {}", name))?;
    if hours <= 0 {
        anyhow::bail!("{} must be a positive number of hours", name);
    }
    Ok(hours)
}

/// Reads a required secret.
fn secret_var(name: &str) -> Result<Zeroizing<Vec<u8>>> {
    let value = Zeroizing::new(
        env::var(name).with_context(|| format!("{} must be set (generate with: openssl rand -hex 32)", name))?,
    );
    Ok(Zeroizing::new(value.as_bytes().to_vec()))
}

impl Config {
    /// Creates a `Config` with the given secrets, backend and identity
    /// provider, and defaults for everything else. No database or Redis
    /// URL is required by callers that wire in-memory stores.
    pub fn new(
        auth_secret: &[u8],
        session_secret: &[u8],
        backend_url: &str,
        oauth: OAuthConfig,
    ) -> Result<Self> {
        let config = Self {
            database_url: String::new(),
            redis_url: String::new(),
            backend_url: backend_url.trim_end_matches('/').to_string(),
            auth_secret: Zeroizing::new(auth_secret.to_vec()),
            session_secret: Zeroizing::new(session_secret.to_vec()),
            token_ttl_hours: 48,
            session_idle_hours: 24,
            session_max_age_hours: 48,
            oauth,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            allowed_origin: "http://localhost:3000".to_string(),
            production: false,
        };
        config.validate()?;
        Ok(config)
    }

    /// Creates a new `Config` from environment variables.
    ///
    /// A missing `AUTH_SECRET` is fatal: every sign-in path mints tokens.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let oauth = OAuthConfig {
            client_id: env::var("OAUTH_CLIENT_ID").context("OAUTH_CLIENT_ID must be set")?,
            client_secret: Zeroizing::new(
                env::var("OAUTH_CLIENT_SECRET").context("OAUTH_CLIENT_SECRET must be set")?,
            ),
            redirect_url: var_or(
                "OAUTH_REDIRECT_URL",
                "http://localhost:3000/api/auth/callback",
            ),
            authorize_url: var_or(
                "OAUTH_AUTHORIZE_URL",
                "https://accounts.google.com/o/oauth2/v2/auth",
            ),
            token_url: var_or("OAUTH_TOKEN_URL", "https://oauth2.googleapis.com/token"),
            userinfo_url: var_or(
                "OAUTH_USERINFO_URL",
                "https://openidconnect.googleapis.com/v1/userinfo",
            ),
        };

        let config = Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            redis_url: var_or("REDIS_URL", "redis://127.0.0.1:6379"),
            backend_url: var_or("BACKEND_URL", "http://localhost:8080")
                .trim_end_matches('/')
                .to_string(),
            auth_secret: secret_var("AUTH_SECRET")?,
            session_secret: secret_var("SESSION_SECRET")?,
            token_ttl_hours: hours_var("TOKEN_TTL_HOURS", 48)?,
            session_idle_hours: hours_var("SESSION_IDLE_HOURS", 24)?,
            session_max_age_hours: hours_var("SESSION_MAX_AGE_HOURS", 48)?,
            oauth,
            bind_addr: var_or("BIND_ADDR", "127.0.0.1:3000")
                .parse()
                .context("Invalid BIND_ADDR")?,
            allowed_origin: var_or("ALLOWED_ORIGIN", "http://localhost:3000"),
            production: var_or("APP_ENV", "development") == "production",
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (name, secret) in [
            ("AUTH_SECRET", &self.auth_secret),
            ("SESSION_SECRET", &self.session_secret),
        ] {
            if secret.len() < MIN_SECRET_LEN {
                anyhow::bail!("{} must be at least {} bytes", name, MIN_SECRET_LEN);
            }
        }
        if self.auth_secret.as_slice() == self.session_secret.as_slice() {
            anyhow::bail!("AUTH_SECRET and SESSION_SECRET must differ");
        }
        if self.session_idle_hours > self.session_max_age_hours {
            anyhow::bail!("SESSION_IDLE_HOURS cannot exceed SESSION_MAX_AGE_HOURS");
        }
        Ok(())
    }
}
