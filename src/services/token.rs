use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::identity::Identity;

/// Claims carried by a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The identity id.
    pub sub: String,
    pub name: String,
    pub email: String,
    /// Issued at (seconds since epoch).
    pub iat: i64,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}

/// Signs and checks HS256 bearer tokens with a fixed lifetime.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner").field("ttl", &self.ttl).finish()
    }
}

impl TokenSigner {
    /// Creates a signer.
    ///
    /// # Arguments
    ///
    /// * `secret` - The signing secret. Empty is a configuration error.
    /// * `ttl_hours` - Token lifetime in hours.
    pub fn new(secret: &[u8], ttl_hours: i64) -> Result<Self> {
        if secret.is_empty() {
            return Err(AppError::Configuration(
                "token signing secret is not set".to_string(),
            ));
        }
        if ttl_hours <= 0 {
            return Err(AppError::Configuration(
                "token lifetime must be positive".to_string(),
            ));
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: Duration::hours(ttl_hours),
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mints a token for `identity` issued at `now`.
    pub fn mint_at(&self, identity: &Identity, now: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            sub: identity.id.to_string(),
            name: identity.name.clone(),
            email: identity.email.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Decodes `token` and checks its signature and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }

    /// Whether a cached token can still be handed out at `now`.
    pub fn is_reusable(&self, token: &str, now: DateTime<Utc>) -> bool {
        match self.verify(token) {
            Ok(claims) => claims.exp > now.timestamp(),
            Err(e) => {
                tracing::debug!("Cached token rejected: {}", e);
                false
            }
        }
    }
}

/// The one place a bearer token is minted, whichever path produced the identity.
pub fn resolve_token(signer: &TokenSigner, identity: &Identity) -> Result<String> {
    signer.mint_at(identity, Utc::now())
}
