use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::identity::Identity;

/// Represents a dashboard session.
///
/// The bearer token is cached here once minted and reused until it expires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The session id, also the value of the signed `session_id` cookie.
    pub id: Uuid,
    /// The signed-in identity, if one is established.
    pub identity: Option<Identity>,
    /// The cached bearer token.
    pub token: Option<String>,
    /// The timestamp when the session was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the session expires.
    pub expires_at: DateTime<Utc>,
}

/// How long a session lives.
#[derive(Debug, Clone, Copy)]
pub struct SessionLifetime {
    /// Inactivity window, slid forward on every request.
    pub idle: Duration,
    /// Hard cap measured from creation.
    pub max_age: Duration,
}

impl SessionLifetime {
    pub fn from_hours(idle_hours: i64, max_age_hours: i64) -> Self {
        Self {
            idle: Duration::hours(idle_hours),
            max_age: Duration::hours(max_age_hours),
        }
    }
}

impl Session {
    /// Creates a session for `identity` starting at `now`.
    pub fn new(identity: Identity, now: DateTime<Utc>, lifetime: SessionLifetime) -> Self {
        let mut session = Self {
            id: Uuid::new_v4(),
            identity: Some(identity),
            token: None,
            created_at: now,
            expires_at: now,
        };
        session.touch(now, lifetime);
        session
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Slides the expiry forward, never past `created_at + max_age`.
    pub fn touch(&mut self, now: DateTime<Utc>, lifetime: SessionLifetime) {
        let idle_deadline = now + lifetime.idle;
        let hard_deadline = self.created_at + lifetime.max_age;
        self.expires_at = idle_deadline.min(hard_deadline);
    }

    /// Seconds until expiry, at least one so the store never gets a zero TTL.
    pub fn ttl_seconds(&self, now: DateTime<Utc>) -> u64 {
        (self.expires_at - now).num_seconds().max(1) as u64
    }
}

/// What a request knows about its caller, passed explicitly to everything
/// that needs the identity or the bearer token.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthContext {
    pub session_id: Option<Uuid>,
    pub identity: Option<Identity>,
    pub token: Option<String>,
}

impl AuthContext {
    /// A caller with no session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn from_session(session: &Session) -> Self {
        Self {
            session_id: Some(session.id),
            identity: session.identity.clone(),
            token: session.token.clone(),
        }
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    /// The signed-in name, recorded as `updateBy` on upstream writes.
    pub fn display_name(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.name.as_str())
    }
}
