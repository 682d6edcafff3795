use async_trait::async_trait;
use chrono::Utc;
use redis::{aio::ConnectionManager, AsyncCommands, ExistenceCheck, SetExpiry, SetOptions};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::session::Session,
};

/// Storage for dashboard sessions. Entries expire on their own at `expires_at`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Writes the session, replacing any previous copy.
    async fn save(&self, session: &Session) -> Result<()>;

    /// Overwrites the session only while it still exists. Returns `false`
    /// when it was deleted in the meantime and nothing was written.
    async fn refresh(&self, session: &Session) -> Result<bool>;

    /// Loads a session. Expired sessions are not returned.
    async fn load(&self, id: &Uuid) -> Result<Option<Session>>;

    /// Removes a session.
    async fn delete(&self, id: &Uuid) -> Result<()>;
}

fn session_key(id: &Uuid) -> String {
    format!("session:{}", id)
}

/// The Redis-backed store; keys are `session:<id>` with a TTL matching the expiry.
#[derive(Clone)]
pub struct RedisSessionStore {
    redis: ConnectionManager,
}

impl RedisSessionStore {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn save(&self, session: &Session) -> Result<()> {
        let session_json = sonic_rs::to_string(session)
            .map_err(|e| AppError::Internal(format!("Session serialization failed: {}", e)))?;

        let mut redis = self.redis.clone();
        let _: () = redis
            .set_ex(
                session_key(&session.id),
                &session_json,
                session.ttl_seconds(Utc::now()),
            )
            .await
            .map_err(|e| {
                tracing::error!("❌ Redis set_ex failed: {}", e);
                AppError::Redis(e)
            })?;

        tracing::debug!("✅ Session saved to Redis: session:{}", session.id);
        Ok(())
    }

    async fn refresh(&self, session: &Session) -> Result<bool> {
        let session_json = sonic_rs::to_string(session)
            .map_err(|e| AppError::Internal(format!("Session serialization failed: {}", e)))?;

        let options = SetOptions::default()
            .conditional_set(ExistenceCheck::XX)
            .with_expiration(SetExpiry::EX(session.ttl_seconds(Utc::now())));

        let mut redis = self.redis.clone();
        let written: Option<String> = redis
            .set_options(session_key(&session.id), &session_json, options)
            .await
            .map_err(|e| {
                tracing::error!("❌ Redis SET XX failed: {}", e);
                AppError::Redis(e)
            })?;

        Ok(written.is_some())
    }

    async fn load(&self, id: &Uuid) -> Result<Option<Session>> {
        let mut redis = self.redis.clone();
        let session_json: Option<String> = redis.get(session_key(id)).await?;

        let Some(session_json) = session_json else {
            return Ok(None);
        };

        match sonic_rs::from_str::<Session>(&session_json) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!("❌ Invalid session JSON for {}: {}", id, e);
                let _: () = redis.del(session_key(id)).await?;
                Ok(None)
            }
        }
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        let mut redis = self.redis.clone();
        let _: () = redis.del(session_key(id)).await?;
        tracing::debug!("✅ Session deleted from Redis: session:{}", id);
        Ok(())
    }
}

/// An in-process store, used by tests and local runs without Redis.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn save(&self, session: &Session) -> Result<()> {
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        Ok(())
    }

    async fn refresh(&self, session: &Session) -> Result<bool> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&session.id) {
            Some(stored) => {
                *stored = session.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn load(&self, id: &Uuid) -> Result<Option<Session>> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        match sessions.get(id) {
            Some(session) if session.is_expired(now) => {
                sessions.remove(id);
                Ok(None)
            }
            Some(session) => Ok(Some(session.clone())),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        self.sessions.write().await.remove(id);
        Ok(())
    }
}
