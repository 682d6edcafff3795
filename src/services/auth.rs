use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    admin::{AdminUpsert, DEFAULT_ROLE},
    identity::{Identity, OAuthProfile},
    session::{AuthContext, Session, SessionLifetime},
};
use crate::repositories::{admin::AdminStore, session::SessionStore};
use crate::services::token::{resolve_token, TokenSigner};
use crate::validation::auth::validate_profile;

/// Turns identity provider sign-ins into sessions and sessions into bearer tokens.
#[derive(Clone)]
pub struct TokenBridge {
    admins: Arc<dyn AdminStore>,
    sessions: Arc<dyn SessionStore>,
    signer: TokenSigner,
    lifetime: SessionLifetime,
}

impl TokenBridge {
    /// Creates a new `TokenBridge`.
    ///
    /// # Arguments
    ///
    /// * `admins` - Where admin records are upserted and looked up.
    /// * `sessions` - Where sessions are kept.
    /// * `signer` - Mints the bearer tokens.
    /// * `lifetime` - Idle window and hard cap for sessions.
    pub fn new(
        admins: Arc<dyn AdminStore>,
        sessions: Arc<dyn SessionStore>,
        signer: TokenSigner,
        lifetime: SessionLifetime,
    ) -> Self {
        Self {
            admins,
            sessions,
            signer,
            lifetime,
        }
    }

    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    /// Establishes a session from an identity provider profile.
    ///
    /// Upserts the admin keyed by email, mints a token and caches it on the
    /// new session.
    ///
    /// # Arguments
    ///
    /// * `profile` - The profile returned by the identity provider.
    ///
    /// # Returns
    ///
    /// A `Result` containing the saved `Session`, or `SignInRejected` when
    /// the profile lacks an email or a name. Nothing is written in that case.
    pub async fn sign_in(&self, profile: &OAuthProfile) -> Result<Session> {
        let verified = validate_profile(profile)?;
        tracing::debug!("🔐 Signing in: {}", verified.email);

        let admin = self
            .admins
            .upsert(AdminUpsert {
                email: verified.email,
                name: verified.name,
                image: verified.picture,
                role: DEFAULT_ROLE.to_string(),
            })
            .await?;

        tracing::info!("✅ Admin upserted: {}", admin.id);

        let mut session = Session::new(admin.identity(), Utc::now(), self.lifetime);
        session.token = Some(resolve_token(&self.signer, &admin.identity())?);
        self.sessions.save(&session).await?;

        tracing::info!("✅ Session established: {}", session.id);
        Ok(session)
    }

    /// Returns the session's bearer token, minting one when needed.
    ///
    /// A cached, unexpired token is returned unchanged. Otherwise, when the
    /// session carries an identity, the admin is looked up again and a new
    /// token is minted and cached. Without an identity there is no token.
    pub async fn ensure_token(&self, session: &mut Session, now: DateTime<Utc>) -> Result<Option<String>> {
        if let Some(token) = session.token.as_deref() {
            if self.signer.is_reusable(token, now) {
                return Ok(Some(token.to_string()));
            }
            tracing::debug!("🔑 Cached token expired for session {}", session.id);
        }

        let Some(identity) = session.identity.clone() else {
            session.token = None;
            return Ok(None);
        };

        let identity = self.refresh_identity(identity).await?;
        let token = resolve_token(&self.signer, &identity)?;
        session.identity = Some(identity);
        session.token = Some(token.clone());

        tracing::debug!("🔑 Minted token for session {}", session.id);
        Ok(Some(token))
    }

    /// Prefers the stored admin's current name and email; falls back to the
    /// identity the session already carries.
    async fn refresh_identity(&self, identity: Identity) -> Result<Identity> {
        match self.admins.find_by_id(&identity.id).await? {
            Some(admin) => Ok(admin.identity()),
            None => {
                tracing::warn!(
                    "⚠️ Admin {} not found, minting from session identity",
                    identity.id
                );
                Ok(identity)
            }
        }
    }

    /// Loads the session behind `session_id`, slides its expiry, and resolves
    /// its token.
    ///
    /// # Returns
    ///
    /// An anonymous context when there is no id or no live session.
    pub async fn current(&self, session_id: Option<Uuid>) -> Result<AuthContext> {
        let Some(session_id) = session_id else {
            return Ok(AuthContext::anonymous());
        };

        let Some(mut session) = self.sessions.load(&session_id).await? else {
            tracing::debug!("No live session for {}", session_id);
            return Ok(AuthContext::anonymous());
        };

        let now = Utc::now();
        if session.is_expired(now) {
            tracing::warn!("❌ Session expired: {}", session_id);
            self.sessions.delete(&session_id).await?;
            return Ok(AuthContext::anonymous());
        }

        session.touch(now, self.lifetime);
        self.ensure_token(&mut session, now).await?;
        if !self.sessions.refresh(&session).await? {
            tracing::debug!("Session {} was signed out mid-request", session_id);
            return Ok(AuthContext::anonymous());
        }

        Ok(AuthContext::from_session(&session))
    }

    /// Destroys a session.
    pub async fn sign_out(&self, session_id: &Uuid) -> Result<()> {
        self.sessions.delete(session_id).await?;
        tracing::info!("👋 Session destroyed: {}", session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::repositories::{admin::MemoryAdminStore, session::MemorySessionStore};
    use chrono::Duration;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    struct Fixture {
        admins: MemoryAdminStore,
        sessions: MemorySessionStore,
        bridge: TokenBridge,
    }

    fn fixture() -> Fixture {
        let admins = MemoryAdminStore::new();
        let sessions = MemorySessionStore::new();
        let bridge = TokenBridge::new(
            Arc::new(admins.clone()),
            Arc::new(sessions.clone()),
            TokenSigner::new(SECRET, 48).unwrap(),
            SessionLifetime::from_hours(24, 48),
        );
        Fixture {
            admins,
            sessions,
            bridge,
        }
    }

    fn profile(email: Option<&str>, name: Option<&str>) -> OAuthProfile {
        OAuthProfile {
            email: email.map(str::to_string),
            name: name.map(str::to_string),
            picture: Some("https://img.example.com/a.png".to_string()),
        }
    }

    #[tokio::test]
    async fn sign_in_upserts_admin_and_yields_token() {
        let f = fixture();
        let session = f
            .bridge
            .sign_in(&profile(Some("ada@example.com"), Some("Ada")))
            .await
            .unwrap();

        assert_eq!(f.admins.len().await, 1);
        let identity = session.identity.clone().unwrap();
        let stored = f.admins.find_by_id(&identity.id).await.unwrap().unwrap();
        assert_eq!(stored.email, "ada@example.com");
        assert_eq!(stored.role, DEFAULT_ROLE);

        let ctx = f.bridge.current(Some(session.id)).await.unwrap();
        let token = ctx.bearer_token().unwrap();
        let claims = f.bridge.signer().verify(token).unwrap();
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.sub, identity.id.to_string());
    }

    #[tokio::test]
    async fn repeated_sign_in_keeps_one_admin() {
        let f = fixture();
        let p = profile(Some("ada@example.com"), Some("Ada"));
        f.bridge.sign_in(&p).await.unwrap();
        f.bridge.sign_in(&p).await.unwrap();
        assert_eq!(f.admins.len().await, 1);
        assert_eq!(f.sessions.len().await, 2);
    }

    #[tokio::test]
    async fn incomplete_profile_establishes_nothing() {
        let f = fixture();
        for p in [
            profile(None, Some("Ada")),
            profile(Some("ada@example.com"), None),
        ] {
            let err = f.bridge.sign_in(&p).await.unwrap_err();
            assert!(matches!(err, AppError::SignInRejected(_)));
        }
        assert_eq!(f.admins.len().await, 0);
        assert_eq!(f.sessions.len().await, 0);
    }

    #[tokio::test]
    async fn cached_token_is_returned_unchanged() {
        let f = fixture();
        let session = f
            .bridge
            .sign_in(&profile(Some("ada@example.com"), Some("Ada")))
            .await
            .unwrap();
        let minted = session.token.clone().unwrap();

        for _ in 0..3 {
            let ctx = f.bridge.current(Some(session.id)).await.unwrap();
            assert_eq!(ctx.bearer_token(), Some(minted.as_str()));
        }
    }

    #[tokio::test]
    async fn token_is_minted_lazily_when_missing() {
        let f = fixture();
        let mut session = f
            .bridge
            .sign_in(&profile(Some("ada@example.com"), Some("Ada")))
            .await
            .unwrap();
        session.token = None;
        f.sessions.save(&session).await.unwrap();

        let ctx = f.bridge.current(Some(session.id)).await.unwrap();
        let token = ctx.bearer_token().unwrap().to_string();

        let again = f.bridge.current(Some(session.id)).await.unwrap();
        assert_eq!(again.bearer_token(), Some(token.as_str()));
    }

    #[tokio::test]
    async fn expired_token_is_replaced() {
        let f = fixture();
        let mut session = f
            .bridge
            .sign_in(&profile(Some("ada@example.com"), Some("Ada")))
            .await
            .unwrap();
        let identity = session.identity.clone().unwrap();
        let stale = f
            .bridge
            .signer()
            .mint_at(&identity, Utc::now() - Duration::hours(72))
            .unwrap();
        session.token = Some(stale.clone());

        let token = f
            .bridge
            .ensure_token(&mut session, Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert_ne!(token, stale);
        assert_eq!(session.token.as_deref(), Some(token.as_str()));
    }

    #[tokio::test]
    async fn session_without_identity_has_no_token() {
        let f = fixture();
        let now = Utc::now();
        let mut session = Session {
            id: Uuid::new_v4(),
            identity: None,
            token: None,
            created_at: now,
            expires_at: now + Duration::hours(1),
        };
        assert!(f.bridge.ensure_token(&mut session, now).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_or_missing_session_is_anonymous() {
        let f = fixture();
        assert_eq!(f.bridge.current(None).await.unwrap(), AuthContext::anonymous());
        assert_eq!(
            f.bridge.current(Some(Uuid::new_v4())).await.unwrap(),
            AuthContext::anonymous()
        );
    }

    /// Deletes the session right after handing it out, as a sign-out
    /// running alongside the request would.
    struct SignOutAfterLoad(MemorySessionStore);

    #[async_trait::async_trait]
    impl SessionStore for SignOutAfterLoad {
        async fn save(&self, session: &Session) -> Result<()> {
            self.0.save(session).await
        }

        async fn refresh(&self, session: &Session) -> Result<bool> {
            self.0.refresh(session).await
        }

        async fn load(&self, id: &Uuid) -> Result<Option<Session>> {
            let session = self.0.load(id).await?;
            self.0.delete(id).await?;
            Ok(session)
        }

        async fn delete(&self, id: &Uuid) -> Result<()> {
            self.0.delete(id).await
        }
    }

    #[tokio::test]
    async fn concurrent_sign_out_is_not_undone_by_refresh() {
        let f = fixture();
        let session = f
            .bridge
            .sign_in(&profile(Some("ada@example.com"), Some("Ada")))
            .await
            .unwrap();

        let racing = TokenBridge::new(
            Arc::new(f.admins.clone()),
            Arc::new(SignOutAfterLoad(f.sessions.clone())),
            TokenSigner::new(SECRET, 48).unwrap(),
            SessionLifetime::from_hours(24, 48),
        );

        let ctx = racing.current(Some(session.id)).await.unwrap();
        assert_eq!(ctx, AuthContext::anonymous());
        assert_eq!(f.sessions.len().await, 0);
        assert!(f.sessions.load(&session.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sign_out_removes_the_session() {
        let f = fixture();
        let session = f
            .bridge
            .sign_in(&profile(Some("ada@example.com"), Some("Ada")))
            .await
            .unwrap();
        f.bridge.sign_out(&session.id).await.unwrap();
        assert_eq!(
            f.bridge.current(Some(session.id)).await.unwrap(),
            AuthContext::anonymous()
        );
    }
}
