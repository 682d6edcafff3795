use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::{
    error::AppError,
    handlers::auth::removal_cookie,
    models::session::AuthContext,
    state::AppState,
};

/// The signed cookie holding the session id.
pub const SESSION_COOKIE: &str = "session_id";

/// Extracts the session id from the signed session cookie.
///
/// # Arguments
///
/// * `state` - The application state, holding the signing key.
/// * `cookies` - The request cookies.
///
/// # Returns
///
/// An `Option` containing the session ID if the cookie is present and its
/// signature checks out.
pub fn extract_session_id(state: &AppState, cookies: &Cookies) -> Option<Uuid> {
    cookies
        .signed(&state.cookie_key)
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

/// Resolves the caller's `AuthContext` and attaches it to the request.
///
/// A missing, forged or expired session yields an anonymous context and
/// drops the cookie. A failing session store is answered with the error and
/// the cookie is left in place.
pub async fn load_session(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let session_id = extract_session_id(&state, &cookies);

    let ctx = match state.bridge.current(session_id).await {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!("❌ Failed to load session: {}", e);
            return e.into_response();
        }
    };

    if ctx.session_id.is_none() && session_id.is_some() {
        tracing::debug!("🍪 Dropping stale session cookie");
        cookies
            .signed(&state.cookie_key)
            .remove(removal_cookie(SESSION_COOKIE));
    }

    request.extensions_mut().insert(ctx);
    next.run(request).await
}

/// A middleware that requires a signed-in identity. Runs after `load_session`.
pub async fn require_auth(request: Request<Body>, next: Next) -> Response {
    tracing::debug!("🔐 Checking authentication...");

    let authenticated = request
        .extensions()
        .get::<AuthContext>()
        .is_some_and(|ctx| ctx.identity.is_some());

    if !authenticated {
        tracing::warn!("❌ No signed-in identity");
        return AppError::Unauthorized.into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{Config, OAuthConfig},
        error::Result,
        handlers,
        models::{identity::OAuthProfile, session::Session},
        repositories::{
            admin::MemoryAdminStore,
            session::{MemorySessionStore, SessionStore},
            user::MemoryUserStore,
        },
        services::{api_client::ApiClient, oauth::OAuthProvider},
    };
    use axum::{
        http::{header, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };
    use tower::ServiceExt;
    use tower_cookies::{cookie::CookieJar, Cookie, CookieManagerLayer};
    use zeroize::Zeroizing;

    /// A memory store whose reads fail while `down` is set.
    #[derive(Clone, Default)]
    struct FlakySessionStore {
        inner: MemorySessionStore,
        down: Arc<AtomicBool>,
    }

    impl FlakySessionStore {
        fn check(&self) -> Result<()> {
            if self.down.load(Ordering::SeqCst) {
                let e = redis::RedisError::from((redis::ErrorKind::IoError, "connection refused"));
                return Err(AppError::Redis(e));
            }
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl SessionStore for FlakySessionStore {
        async fn save(&self, session: &Session) -> Result<()> {
            self.check()?;
            self.inner.save(session).await
        }

        async fn refresh(&self, session: &Session) -> Result<bool> {
            self.check()?;
            self.inner.refresh(session).await
        }

        async fn load(&self, id: &Uuid) -> Result<Option<Session>> {
            self.check()?;
            self.inner.load(id).await
        }

        async fn delete(&self, id: &Uuid) -> Result<()> {
            self.check()?;
            self.inner.delete(id).await
        }
    }

    fn state(sessions: FlakySessionStore) -> AppState {
        let oauth = OAuthConfig {
            client_id: "dashboard".to_string(),
            client_secret: Zeroizing::new("idp-secret".to_string()),
            redirect_url: "http://localhost:3000/api/auth/callback".to_string(),
            authorize_url: "http://127.0.0.1:9/authorize".to_string(),
            token_url: "http://127.0.0.1:9/token".to_string(),
            userinfo_url: "http://127.0.0.1:9/userinfo".to_string(),
        };
        let config = Config::new(
            b"auth-secret-auth-secret-auth-secret!",
            b"session-secret-session-secret-session",
            "http://127.0.0.1:9",
            oauth.clone(),
        )
        .unwrap();
        AppState::from_parts(
            config,
            Arc::new(MemoryAdminStore::new()),
            Arc::new(MemoryUserStore::new()),
            Arc::new(sessions),
            Arc::new(OAuthProvider::new(reqwest::Client::new(), oauth)),
            ApiClient::new("http://127.0.0.1:9").unwrap(),
        )
        .unwrap()
    }

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/api/auth/session", get(handlers::auth::session))
            .route_layer(from_fn_with_state(state.clone(), load_session))
            .layer(CookieManagerLayer::new())
            .with_state(state)
    }

    fn signed_cookie(state: &AppState, session_id: Uuid) -> String {
        let mut jar = CookieJar::new();
        jar.signed_mut(&state.cookie_key)
            .add(Cookie::new(SESSION_COOKIE, session_id.to_string()));
        let value = jar.get(SESSION_COOKIE).unwrap().value().to_string();
        format!("{}={}", SESSION_COOKIE, value)
    }

    async fn ask(app: &Router, cookie: &str) -> Response {
        let request = Request::builder()
            .uri("/api/auth/session")
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn user_of(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        body["user"].clone()
    }

    #[tokio::test]
    async fn store_outage_keeps_the_session_cookie() {
        let sessions = FlakySessionStore::default();
        let state = state(sessions.clone());
        let session = state
            .bridge
            .sign_in(&OAuthProfile {
                email: Some("ada@example.com".to_string()),
                name: Some("Ada".to_string()),
                picture: None,
            })
            .await
            .unwrap();
        let cookie = signed_cookie(&state, session.id);
        let app = app(state);

        sessions.down.store(true, Ordering::SeqCst);
        let response = ask(&app, &cookie).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(header::SET_COOKIE).is_none());

        sessions.down.store(false, Ordering::SeqCst);
        let response = ask(&app, &cookie).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(user_of(response).await["email"], "ada@example.com");
    }

    #[tokio::test]
    async fn unknown_session_drops_the_cookie() {
        let state = state(FlakySessionStore::default());
        let cookie = signed_cookie(&state, Uuid::new_v4());
        let app = app(state);

        let response = ask(&app, &cookie).await;
        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
        assert!(set_cookie.starts_with("session_id="));
        assert!(user_of(response).await.is_null());
    }
}
