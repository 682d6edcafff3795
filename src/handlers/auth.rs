use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tower_cookies::cookie::time::Duration;
use tower_cookies::{Cookie, Cookies};

use crate::{
    crypto::oauth_state::{generate_oauth_state, states_match},
    error::{AppError, Result},
    middleware_layer::auth::SESSION_COOKIE,
    models::{identity::Identity, session::AuthContext},
    state::AppState,
};

/// The signed cookie carrying the OAuth `state` across the redirect.
const STATE_COOKIE: &str = "oauth_state";
/// How long the identity provider round-trip may take.
const STATE_COOKIE_SECS: i64 = 600;

/// Query parameters the identity provider redirects back with.
#[derive(Deserialize, Debug)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// The response payload for authentication-related requests.
#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub user: Option<Identity>,
}

/// Creates a secure cookie with the given name, value, and max age.
pub(crate) fn create_secure_cookie(
    name: &'static str,
    value: String,
    max_age_secs: i64,
    secure: bool,
) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, value);
    cookie.set_http_only(true);
    if secure {
        cookie.set_secure(true);
    }
    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookie.set_max_age(Duration::seconds(max_age_secs));
    cookie.set_path("/");
    cookie
}

/// A cookie that, once sent, makes the browser drop `name`.
pub(crate) fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, "");
    cookie.set_path("/");
    cookie
}

/// Starts sign-in by redirecting to the identity provider.
pub async fn signin(State(state): State<AppState>, cookies: Cookies) -> Result<Redirect> {
    let oauth_state = generate_oauth_state();
    let target = state.provider.authorize_url(&oauth_state)?;

    cookies.signed(&state.cookie_key).add(create_secure_cookie(
        STATE_COOKIE,
        oauth_state,
        STATE_COOKIE_SECS,
        state.config.production,
    ));

    tracing::debug!("🔐 Redirecting to identity provider");
    Ok(Redirect::to(&target))
}

/// Completes sign-in: checks `state`, exchanges the code, establishes the
/// session and sets the session cookie.
pub async fn callback(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect> {
    let signed = cookies.signed(&state.cookie_key);
    let issued = signed
        .get(STATE_COOKIE)
        .map(|c| c.value().to_string())
        .unwrap_or_default();
    signed.remove(removal_cookie(STATE_COOKIE));

    if let Some(error) = params.error {
        tracing::warn!("❌ Identity provider returned an error: {}", error);
        return Err(AppError::Authentication(format!("Sign-in failed: {}", error)));
    }

    if !states_match(&issued, params.state.as_deref().unwrap_or_default()) {
        tracing::warn!("❌ OAuth state mismatch");
        return Err(AppError::Authentication("Invalid sign-in state".to_string()));
    }

    let code = params
        .code
        .ok_or_else(|| AppError::Authentication("Missing authorization code".to_string()))?;

    let profile = state.provider.exchange(&code).await?;
    let session = state.bridge.sign_in(&profile).await?;

    signed.add(create_secure_cookie(
        SESSION_COOKIE,
        session.id.to_string(),
        state.config.session_max_age_hours * 3600,
        state.config.production,
    ));

    tracing::info!("✅ Signed in, session {}", session.id);
    Ok(Redirect::to("/"))
}

/// Destroys the caller's session and clears the cookie.
pub async fn signout(
    State(state): State<AppState>,
    cookies: Cookies,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<AuthResponse>> {
    if let Some(session_id) = ctx.session_id {
        state.bridge.sign_out(&session_id).await?;
    }
    cookies
        .signed(&state.cookie_key)
        .remove(removal_cookie(SESSION_COOKIE));

    Ok(Json(AuthResponse {
        success: true,
        message: "Signed out".to_string(),
    }))
}

/// The signed-in identity, or `null`.
pub async fn session(Extension(ctx): Extension<AuthContext>) -> Json<SessionResponse> {
    Json(SessionResponse { user: ctx.identity })
}

/// Reports what bearer token, if any, the request carried.
pub async fn auth_test(headers: HeaderMap) -> Response {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let Some(token) = token else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(sonic_rs::json!({
                "error": "No valid authorization token provided",
                "success": false,
            })),
        )
            .into_response();
    };

    let first_chars: String = token.chars().take(10).collect();
    Json(sonic_rs::json!({
        "message": "Authentication successful",
        "success": true,
        "tokenInfo": {
            "length": token.len(),
            "firstChars": format!("{}...", first_chars),
        },
    }))
    .into_response()
}
