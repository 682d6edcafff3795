use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use zeroize::Zeroizing;

use backoffice::{
    app,
    config::{Config, OAuthConfig},
    repositories::{admin::MemoryAdminStore, session::MemorySessionStore, user::MemoryUserStore},
    services::{api_client::ApiClient, oauth::OAuthProvider, token::TokenSigner},
    state::AppState,
};

const AUTH_SECRET: &[u8] = b"auth-secret-auth-secret-auth-secret!";
const SESSION_SECRET: &[u8] = b"session-secret-session-secret-session";

/// Authorization headers the fake backend received, in order.
type Seen = Arc<Mutex<Vec<Option<String>>>>;

struct TestContext {
    client: reqwest::Client,
    base_url: String,
    seen: Seen,
    admins: MemoryAdminStore,
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    format!("http://{}", addr)
}

async fn fake_identity_provider() -> String {
    let app = Router::new()
        .route(
            "/token",
            post(|| async { Json(json!({ "access_token": "idp-token" })) }),
        )
        .route(
            "/userinfo",
            get(|| async {
                Json(json!({
                    "email": "Ada@Example.com",
                    "name": "Ada",
                    "picture": "https://img.example.com/ada.png"
                }))
            }),
        );
    spawn(app).await
}

async fn list_products(State(seen): State<Seen>, headers: HeaderMap) -> Json<Value> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    seen.lock().unwrap().push(auth);
    Json(json!({
        "data": [{ "ID": 1, "Name": "Phone", "Price": 199.5, "Stock": 3 }],
        "count": 1,
        "page": 1,
        "limit": 5
    }))
}

async fn create_brand(State(seen): State<Seen>, headers: HeaderMap) -> StatusCode {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    seen.lock().unwrap().push(auth);
    StatusCode::CREATED
}

async fn fake_backend(seen: Seen) -> String {
    let app = Router::new()
        .route("/products", get(list_products))
        .route("/brands", post(create_brand))
        .with_state(seen);
    spawn(app).await
}

impl TestContext {
    async fn new() -> Self {
        let idp = fake_identity_provider().await;
        let seen: Seen = Arc::default();
        let backend = fake_backend(seen.clone()).await;

        let oauth = OAuthConfig {
            client_id: "dashboard".to_string(),
            client_secret: Zeroizing::new("idp-secret".to_string()),
            redirect_url: "http://localhost:3000/api/auth/callback".to_string(),
            authorize_url: format!("{}/authorize", idp),
            token_url: format!("{}/token", idp),
            userinfo_url: format!("{}/userinfo", idp),
        };
        let config = Config::new(AUTH_SECRET, SESSION_SECRET, &backend, oauth.clone()).unwrap();

        let admins = MemoryAdminStore::new();
        let state = AppState::from_parts(
            config,
            Arc::new(admins.clone()),
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemorySessionStore::new()),
            Arc::new(OAuthProvider::new(reqwest::Client::new(), oauth)),
            ApiClient::new(backend).unwrap(),
        )
        .unwrap();

        let base_url = spawn(app::router(state).unwrap()).await;

        Self {
            client: reqwest::Client::builder()
                .cookie_store(true)
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .unwrap(),
            base_url,
            seen,
            admins,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Starts sign-in and returns the `state` the provider would echo back.
    async fn begin_sign_in(&self) -> String {
        let response = self.client.get(self.url("/api/auth/signin")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()["location"].to_str().unwrap().to_string();
        let location = url::Url::parse(&location).unwrap();
        location
            .query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.into_owned())
            .unwrap()
    }

    async fn sign_in(&self) {
        let state = self.begin_sign_in().await;
        let response = self
            .client
            .get(self.url("/api/auth/callback"))
            .query(&[("code", "good"), ("state", state.as_str())])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "Callback failed");
        assert_eq!(response.headers()["location"], "/");
    }

    async fn session_user(&self) -> Value {
        let body: Value = self
            .client
            .get(self.url("/api/auth/session"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        body["user"].clone()
    }
}

#[tokio::test]
async fn sign_in_then_proxy_with_bearer_then_sign_out() {
    let context = TestContext::new().await;

    // Step 1: anonymous
    assert!(context.session_user().await.is_null());
    let response = context.client.get(context.url("/api/admins")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Step 2: sign in through the provider
    context.sign_in().await;
    let user = context.session_user().await;
    assert_eq!(user["email"], "Ada@Example.com");
    assert_eq!(user["name"], "Ada");
    assert_eq!(context.admins.len().await, 1);

    // Step 3: proxied list carries the minted bearer token
    let page: Value = context
        .client
        .get(context.url("/api/products?page=1&limit=5"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["count"], 1);
    assert_eq!(page["data"][0]["Name"], "Phone");

    let auth = context.seen.lock().unwrap().last().cloned().flatten().unwrap();
    let token = auth.strip_prefix("Bearer ").unwrap();
    let claims = TokenSigner::new(AUTH_SECRET, 48).unwrap().verify(token).unwrap();
    assert_eq!(claims.email, "Ada@Example.com");
    assert_eq!(claims.sub, user["id"].as_str().unwrap());

    // Step 4: the same token is reused on the next call
    context
        .client
        .get(context.url("/api/products"))
        .send()
        .await
        .unwrap();
    let seen = context.seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], seen[1]);

    // Step 5: admin routes open up
    let admins: Value = context
        .client
        .get(context.url("/api/admins"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(admins["count"], 1);
    assert_eq!(admins["data"][0]["role"], "manager");

    // Step 6: sign out
    let response = context
        .client
        .post(context.url("/api/auth/signout"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(context.session_user().await.is_null());
    let response = context.client.get(context.url("/api/admins")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn forged_state_is_rejected_and_nothing_is_written() {
    let context = TestContext::new().await;
    context.begin_sign_in().await;

    let response = context
        .client
        .get(context.url("/api/auth/callback"))
        .query(&[("code", "good"), ("state", "forged")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(context.admins.len().await, 0);
    assert!(context.session_user().await.is_null());
}

#[tokio::test]
async fn anonymous_mutation_goes_out_without_header_and_blank_name_never_leaves() {
    let context = TestContext::new().await;

    let response = context
        .client
        .post(context.url("/api/brands"))
        .json(&json!({ "name": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["revalidate"], "/brands");
    assert!(context.seen.lock().unwrap().is_empty());

    let response = context
        .client
        .post(context.url("/api/brands"))
        .json(&json!({ "name": "Acme" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "success": true, "revalidate": "/brands" }));
    assert_eq!(context.seen.lock().unwrap().as_slice(), &[None]);
}

#[tokio::test]
async fn auth_test_echoes_token_shape() {
    let context = TestContext::new().await;

    let response = context.client.get(context.url("/api/auth-test")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: Value = context
        .client
        .get(context.url("/api/auth-test"))
        .bearer_auth("0123456789abcdef")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["tokenInfo"]["firstChars"], "0123456789...");
}
