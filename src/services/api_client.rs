use http::{header, HeaderMap, HeaderName, HeaderValue, Method};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{AppError, Result};
use crate::models::session::AuthContext;

/// The body of an outbound request.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Serialized JSON, sent with `Content-Type: application/json`.
    Json(Vec<u8>),
    /// Text fields sent as `multipart/form-data`.
    Multipart(Vec<(String, String)>),
}

/// Caller-side caching preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheMode {
    #[default]
    Default,
    /// Adds `Cache-Control: no-store`.
    NoStore,
}

/// Method, headers and body of an outbound request.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: RequestBody,
    pub cache: CacheMode,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
            cache: CacheMode::Default,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// Serializes `value` as the JSON body.
    pub fn json<T: Serialize>(mut self, value: &T) -> Result<Self> {
        let bytes = sonic_rs::to_vec(value)
            .map_err(|e| AppError::Internal(format!("Request serialization failed: {}", e)))?;
        self.body = RequestBody::Json(bytes);
        Ok(self)
    }

    pub fn multipart(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Multipart(fields);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn no_store(mut self) -> Self {
        self.cache = CacheMode::NoStore;
        self
    }
}

/// A thin wrapper over `reqwest` that attaches the caller's bearer token.
///
/// No retries and no caching: failures go straight back to the caller.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for the backend at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("backoffice/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying HTTP client, shared with the identity provider.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Joins `path` onto the backend base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Sends a request, adding `Authorization: Bearer <token>` when the
    /// context has a token. Caller headers are kept.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The caller's auth context.
    /// * `url` - The absolute target URL.
    /// * `options` - Method, headers, body and cache mode.
    ///
    /// # Returns
    ///
    /// The raw response, whatever its status.
    pub async fn fetch_with_auth(
        &self,
        ctx: &AuthContext,
        url: &str,
        options: RequestOptions,
    ) -> Result<reqwest::Response> {
        let RequestOptions {
            method,
            mut headers,
            body,
            cache,
        } = options;

        match ctx.bearer_token() {
            Some(token) => {
                let value = HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|_| AppError::Internal("Bearer token is not a valid header value".to_string()))?;
                headers.insert(header::AUTHORIZATION, value);
                tracing::debug!("🔑 Including Authorization header for {} {}", method, url);
            }
            None => {
                tracing::warn!("⚠️ No token available for request to: {}", url);
            }
        }

        if cache == CacheMode::NoStore {
            headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
        }

        let mut request = self.http.request(method, url);
        request = match body {
            RequestBody::Empty => request,
            RequestBody::Json(bytes) => {
                if !headers.contains_key(header::CONTENT_TYPE) {
                    headers.insert(
                        header::CONTENT_TYPE,
                        HeaderValue::from_static("application/json"),
                    );
                }
                request.body(bytes)
            }
            RequestBody::Multipart(fields) => {
                headers.remove(header::CONTENT_TYPE);
                let form = fields
                    .into_iter()
                    .fold(reqwest::multipart::Form::new(), |form, (name, value)| {
                        form.text(name, value)
                    });
                request.multipart(form)
            }
        };

        let response = request.headers(headers).send().await?;
        tracing::debug!("⬅️ {} from {}", response.status(), url);
        Ok(response)
    }

    /// Like `fetch_with_auth`, then parses the JSON body of a 2xx response.
    ///
    /// # Returns
    ///
    /// The parsed body, or `AppError::Upstream` carrying status, status text
    /// and body text for any other status.
    pub async fn fetch_with_auth_json<T: DeserializeOwned>(
        &self,
        ctx: &AuthContext,
        url: &str,
        options: RequestOptions,
    ) -> Result<T> {
        let response = self.fetch_with_auth(ctx, url, options).await?;
        let response = ensure_success(response).await?;
        let bytes = response.bytes().await?;
        sonic_rs::from_slice(&bytes).map_err(|e| {
            AppError::InvalidResponse(format!("{} returned unparseable JSON: {}", url, e))
        })
    }

    /// Like `fetch_with_auth`, failing on non-2xx and discarding the body.
    pub async fn send_with_auth(
        &self,
        ctx: &AuthContext,
        url: &str,
        options: RequestOptions,
    ) -> Result<()> {
        let response = self.fetch_with_auth(ctx, url, options).await?;
        ensure_success(response).await?;
        Ok(())
    }
}

/// Passes 2xx responses through and turns anything else into `AppError::Upstream`.
///
/// The body is read best-effort; a body that cannot be read is reported empty.
pub async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let status_text = status.canonical_reason().unwrap_or_default().to_string();
    let body = response.text().await.unwrap_or_default();
    Err(AppError::Upstream {
        status: status.as_u16(),
        status_text,
        body,
    })
}
