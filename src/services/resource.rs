use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::pagination::{PageRequest, Paginated, RawPage};
use crate::models::session::AuthContext;
use crate::services::api_client::{ApiClient, RequestOptions};

/// `{ "data": T }`, the wrapper some endpoints put around a single record.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// One REST collection on the backend, e.g. `/products`, called on behalf
/// of a caller.
pub struct Resource<'a> {
    api: &'a ApiClient,
    ctx: &'a AuthContext,
    path: &'static str,
}

impl<'a> Resource<'a> {
    pub fn new(api: &'a ApiClient, ctx: &'a AuthContext, path: &'static str) -> Self {
        Self { api, ctx, path }
    }

    pub fn collection_url(&self) -> String {
        self.api.url(self.path)
    }

    pub fn item_url(&self, id: impl std::fmt::Display) -> String {
        format!("{}/{}", self.collection_url(), id)
    }

    /// Fetches one page. The request is never served from a cache.
    pub async fn list_page<T: DeserializeOwned>(&self, request: PageRequest) -> Result<Paginated<T>> {
        let request = request.normalized();
        let url = url::Url::parse_with_params(&self.collection_url(), request.query_pairs())
            .map_err(|e| AppError::Internal(format!("Invalid backend URL: {}", e)))?;

        let raw: RawPage<T> = self
            .api
            .fetch_with_auth_json(self.ctx, url.as_str(), RequestOptions::get().no_store())
            .await
            .inspect_err(|e| tracing::error!("❌ Error fetching {}: {}", self.path, e))?;

        raw.into_paginated(request)
    }

    /// Fetches the whole collection from an endpoint that does not paginate.
    pub async fn list_all<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let raw: RawPage<T> = self
            .api
            .fetch_with_auth_json(self.ctx, &self.collection_url(), RequestOptions::get().no_store())
            .await
            .inspect_err(|e| tracing::error!("❌ Error fetching {}: {}", self.path, e))?;
        Ok(raw.data)
    }

    /// Fetches a record the backend returns bare.
    pub async fn get<T: DeserializeOwned>(&self, id: i64) -> Result<T> {
        self.get_at(&self.item_url(id)).await
    }

    /// Fetches a record the backend wraps in `{ "data": .. }`.
    pub async fn get_enveloped<T: DeserializeOwned>(&self, id: i64) -> Result<T> {
        let envelope: Envelope<T> = self.get_at(&self.item_url(id)).await?;
        Ok(envelope.data)
    }

    pub async fn get_at<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.api
            .fetch_with_auth_json(self.ctx, url, RequestOptions::get().no_store())
            .await
            .inspect_err(|e| tracing::error!("❌ Error fetching {}: {}", url, e))
    }

    pub async fn create(&self, options: RequestOptions) -> Result<()> {
        self.send(&self.collection_url(), options).await
    }

    pub async fn update(&self, id: i64, options: RequestOptions) -> Result<()> {
        self.send(&self.item_url(id), options).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.send(&self.item_url(id), RequestOptions::delete()).await
    }

    async fn send(&self, url: &str, options: RequestOptions) -> Result<()> {
        let method = options.method.clone();
        self.api
            .send_with_auth(self.ctx, url, options)
            .await
            .inspect(|_| tracing::info!("✅ {} {}", method, url))
            .inspect_err(|e| tracing::error!("❌ {} {} failed: {}", method, url, e))
    }
}
