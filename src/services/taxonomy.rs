use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::catalog::NamedRecord;
use crate::models::pagination::{PageRequest, Paginated};
use crate::models::session::AuthContext;
use crate::services::api_client::{ApiClient, RequestOptions};
use crate::services::resource::Resource;
use crate::validation::forms::validate_record_id;

/// The two flat name lists products are filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Taxonomy {
    Brands,
    Categories,
}

#[derive(Serialize)]
struct NameBody<'a> {
    name: &'a str,
}

impl Taxonomy {
    pub fn path(self) -> &'static str {
        match self {
            Taxonomy::Brands => "/brands",
            Taxonomy::Categories => "/categories",
        }
    }

    pub fn revalidate(self) -> &'static str {
        self.path()
    }

    fn label(self) -> &'static str {
        match self {
            Taxonomy::Brands => "Brand",
            Taxonomy::Categories => "Category",
        }
    }

    fn resource<'a>(self, api: &'a ApiClient, ctx: &'a AuthContext) -> Resource<'a> {
        Resource::new(api, ctx, self.path())
    }

    /// Rejects blank names before anything is sent.
    fn checked_name<'n>(self, name: &'n str) -> Result<&'n str> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(format!("{} name is required", self.label())));
        }
        if name.chars().count() > 255 {
            return Err(AppError::Validation(format!(
                "{} name must be at most 255 characters",
                self.label()
            )));
        }
        Ok(name)
    }

    /// The backend returns every record; the page is cut locally when it
    /// does not paginate.
    pub async fn list(
        self,
        api: &ApiClient,
        ctx: &AuthContext,
        page: PageRequest,
    ) -> Result<Paginated<NamedRecord>> {
        self.resource(api, ctx).list_page(page).await
    }

    pub async fn create(self, api: &ApiClient, ctx: &AuthContext, name: &str) -> Result<()> {
        let name = self.checked_name(name)?;
        self.resource(api, ctx)
            .create(RequestOptions::post().json(&NameBody { name })?)
            .await
    }

    pub async fn update(self, api: &ApiClient, ctx: &AuthContext, id: i64, name: &str) -> Result<()> {
        let id = validate_record_id(self.label(), id)?;
        let name = self.checked_name(name)?;
        self.resource(api, ctx)
            .update(id, RequestOptions::put().json(&NameBody { name })?)
            .await
    }

    pub async fn delete(self, api: &ApiClient, ctx: &AuthContext, id: i64) -> Result<()> {
        let id = validate_record_id(self.label(), id)?;
        self.resource(api, ctx).delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[tokio::test]
    async fn blank_name_never_reaches_the_backend() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = axum::Router::new().route(
            "/brands",
            axum::routing::post(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    "{}"
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let api = ApiClient::new(format!("http://{}", addr)).unwrap();
        let ctx = AuthContext::anonymous();

        let err = Taxonomy::Brands.create(&api, &ctx, "   ").await.unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Brand name is required");
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        Taxonomy::Brands.create(&api, &ctx, "Acme").await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_id_is_a_validation_error() {
        let err = validate_record_id(Taxonomy::Categories.label(), 0).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Category ID is required");
    }
}
