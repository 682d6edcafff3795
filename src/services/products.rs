use garde::Validate;

use crate::error::Result;
use crate::models::catalog::{Product, ProductForm};
use crate::models::pagination::{PageRequest, Paginated};
use crate::models::session::AuthContext;
use crate::services::api_client::{ApiClient, RequestOptions};
use crate::services::resource::Resource;
use crate::validation::forms::validate_record_id;

pub const REVALIDATE: &str = "/products";

fn products<'a>(api: &'a ApiClient, ctx: &'a AuthContext) -> Resource<'a> {
    Resource::new(api, ctx, "/products")
}

/// The multipart fields the backend expects for a product write.
fn form_fields(form: &ProductForm, ctx: &AuthContext) -> Vec<(String, String)> {
    vec![
        ("name".to_string(), form.name.trim().to_string()),
        ("price".to_string(), form.price.to_string()),
        ("stock".to_string(), form.stock.to_string()),
        ("brandId".to_string(), form.brand_id.to_string()),
        ("categoryId".to_string(), form.category_id.to_string()),
        (
            "updateBy".to_string(),
            ctx.display_name().unwrap_or_default().to_string(),
        ),
    ]
}

pub async fn list(api: &ApiClient, ctx: &AuthContext, page: PageRequest) -> Result<Paginated<Product>> {
    products(api, ctx).list_page(page).await
}

pub async fn get(api: &ApiClient, ctx: &AuthContext, id: i64) -> Result<Product> {
    let id = validate_record_id("Product", id)?;
    products(api, ctx).get(id).await
}

/// Creates a product; `updateBy` is the signed-in admin's name.
pub async fn create(api: &ApiClient, ctx: &AuthContext, form: &ProductForm) -> Result<()> {
    form.validate()?;
    products(api, ctx)
        .create(RequestOptions::post().multipart(form_fields(form, ctx)))
        .await
}

pub async fn update(api: &ApiClient, ctx: &AuthContext, id: i64, form: &ProductForm) -> Result<()> {
    let id = validate_record_id("Product", id)?;
    form.validate()?;
    products(api, ctx)
        .update(id, RequestOptions::put().multipart(form_fields(form, ctx)))
        .await
}

pub async fn delete(api: &ApiClient, ctx: &AuthContext, id: i64) -> Result<()> {
    let id = validate_record_id("Product", id)?;
    products(api, ctx).delete(id).await
}
