use garde::Validate;
use serde::Serialize;

use crate::error::Result;
use crate::models::pagination::{PageRequest, Paginated};
use crate::models::repair::{Repair, RepairForm, RepairStage, RepairStatusForm, RepairStatusUpdateForm};
use crate::models::session::AuthContext;
use crate::services::api_client::{ApiClient, RequestOptions};
use crate::services::resource::Resource;
use crate::validation::forms::validate_record_id;

pub const REVALIDATE: &str = "/repairs";

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct RepairPayload<'a> {
    user_email: &'a str,
    user_phone: &'a str,
    product: &'a str,
    category: &'a str,
    description: &'a str,
}

impl<'a> From<&'a RepairForm> for RepairPayload<'a> {
    fn from(form: &'a RepairForm) -> Self {
        Self {
            user_email: &form.user_email,
            user_phone: &form.user_phone,
            product: &form.product,
            category: &form.category,
            description: &form.description,
        }
    }
}

/// A status entry. `UpdatedBy` is always the signed-in admin.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct StatusPayload<'a> {
    #[serde(rename = "RepairID", skip_serializing_if = "Option::is_none")]
    repair_id: Option<i64>,
    status: RepairStage,
    updated_by: &'a str,
}

fn repairs<'a>(api: &'a ApiClient, ctx: &'a AuthContext) -> Resource<'a> {
    Resource::new(api, ctx, "/repairs")
}

fn statuses<'a>(api: &'a ApiClient, ctx: &'a AuthContext) -> Resource<'a> {
    Resource::new(api, ctx, "/repair-statuses")
}

pub async fn list(api: &ApiClient, ctx: &AuthContext, page: PageRequest) -> Result<Paginated<Repair>> {
    repairs(api, ctx).list_page(page).await
}

/// The backend wraps single repairs in `{ "data": .. }`.
pub async fn get(api: &ApiClient, ctx: &AuthContext, id: i64) -> Result<Repair> {
    let id = validate_record_id("Repair", id)?;
    repairs(api, ctx).get_enveloped(id).await
}

pub async fn create(api: &ApiClient, ctx: &AuthContext, form: &RepairForm) -> Result<()> {
    form.validate()?;
    let options = RequestOptions::post().json(&RepairPayload::from(form))?;
    repairs(api, ctx).create(options).await
}

pub async fn update(api: &ApiClient, ctx: &AuthContext, id: i64, form: &RepairForm) -> Result<()> {
    let id = validate_record_id("Repair", id)?;
    form.validate()?;
    let options = RequestOptions::put().json(&RepairPayload::from(form))?;
    repairs(api, ctx).update(id, options).await
}

pub async fn delete(api: &ApiClient, ctx: &AuthContext, id: i64) -> Result<()> {
    let id = validate_record_id("Repair", id)?;
    repairs(api, ctx).delete(id).await
}

/// Records a new stage for a repair.
pub async fn add_status(api: &ApiClient, ctx: &AuthContext, form: &RepairStatusForm) -> Result<()> {
    form.validate()?;
    let payload = StatusPayload {
        repair_id: Some(form.repair_id),
        status: form.status,
        updated_by: ctx.display_name().unwrap_or_default(),
    };
    statuses(api, ctx)
        .create(RequestOptions::post().json(&payload)?)
        .await
}

pub async fn update_status(
    api: &ApiClient,
    ctx: &AuthContext,
    status_id: i64,
    form: &RepairStatusUpdateForm,
) -> Result<()> {
    let status_id = validate_record_id("Repair status", status_id)?;
    let payload = StatusPayload {
        repair_id: None,
        status: form.status,
        updated_by: ctx.display_name().unwrap_or_default(),
    };
    statuses(api, ctx)
        .update(status_id, RequestOptions::put().json(&payload)?)
        .await
}
