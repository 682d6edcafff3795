use garde::Validate;
use serde::Serialize;

use crate::error::Result;
use crate::models::pagination::{PageRequest, Paginated};
use crate::models::session::AuthContext;
use crate::models::shipping::{Shipping, ShippingForm};
use crate::services::api_client::{ApiClient, RequestOptions};
use crate::services::orders::AddressPayload;
use crate::services::resource::Resource;
use crate::validation::forms::validate_record_id;

pub const REVALIDATE: &str = "/shipping";

#[derive(Debug, Serialize)]
struct ShippingPayload<'a> {
    #[serde(rename = "OrderID")]
    order_id: i64,
    #[serde(flatten)]
    address: AddressPayload<'a>,
}

impl<'a> ShippingPayload<'a> {
    fn new(form: &'a ShippingForm) -> Self {
        Self {
            order_id: form.order_id,
            address: AddressPayload::new(&form.address, None),
        }
    }
}

fn shipping<'a>(api: &'a ApiClient, ctx: &'a AuthContext) -> Resource<'a> {
    Resource::new(api, ctx, "/shipping")
}

pub async fn list(api: &ApiClient, ctx: &AuthContext, page: PageRequest) -> Result<Paginated<Shipping>> {
    shipping(api, ctx).list_page(page).await
}

pub async fn get(api: &ApiClient, ctx: &AuthContext, id: i64) -> Result<Shipping> {
    let id = validate_record_id("Shipping", id)?;
    shipping(api, ctx).get(id).await
}

/// Looks up the shipping record attached to an order.
pub async fn get_by_order(api: &ApiClient, ctx: &AuthContext, order_id: i64) -> Result<Shipping> {
    let order_id = validate_record_id("Order", order_id)?;
    let resource = shipping(api, ctx);
    let url = format!("{}/order/{}", resource.collection_url(), order_id);
    resource.get_at(&url).await
}

pub async fn create(api: &ApiClient, ctx: &AuthContext, form: &ShippingForm) -> Result<()> {
    form.validate()?;
    let options = RequestOptions::post().json(&ShippingPayload::new(form))?;
    shipping(api, ctx).create(options).await
}

pub async fn update(api: &ApiClient, ctx: &AuthContext, id: i64, form: &ShippingForm) -> Result<()> {
    let id = validate_record_id("Shipping", id)?;
    form.validate()?;
    let options = RequestOptions::put().json(&ShippingPayload::new(form))?;
    shipping(api, ctx).update(id, options).await
}

pub async fn delete(api: &ApiClient, ctx: &AuthContext, id: i64) -> Result<()> {
    let id = validate_record_id("Shipping", id)?;
    shipping(api, ctx).delete(id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_flattens_the_address() {
        let form: ShippingForm = sonic_rs::from_str(
            r#"{"orderId":7,"address":"1 Main St","firstName":"Ada","lastName":"Lovelace",
                "city":"London","state":"","zipCode":"N1","country":"UK","email":"","phone":"555"}"#,
        )
        .unwrap();
        form.validate().unwrap();

        let json = sonic_rs::to_string(&ShippingPayload::new(&form)).unwrap();
        assert!(json.starts_with(r#"{"OrderID":7,"Address":"1 Main St""#), "{}", json);
        assert!(json.contains(r#""Email":"""#));
        assert!(!json.contains("CreatedAt"));
    }
}
