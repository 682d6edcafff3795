use chrono::Utc;
use garde::Validate;
use serde::Serialize;

use crate::error::Result;
use crate::models::order::{AddressForm, CheckoutRequest, Order, OrderForm, PaymentForm, ProductOrderForm};
use crate::models::pagination::{PageRequest, Paginated};
use crate::models::session::AuthContext;
use crate::services::api_client::{ApiClient, RequestOptions};
use crate::services::resource::Resource;
use crate::validation::forms::validate_record_id;

pub const REVALIDATE: &str = "/orders";

/// Dates the backend stores for new records, `YYYY-MM-DD`.
fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PaymentPayload<'a> {
    amount: f64,
    #[serde(rename = "Type")]
    kind: &'a str,
    cardholder_name: &'a str,
    card_number_last4: &'a str,
    expiry_date: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<String>,
}

impl<'a> PaymentPayload<'a> {
    fn new(form: &'a PaymentForm, created_at: Option<String>) -> Self {
        Self {
            amount: form.amount,
            kind: &form.payment_type,
            cardholder_name: &form.cardholder_name,
            card_number_last4: &form.card_number_last4,
            expiry_date: &form.expiry_date,
            created_at,
        }
    }
}

/// Address block shared by order and shipping writes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct AddressPayload<'a> {
    address: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    city: &'a str,
    state: &'a str,
    zip_code: &'a str,
    country: &'a str,
    /// Sent as `""` when absent.
    email: &'a str,
    phone: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<String>,
}

impl<'a> AddressPayload<'a> {
    pub(crate) fn new(form: &'a AddressForm, created_at: Option<String>) -> Self {
        Self {
            address: &form.address,
            first_name: &form.first_name,
            last_name: &form.last_name,
            city: &form.city,
            state: &form.state,
            zip_code: &form.zip_code,
            country: &form.country,
            email: form.email.as_deref().unwrap_or_default(),
            phone: &form.phone,
            created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct OrderPayload<'a> {
    user_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<String>,
    payment: PaymentPayload<'a>,
    shipping: AddressPayload<'a>,
}

impl<'a> OrderPayload<'a> {
    /// New orders carry today's date on the order and on both sub-records.
    fn for_create(form: &'a OrderForm) -> Self {
        Self {
            user_id: &form.user_id,
            created_at: Some(today()),
            payment: PaymentPayload::new(&form.payment, Some(today())),
            shipping: AddressPayload::new(&form.shipping, Some(today())),
        }
    }

    fn for_update(form: &'a OrderForm) -> Self {
        Self {
            user_id: &form.user_id,
            created_at: None,
            payment: PaymentPayload::new(&form.payment, None),
            shipping: AddressPayload::new(&form.shipping, None),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ProductOrderPayload {
    #[serde(rename = "OrderID")]
    order_id: i64,
    #[serde(rename = "ProductID")]
    product_id: i64,
    quantity: i64,
    created_at: String,
}

fn orders<'a>(api: &'a ApiClient, ctx: &'a AuthContext) -> Resource<'a> {
    Resource::new(api, ctx, "/orders")
}

fn product_orders<'a>(api: &'a ApiClient, ctx: &'a AuthContext) -> Resource<'a> {
    Resource::new(api, ctx, "/product-orders")
}

pub async fn list(api: &ApiClient, ctx: &AuthContext, page: PageRequest) -> Result<Paginated<Order>> {
    orders(api, ctx).list_page(page).await
}

pub async fn get(api: &ApiClient, ctx: &AuthContext, id: i64) -> Result<Order> {
    let id = validate_record_id("Order", id)?;
    orders(api, ctx).get(id).await
}

pub async fn create(api: &ApiClient, ctx: &AuthContext, form: &OrderForm) -> Result<()> {
    form.validate()?;
    let options = RequestOptions::post().json(&OrderPayload::for_create(form))?;
    orders(api, ctx).create(options).await
}

pub async fn update(api: &ApiClient, ctx: &AuthContext, id: i64, form: &OrderForm) -> Result<()> {
    let id = validate_record_id("Order", id)?;
    form.validate()?;
    let options = RequestOptions::put().json(&OrderPayload::for_update(form))?;
    orders(api, ctx).update(id, options).await
}

pub async fn delete(api: &ApiClient, ctx: &AuthContext, id: i64) -> Result<()> {
    let id = validate_record_id("Order", id)?;
    orders(api, ctx).delete(id).await
}

/// Adds a product line to an order.
pub async fn add_product(api: &ApiClient, ctx: &AuthContext, form: &ProductOrderForm) -> Result<()> {
    form.validate()?;
    let payload = ProductOrderPayload {
        order_id: form.order_id,
        product_id: form.product_id,
        quantity: form.quantity,
        created_at: today(),
    };
    product_orders(api, ctx)
        .create(RequestOptions::post().json(&payload)?)
        .await
}

pub async fn remove_product(api: &ApiClient, ctx: &AuthContext, product_order_id: i64) -> Result<()> {
    let id = validate_record_id("Product order", product_order_id)?;
    product_orders(api, ctx).delete(id).await
}

/// Forwards a checkout and returns whatever the backend answers with.
pub async fn checkout(
    api: &ApiClient,
    ctx: &AuthContext,
    request: &CheckoutRequest,
) -> Result<sonic_rs::Value> {
    request.validate()?;
    let options = RequestOptions::post().json(request)?;
    api.fetch_with_auth_json(ctx, &api.url("/checkout"), options)
        .await
        .inspect(|_| tracing::info!("✅ Checkout processed"))
        .inspect_err(|e| tracing::error!("❌ Error processing checkout: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sonic_rs::JsonValueTrait;

    fn form(email: Option<&str>) -> OrderForm {
        OrderForm {
            user_id: "42".to_string(),
            payment: PaymentForm {
                amount: 99.0,
                payment_type: "card".to_string(),
                cardholder_name: "Ada Lovelace".to_string(),
                card_number_last4: "4242".to_string(),
                expiry_date: "12/30".to_string(),
            },
            shipping: AddressForm {
                address: "1 Main St".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                city: "London".to_string(),
                state: String::new(),
                zip_code: "N1".to_string(),
                country: "UK".to_string(),
                email: email.map(str::to_string),
                phone: "555".to_string(),
            },
        }
    }

    #[test]
    fn create_payload_uses_backend_field_names() {
        let f = form(None);
        let json = sonic_rs::to_string(&OrderPayload::for_create(&f)).unwrap();
        let value: sonic_rs::Value = sonic_rs::from_str(&json).unwrap();

        assert_eq!(value["UserId"].as_str(), Some("42"));
        assert_eq!(value["Payment"]["Type"].as_str(), Some("card"));
        assert_eq!(value["Shipping"]["Email"].as_str(), Some(""));
        assert_eq!(value["CreatedAt"].as_str(), Some(today().as_str()));
        assert!(value["Shipping"]["CreatedAt"].is_str());
    }

    #[test]
    fn update_payload_has_no_creation_dates() {
        let f = form(Some("ada@example.com"));
        let json = sonic_rs::to_string(&OrderPayload::for_update(&f)).unwrap();
        assert!(!json.contains("CreatedAt"));
        assert!(json.contains(r#""Email":"ada@example.com""#));
    }

    #[test]
    fn bad_card_digits_fail_validation() {
        let mut f = form(None);
        f.payment.card_number_last4 = "42".to_string();
        assert!(f.validate().is_err());
    }
}
