use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::models::shipping::Shipping;

/// An order as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Order {
    #[serde(rename = "ID")]
    pub id: i64,
    pub user_id: String,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    pub payment: Payment,
    pub shipping: Shipping,
    #[serde(default)]
    pub product_per_order: Option<Vec<ProductPerOrder>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Payment {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "OrderID")]
    pub order_id: i64,
    pub amount: f64,
    pub created_at: String,
    #[serde(rename = "Type")]
    pub kind: String,
    pub cardholder_name: String,
    pub card_number_last4: String,
    pub expiry_date: String,
}

/// A product line within an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductPerOrder {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "OrderID")]
    pub order_id: i64,
    #[serde(rename = "ProductID")]
    pub product_id: i64,
    pub created_at: String,
    pub quantity: i64,
    #[serde(default)]
    pub product: Option<OrderedProduct>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderedProduct {
    #[serde(rename = "ID")]
    pub id: i64,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(rename = "ImageURL", default)]
    pub image_url: Option<String>,
}

/// Payment fields of the order dialog.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentForm {
    #[garde(range(min = 0.0))]
    pub amount: f64,
    #[garde(length(min = 1))]
    pub payment_type: String,
    #[garde(length(min = 1))]
    pub cardholder_name: String,
    #[garde(length(min = 4, max = 4))]
    pub card_number_last4: String,
    #[garde(length(min = 1))]
    pub expiry_date: String,
}

/// Address fields shared by the order and shipping dialogs.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddressForm {
    #[garde(length(min = 1))]
    pub address: String,
    #[garde(length(min = 1))]
    pub first_name: String,
    #[garde(length(min = 1))]
    pub last_name: String,
    #[garde(length(min = 1))]
    pub city: String,
    #[garde(skip)]
    pub state: String,
    #[garde(length(min = 1))]
    pub zip_code: String,
    #[garde(length(min = 1))]
    pub country: String,
    #[serde(default, deserialize_with = "crate::validation::forms::empty_as_none")]
    #[garde(email)]
    pub email: Option<String>,
    #[garde(length(min = 1))]
    pub phone: String,
}

/// The order dialog.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderForm {
    #[garde(length(min = 1))]
    pub user_id: String,
    #[garde(dive)]
    pub payment: PaymentForm,
    #[garde(dive)]
    pub shipping: AddressForm,
}

/// Adds a product line to an existing order.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductOrderForm {
    #[garde(range(min = 1))]
    pub order_id: i64,
    #[garde(range(min = 1))]
    pub product_id: i64,
    #[garde(range(min = 1))]
    pub quantity: i64,
}

/// The storefront checkout payload, forwarded as-is.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[garde(dive)]
    pub shipping: CheckoutShipping,
    #[garde(dive)]
    pub payment: CheckoutPayment,
    #[garde(dive)]
    pub order: CheckoutOrder,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutShipping {
    #[garde(length(min = 1))]
    pub first_name: String,
    #[garde(length(min = 1))]
    pub last_name: String,
    #[garde(length(min = 1))]
    pub address: String,
    #[garde(length(min = 1))]
    pub city: String,
    #[garde(skip)]
    pub state: String,
    #[garde(length(min = 1))]
    pub zip_code: String,
    #[garde(length(min = 1))]
    pub country: String,
    #[serde(
        default,
        deserialize_with = "crate::validation::forms::empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    #[garde(email)]
    pub email: Option<String>,
    #[garde(length(min = 1))]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayment {
    #[garde(length(min = 1))]
    pub cardholder_name: String,
    #[garde(length(min = 4, max = 4))]
    pub card_number_last4: String,
    #[garde(length(min = 1))]
    pub expiry_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutOrder {
    #[garde(length(min = 1), dive)]
    pub items: Vec<CheckoutItem>,
    #[garde(range(min = 1))]
    pub total_items: i64,
    #[garde(range(min = 0.0))]
    pub subtotal: f64,
    #[garde(range(min = 0.0))]
    pub shipping_fee: f64,
    #[garde(range(min = 0.0))]
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckoutItem {
    #[garde(range(min = 1))]
    pub id: i64,
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(range(min = 0.0))]
    pub price: f64,
    #[garde(range(min = 1))]
    pub quantity: i64,
}
