use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::models::order::AddressForm;

/// A shipping record as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Shipping {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "OrderID")]
    pub order_id: i64,
    pub address: String,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    #[serde(default)]
    pub email: String,
    pub phone: String,
    pub created_at: String,
}

/// The shipping dialog.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShippingForm {
    #[garde(range(min = 1))]
    pub order_id: i64,
    #[serde(flatten)]
    #[garde(dive)]
    pub address: AddressForm,
}
