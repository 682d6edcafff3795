use garde::Validate;
use serde::{Deserialize, Serialize};

/// A product as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Product {
    #[serde(rename = "ID")]
    pub id: i64,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(rename = "CategoryID", default)]
    pub category_id: Option<i64>,
    #[serde(rename = "BrandID", default)]
    pub brand_id: Option<i64>,
    #[serde(rename = "ImageURL", default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub update_by: Option<String>,
}

/// A brand or a category; both are bare named records upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NamedRecord {
    #[serde(rename = "ID")]
    pub id: i64,
    pub name: String,
}

pub type Brand = NamedRecord;
pub type Category = NamedRecord;

/// The product dialog's fields.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    #[garde(length(min = 1, max = 255))]
    pub name: String,
    #[garde(range(min = 0.0))]
    pub price: f64,
    #[garde(range(min = 0))]
    pub stock: i64,
    #[garde(range(min = 1))]
    pub brand_id: i64,
    #[garde(range(min = 1))]
    pub category_id: i64,
}

/// The brand and category dialogs' single field.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NameForm {
    #[garde(length(min = 1, max = 255))]
    pub name: String,
}
