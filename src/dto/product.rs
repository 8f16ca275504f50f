use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{non_negative_amount, not_blank};
use crate::entities::{product_image, product_variant};

/// One variant row. `id` is only meaningful on update: absent means a new
/// variant, present means overwrite that variant.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VariantInput {
    #[serde(default)]
    pub id: Option<i32>,
    pub attribute_id: i32,
    #[validate(length(min = 1, max = 100), custom = "not_blank")]
    pub attribute_value: String,
    #[validate(custom = "non_negative_amount")]
    pub mrp: Decimal,
    #[validate(custom = "non_negative_amount")]
    pub purchase_price: Decimal,
    #[validate(range(min = 0))]
    pub quantity: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub reorder_level: i32,
}

/// JSON `payload` part of the multipart create request; `images` parts
/// carry the files.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200), custom = "not_blank")]
    pub name: String,
    #[validate(range(min = 1, message = "schoolId is required"))]
    pub school_id: i32,
    pub admin_id: Uuid,
    pub category_id: i32,
    #[serde(default)]
    pub has_variants: bool,
    #[validate(custom = "non_negative_amount")]
    pub mrp: Option<Decimal>,
    #[validate(custom = "non_negative_amount")]
    pub purchase_price: Option<Decimal>,
    #[validate(range(min = 0))]
    pub quantity: Option<i32>,
    #[validate(range(min = 0))]
    pub reorder_level: Option<i32>,
    pub remarks: Option<String>,
    #[serde(default)]
    #[validate]
    pub variants: Vec<VariantInput>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    /// Acting admin; checked against the product's school
    pub admin_id: Uuid,
    #[validate(length(min = 1, max = 200), custom = "not_blank")]
    pub name: String,
    #[serde(default)]
    pub has_variants: bool,
    #[validate(custom = "non_negative_amount")]
    pub mrp: Option<Decimal>,
    #[validate(custom = "non_negative_amount")]
    pub purchase_price: Option<Decimal>,
    #[validate(range(min = 0))]
    pub quantity: Option<i32>,
    #[validate(range(min = 0))]
    pub reorder_level: Option<i32>,
    pub remarks: Option<String>,
    /// Keeps the current flag when absent
    pub is_active: Option<bool>,
    #[serde(default)]
    #[validate]
    pub variants: Vec<VariantInput>,
    #[serde(default)]
    pub remove_image_ids: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariantResponse {
    pub id: i32,
    pub attribute_id: i32,
    pub attribute_name: String,
    pub attribute_value: String,
    pub mrp: Decimal,
    pub purchase_price: Decimal,
    pub quantity: i32,
    pub reorder_level: i32,
}

impl ProductVariantResponse {
    pub fn new(variant: product_variant::Model, attribute_name: String) -> Self {
        Self {
            id: variant.id,
            attribute_id: variant.attribute_id,
            attribute_name,
            attribute_value: variant.attribute_value,
            mrp: variant.mrp,
            purchase_price: variant.purchase_price,
            quantity: variant.quantity,
            reorder_level: variant.reorder_level,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductImageResponse {
    pub id: i32,
    pub image_url: String,
    pub file_name: String,
}

impl From<product_image::Model> for ProductImageResponse {
    fn from(image: product_image::Model) -> Self {
        Self {
            id: image.id,
            image_url: image.image_url,
            file_name: image.file_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: i32,
    pub product_code: String,
    pub name: String,
    pub school_id: i32,
    pub category_id: i32,
    pub category_name: String,
    pub has_variants: bool,
    /// "Active" or "Inactive"
    pub status: String,
    pub is_active: bool,
    pub remarks: Option<String>,
    pub mrp: Option<Decimal>,
    pub purchase_price: Option<Decimal>,
    pub quantity: Option<i32>,
    pub reorder_level: Option<i32>,
    pub variants: Vec<ProductVariantResponse>,
    pub images: Vec<ProductImageResponse>,
    pub created_at: DateTime<Utc>,
}

pub fn status_label(is_active: bool) -> &'static str {
    if is_active {
        "Active"
    } else {
        "Inactive"
    }
}
