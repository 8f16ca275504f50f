use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{category_attribute::CategoryAttributeResponse, default_true, not_blank};
use crate::entities::category::{self, SizeType};

/// JSON `payload` part of the multipart create request; the optional
/// `image` part travels next to it.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    #[validate(range(min = 1, message = "schoolId is required"))]
    pub school_id: i32,
    pub admin_id: Uuid,
    #[validate(length(min = 1, max = 150), custom = "not_blank")]
    pub name: String,
    #[serde(default)]
    pub has_size_variants: bool,
    #[serde(default)]
    pub size_type: SizeType,
    pub available_sizes: Option<String>,
    /// Attributes of the same school to link
    #[serde(default)]
    pub attribute_ids: Vec<i32>,
}

/// Full replacement of a category's scalar fields. `attributeIds`, when
/// present, becomes the complete set of linked attributes.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 150), custom = "not_blank")]
    pub name: String,
    #[serde(default)]
    pub has_size_variants: bool,
    #[serde(default)]
    pub size_type: SizeType,
    pub available_sizes: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub attribute_ids: Option<Vec<i32>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: i32,
    pub school_id: i32,
    pub admin_id: Uuid,
    pub name: String,
    pub has_size_variants: bool,
    pub size_type: SizeType,
    pub available_sizes: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub attributes: Vec<CategoryAttributeResponse>,
}

impl CategoryResponse {
    pub fn new(model: category::Model, attributes: Vec<CategoryAttributeResponse>) -> Self {
        Self {
            id: model.id,
            school_id: model.school_id,
            admin_id: model.admin_id,
            name: model.name,
            has_size_variants: model.has_size_variants,
            size_type: model.size_type,
            available_sizes: model.available_sizes,
            image_url: model.image_url,
            is_active: model.is_active,
            created_at: model.created_at,
            attributes,
        }
    }
}
