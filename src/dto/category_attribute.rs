use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{default_true, not_blank};
use crate::entities::category_attribute;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryAttributeRequest {
    #[validate(length(min = 1, max = 150), custom = "not_blank")]
    pub attribute_name: String,
    /// Ordered allowed values, e.g. ["S", "M", "L"]
    #[serde(default)]
    pub values: Vec<String>,
    #[validate(range(min = 1, message = "schoolId is required"))]
    pub school_id: i32,
    pub admin_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryAttributeRequest {
    #[validate(length(min = 1, max = 150), custom = "not_blank")]
    pub attribute_name: String,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAttributeResponse {
    pub id: i32,
    pub attribute_name: String,
    pub values: Vec<String>,
    pub school_id: i32,
    pub admin_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<category_attribute::Model> for CategoryAttributeResponse {
    fn from(model: category_attribute::Model) -> Self {
        let values = model.value_list();
        Self {
            id: model.id,
            attribute_name: model.name,
            values,
            school_id: model.school_id,
            admin_id: model.admin_id,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}
