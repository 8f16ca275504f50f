use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{default_true, not_blank};
use crate::entities::vendor;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVendorRequest {
    #[validate(range(min = 1, message = "schoolId is required"))]
    pub school_id: i32,
    pub admin_id: Uuid,
    #[validate(length(min = 1, max = 200), custom = "not_blank")]
    pub company_name: String,
    #[validate(length(min = 1, max = 50))]
    pub gst_number: String,
    #[validate(length(min = 1, max = 150))]
    pub contact_person: String,
    #[validate(length(max = 100))]
    pub designation: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub phone: String,
    #[validate(email, length(max = 150))]
    pub email: String,
    #[validate(length(min = 1, max = 500))]
    pub address: String,
    #[validate(length(max = 150))]
    pub bank_name: Option<String>,
    #[validate(length(max = 50))]
    pub account_number: Option<String>,
    #[validate(length(max = 20))]
    pub ifsc_code: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub products_supplied: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVendorRequest {
    #[validate(length(min = 1, max = 200), custom = "not_blank")]
    pub company_name: String,
    #[validate(length(min = 1, max = 50))]
    pub gst_number: String,
    #[validate(length(min = 1, max = 150))]
    pub contact_person: String,
    #[validate(length(max = 100))]
    pub designation: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub phone: String,
    #[validate(email, length(max = 150))]
    pub email: String,
    #[validate(length(min = 1, max = 500))]
    pub address: String,
    #[validate(length(max = 150))]
    pub bank_name: Option<String>,
    #[validate(length(max = 50))]
    pub account_number: Option<String>,
    #[validate(length(max = 20))]
    pub ifsc_code: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub products_supplied: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VendorResponse {
    pub id: i32,
    pub school_id: i32,
    pub admin_id: Uuid,
    pub vendor_code: String,
    pub company_name: String,
    pub gst_number: String,
    pub contact_person: String,
    pub designation: Option<String>,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub products_supplied: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<vendor::Model> for VendorResponse {
    fn from(v: vendor::Model) -> Self {
        Self {
            id: v.id,
            school_id: v.school_id,
            admin_id: v.admin_id,
            vendor_code: v.vendor_code.unwrap_or_default(),
            company_name: v.company_name,
            gst_number: v.gst_number,
            contact_person: v.contact_person,
            designation: v.designation,
            phone: v.phone,
            email: v.email,
            address: v.address,
            bank_name: v.bank_name,
            account_number: v.account_number,
            ifsc_code: v.ifsc_code,
            products_supplied: v.products_supplied,
            is_active: v.is_active,
            created_at: v.created_at,
        }
    }
}
