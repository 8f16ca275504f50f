use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::{non_negative_amount, not_blank, unit_price};
use crate::entities::{
    purchase::{self, PurchaseStatus},
    purchase_invoice_entry, purchase_item,
};

/// One row of the purchase order's product list.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseLineInput {
    /// Display name echoed in logs
    #[validate(length(min = 1, max = 200))]
    pub product_name: String,
    #[validate(range(min = 1, message = "productId is required"))]
    pub product_id: i32,
    pub variant_id: Option<i32>,
    #[validate(range(min = 1, max = 1000000, message = "must be between 1 and 1000000"))]
    pub quantity: i32,
    #[validate(custom = "unit_price")]
    pub purchase_price_per_unit: Decimal,
    #[validate(length(max = 500))]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseRequest {
    #[validate(range(min = 1, message = "schoolId is required"))]
    pub school_id: i32,
    pub admin_id: Uuid,
    #[validate(range(min = 1, message = "vendorId is required"))]
    pub vendor_id: i32,
    #[validate(length(max = 500))]
    pub remarks: Option<String>,
    #[validate(length(min = 1, message = "At least one product is required."))]
    #[validate]
    pub products: Vec<PurchaseLineInput>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancelPurchaseRequest {
    pub admin_id: Uuid,
}

/// Optional acting admin for purchase deletions; the order's own admin is
/// checked when absent.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ActingAdminQuery {
    pub admin_id: Option<Uuid>,
}

/// A delivery/invoice against one purchase line.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordInvoiceEntryRequest {
    pub admin_id: Uuid,
    pub purchase_item_id: i32,
    #[validate(length(min = 1, max = 100), custom = "not_blank")]
    pub invoice_number: String,
    #[validate(custom = "non_negative_amount")]
    pub invoice_amount: Decimal,
    pub invoice_date: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub delivery_date: DateTime<Utc>,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub quantity_received: i32,
    #[validate(length(max = 500))]
    pub delivery_notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItemResponse {
    pub id: i32,
    pub purchase_id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub variant_id: Option<i32>,
    pub quantity_ordered: i32,
    pub unit_cost: Decimal,
    pub total_cost: Decimal,
    pub quantity_received: i32,
    pub remarks: Option<String>,
}

impl PurchaseItemResponse {
    pub fn new(item: purchase_item::Model, product_name: String) -> Self {
        Self {
            id: item.id,
            purchase_id: item.purchase_id,
            product_id: item.product_id,
            product_name,
            variant_id: item.variant_id,
            quantity_ordered: item.quantity_ordered,
            unit_cost: item.unit_cost,
            total_cost: item.total_cost,
            quantity_received: item.quantity_received,
            remarks: item.remarks,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    pub id: i32,
    pub school_id: i32,
    pub admin_id: Uuid,
    pub vendor_id: i32,
    pub purchase_order_number: String,
    pub purchase_date: DateTime<Utc>,
    pub status: PurchaseStatus,
    pub total_amount: Decimal,
    pub remarks: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub items: Vec<PurchaseItemResponse>,
}

impl PurchaseResponse {
    pub fn new(purchase: purchase::Model, items: Vec<PurchaseItemResponse>) -> Self {
        Self {
            id: purchase.id,
            school_id: purchase.school_id,
            admin_id: purchase.admin_id,
            vendor_id: purchase.vendor_id,
            purchase_order_number: purchase.purchase_order_number,
            purchase_date: purchase.purchase_date,
            status: purchase.status,
            total_amount: purchase.total_amount,
            remarks: purchase.remarks,
            is_active: purchase.is_active,
            created_at: purchase.created_at,
            items,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceEntryResponse {
    pub id: i32,
    pub purchase_order_id: i32,
    /// Cleared once the purchase order itself is deleted
    pub purchase_item_id: Option<i32>,
    pub invoice_number: String,
    pub invoice_amount: Decimal,
    pub invoice_date: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub delivery_date: DateTime<Utc>,
    pub quantity_received: i32,
    pub delivery_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<purchase_invoice_entry::Model> for InvoiceEntryResponse {
    fn from(e: purchase_invoice_entry::Model) -> Self {
        Self {
            id: e.id,
            purchase_order_id: e.purchase_order_id,
            purchase_item_id: e.purchase_item_id,
            invoice_number: e.invoice_number,
            invoice_amount: e.invoice_amount,
            invoice_date: e.invoice_date,
            due_date: e.due_date,
            delivery_date: e.delivery_date,
            quantity_received: e.quantity_received,
            delivery_notes: e.delivery_notes,
            created_at: e.created_at,
        }
    }
}
