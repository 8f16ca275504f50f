use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Delivery/invoice record against a purchase order line.
///
/// `purchase_order_id` is a plain column: the entry is kept when its purchase
/// is deleted. `purchase_item_id` cascades with the line and is cleared when
/// the purchase goes away.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_invoice_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub purchase_order_id: i32,
    pub invoice_number: String,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub invoice_amount: Decimal,
    pub invoice_date: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub purchase_item_id: Option<i32>,
    pub delivery_date: DateTime<Utc>,
    pub quantity_received: i32,
    pub delivery_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::purchase_item::Entity",
        from = "Column::PurchaseItemId",
        to = "super::purchase_item::Column::Id",
        on_delete = "Cascade"
    )]
    PurchaseItem,
}

impl Related<super::purchase_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
