use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase order line. `quantity_received` is the running total across
/// invoice entries and never exceeds `quantity_ordered`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub purchase_id: i32,
    pub product_id: i32,
    pub variant_id: Option<i32>,
    pub quantity_ordered: i32,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub unit_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub total_cost: Decimal,
    pub quantity_received: i32,
    pub remarks: Option<String>,
}

impl Model {
    pub fn outstanding(&self) -> i32 {
        (self.quantity_ordered - self.quantity_received).max(0)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::purchase::Entity",
        from = "Column::PurchaseId",
        to = "super::purchase::Column::Id",
        on_delete = "Cascade"
    )]
    Purchase,
    #[sea_orm(has_many = "super::purchase_invoice_entry::Entity")]
    InvoiceEntries,
}

impl Related<super::purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchase.def()
    }
}

impl Related<super::purchase_invoice_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvoiceEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
