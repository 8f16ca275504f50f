use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Purchase order lifecycle.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    ToSchema,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum PurchaseStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "PartiallyReceived")]
    PartiallyReceived,
    #[sea_orm(string_value = "Received")]
    Received,
    #[sea_orm(string_value = "Cancelled")]
    Cancelled,
}

impl PurchaseStatus {
    /// Status implied by per-item `(ordered, received)` quantities.
    /// Cancelled orders never change status.
    pub fn from_receipts(current: Self, items: &[(i32, i32)]) -> Self {
        if current == Self::Cancelled {
            return current;
        }
        if items.is_empty() || items.iter().all(|(_, received)| *received == 0) {
            Self::Pending
        } else if items
            .iter()
            .all(|(ordered, received)| received >= ordered)
        {
            Self::Received
        } else {
            Self::PartiallyReceived
        }
    }

    /// Whether deliveries may still be recorded against the order.
    pub fn accepts_receipts(self) -> bool {
        matches!(self, Self::Pending | Self::PartiallyReceived)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub school_id: i32,
    pub admin_id: Uuid,
    pub vendor_id: i32,
    /// e.g. PO001
    pub purchase_order_number: String,
    pub purchase_date: DateTime<Utc>,
    pub status: PurchaseStatus,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub total_amount: Decimal,
    pub remarks: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vendor::Entity",
        from = "Column::VendorId",
        to = "super::vendor::Column::Id"
    )]
    Vendor,
    #[sea_orm(has_many = "super::purchase_item::Entity")]
    Items,
}

impl Related<super::vendor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendor.def()
    }
}

impl Related<super::purchase_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::PurchaseStatus::{self, *};
    use rstest::rstest;

    #[rstest]
    #[case(Pending, &[(5, 0), (3, 0)], Pending)]
    #[case(Pending, &[(5, 2), (3, 0)], PartiallyReceived)]
    #[case(PartiallyReceived, &[(5, 5), (3, 3)], Received)]
    #[case(Received, &[(5, 5), (3, 1)], PartiallyReceived)]
    #[case(Cancelled, &[(5, 5)], Cancelled)]
    #[case(PartiallyReceived, &[], Pending)]
    fn status_follows_receipts(
        #[case] current: PurchaseStatus,
        #[case] items: &[(i32, i32)],
        #[case] expected: PurchaseStatus,
    ) {
        assert_eq!(PurchaseStatus::from_receipts(current, items), expected);
    }

    #[test]
    fn only_open_orders_accept_receipts() {
        assert!(Pending.accepts_receipts());
        assert!(PartiallyReceived.accepts_receipts());
        assert!(!Received.accepts_receipts());
        assert!(!Cancelled.accepts_receipts());
    }
}
