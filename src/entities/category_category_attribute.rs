use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Join row linking a category to one of its school's attributes.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category_category_attributes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub category_id: i32,
    pub category_attribute_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "Cascade"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::category_attribute::Entity",
        from = "Column::CategoryAttributeId",
        to = "super::category_attribute::Column::Id",
        on_delete = "Restrict"
    )]
    CategoryAttribute,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::category_attribute::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CategoryAttribute.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
