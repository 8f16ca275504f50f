use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How a category's sizes are labelled.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum SizeType {
    #[default]
    #[sea_orm(string_value = "None")]
    None,
    /// S, M, L, XL
    #[sea_orm(string_value = "Letter")]
    Letter,
    /// 28, 30, 32
    #[sea_orm(string_value = "Number")]
    Number,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
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
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::category_category_attribute::Entity")]
    CategoryCategoryAttributes,
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::category_category_attribute::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CategoryCategoryAttributes.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::category_attribute::Entity> for Entity {
    fn to() -> RelationDef {
        super::category_category_attribute::Relation::CategoryAttribute.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::category_category_attribute::Relation::Category.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
