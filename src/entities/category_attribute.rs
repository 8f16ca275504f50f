use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category attribute; `values` holds the ordered value list as a JSON array string.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category_attributes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub school_id: i32,
    pub admin_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub values: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Model {
    /// Decoded value list; a corrupt column decodes to an empty list.
    pub fn value_list(&self) -> Vec<String> {
        values_codec::decode(&self.values).unwrap_or_else(|err| {
            tracing::warn!(attribute_id = self.id, error = %err, "undecodable attribute values");
            Vec::new()
        })
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::category_category_attribute::Entity")]
    CategoryCategoryAttributes,
    #[sea_orm(has_many = "super::product_variant::Entity")]
    ProductVariants,
}

impl Related<super::category_category_attribute::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CategoryCategoryAttributes.def()
    }
}

impl Related<super::product_variant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductVariants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Persistence codec between an ordered value list and its stored JSON text.
pub mod values_codec {
    /// Trims entries and drops blanks, keeping first-seen order.
    pub fn normalize(values: &[String]) -> Vec<String> {
        values
            .iter()
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn encode(values: &[String]) -> Result<String, serde_json::Error> {
        serde_json::to_string(values)
    }

    /// Empty text decodes to an empty list.
    pub fn decode(raw: &str) -> Result<Vec<String>, serde_json::Error> {
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(raw)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use proptest::prelude::*;

        #[test]
        fn normalize_trims_and_drops_blank_entries() {
            let raw = vec![" S ".to_string(), "".to_string(), "M".to_string(), "  ".to_string()];
            assert_eq!(normalize(&raw), vec!["S".to_string(), "M".to_string()]);
        }

        #[test]
        fn decode_empty_text_is_empty_list() {
            assert!(decode("").unwrap().is_empty());
            assert!(decode("[]").unwrap().is_empty());
        }

        #[test]
        fn decode_rejects_non_array_text() {
            assert!(decode("{\"a\":1}").is_err());
        }

        proptest! {
            #[test]
            fn encoding_preserves_order_and_content(values in proptest::collection::vec(".*", 0..8)) {
                let encoded = encode(&values).unwrap();
                prop_assert_eq!(decode(&encoded).unwrap(), values);
            }
        }
    }
}
