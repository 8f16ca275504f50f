// Catalog
pub mod categories;
pub mod category_attributes;
pub mod products;

// Purchasing
pub mod purchases;
pub mod vendors;

// Sequence code helpers shared by products, purchases and vendors
pub mod codes;

use uuid::Uuid;

use crate::{auth::AdminValidator, errors::ServiceError};

/// Runs the admin check that gates every mutating operation.
pub(crate) async fn ensure_admin(
    validator: &dyn AdminValidator,
    admin_id: Uuid,
    school_id: i32,
    authorization: Option<String>,
) -> Result<(), ServiceError> {
    validator
        .validate(admin_id, school_id, authorization)
        .await
        .map_err(ServiceError::from)
}
