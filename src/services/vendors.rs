use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{codes::vendor_code, ensure_admin};
use crate::{
    auth::AdminValidator,
    dto::vendor::{CreateVendorRequest, UpdateVendorRequest, VendorResponse},
    entities::{
        purchase,
        vendor::{self, Entity as Vendor},
    },
    errors::ServiceError,
};

const NOT_FOUND: &str = "Vendor not found";

/// Supplier registry per school.
pub struct VendorService {
    db: Arc<DatabaseConnection>,
    admin: Arc<dyn AdminValidator>,
}

impl VendorService {
    pub fn new(db: Arc<DatabaseConnection>, admin: Arc<dyn AdminValidator>) -> Self {
        Self { db, admin }
    }

    async fn find(&self, id: i32) -> Result<vendor::Model, ServiceError> {
        Vendor::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.to_string()))
    }

    async fn name_taken(
        &self,
        school_id: i32,
        company_name: &str,
        except: Option<i32>,
    ) -> Result<bool, ServiceError> {
        let mut query = Vendor::find()
            .filter(vendor::Column::SchoolId.eq(school_id))
            .filter(vendor::Column::CompanyName.eq(company_name));
        if let Some(id) = except {
            query = query.filter(vendor::Column::Id.ne(id));
        }
        Ok(query.count(&*self.db).await? > 0)
    }

    #[instrument(skip(self))]
    pub async fn list_by_school(&self, school_id: i32) -> Result<Vec<VendorResponse>, ServiceError> {
        let rows = Vendor::find()
            .filter(vendor::Column::SchoolId.eq(school_id))
            .order_by_asc(vendor::Column::CompanyName)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<VendorResponse, ServiceError> {
        Ok(self.find(id).await?.into())
    }

    /// Inserts the vendor, then stamps `V` + padded id as its code. Both
    /// writes share one transaction.
    #[instrument(skip(self, dto, authorization), fields(school_id = dto.school_id))]
    pub async fn create(
        &self,
        dto: CreateVendorRequest,
        authorization: Option<String>,
    ) -> Result<VendorResponse, ServiceError> {
        ensure_admin(&*self.admin, dto.admin_id, dto.school_id, authorization).await?;

        let company_name = dto.company_name.trim().to_string();
        if self.name_taken(dto.school_id, &company_name, None).await? {
            return Err(ServiceError::Conflict("Vendor already exists".to_string()));
        }

        let txn = self.db.begin().await?;
        let inserted = vendor::ActiveModel {
            school_id: Set(dto.school_id),
            admin_id: Set(dto.admin_id),
            vendor_code: Set(None),
            company_name: Set(company_name),
            gst_number: Set(dto.gst_number),
            contact_person: Set(dto.contact_person),
            designation: Set(dto.designation),
            phone: Set(dto.phone),
            email: Set(dto.email),
            address: Set(dto.address),
            bank_name: Set(dto.bank_name),
            account_number: Set(dto.account_number),
            ifsc_code: Set(dto.ifsc_code),
            products_supplied: Set(dto.products_supplied),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| ServiceError::conflict_on_unique(e, "Vendor already exists"))?;

        let code = vendor_code(inserted.id);
        let mut active: vendor::ActiveModel = inserted.into();
        active.vendor_code = Set(Some(code));
        let model = active.update(&txn).await?;
        txn.commit().await?;

        info!(vendor_id = model.id, vendor_code = ?model.vendor_code, "vendor created");
        Ok(model.into())
    }

    #[instrument(skip(self, dto, authorization))]
    pub async fn update(
        &self,
        id: i32,
        dto: UpdateVendorRequest,
        authorization: Option<String>,
    ) -> Result<VendorResponse, ServiceError> {
        let existing = self.find(id).await?;
        ensure_admin(
            &*self.admin,
            existing.admin_id,
            existing.school_id,
            authorization,
        )
        .await?;

        let company_name = dto.company_name.trim().to_string();
        if self
            .name_taken(existing.school_id, &company_name, Some(id))
            .await?
        {
            return Err(ServiceError::Conflict(
                "Vendor name already exists".to_string(),
            ));
        }

        let mut active: vendor::ActiveModel = existing.into();
        active.company_name = Set(company_name);
        active.gst_number = Set(dto.gst_number);
        active.contact_person = Set(dto.contact_person);
        active.designation = Set(dto.designation);
        active.phone = Set(dto.phone);
        active.email = Set(dto.email);
        active.address = Set(dto.address);
        active.bank_name = Set(dto.bank_name);
        active.account_number = Set(dto.account_number);
        active.ifsc_code = Set(dto.ifsc_code);
        active.products_supplied = Set(dto.products_supplied);
        active.is_active = Set(dto.is_active);
        let model = active
            .update(&*self.db)
            .await
            .map_err(|e| ServiceError::conflict_on_unique(e, "Vendor name already exists"))?;

        info!(vendor_id = id, "vendor updated");
        Ok(model.into())
    }

    #[instrument(skip(self, authorization))]
    pub async fn delete(&self, id: i32, authorization: Option<String>) -> Result<(), ServiceError> {
        let existing = self.find(id).await?;
        ensure_admin(
            &*self.admin,
            existing.admin_id,
            existing.school_id,
            authorization,
        )
        .await?;

        let orders = purchase::Entity::find()
            .filter(purchase::Column::VendorId.eq(id))
            .count(&*self.db)
            .await?;
        if orders > 0 {
            return Err(ServiceError::Conflict(
                "Vendor has purchase orders and cannot be deleted".to_string(),
            ));
        }

        Vendor::delete_by_id(id).exec(&*self.db).await?;
        info!(vendor_id = id, "vendor deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{allow_all, memory_db};
    use assert_matches::assert_matches;
    use uuid::Uuid;

    fn vendor_request(school_id: i32, company_name: &str) -> CreateVendorRequest {
        CreateVendorRequest {
            school_id,
            admin_id: Uuid::new_v4(),
            company_name: company_name.to_string(),
            gst_number: "29ABCDE1234F1Z5".into(),
            contact_person: "R. Rao".into(),
            designation: None,
            phone: "9876543210".into(),
            email: "sales@example.com".into(),
            address: "12 Market Road".into(),
            bank_name: None,
            account_number: None,
            ifsc_code: None,
            products_supplied: "Uniforms".into(),
        }
    }

    #[tokio::test]
    async fn code_is_derived_from_the_generated_id() {
        let service = VendorService::new(memory_db().await, allow_all());
        let first = service.create(vendor_request(1, "Acme"), None).await.unwrap();
        let second = service.create(vendor_request(1, "Globex"), None).await.unwrap();
        assert_eq!(first.vendor_code, format!("V{:03}", first.id));
        assert_eq!(second.vendor_code, format!("V{:03}", second.id));
    }

    #[tokio::test]
    async fn company_names_are_unique_per_school_only() {
        let service = VendorService::new(memory_db().await, allow_all());
        service.create(vendor_request(1, "Acme"), None).await.unwrap();
        let err = service.create(vendor_request(1, "Acme"), None).await.unwrap_err();
        assert_matches!(err, ServiceError::Conflict(m) if m == "Vendor already exists");
        service.create(vendor_request(2, "Acme"), None).await.unwrap();
    }

    #[tokio::test]
    async fn list_is_sorted_by_company_name() {
        let service = VendorService::new(memory_db().await, allow_all());
        service.create(vendor_request(1, "Zenith"), None).await.unwrap();
        service.create(vendor_request(1, "Acme"), None).await.unwrap();
        let names: Vec<String> = service
            .list_by_school(1)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.company_name)
            .collect();
        assert_eq!(names, vec!["Acme", "Zenith"]);
    }
}
