use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::{collections::BTreeSet, sync::Arc};
use tracing::{info, instrument};

use super::ensure_admin;
use crate::{
    auth::AdminValidator,
    dto::category_attribute::{
        CategoryAttributeResponse, CreateCategoryAttributeRequest, UpdateCategoryAttributeRequest,
    },
    entities::{
        category_attribute::{self, values_codec, Entity as CategoryAttribute},
        category_category_attribute, product_variant,
    },
    errors::ServiceError,
};

const NOT_FOUND: &str = "Attribute not found";

/// Loads the attributes behind `ids`, all of which must belong to `school_id`.
/// Any id that does not resolve is reported in a single 422.
pub(crate) async fn resolve_in_school<C: ConnectionTrait>(
    conn: &C,
    school_id: i32,
    ids: &[i32],
) -> Result<Vec<category_attribute::Model>, ServiceError> {
    let wanted: BTreeSet<i32> = ids.iter().copied().collect();
    if wanted.is_empty() {
        return Ok(Vec::new());
    }

    let found = CategoryAttribute::find()
        .filter(category_attribute::Column::Id.is_in(wanted.iter().copied()))
        .filter(category_attribute::Column::SchoolId.eq(school_id))
        .all(conn)
        .await?;

    let missing: Vec<i32> = wanted
        .iter()
        .copied()
        .filter(|id| !found.iter().any(|a| a.id == *id))
        .collect();
    if !missing.is_empty() {
        return Err(ServiceError::UnprocessableEntity(format!(
            "Invalid attribute ids for this school: {:?}",
            missing
        )));
    }
    Ok(found)
}

fn encode_values(values: &[String]) -> Result<String, ServiceError> {
    values_codec::encode(&values_codec::normalize(values))
        .map_err(|e| ServiceError::InternalError(format!("encode attribute values: {}", e)))
}

/// Named axes of variation (e.g. "Size") with their ordered values.
pub struct CategoryAttributeService {
    db: Arc<DatabaseConnection>,
    admin: Arc<dyn AdminValidator>,
}

impl CategoryAttributeService {
    pub fn new(db: Arc<DatabaseConnection>, admin: Arc<dyn AdminValidator>) -> Self {
        Self { db, admin }
    }

    async fn find(&self, id: i32) -> Result<category_attribute::Model, ServiceError> {
        CategoryAttribute::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.to_string()))
    }

    async fn name_taken(
        &self,
        school_id: i32,
        name: &str,
        except: Option<i32>,
    ) -> Result<bool, ServiceError> {
        let mut query = CategoryAttribute::find()
            .filter(category_attribute::Column::SchoolId.eq(school_id))
            .filter(category_attribute::Column::Name.eq(name));
        if let Some(id) = except {
            query = query.filter(category_attribute::Column::Id.ne(id));
        }
        Ok(query.count(&*self.db).await? > 0)
    }

    #[instrument(skip(self))]
    pub async fn list_by_school(
        &self,
        school_id: i32,
    ) -> Result<Vec<CategoryAttributeResponse>, ServiceError> {
        let rows = CategoryAttribute::find()
            .filter(category_attribute::Column::SchoolId.eq(school_id))
            .order_by_asc(category_attribute::Column::Name)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<CategoryAttributeResponse, ServiceError> {
        Ok(self.find(id).await?.into())
    }

    #[instrument(skip(self, dto, authorization), fields(school_id = dto.school_id))]
    pub async fn create(
        &self,
        dto: CreateCategoryAttributeRequest,
        authorization: Option<String>,
    ) -> Result<CategoryAttributeResponse, ServiceError> {
        ensure_admin(&*self.admin, dto.admin_id, dto.school_id, authorization).await?;

        let name = dto.attribute_name.trim().to_string();
        if self.name_taken(dto.school_id, &name, None).await? {
            return Err(ServiceError::Conflict("Attribute already exists.".to_string()));
        }

        let model = category_attribute::ActiveModel {
            school_id: Set(dto.school_id),
            admin_id: Set(dto.admin_id),
            name: Set(name),
            values: Set(encode_values(&dto.values)?),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .map_err(|e| ServiceError::conflict_on_unique(e, "Attribute already exists."))?;

        info!(attribute_id = model.id, "category attribute created");
        Ok(model.into())
    }

    #[instrument(skip(self, dto, authorization))]
    pub async fn update(
        &self,
        id: i32,
        dto: UpdateCategoryAttributeRequest,
        authorization: Option<String>,
    ) -> Result<CategoryAttributeResponse, ServiceError> {
        let existing = self.find(id).await?;
        ensure_admin(
            &*self.admin,
            existing.admin_id,
            existing.school_id,
            authorization,
        )
        .await?;

        let name = dto.attribute_name.trim().to_string();
        if self.name_taken(existing.school_id, &name, Some(id)).await? {
            return Err(ServiceError::Conflict(
                "Attribute name already exists.".to_string(),
            ));
        }

        let mut active: category_attribute::ActiveModel = existing.into();
        active.name = Set(name);
        active.values = Set(encode_values(&dto.values)?);
        active.is_active = Set(dto.is_active);
        let model = active
            .update(&*self.db)
            .await
            .map_err(|e| ServiceError::conflict_on_unique(e, "Attribute name already exists."))?;

        info!(attribute_id = id, "category attribute updated");
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

        let linked = category_category_attribute::Entity::find()
            .filter(category_category_attribute::Column::CategoryAttributeId.eq(id))
            .count(&*self.db)
            .await?;
        let variants = product_variant::Entity::find()
            .filter(product_variant::Column::AttributeId.eq(id))
            .count(&*self.db)
            .await?;
        if linked + variants > 0 {
            return Err(ServiceError::Conflict(
                "Attribute is in use and cannot be deleted".to_string(),
            ));
        }

        CategoryAttribute::delete_by_id(id).exec(&*self.db).await?;
        info!(attribute_id = id, "category attribute deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AdminDenial, MockAdminValidator};
    use crate::services::test_support::{allow_all, memory_db};
    use assert_matches::assert_matches;
    use uuid::Uuid;

    fn create_request(name: &str, values: &[&str]) -> CreateCategoryAttributeRequest {
        CreateCategoryAttributeRequest {
            attribute_name: name.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
            school_id: 1,
            admin_id: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn values_are_normalized_and_order_preserved() {
        let service = CategoryAttributeService::new(memory_db().await, allow_all());
        let created = service
            .create(create_request(" Size ", &["S", " M ", "", "L"]), None)
            .await
            .unwrap();
        assert_eq!(created.attribute_name, "Size");
        assert_eq!(created.values, vec!["S", "M", "L"]);
    }

    #[tokio::test]
    async fn duplicate_name_in_school_conflicts() {
        let service = CategoryAttributeService::new(memory_db().await, allow_all());
        service.create(create_request("Size", &[]), None).await.unwrap();
        let err = service.create(create_request("Size", &[]), None).await.unwrap_err();
        assert_matches!(err, ServiceError::Conflict(m) if m == "Attribute already exists.");
    }

    #[tokio::test]
    async fn denied_admin_writes_nothing() {
        let mut validator = MockAdminValidator::new();
        validator
            .expect_validate()
            .times(1)
            .returning(|_, _, _| Err(AdminDenial::InsufficientRole));
        let service = CategoryAttributeService::new(memory_db().await, Arc::new(validator));

        let err = service.create(create_request("Size", &["S"]), None).await.unwrap_err();
        assert_matches!(err, ServiceError::Forbidden(_));
        assert!(service.list_by_school(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn resolve_reports_ids_outside_the_school() {
        let db = memory_db().await;
        let service = CategoryAttributeService::new(db.clone(), allow_all());
        let size = service.create(create_request("Size", &["S"]), None).await.unwrap();

        let err = resolve_in_school(&*db, 1, &[size.id, 999]).await.unwrap_err();
        assert_matches!(
            err,
            ServiceError::UnprocessableEntity(m) if m == "Invalid attribute ids for this school: [999]"
        );
        let err = resolve_in_school(&*db, 2, &[size.id]).await.unwrap_err();
        assert_matches!(err, ServiceError::UnprocessableEntity(_));
        assert_eq!(resolve_in_school(&*db, 1, &[size.id]).await.unwrap().len(), 1);
    }
}
