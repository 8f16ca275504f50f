use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};
use tracing::{info, instrument};

use super::{category_attributes::resolve_in_school, ensure_admin};
use crate::{
    auth::AdminValidator,
    dto::{
        category::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest},
        category_attribute::CategoryAttributeResponse,
    },
    entities::{
        category::{self, Entity as Category, SizeType},
        category_attribute, category_category_attribute as link, product,
    },
    errors::ServiceError,
    storage::{ImageStore, StoredFile, Upload},
};

const NOT_FOUND: &str = "Category not found";

/// Applies the size-variant invariant: without size variants the size type
/// and sizes are cleared whatever the input said.
pub fn size_settings(
    has_size_variants: bool,
    size_type: SizeType,
    available_sizes: Option<String>,
) -> Result<(SizeType, Option<String>), ServiceError> {
    if !has_size_variants {
        return Ok((SizeType::None, None));
    }
    if size_type == SizeType::None {
        return Err(ServiceError::UnprocessableEntity(
            "SizeType is required when HasSizeVariants = true".to_string(),
        ));
    }
    match available_sizes {
        Some(sizes) if !sizes.trim().is_empty() => Ok((size_type, Some(sizes))),
        _ => Err(ServiceError::UnprocessableEntity(
            "AvailableSizes is required when HasSizeVariants = true".to_string(),
        )),
    }
}

/// Attributes linked to each of `category_ids`, fetched with one query for
/// the links and one for the attributes.
async fn attributes_by_category<C: ConnectionTrait>(
    conn: &C,
    category_ids: &[i32],
) -> Result<HashMap<i32, Vec<CategoryAttributeResponse>>, ServiceError> {
    if category_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let links = link::Entity::find()
        .filter(link::Column::CategoryId.is_in(category_ids.iter().copied()))
        .order_by_asc(link::Column::Id)
        .all(conn)
        .await?;
    let attribute_ids: BTreeSet<i32> = links.iter().map(|l| l.category_attribute_id).collect();
    if attribute_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let attributes: HashMap<i32, category_attribute::Model> = category_attribute::Entity::find()
        .filter(category_attribute::Column::Id.is_in(attribute_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();

    let mut grouped: HashMap<i32, Vec<CategoryAttributeResponse>> = HashMap::new();
    for l in links {
        if let Some(attribute) = attributes.get(&l.category_attribute_id) {
            grouped
                .entry(l.category_id)
                .or_default()
                .push(attribute.clone().into());
        }
    }
    Ok(grouped)
}

async fn with_attributes<C: ConnectionTrait>(
    conn: &C,
    categories: Vec<category::Model>,
) -> Result<Vec<CategoryResponse>, ServiceError> {
    let ids: Vec<i32> = categories.iter().map(|c| c.id).collect();
    let mut grouped = attributes_by_category(conn, &ids).await?;
    Ok(categories
        .into_iter()
        .map(|c| {
            let attributes = grouped.remove(&c.id).unwrap_or_default();
            CategoryResponse::new(c, attributes)
        })
        .collect())
}

fn dedup(ids: &[i32]) -> Vec<i32> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

/// Categories of a school and their attribute links.
pub struct CategoryService {
    db: Arc<DatabaseConnection>,
    admin: Arc<dyn AdminValidator>,
    images: ImageStore,
}

impl CategoryService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        admin: Arc<dyn AdminValidator>,
        images: ImageStore,
    ) -> Self {
        Self { db, admin, images }
    }

    async fn find(&self, id: i32) -> Result<category::Model, ServiceError> {
        Category::find_by_id(id)
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
        let mut query = Category::find()
            .filter(category::Column::SchoolId.eq(school_id))
            .filter(category::Column::Name.eq(name));
        if let Some(id) = except {
            query = query.filter(category::Column::Id.ne(id));
        }
        Ok(query.count(&*self.db).await? > 0)
    }

    async fn respond(&self, model: category::Model) -> Result<CategoryResponse, ServiceError> {
        let mut list = with_attributes(&*self.db, vec![model]).await?;
        list.pop()
            .ok_or_else(|| ServiceError::InternalError("category vanished".to_string()))
    }

    /// Categories of a school ordered by name, each with its attributes.
    #[instrument(skip(self))]
    pub async fn list_by_school(&self, school_id: i32) -> Result<Vec<CategoryResponse>, ServiceError> {
        let categories = Category::find()
            .filter(category::Column::SchoolId.eq(school_id))
            .order_by_asc(category::Column::Name)
            .all(&*self.db)
            .await?;
        with_attributes(&*self.db, categories).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<CategoryResponse, ServiceError> {
        let model = self.find(id).await?;
        self.respond(model).await
    }

    /// Creates a category with its attribute links in one transaction. The
    /// optional image is written first and discarded again on failure.
    #[instrument(skip(self, dto, image, authorization), fields(school_id = dto.school_id))]
    pub async fn create(
        &self,
        dto: CreateCategoryRequest,
        image: Option<Upload>,
        authorization: Option<String>,
    ) -> Result<CategoryResponse, ServiceError> {
        ensure_admin(&*self.admin, dto.admin_id, dto.school_id, authorization).await?;

        let name = dto.name.trim().to_string();
        if self.name_taken(dto.school_id, &name, None).await? {
            return Err(ServiceError::Conflict("Category already exists".to_string()));
        }
        let (size_type, available_sizes) =
            size_settings(dto.has_size_variants, dto.size_type, dto.available_sizes)?;

        let stored = match &image {
            Some(upload) => Some(self.images.save_category_image(upload).await?),
            None => None,
        };

        let txn = self.db.begin().await?;
        let result: Result<category::Model, ServiceError> = async {
            let attribute_ids = dedup(&dto.attribute_ids);
            resolve_in_school(&txn, dto.school_id, &attribute_ids).await?;

            let model = category::ActiveModel {
                school_id: Set(dto.school_id),
                admin_id: Set(dto.admin_id),
                name: Set(name),
                has_size_variants: Set(dto.has_size_variants),
                size_type: Set(size_type),
                available_sizes: Set(available_sizes),
                image_url: Set(stored.as_ref().map(|f| f.url.clone())),
                is_active: Set(true),
                created_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| ServiceError::conflict_on_unique(e, "Category already exists"))?;

            link_attributes(&txn, model.id, &attribute_ids).await?;
            Ok(model)
        }
        .await;

        let model = match result {
            Ok(model) => {
                txn.commit().await?;
                model
            }
            Err(err) => {
                drop(txn);
                self.discard(stored).await;
                return Err(err);
            }
        };

        info!(category_id = model.id, "category created");
        self.respond(model).await
    }

    /// Replaces the scalar fields and, when `attributeIds` is given, syncs the
    /// attribute links by set difference. The admin check uses the stored
    /// owner and school, never values from the request.
    #[instrument(skip(self, dto, image, authorization))]
    pub async fn update(
        &self,
        id: i32,
        dto: UpdateCategoryRequest,
        image: Option<Upload>,
        authorization: Option<String>,
    ) -> Result<CategoryResponse, ServiceError> {
        let existing = self.find(id).await?;
        ensure_admin(
            &*self.admin,
            existing.admin_id,
            existing.school_id,
            authorization,
        )
        .await?;

        let name = dto.name.trim().to_string();
        if self.name_taken(existing.school_id, &name, Some(id)).await? {
            return Err(ServiceError::Conflict(
                "Category name already exists".to_string(),
            ));
        }
        let (size_type, available_sizes) =
            size_settings(dto.has_size_variants, dto.size_type, dto.available_sizes)?;

        let stored = match &image {
            Some(upload) => Some(self.images.save_category_image(upload).await?),
            None => None,
        };
        let previous_image = existing.image_url.clone();
        let school_id = existing.school_id;

        let txn = self.db.begin().await?;
        let result: Result<category::Model, ServiceError> = async {
            if let Some(incoming) = &dto.attribute_ids {
                sync_attributes(&txn, id, school_id, incoming).await?;
            }

            let mut active: category::ActiveModel = existing.into();
            active.name = Set(name);
            active.has_size_variants = Set(dto.has_size_variants);
            active.size_type = Set(size_type);
            active.available_sizes = Set(available_sizes);
            active.is_active = Set(dto.is_active);
            if let Some(file) = &stored {
                active.image_url = Set(Some(file.url.clone()));
            }
            active
                .update(&txn)
                .await
                .map_err(|e| ServiceError::conflict_on_unique(e, "Category name already exists"))
        }
        .await;

        let model = match result {
            Ok(model) => {
                txn.commit().await?;
                model
            }
            Err(err) => {
                drop(txn);
                self.discard(stored).await;
                return Err(err);
            }
        };

        if stored.is_some() {
            if let Some(old) = previous_image {
                self.images.remove_url(&old).await;
            }
        }

        info!(category_id = id, "category updated");
        self.respond(model).await
    }

    /// Deletes the category and its links; the image file goes last.
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

        let products = product::Entity::find()
            .filter(product::Column::CategoryId.eq(id))
            .count(&*self.db)
            .await?;
        if products > 0 {
            return Err(ServiceError::Conflict(
                "Category has products and cannot be deleted".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        link::Entity::delete_many()
            .filter(link::Column::CategoryId.eq(id))
            .exec(&txn)
            .await?;
        Category::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        if let Some(url) = existing.image_url {
            self.images.remove_url(&url).await;
        }
        info!(category_id = id, "category deleted");
        Ok(())
    }

    async fn discard(&self, stored: Option<StoredFile>) {
        if let Some(file) = stored {
            self.images.discard(std::slice::from_ref(&file)).await;
        }
    }
}

async fn link_attributes<C: ConnectionTrait>(
    conn: &C,
    category_id: i32,
    attribute_ids: &[i32],
) -> Result<(), ServiceError> {
    if attribute_ids.is_empty() {
        return Ok(());
    }
    let rows = attribute_ids.iter().map(|attribute_id| link::ActiveModel {
        category_id: Set(category_id),
        category_attribute_id: Set(*attribute_id),
        ..Default::default()
    });
    link::Entity::insert_many(rows).exec(conn).await?;
    Ok(())
}

/// Brings the category's links in line with `incoming`: only additions are
/// validated against the school, unchanged links are left untouched.
async fn sync_attributes<C: ConnectionTrait>(
    conn: &C,
    category_id: i32,
    school_id: i32,
    incoming: &[i32],
) -> Result<(), ServiceError> {
    let current: BTreeSet<i32> = link::Entity::find()
        .filter(link::Column::CategoryId.eq(category_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|l| l.category_attribute_id)
        .collect();
    let wanted: BTreeSet<i32> = incoming.iter().copied().collect();

    let to_add: Vec<i32> = wanted.difference(&current).copied().collect();
    let to_remove: Vec<i32> = current.difference(&wanted).copied().collect();

    resolve_in_school(conn, school_id, &to_add).await?;

    if !to_remove.is_empty() {
        link::Entity::delete_many()
            .filter(link::Column::CategoryId.eq(category_id))
            .filter(link::Column::CategoryAttributeId.is_in(to_remove))
            .exec(conn)
            .await?;
    }
    link_attributes(conn, category_id, &to_add).await
}
