use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};
use tracing::{info, instrument, warn};

use super::{
    category_attributes::resolve_in_school,
    codes::{next_code, PRODUCT_CODE_PREFIX},
    ensure_admin,
};
use crate::{
    auth::AdminValidator,
    dto::product::{
        status_label, CreateProductRequest, ProductImageResponse, ProductResponse,
        ProductVariantResponse, UpdateProductRequest, VariantInput,
    },
    entities::{
        category, category_attribute,
        product::{self, Entity as Product},
        product_image, product_variant, purchase_item,
    },
    errors::ServiceError,
    storage::{ImageStore, StoredFile, Upload},
};

const NOT_FOUND: &str = "Product not found";

/// Simple price fields as they will be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimplePricing {
    pub mrp: Option<Decimal>,
    pub purchase_price: Option<Decimal>,
    pub quantity: Option<i32>,
    pub reorder_level: Option<i32>,
}

impl SimplePricing {
    const CLEARED: Self = Self {
        mrp: None,
        purchase_price: None,
        quantity: None,
        reorder_level: None,
    };
}

/// Branches strictly on `has_variants`: variant products need at least one
/// variant and store no simple pricing; simple products need MRP, purchase
/// price and quantity, and keep no variants.
pub fn product_shape(
    has_variants: bool,
    variant_count: usize,
    pricing: SimplePricing,
) -> Result<SimplePricing, ServiceError> {
    if has_variants {
        if variant_count == 0 {
            return Err(ServiceError::UnprocessableEntity(
                "At least one variant is required when HasVariants = true".to_string(),
            ));
        }
        return Ok(SimplePricing::CLEARED);
    }
    if pricing.mrp.is_none() || pricing.purchase_price.is_none() || pricing.quantity.is_none() {
        return Err(ServiceError::UnprocessableEntity(
            "MRP, PurchasePrice, and Quantity are required when HasVariants = false".to_string(),
        ));
    }
    Ok(pricing)
}

async fn next_product_code<C: ConnectionTrait>(conn: &C, school_id: i32) -> Result<String, ServiceError> {
    let last = Product::find()
        .filter(product::Column::SchoolId.eq(school_id))
        .order_by_desc(product::Column::Id)
        .one(conn)
        .await?;
    Ok(next_code(
        PRODUCT_CODE_PREFIX,
        last.as_ref().map(|p| p.product_code.as_str()),
    ))
}

fn variant_model(product_id: i32, input: &VariantInput) -> product_variant::ActiveModel {
    product_variant::ActiveModel {
        product_id: Set(product_id),
        attribute_id: Set(input.attribute_id),
        attribute_value: Set(input.attribute_value.trim().to_string()),
        mrp: Set(input.mrp),
        purchase_price: Set(input.purchase_price),
        quantity: Set(input.quantity),
        reorder_level: Set(input.reorder_level),
        ..Default::default()
    }
}

/// Builds responses for `products` with batched lookups of categories,
/// variants, attribute names and images.
async fn present<C: ConnectionTrait>(
    conn: &C,
    products: Vec<product::Model>,
) -> Result<Vec<ProductResponse>, ServiceError> {
    if products.is_empty() {
        return Ok(Vec::new());
    }
    let product_ids: Vec<i32> = products.iter().map(|p| p.id).collect();
    let category_ids: BTreeSet<i32> = products.iter().map(|p| p.category_id).collect();

    let category_names: HashMap<i32, String> = category::Entity::find()
        .filter(category::Column::Id.is_in(category_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let variants = product_variant::Entity::find()
        .filter(product_variant::Column::ProductId.is_in(product_ids.clone()))
        .order_by_asc(product_variant::Column::Id)
        .all(conn)
        .await?;
    let attribute_ids: BTreeSet<i32> = variants.iter().map(|v| v.attribute_id).collect();
    let attribute_names: HashMap<i32, String> = if attribute_ids.is_empty() {
        HashMap::new()
    } else {
        category_attribute::Entity::find()
            .filter(category_attribute::Column::Id.is_in(attribute_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|a| (a.id, a.name))
            .collect()
    };

    let mut variants_by_product: HashMap<i32, Vec<ProductVariantResponse>> = HashMap::new();
    for v in variants {
        let name = attribute_names.get(&v.attribute_id).cloned().unwrap_or_default();
        variants_by_product
            .entry(v.product_id)
            .or_default()
            .push(ProductVariantResponse::new(v, name));
    }

    let mut images_by_product: HashMap<i32, Vec<ProductImageResponse>> = HashMap::new();
    for image in product_image::Entity::find()
        .filter(product_image::Column::ProductId.is_in(product_ids))
        .order_by_asc(product_image::Column::Id)
        .all(conn)
        .await?
    {
        images_by_product
            .entry(image.product_id)
            .or_default()
            .push(image.into());
    }

    Ok(products
        .into_iter()
        .map(|p| ProductResponse {
            category_name: category_names.get(&p.category_id).cloned().unwrap_or_default(),
            variants: variants_by_product.remove(&p.id).unwrap_or_default(),
            images: images_by_product.remove(&p.id).unwrap_or_default(),
            status: status_label(p.is_active).to_string(),
            id: p.id,
            product_code: p.product_code,
            name: p.name,
            school_id: p.school_id,
            category_id: p.category_id,
            has_variants: p.has_variants,
            is_active: p.is_active,
            remarks: p.remarks,
            mrp: p.mrp,
            purchase_price: p.purchase_price,
            quantity: p.quantity,
            reorder_level: p.reorder_level,
            created_at: p.created_at,
        })
        .collect())
}

/// Products with optional attribute variants and image galleries.
pub struct ProductService {
    db: Arc<DatabaseConnection>,
    admin: Arc<dyn AdminValidator>,
    images: ImageStore,
}

impl ProductService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        admin: Arc<dyn AdminValidator>,
        images: ImageStore,
    ) -> Self {
        Self { db, admin, images }
    }

    async fn find(&self, id: i32) -> Result<product::Model, ServiceError> {
        Product::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.to_string()))
    }

    async fn respond(&self, model: product::Model) -> Result<ProductResponse, ServiceError> {
        present(&*self.db, vec![model])
            .await?
            .pop()
            .ok_or_else(|| ServiceError::InternalError("product vanished".to_string()))
    }

    async fn store_images<C: ConnectionTrait>(
        &self,
        conn: &C,
        school_id: i32,
        product_id: i32,
        uploads: &[Upload],
        written: &mut Vec<StoredFile>,
    ) -> Result<(), ServiceError> {
        for upload in uploads {
            let file = self
                .images
                .save_product_image(school_id, product_id, upload)
                .await?;
            product_image::ActiveModel {
                product_id: Set(product_id),
                image_url: Set(file.url.clone()),
                file_name: Set(file.file_name.clone()),
                ..Default::default()
            }
            .insert(conn)
            .await?;
            written.push(file);
        }
        Ok(())
    }

    /// Products of a school, newest first.
    #[instrument(skip(self))]
    pub async fn list_by_school(&self, school_id: i32) -> Result<Vec<ProductResponse>, ServiceError> {
        let products = Product::find()
            .filter(product::Column::SchoolId.eq(school_id))
            .order_by_desc(product::Column::Id)
            .all(&*self.db)
            .await?;
        present(&*self.db, products).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<ProductResponse, ServiceError> {
        let model = self.find(id).await?;
        self.respond(model).await
    }

    /// Inserts the product, its variants and images in one transaction.
    /// Files written before a failure are removed again.
    #[instrument(skip(self, dto, uploads, authorization), fields(school_id = dto.school_id))]
    pub async fn create(
        &self,
        dto: CreateProductRequest,
        uploads: Vec<Upload>,
        authorization: Option<String>,
    ) -> Result<ProductResponse, ServiceError> {
        ensure_admin(&*self.admin, dto.admin_id, dto.school_id, authorization).await?;

        category::Entity::find_by_id(dto.category_id)
            .filter(category::Column::SchoolId.eq(dto.school_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Category not found".to_string()))?;

        let pricing = product_shape(
            dto.has_variants,
            dto.variants.len(),
            SimplePricing {
                mrp: dto.mrp,
                purchase_price: dto.purchase_price,
                quantity: dto.quantity,
                reorder_level: dto.reorder_level,
            },
        )?;

        let mut written = Vec::new();
        let txn = self.db.begin().await?;
        let result: Result<product::Model, ServiceError> = async {
            let variants: &[VariantInput] = if dto.has_variants { &dto.variants } else { &[] };
            let attribute_ids: Vec<i32> = variants.iter().map(|v| v.attribute_id).collect();
            resolve_in_school(&txn, dto.school_id, &attribute_ids).await?;

            let code = next_product_code(&txn, dto.school_id).await?;
            let model = product::ActiveModel {
                school_id: Set(dto.school_id),
                admin_id: Set(dto.admin_id),
                category_id: Set(dto.category_id),
                name: Set(dto.name.trim().to_string()),
                product_code: Set(code),
                has_variants: Set(dto.has_variants),
                mrp: Set(pricing.mrp),
                purchase_price: Set(pricing.purchase_price),
                quantity: Set(pricing.quantity),
                reorder_level: Set(pricing.reorder_level),
                remarks: Set(dto.remarks.clone()),
                is_active: Set(true),
                created_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| ServiceError::conflict_on_unique(e, "Product code already exists"))?;

            if !variants.is_empty() {
                product_variant::Entity::insert_many(
                    variants.iter().map(|v| variant_model(model.id, v)),
                )
                .exec(&txn)
                .await?;
            }

            self.store_images(&txn, dto.school_id, model.id, &uploads, &mut written)
                .await?;
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
                self.images.discard(&written).await;
                warn!(error = %err, "product create rolled back");
                return Err(err);
            }
        };

        info!(product_id = model.id, product_code = %model.product_code, "product created");
        self.respond(model).await
    }

    /// Full replacement of the scalar fields plus variant reconciliation by
    /// id and image add/remove. The acting admin is checked against the
    /// product's stored school.
    #[instrument(skip(self, dto, uploads, authorization))]
    pub async fn update(
        &self,
        id: i32,
        dto: UpdateProductRequest,
        uploads: Vec<Upload>,
        authorization: Option<String>,
    ) -> Result<ProductResponse, ServiceError> {
        let existing = self.find(id).await?;
        ensure_admin(&*self.admin, dto.admin_id, existing.school_id, authorization).await?;

        let pricing = product_shape(
            dto.has_variants,
            dto.variants.len(),
            SimplePricing {
                mrp: dto.mrp,
                purchase_price: dto.purchase_price,
                quantity: dto.quantity,
                reorder_level: dto.reorder_level,
            },
        )?;
        let school_id = existing.school_id;

        let mut written = Vec::new();
        let mut removed_urls = Vec::new();
        let txn = self.db.begin().await?;
        let result: Result<product::Model, ServiceError> = async {
            if dto.has_variants {
                let attribute_ids: Vec<i32> = dto.variants.iter().map(|v| v.attribute_id).collect();
                resolve_in_school(&txn, school_id, &attribute_ids).await?;
                reconcile_variants(&txn, id, &dto.variants).await?;
            } else {
                product_variant::Entity::delete_many()
                    .filter(product_variant::Column::ProductId.eq(id))
                    .exec(&txn)
                    .await?;
            }

            if !dto.remove_image_ids.is_empty() {
                let doomed = product_image::Entity::find()
                    .filter(product_image::Column::ProductId.eq(id))
                    .filter(product_image::Column::Id.is_in(dto.remove_image_ids.clone()))
                    .all(&txn)
                    .await?;
                if !doomed.is_empty() {
                    product_image::Entity::delete_many()
                        .filter(product_image::Column::Id.is_in(doomed.iter().map(|i| i.id)))
                        .exec(&txn)
                        .await?;
                }
                removed_urls.extend(doomed.into_iter().map(|i| i.image_url));
            }

            self.store_images(&txn, school_id, id, &uploads, &mut written)
                .await?;

            let is_active = dto.is_active.unwrap_or(existing.is_active);
            let mut active: product::ActiveModel = existing.into();
            active.name = Set(dto.name.trim().to_string());
            active.has_variants = Set(dto.has_variants);
            active.mrp = Set(pricing.mrp);
            active.purchase_price = Set(pricing.purchase_price);
            active.quantity = Set(pricing.quantity);
            active.reorder_level = Set(pricing.reorder_level);
            active.remarks = Set(dto.remarks.clone());
            active.is_active = Set(is_active);
            Ok(active.update(&txn).await?)
        }
        .await;

        let model = match result {
            Ok(model) => {
                txn.commit().await?;
                model
            }
            Err(err) => {
                drop(txn);
                self.images.discard(&written).await;
                warn!(product_id = id, error = %err, "product update rolled back");
                return Err(err);
            }
        };

        for url in &removed_urls {
            self.images.remove_url(url).await;
        }

        info!(product_id = id, "product updated");
        self.respond(model).await
    }

    /// Deletes variants, images and the product row together, then the
    /// product's image folder.
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

        let ordered = purchase_item::Entity::find()
            .filter(purchase_item::Column::ProductId.eq(id))
            .count(&*self.db)
            .await?;
        if ordered > 0 {
            return Err(ServiceError::Conflict(
                "Product is on purchase orders and cannot be deleted".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        product_variant::Entity::delete_many()
            .filter(product_variant::Column::ProductId.eq(id))
            .exec(&txn)
            .await?;
        product_image::Entity::delete_many()
            .filter(product_image::Column::ProductId.eq(id))
            .exec(&txn)
            .await?;
        Product::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        if let Err(e) = self
            .images
            .remove_product_folder(existing.school_id, id)
            .await
        {
            warn!(product_id = id, error = %e, "failed to remove product images");
        }
        info!(product_id = id, "product deleted");
        Ok(())
    }
}

/// Applies the incoming variant list: rows without id are inserted, rows
/// with an id overwrite that variant, and stored variants missing from the
/// list are deleted.
async fn reconcile_variants<C: ConnectionTrait>(
    conn: &C,
    product_id: i32,
    incoming: &[VariantInput],
) -> Result<(), ServiceError> {
    let current: HashMap<i32, product_variant::Model> = product_variant::Entity::find()
        .filter(product_variant::Column::ProductId.eq(product_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|v| (v.id, v))
        .collect();

    let keep: BTreeSet<i32> = incoming.iter().filter_map(|v| v.id).collect();
    if let Some(foreign) = keep.iter().find(|id| !current.contains_key(id)) {
        return Err(ServiceError::UnprocessableEntity(format!(
            "Variant {} does not belong to this product",
            foreign
        )));
    }

    let stale: Vec<i32> = current
        .keys()
        .copied()
        .filter(|id| !keep.contains(id))
        .collect();
    if !stale.is_empty() {
        product_variant::Entity::delete_many()
            .filter(product_variant::Column::Id.is_in(stale))
            .exec(conn)
            .await?;
    }

    for input in incoming {
        match input.id.and_then(|id| current.get(&id)) {
            Some(stored) => {
                let mut active: product_variant::ActiveModel = stored.clone().into();
                active.attribute_id = Set(input.attribute_id);
                active.attribute_value = Set(input.attribute_value.trim().to_string());
                active.mrp = Set(input.mrp);
                active.purchase_price = Set(input.purchase_price);
                active.quantity = Set(input.quantity);
                active.reorder_level = Set(input.reorder_level);
                active.update(conn).await?;
            }
            None => {
                variant_model(product_id, input).insert(conn).await?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn priced(mrp: Option<Decimal>, purchase: Option<Decimal>, qty: Option<i32>) -> SimplePricing {
        SimplePricing {
            mrp,
            purchase_price: purchase,
            quantity: qty,
            reorder_level: Some(2),
        }
    }

    #[test]
    fn variant_products_drop_simple_pricing() {
        let shaped = product_shape(true, 2, priced(Some(dec!(10)), None, Some(1))).unwrap();
        assert_eq!(shaped, SimplePricing::CLEARED);
    }

    #[test]
    fn variant_products_need_a_variant() {
        let err = product_shape(true, 0, priced(None, None, None)).unwrap_err();
        assert_matches!(
            err,
            ServiceError::UnprocessableEntity(m) if m.starts_with("At least one variant is required")
        );
    }

    #[test]
    fn simple_products_need_all_three_price_fields() {
        for pricing in [
            priced(None, Some(dec!(5)), Some(1)),
            priced(Some(dec!(9)), None, Some(1)),
            priced(Some(dec!(9)), Some(dec!(5)), None),
        ] {
            assert_matches!(
                product_shape(false, 0, pricing),
                Err(ServiceError::UnprocessableEntity(_))
            );
        }
        let full = priced(Some(dec!(9)), Some(dec!(5)), Some(1));
        assert_eq!(product_shape(false, 3, full).unwrap(), full);
    }
}
