use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    codes::{next_code, PURCHASE_ORDER_PREFIX},
    ensure_admin,
};
use crate::{
    auth::AdminValidator,
    dto::MAX_AMOUNT,
    dto::purchase::{
        CreatePurchaseRequest, InvoiceEntryResponse, PurchaseItemResponse, PurchaseResponse,
        RecordInvoiceEntryRequest,
    },
    entities::{
        product, product_variant,
        purchase::{self, Entity as Purchase, PurchaseStatus},
        purchase_invoice_entry as invoice_entry, purchase_item, vendor,
    },
    errors::ServiceError,
};

const NOT_FOUND: &str = "Purchase order not found";

fn too_large() -> ServiceError {
    ServiceError::UnprocessableEntity("Purchase amount is too large".to_string())
}

fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> Result<Decimal, ServiceError> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
        .filter(|total| *total <= MAX_AMOUNT)
        .ok_or_else(too_large)
}

/// Price times quantity, refusing anything the amount columns cannot hold.
pub fn line_total(unit_price: Decimal, quantity: i32) -> Result<Decimal, ServiceError> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .filter(|total| *total <= MAX_AMOUNT)
        .ok_or_else(too_large)
}

/// Sum of line totals.
pub fn order_total(items: &[purchase_item::Model]) -> Result<Decimal, ServiceError> {
    checked_sum(items.iter().map(|i| i.total_cost))
}

fn receipts(items: &[purchase_item::Model]) -> Vec<(i32, i32)> {
    items
        .iter()
        .map(|i| (i.quantity_ordered, i.quantity_received))
        .collect()
}

async fn next_order_number<C: ConnectionTrait>(conn: &C, school_id: i32) -> Result<String, ServiceError> {
    let last = Purchase::find()
        .filter(purchase::Column::SchoolId.eq(school_id))
        .order_by_desc(purchase::Column::Id)
        .one(conn)
        .await?;
    Ok(next_code(
        PURCHASE_ORDER_PREFIX,
        last.as_ref().map(|p| p.purchase_order_number.as_str()),
    ))
}

async fn items_of<C: ConnectionTrait>(
    conn: &C,
    purchase_id: i32,
) -> Result<Vec<purchase_item::Model>, ServiceError> {
    Ok(purchase_item::Entity::find()
        .filter(purchase_item::Column::PurchaseId.eq(purchase_id))
        .order_by_asc(purchase_item::Column::Id)
        .all(conn)
        .await?)
}

/// Purchases with their items; product names come from one batched lookup.
async fn present<C: ConnectionTrait>(
    conn: &C,
    purchases: Vec<purchase::Model>,
) -> Result<Vec<PurchaseResponse>, ServiceError> {
    if purchases.is_empty() {
        return Ok(Vec::new());
    }
    let purchase_ids: Vec<i32> = purchases.iter().map(|p| p.id).collect();
    let items = purchase_item::Entity::find()
        .filter(purchase_item::Column::PurchaseId.is_in(purchase_ids))
        .order_by_asc(purchase_item::Column::Id)
        .all(conn)
        .await?;

    let product_ids: BTreeSet<i32> = items.iter().map(|i| i.product_id).collect();
    let product_names: HashMap<i32, String> = if product_ids.is_empty() {
        HashMap::new()
    } else {
        product::Entity::find()
            .filter(product::Column::Id.is_in(product_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect()
    };

    let mut by_purchase: HashMap<i32, Vec<PurchaseItemResponse>> = HashMap::new();
    for item in items {
        let name = product_names.get(&item.product_id).cloned().unwrap_or_default();
        by_purchase
            .entry(item.purchase_id)
            .or_default()
            .push(PurchaseItemResponse::new(item, name));
    }

    Ok(purchases
        .into_iter()
        .map(|p| {
            let items = by_purchase.remove(&p.id).unwrap_or_default();
            PurchaseResponse::new(p, items)
        })
        .collect())
}

/// Purchase orders and their receipt reconciliation.
///
/// For every line the sum of its invoice-entry quantities equals its
/// `quantity_received`, which never exceeds `quantity_ordered`. Invoice
/// entries outlive their purchase order.
pub struct PurchaseService {
    db: Arc<DatabaseConnection>,
    admin: Arc<dyn AdminValidator>,
}

impl PurchaseService {
    pub fn new(db: Arc<DatabaseConnection>, admin: Arc<dyn AdminValidator>) -> Self {
        Self { db, admin }
    }

    async fn find(&self, id: i32) -> Result<purchase::Model, ServiceError> {
        Purchase::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.to_string()))
    }

    async fn respond(&self, model: purchase::Model) -> Result<PurchaseResponse, ServiceError> {
        present(&*self.db, vec![model])
            .await?
            .pop()
            .ok_or_else(|| ServiceError::InternalError("purchase vanished".to_string()))
    }

    /// Purchase orders of a school, newest first.
    #[instrument(skip(self))]
    pub async fn list_by_school(&self, school_id: i32) -> Result<Vec<PurchaseResponse>, ServiceError> {
        let purchases = Purchase::find()
            .filter(purchase::Column::SchoolId.eq(school_id))
            .order_by_desc(purchase::Column::Id)
            .all(&*self.db)
            .await?;
        present(&*self.db, purchases).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<PurchaseResponse, ServiceError> {
        let model = self.find(id).await?;
        self.respond(model).await
    }

    #[instrument(skip(self, dto, authorization), fields(school_id = dto.school_id, vendor_id = dto.vendor_id))]
    pub async fn create(
        &self,
        dto: CreatePurchaseRequest,
        authorization: Option<String>,
    ) -> Result<PurchaseResponse, ServiceError> {
        ensure_admin(&*self.admin, dto.admin_id, dto.school_id, authorization).await?;

        vendor::Entity::find_by_id(dto.vendor_id)
            .filter(vendor::Column::SchoolId.eq(dto.school_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Vendor not found".to_string()))?;

        let product_ids: BTreeSet<i32> = dto.products.iter().map(|l| l.product_id).collect();
        let known: BTreeSet<i32> = product::Entity::find()
            .filter(product::Column::Id.is_in(product_ids.iter().copied()))
            .filter(product::Column::SchoolId.eq(dto.school_id))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();
        if let Some(missing) = product_ids.difference(&known).next() {
            return Err(ServiceError::NotFound(format!("Product {} not found", missing)));
        }

        let variant_ids: BTreeSet<i32> = dto.products.iter().filter_map(|l| l.variant_id).collect();
        if !variant_ids.is_empty() {
            let owners: HashMap<i32, i32> = product_variant::Entity::find()
                .filter(product_variant::Column::Id.is_in(variant_ids))
                .all(&*self.db)
                .await?
                .into_iter()
                .map(|v| (v.id, v.product_id))
                .collect();
            for line in &dto.products {
                if let Some(variant_id) = line.variant_id {
                    if owners.get(&variant_id) != Some(&line.product_id) {
                        return Err(ServiceError::UnprocessableEntity(format!(
                            "Variant {} does not belong to product {}",
                            variant_id, line.product_id
                        )));
                    }
                }
            }
        }

        let line_totals = dto
            .products
            .iter()
            .map(|l| line_total(l.purchase_price_per_unit, l.quantity))
            .collect::<Result<Vec<_>, _>>()?;
        let total_amount = checked_sum(line_totals.iter().copied())?;

        let txn = self.db.begin().await?;
        let number = next_order_number(&txn, dto.school_id).await?;
        let now = Utc::now();
        let model = purchase::ActiveModel {
            school_id: Set(dto.school_id),
            admin_id: Set(dto.admin_id),
            vendor_id: Set(dto.vendor_id),
            purchase_order_number: Set(number),
            purchase_date: Set(now),
            status: Set(PurchaseStatus::Pending),
            total_amount: Set(total_amount),
            remarks: Set(dto.remarks.clone()),
            is_active: Set(true),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| ServiceError::conflict_on_unique(e, "Purchase order number already exists"))?;

        purchase_item::Entity::insert_many(dto.products.iter().zip(line_totals).map(|(line, total)| {
            purchase_item::ActiveModel {
                purchase_id: Set(model.id),
                product_id: Set(line.product_id),
                variant_id: Set(line.variant_id),
                quantity_ordered: Set(line.quantity),
                unit_cost: Set(line.purchase_price_per_unit),
                total_cost: Set(total),
                quantity_received: Set(0),
                remarks: Set(line.remarks.clone()),
                ..Default::default()
            }
        }))
        .exec(&txn)
        .await?;
        txn.commit().await?;

        info!(
            purchase_id = model.id,
            number = %model.purchase_order_number,
            lines = dto.products.len(),
            "purchase order created"
        );
        self.respond(model).await
    }

    /// Records a delivery against one line, bumps its running received
    /// quantity and moves the order status along. One transaction.
    #[instrument(skip(self, dto, authorization), fields(item_id = dto.purchase_item_id))]
    pub async fn record_invoice_entry(
        &self,
        purchase_id: i32,
        dto: RecordInvoiceEntryRequest,
        authorization: Option<String>,
    ) -> Result<InvoiceEntryResponse, ServiceError> {
        let order = self.find(purchase_id).await?;
        ensure_admin(&*self.admin, dto.admin_id, order.school_id, authorization).await?;

        if !order.status.accepts_receipts() {
            return Err(ServiceError::UnprocessableEntity(format!(
                "Purchase order is {} and cannot receive deliveries",
                order.status
            )));
        }

        let txn = self.db.begin().await?;
        let item = purchase_item::Entity::find_by_id(dto.purchase_item_id)
            .filter(purchase_item::Column::PurchaseId.eq(purchase_id))
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Purchase item not found".to_string()))?;

        if dto.quantity_received > item.outstanding() {
            return Err(ServiceError::UnprocessableEntity(
                "Received quantity exceeds ordered quantity".to_string(),
            ));
        }

        let entry = invoice_entry::ActiveModel {
            purchase_order_id: Set(purchase_id),
            invoice_number: Set(dto.invoice_number.trim().to_string()),
            invoice_amount: Set(dto.invoice_amount),
            invoice_date: Set(dto.invoice_date),
            due_date: Set(dto.due_date),
            purchase_item_id: Set(Some(item.id)),
            delivery_date: Set(dto.delivery_date),
            quantity_received: Set(dto.quantity_received),
            delivery_notes: Set(dto.delivery_notes),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let received = item.quantity_received + dto.quantity_received;
        let mut active_item: purchase_item::ActiveModel = item.into();
        active_item.quantity_received = Set(received);
        active_item.update(&txn).await?;

        let items = items_of(&txn, purchase_id).await?;
        let status = PurchaseStatus::from_receipts(order.status, &receipts(&items));
        if status != order.status {
            let mut active: purchase::ActiveModel = order.into();
            active.status = Set(status);
            active.update(&txn).await?;
        }
        txn.commit().await?;

        info!(purchase_id, entry_id = entry.id, %status, "invoice entry recorded");
        Ok(entry.into())
    }

    /// Invoice history of a purchase order, oldest first. Still answers after
    /// the order itself is gone.
    #[instrument(skip(self))]
    pub async fn list_invoice_entries(
        &self,
        purchase_id: i32,
    ) -> Result<Vec<InvoiceEntryResponse>, ServiceError> {
        let entries = invoice_entry::Entity::find()
            .filter(invoice_entry::Column::PurchaseOrderId.eq(purchase_id))
            .order_by_asc(invoice_entry::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(entries.into_iter().map(Into::into).collect())
    }

    /// Only orders nothing has been received against can be cancelled.
    #[instrument(skip(self, authorization))]
    pub async fn cancel(
        &self,
        purchase_id: i32,
        admin_id: Uuid,
        authorization: Option<String>,
    ) -> Result<PurchaseResponse, ServiceError> {
        let order = self.find(purchase_id).await?;
        ensure_admin(&*self.admin, admin_id, order.school_id, authorization).await?;

        if order.status != PurchaseStatus::Pending {
            return Err(ServiceError::UnprocessableEntity(format!(
                "Only pending purchase orders can be cancelled (current status: {})",
                order.status
            )));
        }

        let mut active: purchase::ActiveModel = order.into();
        active.status = Set(PurchaseStatus::Cancelled);
        let model = active.update(&*self.db).await?;
        info!(purchase_id, "purchase order cancelled");
        self.respond(model).await
    }

    /// Removes the order and its lines. Invoice entries stay, detached from
    /// their lines but still keyed by the order id.
    #[instrument(skip(self, authorization))]
    pub async fn delete(
        &self,
        purchase_id: i32,
        acting_admin: Option<Uuid>,
        authorization: Option<String>,
    ) -> Result<(), ServiceError> {
        let order = self.find(purchase_id).await?;
        ensure_admin(
            &*self.admin,
            acting_admin.unwrap_or(order.admin_id),
            order.school_id,
            authorization,
        )
        .await?;

        let txn = self.db.begin().await?;
        let item_ids: Vec<i32> = items_of(&txn, purchase_id)
            .await?
            .into_iter()
            .map(|i| i.id)
            .collect();
        if !item_ids.is_empty() {
            invoice_entry::Entity::update_many()
                .col_expr(
                    invoice_entry::Column::PurchaseItemId,
                    Expr::value(Option::<i32>::None),
                )
                .filter(invoice_entry::Column::PurchaseItemId.is_in(item_ids))
                .exec(&txn)
                .await?;
        }
        purchase_item::Entity::delete_many()
            .filter(purchase_item::Column::PurchaseId.eq(purchase_id))
            .exec(&txn)
            .await?;
        Purchase::delete_by_id(purchase_id).exec(&txn).await?;
        txn.commit().await?;

        info!(purchase_id, "purchase order deleted");
        Ok(())
    }

    /// Removes one line with its invoice history, then recomputes the order
    /// total and status from the remaining lines.
    #[instrument(skip(self, authorization))]
    pub async fn delete_item(
        &self,
        purchase_id: i32,
        item_id: i32,
        acting_admin: Option<Uuid>,
        authorization: Option<String>,
    ) -> Result<PurchaseResponse, ServiceError> {
        let order = self.find(purchase_id).await?;
        ensure_admin(
            &*self.admin,
            acting_admin.unwrap_or(order.admin_id),
            order.school_id,
            authorization,
        )
        .await?;

        let txn = self.db.begin().await?;
        purchase_item::Entity::find_by_id(item_id)
            .filter(purchase_item::Column::PurchaseId.eq(purchase_id))
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Purchase item not found".to_string()))?;

        invoice_entry::Entity::delete_many()
            .filter(invoice_entry::Column::PurchaseItemId.eq(item_id))
            .exec(&txn)
            .await?;
        purchase_item::Entity::delete_by_id(item_id).exec(&txn).await?;

        let remaining = items_of(&txn, purchase_id).await?;
        let status = PurchaseStatus::from_receipts(order.status, &receipts(&remaining));
        let mut active: purchase::ActiveModel = order.into();
        active.total_amount = Set(order_total(&remaining)?);
        active.status = Set(status);
        let model = active.update(&txn).await?;
        txn.commit().await?;

        info!(purchase_id, item_id, "purchase item deleted");
        self.respond(model).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(total: Decimal) -> purchase_item::Model {
        purchase_item::Model {
            id: 1,
            purchase_id: 1,
            product_id: 1,
            variant_id: None,
            quantity_ordered: 2,
            unit_cost: total / dec!(2),
            total_cost: total,
            quantity_received: 0,
            remarks: None,
        }
    }

    #[test]
    fn order_total_sums_line_totals() {
        assert_eq!(
            order_total(&[item(dec!(10.50)), item(dec!(4.25))]).unwrap(),
            dec!(14.75)
        );
        assert_eq!(order_total(&[]).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn oversized_amounts_are_refused_instead_of_overflowing() {
        assert_eq!(line_total(dec!(2.50), 4).unwrap(), dec!(10.00));
        assert!(matches!(
            line_total(Decimal::MAX, 2),
            Err(ServiceError::UnprocessableEntity(msg)) if msg == "Purchase amount is too large"
        ));
        assert!(line_total(MAX_AMOUNT, 2).is_err());
        assert!(order_total(&[item(MAX_AMOUNT), item(dec!(0.01))]).is_err());
        assert!(order_total(&[item(Decimal::MAX), item(Decimal::MAX)]).is_err());
    }
}
