use axum::{
    extract::State,
    response::Response,
    routing::{delete, get, post},
    Router,
};

use super::common::{
    created_response, success_response, validate_input, ApiJson, ApiPath, ApiQuery,
};
use crate::{
    auth::ForwardedAuth,
    dto::purchase::{
        ActingAdminQuery, CancelPurchaseRequest, CreatePurchaseRequest, InvoiceEntryResponse,
        PurchaseResponse, RecordInvoiceEntryRequest,
    },
    errors::ApiError,
    handlers::AppState,
    ApiResponse,
};

/// List the purchase orders of a school, newest first
#[utoipa::path(
    get,
    path = "/api/purchases/school/{school_id}",
    params(("school_id" = i32, Path, description = "School ID")),
    responses(
        (status = 200, description = "Purchase orders retrieved", body = ApiResponse<Vec<PurchaseResponse>>)
    ),
    tag = "purchases"
)]
pub async fn list_purchases(
    State(state): State<AppState>,
    ApiPath(school_id): ApiPath<i32>,
) -> Result<Response, ApiError> {
    let purchases = state.services.purchases.list_by_school(school_id).await?;
    Ok(success_response("Purchase orders retrieved", purchases))
}

/// Get a purchase order with its items
#[utoipa::path(
    get,
    path = "/api/purchases/{id}",
    params(("id" = i32, Path, description = "Purchase order ID")),
    responses(
        (status = 200, description = "Purchase order retrieved", body = ApiResponse<PurchaseResponse>),
        (status = 404, description = "Purchase order not found")
    ),
    tag = "purchases"
)]
pub async fn get_purchase(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Response, ApiError> {
    let purchase = state.services.purchases.get(id).await?;
    Ok(success_response("Purchase order retrieved", purchase))
}

/// Raise a purchase order against a vendor
#[utoipa::path(
    post,
    path = "/api/purchases",
    request_body = CreatePurchaseRequest,
    responses(
        (status = 201, description = "Purchase order created", body = ApiResponse<PurchaseResponse>),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Admin validation failed"),
        (status = 404, description = "Vendor or product not found"),
        (status = 422, description = "Variant does not belong to product")
    ),
    tag = "purchases"
)]
pub async fn create_purchase(
    State(state): State<AppState>,
    auth: ForwardedAuth,
    ApiJson(payload): ApiJson<CreatePurchaseRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;
    let purchase = state
        .services
        .purchases
        .create(payload, auth.header())
        .await?;
    Ok(created_response("Purchase order created", purchase))
}

/// Cancel a pending purchase order
#[utoipa::path(
    post,
    path = "/api/purchases/{id}/cancel",
    params(("id" = i32, Path, description = "Purchase order ID")),
    request_body = CancelPurchaseRequest,
    responses(
        (status = 200, description = "Purchase order cancelled", body = ApiResponse<PurchaseResponse>),
        (status = 404, description = "Purchase order not found"),
        (status = 422, description = "Purchase order is not pending")
    ),
    tag = "purchases"
)]
pub async fn cancel_purchase(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    auth: ForwardedAuth,
    ApiJson(payload): ApiJson<CancelPurchaseRequest>,
) -> Result<Response, ApiError> {
    let purchase = state
        .services
        .purchases
        .cancel(id, payload.admin_id, auth.header())
        .await?;
    Ok(success_response("Purchase order cancelled", purchase))
}

/// Delete a purchase order; its invoice entries are kept for audit
#[utoipa::path(
    delete,
    path = "/api/purchases/{id}",
    params(
        ("id" = i32, Path, description = "Purchase order ID"),
        ActingAdminQuery
    ),
    responses(
        (status = 200, description = "Purchase order deleted", body = ApiResponse<bool>),
        (status = 404, description = "Purchase order not found")
    ),
    tag = "purchases"
)]
pub async fn delete_purchase(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiQuery(query): ApiQuery<ActingAdminQuery>,
    auth: ForwardedAuth,
) -> Result<Response, ApiError> {
    state
        .services
        .purchases
        .delete(id, query.admin_id, auth.header())
        .await?;
    Ok(success_response("Purchase order deleted", true))
}

/// Delete one line item and recompute the order
#[utoipa::path(
    delete,
    path = "/api/purchases/{id}/items/{item_id}",
    params(
        ("id" = i32, Path, description = "Purchase order ID"),
        ("item_id" = i32, Path, description = "Purchase item ID"),
        ActingAdminQuery
    ),
    responses(
        (status = 200, description = "Purchase item deleted", body = ApiResponse<PurchaseResponse>),
        (status = 404, description = "Purchase order or item not found")
    ),
    tag = "purchases"
)]
pub async fn delete_purchase_item(
    State(state): State<AppState>,
    ApiPath((id, item_id)): ApiPath<(i32, i32)>,
    ApiQuery(query): ApiQuery<ActingAdminQuery>,
    auth: ForwardedAuth,
) -> Result<Response, ApiError> {
    let purchase = state
        .services
        .purchases
        .delete_item(id, item_id, query.admin_id, auth.header())
        .await?;
    Ok(success_response("Purchase item deleted", purchase))
}

/// List the invoice entries recorded against a purchase order
#[utoipa::path(
    get,
    path = "/api/purchases/{id}/invoice-entries",
    params(("id" = i32, Path, description = "Purchase order ID")),
    responses(
        (status = 200, description = "Invoice entries retrieved", body = ApiResponse<Vec<InvoiceEntryResponse>>)
    ),
    tag = "purchases"
)]
pub async fn list_invoice_entries(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Response, ApiError> {
    let entries = state.services.purchases.list_invoice_entries(id).await?;
    Ok(success_response("Invoice entries retrieved", entries))
}

/// Record a delivery with its invoice against one line item
#[utoipa::path(
    post,
    path = "/api/purchases/{id}/invoice-entries",
    params(("id" = i32, Path, description = "Purchase order ID")),
    request_body = RecordInvoiceEntryRequest,
    responses(
        (status = 201, description = "Invoice entry recorded", body = ApiResponse<InvoiceEntryResponse>),
        (status = 404, description = "Purchase order or item not found"),
        (status = 422, description = "Order closed or quantity exceeds outstanding")
    ),
    tag = "purchases"
)]
pub async fn record_invoice_entry(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    auth: ForwardedAuth,
    ApiJson(payload): ApiJson<RecordInvoiceEntryRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;
    let entry = state
        .services
        .purchases
        .record_invoice_entry(id, payload, auth.header())
        .await?;
    Ok(created_response("Invoice entry recorded", entry))
}

pub fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_purchase))
        .route("/school/:school_id", get(list_purchases))
        .route("/:id", get(get_purchase).delete(delete_purchase))
        .route("/:id/cancel", post(cancel_purchase))
        .route("/:id/items/:item_id", delete(delete_purchase_item))
        .route(
            "/:id/invoice-entries",
            get(list_invoice_entries).post(record_invoice_entry),
        )
}
