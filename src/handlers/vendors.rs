use axum::{
    extract::State,
    response::Response,
    routing::{get, post},
    Router,
};

use super::common::{created_response, success_response, validate_input, ApiJson, ApiPath};
use crate::{
    auth::ForwardedAuth,
    dto::vendor::{CreateVendorRequest, UpdateVendorRequest, VendorResponse},
    errors::ApiError,
    handlers::AppState,
    ApiResponse,
};

/// List the vendors of a school
#[utoipa::path(
    get,
    path = "/api/vendors/school/{school_id}",
    params(("school_id" = i32, Path, description = "School ID")),
    responses(
        (status = 200, description = "Vendors retrieved", body = ApiResponse<Vec<VendorResponse>>)
    ),
    tag = "vendors"
)]
pub async fn list_vendors(
    State(state): State<AppState>,
    ApiPath(school_id): ApiPath<i32>,
) -> Result<Response, ApiError> {
    let vendors = state.services.vendors.list_by_school(school_id).await?;
    Ok(success_response("Vendors retrieved", vendors))
}

/// Get a vendor by ID
#[utoipa::path(
    get,
    path = "/api/vendors/{id}",
    params(("id" = i32, Path, description = "Vendor ID")),
    responses(
        (status = 200, description = "Vendor retrieved", body = ApiResponse<VendorResponse>),
        (status = 404, description = "Vendor not found")
    ),
    tag = "vendors"
)]
pub async fn get_vendor(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Response, ApiError> {
    let vendor = state.services.vendors.get(id).await?;
    Ok(success_response("Vendor retrieved", vendor))
}

/// Register a vendor
#[utoipa::path(
    post,
    path = "/api/vendors",
    request_body = CreateVendorRequest,
    responses(
        (status = 201, description = "Vendor created", body = ApiResponse<VendorResponse>),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Admin validation failed"),
        (status = 409, description = "Vendor already exists")
    ),
    tag = "vendors"
)]
pub async fn create_vendor(
    State(state): State<AppState>,
    auth: ForwardedAuth,
    ApiJson(payload): ApiJson<CreateVendorRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;
    let vendor = state.services.vendors.create(payload, auth.header()).await?;
    Ok(created_response("Vendor created", vendor))
}

/// Update a vendor
#[utoipa::path(
    put,
    path = "/api/vendors/{id}",
    params(("id" = i32, Path, description = "Vendor ID")),
    request_body = UpdateVendorRequest,
    responses(
        (status = 200, description = "Vendor updated", body = ApiResponse<VendorResponse>),
        (status = 404, description = "Vendor not found"),
        (status = 409, description = "Vendor name already exists")
    ),
    tag = "vendors"
)]
pub async fn update_vendor(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    auth: ForwardedAuth,
    ApiJson(payload): ApiJson<UpdateVendorRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;
    let vendor = state
        .services
        .vendors
        .update(id, payload, auth.header())
        .await?;
    Ok(success_response("Vendor updated", vendor))
}

/// Delete a vendor
#[utoipa::path(
    delete,
    path = "/api/vendors/{id}",
    params(("id" = i32, Path, description = "Vendor ID")),
    responses(
        (status = 200, description = "Vendor deleted", body = ApiResponse<bool>),
        (status = 404, description = "Vendor not found"),
        (status = 409, description = "Vendor has purchase orders")
    ),
    tag = "vendors"
)]
pub async fn delete_vendor(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    auth: ForwardedAuth,
) -> Result<Response, ApiError> {
    state.services.vendors.delete(id, auth.header()).await?;
    Ok(success_response("Vendor deleted", true))
}

pub fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_vendor))
        .route("/school/:school_id", get(list_vendors))
        .route(
            "/:id",
            get(get_vendor).put(update_vendor).delete(delete_vendor),
        )
}
