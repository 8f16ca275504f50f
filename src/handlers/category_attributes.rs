use axum::{
    extract::State,
    response::Response,
    routing::{get, post},
    Router,
};

use super::common::{created_response, success_response, validate_input, ApiJson, ApiPath};
use crate::{
    auth::ForwardedAuth,
    dto::category_attribute::{
        CategoryAttributeResponse, CreateCategoryAttributeRequest, UpdateCategoryAttributeRequest,
    },
    errors::ApiError,
    handlers::AppState,
    ApiResponse,
};

/// List the attributes of a school
#[utoipa::path(
    get,
    path = "/api/category-attributes/school/{school_id}",
    params(("school_id" = i32, Path, description = "School ID")),
    responses(
        (status = 200, description = "Attributes retrieved", body = ApiResponse<Vec<CategoryAttributeResponse>>)
    ),
    tag = "category-attributes"
)]
pub async fn list_attributes(
    State(state): State<AppState>,
    ApiPath(school_id): ApiPath<i32>,
) -> Result<Response, ApiError> {
    let attributes = state
        .services
        .category_attributes
        .list_by_school(school_id)
        .await?;
    Ok(success_response("Attributes retrieved", attributes))
}

/// Get an attribute by ID
#[utoipa::path(
    get,
    path = "/api/category-attributes/{id}",
    params(("id" = i32, Path, description = "Attribute ID")),
    responses(
        (status = 200, description = "Attribute retrieved", body = ApiResponse<CategoryAttributeResponse>),
        (status = 404, description = "Attribute not found")
    ),
    tag = "category-attributes"
)]
pub async fn get_attribute(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Response, ApiError> {
    let attribute = state.services.category_attributes.get(id).await?;
    Ok(success_response("Attribute retrieved", attribute))
}

/// Create an attribute
#[utoipa::path(
    post,
    path = "/api/category-attributes",
    request_body = CreateCategoryAttributeRequest,
    responses(
        (status = 201, description = "Attribute created", body = ApiResponse<CategoryAttributeResponse>),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Admin validation failed"),
        (status = 409, description = "Attribute already exists")
    ),
    tag = "category-attributes"
)]
pub async fn create_attribute(
    State(state): State<AppState>,
    auth: ForwardedAuth,
    ApiJson(payload): ApiJson<CreateCategoryAttributeRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;
    let attribute = state
        .services
        .category_attributes
        .create(payload, auth.header())
        .await?;
    Ok(created_response("Attribute created", attribute))
}

/// Update an attribute
#[utoipa::path(
    put,
    path = "/api/category-attributes/{id}",
    params(("id" = i32, Path, description = "Attribute ID")),
    request_body = UpdateCategoryAttributeRequest,
    responses(
        (status = 200, description = "Attribute updated", body = ApiResponse<CategoryAttributeResponse>),
        (status = 404, description = "Attribute not found"),
        (status = 409, description = "Attribute name already exists")
    ),
    tag = "category-attributes"
)]
pub async fn update_attribute(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    auth: ForwardedAuth,
    ApiJson(payload): ApiJson<UpdateCategoryAttributeRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;
    let attribute = state
        .services
        .category_attributes
        .update(id, payload, auth.header())
        .await?;
    Ok(success_response("Attribute updated", attribute))
}

/// Delete an attribute
#[utoipa::path(
    delete,
    path = "/api/category-attributes/{id}",
    params(("id" = i32, Path, description = "Attribute ID")),
    responses(
        (status = 200, description = "Attribute deleted", body = ApiResponse<bool>),
        (status = 404, description = "Attribute not found"),
        (status = 409, description = "Attribute is in use")
    ),
    tag = "category-attributes"
)]
pub async fn delete_attribute(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    auth: ForwardedAuth,
) -> Result<Response, ApiError> {
    state
        .services
        .category_attributes
        .delete(id, auth.header())
        .await?;
    Ok(success_response("Attribute deleted", true))
}

pub fn category_attribute_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_attribute))
        .route("/school/:school_id", get(list_attributes))
        .route(
            "/:id",
            get(get_attribute)
                .put(update_attribute)
                .delete(delete_attribute),
        )
}
