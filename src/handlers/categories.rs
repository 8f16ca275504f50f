use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    response::Response,
    routing::{get, post},
    Router,
};

use super::common::{
    created_response, read_multipart, success_response, validate_input, ApiPath,
};
use crate::{
    auth::ForwardedAuth,
    dto::category::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest},
    errors::ApiError,
    handlers::AppState,
    ApiResponse,
};

const IMAGE_FIELD: &str = "image";

/// List the categories of a school
#[utoipa::path(
    get,
    path = "/api/categories/school/{school_id}",
    params(("school_id" = i32, Path, description = "School ID")),
    responses(
        (status = 200, description = "Categories retrieved", body = ApiResponse<Vec<CategoryResponse>>)
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    ApiPath(school_id): ApiPath<i32>,
) -> Result<Response, ApiError> {
    let categories = state.services.categories.list_by_school(school_id).await?;
    Ok(success_response("Categories retrieved", categories))
}

/// Get a category by ID
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category retrieved", body = ApiResponse<CategoryResponse>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Response, ApiError> {
    let category = state.services.categories.get(id).await?;
    Ok(success_response("Category retrieved", category))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body(
        content = String,
        content_type = "multipart/form-data",
        description = "`payload`: CreateCategoryRequest as JSON; `image`: optional file"
    ),
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponse>),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Admin validation failed"),
        (status = 409, description = "Category already exists"),
        (status = 422, description = "Invalid size settings or attribute ids")
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    auth: ForwardedAuth,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let form = read_multipart::<CreateCategoryRequest>(multipart?, &[IMAGE_FIELD]).await?;
    validate_input(&form.payload)?;

    let image = form.files.into_iter().next();
    let category = state
        .services
        .categories
        .create(form.payload, image, auth.header())
        .await?;
    Ok(created_response("Category created", category))
}

/// Update a category
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category ID")),
    request_body(
        content = String,
        content_type = "multipart/form-data",
        description = "`payload`: UpdateCategoryRequest as JSON; `image`: optional replacement file"
    ),
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryResponse>),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category name already exists")
    ),
    tag = "categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    auth: ForwardedAuth,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let form = read_multipart::<UpdateCategoryRequest>(multipart?, &[IMAGE_FIELD]).await?;
    validate_input(&form.payload)?;

    let image = form.files.into_iter().next();
    let category = state
        .services
        .categories
        .update(id, form.payload, image, auth.header())
        .await?;
    Ok(success_response("Category updated", category))
}

/// Delete a category
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted", body = ApiResponse<bool>),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category has products")
    ),
    tag = "categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    auth: ForwardedAuth,
) -> Result<Response, ApiError> {
    state.services.categories.delete(id, auth.header()).await?;
    Ok(success_response("Category deleted", true))
}

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_category))
        .route("/school/:school_id", get(list_categories))
        .route(
            "/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
}
