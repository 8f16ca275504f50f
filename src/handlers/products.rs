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
    dto::product::{CreateProductRequest, ProductResponse, UpdateProductRequest},
    errors::ApiError,
    handlers::AppState,
    ApiResponse,
};

const IMAGES_FIELD: &str = "images";

/// List the products of a school, newest first
#[utoipa::path(
    get,
    path = "/api/products/school/{school_id}",
    params(("school_id" = i32, Path, description = "School ID")),
    responses(
        (status = 200, description = "Products retrieved", body = ApiResponse<Vec<ProductResponse>>)
    ),
    tag = "products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    ApiPath(school_id): ApiPath<i32>,
) -> Result<Response, ApiError> {
    let products = state.services.products.list_by_school(school_id).await?;
    Ok(success_response("Products retrieved", products))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product retrieved", body = ApiResponse<ProductResponse>),
        (status = 404, description = "Product not found")
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Response, ApiError> {
    let product = state.services.products.get(id).await?;
    Ok(success_response("Product retrieved", product))
}

/// Create a product with its variants and images
#[utoipa::path(
    post,
    path = "/api/products",
    request_body(
        content = String,
        content_type = "multipart/form-data",
        description = "`payload`: CreateProductRequest as JSON; `images`: zero or more files"
    ),
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Admin validation failed"),
        (status = 404, description = "Category not found"),
        (status = 422, description = "Invalid variant layout or attribute ids")
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    auth: ForwardedAuth,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let form = read_multipart::<CreateProductRequest>(multipart?, &[IMAGES_FIELD]).await?;
    validate_input(&form.payload)?;

    let product = state
        .services
        .products
        .create(form.payload, form.files, auth.header())
        .await?;
    Ok(created_response("Product created", product))
}

/// Update a product, reconciling variants and images
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = i32, Path, description = "Product ID")),
    request_body(
        content = String,
        content_type = "multipart/form-data",
        description = "`payload`: UpdateProductRequest as JSON; `images`: files to add"
    ),
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ProductResponse>),
        (status = 404, description = "Product not found"),
        (status = 422, description = "Invalid variant layout")
    ),
    tag = "products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    auth: ForwardedAuth,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let form = read_multipart::<UpdateProductRequest>(multipart?, &[IMAGES_FIELD]).await?;
    validate_input(&form.payload)?;

    let product = state
        .services
        .products
        .update(id, form.payload, form.files, auth.header())
        .await?;
    Ok(success_response("Product updated", product))
}

/// Delete a product together with its variants and image folder
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted", body = ApiResponse<bool>),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Product is on purchase orders")
    ),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    auth: ForwardedAuth,
) -> Result<Response, ApiError> {
    state.services.products.delete(id, auth.header()).await?;
    Ok(success_response("Product deleted", true))
}

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_product))
        .route("/school/:school_id", get(list_products))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}
