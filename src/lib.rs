//! eStore API Library
//!
//! Per-school catalog, vendor registry and purchase-order reconciliation
//! served over HTTP.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod dto;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod storage;
pub mod tracing;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, StatusCode},
    middleware,
    routing::get,
    Router,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::{path::Path, sync::Arc};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
};
use utoipa::ToSchema;

use crate::config::AppConfig;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<AppConfig>,
    pub services: handlers::AppServices,
}

/// Envelope shared by every JSON response, success or failure.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
    pub status_code: u16,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            status_code: status.as_u16(),
            errors: Vec::new(),
            request_id: request_id(),
        }
    }

    pub fn failure(status: StatusCode, message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: message.into(),
            status_code: status.as_u16(),
            errors,
            request_id: request_id(),
        }
    }
}

fn request_id() -> Option<String> {
    crate::tracing::current_request_id().map(|rid| rid.as_str().to_string())
}

/// Resource routers mounted under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/categories", handlers::categories::category_routes())
        .nest(
            "/category-attributes",
            handlers::category_attributes::category_attribute_routes(),
        )
        .nest("/products", handlers::products::product_routes())
        .nest("/vendors", handlers::vendors::vendor_routes())
        .nest("/purchases", handlers::purchases::purchase_routes())
}

/// Explicit origins when configured, otherwise any origin.
pub fn cors_layer(cfg: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .cors_origins()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        ::tracing::info!("no CORS origins configured; allowing any origin");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Full application router: health, API, uploaded files and Swagger UI.
pub fn app_router(state: AppState) -> Router {
    let uploads = Path::new(&state.config.static_root).join(storage::UPLOADS_DIR);
    let body_limit = state.config.max_upload_bytes;
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api", api_routes())
        .nest_service("/uploads", ServeDir::new(uploads))
        .merge(openapi::swagger_ui())
        .layer(DefaultBodyLimit::max(body_limit))
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        .layer(CompressionLayer::new())
        .layer(cors)
        // Ensure every request carries a request id for traceability
        .layer(middleware::from_fn(crate::tracing::request_id_middleware))
        .with_state(state)
}
