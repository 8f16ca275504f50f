#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use estore_api::{
    auth::{AdminDenial, AdminValidator},
    config::AppConfig,
    db,
    handlers::AppServices,
    storage::ImageStore,
    AppState,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_AUTHORIZATION: &str = "Bearer test-token";
const BOUNDARY: &str = "estore-test-boundary";

/// One call received by [`StubAdmin`].
#[derive(Debug, Clone, PartialEq)]
pub struct AdminCall {
    pub admin_id: Uuid,
    pub school_id: i32,
    pub authorization: Option<String>,
}

/// Admin validator that accepts everyone until told to deny.
#[derive(Debug, Default)]
pub struct StubAdmin {
    denial: Mutex<Option<AdminDenial>>,
    calls: Mutex<Vec<AdminCall>>,
}

#[async_trait]
impl AdminValidator for StubAdmin {
    async fn validate(
        &self,
        admin_id: Uuid,
        school_id: i32,
        authorization: Option<String>,
    ) -> Result<(), AdminDenial> {
        self.calls.lock().unwrap().push(AdminCall {
            admin_id,
            school_id,
            authorization,
        });
        match self.denial.lock().unwrap().clone() {
            Some(denial) => Err(denial),
            None => Ok(()),
        }
    }
}

/// A file part for [`TestApp::multipart`].
pub struct FilePart<'a> {
    pub field: &'a str,
    pub file_name: &'a str,
    pub bytes: &'a [u8],
}

/// Router over a migrated SQLite file and a scratch static root, both
/// inside a temp dir that lives as long as the app.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub admin: Arc<StubAdmin>,
    pub static_root: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let db_path = dir.path().join("estore_test.db");
        let static_root = dir.path().join("wwwroot");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        cfg.static_root = static_root.to_string_lossy().into_owned();

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let admin = Arc::new(StubAdmin::default());
        let services = AppServices::new(
            db_arc.clone(),
            admin.clone(),
            ImageStore::new(static_root.clone()),
        );
        let state = AppState {
            db: db_arc,
            config: Arc::new(cfg),
            services,
        };

        Self {
            router: estore_api::app_router(state.clone()),
            state,
            admin,
            static_root,
            _dir: dir,
        }
    }

    pub fn deny(&self, denial: AdminDenial) {
        *self.admin.denial.lock().unwrap() = Some(denial);
    }

    pub fn allow(&self) {
        *self.admin.denial.lock().unwrap() = None;
    }

    pub fn admin_calls(&self) -> Vec<AdminCall> {
        self.admin.calls.lock().unwrap().clone()
    }

    /// On-disk location of a `/uploads/...` URL.
    pub fn file_for(&self, url: &str) -> PathBuf {
        self.static_root.join(url.trim_start_matches('/'))
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// JSON request carrying the test `Authorization` header.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", TEST_AUTHORIZATION);

        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(serde_json::to_vec(&json).expect("serialize json body"))
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).expect("build request")).await
    }

    /// Multipart request with a JSON `payload` part followed by `files`.
    pub async fn multipart(
        &self,
        method: Method,
        uri: &str,
        payload: &Value,
        files: &[FilePart<'_>],
    ) -> Response {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"payload\"\r\nContent-Type: application/json\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(payload.to_string().as_bytes());
        body.extend_from_slice(b"\r\n");
        for file in files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                    file.field, file.file_name
                )
                .as_bytes(),
            );
            body.extend_from_slice(file.bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", TEST_AUTHORIZATION)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("build multipart request");
        self.send(request).await
    }

    pub async fn create_attribute(&self, school_id: i32, name: &str, values: &[&str]) -> Value {
        let response = self
            .request(
                Method::POST,
                "/api/category-attributes",
                Some(json!({
                    "attributeName": name,
                    "values": values,
                    "schoolId": school_id,
                    "adminId": Uuid::new_v4(),
                })),
            )
            .await;
        expect_data(response, StatusCode::CREATED).await
    }

    pub async fn create_category(&self, school_id: i32, name: &str, attribute_ids: &[i64]) -> Value {
        let payload = json!({
            "schoolId": school_id,
            "adminId": Uuid::new_v4(),
            "name": name,
            "attributeIds": attribute_ids,
        });
        let response = self
            .multipart(Method::POST, "/api/categories", &payload, &[])
            .await;
        expect_data(response, StatusCode::CREATED).await
    }

    /// Simple (variant-less) product.
    pub async fn create_product(&self, school_id: i32, category_id: i64, name: &str) -> Value {
        let payload = json!({
            "name": name,
            "schoolId": school_id,
            "adminId": Uuid::new_v4(),
            "categoryId": category_id,
            "hasVariants": false,
            "mrp": "120.00",
            "purchasePrice": "80.00",
            "quantity": 10,
            "reorderLevel": 2,
        });
        let response = self
            .multipart(Method::POST, "/api/products", &payload, &[])
            .await;
        expect_data(response, StatusCode::CREATED).await
    }

    pub async fn create_vendor(&self, school_id: i32, company_name: &str) -> Value {
        let response = self
            .request(
                Method::POST,
                "/api/vendors",
                Some(vendor_payload(school_id, company_name)),
            )
            .await;
        expect_data(response, StatusCode::CREATED).await
    }
}

pub fn vendor_payload(school_id: i32, company_name: &str) -> Value {
    json!({
        "schoolId": school_id,
        "adminId": Uuid::new_v4(),
        "companyName": company_name,
        "gstNumber": "29ABCDE1234F1Z5",
        "contactPerson": "R. Rao",
        "phone": "9876543210",
        "email": "sales@example.com",
        "address": "12 Market Road",
        "productsSupplied": "Uniforms",
    })
}

/// Status plus decoded envelope.
pub async fn response_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Asserts the status and a successful envelope, returning `data`.
pub async fn expect_data(response: Response, expected: StatusCode) -> Value {
    let (status, body) = response_json(response).await;
    assert_eq!(status, expected, "unexpected status, body: {}", body);
    assert_eq!(body["success"], true, "body: {}", body);
    assert_eq!(body["statusCode"], expected.as_u16());
    body["data"].clone()
}

/// Asserts a failure envelope with the given status, returning the message.
pub async fn expect_error(response: Response, expected: StatusCode) -> String {
    let (status, body) = response_json(response).await;
    assert_eq!(status, expected, "unexpected status, body: {}", body);
    assert_eq!(body["success"], false, "body: {}", body);
    assert_eq!(body["statusCode"], expected.as_u16());
    assert!(body["data"].is_null());
    body["message"].as_str().unwrap_or_default().to_string()
}
