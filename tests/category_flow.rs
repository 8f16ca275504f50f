mod common;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
};
use common::{expect_data, expect_error, response_json, FilePart, TestApp, TEST_AUTHORIZATION};
use estore_api::{auth::AdminDenial, entities::category_category_attribute as link};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn create_links_attributes_and_serves_the_image() {
    let app = TestApp::new().await;
    let size = app.create_attribute(1, "Size", &["S", "M"]).await;
    let color = app.create_attribute(1, "Color", &["Red"]).await;

    let payload = json!({
        "schoolId": 1,
        "adminId": Uuid::new_v4(),
        "name": "  Uniforms ",
        "hasSizeVariants": true,
        "sizeType": "Letter",
        "availableSizes": "S,M,L",
        "attributeIds": [size["id"], color["id"], size["id"]],
    });
    let response = app
        .multipart(
            Method::POST,
            "/api/categories",
            &payload,
            &[FilePart {
                field: "image",
                file_name: "shirt.PNG",
                bytes: b"png-bytes",
            }],
        )
        .await;
    let category = expect_data(response, StatusCode::CREATED).await;

    assert_eq!(category["name"], "Uniforms");
    assert_eq!(category["sizeType"], "Letter");
    assert_eq!(category["attributes"].as_array().unwrap().len(), 2);

    let url = category["imageUrl"].as_str().unwrap().to_string();
    assert!(url.starts_with("/uploads/categories/"));
    assert!(url.ends_with(".png"));
    assert!(app.file_for(&url).exists());

    let served = app
        .send(Request::get(url.as_str()).body(Body::empty()).unwrap())
        .await;
    assert_eq!(served.status(), StatusCode::OK);
    let bytes = to_bytes(served.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"png-bytes");
}

#[tokio::test]
async fn size_fields_are_cleared_without_size_variants() {
    let app = TestApp::new().await;
    let payload = json!({
        "schoolId": 1,
        "adminId": Uuid::new_v4(),
        "name": "Books",
        "hasSizeVariants": false,
        "sizeType": "Number",
        "availableSizes": "28,30",
    });
    let response = app
        .multipart(Method::POST, "/api/categories", &payload, &[])
        .await;
    let category = expect_data(response, StatusCode::CREATED).await;
    assert_eq!(category["sizeType"], "None");
    assert!(category["availableSizes"].is_null());
}

#[tokio::test]
async fn size_variants_require_a_size_type() {
    let app = TestApp::new().await;
    let payload = json!({
        "schoolId": 1,
        "adminId": Uuid::new_v4(),
        "name": "Shoes",
        "hasSizeVariants": true,
        "availableSizes": "6,7,8",
    });
    let response = app
        .multipart(Method::POST, "/api/categories", &payload, &[])
        .await;
    let message = expect_error(response, StatusCode::UNPROCESSABLE_ENTITY).await;
    assert_eq!(message, "SizeType is required when HasSizeVariants = true");
}

#[tokio::test]
async fn duplicate_names_conflict_within_a_school() {
    let app = TestApp::new().await;
    app.create_category(1, "Stationery", &[]).await;

    let payload = json!({"schoolId": 1, "adminId": Uuid::new_v4(), "name": "Stationery"});
    let response = app
        .multipart(Method::POST, "/api/categories", &payload, &[])
        .await;
    assert_eq!(
        expect_error(response, StatusCode::CONFLICT).await,
        "Category already exists"
    );

    app.create_category(2, "Stationery", &[]).await;
}

#[tokio::test]
async fn unknown_attribute_ids_leave_nothing_behind() {
    let app = TestApp::new().await;
    let foreign = app.create_attribute(2, "Size", &["S"]).await;

    let payload = json!({
        "schoolId": 1,
        "adminId": Uuid::new_v4(),
        "name": "Sports",
        "attributeIds": [foreign["id"], 999],
    });
    let response = app
        .multipart(Method::POST, "/api/categories", &payload, &[])
        .await;
    let message = expect_error(response, StatusCode::UNPROCESSABLE_ENTITY).await;
    assert!(message.starts_with("Invalid attribute ids for this school"));

    let listed = expect_data(
        app.request(Method::GET, "/api/categories/school/1", None).await,
        StatusCode::OK,
    )
    .await;
    assert!(listed.as_array().unwrap().is_empty());
}

async fn link_rows(app: &TestApp, category_id: i64) -> Vec<(i32, i32)> {
    link::Entity::find()
        .filter(link::Column::CategoryId.eq(category_id as i32))
        .order_by_asc(link::Column::CategoryAttributeId)
        .all(app.state.db.as_ref())
        .await
        .unwrap()
        .into_iter()
        .map(|row| (row.id, row.category_attribute_id))
        .collect()
}

#[tokio::test]
async fn repeating_an_attribute_sync_keeps_the_link_rows() {
    let app = TestApp::new().await;
    let size = app.create_attribute(1, "Size", &["S"]).await["id"].as_i64().unwrap();
    let color = app.create_attribute(1, "Color", &["Red"]).await["id"].as_i64().unwrap();
    let fabric = app.create_attribute(1, "Fabric", &["Cotton"]).await["id"].as_i64().unwrap();
    let category = app.create_category(1, "Uniforms", &[size, color]).await;
    let id = category["id"].as_i64().unwrap();
    let uri = format!("/api/categories/{}", id);

    let before = link_rows(&app, id).await;
    assert_eq!(before.len(), 2);

    let same = json!({"name": "Uniforms", "attributeIds": [color, size, color]});
    for _ in 0..2 {
        expect_data(app.multipart(Method::PUT, &uri, &same, &[]).await, StatusCode::OK).await;
        assert_eq!(link_rows(&app, id).await, before);
    }

    let swapped = json!({"name": "Uniforms", "attributeIds": [size, fabric]});
    expect_data(app.multipart(Method::PUT, &uri, &swapped, &[]).await, StatusCode::OK).await;
    let after = link_rows(&app, id).await;
    assert_eq!(after.len(), 2);
    assert_eq!(after[0], before[0], "untouched link keeps its row");
    assert_eq!(after[1].1, fabric as i32);
}

#[tokio::test]
async fn update_syncs_links_and_replaces_the_image() {
    let app = TestApp::new().await;
    let size = app.create_attribute(1, "Size", &["S"]).await;
    let color = app.create_attribute(1, "Color", &["Red"]).await;

    let create = json!({
        "schoolId": 1,
        "adminId": Uuid::new_v4(),
        "name": "Uniforms",
        "attributeIds": [size["id"]],
    });
    let created = expect_data(
        app.multipart(
            Method::POST,
            "/api/categories",
            &create,
            &[FilePart { field: "image", file_name: "a.jpg", bytes: b"old" }],
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["id"].as_i64().unwrap();
    let old_url = created["imageUrl"].as_str().unwrap().to_string();

    let update = json!({"name": "School Uniforms", "attributeIds": [color["id"]]});
    let updated = expect_data(
        app.multipart(
            Method::PUT,
            &format!("/api/categories/{}", id),
            &update,
            &[FilePart { field: "image", file_name: "b.jpg", bytes: b"new" }],
        )
        .await,
        StatusCode::OK,
    )
    .await;

    assert_eq!(updated["name"], "School Uniforms");
    let names: Vec<&str> = updated["attributes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["attributeName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Color"]);

    let new_url = updated["imageUrl"].as_str().unwrap();
    assert_ne!(new_url, old_url);
    assert!(app.file_for(new_url).exists());
    assert!(!app.file_for(&old_url).exists());

    // Omitting attributeIds keeps the current links.
    let untouched = expect_data(
        app.multipart(
            Method::PUT,
            &format!("/api/categories/{}", id),
            &json!({"name": "School Uniforms"}),
            &[],
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(untouched["attributes"].as_array().unwrap().len(), 1);
    assert_eq!(untouched["imageUrl"], updated["imageUrl"]);
}

#[tokio::test]
async fn renaming_onto_a_sibling_conflicts() {
    let app = TestApp::new().await;
    app.create_category(1, "Books", &[]).await;
    let notebooks = app.create_category(1, "Notebooks", &[]).await;

    let response = app
        .multipart(
            Method::PUT,
            &format!("/api/categories/{}", notebooks["id"]),
            &json!({"name": "Books"}),
            &[],
        )
        .await;
    assert_eq!(
        expect_error(response, StatusCode::CONFLICT).await,
        "Category name already exists"
    );
}

#[tokio::test]
async fn delete_removes_the_row_and_its_image() {
    let app = TestApp::new().await;
    let payload = json!({"schoolId": 1, "adminId": Uuid::new_v4(), "name": "Bags"});
    let created = expect_data(
        app.multipart(
            Method::POST,
            "/api/categories",
            &payload,
            &[FilePart { field: "image", file_name: "bag.webp", bytes: b"img" }],
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let uri = format!("/api/categories/{}", created["id"]);
    let url = created["imageUrl"].as_str().unwrap().to_string();

    let deleted = expect_data(app.request(Method::DELETE, &uri, None).await, StatusCode::OK).await;
    assert_eq!(deleted, true);
    assert!(!app.file_for(&url).exists());

    assert_eq!(
        expect_error(app.request(Method::GET, &uri, None).await, StatusCode::NOT_FOUND).await,
        "Category not found"
    );
}

#[tokio::test]
async fn categories_in_use_by_products_cannot_be_deleted() {
    let app = TestApp::new().await;
    let category = app.create_category(1, "Books", &[]).await;
    app.create_product(1, category["id"].as_i64().unwrap(), "Atlas")
        .await;

    let response = app
        .request(Method::DELETE, &format!("/api/categories/{}", category["id"]), None)
        .await;
    assert_eq!(
        expect_error(response, StatusCode::CONFLICT).await,
        "Category has products and cannot be deleted"
    );
}

#[tokio::test]
async fn denied_admin_gets_403_and_nothing_is_written() {
    let app = TestApp::new().await;
    app.deny(AdminDenial::SchoolMismatch {
        actual: 9,
        expected: 1,
    });

    let admin_id = Uuid::new_v4();
    let payload = json!({"schoolId": 1, "adminId": admin_id, "name": "Bags"});
    let response = app
        .multipart(
            Method::POST,
            "/api/categories",
            &payload,
            &[FilePart { field: "image", file_name: "bag.png", bytes: b"img" }],
        )
        .await;
    assert_eq!(
        expect_error(response, StatusCode::FORBIDDEN).await,
        "Admin belongs to school 9, not 1."
    );

    let calls = app.admin_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].admin_id, admin_id);
    assert_eq!(calls[0].school_id, 1);
    assert_eq!(calls[0].authorization.as_deref(), Some(TEST_AUTHORIZATION));

    app.allow();
    let listed = expect_data(
        app.request(Method::GET, "/api/categories/school/1", None).await,
        StatusCode::OK,
    )
    .await;
    assert!(listed.as_array().unwrap().is_empty());
    assert!(!app.static_root.join("uploads").exists());
}

#[tokio::test]
async fn blank_names_fail_validation_with_field_errors() {
    let app = TestApp::new().await;
    let payload = json!({"schoolId": 1, "adminId": Uuid::new_v4(), "name": "   "});
    let (status, body) = response_json(
        app.multipart(Method::POST, "/api/categories", &payload, &[])
            .await,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    assert!(body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e == "name: must not be blank"));
    assert!(app.admin_calls().is_empty());
}

#[tokio::test]
async fn multipart_without_payload_is_a_bad_request() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/categories")
        .header("content-type", "multipart/form-data; boundary=xyz")
        .body(Body::from(
            "--xyz\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n--xyz--\r\n",
        ))
        .unwrap();
    let message = expect_error(app.send(request).await, StatusCode::BAD_REQUEST).await;
    assert_eq!(message, "Missing 'payload' part");
}

#[tokio::test]
async fn list_is_sorted_by_name_and_scoped_to_the_school() {
    let app = TestApp::new().await;
    app.create_category(1, "Uniforms", &[]).await;
    app.create_category(1, "Books", &[]).await;
    app.create_category(2, "Art", &[]).await;

    let listed = expect_data(
        app.request(Method::GET, "/api/categories/school/1", None).await,
        StatusCode::OK,
    )
    .await;
    let names: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Books", "Uniforms"]);
}
