mod common;

use axum::http::{Method, StatusCode};
use common::{expect_data, expect_error, TestApp};
use estore_api::auth::AdminDenial;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn values_are_trimmed_and_blank_entries_dropped() {
    let app = TestApp::new().await;
    let attribute = app
        .create_attribute(1, " Size ", &[" S", "", "M ", "   ", "L"])
        .await;

    assert_eq!(attribute["attributeName"], "Size");
    assert_eq!(attribute["values"], json!(["S", "M", "L"]));
    assert_eq!(attribute["isActive"], true);

    let fetched = expect_data(
        app.request(
            Method::GET,
            &format!("/api/category-attributes/{}", attribute["id"]),
            None,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(fetched["id"], attribute["id"]);
    assert_eq!(fetched["values"], attribute["values"]);
}

#[tokio::test]
async fn duplicate_attribute_names_conflict() {
    let app = TestApp::new().await;
    app.create_attribute(1, "Color", &["Red"]).await;

    let response = app
        .request(
            Method::POST,
            "/api/category-attributes",
            Some(json!({
                "attributeName": "Color",
                "values": ["Blue"],
                "schoolId": 1,
                "adminId": Uuid::new_v4(),
            })),
        )
        .await;
    assert_eq!(
        expect_error(response, StatusCode::CONFLICT).await,
        "Attribute already exists."
    );
}

#[tokio::test]
async fn update_checks_the_stored_owner_and_renames() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let created = expect_data(
        app.request(
            Method::POST,
            "/api/category-attributes",
            Some(json!({
                "attributeName": "Fit",
                "values": ["Slim"],
                "schoolId": 3,
                "adminId": owner,
            })),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    app.create_attribute(3, "Sleeve", &["Half"]).await;

    let uri = format!("/api/category-attributes/{}", created["id"]);
    let clash = app
        .request(
            Method::PUT,
            &uri,
            Some(json!({"attributeName": "Sleeve", "values": []})),
        )
        .await;
    assert_eq!(
        expect_error(clash, StatusCode::CONFLICT).await,
        "Attribute name already exists."
    );

    let updated = expect_data(
        app.request(
            Method::PUT,
            &uri,
            Some(json!({"attributeName": "Cut", "values": ["Slim", "Regular"], "isActive": false})),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(updated["attributeName"], "Cut");
    assert_eq!(updated["values"], json!(["Slim", "Regular"]));
    assert_eq!(updated["isActive"], false);

    let last_call = app.admin_calls().pop().unwrap();
    assert_eq!(last_call.admin_id, owner);
    assert_eq!(last_call.school_id, 3);
}

#[tokio::test]
async fn attributes_linked_to_a_category_cannot_be_deleted() {
    let app = TestApp::new().await;
    let size = app.create_attribute(1, "Size", &["S"]).await;
    let size_id = size["id"].as_i64().unwrap();
    let category = app.create_category(1, "Uniforms", &[size_id]).await;
    let uri = format!("/api/category-attributes/{}", size_id);

    assert_eq!(
        expect_error(app.request(Method::DELETE, &uri, None).await, StatusCode::CONFLICT).await,
        "Attribute is in use and cannot be deleted"
    );

    // Unlink, then the delete goes through.
    app.multipart(
        Method::PUT,
        &format!("/api/categories/{}", category["id"]),
        &json!({"name": "Uniforms", "attributeIds": []}),
        &[],
    )
    .await;
    let deleted = expect_data(app.request(Method::DELETE, &uri, None).await, StatusCode::OK).await;
    assert_eq!(deleted, true);
    assert_eq!(
        expect_error(app.request(Method::GET, &uri, None).await, StatusCode::NOT_FOUND).await,
        "Attribute not found"
    );
}

#[tokio::test]
async fn denied_admin_cannot_create_attributes() {
    let app = TestApp::new().await;
    app.deny(AdminDenial::InsufficientRole);

    let response = app
        .request(
            Method::POST,
            "/api/category-attributes",
            Some(json!({
                "attributeName": "Size",
                "values": ["S"],
                "schoolId": 1,
                "adminId": Uuid::new_v4(),
            })),
        )
        .await;
    assert_eq!(
        expect_error(response, StatusCode::FORBIDDEN).await,
        "Admin does not have permission."
    );

    app.allow();
    let listed = expect_data(
        app.request(Method::GET, "/api/category-attributes/school/1", None)
            .await,
        StatusCode::OK,
    )
    .await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn list_is_sorted_by_name() {
    let app = TestApp::new().await;
    app.create_attribute(1, "Size", &[]).await;
    app.create_attribute(1, "Color", &[]).await;
    app.create_attribute(2, "Brand", &[]).await;

    let listed = expect_data(
        app.request(Method::GET, "/api/category-attributes/school/1", None)
            .await,
        StatusCode::OK,
    )
    .await;
    let names: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["attributeName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Color", "Size"]);
}
