use std::time::Duration;

use estore_api::auth::{AdminDenial, AdminValidator, HttpAdminValidator, USER_INFO_PATH};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn validator_for(server: &MockServer) -> HttpAdminValidator {
    HttpAdminValidator::new(server.uri(), Duration::from_secs(2)).expect("client")
}

async fn answering(admin_id: Uuid, status: u16, body: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/{}", USER_INFO_PATH, admin_id)))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn forwards_the_caller_token_and_accepts_store_admins() {
    let admin_id = Uuid::new_v4();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/{}", USER_INFO_PATH, admin_id)))
        .and(header("authorization", "Bearer caller-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"schoolId": 5, "roles": ["STORE_ADMIN"]},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = validator_for(&server)
        .validate(admin_id, 5, Some("Bearer caller-token".to_string()))
        .await;
    assert_eq!(result, Ok(()));
}

#[tokio::test]
async fn admin_of_another_school_is_refused() {
    let admin_id = Uuid::new_v4();
    let server = answering(
        admin_id,
        200,
        json!({"success": true, "data": {"schoolId": 8, "roles": ["super_admin"]}}),
    )
    .await;

    let denial = validator_for(&server)
        .validate(admin_id, 5, None)
        .await
        .unwrap_err();
    assert_eq!(denial, AdminDenial::SchoolMismatch { actual: 8, expected: 5 });
    assert_eq!(denial.to_string(), "Admin belongs to school 8, not 5.");
}

#[tokio::test]
async fn roles_are_required_and_must_be_privileged() {
    let admin_id = Uuid::new_v4();
    let missing = answering(admin_id, 200, json!({"success": true, "data": {"schoolId": 5}})).await;
    assert_eq!(
        validator_for(&missing).validate(admin_id, 5, None).await,
        Err(AdminDenial::MissingRoles)
    );

    let librarian = answering(
        admin_id,
        200,
        json!({"success": true, "data": {"schoolId": 5, "roles": ["librarian"]}}),
    )
    .await;
    assert_eq!(
        validator_for(&librarian).validate(admin_id, 5, None).await,
        Err(AdminDenial::InsufficientRole)
    );
}

#[tokio::test]
async fn not_found_answers_deny_the_admin() {
    let admin_id = Uuid::new_v4();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    assert_eq!(
        validator_for(&server).validate(admin_id, 5, None).await,
        Err(AdminDenial::AdminNotFound)
    );

    let unsuccessful = answering(admin_id, 404, json!({"success": false, "message": "no user"})).await;
    assert_eq!(
        validator_for(&unsuccessful).validate(admin_id, 5, None).await,
        Err(AdminDenial::AdminNotFound)
    );
}

#[tokio::test]
async fn nil_admin_ids_never_reach_the_service() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    assert_eq!(
        validator_for(&server).validate(Uuid::nil(), 5, None).await,
        Err(AdminDenial::MissingAdminId)
    );
}

#[tokio::test]
async fn garbage_and_unreachable_services_fail_closed() {
    let admin_id = Uuid::new_v4();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;
    assert_eq!(
        validator_for(&server).validate(admin_id, 5, None).await,
        Err(AdminDenial::Unreachable)
    );

    let closed = HttpAdminValidator::new("http://127.0.0.1:9", Duration::from_millis(200))
        .expect("client");
    assert_eq!(
        closed.validate(admin_id, 5, None).await,
        Err(AdminDenial::Unreachable)
    );
}
