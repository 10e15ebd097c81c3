mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, TestApp};
use serde_json::json;

async fn create_department(app: &TestApp, name: &str) -> String {
    let body = body_json(
        app.request_authenticated(
            Method::POST,
            "/api/v1/org/departments",
            Some(json!({ "name": name })),
        )
        .await,
    )
    .await;
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn department_with_employees_cannot_be_deleted() {
    let app = TestApp::new().await;
    let dept = create_department(&app, "Engineering").await;

    let employee = app
        .request_authenticated(
            Method::POST,
            "/api/v1/employees",
            Some(json!({
                "employee_code": "EMP-100",
                "full_name": "Jane Doe",
                "department_id": dept,
            })),
        )
        .await;
    assert_eq!(employee.status(), StatusCode::OK);

    let blocked = app
        .request_authenticated(
            Method::DELETE,
            &format!("/api/v1/org/departments/{}", dept),
            None,
        )
        .await;
    assert_eq!(blocked.status(), StatusCode::CONFLICT);
    let body = body_json(blocked).await;
    assert!(body["message"].as_str().unwrap().contains("1 assigned employees"));

    // department row is intact
    let listed = body_json(
        app.request_authenticated(Method::GET, "/api/v1/org/departments", None)
            .await,
    )
    .await;
    let items = listed["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Engineering");
    assert_eq!(items[0]["employee_count"], 1);
}

#[tokio::test]
async fn empty_department_deletes_cleanly() {
    let app = TestApp::new().await;
    let dept = create_department(&app, "Finance").await;

    let deleted = app
        .request_authenticated(
            Method::DELETE,
            &format!("/api/v1/org/departments/{}", dept),
            None,
        )
        .await;
    assert_eq!(deleted.status(), StatusCode::OK);

    let listed = body_json(
        app.request_authenticated(Method::GET, "/api/v1/org/departments", None)
            .await,
    )
    .await;
    assert!(listed["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn position_guard_mirrors_department_guard() {
    let app = TestApp::new().await;
    let position = body_json(
        app.request_authenticated(
            Method::POST,
            "/api/v1/org/positions",
            Some(json!({ "name": "Network Engineer" })),
        )
        .await,
    )
    .await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let employee = app
        .request_authenticated(
            Method::POST,
            "/api/v1/employees",
            Some(json!({
                "employee_code": "EMP-101",
                "full_name": "John Smith",
                "position_id": position,
            })),
        )
        .await;
    assert_eq!(employee.status(), StatusCode::OK);

    let blocked = app
        .request_authenticated(
            Method::DELETE,
            &format!("/api/v1/org/positions/{}", position),
            None,
        )
        .await;
    assert_eq!(blocked.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn department_rename_keeps_id_and_employee_count() {
    let app = TestApp::new().await;
    let dept = create_department(&app, "Costumer Support").await;

    let employee = app
        .request_authenticated(
            Method::POST,
            "/api/v1/employees",
            Some(json!({
                "employee_code": "EMP-110",
                "full_name": "Jane Doe",
                "department_id": dept,
            })),
        )
        .await;
    assert_eq!(employee.status(), StatusCode::OK);

    let renamed = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/org/departments/{}", dept),
            Some(json!({ "name": "Customer Support" })),
        )
        .await;
    assert_eq!(renamed.status(), StatusCode::OK);
    let body = body_json(renamed).await;
    assert_eq!(body["data"]["id"].as_str().unwrap(), dept);
    assert_eq!(body["data"]["name"], "Customer Support");
    assert_eq!(body["data"]["employee_count"], 1);

    let missing = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/org/departments/{}", uuid::Uuid::new_v4()),
            Some(json!({ "name": "Nowhere" })),
        )
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn position_rename_round_trip() {
    let app = TestApp::new().await;
    let position = body_json(
        app.request_authenticated(
            Method::POST,
            "/api/v1/org/positions",
            Some(json!({ "name": "Jr Developer" })),
        )
        .await,
    )
    .await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let renamed = body_json(
        app.request_authenticated(
            Method::PUT,
            &format!("/api/v1/org/positions/{}", position),
            Some(json!({ "name": "Junior Developer" })),
        )
        .await,
    )
    .await;
    assert_eq!(renamed["data"]["name"], "Junior Developer");

    let listed = body_json(
        app.request_authenticated(Method::GET, "/api/v1/org/positions", None)
            .await,
    )
    .await;
    assert_eq!(listed["data"][0]["name"], "Junior Developer");
}

#[tokio::test]
async fn lookup_lists_filter_by_name_search() {
    let app = TestApp::new().await;
    create_department(&app, "Finance").await;
    create_department(&app, "Field Operations").await;
    create_department(&app, "Engineering").await;

    let matched = body_json(
        app.request_authenticated(Method::GET, "/api/v1/org/departments?search=Fi", None)
            .await,
    )
    .await;
    let items = matched["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);

    let none = body_json(
        app.request_authenticated(Method::GET, "/api/v1/org/departments?search=Legal", None)
            .await,
    )
    .await;
    assert!(none["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn employee_with_active_assignment_cannot_be_deleted() {
    let app = TestApp::new().await;

    let employee = body_json(
        app.request_authenticated(
            Method::POST,
            "/api/v1/employees",
            Some(json!({ "employee_code": "EMP-102", "full_name": "Jane Doe" })),
        )
        .await,
    )
    .await["data"]["employee_id"]
        .as_str()
        .unwrap()
        .to_string();

    let laptop = body_json(
        app.request_authenticated(
            Method::POST,
            "/api/v1/laptops",
            Some(json!({ "asset_id": "LP-300" })),
        )
        .await,
    )
    .await["data"]["laptop_id"]
        .as_str()
        .unwrap()
        .to_string();

    let deployed = body_json(
        app.request_authenticated(
            Method::POST,
            "/api/v1/deployments",
            Some(json!({
                "employee_id": employee,
                "device_type": "LAPTOP",
                "device_id": laptop,
            })),
        )
        .await,
    )
    .await;
    let assignment = deployed["data"]["employee_device_id"].as_str().unwrap().to_string();

    let blocked = app
        .request_authenticated(Method::DELETE, &format!("/api/v1/employees/{}", employee), None)
        .await;
    assert_eq!(blocked.status(), StatusCode::CONFLICT);

    // once the device comes back, deletion goes through
    let returned = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/deployments/{}/return", assignment),
            None,
        )
        .await;
    assert_eq!(returned.status(), StatusCode::OK);

    let deleted = app
        .request_authenticated(Method::DELETE, &format!("/api/v1/employees/{}", employee), None)
        .await;
    assert_eq!(deleted.status(), StatusCode::OK);
}

#[tokio::test]
async fn employee_views_resolve_department_and_position_names() {
    let app = TestApp::new().await;
    let dept = create_department(&app, "IT Operations").await;

    let created = body_json(
        app.request_authenticated(
            Method::POST,
            "/api/v1/employees",
            Some(json!({
                "employee_code": "EMP-103",
                "full_name": "Jane Doe",
                "department_id": dept,
            })),
        )
        .await,
    )
    .await;
    assert_eq!(created["data"]["department_name"], "IT Operations");
    assert!(created["data"]["position_name"].is_null());

    let filtered = body_json(
        app.request_authenticated(
            Method::GET,
            &format!("/api/v1/employees?department_id={}", dept),
            None,
        )
        .await,
    )
    .await;
    assert_eq!(filtered["data"].as_array().unwrap().len(), 1);
}
