mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, TestApp};
use serde_json::json;
use uuid::Uuid;

async fn seed_employee(app: &TestApp, code: &str, name: &str) -> Uuid {
    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/employees",
            Some(json!({ "employee_code": code, "full_name": name })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["data"]["employee_id"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .expect("employee id in response")
}

async fn seed_laptop(app: &TestApp, asset_id: &str) -> Uuid {
    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/laptops",
            Some(json!({ "asset_id": asset_id, "brand": "Lenovo", "model": "T14" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["data"]["laptop_id"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .expect("laptop id in response")
}

async fn seed_monitor(app: &TestApp, asset_id: &str) -> Uuid {
    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/monitors",
            Some(json!({ "asset_id": asset_id, "brand": "Dell" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["data"]["monitor_id"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .expect("monitor id in response")
}

async fn deploy(
    app: &TestApp,
    employee_id: Uuid,
    device_id: Uuid,
    monitor_ids: &[Uuid],
) -> axum::response::Response {
    app.request_authenticated(
        Method::POST,
        "/api/v1/deployments",
        Some(json!({
            "employee_id": employee_id,
            "device_type": "LAPTOP",
            "device_id": device_id,
            "monitor_ids": monitor_ids,
        })),
    )
    .await
}

async fn laptop_status(app: &TestApp, laptop_id: Uuid) -> String {
    let response = app
        .request_authenticated(Method::GET, &format!("/api/v1/laptops/{}", laptop_id), None)
        .await;
    let body = body_json(response).await;
    body["data"]["status"].as_str().unwrap().to_string()
}

async fn monitor_status(app: &TestApp, monitor_id: Uuid) -> String {
    let response = app
        .request_authenticated(Method::GET, &format!("/api/v1/monitors/{}", monitor_id), None)
        .await;
    let body = body_json(response).await;
    body["data"]["status"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn deploy_marks_device_issued_and_opens_assignment() {
    let app = TestApp::new().await;
    let employee = seed_employee(&app, "EMP-001", "Jane Doe").await;
    let laptop = seed_laptop(&app, "LP-010").await;

    let response = deploy(&app, employee, laptop, &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "in_use");
    assert_eq!(body["data"]["device_type"], "LAPTOP");

    assert_eq!(laptop_status(&app, laptop).await, "issued");

    let current = body_json(
        app.request_authenticated(Method::GET, "/api/v1/deployments/current", None)
            .await,
    )
    .await;
    let items = current["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["employee_name"], "Jane Doe");
    assert_eq!(items[0]["asset_id"], "LP-010");
    assert!(items[0]["date_returned"].is_null());
}

#[tokio::test]
async fn second_deploy_of_same_device_is_rejected() {
    let app = TestApp::new().await;
    let jane = seed_employee(&app, "EMP-001", "Jane Doe").await;
    let john = seed_employee(&app, "EMP-002", "John Smith").await;
    let laptop = seed_laptop(&app, "LP-011").await;

    let first = deploy(&app, jane, laptop, &[]).await;
    assert_eq!(first.status(), StatusCode::OK);

    // device is no longer available
    let second = deploy(&app, john, laptop, &[]).await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body = body_json(second).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("not available"));
}

#[tokio::test]
async fn full_round_trip_restores_device_and_monitors() {
    let app = TestApp::new().await;
    let employee = seed_employee(&app, "EMP-001", "Jane Doe").await;
    let laptop = seed_laptop(&app, "LP-012").await;
    let m1 = seed_monitor(&app, "MN-001").await;
    let m2 = seed_monitor(&app, "MN-002").await;

    let response = deploy(&app, employee, laptop, &[m1, m2]).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let assignment: Uuid = body["data"]["employee_device_id"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .unwrap();

    assert_eq!(monitor_status(&app, m1).await, "issued");
    assert_eq!(monitor_status(&app, m2).await, "issued");

    let returned = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/deployments/{}/return", assignment),
            None,
        )
        .await;
    assert_eq!(returned.status(), StatusCode::OK);
    let body = body_json(returned).await;
    assert_eq!(body["data"]["status"], "returned");
    assert_eq!(body["data"]["monitors_released"], 2);
    assert!(body["data"]["date_returned"].is_string());

    assert_eq!(laptop_status(&app, laptop).await, "available");
    assert_eq!(monitor_status(&app, m1).await, "available");
    assert_eq!(monitor_status(&app, m2).await, "available");

    // the episode is retained as history, with its monitor links
    let history = body_json(
        app.request_authenticated(Method::GET, "/api/v1/deployments/returned", None)
            .await,
    )
    .await;
    let items = history["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["status"], "returned");
    let monitors = items[0]["monitors"].as_array().unwrap();
    assert_eq!(monitors.len(), 2);
    let ids: Vec<&str> = monitors
        .iter()
        .map(|m| m["monitor_id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&m1.to_string().as_str()));
    assert!(ids.contains(&m2.to_string().as_str()));

    // nothing left on the current screen
    let current = body_json(
        app.request_authenticated(Method::GET, "/api/v1/deployments/current", None)
            .await,
    )
    .await;
    assert!(current["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn return_is_not_idempotent() {
    let app = TestApp::new().await;
    let employee = seed_employee(&app, "EMP-001", "Jane Doe").await;
    let laptop = seed_laptop(&app, "LP-013").await;

    let body = body_json(deploy(&app, employee, laptop, &[]).await).await;
    let assignment = body["data"]["employee_device_id"].as_str().unwrap().to_string();

    let first = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/deployments/{}/return", assignment),
            None,
        )
        .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/deployments/{}/return", assignment),
            None,
        )
        .await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body = body_json(second).await;
    assert!(body["message"].as_str().unwrap().contains("already returned"));
}

#[tokio::test]
async fn deploy_rejects_inactive_employee_and_busy_monitor() {
    let app = TestApp::new().await;
    let jane = seed_employee(&app, "EMP-001", "Jane Doe").await;
    let laptop_a = seed_laptop(&app, "LP-014").await;
    let laptop_b = seed_laptop(&app, "LP-015").await;
    let monitor = seed_monitor(&app, "MN-003").await;

    // monitor goes out with the first deployment
    let first = deploy(&app, jane, laptop_a, &[monitor]).await;
    assert_eq!(first.status(), StatusCode::OK);

    let john = seed_employee(&app, "EMP-002", "John Smith").await;
    let busy = deploy(&app, john, laptop_b, &[monitor]).await;
    assert_eq!(busy.status(), StatusCode::BAD_REQUEST);

    // failed deployment must not leave the device issued
    assert_eq!(laptop_status(&app, laptop_b).await, "available");

    // deactivate John, then try a clean deploy
    let update = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/employees/{}", john),
            Some(json!({ "full_name": "John Smith", "status": "resigned" })),
        )
        .await;
    assert_eq!(update.status(), StatusCode::OK);

    let inactive = deploy(&app, john, laptop_b, &[]).await;
    assert_eq!(inactive.status(), StatusCode::BAD_REQUEST);
    let body = body_json(inactive).await;
    assert!(body["message"].as_str().unwrap().contains("not active"));
}

#[tokio::test]
async fn duplicate_monitor_ids_fail_validation() {
    let app = TestApp::new().await;
    let jane = seed_employee(&app, "EMP-001", "Jane Doe").await;
    let laptop = seed_laptop(&app, "LP-016").await;
    let monitor = seed_monitor(&app, "MN-004").await;

    let response = deploy(&app, jane, laptop, &[monitor, monitor]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("Duplicate"));
    assert_eq!(laptop_status(&app, laptop).await, "available");
    assert_eq!(monitor_status(&app, monitor).await, "available");
}

#[tokio::test]
async fn history_filters_by_employee_search() {
    let app = TestApp::new().await;
    let jane = seed_employee(&app, "EMP-001", "Jane Doe").await;
    let john = seed_employee(&app, "EMP-002", "John Smith").await;
    let laptop_a = seed_laptop(&app, "LP-017").await;
    let laptop_b = seed_laptop(&app, "LP-018").await;

    deploy(&app, jane, laptop_a, &[]).await;
    deploy(&app, john, laptop_b, &[]).await;

    let filtered = body_json(
        app.request_authenticated(
            Method::GET,
            "/api/v1/deployments/history?search=jane",
            None,
        )
        .await,
    )
    .await;
    let items = filtered["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["employee_code"], "EMP-001");

    let all = body_json(
        app.request_authenticated(Method::GET, "/api/v1/deployments/history", None)
            .await,
    )
    .await;
    assert_eq!(all["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn storage_rejects_second_active_row_for_same_device() {
    use asset_api::entities::employee_device;
    use sea_orm::{ActiveModelTrait, ActiveValue::Set};

    let app = TestApp::new().await;
    let jane = seed_employee(&app, "EMP-001", "Jane Doe").await;
    let john = seed_employee(&app, "EMP-002", "John Smith").await;
    let laptop = seed_laptop(&app, "LP-019").await;

    let today = chrono::Utc::now().date_naive();
    let row = |employee: Uuid| employee_device::ActiveModel {
        employee_device_id: Set(Uuid::new_v4()),
        employee_id: Set(employee),
        device_type: Set("LAPTOP".to_string()),
        device_id: Set(laptop),
        status: Set("in_use".to_string()),
        date_issued: Set(today),
        date_returned: Set(None),
        ..Default::default()
    };

    row(jane)
        .insert(app.state.db.as_ref())
        .await
        .expect("first active assignment inserts");

    // writing around the service still cannot produce two active holders
    let second = row(john).insert(app.state.db.as_ref()).await;
    assert!(second.is_err());
}

#[tokio::test]
async fn pick_lists_track_availability() {
    let app = TestApp::new().await;
    let jane = seed_employee(&app, "EMP-001", "Jane Doe").await;
    let laptop_a = seed_laptop(&app, "LP-020").await;
    let _laptop_b = seed_laptop(&app, "LP-021").await;
    let monitor = seed_monitor(&app, "MN-010").await;

    let before = body_json(
        app.request_authenticated(
            Method::GET,
            "/api/v1/deployments/available-devices?device_type=LAPTOP",
            None,
        )
        .await,
    )
    .await;
    assert_eq!(before["data"].as_array().unwrap().len(), 2);

    deploy(&app, jane, laptop_a, &[monitor]).await;

    // the deployed laptop and monitor drop off the pick-lists
    let after = body_json(
        app.request_authenticated(
            Method::GET,
            "/api/v1/deployments/available-devices?device_type=LAPTOP",
            None,
        )
        .await,
    )
    .await;
    let picks = after["data"].as_array().unwrap();
    assert_eq!(picks.len(), 1);
    assert_eq!(picks[0]["asset_id"], "LP-021");

    let monitors = body_json(
        app.request_authenticated(Method::GET, "/api/v1/deployments/available-monitors", None)
            .await,
    )
    .await;
    assert!(monitors["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn device_specs_resolve_by_kind() {
    let app = TestApp::new().await;
    let laptop = seed_laptop(&app, "LP-022").await;

    let specs = body_json(
        app.request_authenticated(
            Method::GET,
            &format!("/api/v1/deployments/specs/LAPTOP/{}", laptop),
            None,
        )
        .await,
    )
    .await;
    assert_eq!(specs["data"]["asset_id"], "LP-022");
    assert_eq!(specs["data"]["brand"], "Lenovo");

    let missing = app
        .request_authenticated(
            Method::GET,
            &format!("/api/v1/deployments/specs/DESKTOP/{}", Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn returned_stats_summarize_closed_episodes() {
    let app = TestApp::new().await;
    let jane = seed_employee(&app, "EMP-001", "Jane Doe").await;
    let laptop = seed_laptop(&app, "LP-023").await;

    let body = body_json(deploy(&app, jane, laptop, &[]).await).await;
    let assignment = body["data"]["employee_device_id"].as_str().unwrap().to_string();
    app.request_authenticated(
        Method::POST,
        &format!("/api/v1/deployments/{}/return", assignment),
        None,
    )
    .await;

    let stats = body_json(
        app.request_authenticated(Method::GET, "/api/v1/deployments/returned/stats", None)
            .await,
    )
    .await;
    assert_eq!(stats["data"]["total"], 1);
    assert_eq!(stats["data"]["laptops"], 1);
    assert_eq!(stats["data"]["desktops"], 0);
    assert_eq!(stats["data"]["this_week"], 1);
    assert_eq!(stats["data"]["this_month"], 1);
    // issued and returned today
    assert_eq!(stats["data"]["average_usage_days"], 0.0);
}

#[tokio::test]
async fn deployments_require_a_console_token() {
    let app = TestApp::new().await;

    let anonymous = app
        .request(Method::GET, "/api/v1/deployments/current", None, None)
        .await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let garbage = app
        .request(
            Method::GET,
            "/api/v1/deployments/current",
            None,
            Some("not-a-token"),
        )
        .await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}
