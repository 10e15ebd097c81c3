mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, TestApp};
use serde_json::json;

async fn seed_employee(app: &TestApp) -> String {
    body_json(
        app.request_authenticated(
            Method::POST,
            "/api/v1/employees",
            Some(json!({ "employee_code": "EMP-500", "full_name": "Jane Doe" })),
        )
        .await,
    )
    .await["data"]["employee_id"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn seed_request(app: &TestApp, employee_id: &str) -> String {
    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/requests",
            Some(json!({
                "employee_id": employee_id,
                "request_type": "repair",
                "reason": "Screen flickers under load",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "pending");
    body["data"]["request_id"].as_str().unwrap().to_string()
}

async fn set_status(app: &TestApp, request_id: &str, status: &str) -> axum::response::Response {
    app.request_authenticated(
        Method::PUT,
        &format!("/api/v1/requests/{}/status", request_id),
        Some(json!({ "status": status })),
    )
    .await
}

#[tokio::test]
async fn request_walks_the_approval_workflow() {
    let app = TestApp::new().await;
    let employee = seed_employee(&app).await;
    let request = seed_request(&app, &employee).await;

    let approved = set_status(&app, &request, "approved").await;
    assert_eq!(approved.status(), StatusCode::OK);

    let completed = set_status(&app, &request, "completed").await;
    assert_eq!(completed.status(), StatusCode::OK);
    let body = body_json(completed).await;
    assert_eq!(body["data"]["status"], "completed");
    assert!(body["data"]["date_completed"].is_string());
}

#[tokio::test]
async fn illegal_transitions_are_rejected() {
    let app = TestApp::new().await;
    let employee = seed_employee(&app).await;
    let request = seed_request(&app, &employee).await;

    // pending cannot jump straight to completed
    let jumped = set_status(&app, &request, "completed").await;
    assert_eq!(jumped.status(), StatusCode::BAD_REQUEST);

    let rejected = set_status(&app, &request, "rejected").await;
    assert_eq!(rejected.status(), StatusCode::OK);

    // rejected is terminal
    let revived = set_status(&app, &request, "approved").await;
    assert_eq!(revived.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bookings_require_an_approved_request() {
    let app = TestApp::new().await;
    let employee = seed_employee(&app).await;
    let request = seed_request(&app, &employee).await;

    let booking = json!({
        "booking_date": "2026-09-01",
        "booking_time": "10:30",
        "method": "courier",
        "courier_name": "GoFast",
    });

    let premature = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/requests/{}/bookings", request),
            Some(booking.clone()),
        )
        .await;
    assert_eq!(premature.status(), StatusCode::BAD_REQUEST);

    assert_eq!(
        set_status(&app, &request, "approved").await.status(),
        StatusCode::OK
    );

    let created = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/requests/{}/bookings", request),
            Some(booking),
        )
        .await;
    assert_eq!(created.status(), StatusCode::OK);
    let body = body_json(created).await;
    assert_eq!(body["data"]["status"], "scheduled");
    assert_eq!(body["data"]["method"], "courier");

    // booking shows up on the request view
    let fetched = body_json(
        app.request_authenticated(Method::GET, &format!("/api/v1/requests/{}", request), None)
            .await,
    )
    .await;
    assert_eq!(fetched["data"]["bookings"].as_array().unwrap().len(), 1);
    assert_eq!(fetched["data"]["employee_name"], "Jane Doe");
}

#[tokio::test]
async fn request_creation_validates_device_pair_and_employee() {
    let app = TestApp::new().await;
    let employee = seed_employee(&app).await;

    let half_pair = app
        .request_authenticated(
            Method::POST,
            "/api/v1/requests",
            Some(json!({
                "employee_id": employee,
                "request_type": "return",
                "device_type": "LAPTOP",
            })),
        )
        .await;
    assert_eq!(half_pair.status(), StatusCode::BAD_REQUEST);

    let ghost_employee = app
        .request_authenticated(
            Method::POST,
            "/api/v1/requests",
            Some(json!({
                "employee_id": uuid::Uuid::new_v4(),
                "request_type": "repair",
            })),
        )
        .await;
    assert_eq!(ghost_employee.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn requests_filter_by_status() {
    let app = TestApp::new().await;
    let employee = seed_employee(&app).await;
    let first = seed_request(&app, &employee).await;
    let _second = seed_request(&app, &employee).await;

    set_status(&app, &first, "approved").await;

    let pending = body_json(
        app.request_authenticated(Method::GET, "/api/v1/requests?status=pending", None)
            .await,
    )
    .await;
    assert_eq!(pending["data"].as_array().unwrap().len(), 1);

    let all = body_json(
        app.request_authenticated(Method::GET, "/api/v1/requests", None)
            .await,
    )
    .await;
    assert_eq!(all["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn todays_bookings_show_only_the_current_date() {
    let app = TestApp::new().await;
    let employee = seed_employee(&app).await;
    let request = seed_request(&app, &employee).await;
    set_status(&app, &request, "approved").await;

    let today = chrono::Utc::now().date_naive().to_string();
    for (date, time) in [(today.as_str(), "09:00"), ("2031-01-01", "11:00")] {
        let created = app
            .request_authenticated(
                Method::POST,
                &format!("/api/v1/requests/{}/bookings", request),
                Some(json!({
                    "booking_date": date,
                    "booking_time": time,
                    "method": "pickup",
                })),
            )
            .await;
        assert_eq!(created.status(), StatusCode::OK);
    }

    let schedule = body_json(
        app.request_authenticated(Method::GET, "/api/v1/requests/bookings/today", None)
            .await,
    )
    .await;
    let items = schedule["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["booking_time"], "09:00");
    assert_eq!(items[0]["request_type"], "repair");
    assert_eq!(items[0]["employee_name"], "Jane Doe");
}

#[tokio::test]
async fn rejection_stamps_the_completion_date() {
    let app = TestApp::new().await;
    let employee = seed_employee(&app).await;
    let request = seed_request(&app, &employee).await;

    let rejected = set_status(&app, &request, "rejected").await;
    assert_eq!(rejected.status(), StatusCode::OK);
    let body = body_json(rejected).await;
    assert!(body["data"]["date_completed"].is_string());
}

#[tokio::test]
async fn deleting_a_request_drops_its_bookings() {
    let app = TestApp::new().await;
    let employee = seed_employee(&app).await;
    let request = seed_request(&app, &employee).await;
    set_status(&app, &request, "approved").await;

    app.request_authenticated(
        Method::POST,
        &format!("/api/v1/requests/{}/bookings", request),
        Some(json!({
            "booking_date": "2026-09-02",
            "booking_time": "14:00",
            "method": "pickup",
        })),
    )
    .await;

    let deleted = app
        .request_authenticated(Method::DELETE, &format!("/api/v1/requests/{}", request), None)
        .await;
    assert_eq!(deleted.status(), StatusCode::OK);

    let gone = app
        .request_authenticated(Method::GET, &format!("/api/v1/requests/{}", request), None)
        .await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}
