mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, TestApp};
use serde_json::json;

#[tokio::test]
async fn laptop_crud_round_trip_with_warranty() {
    let app = TestApp::new().await;

    let created = app
        .request_authenticated(
            Method::POST,
            "/api/v1/laptops",
            Some(json!({
                "asset_id": "LP-100",
                "brand": "Lenovo",
                "model": "ThinkPad T14",
                "cpu": "Ryzen 7 PRO",
                "warranty_end": "2031-01-01",
            })),
        )
        .await;
    assert_eq!(created.status(), StatusCode::OK);
    let body = body_json(created).await;
    let id = body["data"]["laptop_id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["status"], "available");
    assert_eq!(body["data"]["warranty_status"], "Active");

    let updated = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/laptops/{}", id),
            Some(json!({
                "brand": "Lenovo",
                "model": "ThinkPad T14 Gen 2",
                "warranty_end": "2020-01-01",
                "status": "defective",
            })),
        )
        .await;
    assert_eq!(updated.status(), StatusCode::OK);
    let body = body_json(updated).await;
    assert_eq!(body["data"]["model"], "ThinkPad T14 Gen 2");
    assert_eq!(body["data"]["status"], "defective");
    assert_eq!(body["data"]["warranty_status"], "Expired");

    let deleted = app
        .request_authenticated(Method::DELETE, &format!("/api/v1/laptops/{}", id), None)
        .await;
    assert_eq!(deleted.status(), StatusCode::OK);

    let gone = app
        .request_authenticated(Method::GET, &format!("/api/v1/laptops/{}", id), None)
        .await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn laptop_list_filters_by_status_and_search() {
    let app = TestApp::new().await;
    for (asset, brand) in [("LP-200", "Lenovo"), ("LP-201", "Dell"), ("LP-202", "Dell")] {
        let response = app
            .request_authenticated(
                Method::POST,
                "/api/v1/laptops",
                Some(json!({ "asset_id": asset, "brand": brand })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let dells = body_json(
        app.request_authenticated(Method::GET, "/api/v1/laptops?search=Dell", None)
            .await,
    )
    .await;
    assert_eq!(dells["data"].as_array().unwrap().len(), 2);

    let available = body_json(
        app.request_authenticated(Method::GET, "/api/v1/laptops?status=available", None)
            .await,
    )
    .await;
    assert_eq!(available["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn desktop_children_are_replaced_wholesale_on_update() {
    let app = TestApp::new().await;

    let created = app
        .request_authenticated(
            Method::POST,
            "/api/v1/desktops",
            Some(json!({
                "asset_id": "DT-100",
                "processor": "Core i5-12400",
                "memory": [
                    { "slot_number": 1, "size_gb": 8 },
                    { "slot_number": 2, "size_gb": 8 },
                ],
                "storage": [
                    { "storage_type": "SSD", "capacity_gb": 512 },
                ],
            })),
        )
        .await;
    assert_eq!(created.status(), StatusCode::OK);
    let body = body_json(created).await;
    let id = body["data"]["desktop_id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["memory"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["total_memory_gb"], 16);
    assert_eq!(body["data"]["total_storage"], "512 GB");

    // a single 16 GB module replaces both old modules
    let updated = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/desktops/{}", id),
            Some(json!({
                "processor": "Core i5-12400",
                "memory": [
                    { "slot_number": 1, "size_gb": 16 },
                ],
                "storage": [
                    { "storage_type": "SSD", "capacity_gb": 1000 },
                    { "storage_type": "HDD", "capacity_gb": 1000 },
                ],
            })),
        )
        .await;
    assert_eq!(updated.status(), StatusCode::OK);
    let body = body_json(updated).await;
    let memory = body["data"]["memory"].as_array().unwrap();
    assert_eq!(memory.len(), 1);
    assert_eq!(memory[0]["size_gb"], 16);
    assert_eq!(body["data"]["total_memory_gb"], 16);
    assert_eq!(body["data"]["total_storage"], "2 TB");
}

#[tokio::test]
async fn desktop_delete_removes_children() {
    let app = TestApp::new().await;

    let created = body_json(
        app.request_authenticated(
            Method::POST,
            "/api/v1/desktops",
            Some(json!({
                "asset_id": "DT-101",
                "memory": [{ "slot_number": 1, "size_gb": 8 }],
                "storage": [{ "storage_type": "SSD", "capacity_gb": 256 }],
            })),
        )
        .await,
    )
    .await;
    let id = created["data"]["desktop_id"].as_str().unwrap().to_string();

    let deleted = app
        .request_authenticated(Method::DELETE, &format!("/api/v1/desktops/{}", id), None)
        .await;
    assert_eq!(deleted.status(), StatusCode::OK);

    let listed = body_json(
        app.request_authenticated(Method::GET, "/api/v1/desktops", None)
            .await,
    )
    .await;
    assert!(listed["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn invalid_memory_slot_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/desktops",
            Some(json!({
                "asset_id": "DT-102",
                "memory": [{ "slot_number": 0, "size_gb": 8 }],
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn monitor_crud_round_trip() {
    let app = TestApp::new().await;

    let created = app
        .request_authenticated(
            Method::POST,
            "/api/v1/monitors",
            Some(json!({ "asset_id": "MN-100", "brand": "Dell", "model": "U2723QE" })),
        )
        .await;
    assert_eq!(created.status(), StatusCode::OK);
    let body = body_json(created).await;
    let id = body["data"]["monitor_id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["status"], "available");

    let updated = body_json(
        app.request_authenticated(
            Method::PUT,
            &format!("/api/v1/monitors/{}", id),
            Some(json!({ "brand": "Dell", "model": "U2723QE", "status": "defective" })),
        )
        .await,
    )
    .await;
    assert_eq!(updated["data"]["status"], "defective");

    let deleted = app
        .request_authenticated(Method::DELETE, &format!("/api/v1/monitors/{}", id), None)
        .await;
    assert_eq!(deleted.status(), StatusCode::OK);
}

#[tokio::test]
async fn retired_status_is_laptop_only() {
    let app = TestApp::new().await;

    let monitor = body_json(
        app.request_authenticated(
            Method::POST,
            "/api/v1/monitors",
            Some(json!({ "asset_id": "MN-200" })),
        )
        .await,
    )
    .await["data"]["monitor_id"]
        .as_str()
        .unwrap()
        .to_string();
    let rejected = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/monitors/{}", monitor),
            Some(json!({ "status": "retired" })),
        )
        .await;
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);

    let desktop = body_json(
        app.request_authenticated(
            Method::POST,
            "/api/v1/desktops",
            Some(json!({ "asset_id": "DT-200" })),
        )
        .await,
    )
    .await["data"]["desktop_id"]
        .as_str()
        .unwrap()
        .to_string();
    let rejected = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/desktops/{}", desktop),
            Some(json!({ "status": "retired" })),
        )
        .await;
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
    // the desktop row is untouched
    let fetched = body_json(
        app.request_authenticated(Method::GET, &format!("/api/v1/desktops/{}", desktop), None)
            .await,
    )
    .await;
    assert_eq!(fetched["data"]["status"], "available");

    let laptop = body_json(
        app.request_authenticated(
            Method::POST,
            "/api/v1/laptops",
            Some(json!({ "asset_id": "LP-400" })),
        )
        .await,
    )
    .await["data"]["laptop_id"]
        .as_str()
        .unwrap()
        .to_string();
    let retired = body_json(
        app.request_authenticated(
            Method::PUT,
            &format!("/api/v1/laptops/{}", laptop),
            Some(json!({ "status": "retired" })),
        )
        .await,
    )
    .await;
    assert_eq!(retired["data"]["status"], "retired");
}
