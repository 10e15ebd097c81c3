mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, TestApp};
use serde_json::json;

#[tokio::test]
async fn login_issues_a_token_with_the_account_role() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({ "email": "it@example.com", "password": "correct horse battery" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["role"], "IT");
    assert!(body["data"]["token"].as_str().unwrap().len() > 20);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({ "email": "it@example.com", "password": "wrong" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_console_roles_are_forbidden() {
    let app = TestApp::new().await;

    let auth = app.state.auth_service();
    auth.create_account("staff@example.com", "some password", "EMPLOYEE")
        .await
        .expect("seed non-console account");
    let login = auth
        .login("staff@example.com", "some password")
        .await
        .expect("login succeeds even without console access");

    let response = app
        .request(
            Method::GET,
            "/api/v1/laptops",
            None,
            Some(&login.token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn disabled_accounts_cannot_sign_in() {
    let app = TestApp::new().await;

    let auth = app.state.auth_service();
    let account = auth
        .create_account("gone@example.com", "pw pw pw pw", "IT")
        .await
        .expect("seed account");

    use asset_api::entities::account;
    use sea_orm::{ActiveModelTrait, ActiveValue::Set};
    let mut active: account::ActiveModel = account.into();
    active.is_active = Set(false);
    active
        .update(app.state.db.as_ref())
        .await
        .expect("disable account");

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({ "email": "gone@example.com", "password": "pw pw pw pw" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn status_and_health_are_public() {
    let app = TestApp::new().await;

    let status = app.request(Method::GET, "/api/v1/status", None, None).await;
    assert_eq!(status.status(), StatusCode::OK);

    let health = app.request(Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(health.status(), StatusCode::OK);
    let body = body_json(health).await;
    assert_eq!(body["data"]["checks"]["database"], "healthy");
}
