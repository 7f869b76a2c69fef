//! Integration tests for consumable log / return.

use axum::http::StatusCode;
use futures::future::join_all;
use serde_json::json;

use tabaudit_entity::user::UserRole;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_log_decrements_stock() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;
    let (_, user) = app.create_user("E001", UserRole::User).await;
    let tab = app.create_tab(&admin, "Standard Blue Tab", 10, 2).await;

    let response = app
        .request(
            "POST",
            "/api/check-in",
            Some(json!({ "tab_id": tab, "action": "log" })),
            Some(&user),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["message"], "Tab logged successfully!");
    assert_eq!(response.body["remaining_stock"], 9);
    assert_eq!(app.stock_of(tab).await, 9);
}

#[tokio::test]
async fn test_daily_limit_is_enforced() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;
    let (_, user) = app.create_user("E001", UserRole::User).await;
    let tab = app.create_tab(&admin, "Premium Red Tab", 10, 1).await;

    let body = json!({ "tab_id": tab, "action": "log" });
    let first = app
        .request("POST", "/api/check-in", Some(body.clone()), Some(&user))
        .await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = app
        .request("POST", "/api/check-in", Some(body), Some(&user))
        .await;
    assert_eq!(second.status, StatusCode::BAD_REQUEST);
    assert_eq!(second.code(), Some("DAILY_LIMIT_EXCEEDED"));
    assert_eq!(second.body["error"], "Daily limit of 1 reached.");
    assert_eq!(app.stock_of(tab).await, 9);
}

#[tokio::test]
async fn test_log_with_empty_stock() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;
    let (_, user) = app.create_user("E001", UserRole::User).await;
    let tab = app.create_tab(&admin, "Empty Tab", 0, 5).await;

    let response = app
        .request(
            "POST",
            "/api/check-in",
            Some(json!({ "tab_id": tab, "action": "log" })),
            Some(&user),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.code(), Some("INSUFFICIENT_STOCK"));
}

#[tokio::test]
async fn test_return_requires_prior_log() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;
    let (_, user) = app.create_user("E001", UserRole::User).await;
    let tab = app.create_tab(&admin, "Standard Blue Tab", 10, 2).await;

    let response = app
        .request(
            "POST",
            "/api/check-in",
            Some(json!({ "tab_id": tab, "action": "return" })),
            Some(&user),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.code(), Some("NOTHING_TO_RETURN"));
    assert_eq!(app.stock_of(tab).await, 10);
}

#[tokio::test]
async fn test_return_restores_stock_and_possession() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;
    let (_, user) = app.create_user("E001", UserRole::User).await;
    let tab = app.create_tab(&admin, "Standard Blue Tab", 10, 2).await;

    let logged = app
        .request(
            "POST",
            "/api/check-in",
            Some(json!({ "tab_id": tab, "action": "log", "quantity": 2 })),
            Some(&user),
        )
        .await;
    assert_eq!(logged.status, StatusCode::CREATED);

    let possession = app.request("GET", "/api/possession", None, Some(&user)).await;
    assert_eq!(possession.status, StatusCode::OK);
    assert_eq!(possession.body["tabs"][0]["quantity"], 2);

    let returned = app
        .request(
            "POST",
            "/api/check-in",
            Some(json!({ "tab_id": tab, "action": "return" })),
            Some(&user),
        )
        .await;
    assert_eq!(returned.status, StatusCode::CREATED);
    assert_eq!(returned.body["message"], "Tab returned successfully!");
    assert_eq!(app.stock_of(tab).await, 9);

    let history = app.request("GET", "/api/user/history", None, Some(&user)).await;
    assert_eq!(history.status, StatusCode::OK);
    assert_eq!(history.body.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_unknown_tab_is_not_found() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, user) = app.create_user("E001", UserRole::User).await;

    let response = app
        .request(
            "POST",
            "/api/check-in",
            Some(json!({ "tab_id": uuid::Uuid::new_v4(), "action": "log" })),
            Some(&user),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.code(), Some("TAB_NOT_FOUND"));
}

#[tokio::test]
async fn test_zero_quantity_is_rejected() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;
    let (_, user) = app.create_user("E001", UserRole::User).await;
    let tab = app.create_tab(&admin, "Standard Blue Tab", 10, 2).await;

    let response = app
        .request(
            "POST",
            "/api/check-in",
            Some(json!({ "tab_id": tab, "action": "log", "quantity": 0 })),
            Some(&user),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.stock_of(tab).await, 10);
}

#[tokio::test]
async fn test_concurrent_logs_never_oversell() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;
    let tab = app.create_tab(&admin, "Scarce Tab", 5, 10).await;

    let mut tokens = Vec::new();
    for i in 0..12 {
        let (_, token) = app.create_user(&format!("E{i:03}"), UserRole::User).await;
        tokens.push(token);
    }

    let responses = join_all(tokens.iter().map(|token| {
        app.request(
            "POST",
            "/api/check-in",
            Some(json!({ "tab_id": tab, "action": "log" })),
            Some(token),
        )
    }))
    .await;

    let created = responses
        .iter()
        .filter(|r| r.status == StatusCode::CREATED)
        .count();
    let refused = responses
        .iter()
        .filter(|r| r.code() == Some("INSUFFICIENT_STOCK"))
        .count();

    assert_eq!(created, 5);
    assert_eq!(refused, 7);
    assert_eq!(app.stock_of(tab).await, 0);
}
