//! Integration tests for admin-issued assignment codes.

use axum::http::StatusCode;
use futures::future::join;
use serde_json::json;

use tabaudit_entity::user::UserRole;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_generate_requires_an_available_device() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;
    let tab = app.create_tab(&admin, "Tablet Pool", 0, 1).await;

    let response = app
        .request(
            "POST",
            "/api/admin/generate-otp",
            Some(json!({ "tab_type_id": tab })),
            Some(&admin),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.code(), Some("NO_DEVICE_AVAILABLE"));
}

#[tokio::test]
async fn test_assign_with_code_takes_a_pool_device() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;
    let (_, user) = app.create_user("E001", UserRole::User).await;
    let tab = app.create_tab(&admin, "Tablet Pool", 0, 1).await;
    let device = app.provision_device(&admin, tab, "SN-100").await;

    let issued = app
        .request(
            "POST",
            "/api/admin/generate-otp",
            Some(json!({ "tab_type_id": tab })),
            Some(&admin),
        )
        .await;
    assert_eq!(issued.status, StatusCode::CREATED);
    let code = issued.body["otp_code"]
        .as_str()
        .expect("No otp_code in response")
        .to_string();
    assert_eq!(code.len(), 6);

    let assigned = app
        .request("POST", "/api/assign", Some(json!({ "otp_code": code })), Some(&user))
        .await;
    assert_eq!(assigned.status, StatusCode::CREATED);
    assert_eq!(assigned.body["device_id"], device.to_string());

    let reused = app
        .request("POST", "/api/assign", Some(json!({ "otp_code": code })), Some(&user))
        .await;
    assert_eq!(reused.code(), Some("INVALID_OR_EXPIRED_OTP"));
    assert_eq!(reused.body["error"], "Invalid or expired OTP: already used.");
}

#[tokio::test]
async fn test_code_is_consumed_exactly_once() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;
    let (_, first) = app.create_user("E001", UserRole::User).await;
    let (_, second) = app.create_user("E002", UserRole::User).await;
    let tab = app.create_tab(&admin, "Tablet Pool", 0, 1).await;
    app.provision_device(&admin, tab, "SN-201").await;
    app.provision_device(&admin, tab, "SN-202").await;

    let issued = app
        .request(
            "POST",
            "/api/admin/generate-otp",
            Some(json!({ "tab_type_id": tab })),
            Some(&admin),
        )
        .await;
    let body = json!({ "otp_code": issued.body["otp_code"] });

    let (a, b) = join(
        app.request("POST", "/api/assign", Some(body.clone()), Some(&first)),
        app.request("POST", "/api/assign", Some(body), Some(&second)),
    )
    .await;

    let winners = [&a, &b]
        .iter()
        .filter(|r| r.status == StatusCode::CREATED)
        .count();
    assert_eq!(winners, 1);
    let loser = if a.status == StatusCode::CREATED { &b } else { &a };
    assert_eq!(loser.code(), Some("INVALID_OR_EXPIRED_OTP"));
    assert_eq!(loser.body["error"], "Invalid or expired OTP: already used.");

    let assigned: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM tablet_devices WHERE status = 'assigned'")
            .fetch_one(&app.db_pool)
            .await
            .expect("Count failed");
    assert_eq!(assigned, 1);
}

#[tokio::test]
async fn test_expired_code_is_refused_and_device_stays() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;
    let (_, user) = app.create_user("E001", UserRole::User).await;
    let tab = app.create_tab(&admin, "Tablet Pool", 0, 1).await;
    let device = app.provision_device(&admin, tab, "SN-300").await;

    let issued = app
        .request(
            "POST",
            "/api/admin/generate-otp",
            Some(json!({ "tab_type_id": tab })),
            Some(&admin),
        )
        .await;
    let code = issued.body["otp_code"].as_str().unwrap_or_default().to_string();

    sqlx::query("UPDATE assignment_otps SET expires_at = NOW() - INTERVAL '1 minute'")
        .execute(&app.db_pool)
        .await
        .expect("Failed to expire code");

    let response = app
        .request("POST", "/api/assign", Some(json!({ "otp_code": code })), Some(&user))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.code(), Some("INVALID_OR_EXPIRED_OTP"));
    assert_eq!(response.body["error"], "Invalid or expired OTP: expired.");
    assert_eq!(app.device_status(device).await, "available");
}

#[tokio::test]
async fn test_code_without_free_device_is_restored() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;
    let (_, holder) = app.create_user("E001", UserRole::User).await;
    let (_, user) = app.create_user("E002", UserRole::User).await;
    let tab = app.create_tab(&admin, "Tablet Pool", 0, 1).await;
    app.provision_device(&admin, tab, "SN-400").await;

    let issued = app
        .request(
            "POST",
            "/api/admin/generate-otp",
            Some(json!({ "tab_type_id": tab })),
            Some(&admin),
        )
        .await;
    let code = issued.body["otp_code"].as_str().unwrap_or_default().to_string();

    // The only device leaves the pool before the code is redeemed.
    app.request("POST", "/api/assign", Some(json!({ "device_id": "SN-400" })), Some(&holder))
        .await;

    let response = app
        .request("POST", "/api/assign", Some(json!({ "otp_code": code })), Some(&user))
        .await;
    assert_eq!(response.code(), Some("NO_DEVICE_AVAILABLE"));

    let used: bool = sqlx::query_scalar("SELECT is_used FROM assignment_otps WHERE code = $1")
        .bind(&code)
        .fetch_one(&app.db_pool)
        .await
        .expect("Code missing");
    assert!(!used);
}
