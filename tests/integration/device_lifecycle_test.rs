//! Integration tests for the device assignment state machine.

use axum::http::StatusCode;
use futures::future::{join, join_all};
use serde_json::json;

use tabaudit_entity::user::UserRole;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_scan_assign_and_verified_return() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;
    let (user_id, user) = app.create_user("E001", UserRole::User).await;
    let tab = app.create_tab(&admin, "Tablet Pool", 0, 1).await;
    let device = app.provision_device(&admin, tab, "SN-100").await;

    let assigned = app
        .request(
            "POST",
            "/api/assign",
            Some(json!({ "device_id": "SN-100" })),
            Some(&user),
        )
        .await;
    assert_eq!(assigned.status, StatusCode::CREATED);
    assert_eq!(assigned.body["serial_number"], "SN-100");
    assert_eq!(app.device_status(device).await, "assigned");

    let possession = app.request("GET", "/api/possession", None, Some(&user)).await;
    assert_eq!(possession.body["devices"][0]["serial_number"], "SN-100");

    let initiated = app
        .request(
            "POST",
            "/api/return/initiate",
            Some(json!({ "device_id": "SCAN-SN-100" })),
            Some(&user),
        )
        .await;
    assert_eq!(initiated.status, StatusCode::OK);
    assert_eq!(app.device_status(device).await, "return_pending");

    let code = app.pending_return_code(device).await;
    let verified = app
        .request(
            "POST",
            "/api/return/verify",
            Some(json!({ "device_id": "SN-100", "otp_code": code })),
            Some(&user),
        )
        .await;
    assert_eq!(verified.status, StatusCode::OK);
    assert_eq!(verified.body["success"], "Device returned successfully.");
    assert_eq!(app.device_status(device).await, "available");

    let (status, condition): (String, Option<String>) = sqlx::query_as(
        "SELECT status::text, return_condition FROM assignment_logs WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(&app.db_pool)
    .await
    .expect("Assignment log missing");
    assert_eq!(status, "returned");
    assert_eq!(condition.as_deref(), Some("Good"));
}

#[tokio::test]
async fn test_damaged_return_goes_to_repair() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;
    let (_, user) = app.create_user("E001", UserRole::User).await;
    let tab = app.create_tab(&admin, "Tablet Pool", 0, 1).await;
    let device = app.provision_device(&admin, tab, "SN-200").await;

    app.request("POST", "/api/assign", Some(json!({ "device_id": "SN-200" })), Some(&user))
        .await;
    app.request(
        "POST",
        "/api/return/initiate",
        Some(json!({ "device_id": "SN-200" })),
        Some(&user),
    )
    .await;
    let code = app.pending_return_code(device).await;

    // An admin may verify on the holder's behalf.
    let verified = app
        .request(
            "POST",
            "/api/return/verify",
            Some(json!({ "device_id": "SN-200", "otp_code": code, "condition": "Cracked screen" })),
            Some(&admin),
        )
        .await;
    assert_eq!(verified.status, StatusCode::OK);
    assert_eq!(app.device_status(device).await, "repair");

    let again = app
        .request("POST", "/api/assign", Some(json!({ "device_id": "SN-200" })), Some(&user))
        .await;
    assert_eq!(again.code(), Some("DEVICE_UNAVAILABLE"));
}

#[tokio::test]
async fn test_assigned_device_cannot_be_taken_twice() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;
    let (_, first) = app.create_user("E001", UserRole::User).await;
    let (_, second) = app.create_user("E002", UserRole::User).await;
    let tab = app.create_tab(&admin, "Tablet Pool", 0, 1).await;
    app.provision_device(&admin, tab, "SN-300").await;

    let taken = app
        .request("POST", "/api/assign", Some(json!({ "device_id": "SN-300" })), Some(&first))
        .await;
    assert_eq!(taken.status, StatusCode::CREATED);

    let refused = app
        .request("POST", "/api/assign", Some(json!({ "device_id": "SN-300" })), Some(&second))
        .await;
    assert_eq!(refused.status, StatusCode::BAD_REQUEST);
    assert_eq!(refused.code(), Some("DEVICE_UNAVAILABLE"));
}

#[tokio::test]
async fn test_device_quota_counts_against_daily_limit() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;
    let (_, user) = app.create_user("E001", UserRole::User).await;
    let tab = app.create_tab(&admin, "Tablet Pool", 0, 1).await;
    app.provision_device(&admin, tab, "SN-401").await;
    app.provision_device(&admin, tab, "SN-402").await;

    let first = app
        .request("POST", "/api/assign", Some(json!({ "device_id": "SN-401" })), Some(&user))
        .await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = app
        .request("POST", "/api/assign", Some(json!({ "device_id": "SN-402" })), Some(&user))
        .await;
    assert_eq!(second.code(), Some("DAILY_LIMIT_EXCEEDED"));
}

#[tokio::test]
async fn test_return_of_someone_elses_device_is_refused() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;
    let (_, holder) = app.create_user("E001", UserRole::User).await;
    let (_, other) = app.create_user("E002", UserRole::User).await;
    let tab = app.create_tab(&admin, "Tablet Pool", 0, 1).await;
    let device = app.provision_device(&admin, tab, "SN-500").await;

    app.request("POST", "/api/assign", Some(json!({ "device_id": "SN-500" })), Some(&holder))
        .await;

    let initiated = app
        .request(
            "POST",
            "/api/return/initiate",
            Some(json!({ "device_id": "SN-500" })),
            Some(&other),
        )
        .await;
    assert_eq!(initiated.code(), Some("NOT_YOURS_OR_NOT_ASSIGNED"));

    app.request(
        "POST",
        "/api/return/initiate",
        Some(json!({ "device_id": "SN-500" })),
        Some(&holder),
    )
    .await;
    let code = app.pending_return_code(device).await;

    let verified = app
        .request(
            "POST",
            "/api/return/verify",
            Some(json!({ "device_id": "SN-500", "otp_code": code })),
            Some(&other),
        )
        .await;
    assert_eq!(verified.code(), Some("NOT_YOURS_OR_NOT_ASSIGNED"));
    assert_eq!(app.device_status(device).await, "return_pending");
}

#[tokio::test]
async fn test_reinitiated_return_accepts_latest_code() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;
    let (_, user) = app.create_user("E001", UserRole::User).await;
    let tab = app.create_tab(&admin, "Tablet Pool", 0, 1).await;
    let device = app.provision_device(&admin, tab, "SN-600").await;

    app.request("POST", "/api/assign", Some(json!({ "device_id": "SN-600" })), Some(&user))
        .await;
    let body = json!({ "device_id": "SN-600" });
    app.request("POST", "/api/return/initiate", Some(body.clone()), Some(&user))
        .await;
    let again = app
        .request("POST", "/api/return/initiate", Some(body), Some(&user))
        .await;
    assert_eq!(again.status, StatusCode::OK);

    let latest = app.pending_return_code(device).await;
    let wrong = app
        .request(
            "POST",
            "/api/return/verify",
            Some(json!({ "device_id": "SN-600", "otp_code": "not-a-code" })),
            Some(&user),
        )
        .await;
    assert_eq!(wrong.code(), Some("INVALID_OTP"));

    let verified = app
        .request(
            "POST",
            "/api/return/verify",
            Some(json!({ "device_id": "SN-600", "otp_code": latest })),
            Some(&user),
        )
        .await;
    assert_eq!(verified.status, StatusCode::OK);
}

#[tokio::test]
async fn test_expired_return_code_is_refused() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;
    let (_, user) = app.create_user("E001", UserRole::User).await;
    let tab = app.create_tab(&admin, "Tablet Pool", 0, 1).await;
    let device = app.provision_device(&admin, tab, "SN-700").await;

    app.request("POST", "/api/assign", Some(json!({ "device_id": "SN-700" })), Some(&user))
        .await;
    app.request(
        "POST",
        "/api/return/initiate",
        Some(json!({ "device_id": "SN-700" })),
        Some(&user),
    )
    .await;
    let code = app.pending_return_code(device).await;

    sqlx::query(
        "UPDATE return_verifications SET expires_at = NOW() - INTERVAL '1 minute' \
         WHERE device_id = $1",
    )
    .bind(device)
    .execute(&app.db_pool)
    .await
    .expect("Failed to expire code");

    let verified = app
        .request(
            "POST",
            "/api/return/verify",
            Some(json!({ "device_id": "SN-700", "otp_code": code })),
            Some(&user),
        )
        .await;
    assert_eq!(verified.code(), Some("OTP_EXPIRED"));
    assert_eq!(app.device_status(device).await, "return_pending");
}

#[tokio::test]
async fn test_superseded_return_code_dies_with_the_return() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;
    let (_, user) = app.create_user("E001", UserRole::User).await;
    let tab = app.create_tab(&admin, "Tablet Pool", 0, 3).await;
    let device = app.provision_device(&admin, tab, "SN-800").await;
    let scan = json!({ "device_id": "SN-800" });

    app.request("POST", "/api/assign", Some(scan.clone()), Some(&user))
        .await;
    app.request("POST", "/api/return/initiate", Some(scan.clone()), Some(&user))
        .await;
    let older = app.pending_return_code(device).await;
    app.request("POST", "/api/return/initiate", Some(scan.clone()), Some(&user))
        .await;
    let latest = app.pending_return_code(device).await;

    let verified = app
        .request(
            "POST",
            "/api/return/verify",
            Some(json!({ "device_id": "SN-800", "otp_code": latest })),
            Some(&user),
        )
        .await;
    assert_eq!(verified.status, StatusCode::OK);

    let pending: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM return_verifications WHERE device_id = $1 AND NOT verified",
    )
    .bind(device)
    .fetch_one(&app.db_pool)
    .await
    .expect("Count failed");
    assert_eq!(pending, 0);

    let reassigned = app
        .request("POST", "/api/assign", Some(scan.clone()), Some(&user))
        .await;
    assert_eq!(reassigned.status, StatusCode::CREATED);

    // A fresh loan with no return started cannot be closed by any code.
    let stale = app
        .request(
            "POST",
            "/api/return/verify",
            Some(json!({ "device_id": "SN-800", "otp_code": older })),
            Some(&user),
        )
        .await;
    assert_eq!(stale.code(), Some("NOT_YOURS_OR_NOT_ASSIGNED"));
    assert_eq!(app.device_status(device).await, "assigned");

    app.request("POST", "/api/return/initiate", Some(scan), Some(&user))
        .await;
    let stale = app
        .request(
            "POST",
            "/api/return/verify",
            Some(json!({ "device_id": "SN-800", "otp_code": older })),
            Some(&user),
        )
        .await;
    assert_eq!(stale.code(), Some("INVALID_OTP"));
    assert_eq!(app.device_status(device).await, "return_pending");
}

#[tokio::test]
async fn test_concurrent_scans_of_one_device_assign_it_once() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;
    let tab = app.create_tab(&admin, "Tablet Pool", 0, 1).await;
    let device = app.provision_device(&admin, tab, "SN-900").await;

    let mut tokens = Vec::new();
    for n in 1..=6 {
        let (_, token) = app.create_user(&format!("E10{n}"), UserRole::User).await;
        tokens.push(token);
    }

    let responses = join_all(tokens.iter().map(|token| {
        app.request(
            "POST",
            "/api/assign",
            Some(json!({ "device_id": "SN-900" })),
            Some(token),
        )
    }))
    .await;

    let created = responses
        .iter()
        .filter(|r| r.status == StatusCode::CREATED)
        .count();
    assert_eq!(created, 1);
    for refused in responses.iter().filter(|r| r.status != StatusCode::CREATED) {
        assert_eq!(refused.code(), Some("DEVICE_UNAVAILABLE"), "{:?}", refused.body);
    }

    let active: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM assignment_logs WHERE device_id = $1 AND status = 'active'",
    )
    .bind(device)
    .fetch_one(&app.db_pool)
    .await
    .expect("Count failed");
    assert_eq!(active, 1);
    assert_eq!(app.device_status(device).await, "assigned");
}

#[tokio::test]
async fn test_concurrent_scans_by_one_user_respect_daily_limit() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;
    let (user_id, user) = app.create_user("E001", UserRole::User).await;
    let tab = app.create_tab(&admin, "Tablet Pool", 0, 1).await;
    app.provision_device(&admin, tab, "SN-911").await;
    app.provision_device(&admin, tab, "SN-912").await;

    let (first, second) = join(
        app.request("POST", "/api/assign", Some(json!({ "device_id": "SN-911" })), Some(&user)),
        app.request("POST", "/api/assign", Some(json!({ "device_id": "SN-912" })), Some(&user)),
    )
    .await;

    let outcomes = [&first, &second];
    assert_eq!(
        outcomes
            .iter()
            .filter(|r| r.status == StatusCode::CREATED)
            .count(),
        1
    );
    assert!(
        outcomes
            .iter()
            .any(|r| r.code() == Some("DAILY_LIMIT_EXCEEDED"))
    );

    let active: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM assignment_logs WHERE user_id = $1 AND status = 'active'",
    )
    .bind(user_id)
    .fetch_one(&app.db_pool)
    .await
    .expect("Count failed");
    assert_eq!(active, 1);
}

#[tokio::test]
async fn test_held_device_always_has_a_holder() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;
    let (user_id, user) = app.create_user("E001", UserRole::User).await;
    let tab = app.create_tab(&admin, "Tablet Pool", 0, 1).await;
    let device = app.provision_device(&admin, tab, "SN-950").await;

    app.request("POST", "/api/assign", Some(json!({ "device_id": "SN-950" })), Some(&user))
        .await;
    assert_eq!(app.device_status(device).await, "assigned");

    let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&app.db_pool)
        .await;
    assert!(deleted.is_err());

    let orphaned = sqlx::query("UPDATE tablet_devices SET assigned_to = NULL WHERE id = $1")
        .bind(device)
        .execute(&app.db_pool)
        .await;
    assert!(orphaned.is_err());

    let phantom = sqlx::query(
        "UPDATE tablet_devices SET status = 'available' WHERE id = $1",
    )
    .bind(device)
    .execute(&app.db_pool)
    .await;
    assert!(phantom.is_err());

    let holder: Option<uuid::Uuid> =
        sqlx::query_scalar("SELECT assigned_to FROM tablet_devices WHERE id = $1")
            .bind(device)
            .fetch_one(&app.db_pool)
            .await
            .expect("Device missing");
    assert_eq!(holder, Some(user_id));
}
