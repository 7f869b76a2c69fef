//! Integration tests for admin inventory, reporting and the audit trail.

use axum::http::StatusCode;
use serde_json::json;

use tabaudit_entity::user::UserRole;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_health() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    let response = app.request("GET", "/api/check-in", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.code(), Some("AUTHENTICATION"));
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    let response = app
        .request("GET", "/api/possession", None, Some("not.a.token"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_inactive_user_is_unauthorized() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (user_id, user) = app.create_user("E001", UserRole::User).await;
    sqlx::query("UPDATE users SET status = 'inactive' WHERE id = $1")
        .bind(user_id)
        .execute(&app.db_pool)
        .await
        .expect("Failed to deactivate user");

    let response = app.request("GET", "/api/possession", None, Some(&user)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_admin_is_forbidden() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, user) = app.create_user("E001", UserRole::User).await;

    for (method, path, body) in [
        ("POST", "/api/admin/add-tab", Some(json!({ "name": "Sneaky Tab", "quantity": 5 }))),
        ("GET", "/api/admin/dashboard", None),
        ("GET", "/api/admin/stats", None),
        ("GET", "/api/admin/logs", None),
        ("GET", "/api/admin/audit", None),
    ] {
        let response = app.request(method, path, body, Some(&user)).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{method} {path}");
    }

    let created: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tab_types")
        .fetch_one(&app.db_pool)
        .await
        .expect("Count failed");
    assert_eq!(created, 0);
}

#[tokio::test]
async fn test_add_tab_creates_then_restocks() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (admin_id, admin) = app.create_user("A001", UserRole::Admin).await;

    let created = app
        .request(
            "POST",
            "/api/admin/add-tab",
            Some(json!({ "name": "Standard Blue Tab", "quantity": 50, "limit": 2 })),
            Some(&admin),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.body["message"], "Successfully updated Standard Blue Tab");
    assert_eq!(created.body["new_stock"], 50);

    let restocked = app
        .request(
            "POST",
            "/api/admin/add-tab",
            Some(json!({ "name": "Standard Blue Tab", "quantity": 10 })),
            Some(&admin),
        )
        .await;
    assert_eq!(restocked.body["new_stock"], 60);

    let audit = app
        .request(
            "GET",
            "/api/admin/audit?action=inventory_update",
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(audit.status, StatusCode::OK);
    assert_eq!(audit.body["total"], 2);
    let newest = &audit.body["items"][0];
    assert_eq!(newest["admin_id"], admin_id.to_string());
    assert_eq!(
        newest["description"],
        "Added 10 units to 'Standard Blue Tab'. New total: 60."
    );
}

#[tokio::test]
async fn test_blank_tab_name_is_rejected() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;

    let response = app
        .request(
            "POST",
            "/api/admin/add-tab",
            Some(json!({ "name": "", "quantity": 5 })),
            Some(&admin),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.code(), Some("VALIDATION"));
}

#[tokio::test]
async fn test_restock_past_maximum_is_rejected() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;
    let tab = app.create_tab(&admin, "Standard Blue Tab", 5, 1).await;

    let response = app
        .request(
            "POST",
            "/api/admin/add-tab",
            Some(json!({ "name": "Standard Blue Tab", "quantity": i32::MAX })),
            Some(&admin),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.code(), Some("VALIDATION"));
    assert_eq!(app.stock_of(tab).await, 5);

    let audit = app
        .request("GET", "/api/admin/audit?action=inventory_update", None, Some(&admin))
        .await;
    assert_eq!(audit.body["total"], 1);
}

#[tokio::test]
async fn test_set_limit_is_audited() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;
    let tab = app.create_tab(&admin, "Premium Red Tab", 50, 1).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/admin/tabs/{tab}/limit"),
            Some(json!({ "daily_limit": 3 })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["daily_limit_per_user"], 3);

    let audit = app
        .request("GET", "/api/admin/audit?action=limit_change", None, Some(&admin))
        .await;
    assert_eq!(audit.body["total"], 1);
    assert_eq!(
        audit.body["items"][0]["description"],
        "Changed daily limit of 'Premium Red Tab' from 1 to 3."
    );
}

#[tokio::test]
async fn test_duplicate_serial_is_a_conflict() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;
    let tab = app.create_tab(&admin, "Tablet Pool", 0, 1).await;
    app.provision_device(&admin, tab, "SN-1").await;

    let response = app
        .request(
            "POST",
            "/api/admin/devices",
            Some(json!({ "tab_type_id": tab, "serial_number": "SN-1", "scan_code": "OTHER" })),
            Some(&admin),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_dashboard_stats_and_logs() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let (_, admin) = app.create_user("A001", UserRole::Admin).await;
    let (_, user) = app.create_user("E042", UserRole::User).await;
    let tab = app.create_tab(&admin, "Standard Blue Tab", 50, 2).await;

    app.request(
        "POST",
        "/api/check-in",
        Some(json!({ "tab_id": tab, "action": "log", "quantity": 2 })),
        Some(&user),
    )
    .await;

    let dashboard = app
        .request("GET", "/api/admin/dashboard", None, Some(&admin))
        .await;
    assert_eq!(dashboard.status, StatusCode::OK);
    assert_eq!(dashboard.body["stock"][0]["stock_remaining"], 48);
    assert_eq!(dashboard.body["active_loans"][0]["employee_id"], "E042");
    assert_eq!(dashboard.body["active_loans"][0]["quantity"], 2);
    assert_eq!(dashboard.body["recent_usage"].as_array().map(Vec::len), Some(1));

    let stats = app.request("GET", "/api/admin/stats", None, Some(&admin)).await;
    assert_eq!(stats.status, StatusCode::OK);
    assert_eq!(stats.body["total_stock"], 48);
    assert_eq!(stats.body["used_today"], 2);
    assert_eq!(stats.body["used_this_month"], 2);

    let hit = app
        .request("GET", "/api/admin/logs?search=E042", None, Some(&admin))
        .await;
    assert_eq!(hit.body.as_array().map(Vec::len), Some(1));

    let miss = app
        .request("GET", "/api/admin/logs?search=nobody", None, Some(&admin))
        .await;
    assert_eq!(miss.body.as_array().map(Vec::len), Some(0));
}
