//! Shared test helpers for integration tests.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use tokio::sync::{Mutex, MutexGuard};
use tower::ServiceExt;
use uuid::Uuid;

use tabaudit_api::{AppState, build_app};
use tabaudit_auth::JwtEncoder;
use tabaudit_core::config::AppConfig;
use tabaudit_database::DatabasePool;
use tabaudit_database::migration::reset_database;
use tabaudit_database::repositories::UserRepository;
use tabaudit_entity::user::{CreateUser, UserRole};

/// Every test resets the shared schema, so they take turns.
static DB_LOCK: Mutex<()> = Mutex::const_new(());

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Database pool for direct queries
    pub db_pool: PgPool,
    encoder: JwtEncoder,
    users: UserRepository,
    _guard: MutexGuard<'static, ()>,
}

impl TestApp {
    /// Create a test application on a freshly reset database, or `None`
    /// when no test database is configured.
    pub async fn try_new() -> Option<Self> {
        let Ok(url) = std::env::var("TABAUDIT_TEST_DATABASE_URL") else {
            eprintln!("TABAUDIT_TEST_DATABASE_URL not set; skipping");
            return None;
        };

        let guard = DB_LOCK.lock().await;
        let mut config = AppConfig::with_database_url(url);
        config.database.max_connections = 20;

        let db = DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database");
        let db_pool = db.into_pool();
        reset_database(&db_pool)
            .await
            .expect("Failed to reset test database");

        let encoder = JwtEncoder::new(&config.auth);
        let users = UserRepository::new(db_pool.clone());
        let state = AppState::new(config, db_pool.clone()).expect("Failed to build state");

        Some(Self {
            router: build_app(state),
            db_pool,
            encoder,
            users,
            _guard: guard,
        })
    }

    /// Create a user and return a bearer token for them.
    pub async fn create_user(&self, employee_id: &str, role: UserRole) -> (Uuid, String) {
        let user = self
            .users
            .create(&CreateUser {
                employee_id: employee_id.to_string(),
                username: format!("User {employee_id}"),
                email: None,
                role,
            })
            .await
            .expect("Failed to create test user");
        let token = self.encoder.issue(&user).expect("Failed to issue token");
        (user.id, token)
    }

    /// Create a tab type through the admin API and return its id.
    pub async fn create_tab(&self, admin_token: &str, name: &str, quantity: i32, limit: i32) -> Uuid {
        let response = self
            .request(
                "POST",
                "/api/admin/add-tab",
                Some(serde_json::json!({ "name": name, "quantity": quantity, "limit": limit })),
                Some(admin_token),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "add-tab failed: {:?}", response.body);

        sqlx::query_scalar::<_, Uuid>("SELECT id FROM tab_types WHERE name = $1")
            .bind(name)
            .fetch_one(&self.db_pool)
            .await
            .expect("Tab type missing after add-tab")
    }

    /// Register a device through the admin API.
    pub async fn provision_device(&self, admin_token: &str, tab_type_id: Uuid, serial: &str) -> Uuid {
        let response = self
            .request(
                "POST",
                "/api/admin/devices",
                Some(serde_json::json!({
                    "tab_type_id": tab_type_id,
                    "serial_number": serial,
                    "scan_code": format!("SCAN-{serial}"),
                })),
                Some(admin_token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "provision failed: {:?}", response.body);
        response.body["id"]
            .as_str()
            .and_then(|id| Uuid::parse_str(id).ok())
            .expect("No device id in response")
    }

    /// Current stock of a tab type.
    pub async fn stock_of(&self, tab_type_id: Uuid) -> i32 {
        sqlx::query_scalar::<_, i32>("SELECT stock_remaining FROM tab_types WHERE id = $1")
            .bind(tab_type_id)
            .fetch_one(&self.db_pool)
            .await
            .expect("Tab type missing")
    }

    /// Status of a device, as stored.
    pub async fn device_status(&self, device_id: Uuid) -> String {
        sqlx::query_scalar::<_, String>("SELECT status::text FROM tablet_devices WHERE id = $1")
            .bind(device_id)
            .fetch_one(&self.db_pool)
            .await
            .expect("Device missing")
    }

    /// Newest unverified return code for a device.
    pub async fn pending_return_code(&self, device_id: Uuid) -> String {
        sqlx::query_scalar::<_, String>(
            "SELECT code FROM return_verifications \
             WHERE device_id = $1 AND NOT verified ORDER BY created_at DESC LIMIT 1",
        )
        .bind(device_id)
        .fetch_one(&self.db_pool)
        .await
        .expect("No pending return code")
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The machine-readable error code, if the body carries one.
    pub fn code(&self) -> Option<&str> {
        self.body.get("code").and_then(Value::as_str)
    }
}
