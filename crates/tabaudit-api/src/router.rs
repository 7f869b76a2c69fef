//! Route definitions for the TabAudit HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let server = &state.config.server;

    let api_routes = Router::new()
        .merge(health_routes())
        .merge(check_in_routes())
        .merge(device_routes())
        .merge(self_service_routes())
        .merge(admin_routes());

    let cors = middleware::cors::build_cors_layer(&server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(
                    middleware::logging::request_logging,
                ))
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    server.request_timeout_seconds,
                )))
                .layer(DefaultBodyLimit::max(server.body_limit_bytes)),
        )
        .with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Consumable log / return
fn check_in_routes() -> Router<AppState> {
    Router::new().route(
        "/check-in",
        get(handlers::check_in::list_tabs).post(handlers::check_in::check_in),
    )
}

/// Device assignment state machine
fn device_routes() -> Router<AppState> {
    Router::new()
        .route("/assign", post(handlers::device::assign))
        .route("/return/initiate", post(handlers::device::initiate_return))
        .route("/return/verify", post(handlers::device::verify_return))
}

fn self_service_routes() -> Router<AppState> {
    Router::new()
        .route("/possession", get(handlers::user::possession))
        .route("/user/history", get(handlers::user::history))
}

/// Admin endpoints
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/add-tab", post(handlers::admin::inventory::add_tab))
        .route(
            "/admin/tabs/{id}/limit",
            put(handlers::admin::inventory::set_limit),
        )
        .route(
            "/admin/generate-otp",
            post(handlers::admin::inventory::generate_otp),
        )
        .route(
            "/admin/devices",
            get(handlers::admin::devices::list_devices)
                .post(handlers::admin::devices::provision_device),
        )
        .route("/admin/dashboard", get(handlers::admin::reports::dashboard))
        .route("/admin/stats", get(handlers::admin::reports::stats))
        .route("/admin/logs", get(handlers::admin::reports::logs))
        .route("/admin/audit", get(handlers::admin::audit::search_audit))
}
