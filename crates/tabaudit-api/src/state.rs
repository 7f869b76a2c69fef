//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use tabaudit_auth::jwt::JwtDecoder;
use tabaudit_auth::rbac::RbacEnforcer;
use tabaudit_core::config::AppConfig;
use tabaudit_core::result::AppResult;
use tabaudit_database::TransactionManager;
use tabaudit_database::repositories::{
    AssignmentRepository, AuditLogRepository, DeviceRepository, OtpRepository, TabRepository,
    UsageRepository, UserRepository,
};
use tabaudit_service::{
    AssignmentService, AuditRecorder, DayWindow, InventoryService, LedgerService, OtpIssuer,
    ReportService, UserService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool
    pub db_pool: PgPool,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    pub user_service: Arc<UserService>,
    pub ledger_service: Arc<LedgerService>,
    pub assignment_service: Arc<AssignmentService>,
    pub inventory_service: Arc<InventoryService>,
    pub report_service: Arc<ReportService>,
    pub audit_recorder: Arc<AuditRecorder>,
}

impl AppState {
    /// Wire repositories and services over `db_pool`.
    pub fn new(config: AppConfig, db_pool: PgPool) -> AppResult<Self> {
        let window = DayWindow::new(config.ledger.day_start_offset_minutes)?;
        let tx = TransactionManager::new(db_pool.clone(), config.database.lock_timeout_ms);

        // ── Repositories ─────────────────────────────────────────
        let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
        let tab_repo = Arc::new(TabRepository::new(db_pool.clone()));
        let usage_repo = Arc::new(UsageRepository::new(db_pool.clone()));
        let device_repo = Arc::new(DeviceRepository::new(db_pool.clone()));
        let assignment_repo = Arc::new(AssignmentRepository::new(db_pool.clone()));
        let otp_repo = Arc::new(OtpRepository::new(db_pool.clone()));
        let audit_repo = Arc::new(AuditLogRepository::new(db_pool.clone()));

        // ── Auth ─────────────────────────────────────────────────
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        let rbac = Arc::new(RbacEnforcer::new());

        // ── Services ─────────────────────────────────────────────
        let otp_issuer = Arc::new(OtpIssuer::new(Arc::clone(&otp_repo), config.otp.clone()));
        let audit_recorder = Arc::new(AuditRecorder::new(
            Arc::clone(&audit_repo),
            Arc::clone(&rbac),
        ));
        let user_service = Arc::new(UserService::new(Arc::clone(&user_repo)));
        let ledger_service = Arc::new(LedgerService::new(
            tx.clone(),
            Arc::clone(&tab_repo),
            Arc::clone(&usage_repo),
            Arc::clone(&device_repo),
            Arc::clone(&rbac),
            window,
            config.ledger.clone(),
        ));
        let assignment_service = Arc::new(AssignmentService::new(
            tx.clone(),
            Arc::clone(&device_repo),
            Arc::clone(&tab_repo),
            Arc::clone(&assignment_repo),
            Arc::clone(&otp_issuer),
            Arc::clone(&rbac),
            window,
        ));
        let inventory_service = Arc::new(InventoryService::new(
            tx,
            Arc::clone(&tab_repo),
            Arc::clone(&device_repo),
            Arc::clone(&otp_issuer),
            Arc::clone(&audit_recorder),
            Arc::clone(&rbac),
        ));
        let report_service = Arc::new(ReportService::new(
            tab_repo,
            usage_repo,
            device_repo,
            assignment_repo,
            otp_repo,
            audit_repo,
            rbac,
            window,
            config.ledger.clone(),
        ));

        Ok(Self {
            config: Arc::new(config),
            db_pool,
            jwt_decoder,
            user_service,
            ledger_service,
            assignment_service,
            inventory_service,
            report_service,
            audit_recorder,
        })
    }
}
