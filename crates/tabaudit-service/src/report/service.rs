//! Dashboard, statistics and filtered log reads.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tabaudit_auth::rbac::{RbacEnforcer, SystemPermission};
use tabaudit_core::config::LedgerConfig;
use tabaudit_core::result::AppResult;
use tabaudit_database::repositories::{
    AssignmentRepository, AuditLogRepository, DeviceRepository, OtpRepository, TabRepository,
    UsageRepository,
};
use tabaudit_entity::assignment::AssignmentLogView;
use tabaudit_entity::audit::AuditLogEntry;
use tabaudit_entity::otp::{AssignmentOtp, PendingReturn};
use tabaudit_entity::report::{ActiveLoan, TabUsageBreakdown};
use tabaudit_entity::tab::TabType;
use tabaudit_entity::usage::UsageLogView;

use crate::clock::DayWindow;
use crate::context::RequestContext;

const RECENT_USAGE_LIMIT: i64 = 10;
const RECENT_AUDIT_LIMIT: i64 = 20;

/// Stock of one tab type with its low-stock flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockLevel {
    pub id: Uuid,
    pub name: String,
    pub stock_remaining: i32,
    pub daily_limit_per_user: i32,
    pub low_stock: bool,
}

impl From<TabType> for StockLevel {
    fn from(tab: TabType) -> Self {
        Self {
            low_stock: tab.is_low_stock(),
            id: tab.id,
            name: tab.name,
            stock_remaining: tab.stock_remaining,
            daily_limit_per_user: tab.daily_limit_per_user,
        }
    }
}

/// Admin dashboard snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub stock: Vec<StockLevel>,
    pub active_loans: Vec<ActiveLoan>,
    pub active_assignments: Vec<AssignmentLogView>,
    pub recent_usage: Vec<UsageLogView>,
    pub recent_audit: Vec<AuditLogEntry>,
    /// Devices awaiting return with the code the admin reads out.
    pub pending_returns: Vec<PendingReturn>,
    pub live_otps: Vec<AssignmentOtp>,
}

/// Aggregate consumption figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageStats {
    pub total_stock: i64,
    pub used_today: i64,
    pub used_this_month: i64,
    pub breakdown: Vec<TabUsageBreakdown>,
}

/// Read-only projections for administrators.
#[derive(Debug, Clone)]
pub struct ReportService {
    tab_repo: Arc<TabRepository>,
    usage_repo: Arc<UsageRepository>,
    device_repo: Arc<DeviceRepository>,
    assignment_repo: Arc<AssignmentRepository>,
    otp_repo: Arc<OtpRepository>,
    audit_repo: Arc<AuditLogRepository>,
    rbac: Arc<RbacEnforcer>,
    window: DayWindow,
    config: LedgerConfig,
}

impl ReportService {
    /// Creates a new report service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tab_repo: Arc<TabRepository>,
        usage_repo: Arc<UsageRepository>,
        device_repo: Arc<DeviceRepository>,
        assignment_repo: Arc<AssignmentRepository>,
        otp_repo: Arc<OtpRepository>,
        audit_repo: Arc<AuditLogRepository>,
        rbac: Arc<RbacEnforcer>,
        window: DayWindow,
        config: LedgerConfig,
    ) -> Self {
        Self {
            tab_repo,
            usage_repo,
            device_repo,
            assignment_repo,
            otp_repo,
            audit_repo,
            rbac,
            window,
            config,
        }
    }

    /// Everything the admin landing page shows.
    pub async fn dashboard(&self, ctx: &RequestContext) -> AppResult<Dashboard> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::ReportView)?;

        let stock = self
            .tab_repo
            .find_all()
            .await?
            .into_iter()
            .map(StockLevel::from)
            .collect();

        Ok(Dashboard {
            stock,
            active_loans: self.usage_repo.find_active_loans().await?,
            active_assignments: self.assignment_repo.find_active().await?,
            recent_usage: self.usage_repo.find_recent(RECENT_USAGE_LIMIT).await?,
            recent_audit: self.audit_repo.find_recent(RECENT_AUDIT_LIMIT).await?,
            pending_returns: self.device_repo.find_pending_returns().await?,
            live_otps: self.otp_repo.find_live_assignments().await?,
        })
    }

    /// Stock and consumption totals for today and this month.
    pub async fn stats(&self, ctx: &RequestContext) -> AppResult<UsageStats> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::ReportView)?;

        let now = Utc::now();
        let day_start = self.window.day_start(now);
        let month_start = self.window.month_start(now);

        let totals = self.usage_repo.usage_totals(day_start, month_start).await?;
        Ok(UsageStats {
            total_stock: self.tab_repo.total_stock().await?,
            used_today: totals.used_today,
            used_this_month: totals.used_this_month,
            breakdown: self.usage_repo.breakdown(day_start, month_start).await?,
        })
    }

    /// Recent ledger entries, filtered by employee number or tab name
    /// when a search term is given.
    pub async fn logs(
        &self,
        ctx: &RequestContext,
        search: Option<&str>,
    ) -> AppResult<Vec<UsageLogView>> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::ReportView)?;

        match search.map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => self.usage_repo.search(term, self.config.search_limit).await,
            None => self.usage_repo.find_recent(self.config.search_limit).await,
        }
    }
}
