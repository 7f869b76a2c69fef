//! Consumable check-in: log and return with stock and daily limits.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use tabaudit_auth::rbac::{RbacEnforcer, SystemPermission};
use tabaudit_core::config::LedgerConfig;
use tabaudit_core::error::{AppError, RuleViolation};
use tabaudit_core::result::AppResult;
use tabaudit_database::TransactionManager;
use tabaudit_database::repositories::{DeviceRepository, TabRepository, UsageRepository};
use tabaudit_entity::report::{HeldDevice, PossessedTab};
use tabaudit_entity::tab::TabType;
use tabaudit_entity::usage::LedgerAction;

use super::rules;
use crate::clock::DayWindow;
use crate::context::RequestContext;

/// A check-in request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RecordUsage {
    /// Tab type to log or return.
    pub tab_type_id: Uuid,
    /// Direction.
    pub action: LedgerAction,
    /// Units, at least 1.
    pub quantity: i32,
}

/// Outcome of an accepted check-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageReceipt {
    /// Confirmation text.
    pub message: String,
    /// Stock left after the operation.
    pub remaining_stock: i32,
    /// Ledger timestamp.
    pub timestamp: DateTime<Utc>,
}

/// What the caller currently holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Possession {
    /// Consumable tab types with a positive balance.
    pub tabs: Vec<PossessedTab>,
    /// Devices assigned or pending return.
    pub devices: Vec<HeldDevice>,
}

/// One line of the caller's recent activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Tab type name.
    pub tab_name: String,
    /// `"Logged"` or `"Returned"`.
    pub action: String,
    /// Units moved.
    pub quantity: i32,
    /// When.
    pub timestamp: DateTime<Utc>,
}

/// Service for the consumable ledger.
#[derive(Debug, Clone)]
pub struct LedgerService {
    tx: TransactionManager,
    tab_repo: Arc<TabRepository>,
    usage_repo: Arc<UsageRepository>,
    device_repo: Arc<DeviceRepository>,
    rbac: Arc<RbacEnforcer>,
    window: DayWindow,
    config: LedgerConfig,
}

impl LedgerService {
    /// Creates a new ledger service.
    pub fn new(
        tx: TransactionManager,
        tab_repo: Arc<TabRepository>,
        usage_repo: Arc<UsageRepository>,
        device_repo: Arc<DeviceRepository>,
        rbac: Arc<RbacEnforcer>,
        window: DayWindow,
        config: LedgerConfig,
    ) -> Self {
        Self {
            tx,
            tab_repo,
            usage_repo,
            device_repo,
            rbac,
            window,
            config,
        }
    }

    /// Lists tab types available for check-in.
    pub async fn list_tabs(&self, ctx: &RequestContext) -> AppResult<Vec<TabType>> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::TabCheckIn)?;
        self.tab_repo.find_all().await
    }

    /// Log or return consumable units.
    ///
    /// Runs in one transaction holding the tab row lock from the first
    /// read to the commit: the stock counter and the ledger entry change
    /// together or not at all, and concurrent check-ins of the same tab
    /// type are serialized.
    pub async fn record_usage(
        &self,
        ctx: &RequestContext,
        req: RecordUsage,
    ) -> AppResult<UsageReceipt> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::TabCheckIn)?;

        if req.quantity < 1 {
            return Err(AppError::validation("Quantity must be at least 1"));
        }

        let mut tx = self.tx.begin().await?;

        let tab = self
            .tab_repo
            .lock_by_id(&mut tx, req.tab_type_id)
            .await?
            .ok_or_else(|| AppError::rule(RuleViolation::TabNotFound))?;

        match req.action {
            LedgerAction::Log => {
                let since = self.window.day_start(Utc::now());
                let taken_today = self
                    .usage_repo
                    .sum_logged_since(&mut tx, ctx.user_id, tab.id, since)
                    .await?;
                rules::check_log(
                    tab.stock_remaining,
                    taken_today,
                    tab.daily_limit_per_user,
                    req.quantity,
                )?;
            }
            LedgerAction::Return => {
                let balance = self.usage_repo.balance(&mut tx, ctx.user_id, tab.id).await?;
                rules::check_return(balance, req.quantity)?;
            }
        }

        let delta = req.action.signed(req.quantity);
        let remaining_stock = self.tab_repo.adjust_stock(&mut tx, tab.id, -delta).await?;
        let entry = self
            .usage_repo
            .insert(&mut tx, ctx.user_id, tab.id, delta, &ctx.client())
            .await?;

        self.tx.commit(tx).await?;

        info!(
            user_id = %ctx.user_id,
            tab_type_id = %tab.id,
            action = %req.action,
            quantity = req.quantity,
            remaining_stock,
            "Usage recorded"
        );

        Ok(UsageReceipt {
            message: format!("Tab {} successfully!", req.action.past_tense().to_lowercase()),
            remaining_stock,
            timestamp: entry.timestamp,
        })
    }

    /// The caller's positive balances and held devices.
    pub async fn possession(&self, ctx: &RequestContext) -> AppResult<Possession> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::SelfView)?;

        let tabs = self.usage_repo.find_possession(ctx.user_id).await?;
        let devices = self.device_repo.find_held_by(ctx.user_id).await?;
        Ok(Possession { tabs, devices })
    }

    /// The caller's most recent ledger entries.
    pub async fn history(&self, ctx: &RequestContext) -> AppResult<Vec<HistoryEntry>> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::SelfView)?;

        let entries = self
            .usage_repo
            .find_history(ctx.user_id, self.config.history_limit)
            .await?;

        Ok(entries
            .into_iter()
            .map(|e| HistoryEntry {
                tab_name: e.tab_name,
                action: LedgerAction::of_quantity(e.quantity).past_tense().to_string(),
                quantity: e.quantity.abs(),
                timestamp: e.timestamp,
            })
            .collect())
    }
}
