//! Stock, limits, device provisioning and assignment code issuance.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use tabaudit_auth::rbac::{RbacEnforcer, SystemPermission};
use tabaudit_core::error::{AppError, RuleViolation};
use tabaudit_core::result::AppResult;
use tabaudit_database::TransactionManager;
use tabaudit_database::repositories::{DeviceRepository, TabRepository};
use tabaudit_entity::audit::AuditAction;
use tabaudit_entity::device::{CreateDevice, DeviceStatus, ReturnCondition, TabletDevice};
use tabaudit_entity::tab::{CreateTabType, DEFAULT_LOW_STOCK_THRESHOLD, TabType};

use crate::audit::AuditRecorder;
use crate::context::RequestContext;
use crate::otp::OtpIssuer;

/// Result of adding stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockUpdate {
    /// Confirmation text.
    pub message: String,
    /// Stock after the update.
    pub new_stock: i32,
}

/// A freshly issued assignment code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedOtp {
    /// The digits to hand to the borrower.
    pub otp_code: String,
    /// End of validity.
    pub expires_at: DateTime<Utc>,
}

/// Input for device provisioning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionDevice {
    /// Owning tab type.
    pub tab_type_id: Uuid,
    /// Serial number.
    pub serial_number: String,
    /// Label scan code.
    pub scan_code: String,
    /// Initial condition; "Good" when absent.
    pub condition: Option<String>,
}

/// Admin-only inventory mutations. Each one is audited after it commits.
#[derive(Debug, Clone)]
pub struct InventoryService {
    tx: TransactionManager,
    tab_repo: Arc<TabRepository>,
    device_repo: Arc<DeviceRepository>,
    otp_issuer: Arc<OtpIssuer>,
    audit: Arc<AuditRecorder>,
    rbac: Arc<RbacEnforcer>,
}

impl InventoryService {
    /// Creates a new inventory service.
    pub fn new(
        tx: TransactionManager,
        tab_repo: Arc<TabRepository>,
        device_repo: Arc<DeviceRepository>,
        otp_issuer: Arc<OtpIssuer>,
        audit: Arc<AuditRecorder>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            tx,
            tab_repo,
            device_repo,
            otp_issuer,
            audit,
            rbac,
        }
    }

    /// Create a tab type, or add units to an existing one.
    ///
    /// The limit only applies when the tab type is created; use
    /// [`InventoryService::set_limit`] to change it afterwards.
    pub async fn add_tab(
        &self,
        ctx: &RequestContext,
        name: &str,
        quantity: i32,
        daily_limit: i32,
    ) -> AppResult<StockUpdate> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::InventoryManage)?;

        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Tab name is required."));
        }
        if quantity < 0 {
            return Err(AppError::validation("Quantity cannot be negative"));
        }
        if daily_limit < 0 {
            return Err(AppError::validation("Daily limit cannot be negative"));
        }

        let mut tx = self.tx.begin().await?;

        let created = self
            .tab_repo
            .create_if_absent(
                &mut tx,
                &CreateTabType {
                    name: name.to_string(),
                    daily_limit_per_user: daily_limit,
                    stock_remaining: quantity,
                    low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
                },
            )
            .await?;

        let (new_stock, description) = match created {
            Some(tab) => (
                tab.stock_remaining,
                format!("Created new tab '{name}' with {quantity} units and limit {daily_limit}."),
            ),
            None => {
                let tab = self
                    .tab_repo
                    .lock_by_name(&mut tx, name)
                    .await?
                    .ok_or_else(|| AppError::rule(RuleViolation::TabNotFound))?;
                if tab.stock_remaining.checked_add(quantity).is_none() {
                    return Err(AppError::validation(format!(
                        "Adding {quantity} units to '{name}' exceeds the maximum stock"
                    )));
                }
                let new_stock = self.tab_repo.adjust_stock(&mut tx, tab.id, quantity).await?;
                (
                    new_stock,
                    format!("Added {quantity} units to '{name}'. New total: {new_stock}."),
                )
            }
        };

        self.tx.commit(tx).await?;

        info!(admin_id = %ctx.user_id, tab = name, quantity, new_stock, "Inventory updated");
        self.audit
            .record(ctx, AuditAction::InventoryUpdate, description)
            .await;

        Ok(StockUpdate {
            message: format!("Successfully updated {name}"),
            new_stock,
        })
    }

    /// Change the per-user daily limit of a tab type.
    pub async fn set_limit(
        &self,
        ctx: &RequestContext,
        tab_type_id: Uuid,
        daily_limit: i32,
    ) -> AppResult<TabType> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::InventoryManage)?;

        if daily_limit < 0 {
            return Err(AppError::validation("Daily limit cannot be negative"));
        }

        let mut tx = self.tx.begin().await?;
        let current = self
            .tab_repo
            .lock_by_id(&mut tx, tab_type_id)
            .await?
            .ok_or_else(|| AppError::rule(RuleViolation::TabNotFound))?;
        let updated = self
            .tab_repo
            .update_limit(&mut tx, tab_type_id, daily_limit)
            .await?;
        self.tx.commit(tx).await?;

        info!(
            admin_id = %ctx.user_id,
            tab_type_id = %tab_type_id,
            old_limit = current.daily_limit_per_user,
            new_limit = daily_limit,
            "Daily limit changed"
        );
        self.audit
            .record(
                ctx,
                AuditAction::LimitChange,
                format!(
                    "Changed daily limit of '{}' from {} to {}.",
                    updated.name, current.daily_limit_per_user, daily_limit
                ),
            )
            .await;

        Ok(updated)
    }

    /// Register a physical device in the `available` state.
    pub async fn provision_device(
        &self,
        ctx: &RequestContext,
        req: ProvisionDevice,
    ) -> AppResult<TabletDevice> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::DeviceProvision)?;

        let serial_number = req.serial_number.trim();
        let scan_code = req.scan_code.trim();
        if serial_number.is_empty() || scan_code.is_empty() {
            return Err(AppError::validation(
                "Serial number and scan code are required",
            ));
        }

        let tab = self
            .tab_repo
            .find_by_id(req.tab_type_id)
            .await?
            .ok_or_else(|| AppError::rule(RuleViolation::TabNotFound))?;

        let condition = ReturnCondition::from_optional(req.condition.as_deref());
        let device = self
            .device_repo
            .create(&CreateDevice {
                tab_type_id: tab.id,
                serial_number: serial_number.to_string(),
                scan_code: scan_code.to_string(),
                condition: condition.as_str().to_string(),
            })
            .await?;

        info!(
            admin_id = %ctx.user_id,
            device_id = %device.id,
            serial_number = %device.serial_number,
            "Device provisioned"
        );
        self.audit
            .record(
                ctx,
                AuditAction::DeviceProvisioned,
                format!(
                    "Provisioned device '{}' (scan code '{}') for '{}'.",
                    device.serial_number, device.scan_code, tab.name
                ),
            )
            .await;

        Ok(device)
    }

    /// Issue an assignment code for a tab type that has an available
    /// device.
    pub async fn generate_assignment_otp(
        &self,
        ctx: &RequestContext,
        tab_type_id: Uuid,
    ) -> AppResult<IssuedOtp> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::OtpIssue)?;

        let tab = self
            .tab_repo
            .find_by_id(tab_type_id)
            .await?
            .ok_or_else(|| AppError::rule(RuleViolation::TabNotFound))?;

        if self.device_repo.count_available(tab.id).await? == 0 {
            return Err(AppError::rule(RuleViolation::NoDeviceAvailable));
        }

        let mut tx = self.tx.begin().await?;
        let otp = self
            .otp_issuer
            .issue_assignment_code(&mut tx, tab.id, ctx.actor_id())
            .await?;
        self.tx.commit(tx).await?;

        info!(
            admin_id = %ctx.user_id,
            tab_type_id = %tab.id,
            expires_at = %otp.expires_at,
            "Assignment code issued"
        );
        self.audit
            .record(
                ctx,
                AuditAction::OtpIssued,
                format!("Issued assignment code for '{}'.", tab.name),
            )
            .await;

        Ok(IssuedOtp {
            otp_code: otp.code,
            expires_at: otp.expires_at,
        })
    }

    /// List devices, optionally filtered.
    pub async fn list_devices(
        &self,
        ctx: &RequestContext,
        tab_type_id: Option<Uuid>,
        status: Option<DeviceStatus>,
    ) -> AppResult<Vec<TabletDevice>> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::ReportView)?;
        self.device_repo.find_all(tab_type_id, status).await
    }
}
