//! Device assignment: assign, initiate return, verify return.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use tracing::{info, warn};
use uuid::Uuid;

use tabaudit_auth::rbac::{RbacEnforcer, SystemPermission};
use tabaudit_core::error::{AppError, ErrorKind, RuleViolation};
use tabaudit_core::result::AppResult;
use tabaudit_database::TransactionManager;
use tabaudit_database::repositories::{AssignmentRepository, DeviceRepository, TabRepository};
use tabaudit_entity::device::{DeviceStatus, ReturnCondition, TabletDevice};

use crate::clock::DayWindow;
use crate::context::RequestContext;
use crate::ledger::rules;
use crate::otp::OtpIssuer;

/// How the borrower identifies the device to take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignTarget {
    /// A serial number or label scan code.
    Scan(String),
    /// An assignment code issued by an admin for a tab type.
    Otp(String),
}

/// Outcome of a successful assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentReceipt {
    /// Confirmation text.
    pub message: String,
    /// The device handed over.
    pub device_id: Uuid,
    /// Its serial number.
    pub serial_number: String,
}

/// Outcome of a return initiation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnReceipt {
    /// Instructions for the borrower.
    pub message: String,
    /// Until when the verification code can be used.
    pub expires_at: DateTime<Utc>,
}

/// Drives devices through `available → assigned → return_pending →
/// available | repair`.
///
/// Every transition re-checks its preconditions inside the transaction
/// that writes it, holding the device row lock, and the status write is
/// itself conditional on the expected current status.
#[derive(Debug, Clone)]
pub struct AssignmentService {
    tx: TransactionManager,
    device_repo: Arc<DeviceRepository>,
    tab_repo: Arc<TabRepository>,
    assignment_repo: Arc<AssignmentRepository>,
    otp_issuer: Arc<OtpIssuer>,
    rbac: Arc<RbacEnforcer>,
    window: DayWindow,
}

impl AssignmentService {
    /// Creates a new assignment service.
    pub fn new(
        tx: TransactionManager,
        device_repo: Arc<DeviceRepository>,
        tab_repo: Arc<TabRepository>,
        assignment_repo: Arc<AssignmentRepository>,
        otp_issuer: Arc<OtpIssuer>,
        rbac: Arc<RbacEnforcer>,
        window: DayWindow,
    ) -> Self {
        Self {
            tx,
            device_repo,
            tab_repo,
            assignment_repo,
            otp_issuer,
            rbac,
            window,
        }
    }

    /// Hand a device to the caller.
    pub async fn assign(
        &self,
        ctx: &RequestContext,
        target: AssignTarget,
    ) -> AppResult<AssignmentReceipt> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::DeviceBorrow)?;

        let mut tx = self.tx.begin().await?;

        let device = match &target {
            AssignTarget::Scan(code) => {
                let code = code.trim();
                if code.is_empty() {
                    return Err(AppError::validation("Device ID is required"));
                }
                let device = self
                    .device_repo
                    .lock_by_code(&mut tx, code)
                    .await?
                    .ok_or_else(|| AppError::rule(RuleViolation::DeviceNotFound))?;
                if !device.status.can_assign() {
                    return Err(AppError::rule(RuleViolation::DeviceUnavailable));
                }
                device
            }
            AssignTarget::Otp(code) => {
                let otp = self
                    .otp_issuer
                    .consume_assignment_code(&mut tx, code, ctx.user_id)
                    .await?;
                // Dropping the transaction on this error also restores the code.
                self.device_repo
                    .lock_first_available(&mut tx, otp.tab_type_id)
                    .await?
                    .ok_or_else(|| AppError::rule(RuleViolation::NoDeviceAvailable))?
            }
        };

        self.hand_over(&mut tx, ctx, &device).await?;
        self.tx.commit(tx).await?;

        info!(
            user_id = %ctx.user_id,
            device_id = %device.id,
            serial_number = %device.serial_number,
            via_otp = matches!(target, AssignTarget::Otp(_)),
            "Device assigned"
        );

        Ok(AssignmentReceipt {
            message: format!("Device {} assigned successfully.", device.serial_number),
            device_id: device.id,
            serial_number: device.serial_number,
        })
    }

    async fn hand_over(
        &self,
        conn: &mut PgConnection,
        ctx: &RequestContext,
        device: &TabletDevice,
    ) -> AppResult<()> {
        let tab = self
            .tab_repo
            .lock_by_id(&mut *conn, device.tab_type_id)
            .await?
            .ok_or_else(|| AppError::rule(RuleViolation::TabNotFound))?;

        self.assignment_repo
            .lock_user_tab(&mut *conn, ctx.user_id, tab.id)
            .await?;
        let since = self.window.day_start(Utc::now());
        let issued_today = self
            .assignment_repo
            .count_issued_since(&mut *conn, ctx.user_id, tab.id, since)
            .await?;
        rules::check_assignment_quota(issued_today, tab.daily_limit_per_user)?;

        if !self
            .device_repo
            .mark_assigned(&mut *conn, device.id, ctx.user_id)
            .await?
        {
            return Err(AppError::rule(RuleViolation::DeviceUnavailable));
        }

        match self
            .assignment_repo
            .create(conn, ctx.user_id, device.id, tab.id, &ctx.client())
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if e.kind == ErrorKind::Conflict => {
                Err(AppError::rule(RuleViolation::DeviceUnavailable))
            }
            Err(e) => Err(e),
        }
    }

    /// Ask to hand back a held device. Issues a return verification code
    /// that an admin reads out from the dashboard.
    pub async fn initiate_return(
        &self,
        ctx: &RequestContext,
        device_code: &str,
    ) -> AppResult<ReturnReceipt> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::DeviceBorrow)?;

        let mut tx = self.tx.begin().await?;

        let device = self
            .device_repo
            .lock_by_code(&mut tx, device_code.trim())
            .await?
            .ok_or_else(|| AppError::rule(RuleViolation::DeviceNotFound))?;

        if !device.status.can_initiate_return() || !device.is_held_by(ctx.user_id) {
            return Err(AppError::rule(RuleViolation::NotYoursOrNotAssigned));
        }

        let verification = self
            .otp_issuer
            .issue_return_code(&mut tx, device.id, ctx.user_id)
            .await?;

        if !self
            .device_repo
            .mark_return_pending(&mut tx, device.id, ctx.user_id)
            .await?
        {
            return Err(AppError::rule(RuleViolation::NotYoursOrNotAssigned));
        }

        self.tx.commit(tx).await?;

        info!(
            user_id = %ctx.user_id,
            device_id = %device.id,
            reinitiated = device.status == DeviceStatus::ReturnPending,
            expires_at = %verification.expires_at,
            "Device return initiated"
        );

        Ok(ReturnReceipt {
            message: "Return initiated. Ask an admin for the verification code.".to_string(),
            expires_at: verification.expires_at,
        })
    }

    /// Confirm a return with its verification code.
    ///
    /// The holder or an admin may verify. A condition other than "Good"
    /// sends the device to repair.
    pub async fn verify_return(
        &self,
        ctx: &RequestContext,
        device_code: &str,
        otp_code: &str,
        condition: Option<&str>,
    ) -> AppResult<String> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::DeviceBorrow)?;

        let mut tx = self.tx.begin().await?;

        let device = self
            .device_repo
            .lock_by_code(&mut tx, device_code.trim())
            .await?
            .ok_or_else(|| AppError::rule(RuleViolation::DeviceNotFound))?;

        let holder = match device.assigned_to {
            Some(holder) if device.status.can_verify_return() => holder,
            _ => return Err(AppError::rule(RuleViolation::NotYoursOrNotAssigned)),
        };
        let may_verify = holder == ctx.user_id
            || self
                .rbac
                .has_permission(&ctx.role, &SystemPermission::ReturnVerifyAny);
        if !may_verify {
            return Err(AppError::rule(RuleViolation::NotYoursOrNotAssigned));
        }

        self.otp_issuer
            .consume_return_code(&mut tx, device.id, holder, otp_code)
            .await?;

        let condition = ReturnCondition::from_optional(condition);
        let next = DeviceStatus::after_return(&condition);
        if !self
            .device_repo
            .complete_return(&mut tx, device.id, next, condition.as_str())
            .await?
        {
            return Err(AppError::rule(RuleViolation::NotYoursOrNotAssigned));
        }

        let closed = self
            .assignment_repo
            .close_active(&mut tx, device.id, holder, condition.as_str())
            .await?;
        if closed.is_none() {
            warn!(
                device_id = %device.id,
                holder = %holder,
                "No active assignment log to close for returned device"
            );
        }

        self.tx.commit(tx).await?;

        info!(
            device_id = %device.id,
            holder = %holder,
            verified_by = %ctx.user_id,
            condition = condition.as_str(),
            status = %next,
            "Device return verified"
        );

        Ok("Device returned successfully.".to_string())
    }
}
