//! Post-commit audit trail appends.

use std::sync::Arc;

use tracing::error;

use tabaudit_auth::rbac::{RbacEnforcer, SystemPermission};
use tabaudit_core::error::AppError;
use tabaudit_core::types::pagination::{PageRequest, PageResponse};
use tabaudit_database::repositories::AuditLogRepository;
use tabaudit_entity::audit::{AuditAction, AuditLogEntry, AuditSearchFilter, CreateAuditLogEntry};

use crate::context::RequestContext;

/// Appends audit entries for privileged mutations.
///
/// Callers invoke [`AuditRecorder::record`] after their business
/// transaction has committed. A failed append is logged and swallowed so
/// it never undoes or fails the operation it describes.
#[derive(Debug, Clone)]
pub struct AuditRecorder {
    audit_repo: Arc<AuditLogRepository>,
    rbac: Arc<RbacEnforcer>,
}

impl AuditRecorder {
    /// Creates a new audit recorder.
    pub fn new(audit_repo: Arc<AuditLogRepository>, rbac: Arc<RbacEnforcer>) -> Self {
        Self { audit_repo, rbac }
    }

    /// Append an entry attributed to the acting admin.
    pub async fn record(&self, ctx: &RequestContext, action: AuditAction, description: String) {
        let entry = CreateAuditLogEntry {
            admin_id: ctx.actor_id(),
            action,
            description,
        };

        if let Err(e) = self.audit_repo.create(&entry).await {
            error!(
                admin_id = ?entry.admin_id,
                action = %entry.action,
                description = %entry.description,
                error = %e,
                "Failed to record audit entry"
            );
        }
    }

    /// Search the audit trail.
    pub async fn search(
        &self,
        ctx: &RequestContext,
        filter: &AuditSearchFilter,
        page: PageRequest,
    ) -> Result<PageResponse<AuditLogEntry>, AppError> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::AuditView)?;

        self.audit_repo.search(filter, page.normalized()).await
    }
}
