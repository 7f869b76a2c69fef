//! Audit log entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::action::AuditAction;

/// An immutable record of a privileged mutation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogEntry {
    /// Unique identifier.
    pub id: Uuid,
    /// Acting admin; cleared if the admin row is deleted.
    pub admin_id: Option<Uuid>,
    /// Employee number of the acting admin, when still known.
    pub admin_employee_id: Option<String>,
    /// Action tag, see [`AuditAction`].
    pub action_type: String,
    /// Human-readable description.
    pub description: String,
    /// When the action happened.
    pub timestamp: DateTime<Utc>,
}

/// Data required to append an audit entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditLogEntry {
    /// Acting admin.
    pub admin_id: Option<Uuid>,
    /// Action tag.
    pub action: AuditAction,
    /// Description.
    pub description: String,
}

/// Optional filters for audit search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditSearchFilter {
    /// Only entries with this action.
    pub action: Option<AuditAction>,
    /// Only entries by this admin.
    pub admin_id: Option<Uuid>,
    /// Only entries at or after this instant.
    pub since: Option<DateTime<Utc>>,
}
