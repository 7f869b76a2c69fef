//! Request context carrying the authenticated principal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tabaudit_database::repositories::ClientInfo;
use tabaudit_entity::user::{User, UserRole};

/// Context for the current authenticated request.
///
/// Extracted by the API layer (or built by the CLI) and passed into
/// service methods so that every operation knows *who* is acting and
/// from *where*.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting user's ID. Nil for operator commands run without a
    /// named admin.
    pub user_id: Uuid,
    /// The acting user's employee number.
    pub employee_id: String,
    /// The acting user's display name.
    pub username: String,
    /// The acting user's current role.
    pub role: UserRole,
    /// IP address of the request origin.
    pub ip_address: Option<String>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context for a resolved user.
    pub fn for_user(user: &User, ip_address: Option<String>, user_agent: Option<String>) -> Self {
        Self {
            user_id: user.id,
            employee_id: user.employee_id.clone(),
            username: user.username.clone(),
            role: user.role,
            ip_address,
            user_agent,
            request_time: Utc::now(),
        }
    }

    /// Creates an admin context for operator commands that name no admin.
    pub fn operator() -> Self {
        Self {
            user_id: Uuid::nil(),
            employee_id: "operator".to_string(),
            username: "operator".to_string(),
            role: UserRole::Admin,
            ip_address: None,
            user_agent: Some("tabaudit-cli".to_string()),
            request_time: Utc::now(),
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// The acting user as a nullable reference for audit and code rows.
    pub fn actor_id(&self) -> Option<Uuid> {
        (!self.user_id.is_nil()).then_some(self.user_id)
    }

    /// Client metadata stored on ledger entries.
    pub fn client(&self) -> ClientInfo {
        ClientInfo {
            ip_address: self.ip_address.clone(),
            device_info: self.user_agent.clone(),
        }
    }
}
