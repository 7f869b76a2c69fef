//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;
use super::status::UserStatus;

/// An employee or administrator known to the ledger.
///
/// Credentials are not stored here; the row only resolves an
/// authenticated principal to a role and an activity flag.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Employee number, unique across the organization.
    pub employee_id: String,
    /// Display name.
    pub username: String,
    /// Email address (optional).
    pub email: Option<String>,
    /// Role used for admin checks.
    pub role: UserRole,
    /// Account status.
    pub status: UserStatus,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Check if this user has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Check if the user may act on the ledger right now.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Employee number.
    pub employee_id: String,
    /// Display name.
    pub username: String,
    /// Email address (optional).
    pub email: Option<String>,
    /// Assigned role.
    pub role: UserRole,
}
