//! Role-to-permission mapping definitions.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use tabaudit_entity::user::UserRole;

/// A ledger operation guarded by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemPermission {
    // Self-service
    /// Log or return consumable tabs.
    TabCheckIn,
    /// Take and hand back devices.
    DeviceBorrow,
    /// Read one's own possession and history.
    SelfView,

    // Administration
    /// Verify a return on behalf of the holder.
    ReturnVerifyAny,
    /// Add stock, create tab types, edit limits.
    InventoryManage,
    /// Register physical devices.
    DeviceProvision,
    /// Issue assignment codes.
    OtpIssue,
    /// Read dashboards, statistics and all usage logs.
    ReportView,
    /// Search the audit trail.
    AuditView,
}

/// Defines the mapping from each role to its set of allowed permissions.
#[derive(Debug, Clone)]
pub struct RbacPolicies {
    policies: HashMap<UserRole, HashSet<SystemPermission>>,
}

impl RbacPolicies {
    /// Creates the default policy set.
    pub fn new() -> Self {
        let user: HashSet<SystemPermission> = [
            SystemPermission::TabCheckIn,
            SystemPermission::DeviceBorrow,
            SystemPermission::SelfView,
        ]
        .into_iter()
        .collect();

        // Admins can do everything a user can, plus administration.
        let mut admin = user.clone();
        admin.extend([
            SystemPermission::ReturnVerifyAny,
            SystemPermission::InventoryManage,
            SystemPermission::DeviceProvision,
            SystemPermission::OtpIssue,
            SystemPermission::ReportView,
            SystemPermission::AuditView,
        ]);

        let mut policies = HashMap::new();
        policies.insert(UserRole::User, user);
        policies.insert(UserRole::Admin, admin);
        Self { policies }
    }

    /// Returns the set of permissions for the given role.
    pub fn permissions_for_role(&self, role: &UserRole) -> HashSet<SystemPermission> {
        self.policies.get(role).cloned().unwrap_or_default()
    }

    /// Checks whether the given role has the specified permission.
    pub fn has_permission(&self, role: &UserRole, permission: &SystemPermission) -> bool {
        self.policies
            .get(role)
            .map(|perms| perms.contains(permission))
            .unwrap_or(false)
    }
}

impl Default for RbacPolicies {
    fn default() -> Self {
        Self::new()
    }
}
