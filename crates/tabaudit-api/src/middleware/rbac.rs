//! RBAC helpers for role-based route guarding.

use tabaudit_core::error::AppError;

use crate::extractors::AuthUser;

/// Checks that the authenticated user has the Admin role.
pub fn require_admin(auth: &AuthUser) -> Result<(), AppError> {
    if !auth.is_admin() {
        return Err(AppError::authorization("Admin access required"));
    }
    Ok(())
}
