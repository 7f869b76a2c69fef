//! User lookup and management.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use tabaudit_core::error::AppError;
use tabaudit_core::result::AppResult;
use tabaudit_database::repositories::UserRepository;
use tabaudit_entity::user::{CreateUser, User, UserStatus};

/// Resolves token subjects to users and maintains the user table.
#[derive(Debug, Clone)]
pub struct UserService {
    user_repo: Arc<UserRepository>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(user_repo: Arc<UserRepository>) -> Self {
        Self { user_repo }
    }

    /// Resolve an authenticated subject to an active user.
    ///
    /// Unknown and deactivated users are rejected the same way so a
    /// token cannot reveal which accounts exist.
    pub async fn resolve_principal(&self, user_id: Uuid) -> AppResult<User> {
        match self.user_repo.find_by_id(user_id).await? {
            Some(user) if user.is_active() => Ok(user),
            _ => Err(AppError::authentication("Account not found or inactive")),
        }
    }

    /// Look up a user by employee number.
    pub async fn find_by_employee_id(&self, employee_id: &str) -> AppResult<User> {
        self.user_repo
            .find_by_employee_id(employee_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User '{employee_id}' not found")))
    }

    /// Register a user.
    pub async fn create(&self, data: CreateUser) -> AppResult<User> {
        let employee_id = data.employee_id.trim();
        let username = data.username.trim();
        if employee_id.is_empty() || username.is_empty() {
            return Err(AppError::validation(
                "Employee ID and username are required",
            ));
        }

        let user = self
            .user_repo
            .create(&CreateUser {
                employee_id: employee_id.to_string(),
                username: username.to_string(),
                email: data.email.filter(|e| !e.trim().is_empty()),
                role: data.role,
            })
            .await?;

        info!(user_id = %user.id, employee_id = %user.employee_id, role = %user.role, "User created");
        Ok(user)
    }

    /// All users.
    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.user_repo.find_all().await
    }

    /// Activate or deactivate a user.
    pub async fn set_status(&self, user_id: Uuid, status: UserStatus) -> AppResult<User> {
        let user = self
            .user_repo
            .update_status(user_id, status)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;
        info!(user_id = %user.id, status = %status, "User status changed");
        Ok(user)
    }
}
