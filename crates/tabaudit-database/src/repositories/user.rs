//! User repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use tabaudit_core::result::AppResult;
use tabaudit_entity::user::{CreateUser, User, UserStatus};

use crate::error::db_error;

/// Repository for principal rows.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find user by id", e))
    }

    /// Find a user by employee number (case-insensitive).
    pub async fn find_by_employee_id(&self, employee_id: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(employee_id) = LOWER($1)")
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find user by employee id", e))
    }

    /// List all users ordered by employee number.
    pub async fn find_all(&self) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY employee_id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list users", e))
    }

    /// Create a new user. A duplicate employee number is a conflict.
    pub async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (employee_id, username, email, role) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&data.employee_id)
        .bind(&data.username)
        .bind(&data.email)
        .bind(data.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create user", e))
    }

    /// Activate or deactivate a user.
    pub async fn update_status(&self, id: Uuid, status: UserStatus) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("UPDATE users SET status = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update user status", e))
    }
}
