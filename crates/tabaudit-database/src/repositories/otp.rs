//! One-time code repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use tabaudit_core::result::AppResult;
use tabaudit_entity::otp::{AssignmentOtp, ReturnVerification};

use crate::error::db_error;

/// Repository for assignment codes and return verifications.
///
/// A code is "live" while it is unconsumed; the store keeps live codes
/// unique, so an insert that collides fails with a conflict.
#[derive(Debug, Clone)]
pub struct OtpRepository {
    pool: PgPool,
}

impl OtpRepository {
    /// Create a new OTP repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ── Assignment codes ──

    /// Whether an unconsumed assignment code with this value exists.
    pub async fn assignment_code_is_live(
        &self,
        conn: &mut PgConnection,
        code: &str,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM assignment_otps WHERE code = $1 AND NOT is_used)",
        )
        .bind(code)
        .fetch_one(conn)
        .await
        .map_err(|e| db_error("Failed to check assignment code", e))
    }

    /// Insert a new assignment code.
    pub async fn insert_assignment(
        &self,
        conn: &mut PgConnection,
        tab_type_id: Uuid,
        code: &str,
        created_by: Option<Uuid>,
        expires_at: DateTime<Utc>,
    ) -> AppResult<AssignmentOtp> {
        sqlx::query_as::<_, AssignmentOtp>(
            "INSERT INTO assignment_otps (tab_type_id, code, created_by, expires_at) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(tab_type_id)
        .bind(code)
        .bind(created_by)
        .bind(expires_at)
        .fetch_one(conn)
        .await
        .map_err(|e| db_error("Failed to store assignment code", e))
    }

    /// Consume a live, unexpired assignment code in one statement.
    /// Returns `None` when no such code exists at this instant.
    pub async fn consume_assignment(
        &self,
        conn: &mut PgConnection,
        code: &str,
        user_id: Uuid,
    ) -> AppResult<Option<AssignmentOtp>> {
        sqlx::query_as::<_, AssignmentOtp>(
            "UPDATE assignment_otps SET is_used = TRUE, used_by = $2, used_at = NOW() \
             WHERE code = $1 AND NOT is_used AND expires_at > NOW() RETURNING *",
        )
        .bind(code)
        .bind(user_id)
        .fetch_optional(conn)
        .await
        .map_err(|e| db_error("Failed to consume assignment code", e))
    }

    /// The record a rejected code refers to: the live one if any,
    /// otherwise the most recently issued.
    pub async fn find_assignment_by_code(
        &self,
        conn: &mut PgConnection,
        code: &str,
    ) -> AppResult<Option<AssignmentOtp>> {
        sqlx::query_as::<_, AssignmentOtp>(
            "SELECT * FROM assignment_otps WHERE code = $1 \
             ORDER BY is_used ASC, created_at DESC LIMIT 1",
        )
        .bind(code)
        .fetch_optional(conn)
        .await
        .map_err(|e| db_error("Failed to find assignment code", e))
    }

    /// Assignment codes that can still be redeemed.
    pub async fn find_live_assignments(&self) -> AppResult<Vec<AssignmentOtp>> {
        sqlx::query_as::<_, AssignmentOtp>(
            "SELECT * FROM assignment_otps WHERE NOT is_used AND expires_at > NOW() \
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list assignment codes", e))
    }

    // ── Return verifications ──

    /// Whether an unverified return code with this value exists.
    pub async fn return_code_is_live(&self, conn: &mut PgConnection, code: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM return_verifications WHERE code = $1 AND NOT verified)",
        )
        .bind(code)
        .fetch_one(conn)
        .await
        .map_err(|e| db_error("Failed to check return code", e))
    }

    /// Insert a new return verification.
    pub async fn insert_return(
        &self,
        conn: &mut PgConnection,
        device_id: Uuid,
        user_id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<ReturnVerification> {
        sqlx::query_as::<_, ReturnVerification>(
            "INSERT INTO return_verifications (device_id, user_id, code, expires_at) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(device_id)
        .bind(user_id)
        .bind(code)
        .bind(expires_at)
        .fetch_one(conn)
        .await
        .map_err(|e| db_error("Failed to store return code", e))
    }

    /// Newest unverified verification for a device, holder and code.
    pub async fn find_latest_return(
        &self,
        conn: &mut PgConnection,
        device_id: Uuid,
        user_id: Uuid,
        code: &str,
    ) -> AppResult<Option<ReturnVerification>> {
        sqlx::query_as::<_, ReturnVerification>(
            "SELECT * FROM return_verifications \
             WHERE device_id = $1 AND user_id = $2 AND code = $3 AND NOT verified \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(device_id)
        .bind(user_id)
        .bind(code)
        .fetch_optional(conn)
        .await
        .map_err(|e| db_error("Failed to find return code", e))
    }

    /// Flip a verification to verified. Returns `false` if another caller
    /// already did.
    pub async fn mark_verified(&self, conn: &mut PgConnection, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE return_verifications SET verified = TRUE, verified_at = NOW() \
             WHERE id = $1 AND NOT verified",
        )
        .bind(id)
        .execute(conn)
        .await
        .map_err(|e| db_error("Failed to verify return code", e))?;
        Ok(result.rows_affected() == 1)
    }

    /// Retire every other unverified code for a device once one of them
    /// has completed the return. Returns how many were retired.
    pub async fn void_pending_returns(
        &self,
        conn: &mut PgConnection,
        device_id: Uuid,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE return_verifications SET verified = TRUE, verified_at = NOW() \
             WHERE device_id = $1 AND NOT verified",
        )
        .bind(device_id)
        .execute(conn)
        .await
        .map_err(|e| db_error("Failed to retire return codes", e))?;
        Ok(result.rows_affected())
    }

    /// Verifications issued for a device, newest first.
    pub async fn find_returns_for_device(&self, device_id: Uuid) -> AppResult<Vec<ReturnVerification>> {
        sqlx::query_as::<_, ReturnVerification>(
            "SELECT * FROM return_verifications WHERE device_id = $1 ORDER BY created_at DESC",
        )
        .bind(device_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list return codes", e))
    }
}
