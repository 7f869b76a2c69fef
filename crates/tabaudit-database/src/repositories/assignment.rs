//! Assignment log (device ledger) repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use tabaudit_core::result::AppResult;
use tabaudit_entity::assignment::{AssignmentLog, AssignmentLogView};

use super::usage::ClientInfo;
use crate::error::db_error;

/// Repository for device handovers.
#[derive(Debug, Clone)]
pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    /// Create a new assignment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Serialize concurrent assignments of the same (user, tab type) pair
    /// until the surrounding transaction ends.
    ///
    /// The daily-limit count reads rows no other transaction has locked,
    /// so without this two assignments of different devices could both
    /// pass the check.
    pub async fn lock_user_tab(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        tab_type_id: Uuid,
    ) -> AppResult<()> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(format!("assignment:{user_id}:{tab_type_id}"))
            .execute(conn)
            .await
            .map_err(|e| db_error("Failed to lock assignment quota", e))?;
        Ok(())
    }

    /// Handovers of a tab type to a user since `since`.
    pub async fn count_issued_since(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        tab_type_id: Uuid,
        since: DateTime<Utc>,
    ) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM assignment_logs \
             WHERE user_id = $1 AND tab_type_id = $2 AND issued_at >= $3",
        )
        .bind(user_id)
        .bind(tab_type_id)
        .bind(since)
        .fetch_one(conn)
        .await
        .map_err(|e| db_error("Failed to count today's assignments", e))
    }

    /// Open a new `active` entry. A second active entry for the same
    /// device is rejected by the store as a conflict.
    pub async fn create(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        device_id: Uuid,
        tab_type_id: Uuid,
        client: &ClientInfo,
    ) -> AppResult<AssignmentLog> {
        sqlx::query_as::<_, AssignmentLog>(
            "INSERT INTO assignment_logs (user_id, device_id, tab_type_id, ip_address, device_info) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(user_id)
        .bind(device_id)
        .bind(tab_type_id)
        .bind(&client.ip_address)
        .bind(&client.device_info)
        .fetch_one(conn)
        .await
        .map_err(|e| db_error("Failed to write assignment log", e))
    }

    /// Close the active entry of a device held by `user_id`.
    pub async fn close_active(
        &self,
        conn: &mut PgConnection,
        device_id: Uuid,
        user_id: Uuid,
        condition: &str,
    ) -> AppResult<Option<AssignmentLog>> {
        sqlx::query_as::<_, AssignmentLog>(
            "UPDATE assignment_logs SET status = 'returned', returned_at = NOW(), return_condition = $3 \
             WHERE device_id = $1 AND user_id = $2 AND status = 'active' RETURNING *",
        )
        .bind(device_id)
        .bind(user_id)
        .bind(condition)
        .fetch_optional(conn)
        .await
        .map_err(|e| db_error("Failed to close assignment log", e))
    }

    /// Entries of one device, newest first.
    pub async fn find_by_device(&self, device_id: Uuid) -> AppResult<Vec<AssignmentLog>> {
        sqlx::query_as::<_, AssignmentLog>(
            "SELECT * FROM assignment_logs WHERE device_id = $1 ORDER BY issued_at DESC",
        )
        .bind(device_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list device assignments", e))
    }

    /// Every open handover with display names.
    pub async fn find_active(&self) -> AppResult<Vec<AssignmentLogView>> {
        sqlx::query_as::<_, AssignmentLogView>(
            "SELECT a.id, u.employee_id, u.username, d.serial_number, t.name AS tab_name, \
                    a.status, a.issued_at, a.returned_at \
             FROM assignment_logs a \
             JOIN users u ON u.id = a.user_id \
             JOIN tablet_devices d ON d.id = a.device_id \
             JOIN tab_types t ON t.id = a.tab_type_id \
             WHERE a.status = 'active' ORDER BY a.issued_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list active assignments", e))
    }
}
