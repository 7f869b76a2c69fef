//! Tablet device repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use tabaudit_core::result::AppResult;
use tabaudit_entity::device::{CreateDevice, DeviceStatus, TabletDevice};
use tabaudit_entity::otp::PendingReturn;
use tabaudit_entity::report::HeldDevice;

use crate::error::db_error;

/// Repository for physical devices.
///
/// Status writes are compare-and-swap guarded on the expected current
/// status and report whether a row changed, so a caller that lost a race
/// sees `false` instead of overwriting someone else's transition.
#[derive(Debug, Clone)]
pub struct DeviceRepository {
    pool: PgPool,
}

impl DeviceRepository {
    /// Create a new device repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a device by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<TabletDevice>> {
        sqlx::query_as::<_, TabletDevice>("SELECT * FROM tablet_devices WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find device", e))
    }

    /// Find a device by serial number or scan code.
    pub async fn find_by_code(&self, code: &str) -> AppResult<Option<TabletDevice>> {
        sqlx::query_as::<_, TabletDevice>(
            "SELECT * FROM tablet_devices WHERE serial_number = $1 OR scan_code = $1 \
             ORDER BY (serial_number = $1) DESC LIMIT 1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find device by code", e))
    }

    /// List devices, optionally restricted to a tab type and a status.
    pub async fn find_all(
        &self,
        tab_type_id: Option<Uuid>,
        status: Option<DeviceStatus>,
    ) -> AppResult<Vec<TabletDevice>> {
        sqlx::query_as::<_, TabletDevice>(
            "SELECT * FROM tablet_devices \
             WHERE ($1::UUID IS NULL OR tab_type_id = $1) \
             AND ($2::device_status IS NULL OR status = $2) \
             ORDER BY serial_number",
        )
        .bind(tab_type_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list devices", e))
    }

    /// Number of available devices of a tab type.
    pub async fn count_available(&self, tab_type_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tablet_devices WHERE tab_type_id = $1 AND status = 'available'",
        )
        .bind(tab_type_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to count available devices", e))
    }

    /// Provision a device. Duplicate serial numbers or scan codes are
    /// conflicts.
    pub async fn create(&self, data: &CreateDevice) -> AppResult<TabletDevice> {
        sqlx::query_as::<_, TabletDevice>(
            "INSERT INTO tablet_devices (tab_type_id, serial_number, scan_code, condition) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(data.tab_type_id)
        .bind(&data.serial_number)
        .bind(&data.scan_code)
        .bind(&data.condition)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to provision device", e))
    }

    /// Devices currently held by a user.
    pub async fn find_held_by(&self, user_id: Uuid) -> AppResult<Vec<HeldDevice>> {
        sqlx::query_as::<_, HeldDevice>(
            "SELECT d.id AS device_id, d.serial_number, t.name AS tab_name, d.status, d.assigned_at \
             FROM tablet_devices d JOIN tab_types t ON t.id = d.tab_type_id \
             WHERE d.assigned_to = $1 AND d.status IN ('assigned', 'return_pending') \
             ORDER BY d.assigned_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list held devices", e))
    }

    /// Devices awaiting return with their newest unverified code.
    pub async fn find_pending_returns(&self) -> AppResult<Vec<PendingReturn>> {
        sqlx::query_as::<_, PendingReturn>(
            "SELECT DISTINCT ON (d.id) d.id AS device_id, d.serial_number, \
                    u.employee_id, u.username, r.code, r.expires_at \
             FROM tablet_devices d \
             JOIN return_verifications r ON r.device_id = d.id AND NOT r.verified \
             JOIN users u ON u.id = r.user_id \
             WHERE d.status = 'return_pending' AND r.user_id = d.assigned_to \
             AND r.expires_at > NOW() \
             ORDER BY d.id, r.created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list pending returns", e))
    }

    /// Lock a device by serial number or scan code. A serial number match
    /// wins over a scan code match.
    pub async fn lock_by_code(
        &self,
        conn: &mut PgConnection,
        code: &str,
    ) -> AppResult<Option<TabletDevice>> {
        sqlx::query_as::<_, TabletDevice>(
            "SELECT * FROM tablet_devices WHERE serial_number = $1 OR scan_code = $1 \
             ORDER BY (serial_number = $1) DESC LIMIT 1 FOR UPDATE",
        )
        .bind(code)
        .fetch_optional(conn)
        .await
        .map_err(|e| db_error("Failed to lock device", e))
    }

    /// Lock the first available device of a tab type, skipping rows other
    /// transactions hold, in serial number order.
    pub async fn lock_first_available(
        &self,
        conn: &mut PgConnection,
        tab_type_id: Uuid,
    ) -> AppResult<Option<TabletDevice>> {
        sqlx::query_as::<_, TabletDevice>(
            "SELECT * FROM tablet_devices WHERE tab_type_id = $1 AND status = 'available' \
             ORDER BY serial_number, id LIMIT 1 FOR UPDATE SKIP LOCKED",
        )
        .bind(tab_type_id)
        .fetch_optional(conn)
        .await
        .map_err(|e| db_error("Failed to pick an available device", e))
    }

    /// `available` → `assigned` for `user_id`.
    pub async fn mark_assigned(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        user_id: Uuid,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE tablet_devices SET status = 'assigned', assigned_to = $2, assigned_at = NOW() \
             WHERE id = $1 AND status = 'available'",
        )
        .bind(id)
        .bind(user_id)
        .execute(conn)
        .await
        .map_err(|e| db_error("Failed to assign device", e))?;
        Ok(result.rows_affected() == 1)
    }

    /// `assigned` | `return_pending` → `return_pending`, holder unchanged.
    pub async fn mark_return_pending(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        holder: Uuid,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE tablet_devices SET status = 'return_pending' \
             WHERE id = $1 AND assigned_to = $2 AND status IN ('assigned', 'return_pending')",
        )
        .bind(id)
        .bind(holder)
        .execute(conn)
        .await
        .map_err(|e| db_error("Failed to mark return pending", e))?;
        Ok(result.rows_affected() == 1)
    }

    /// `return_pending` → `next` (available or repair), recording the
    /// condition and clearing the holder.
    pub async fn complete_return(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        next: DeviceStatus,
        condition: &str,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE tablet_devices \
             SET status = $2, condition = $3, assigned_to = NULL, assigned_at = NULL \
             WHERE id = $1 AND status = 'return_pending'",
        )
        .bind(id)
        .bind(next)
        .bind(condition)
        .execute(conn)
        .await
        .map_err(|e| db_error("Failed to complete return", e))?;
        Ok(result.rows_affected() == 1)
    }
}
