//! Usage log (consumable ledger) repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use tabaudit_core::result::AppResult;
use tabaudit_entity::report::{ActiveLoan, DailyUsage, PossessedTab, TabUsageBreakdown};
use tabaudit_entity::usage::{UsageLog, UsageLogView};

use crate::error::db_error;

const VIEW_COLUMNS: &str = "l.id, u.employee_id, u.username, t.name AS tab_name, \
                            l.quantity, l.timestamp, l.ip_address";

/// Client metadata captured with a ledger entry.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    /// Client address.
    pub ip_address: Option<String>,
    /// Client user agent.
    pub device_info: Option<String>,
}

/// Repository for the append-only consumable ledger.
#[derive(Debug, Clone)]
pub struct UsageRepository {
    pool: PgPool,
}

impl UsageRepository {
    /// Create a new usage repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a signed ledger entry.
    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        tab_type_id: Uuid,
        quantity: i32,
        client: &ClientInfo,
    ) -> AppResult<UsageLog> {
        sqlx::query_as::<_, UsageLog>(
            "INSERT INTO usage_logs (user_id, tab_type_id, quantity, ip_address, device_info) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(user_id)
        .bind(tab_type_id)
        .bind(quantity)
        .bind(&client.ip_address)
        .bind(&client.device_info)
        .fetch_one(conn)
        .await
        .map_err(|e| db_error("Failed to write usage log", e))
    }

    /// Units a user has taken of a tab type since `since`.
    pub async fn sum_logged_since(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        tab_type_id: Uuid,
        since: DateTime<Utc>,
    ) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(quantity), 0)::BIGINT FROM usage_logs \
             WHERE user_id = $1 AND tab_type_id = $2 AND quantity > 0 AND timestamp >= $3",
        )
        .bind(user_id)
        .bind(tab_type_id)
        .bind(since)
        .fetch_one(conn)
        .await
        .map_err(|e| db_error("Failed to count today's usage", e))
    }

    /// Net units a user holds of a tab type.
    pub async fn balance(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        tab_type_id: Uuid,
    ) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(quantity), 0)::BIGINT FROM usage_logs \
             WHERE user_id = $1 AND tab_type_id = $2",
        )
        .bind(user_id)
        .bind(tab_type_id)
        .fetch_one(conn)
        .await
        .map_err(|e| db_error("Failed to compute balance", e))
    }

    /// Tab types with a positive net balance for a user.
    pub async fn find_possession(&self, user_id: Uuid) -> AppResult<Vec<PossessedTab>> {
        sqlx::query_as::<_, PossessedTab>(
            "SELECT t.id AS tab_type_id, t.name AS tab_name, SUM(l.quantity)::BIGINT AS quantity \
             FROM usage_logs l JOIN tab_types t ON t.id = l.tab_type_id \
             WHERE l.user_id = $1 \
             GROUP BY t.id, t.name HAVING SUM(l.quantity) > 0 \
             ORDER BY t.name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to compute possession", e))
    }

    /// Most recent entries of one user.
    pub async fn find_history(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<UsageLogView>> {
        sqlx::query_as::<_, UsageLogView>(&format!(
            "SELECT {VIEW_COLUMNS} FROM usage_logs l \
             JOIN users u ON u.id = l.user_id JOIN tab_types t ON t.id = l.tab_type_id \
             WHERE l.user_id = $1 ORDER BY l.timestamp DESC LIMIT $2"
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load history", e))
    }

    /// Most recent entries across all users.
    pub async fn find_recent(&self, limit: i64) -> AppResult<Vec<UsageLogView>> {
        sqlx::query_as::<_, UsageLogView>(&format!(
            "SELECT {VIEW_COLUMNS} FROM usage_logs l \
             JOIN users u ON u.id = l.user_id JOIN tab_types t ON t.id = l.tab_type_id \
             ORDER BY l.timestamp DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load recent activity", e))
    }

    /// Entries whose employee number or tab name contains `term`
    /// (case-insensitive). An empty term matches everything.
    pub async fn search(&self, term: &str, limit: i64) -> AppResult<Vec<UsageLogView>> {
        let pattern = format!("%{}%", escape_like(term));
        sqlx::query_as::<_, UsageLogView>(&format!(
            "SELECT {VIEW_COLUMNS} FROM usage_logs l \
             JOIN users u ON u.id = l.user_id JOIN tab_types t ON t.id = l.tab_type_id \
             WHERE u.employee_id ILIKE $1 OR t.name ILIKE $1 \
             ORDER BY l.timestamp DESC LIMIT $2"
        ))
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to search usage logs", e))
    }

    /// Every positive (user, tab type) balance.
    pub async fn find_active_loans(&self) -> AppResult<Vec<ActiveLoan>> {
        sqlx::query_as::<_, ActiveLoan>(
            "SELECT u.employee_id, u.username, t.name AS tab_name, SUM(l.quantity)::BIGINT AS quantity \
             FROM usage_logs l \
             JOIN users u ON u.id = l.user_id JOIN tab_types t ON t.id = l.tab_type_id \
             GROUP BY u.employee_id, u.username, t.name HAVING SUM(l.quantity) > 0 \
             ORDER BY u.employee_id, t.name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list active loans", e))
    }

    /// Units taken since the start of the day and of the month.
    pub async fn usage_totals(
        &self,
        day_start: DateTime<Utc>,
        month_start: DateTime<Utc>,
    ) -> AppResult<DailyUsage> {
        sqlx::query_as::<_, DailyUsage>(
            "SELECT \
                COALESCE(SUM(quantity) FILTER (WHERE timestamp >= $1), 0)::BIGINT AS used_today, \
                COALESCE(SUM(quantity) FILTER (WHERE timestamp >= $2), 0)::BIGINT AS used_this_month \
             FROM usage_logs WHERE quantity > 0",
        )
        .bind(day_start)
        .bind(month_start)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to compute usage totals", e))
    }

    /// Per-tab stock and units taken since the start of the day and month.
    pub async fn breakdown(
        &self,
        day_start: DateTime<Utc>,
        month_start: DateTime<Utc>,
    ) -> AppResult<Vec<TabUsageBreakdown>> {
        sqlx::query_as::<_, TabUsageBreakdown>(
            "SELECT t.name AS tab_name, t.stock_remaining, \
                COALESCE(SUM(l.quantity) FILTER (WHERE l.timestamp >= $1), 0)::BIGINT AS used_today, \
                COALESCE(SUM(l.quantity) FILTER (WHERE l.timestamp >= $2), 0)::BIGINT AS used_this_month \
             FROM tab_types t \
             LEFT JOIN usage_logs l ON l.tab_type_id = t.id AND l.quantity > 0 \
             GROUP BY t.id, t.name, t.stock_remaining ORDER BY t.name",
        )
        .bind(day_start)
        .bind(month_start)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to compute usage breakdown", e))
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.trim().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
