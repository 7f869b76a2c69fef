//! Tab type repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use tabaudit_core::result::AppResult;
use tabaudit_entity::tab::{CreateTabType, TabType};

use crate::error::db_error;

/// Repository for tab types and their consumable stock counters.
#[derive(Debug, Clone)]
pub struct TabRepository {
    pool: PgPool,
}

impl TabRepository {
    /// Create a new tab repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a tab type by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<TabType>> {
        sqlx::query_as::<_, TabType>("SELECT * FROM tab_types WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find tab type", e))
    }

    /// Find a tab type by exact name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<TabType>> {
        sqlx::query_as::<_, TabType>("SELECT * FROM tab_types WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find tab type by name", e))
    }

    /// List every tab type ordered by name.
    pub async fn find_all(&self) -> AppResult<Vec<TabType>> {
        sqlx::query_as::<_, TabType>("SELECT * FROM tab_types ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list tab types", e))
    }

    /// Sum of consumable stock across all tab types.
    pub async fn total_stock(&self) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COALESCE(SUM(stock_remaining), 0)::BIGINT FROM tab_types")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to sum stock", e))
    }

    /// Lock a tab type row for the rest of the transaction.
    pub async fn lock_by_id(&self, conn: &mut PgConnection, id: Uuid) -> AppResult<Option<TabType>> {
        sqlx::query_as::<_, TabType>("SELECT * FROM tab_types WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(|e| db_error("Failed to lock tab type", e))
    }

    /// Lock a tab type row by name.
    pub async fn lock_by_name(
        &self,
        conn: &mut PgConnection,
        name: &str,
    ) -> AppResult<Option<TabType>> {
        sqlx::query_as::<_, TabType>("SELECT * FROM tab_types WHERE name = $1 FOR UPDATE")
            .bind(name)
            .fetch_optional(conn)
            .await
            .map_err(|e| db_error("Failed to lock tab type by name", e))
    }

    /// Insert a tab type unless the name is taken. Returns `None` when a
    /// row with the same name already exists.
    pub async fn create_if_absent(
        &self,
        conn: &mut PgConnection,
        data: &CreateTabType,
    ) -> AppResult<Option<TabType>> {
        sqlx::query_as::<_, TabType>(
            "INSERT INTO tab_types (name, daily_limit_per_user, stock_remaining, low_stock_threshold) \
             VALUES ($1, $2, $3, $4) ON CONFLICT (name) DO NOTHING RETURNING *",
        )
        .bind(&data.name)
        .bind(data.daily_limit_per_user)
        .bind(data.stock_remaining)
        .bind(data.low_stock_threshold)
        .fetch_optional(conn)
        .await
        .map_err(|e| db_error("Failed to create tab type", e))
    }

    /// Apply a signed delta to the stock counter of a locked row and
    /// return the new remaining stock.
    pub async fn adjust_stock(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        delta: i32,
    ) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE tab_types SET stock_remaining = stock_remaining + $2 \
             WHERE id = $1 RETURNING stock_remaining",
        )
        .bind(id)
        .bind(delta)
        .fetch_one(conn)
        .await
        .map_err(|e| db_error("Failed to adjust stock", e))
    }

    /// Set the per-user daily limit.
    pub async fn update_limit(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        daily_limit: i32,
    ) -> AppResult<TabType> {
        sqlx::query_as::<_, TabType>(
            "UPDATE tab_types SET daily_limit_per_user = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(daily_limit)
        .fetch_one(conn)
        .await
        .map_err(|e| db_error("Failed to update daily limit", e))
    }
}
