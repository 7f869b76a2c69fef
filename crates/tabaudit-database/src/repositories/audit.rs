//! Audit log repository implementation.

use sqlx::PgPool;

use tabaudit_core::result::AppResult;
use tabaudit_core::types::pagination::{PageRequest, PageResponse};
use tabaudit_entity::audit::{AuditLogEntry, AuditSearchFilter, CreateAuditLogEntry};

use crate::error::db_error;

const SELECT_ENTRY: &str = "SELECT a.id, a.admin_id, u.employee_id AS admin_employee_id, \
                            a.action_type, a.description, a.timestamp \
                            FROM audit_log a LEFT JOIN users u ON u.id = a.admin_id";

/// Repository for the append-only audit trail.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append an audit entry.
    pub async fn create(&self, data: &CreateAuditLogEntry) -> AppResult<()> {
        sqlx::query("INSERT INTO audit_log (admin_id, action_type, description) VALUES ($1, $2, $3)")
            .bind(data.admin_id)
            .bind(data.action.as_str())
            .bind(&data.description)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to create audit entry", e))?;
        Ok(())
    }

    /// Most recent entries.
    pub async fn find_recent(&self, limit: i64) -> AppResult<Vec<AuditLogEntry>> {
        sqlx::query_as::<_, AuditLogEntry>(&format!(
            "{SELECT_ENTRY} ORDER BY a.timestamp DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load audit trail", e))
    }

    /// Search the audit trail with optional filters.
    pub async fn search(
        &self,
        filter: &AuditSearchFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<AuditLogEntry>> {
        let mut conditions = Vec::new();
        let mut param_idx = 1u32;

        if filter.action.is_some() {
            conditions.push(format!("a.action_type = ${param_idx}"));
            param_idx += 1;
        }
        if filter.admin_id.is_some() {
            conditions.push(format!("a.admin_id = ${param_idx}"));
            param_idx += 1;
        }
        if filter.since.is_some() {
            conditions.push(format!("a.timestamp >= ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM audit_log a {where_clause}");
        let select_sql = format!(
            "{SELECT_ENTRY} {where_clause} ORDER BY a.timestamp DESC LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, AuditLogEntry>(&select_sql);

        if let Some(action) = filter.action {
            count_query = count_query.bind(action.as_str());
            select_query = select_query.bind(action.as_str());
        }
        if let Some(admin_id) = filter.admin_id {
            count_query = count_query.bind(admin_id);
            select_query = select_query.bind(admin_id);
        }
        if let Some(since) = filter.since {
            count_query = count_query.bind(since);
            select_query = select_query.bind(since);
        }

        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count audit entries", e))?;

        let entries = select_query
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to search audit log", e))?;

        Ok(PageResponse::new(entries, page, total))
    }
}
