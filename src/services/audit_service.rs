//! Audit Service - append-only change log for admin actions

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::Serialize;

use crate::domain::{DomainError, Registration};
use crate::models::audit_log::{self, AuditAction, AuditLog, Entity as AuditLogEntity};
use crate::utils::time::{now_iso, to_iso};

pub const REGISTRATIONS_TABLE: &str = "registrations";
pub const DEFAULT_LIMIT: u64 = 100;

fn snapshot<T: Serialize>(value: Option<&T>) -> Result<Option<String>, DomainError> {
    value
        .map(|v| serde_json::to_string(v).map_err(DomainError::from))
        .transpose()
}

/// Append one entry. Snapshots are stored as JSON text.
pub async fn log_action<T: Serialize>(
    db: &DatabaseConnection,
    action: AuditAction,
    table_name: &str,
    record_id: Option<i64>,
    admin_id: Option<i64>,
    old_values: Option<&T>,
    new_values: Option<&T>,
) -> Result<AuditLog, DomainError> {
    let entry = audit_log::ActiveModel {
        action: Set(action.as_str().to_string()),
        table_name: Set(table_name.to_string()),
        record_id: Set(record_id),
        admin_id: Set(admin_id),
        old_values: Set(snapshot(old_values)?),
        new_values: Set(snapshot(new_values)?),
        performed_at: Set(now_iso()),
        ..Default::default()
    };

    let model = entry.insert(db).await?;
    Ok(AuditLog::from(model))
}

pub async fn log_registration_created(
    db: &DatabaseConnection,
    record: &Registration,
    admin_id: Option<i64>,
) -> Result<AuditLog, DomainError> {
    log_action(
        db,
        AuditAction::Create,
        REGISTRATIONS_TABLE,
        Some(record.id),
        admin_id,
        None,
        Some(record),
    )
    .await
}

pub async fn log_registration_updated(
    db: &DatabaseConnection,
    before: &Registration,
    after: &Registration,
    admin_id: Option<i64>,
) -> Result<AuditLog, DomainError> {
    log_action(
        db,
        AuditAction::Update,
        REGISTRATIONS_TABLE,
        Some(after.id),
        admin_id,
        Some(before),
        Some(after),
    )
    .await
}

pub async fn log_registration_deleted(
    db: &DatabaseConnection,
    record: &Registration,
    admin_id: Option<i64>,
) -> Result<AuditLog, DomainError> {
    log_action(
        db,
        AuditAction::Delete,
        REGISTRATIONS_TABLE,
        Some(record.id),
        admin_id,
        Some(record),
        None,
    )
    .await
}

/// Filter parameters for listing audit entries
#[derive(Debug, Default, Clone)]
pub struct AuditFilter {
    pub table_name: Option<String>,
    pub record_id: Option<i64>,
    pub action: Option<AuditAction>,
    pub admin_id: Option<i64>,
    pub limit: Option<u64>,
}

/// Newest first
pub async fn list_logs(
    db: &DatabaseConnection,
    filter: AuditFilter,
) -> Result<Vec<AuditLog>, DomainError> {
    let mut query = AuditLogEntity::find();

    if let Some(table) = filter.table_name {
        query = query.filter(audit_log::Column::TableName.eq(table));
    }
    if let Some(record_id) = filter.record_id {
        query = query.filter(audit_log::Column::RecordId.eq(record_id));
    }
    if let Some(action) = filter.action {
        query = query.filter(audit_log::Column::Action.eq(action.as_str()));
    }
    if let Some(admin_id) = filter.admin_id {
        query = query.filter(audit_log::Column::AdminId.eq(admin_id));
    }

    let logs = query
        .order_by_desc(audit_log::Column::PerformedAt)
        .order_by_desc(audit_log::Column::Id)
        .limit(filter.limit.unwrap_or(DEFAULT_LIMIT))
        .all(db)
        .await?;

    Ok(logs.into_iter().map(AuditLog::from).collect())
}

pub async fn logs_for_table(
    db: &DatabaseConnection,
    table_name: &str,
    record_id: Option<i64>,
    limit: Option<u64>,
) -> Result<Vec<AuditLog>, DomainError> {
    list_logs(
        db,
        AuditFilter {
            table_name: Some(table_name.to_string()),
            record_id,
            limit,
            ..Default::default()
        },
    )
    .await
}

pub async fn logs_by_action(
    db: &DatabaseConnection,
    action: AuditAction,
    limit: Option<u64>,
) -> Result<Vec<AuditLog>, DomainError> {
    list_logs(
        db,
        AuditFilter {
            action: Some(action),
            limit,
            ..Default::default()
        },
    )
    .await
}

pub async fn logs_by_admin(
    db: &DatabaseConnection,
    admin_id: i64,
    limit: Option<u64>,
) -> Result<Vec<AuditLog>, DomainError> {
    list_logs(
        db,
        AuditFilter {
            admin_id: Some(admin_id),
            limit,
            ..Default::default()
        },
    )
    .await
}

/// Every entry for one row, unbounded
pub async fn record_history(
    db: &DatabaseConnection,
    table_name: &str,
    record_id: i64,
) -> Result<Vec<AuditLog>, DomainError> {
    let logs = AuditLogEntity::find()
        .filter(audit_log::Column::TableName.eq(table_name))
        .filter(audit_log::Column::RecordId.eq(record_id))
        .order_by_desc(audit_log::Column::PerformedAt)
        .order_by_desc(audit_log::Column::Id)
        .all(db)
        .await?;

    Ok(logs.into_iter().map(AuditLog::from).collect())
}

/// Delete entries older than `days`; returns how many were removed
pub async fn cleanup_older_than(db: &DatabaseConnection, days: i64) -> Result<u64, DomainError> {
    if days < 0 {
        return Err(DomainError::Validation(
            "older_than_days: must not be negative".to_string(),
        ));
    }

    let cutoff = to_iso(chrono::Utc::now() - chrono::Duration::days(days));
    let result = AuditLogEntity::delete_many()
        .filter(audit_log::Column::PerformedAt.lt(cutoff))
        .exec(db)
        .await?;

    tracing::info!(
        "Pruned {} audit entries older than {} days",
        result.rows_affected,
        days
    );
    Ok(result.rows_affected)
}
