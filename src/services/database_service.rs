//! Database Service - health, counts, backup and development resets

use std::fmt;
use std::str::FromStr;

use sea_orm::{
    ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set, Statement,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Registration};
use crate::infrastructure::config::Environment;
use crate::models::{admin_user, audit_log, event, registration};
use crate::models::AdminUser;
use crate::utils::time::now_iso;

/// Rows per `INSERT` when restoring, well under SQLite's bound-variable limit
const RESTORE_CHUNK_SIZE: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableName {
    Registrations,
    Events,
    AdminUsers,
    AuditLogs,
}

impl TableName {
    pub const ALL: [TableName; 4] = [
        TableName::Registrations,
        TableName::Events,
        TableName::AdminUsers,
        TableName::AuditLogs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableName::Registrations => "registrations",
            TableName::Events => "events",
            TableName::AdminUsers => "admin_users",
            TableName::AuditLogs => "audit_logs",
        }
    }
}

/// Tables emptied by a reset or restore
const RESET_TABLES: [TableName; 3] = [
    TableName::Registrations,
    TableName::Events,
    TableName::AuditLogs,
];

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TableName::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DomainError::Validation(format!("table: unknown table '{}'", s)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCounts {
    pub registrations: u64,
    pub events: u64,
    pub audit_logs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables: Option<TableCounts>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseStats {
    pub registrations: u64,
    pub events: u64,
    pub admin_users: u64,
    pub audit_logs: u64,
    pub generated_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackupData {
    #[serde(default)]
    pub registrations: Vec<Registration>,
    #[serde(default)]
    pub events: Vec<event::Model>,
    /// Exported without password hashes, never restored
    #[serde(default)]
    pub admin_users: Vec<AdminUser>,
    #[serde(default)]
    pub audit_logs: Vec<audit_log::Model>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backup {
    pub timestamp: String,
    pub data: BackupData,
}

fn refuse_in_production(environment: Environment, what: &str) -> Result<(), DomainError> {
    if environment.is_production() {
        return Err(DomainError::Forbidden(format!(
            "cannot {} in production",
            what
        )));
    }
    Ok(())
}

/// Cheap round trip to the database
pub async fn test_connection(db: &DatabaseConnection) -> bool {
    let backend = db.get_database_backend();
    match db
        .execute(Statement::from_string(backend, "SELECT 1".to_owned()))
        .await
    {
        Ok(_) => true,
        Err(e) => {
            tracing::error!("Database connection check failed: {}", e);
            false
        }
    }
}

pub async fn count_records(db: &DatabaseConnection, table: TableName) -> Result<u64, DomainError> {
    let count = match table {
        TableName::Registrations => registration::Entity::find().count(db).await?,
        TableName::Events => event::Entity::find().count(db).await?,
        TableName::AdminUsers => admin_user::Entity::find().count(db).await?,
        TableName::AuditLogs => audit_log::Entity::find().count(db).await?,
    };
    Ok(count)
}

pub async fn health_status(db: &DatabaseConnection) -> HealthStatus {
    let error = |message: &str| HealthStatus {
        status: "error".to_string(),
        message: message.to_string(),
        tables: None,
        timestamp: now_iso(),
    };

    if !test_connection(db).await {
        return error("Unable to connect to database");
    }

    let counts = async {
        Ok::<_, DomainError>(TableCounts {
            registrations: count_records(db, TableName::Registrations).await?,
            events: count_records(db, TableName::Events).await?,
            audit_logs: count_records(db, TableName::AuditLogs).await?,
        })
    }
    .await;

    match counts {
        Ok(tables) => HealthStatus {
            status: "healthy".to_string(),
            message: "Database connection successful".to_string(),
            tables: Some(tables),
            timestamp: now_iso(),
        },
        Err(e) => {
            tracing::error!("Error checking database health: {}", e);
            error("Unexpected error checking database health")
        }
    }
}

pub async fn database_stats(db: &DatabaseConnection) -> Result<DatabaseStats, DomainError> {
    Ok(DatabaseStats {
        registrations: count_records(db, TableName::Registrations).await?,
        events: count_records(db, TableName::Events).await?,
        admin_users: count_records(db, TableName::AdminUsers).await?,
        audit_logs: count_records(db, TableName::AuditLogs).await?,
        generated_at: now_iso(),
    })
}

/// Delete every row of one table. Development only.
async fn delete_all<C: ConnectionTrait>(conn: &C, table: TableName) -> Result<u64, DomainError> {
    let result = match table {
        TableName::Registrations => registration::Entity::delete_many().exec(conn).await?,
        TableName::Events => event::Entity::delete_many().exec(conn).await?,
        TableName::AdminUsers => admin_user::Entity::delete_many().exec(conn).await?,
        TableName::AuditLogs => audit_log::Entity::delete_many().exec(conn).await?,
    };
    Ok(result.rows_affected)
}

pub async fn clear_table(
    db: &DatabaseConnection,
    environment: Environment,
    table: TableName,
) -> Result<u64, DomainError> {
    refuse_in_production(environment, "clear a table")?;

    let deleted = delete_all(db, table).await?;
    tracing::warn!("Cleared table {} ({} rows)", table, deleted);
    Ok(deleted)
}

/// Empty registrations, events and audit logs. Admin accounts survive.
pub async fn reset_database(
    db: &DatabaseConnection,
    environment: Environment,
) -> Result<(), DomainError> {
    refuse_in_production(environment, "reset the database")?;

    let txn = db.begin().await?;
    for table in RESET_TABLES {
        delete_all(&txn, table).await?;
    }
    txn.commit().await?;

    tracing::warn!("Database reset complete");
    Ok(())
}

pub async fn create_backup(db: &DatabaseConnection) -> Result<Backup, DomainError> {
    let registrations = registration::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(Registration::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    let events = event::Entity::find().all(db).await?;
    let admin_users = admin_user::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(AdminUser::from)
        .collect();
    let audit_logs = audit_log::Entity::find().all(db).await?;

    Ok(Backup {
        timestamp: now_iso(),
        data: BackupData {
            registrations,
            events,
            admin_users,
            audit_logs,
        },
    })
}

fn event_row(m: event::Model) -> event::ActiveModel {
    event::ActiveModel {
        id: Set(m.id),
        title: Set(m.title),
        description: Set(m.description),
        event_date: Set(m.event_date),
        event_time: Set(m.event_time),
        location: Set(m.location),
        event_type: Set(m.event_type),
        max_capacity: Set(m.max_capacity),
        registered_count: Set(m.registered_count),
        status: Set(m.status),
        created_by: Set(m.created_by),
        created_at: Set(m.created_at),
        updated_at: Set(m.updated_at),
    }
}

fn audit_row(m: audit_log::Model) -> audit_log::ActiveModel {
    audit_log::ActiveModel {
        id: Set(m.id),
        action: Set(m.action),
        table_name: Set(m.table_name),
        record_id: Set(m.record_id),
        admin_id: Set(m.admin_id),
        old_values: Set(m.old_values),
        new_values: Set(m.new_values),
        performed_at: Set(m.performed_at),
    }
}

/// Reset, then re-insert registrations, events and audit logs keeping
/// their ids. Admin accounts in the backup are ignored. Everything runs in
/// one transaction: a failed insert leaves the tables as they were.
pub async fn restore_backup(
    db: &DatabaseConnection,
    environment: Environment,
    backup: Backup,
) -> Result<(), DomainError> {
    refuse_in_production(environment, "restore the database")?;

    let BackupData {
        registrations,
        events,
        audit_logs,
        ..
    } = backup.data;
    let (n_reg, n_evt, n_audit) = (registrations.len(), events.len(), audit_logs.len());

    let txn = db.begin().await?;
    for table in RESET_TABLES {
        delete_all(&txn, table).await?;
    }

    for chunk in registrations.chunks(RESTORE_CHUNK_SIZE) {
        registration::Entity::insert_many(
            chunk.iter().cloned().map(registration::ActiveModel::from),
        )
        .exec(&txn)
        .await?;
    }
    for chunk in events.chunks(RESTORE_CHUNK_SIZE) {
        event::Entity::insert_many(chunk.iter().cloned().map(event_row))
            .exec(&txn)
            .await?;
    }
    for chunk in audit_logs.chunks(RESTORE_CHUNK_SIZE) {
        audit_log::Entity::insert_many(chunk.iter().cloned().map(audit_row))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;

    tracing::info!(
        "Restored backup from {}: {} registrations, {} events, {} audit entries",
        backup.timestamp,
        n_reg,
        n_evt,
        n_audit
    );
    Ok(())
}

/// Startup summary in the log
pub async fn log_database_metrics(db: &DatabaseConnection) {
    let health = health_status(db).await;
    tracing::info!("Database health: {} ({})", health.status, health.message);

    match database_stats(db).await {
        Ok(stats) => tracing::info!(
            registrations = stats.registrations,
            events = stats.events,
            admin_users = stats.admin_users,
            audit_logs = stats.audit_logs,
            "Database statistics"
        ),
        Err(e) => tracing::error!("Error logging database metrics: {}", e),
    }
}
