use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub action: String, // CREATE, UPDATE, DELETE
    pub table_name: String,
    pub record_id: Option<i64>,
    pub admin_id: Option<i64>,
    pub old_values: Option<String>, // JSON
    pub new_values: Option<String>, // JSON
    pub performed_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
        }
    }
}

// DTO for API responses, snapshots decoded back to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: i64,
    pub action: String,
    pub table_name: String,
    pub record_id: Option<i64>,
    pub admin_id: Option<i64>,
    pub old_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
    pub performed_at: String,
}

impl From<Model> for AuditLog {
    fn from(model: Model) -> Self {
        let decode = |raw: Option<String>| raw.and_then(|s| serde_json::from_str(&s).ok());
        Self {
            id: model.id,
            action: model.action,
            table_name: model.table_name,
            record_id: model.record_id,
            admin_id: model.admin_id,
            old_values: decode(model.old_values),
            new_values: decode(model.new_values),
            performed_at: model.performed_at,
        }
    }
}
