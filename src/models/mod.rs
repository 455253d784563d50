pub mod admin_user;
pub mod audit_log;
pub mod event;
pub mod registration;

pub use admin_user::AdminUser;
pub use audit_log::{AuditAction, AuditLog};
