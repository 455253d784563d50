//! Services Layer
//!
//! Business logic behind the HTTP handlers. Everything here can also be
//! called directly by library users.

pub mod admin_service;
pub mod admin_user_service;
pub mod audit_service;
pub mod csv_export;
pub mod database_service;
pub mod event_service;
pub mod registration_service;
pub mod write_tiers;

pub use admin_service::AdminService;
pub use registration_service::RegistrationService;
pub use write_tiers::{DatabaseTier, LocalTier, ProxyTier, TieredWriter, WriteTier};
