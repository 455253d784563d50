//! Repository implementations using SeaORM

pub mod registration_repository;

pub use registration_repository::SeaOrmRegistrationRepository;
