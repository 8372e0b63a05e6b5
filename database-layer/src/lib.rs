//! PostgreSQL persistence for the MediBook platform.
//!
//! Implements the store traits declared by `auth-identity` and
//! `appointments` over sqlx. Rows are mapped to domain types at this
//! boundary; the credential hash and the reset-token columns never leave it.

pub mod appointment_repository;
pub mod connection;
pub mod user_repository;

pub use appointment_repository::PostgresAppointmentRepository;
pub use connection::{connect, run_migrations};
pub use user_repository::PostgresUserRepository;

pub use sqlx::PgPool;
