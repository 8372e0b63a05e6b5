//! Identity management and authentication for the MediBook platform.
//!
//! This crate owns the account model and the auth flows the HTTP surface
//! exposes: registration, login with the professional verification gate,
//! profile lookup, and the password reset lifecycle. Persistence sits behind
//! the [`repository::UserRepository`] trait; notification delivery behind the
//! `email-service` crate's `Mailer` trait.

pub mod config;
pub mod error;
pub mod models;
pub mod password;
pub mod policy;
pub mod repository;
pub mod reset;
pub mod service;
pub mod tokens;

pub use config::AuthConfig;
pub use error::{IdentityError, Result};
pub use models::{NewUser, Role, SignedToken, User};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::IdentityService;
pub use tokens::{Claims, TokenIssuer};
