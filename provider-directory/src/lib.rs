//! Doctor directory queries for the MediBook platform.
//!
//! Read-only lookups over the user store: a filtered listing of verified
//! doctors and a single-doctor fetch that refuses to reveal whether a given
//! id is malformed, absent, or belongs to a non-doctor account.

pub mod error;
pub mod models;
pub mod service;

pub use error::{DirectoryError, Result};
pub use models::{DoctorFilter, DoctorProfile};
pub use service::DirectoryService;
