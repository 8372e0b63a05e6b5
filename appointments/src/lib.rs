//! Appointment records for the MediBook platform.
//!
//! Booking creates a `Pending` appointment between a patient and a verified
//! professional. Parties read their own records, and status values are
//! written as given: scheduling workflows outside this crate decide what the
//! next status is.

pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use error::{AppointmentError, Result};
pub use models::{Appointment, AppointmentStatus, BookAppointmentRequest, BookingType};
pub use repository::{AppointmentRepository, InMemoryAppointmentRepository};
pub use service::AppointmentService;
