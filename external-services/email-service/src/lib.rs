//! Outbound email delivery.
//!
//! A thin seam over SMTP: callers hand a recipient/subject/body triple to a
//! [`Mailer`] and get a binary success/failure back. No queueing, no retries;
//! a failed delivery is the caller's problem to compensate for.

pub mod error;
pub mod service;

pub use error::{EmailError, EmailResult};
pub use service::{EmailConfig, Mailer, OutgoingEmail, SmtpMailer};
