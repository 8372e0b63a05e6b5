use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// How a booking is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookingType {
    InHomeVisit,
    VideoConsultation,
    NurseAssignment,
}

impl BookingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingType::InHomeVisit => "in_home_visit",
            BookingType::VideoConsultation => "video_consultation",
            BookingType::NurseAssignment => "nurse_assignment",
        }
    }
}

impl std::fmt::Display for BookingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown booking type: {0}")]
pub struct ParseBookingTypeError(String);

impl std::str::FromStr for BookingType {
    type Err = ParseBookingTypeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "in_home_visit" => Ok(BookingType::InHomeVisit),
            "video_consultation" => Ok(BookingType::VideoConsultation),
            "nurse_assignment" => Ok(BookingType::NurseAssignment),
            other => Err(ParseBookingTypeError(other.to_string())),
        }
    }
}

/// Where an appointment stands. New bookings start `Pending`; every later
/// value is written as given, with no transition rules enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown appointment status: {0}")]
pub struct ParseAppointmentStatusError(String);

impl std::str::FromStr for AppointmentStatus {
    type Err = ParseAppointmentStatusError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(ParseAppointmentStatusError(other.to_string())),
        }
    }
}

/// One appointment between a patient and a professional.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Appointment {
    pub id: Uuid,
    /// The doctor or nurse the booking is against.
    pub professional_id: Uuid,
    pub patient_id: Uuid,
    /// Opaque calendar date as the client presented it, e.g. "2025-07-02".
    pub appointment_date: String,
    /// Opaque wall-clock time as the client presented it, e.g. "01:00 PM".
    pub appointment_time: String,
    pub booking_type: BookingType,
    pub symptoms: String,
    pub previous_meds: Option<String>,
    /// Attachment reference for an uploaded report.
    pub report_image: Option<String>,
    pub status: AppointmentStatus,
    /// Fee in the smallest currency unit.
    pub fee: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Booking input as accepted from a patient.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BookAppointmentRequest {
    pub professional_id: Uuid,
    pub appointment_date: String,
    pub appointment_time: String,
    pub booking_type: BookingType,
    pub symptoms: String,
    pub previous_meds: Option<String>,
    pub report_image: Option<String>,
    /// Fee in the smallest currency unit.
    pub fee: i64,
}
